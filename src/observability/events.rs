//! Observable events
//!
//! Events are explicit and typed; each maps to one stable log event name.

use std::fmt;

use super::logger::Severity;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration loaded
    ConfigLoaded,

    // Registry
    /// A document type descriptor was registered
    SchemaRegistered,
    /// Descriptors loaded from a directory
    SchemasLoaded,
    /// Descriptors written to a directory
    SchemasExported,

    // Documents
    /// Document passed validation
    DocumentValid,
    /// Document failed validation
    DocumentInvalid,
    /// Derived fields recomputed
    DerivationComplete,
    /// A derived field has no defined value
    DerivationUndefined,

    // CLI
    /// Command failed
    CommandFailed,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SchemaRegistered => "SCHEMA_REGISTERED",
            Event::SchemasLoaded => "SCHEMAS_LOADED",
            Event::SchemasExported => "SCHEMAS_EXPORTED",
            Event::DocumentValid => "DOCUMENT_VALID",
            Event::DocumentInvalid => "DOCUMENT_INVALID",
            Event::DerivationComplete => "DERIVATION_COMPLETE",
            Event::DerivationUndefined => "DERIVATION_UNDEFINED",
            Event::CommandFailed => "COMMAND_FAILED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::SchemaRegistered => Severity::Trace,
            Event::DocumentInvalid | Event::DerivationUndefined => Severity::Warn,
            Event::CommandFailed => Severity::Error,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_are_screaming_snake() {
        let events = [
            Event::ConfigLoaded,
            Event::SchemaRegistered,
            Event::SchemasLoaded,
            Event::SchemasExported,
            Event::DocumentValid,
            Event::DocumentInvalid,
            Event::DerivationComplete,
            Event::DerivationUndefined,
            Event::CommandFailed,
        ];
        for event in events {
            let name = event.as_str();
            assert!(name.chars().all(|c| c.is_ascii_uppercase() || c == '_'), "{}", name);
        }
    }

    #[test]
    fn test_event_severity() {
        assert_eq!(Event::SchemaRegistered.severity(), Severity::Trace);
        assert_eq!(Event::DocumentInvalid.severity(), Severity::Warn);
        assert_eq!(Event::CommandFailed.severity(), Severity::Error);
        assert_eq!(Event::DocumentValid.severity(), Severity::Info);
    }
}
