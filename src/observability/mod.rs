//! Observability
//!
//! Structured JSON logging of typed lifecycle events.
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on validation or derivation results
//! 3. No async or background threads
//!
//! # Usage
//!
//! ```ignore
//! use product_schema::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::DocumentValid, &[("schema", "product")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_line_carries_severity() {
        let event = Event::DocumentInvalid;
        let output = logger::capture_log(event.severity(), event.as_str(), &[("schema", "product")]);
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["event"], "DOCUMENT_INVALID");
        assert_eq!(parsed["severity"], "WARN");
        assert_eq!(parsed["schema"], "product");
    }
}
