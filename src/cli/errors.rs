//! CLI-specific error types

use std::fmt;
use std::io;

use crate::schema::{DeriveError, SchemaError};

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdin/stdout/files)
    IoError,
    /// Descriptor or registry error
    SchemaError,
    /// Derived fields could not be computed
    DerivationFailed,
    /// Document failed validation
    DocumentInvalid,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "CLI_CONFIG_ERROR",
            Self::IoError => "CLI_IO_ERROR",
            Self::SchemaError => "CLI_SCHEMA_ERROR",
            Self::DerivationFailed => "CLI_DERIVATION_FAILED",
            Self::DocumentInvalid => "CLI_DOCUMENT_INVALID",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Document rejected with `count` violations
    pub fn document_invalid(document_type: &str, count: usize) -> Self {
        Self::new(
            CliErrorCode::DocumentInvalid,
            format!("{} document has {} violation(s)", document_type, count),
        )
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Process exit code: 2 for rejected documents, 1 otherwise
    pub fn exit_code(&self) -> i32 {
        match self.code {
            CliErrorCode::DocumentInvalid => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<SchemaError> for CliError {
    fn from(e: SchemaError) -> Self {
        Self::new(CliErrorCode::SchemaError, format!("[{}] {}", e.code(), e))
    }
}

impl From<DeriveError> for CliError {
    fn from(e: DeriveError) -> Self {
        Self::new(CliErrorCode::DerivationFailed, format!("[{}] {}", e.code(), e))
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code() {
        let err = CliError::config_error("bad level");
        assert_eq!(err.to_string(), "CLI_CONFIG_ERROR: bad level");
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_document_invalid_exit_code() {
        let err = CliError::document_invalid("product", 3);
        assert_eq!(err.code_str(), "CLI_DOCUMENT_INVALID");
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().contains("3 violation"));
    }

    #[test]
    fn test_from_schema_error() {
        let err: CliError = SchemaError::UnknownDocumentType("order".into()).into();
        assert_eq!(err.code(), &CliErrorCode::SchemaError);
        assert!(err.message().contains("SCHEMA_UNKNOWN_DOCUMENT_TYPE"));
    }
}
