//! Schema error types
//!
//! Two families live here:
//! - `SchemaError`: descriptor misuse (unknown type names, malformed or
//!   conflicting descriptors). Surfaced to the caller immediately.
//! - `DeriveError`: a derived field cannot be computed from the current
//!   sibling values.
//!
//! Document problems are never errors; they are collected as
//! `Violation`s inside a `ValidationResult`.

use thiserror::Error;

/// Descriptor / registry configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Document type not registered
    #[error("Unknown document type '{0}'")]
    UnknownDocumentType(String),

    /// Field type name not supported by the descriptor model
    #[error("Unknown field type '{type_name}'")]
    UnknownFieldType { type_name: String },

    /// Descriptor is structurally invalid or could not be read
    #[error("Malformed schema '{source_name}': {reason}")]
    MalformedSchema { source_name: String, reason: String },

    /// Attempt to replace an already registered document type
    #[error("Schema '{0}' is already registered and immutable")]
    SchemaImmutable(String),

    /// Reference field points at a document type that is not registered
    #[error("Field '{schema}.{field}' references unknown document type '{target}'")]
    UnresolvedReference {
        schema: String,
        field: String,
        target: String,
    },
}

impl SchemaError {
    /// Create a malformed schema error
    pub fn malformed(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        SchemaError::MalformedSchema {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::UnknownDocumentType(_) => "SCHEMA_UNKNOWN_DOCUMENT_TYPE",
            SchemaError::UnknownFieldType { .. } => "SCHEMA_UNKNOWN_FIELD_TYPE",
            SchemaError::MalformedSchema { .. } => "SCHEMA_MALFORMED",
            SchemaError::SchemaImmutable(_) => "SCHEMA_IMMUTABLE",
            SchemaError::UnresolvedReference { .. } => "SCHEMA_UNRESOLVED_REFERENCE",
        }
    }
}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors raised while recomputing derived fields
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DeriveError {
    /// The derivation has no defined value for the current inputs
    #[error("Derived field '{field}' is undefined: {reason}")]
    Undefined { field: String, reason: String },

    /// The derivation produced Infinity or NaN
    #[error("Derived field '{field}' produced a non-finite value")]
    NonFinite { field: String },

    /// Derivation needs an object document
    #[error("Document must be an object, got {0}")]
    NotAnObject(&'static str),
}

impl DeriveError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            DeriveError::Undefined { .. } => "DERIVE_UNDEFINED",
            DeriveError::NonFinite { .. } => "DERIVE_NON_FINITE",
            DeriveError::NotAnObject(_) => "DERIVE_NOT_AN_OBJECT",
        }
    }

    /// Name of the field whose derivation failed, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            DeriveError::Undefined { field, .. } | DeriveError::NonFinite { field } => Some(field),
            DeriveError::NotAnObject(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            SchemaError::UnknownDocumentType("x".into()).code(),
            "SCHEMA_UNKNOWN_DOCUMENT_TYPE"
        );
        assert_eq!(
            SchemaError::UnknownFieldType { type_name: "geo".into() }.code(),
            "SCHEMA_UNKNOWN_FIELD_TYPE"
        );
        assert_eq!(SchemaError::malformed("a", "b").code(), "SCHEMA_MALFORMED");
        assert_eq!(SchemaError::SchemaImmutable("p".into()).code(), "SCHEMA_IMMUTABLE");
    }

    #[test]
    fn test_display_includes_names() {
        let err = SchemaError::UnresolvedReference {
            schema: "product".into(),
            field: "category".into(),
            target: "category".into(),
        };
        let display = err.to_string();
        assert!(display.contains("product.category"));
        assert!(display.contains("unknown document type"));
    }

    #[test]
    fn test_derive_error_field() {
        let err = DeriveError::Undefined {
            field: "priceWithoutDiscount".into(),
            reason: "discount is 100%".into(),
        };
        assert_eq!(err.field(), Some("priceWithoutDiscount"));
        assert_eq!(err.code(), "DERIVE_UNDEFINED");
        assert_eq!(DeriveError::NotAnObject("array").field(), None);
    }
}
