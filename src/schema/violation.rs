//! Validation outcomes
//!
//! Validation never fails as control flow: every problem found in a
//! document becomes a `Violation`, and the caller decides whether to block
//! persistence.

use serde::Serialize;
use std::fmt;

/// Kind of document problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationKind {
    /// Required field absent or null
    RequiredFieldMissing,
    /// Value does not match the declared field type
    TypeMismatch,
    /// Number below `min` or above `max`
    OutOfRange,
    /// String or array length outside `min_length`/`max_length`
    LengthViolation,
    /// Number carries more decimal places than allowed
    PrecisionViolation,
    /// Array element outside the closed option list
    InvalidEnumValue,
    /// Derived field has no defined value for the current inputs
    UndefinedDerivation,
    /// Stored derived value differs from the recomputed one
    DerivedValueMismatch,
    /// Key not declared by the schema
    UndeclaredField,
    /// Reference identifier does not resolve to a document
    DanglingReference,
}

impl ViolationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationKind::RequiredFieldMissing => "REQUIRED_FIELD_MISSING",
            ViolationKind::TypeMismatch => "TYPE_MISMATCH",
            ViolationKind::OutOfRange => "OUT_OF_RANGE",
            ViolationKind::LengthViolation => "LENGTH_VIOLATION",
            ViolationKind::PrecisionViolation => "PRECISION_VIOLATION",
            ViolationKind::InvalidEnumValue => "INVALID_ENUM_VALUE",
            ViolationKind::UndefinedDerivation => "UNDEFINED_DERIVATION",
            ViolationKind::DerivedValueMismatch => "DERIVED_VALUE_MISMATCH",
            ViolationKind::UndeclaredField => "UNDECLARED_FIELD",
            ViolationKind::DanglingReference => "DANGLING_REFERENCE",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One problem found in a document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    /// Field name as declared in the schema
    pub field: String,
    /// Location within the document (e.g. "sizes[1]")
    pub path: String,
    pub kind: ViolationKind,
    /// Human-readable message
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, kind: ViolationKind, message: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            path: field.clone(),
            field,
            kind,
            message: message.into(),
        }
    }

    /// Violation on one element of an array field
    pub fn at_index(
        field: impl Into<String>,
        index: usize,
        kind: ViolationKind,
        message: impl Into<String>,
    ) -> Self {
        let field = field.into();
        Self {
            path: format!("{}[{}]", field, index),
            field,
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at '{}': {}", self.kind, self.path, self.message)
    }
}

/// Outcome of validating one document snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "violations", rename_all = "lowercase")]
pub enum ValidationResult {
    Valid,
    Invalid(Vec<Violation>),
}

impl ValidationResult {
    pub fn from_violations(violations: Vec<Violation>) -> Self {
        if violations.is_empty() {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid(violations)
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn violations(&self) -> &[Violation] {
        match self {
            ValidationResult::Valid => &[],
            ValidationResult::Invalid(v) => v,
        }
    }

    /// Violations recorded against `field`
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a Violation> {
        self.violations().iter().filter(move |v| v.field == field)
    }

    /// True when `field` has a violation of `kind`
    pub fn has(&self, field: &str, kind: ViolationKind) -> bool {
        self.for_field(field).any(|v| v.kind == kind)
    }

    /// One message per violated field, in the order fields were first reported
    pub fn messages(&self) -> Vec<(String, String)> {
        let mut out: Vec<(String, String)> = Vec::new();
        for v in self.violations() {
            if !out.iter().any(|(field, _)| field == &v.field) {
                out.push((v.field.clone(), v.message.clone()));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_valid() {
        let result = ValidationResult::from_violations(Vec::new());
        assert!(result.is_valid());
        assert!(result.violations().is_empty());
        assert!(result.messages().is_empty());
    }

    #[test]
    fn test_messages_one_per_field() {
        let result = ValidationResult::from_violations(vec![
            Violation::new("rating", ViolationKind::OutOfRange, "Rating must be between 0 and 5."),
            Violation::new("rating", ViolationKind::PrecisionViolation, "Rating must be between 0 and 5."),
            Violation::at_index("sizes", 1, ViolationKind::InvalidEnumValue, "'XXL' is not allowed"),
        ]);
        assert!(!result.is_valid());
        assert_eq!(result.violations().len(), 3);
        let messages = result.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].0, "rating");
        assert_eq!(messages[1].0, "sizes");
    }

    #[test]
    fn test_at_index_path() {
        let v = Violation::at_index("sizes", 1, ViolationKind::InvalidEnumValue, "bad");
        assert_eq!(v.field, "sizes");
        assert_eq!(v.path, "sizes[1]");
        assert!(v.to_string().contains("INVALID_ENUM_VALUE"));
    }

    #[test]
    fn test_serialized_shape() {
        let result = ValidationResult::from_violations(vec![Violation::new(
            "name",
            ViolationKind::RequiredFieldMissing,
            "required",
        )]);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "invalid");
        assert_eq!(json["violations"][0]["kind"], "REQUIRED_FIELD_MISSING");

        let json = serde_json::to_value(ValidationResult::Valid).unwrap();
        assert_eq!(json["status"], "valid");
    }
}
