//! Derived field recomputation
//!
//! Derived fields are read-only and never authoritative: the stored value
//! is always replaced by the value computed from current sibling values.

use serde_json::{Map, Number, Value};

use super::errors::DeriveError;
use super::types::{Derivation, Schema};

/// Result of evaluating one derivation against a document
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    /// Derived value
    Value(f64),
    /// Inputs absent or not numeric; the field has no value
    Absent,
    /// Inputs present but the formula has no defined value
    Undefined(String),
    /// Formula result exceeds the f64 range
    NonFinite,
}

impl Derivation {
    /// Evaluates the derivation against the sibling values in `doc`.
    pub fn evaluate(&self, doc: &Map<String, Value>) -> Evaluation {
        match self {
            Derivation::OriginalPrice { price, discount } => {
                let price = match doc.get(price).and_then(Value::as_f64) {
                    Some(p) => p,
                    None => return Evaluation::Absent,
                };
                // A missing discount means no discount.
                let discount = match doc.get(discount) {
                    None | Some(Value::Null) => 0.0,
                    Some(v) => match v.as_f64() {
                        Some(d) => d,
                        None => return Evaluation::Absent,
                    },
                };
                if discount >= 100.0 {
                    return Evaluation::Undefined(format!(
                        "a discount of {}% leaves no original price",
                        discount
                    ));
                }
                let original = price / (1.0 - discount / 100.0);
                if !original.is_finite() {
                    return Evaluation::NonFinite;
                }
                Evaluation::Value(original)
            }
        }
    }
}

/// Returns a copy of `document` with every derived field recomputed.
///
/// # Errors
///
/// - `DeriveError::NotAnObject` if the document is not a JSON object
/// - `DeriveError::Undefined` if a derivation has no defined value
///   (e.g. a 100% discount)
/// - `DeriveError::NonFinite` if a derivation overflows the f64 range
pub fn compute_derived(document: &Value, schema: &Schema) -> Result<Value, DeriveError> {
    let source = document
        .as_object()
        .ok_or_else(|| DeriveError::NotAnObject(json_type_name(document)))?;
    let mut out = source.clone();

    for field in schema.derived_fields() {
        let Some(derivation) = &field.derivation else {
            continue;
        };
        match derivation.evaluate(source) {
            Evaluation::Value(v) => {
                let number = Number::from_f64(v).ok_or_else(|| DeriveError::NonFinite {
                    field: field.name.clone(),
                })?;
                out.insert(field.name.clone(), Value::Number(number));
            }
            Evaluation::NonFinite => {
                return Err(DeriveError::NonFinite {
                    field: field.name.clone(),
                });
            }
            Evaluation::Absent => {
                out.remove(&field.name);
            }
            Evaluation::Undefined(reason) => {
                return Err(DeriveError::Undefined {
                    field: field.name.clone(),
                    reason,
                });
            }
        }
    }

    Ok(Value::Object(out))
}

/// Returns the JSON type name for error messages.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
