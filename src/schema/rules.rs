//! Validation rules attached to field definitions
//!
//! A field carries a tagged list of rules. Declaration order does not
//! matter: rules are always evaluated min → max → length → precision,
//! with option membership checked last by the validator.

use serde::{Deserialize, Serialize};

use super::types::FieldType;

/// A single declarative constraint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", content = "value", rename_all = "snake_case")]
pub enum Rule {
    /// Numeric lower bound (inclusive)
    Min(f64),
    /// Numeric upper bound (inclusive)
    Max(f64),
    /// Minimum length in characters (strings) or elements (arrays)
    MinLength(usize),
    /// Maximum length in characters (strings) or elements (arrays)
    MaxLength(usize),
    /// Maximum number of decimal places
    Precision(u32),
}

impl Rule {
    /// Evaluation rank; lower ranks run first
    pub fn rank(&self) -> u8 {
        match self {
            Rule::Min(_) => 0,
            Rule::Max(_) => 1,
            Rule::MinLength(_) | Rule::MaxLength(_) => 2,
            Rule::Precision(_) => 3,
        }
    }

    /// Rule name as written in descriptors
    pub fn name(&self) -> &'static str {
        match self {
            Rule::Min(_) => "min",
            Rule::Max(_) => "max",
            Rule::MinLength(_) => "min_length",
            Rule::MaxLength(_) => "max_length",
            Rule::Precision(_) => "precision",
        }
    }

    /// Whether this rule can be declared on a field of the given type
    pub fn applies_to(&self, field_type: FieldType) -> bool {
        match self {
            Rule::Min(_) | Rule::Max(_) | Rule::Precision(_) => field_type == FieldType::Number,
            Rule::MinLength(_) | Rule::MaxLength(_) => field_type.has_length(),
        }
    }
}

/// Returns `rules` ordered by evaluation rank, keeping declaration order
/// within a rank.
pub fn ordered(rules: &[Rule]) -> Vec<&Rule> {
    let mut sorted: Vec<&Rule> = rules.iter().collect();
    sorted.sort_by_key(|r| r.rank());
    sorted
}

/// Rounds to `places` decimal places, halves away from zero.
pub fn round_half_up(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    value.signum() * ((value.abs() * factor) + 0.5).floor() / factor
}

/// True when `value` carries no more than `places` decimal places.
pub fn within_precision(value: f64, places: u32) -> bool {
    let rounded = round_half_up(value, places);
    (rounded - value).abs() <= 1e-9 * value.abs().max(1.0)
}
