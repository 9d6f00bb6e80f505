//! Product content schema
//!
//! A document type is a named, ordered list of field definitions with
//! declarative validation rules. This module interprets those descriptors:
//!
//! - `validate` checks a document snapshot and reports every violation
//! - `compute_derived` recomputes read-only derived fields
//! - `SchemaRegistry` holds the known document types (`product`, `category`)
//!
//! # Design Principles
//!
//! - Descriptors are data; they serialize to and from JSON
//! - Validation is pure and never stops at the first problem
//! - Derived values are recomputed, never trusted
//! - Descriptor misuse is an error; document problems are violations

mod derive;
mod errors;
pub mod product;
mod registry;
mod rules;
mod types;
mod validator;
mod violation;

pub use derive::{compute_derived, Evaluation};
pub use errors::{DeriveError, SchemaError, SchemaResult};
pub use registry::SchemaRegistry;
pub use rules::{round_half_up, within_precision, Rule};
pub use types::{Derivation, FieldDef, FieldOptions, FieldType, OptionItem, Schema};
pub use validator::{validate, ReferenceResolver, SchemaValidator, ValidationOptions};
pub use violation::{ValidationResult, Violation, ViolationKind};
