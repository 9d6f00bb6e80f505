//! Document validation against a schema descriptor
//!
//! Per field, in descriptor order:
//! 1. required presence (absent or null)
//! 2. type conformance
//! 3. rules: min → max → length → precision
//! 4. option membership for array elements
//!
//! Every violation is collected; nothing stops at the first problem.
//! Derived fields are then checked against their recomputed value, and
//! undeclared keys are reported. Keys starting with `_` are CMS system
//! metadata and are ignored.

use serde_json::{Map, Value};

use super::derive::{json_type_name, Evaluation};
use super::errors::SchemaResult;
use super::registry::SchemaRegistry;
use super::rules::{ordered, within_precision, Rule};
use super::types::{FieldDef, FieldType, Schema};
use super::violation::{ValidationResult, Violation, ViolationKind};

/// Looks up referenced documents held by an external store.
pub trait ReferenceResolver {
    /// True when a document with `id` exists under one of `target_types`.
    fn resolves(&self, target_types: &[String], id: &str) -> bool;
}

/// Knobs for a validation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Report keys the schema does not declare
    pub reject_undeclared_fields: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            reject_undeclared_fields: true,
        }
    }
}

/// Validates `document` against `schema` with default options.
pub fn validate(document: &Value, schema: &Schema) -> ValidationResult {
    Pass {
        schema,
        options: ValidationOptions::default(),
        resolver: None,
        violations: Vec::new(),
    }
    .run(document)
}

/// Validator bound to a registry of document types.
///
/// Validation is pure: documents are never mutated and the same input
/// always yields the same result.
pub struct SchemaValidator<'a> {
    registry: &'a SchemaRegistry,
    options: ValidationOptions,
    resolver: Option<&'a dyn ReferenceResolver>,
}

impl<'a> SchemaValidator<'a> {
    /// Creates a new validator backed by the given registry.
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self {
            registry,
            options: ValidationOptions::default(),
            resolver: None,
        }
    }

    pub fn with_options(mut self, options: ValidationOptions) -> Self {
        self.options = options;
        self
    }

    /// Checks reference identifiers against an external store.
    pub fn with_resolver(mut self, resolver: &'a dyn ReferenceResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Validates a document of the named type.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::UnknownDocumentType` if the type is not
    /// registered. Document problems are reported in the result, never as
    /// errors.
    pub fn validate_document(&self, document_type: &str, document: &Value) -> SchemaResult<ValidationResult> {
        let schema = self.registry.get_schema(document_type)?;
        Ok(self.validate_with(schema, document))
    }

    /// Validates a document against an explicit schema.
    pub fn validate_with(&self, schema: &Schema, document: &Value) -> ValidationResult {
        Pass {
            schema,
            options: self.options,
            resolver: self.resolver,
            violations: Vec::new(),
        }
        .run(document)
    }
}

/// State of a single validation pass
struct Pass<'a> {
    schema: &'a Schema,
    options: ValidationOptions,
    resolver: Option<&'a dyn ReferenceResolver>,
    violations: Vec<Violation>,
}

/// Measured facts about a type-conforming value
struct Checked {
    number: Option<f64>,
    length: Option<usize>,
}

impl<'a> Pass<'a> {
    fn run(mut self, document: &Value) -> ValidationResult {
        let Some(doc) = document.as_object() else {
            self.violations.push(Violation::new(
                "$root",
                ViolationKind::TypeMismatch,
                format!("expected object, got {}", json_type_name(document)),
            ));
            return ValidationResult::from_violations(self.violations);
        };

        let schema = self.schema;
        for field in &schema.fields {
            self.check_field(field, doc.get(&field.name));
        }
        self.check_derived(doc);
        if self.options.reject_undeclared_fields {
            self.check_undeclared(doc);
        }

        ValidationResult::from_violations(self.violations)
    }

    fn check_field(&mut self, field: &FieldDef, value: Option<&Value>) {
        let value = match value {
            None | Some(Value::Null) => {
                if field.required {
                    let label = label(field);
                    self.push(
                        field,
                        ViolationKind::RequiredFieldMissing,
                        field.message_or(|| format!("{} is required", label)),
                    );
                }
                return;
            }
            Some(v) => v,
        };

        let Some(checked) = self.check_type(field, value) else {
            return;
        };

        for rule in ordered(&field.rules) {
            self.check_rule(field, rule, &checked);
        }

        if field.field_type == FieldType::Array && !field.options.list.is_empty() {
            self.check_options(field, value);
        }
    }

    /// Type conformance. Returns `None` when the value does not conform.
    fn check_type(&mut self, field: &FieldDef, value: &Value) -> Option<Checked> {
        let conforms = match field.field_type {
            FieldType::String | FieldType::Text => value.as_str().map(|s| Checked {
                number: None,
                length: Some(s.chars().count()),
            }),
            FieldType::Slug => value
                .get("current")
                .and_then(Value::as_str)
                .map(|s| Checked {
                    number: None,
                    length: Some(s.chars().count()),
                }),
            FieldType::Number => value.as_f64().map(|n| Checked {
                number: Some(n),
                length: None,
            }),
            FieldType::Array => value.as_array().map(|items| {
                for (i, item) in items.iter().enumerate() {
                    if !item.is_string() {
                        self.violations.push(Violation::at_index(
                            &field.name,
                            i,
                            ViolationKind::TypeMismatch,
                            format!("expected string, got {}", json_type_name(item)),
                        ));
                    }
                }
                Checked {
                    number: None,
                    length: Some(items.len()),
                }
            }),
            FieldType::Image => value
                .get("asset")
                .and_then(|asset| asset.get("_ref"))
                .and_then(Value::as_str)
                .map(|_| Checked {
                    number: None,
                    length: None,
                }),
            FieldType::Reference => return self.check_reference(field, value),
        };

        if conforms.is_none() {
            self.push(
                field,
                ViolationKind::TypeMismatch,
                format!(
                    "expected {}, got {}",
                    expected_shape(field.field_type),
                    json_type_name(value)
                ),
            );
        }
        conforms
    }

    fn check_reference(&mut self, field: &FieldDef, value: &Value) -> Option<Checked> {
        let Some(id) = value.get("_ref").and_then(Value::as_str) else {
            self.push(
                field,
                ViolationKind::TypeMismatch,
                format!(
                    "expected {}, got {}",
                    expected_shape(FieldType::Reference),
                    json_type_name(value)
                ),
            );
            return None;
        };

        if let Some(tag) = value.get("_refType").and_then(Value::as_str) {
            if !field.to.iter().any(|t| t == tag) {
                self.push(
                    field,
                    ViolationKind::TypeMismatch,
                    format!("reference to '{}' where {} is expected", tag, field.to.join(" or ")),
                );
                return None;
            }
        }

        if let Some(resolver) = self.resolver {
            if !resolver.resolves(&field.to, id) {
                self.push(
                    field,
                    ViolationKind::DanglingReference,
                    format!("no {} document with id '{}'", field.to.join(" or "), id),
                );
            }
        }

        Some(Checked {
            number: None,
            length: None,
        })
    }

    fn check_rule(&mut self, field: &FieldDef, rule: &Rule, checked: &Checked) {
        let failure = match (rule, checked.number, checked.length) {
            (Rule::Min(min), Some(n), _) if n < *min => {
                Some((ViolationKind::OutOfRange, format!("must be at least {}", min)))
            }
            (Rule::Max(max), Some(n), _) if n > *max => {
                Some((ViolationKind::OutOfRange, format!("must be at most {}", max)))
            }
            (Rule::MinLength(min), _, Some(len)) if len < *min => Some((
                ViolationKind::LengthViolation,
                format!("length {} is below the minimum of {}", len, min),
            )),
            (Rule::MaxLength(max), _, Some(len)) if len > *max => Some((
                ViolationKind::LengthViolation,
                format!("length {} exceeds the maximum of {}", len, max),
            )),
            (Rule::Precision(places), Some(n), _) if !within_precision(n, *places) => Some((
                ViolationKind::PrecisionViolation,
                format!("allows at most {} decimal place(s)", places),
            )),
            _ => None,
        };

        if let Some((kind, fallback)) = failure {
            let label = label(field);
            let message = field.message_or(|| format!("{} {}", label, fallback));
            self.push(field, kind, message);
        }
    }

    fn check_options(&mut self, field: &FieldDef, value: &Value) {
        let Some(items) = value.as_array() else {
            return;
        };
        for (i, item) in items.iter().enumerate() {
            let Some(s) = item.as_str() else {
                continue;
            };
            if !field.options.allows(s) {
                let allowed: Vec<&str> = field.options.list.iter().map(|o| o.value.as_str()).collect();
                let message = field.message_or(|| {
                    format!("'{}' is not one of the allowed values: {}", s, allowed.join(", "))
                });
                self.violations
                    .push(Violation::at_index(&field.name, i, ViolationKind::InvalidEnumValue, message));
            }
        }
    }

    fn check_derived(&mut self, doc: &Map<String, Value>) {
        let schema = self.schema;
        for field in schema.derived_fields() {
            let Some(derivation) = &field.derivation else {
                continue;
            };
            let stored = doc.get(&field.name).filter(|v| !v.is_null());

            match derivation.evaluate(doc) {
                Evaluation::Undefined(reason) => {
                    self.push(field, ViolationKind::UndefinedDerivation, reason);
                }
                Evaluation::NonFinite => {
                    self.push(
                        field,
                        ViolationKind::UndefinedDerivation,
                        "derived value exceeds the numeric range".to_string(),
                    );
                }
                Evaluation::Value(expected) => {
                    if let Some(actual) = stored.and_then(Value::as_f64) {
                        if (actual - expected).abs() > 1e-9 * expected.abs().max(1.0) {
                            self.push(
                                field,
                                ViolationKind::DerivedValueMismatch,
                                format!("stored {} but inputs give {}", actual, expected),
                            );
                        }
                    }
                }
                Evaluation::Absent => {
                    if stored.is_some() {
                        let inputs = derivation.inputs().join(", ");
                        self.push(
                            field,
                            ViolationKind::DerivedValueMismatch,
                            format!("read-only value set without its inputs ({})", inputs),
                        );
                    }
                }
            }
        }
    }

    fn check_undeclared(&mut self, doc: &Map<String, Value>) {
        let schema = self.schema;
        for key in doc.keys() {
            if key.starts_with('_') || schema.field(key).is_some() {
                continue;
            }
            self.violations.push(Violation::new(
                key.as_str(),
                ViolationKind::UndeclaredField,
                format!("'{}' is not declared by '{}'", key, schema.name),
            ));
        }
    }

    fn push(&mut self, field: &FieldDef, kind: ViolationKind, message: String) {
        self.violations.push(Violation::new(&field.name, kind, message));
    }
}

fn label(field: &FieldDef) -> &str {
    if field.title.is_empty() {
        &field.name
    } else {
        &field.title
    }
}

fn expected_shape(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::String | FieldType::Text => "string",
        FieldType::Slug => "slug object with 'current'",
        FieldType::Number => "number",
        FieldType::Array => "array of strings",
        FieldType::Image => "image object with 'asset._ref'",
        FieldType::Reference => "reference object with '_ref'",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::product::product_schema;
    use serde_json::json;
    use std::collections::HashSet;

    fn valid_product() -> Value {
        json!({
            "_id": "product-1",
            "_type": "product",
            "name": "Shirt",
            "slug": { "current": "shirt" },
            "description": "A comfortable cotton shirt for everyday wear.",
            "price": 100,
            "discountPercentage": 20,
            "rating": 4.5,
            "sizes": ["S", "M"],
            "image": { "asset": { "_ref": "image-abc-200x200-png" } }
        })
    }

    #[test]
    fn test_valid_document_passes() {
        let result = validate(&valid_product(), &product_schema());
        assert!(result.is_valid(), "{:?}", result);
    }

    #[test]
    fn test_missing_name_reported() {
        let mut doc = valid_product();
        doc.as_object_mut().unwrap().remove("name");
        let result = validate(&doc, &product_schema());
        assert!(result.has("name", ViolationKind::RequiredFieldMissing));
        assert_eq!(
            result.for_field("name").next().unwrap().message,
            "Product name is required and cannot exceed 100 characters."
        );
    }

    #[test]
    fn test_null_counts_as_missing() {
        let mut doc = valid_product();
        doc["image"] = Value::Null;
        let result = validate(&doc, &product_schema());
        assert!(result.has("image", ViolationKind::RequiredFieldMissing));
    }

    #[test]
    fn test_all_violations_collected() {
        let doc = json!({
            "price": -1,
            "rating": 5.7,
            "sizes": ["S", "XXL"]
        });
        let result = validate(&doc, &product_schema());
        assert!(result.has("name", ViolationKind::RequiredFieldMissing));
        assert!(result.has("slug", ViolationKind::RequiredFieldMissing));
        assert!(result.has("description", ViolationKind::RequiredFieldMissing));
        assert!(result.has("image", ViolationKind::RequiredFieldMissing));
        assert!(result.has("price", ViolationKind::OutOfRange));
        assert!(result.has("rating", ViolationKind::OutOfRange));
        assert!(result.has("sizes", ViolationKind::InvalidEnumValue));
    }

    #[test]
    fn test_rating_above_max() {
        let mut doc = valid_product();
        doc["rating"] = json!(5.7);
        let result = validate(&doc, &product_schema());
        assert!(result.has("rating", ViolationKind::OutOfRange));
        assert!(!result.has("rating", ViolationKind::PrecisionViolation));
    }

    #[test]
    fn test_rating_precision() {
        let mut doc = valid_product();
        doc["rating"] = json!(4.25);
        let result = validate(&doc, &product_schema());
        assert!(result.has("rating", ViolationKind::PrecisionViolation));
        assert!(!result.has("rating", ViolationKind::OutOfRange));
    }

    #[test]
    fn test_rule_order_min_before_precision() {
        let mut doc = valid_product();
        doc["rating"] = json!(-0.25);
        let result = validate(&doc, &product_schema());
        let kinds: Vec<_> = result.for_field("rating").map(|v| v.kind).collect();
        assert_eq!(
            kinds,
            vec![ViolationKind::OutOfRange, ViolationKind::PrecisionViolation]
        );
    }

    #[test]
    fn test_invalid_size_reported_per_element() {
        let mut doc = valid_product();
        doc["sizes"] = json!(["S", "XXL"]);
        let result = validate(&doc, &product_schema());
        let sizes: Vec<_> = result.for_field("sizes").collect();
        assert_eq!(sizes.len(), 1);
        assert_eq!(sizes[0].kind, ViolationKind::InvalidEnumValue);
        assert_eq!(sizes[0].path, "sizes[1]");
        assert!(sizes[0].message.contains("XXL"));
    }

    #[test]
    fn test_tags_are_free_form() {
        let mut doc = valid_product();
        doc["tags"] = json!(["summer", "anything goes"]);
        assert!(validate(&doc, &product_schema()).is_valid());
    }

    #[test]
    fn test_array_element_type() {
        let mut doc = valid_product();
        doc["colors"] = json!(["#ff0000", 7]);
        let result = validate(&doc, &product_schema());
        let v: Vec<_> = result.for_field("colors").collect();
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].kind, ViolationKind::TypeMismatch);
        assert_eq!(v[0].path, "colors[1]");
    }

    #[test]
    fn test_type_mismatch_skips_rules() {
        let mut doc = valid_product();
        doc["price"] = json!("100");
        let result = validate(&doc, &product_schema());
        let kinds: Vec<_> = result.for_field("price").map(|v| v.kind).collect();
        assert_eq!(kinds, vec![ViolationKind::TypeMismatch]);
    }

    #[test]
    fn test_description_length() {
        let mut doc = valid_product();
        doc["description"] = json!("too short");
        let result = validate(&doc, &product_schema());
        assert!(result.has("description", ViolationKind::LengthViolation));

        doc["description"] = json!("x".repeat(501));
        let result = validate(&doc, &product_schema());
        assert!(result.has("description", ViolationKind::LengthViolation));
    }

    #[test]
    fn test_name_length_counts_characters() {
        let mut doc = valid_product();
        doc["name"] = json!("é".repeat(100));
        assert!(validate(&doc, &product_schema()).is_valid());
        doc["name"] = json!("é".repeat(101));
        assert!(validate(&doc, &product_schema()).has("name", ViolationKind::LengthViolation));
    }

    #[test]
    fn test_slug_shape() {
        let mut doc = valid_product();
        doc["slug"] = json!("shirt");
        let result = validate(&doc, &product_schema());
        assert!(result.has("slug", ViolationKind::TypeMismatch));
    }

    #[test]
    fn test_full_discount_flagged() {
        let mut doc = valid_product();
        doc["discountPercentage"] = json!(100);
        let result = validate(&doc, &product_schema());
        assert!(result.has("priceWithoutDiscount", ViolationKind::UndefinedDerivation));
        assert!(!result.has("discountPercentage", ViolationKind::OutOfRange));
    }

    #[test]
    fn test_overflowing_derivation_flagged() {
        let mut doc = valid_product();
        doc["price"] = json!(1e308);
        doc["discountPercentage"] = json!(50);
        let result = validate(&doc, &product_schema());
        assert!(result.has("priceWithoutDiscount", ViolationKind::UndefinedDerivation));

        doc["discountPercentage"] = json!(0);
        assert!(validate(&doc, &product_schema()).is_valid());
    }

    #[test]
    fn test_stale_derived_value_flagged() {
        let mut doc = valid_product();
        doc["priceWithoutDiscount"] = json!(110);
        let result = validate(&doc, &product_schema());
        assert!(result.has("priceWithoutDiscount", ViolationKind::DerivedValueMismatch));

        doc["priceWithoutDiscount"] = json!(125);
        assert!(validate(&doc, &product_schema()).is_valid());
    }

    #[test]
    fn test_undeclared_field() {
        let mut doc = valid_product();
        doc["weight"] = json!(3);
        let result = validate(&doc, &product_schema());
        assert!(result.has("weight", ViolationKind::UndeclaredField));

        let registry = SchemaRegistry::builtin().unwrap();
        let lenient = SchemaValidator::new(&registry).with_options(ValidationOptions {
            reject_undeclared_fields: false,
        });
        assert!(lenient.validate_document("product", &doc).unwrap().is_valid());
    }

    #[test]
    fn test_root_must_be_object() {
        let result = validate(&json!("product"), &product_schema());
        assert!(result.has("$root", ViolationKind::TypeMismatch));
    }

    #[test]
    fn test_reference_type_tag() {
        let mut doc = valid_product();
        doc["category"] = json!({ "_ref": "cat-1", "_refType": "category" });
        assert!(validate(&doc, &product_schema()).is_valid());

        doc["category"] = json!({ "_ref": "p-2", "_refType": "product" });
        let result = validate(&doc, &product_schema());
        assert!(result.has("category", ViolationKind::TypeMismatch));

        doc["category"] = json!("cat-1");
        let result = validate(&doc, &product_schema());
        assert!(result.has("category", ViolationKind::TypeMismatch));
    }

    struct KnownIds(HashSet<&'static str>);

    impl ReferenceResolver for KnownIds {
        fn resolves(&self, target_types: &[String], id: &str) -> bool {
            target_types.iter().any(|t| t == "category") && self.0.contains(id)
        }
    }

    #[test]
    fn test_dangling_reference() {
        let registry = SchemaRegistry::builtin().unwrap();
        let known = KnownIds(["cat-1"].into_iter().collect());
        let validator = SchemaValidator::new(&registry).with_resolver(&known);

        let mut doc = valid_product();
        doc["category"] = json!({ "_ref": "cat-1" });
        assert!(validator.validate_document("product", &doc).unwrap().is_valid());

        doc["category"] = json!({ "_ref": "cat-404" });
        let result = validator.validate_document("product", &doc).unwrap();
        assert!(result.has("category", ViolationKind::DanglingReference));
    }

    #[test]
    fn test_unknown_document_type() {
        let registry = SchemaRegistry::builtin().unwrap();
        let validator = SchemaValidator::new(&registry);
        let err = validator.validate_document("order", &valid_product()).unwrap_err();
        assert_eq!(err.code(), "SCHEMA_UNKNOWN_DOCUMENT_TYPE");
    }
}
