//! Registry File Tests
//!
//! Descriptors exported to disk load back unchanged, and loaded
//! descriptors validate documents like the built-ins do.

use product_schema::schema::{
    FieldDef, FieldType, Rule, Schema, SchemaRegistry, SchemaValidator, ViolationKind,
};
use serde_json::json;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_builtins_round_trip_through_files() {
    let tmp = TempDir::new().unwrap();
    let builtin = SchemaRegistry::builtin().unwrap();
    for schema in builtin.all_schemas() {
        SchemaRegistry::save_schema(tmp.path(), schema).unwrap();
    }

    let mut loaded = SchemaRegistry::new();
    assert_eq!(loaded.load_dir(tmp.path()).unwrap(), 2);
    for schema in builtin.all_schemas() {
        assert_eq!(loaded.get_schema(&schema.name).unwrap(), schema);
    }
}

#[test]
fn test_loaded_schema_validates() {
    let tmp = TempDir::new().unwrap();
    let review = Schema::new(
        "review",
        "Review",
        vec![
            FieldDef::new("body", FieldType::Text)
                .required()
                .rule(Rule::MinLength(10))
                .error("Reviews need at least 10 characters."),
            FieldDef::new("stars", FieldType::Number)
                .rule(Rule::Min(1.0))
                .rule(Rule::Max(5.0))
                .rule(Rule::Precision(0)),
            FieldDef::new("product", FieldType::Reference).to("product"),
        ],
    );
    SchemaRegistry::save_schema(tmp.path(), &review).unwrap();

    let mut registry = SchemaRegistry::builtin().unwrap();
    registry.load_dir(tmp.path()).unwrap();
    let validator = SchemaValidator::new(&registry);

    let ok = json!({ "body": "Fits perfectly.", "stars": 4, "product": { "_ref": "p1" } });
    assert!(validator.validate_document("review", &ok).unwrap().is_valid());

    let bad = json!({ "body": "Meh", "stars": 4.5 });
    let result = validator.validate_document("review", &bad).unwrap();
    assert!(result.has("body", ViolationKind::LengthViolation));
    assert!(result.has("stars", ViolationKind::PrecisionViolation));
    assert_eq!(result.messages()[0].1, "Reviews need at least 10 characters.");
}

#[test]
fn test_reference_to_unknown_type_rejected() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("schema_review.json"),
        r#"{"name":"review","fields":[{"name":"author","type":"reference","to":["user"]}]}"#,
    )
    .unwrap();

    let mut registry = SchemaRegistry::builtin().unwrap();
    let err = registry.load_dir(tmp.path()).unwrap_err();
    assert_eq!(err.code(), "SCHEMA_UNRESOLVED_REFERENCE");
}

#[test]
fn test_malformed_descriptor_rejected() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("schema_bad.json"), "{ not json").unwrap();
    let mut registry = SchemaRegistry::new();
    let err = registry.load_dir(tmp.path()).unwrap_err();
    assert_eq!(err.code(), "SCHEMA_MALFORMED");
}
