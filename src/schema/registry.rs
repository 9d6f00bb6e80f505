//! Schema registry
//!
//! Holds the descriptors of every known document type, keyed by name.
//! Registered descriptors are immutable. Descriptors can also be loaded
//! from, and exported to, `schema_<name>.json` files.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::observability::{log_event_with_fields, Event};

use super::errors::{SchemaError, SchemaResult};
use super::product::{category_schema, product_schema};
use super::types::{FieldType, Schema};

/// In-memory registry of document type descriptors.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: BTreeMap<String, Schema>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in `category` and `product` types.
    pub fn builtin() -> SchemaResult<Self> {
        let mut registry = Self::new();
        registry.register(category_schema())?;
        registry.register(product_schema())?;
        registry.check_references()?;
        Ok(registry)
    }

    /// Registers a descriptor after checking its structure.
    ///
    /// # Errors
    ///
    /// - `MalformedSchema` if the descriptor is structurally invalid
    /// - `SchemaImmutable` if the name is already registered
    pub fn register(&mut self, schema: Schema) -> SchemaResult<()> {
        Self::check_structure(&schema)?;
        if self.schemas.contains_key(&schema.name) {
            return Err(SchemaError::SchemaImmutable(schema.name));
        }
        self.insert(schema);
        Ok(())
    }

    fn check_structure(schema: &Schema) -> SchemaResult<()> {
        schema
            .validate_structure()
            .map_err(|e| SchemaError::malformed(schema.name.clone(), e))
    }

    fn insert(&mut self, schema: Schema) {
        let field_count = schema.fields.len().to_string();
        log_event_with_fields(
            Event::SchemaRegistered,
            &[("schema", schema.name.as_str()), ("fields", field_count.as_str())],
        );
        self.schemas.insert(schema.name.clone(), schema);
    }

    /// Returns the descriptor of `document_type`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownDocumentType` if the type is not registered.
    pub fn get_schema(&self, document_type: &str) -> SchemaResult<&Schema> {
        self.get(document_type)
            .ok_or_else(|| SchemaError::UnknownDocumentType(document_type.to_string()))
    }

    /// Gets a descriptor by name.
    pub fn get(&self, document_type: &str) -> Option<&Schema> {
        self.schemas.get(document_type)
    }

    /// Checks if a document type is registered.
    pub fn exists(&self, document_type: &str) -> bool {
        self.schemas.contains_key(document_type)
    }

    /// Registered type names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    /// Returns all registered descriptors.
    pub fn all_schemas(&self) -> impl Iterator<Item = &Schema> {
        self.schemas.values()
    }

    /// Returns the number of registered descriptors.
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }

    /// Verifies that every reference field targets a registered type.
    pub fn check_references(&self) -> SchemaResult<()> {
        for schema in self.schemas.values() {
            check_targets(schema, |t| self.exists(t))?;
        }
        Ok(())
    }

    /// Loads every `*.json` descriptor in `dir`.
    ///
    /// All files are parsed and checked before any is registered, so on
    /// error the registry is left unchanged. A file identical to an
    /// already registered descriptor is skipped.
    ///
    /// Returns the number of descriptors added.
    pub fn load_dir(&mut self, dir: &Path) -> SchemaResult<usize> {
        let entries = fs::read_dir(dir).map_err(|e| {
            SchemaError::malformed(
                dir.display().to_string(),
                format!("Failed to read schema directory: {}", e),
            )
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                SchemaError::malformed(
                    dir.display().to_string(),
                    format!("Failed to read directory entry: {}", e),
                )
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        // Directory order is platform dependent.
        paths.sort();

        let mut staged: BTreeMap<String, Schema> = BTreeMap::new();
        for path in &paths {
            let schema = Self::read_schema_file(path)?;
            Self::check_structure(&schema)?;
            if self.get(&schema.name) == Some(&schema) {
                continue;
            }
            if self.exists(&schema.name) || staged.contains_key(&schema.name) {
                return Err(SchemaError::SchemaImmutable(schema.name));
            }
            staged.insert(schema.name.clone(), schema);
        }
        for schema in staged.values() {
            check_targets(schema, |t| self.exists(t) || staged.contains_key(t))?;
        }

        let count = staged.len();
        for schema in staged.into_values() {
            self.insert(schema);
        }

        let dir_display = dir.display().to_string();
        let count_display = count.to_string();
        log_event_with_fields(
            Event::SchemasLoaded,
            &[("dir", dir_display.as_str()), ("count", count_display.as_str())],
        );
        Ok(count)
    }

    /// Reads and parses a single descriptor file.
    fn read_schema_file(path: &Path) -> SchemaResult<Schema> {
        let content = fs::read_to_string(path).map_err(|e| {
            SchemaError::malformed(path.display().to_string(), format!("Failed to read file: {}", e))
        })?;
        Schema::from_json(&path.display().to_string(), &content)
    }

    /// Writes `schema` to `<dir>/schema_<name>.json`.
    ///
    /// Refuses to overwrite an existing file.
    pub fn save_schema(dir: &Path, schema: &Schema) -> SchemaResult<PathBuf> {
        let path = dir.join(format!("schema_{}.json", schema.name));

        if path.exists() {
            return Err(SchemaError::SchemaImmutable(schema.name.clone()));
        }

        fs::create_dir_all(dir).map_err(|e| {
            SchemaError::malformed(
                dir.display().to_string(),
                format!("Failed to create schema directory: {}", e),
            )
        })?;

        let content = serde_json::to_string_pretty(schema).map_err(|e| {
            SchemaError::malformed(path.display().to_string(), format!("Failed to serialize schema: {}", e))
        })?;

        fs::write(&path, content).map_err(|e| {
            SchemaError::malformed(path.display().to_string(), format!("Failed to write file: {}", e))
        })?;

        Ok(path)
    }
}

/// Fails on the first reference target of `schema` that `exists` rejects.
fn check_targets(schema: &Schema, exists: impl Fn(&str) -> bool) -> SchemaResult<()> {
    for field in schema.fields.iter().filter(|f| f.field_type == FieldType::Reference) {
        if let Some(target) = field.to.iter().find(|t| !exists(t.as_str())) {
            return Err(SchemaError::UnresolvedReference {
                schema: schema.name.clone(),
                field: field.name.clone(),
                target: target.clone(),
            });
        }
    }
    Ok(())
}
