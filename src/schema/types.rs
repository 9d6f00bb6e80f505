//! Schema descriptor types
//!
//! Supported field types:
//! - string: single-line UTF-8 string
//! - text: multi-line UTF-8 string
//! - slug: object with a `current` string
//! - number: JSON number (64-bit float)
//! - array: array of strings
//! - image: object with an `asset` reference
//! - reference: object with a `_ref` identifier pointing at another document type

use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use super::errors::{SchemaError, SchemaResult};
use super::rules::Rule;

/// Value type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum FieldType {
    String,
    Text,
    Slug,
    Number,
    Array,
    Image,
    Reference,
}

impl FieldType {
    /// Returns the type name used in descriptors and error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Text => "text",
            FieldType::Slug => "slug",
            FieldType::Number => "number",
            FieldType::Array => "array",
            FieldType::Image => "image",
            FieldType::Reference => "reference",
        }
    }

    /// Whether length rules make sense for this type
    pub fn has_length(&self) -> bool {
        matches!(
            self,
            FieldType::String | FieldType::Text | FieldType::Slug | FieldType::Array
        )
    }
}

impl FromStr for FieldType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(FieldType::String),
            "text" => Ok(FieldType::Text),
            "slug" => Ok(FieldType::Slug),
            "number" => Ok(FieldType::Number),
            "array" => Ok(FieldType::Array),
            "image" => Ok(FieldType::Image),
            "reference" => Ok(FieldType::Reference),
            other => Err(SchemaError::UnknownFieldType {
                type_name: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for FieldType {
    type Error = SchemaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Serialize for FieldType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.type_name())
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// One entry of a closed option list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionItem {
    pub title: String,
    pub value: String,
}

impl OptionItem {
    pub fn new(title: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
        }
    }
}

/// Field options. `list` is enforced; the rest is editor presentation data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOptions {
    /// Closed set of allowed array elements
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub list: Vec<OptionItem>,
    /// Editor layout hint (e.g. "tags")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
    /// Image hotspot selection enabled
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hotspot: bool,
    /// Sibling field a slug is generated from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl FieldOptions {
    pub fn is_empty(&self) -> bool {
        self == &FieldOptions::default()
    }

    /// True when `value` is one of the listed option values
    pub fn allows(&self, value: &str) -> bool {
        self.list.iter().any(|o| o.value == value)
    }
}

/// Pure computation of a field from its siblings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Derivation {
    /// `price / (1 - discount / 100)`
    OriginalPrice { price: String, discount: String },
}

impl Derivation {
    /// Sibling fields this derivation reads
    pub fn inputs(&self) -> Vec<&str> {
        match self {
            Derivation::OriginalPrice { price, discount } => vec![price.as_str(), discount.as_str()],
        }
    }
}

/// Field definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<Rule>,
    /// Custom message reported for every required/rule violation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "FieldOptions::is_empty")]
    pub options: FieldOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derivation: Option<Derivation>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub read_only: bool,
    /// Target document types of a reference field
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub to: Vec<String>,
}

impl FieldDef {
    /// Create an optional field of the given type
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            title: String::new(),
            description: None,
            required: false,
            rules: Vec::new(),
            error: None,
            options: FieldOptions::default(),
            derivation: None,
            read_only: false,
            to: Vec::new(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self
    }

    pub fn options(mut self, options: FieldOptions) -> Self {
        self.options = options;
        self
    }

    /// Restrict array elements to the given `(title, value)` pairs
    pub fn list(mut self, items: &[(&str, &str)]) -> Self {
        self.options.list = items.iter().map(|(t, v)| OptionItem::new(*t, *v)).collect();
        self
    }

    /// Attach a derivation; derived fields are always read-only
    pub fn derived(mut self, derivation: Derivation) -> Self {
        self.derivation = Some(derivation);
        self.read_only = true;
        self
    }

    pub fn to(mut self, target: impl Into<String>) -> Self {
        self.to.push(target.into());
        self
    }

    /// Message for a violation: the declared error text, or the fallback
    pub fn message_or(&self, fallback: impl FnOnce() -> String) -> String {
        self.error.clone().unwrap_or_else(fallback)
    }

    /// Checks that this field's rules, options and derivation fit its type.
    fn check(&self, fields: &[FieldDef]) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("field name must not be empty".into());
        }
        if self.name.starts_with('_') {
            return Err(format!("field '{}': names starting with '_' are reserved", self.name));
        }

        for rule in &self.rules {
            if !rule.applies_to(self.field_type) {
                return Err(format!(
                    "field '{}': rule '{}' does not apply to type '{}'",
                    self.name,
                    rule.name(),
                    self.field_type
                ));
            }
        }

        if !self.options.list.is_empty() && self.field_type != FieldType::Array {
            return Err(format!(
                "field '{}': option lists are only supported on arrays",
                self.name
            ));
        }

        if self.field_type == FieldType::Reference && self.to.is_empty() {
            return Err(format!("field '{}': reference must declare a target type", self.name));
        }
        if self.field_type != FieldType::Reference && !self.to.is_empty() {
            return Err(format!("field '{}': only references may declare targets", self.name));
        }

        if let Some(derivation) = &self.derivation {
            if self.field_type != FieldType::Number {
                return Err(format!("field '{}': derived fields must be numbers", self.name));
            }
            if self.required {
                return Err(format!("field '{}': derived fields cannot be required", self.name));
            }
            for input in derivation.inputs() {
                if input == self.name {
                    return Err(format!("field '{}': derivation reads itself", self.name));
                }
                match fields.iter().find(|f| f.name == input) {
                    Some(f) if f.field_type == FieldType::Number && f.derivation.is_none() => {}
                    Some(_) => {
                        return Err(format!(
                            "field '{}': derivation input '{}' must be a non-derived number",
                            self.name, input
                        ))
                    }
                    None => {
                        return Err(format!(
                            "field '{}': derivation input '{}' is not declared",
                            self.name, input
                        ))
                    }
                }
            }
        }

        Ok(())
    }
}

/// Document type descriptor with ordered fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Document type name (e.g. "product")
    pub name: String,
    #[serde(default)]
    pub title: String,
    pub fields: Vec<FieldDef>,
}

impl Schema {
    pub fn new(name: impl Into<String>, title: impl Into<String>, fields: Vec<FieldDef>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            fields,
        }
    }

    /// Parses a JSON descriptor.
    ///
    /// Field type names are checked before full deserialization so an
    /// unsupported type surfaces as `UnknownFieldType`.
    pub fn from_json(source_name: &str, content: &str) -> SchemaResult<Self> {
        let raw: serde_json::Value = serde_json::from_str(content)
            .map_err(|e| SchemaError::malformed(source_name, format!("Invalid JSON: {}", e)))?;

        if let Some(fields) = raw.get("fields").and_then(|f| f.as_array()) {
            for field in fields {
                if let Some(type_name) = field.get("type").and_then(|t| t.as_str()) {
                    type_name.parse::<FieldType>()?;
                }
            }
        }

        serde_json::from_value(raw)
            .map_err(|e| SchemaError::malformed(source_name, format!("Invalid descriptor: {}", e)))
    }

    /// Looks up a field by name
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields that carry a derivation
    pub fn derived_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|f| f.derivation.is_some())
    }

    /// Validates the descriptor structure itself (not a document)
    pub fn validate_structure(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("schema name must not be empty".into());
        }
        if self.fields.is_empty() {
            return Err(format!("schema '{}' declares no fields", self.name));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(format!("duplicate field '{}'", field.name));
            }
            field.check(&self.fields)?;
        }

        Ok(())
    }
}
