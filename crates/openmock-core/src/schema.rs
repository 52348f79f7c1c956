use std::collections::BTreeMap;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Primitive OpenAPI type of a schema node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
}

impl FieldType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "string" => Some(Self::String),
            "integer" => Some(Self::Integer),
            "number" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            "array" => Some(Self::Array),
            "object" => Some(Self::Object),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// OpenAPI `format` values understood by the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum FieldFormat {
    Date,
    DateTime,
    Email,
    Uuid,
    Uri,
    Byte,
    Binary,
    Int32,
    Int64,
    Float,
    Double,
}

impl FieldFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "date" => Some(Self::Date),
            "date-time" => Some(Self::DateTime),
            "email" => Some(Self::Email),
            "uuid" => Some(Self::Uuid),
            "uri" => Some(Self::Uri),
            "byte" => Some(Self::Byte),
            "binary" => Some(Self::Binary),
            "int32" => Some(Self::Int32),
            "int64" => Some(Self::Int64),
            "float" => Some(Self::Float),
            "double" => Some(Self::Double),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::DateTime => "date-time",
            Self::Email => "email",
            Self::Uuid => "uuid",
            Self::Uri => "uri",
            Self::Byte => "byte",
            Self::Binary => "binary",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Float => "float",
            Self::Double => "double",
        }
    }
}

impl fmt::Display for FieldFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Constraints declared on a schema node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FieldValidation {
    /// Regular expression the value is expected to match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(default, rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<FieldFormat>,
}

impl FieldValidation {
    /// Returns true when no constraint is declared.
    pub fn is_empty(&self) -> bool {
        self.pattern.is_none()
            && self.min_length.is_none()
            && self.max_length.is_none()
            && self.minimum.is_none()
            && self.maximum.is_none()
            && self.enum_values.as_ref().is_none_or(Vec::is_empty)
            && self.format.is_none()
    }

    /// Declared enum values, if any.
    pub fn enum_values(&self) -> Option<&[Value]> {
        self.enum_values
            .as_deref()
            .filter(|values| !values.is_empty())
    }
}

/// Shape of a schema node; the variant decides which children are meaningful.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKind {
    String,
    Integer,
    Number,
    Boolean,
    Array {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        items: Option<Box<SchemaField>>,
    },
    Object {
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        properties: BTreeMap<String, SchemaField>,
        /// Unresolved `$ref` target name; never expanded.
        #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
        reference: Option<String>,
    },
}

impl FieldKind {
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldKind::String => FieldType::String,
            FieldKind::Integer => FieldType::Integer,
            FieldKind::Number => FieldType::Number,
            FieldKind::Boolean => FieldType::Boolean,
            FieldKind::Array { .. } => FieldType::Array,
            FieldKind::Object { .. } => FieldType::Object,
        }
    }

    /// Empty node of the given type.
    pub fn empty(field_type: FieldType) -> Self {
        match field_type {
            FieldType::String => FieldKind::String,
            FieldType::Integer => FieldKind::Integer,
            FieldType::Number => FieldKind::Number,
            FieldType::Boolean => FieldKind::Boolean,
            FieldType::Array => FieldKind::Array { items: None },
            FieldType::Object => FieldKind::Object {
                properties: BTreeMap::new(),
                reference: None,
            },
        }
    }
}

/// A node of a parsed schema tree.
///
/// Each node owns its children; the tree is assumed acyclic because `$ref`
/// targets are recorded by name and never expanded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SchemaField {
    pub name: String,
    #[serde(flatten)]
    pub kind: FieldKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<FieldValidation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
}

impl SchemaField {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            description: None,
            required: false,
            validation: None,
            example: None,
        }
    }

    /// Leaf node of the given type with no constraints.
    pub fn of_type(name: impl Into<String>, field_type: FieldType) -> Self {
        Self::new(name, FieldKind::empty(field_type))
    }

    pub fn object(
        name: impl Into<String>,
        properties: impl IntoIterator<Item = SchemaField>,
    ) -> Self {
        let properties = properties
            .into_iter()
            .map(|field| (field.name.clone(), field))
            .collect();
        Self::new(
            name,
            FieldKind::Object {
                properties,
                reference: None,
            },
        )
    }

    pub fn array(name: impl Into<String>, items: Option<SchemaField>) -> Self {
        Self::new(
            name,
            FieldKind::Array {
                items: items.map(Box::new),
            },
        )
    }

    /// Placeholder node standing in for an unresolved `$ref`.
    pub fn reference(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(
            name,
            FieldKind::Object {
                properties: BTreeMap::new(),
                reference: Some(target.into()),
            },
        )
    }

    pub fn with_validation(mut self, validation: FieldValidation) -> Self {
        self.validation = Some(validation);
        self
    }

    pub fn with_example(mut self, example: Value) -> Self {
        self.example = Some(example);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn field_type(&self) -> FieldType {
        self.kind.field_type()
    }

    pub fn properties(&self) -> Option<&BTreeMap<String, SchemaField>> {
        match &self.kind {
            FieldKind::Object { properties, .. } => Some(properties),
            _ => None,
        }
    }

    pub fn items(&self) -> Option<&SchemaField> {
        match &self.kind {
            FieldKind::Array { items } => items.as_deref(),
            _ => None,
        }
    }

    pub fn reference_name(&self) -> Option<&str> {
        match &self.kind {
            FieldKind::Object { reference, .. } => reference.as_deref(),
            _ => None,
        }
    }
}
