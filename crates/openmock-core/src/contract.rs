use std::collections::BTreeMap;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::SchemaField;

/// Category assigned when no known category matches a contract.
pub const UNKNOWN_CATEGORY: &str = "unknown";

/// HTTP methods captured from a contract's `paths` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    /// Parse a method key case-insensitively; other keys (`parameters`,
    /// `head`, vendor extensions) are not endpoints.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "GET" => Some(Self::Get),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "DELETE" => Some(Self::Delete),
            "PATCH" => Some(Self::Patch),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One operation declared by a contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EndpointPath {
    pub path: String,
    pub method: HttpMethod,
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    /// `$ref` name of the JSON request body schema.
    pub request_schema: Option<String>,
    /// `$ref` name of the 200 (or 201) JSON response schema.
    pub response_schema: Option<String>,
    /// Raw parameter objects as declared.
    #[serde(default)]
    pub parameters: Vec<Value>,
}

/// Normalized representation of one parsed OpenAPI document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Contract {
    pub name: String,
    pub version: Option<String>,
    pub description: Option<String>,
    pub base_path: Option<String>,
    pub endpoints: Vec<EndpointPath>,
    /// `components.schemas`, keyed by schema name.
    pub schemas: BTreeMap<String, SchemaField>,
    pub file_path: Option<String>,
    pub category: String,
}

impl Contract {
    pub fn schema(&self, name: &str) -> Option<&SchemaField> {
        self.schemas.get(name)
    }

    /// Endpoint declared at `path` for `method`. The leading `/` of `path`
    /// is optional.
    pub fn endpoint(&self, path: &str, method: HttpMethod) -> Option<&EndpointPath> {
        let path = path.trim_start_matches('/');
        self.endpoints.iter().find(|endpoint| {
            endpoint.method == method && endpoint.path.trim_start_matches('/') == path
        })
    }

    /// Key used to store this contract's records in the correlation engine.
    pub fn store_key(&self) -> &str {
        if self.category.is_empty() || self.category == UNKNOWN_CATEGORY {
            &self.name
        } else {
            &self.category
        }
    }
}
