use std::path::Path;

use serde_json::{Map, Number, Value};
use serde_yaml_ng::Value as YamlValue;

use crate::errors::Result;

/// Serialization format of a contract document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// `.yaml` / `.yml` (any case) are YAML; everything else is read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("yaml" | "yml") => Self::Yaml,
            _ => Self::Json,
        }
    }

    /// Decode a document into a JSON tree.
    pub fn decode(self, content: &str) -> Result<Value> {
        match self {
            Self::Json => Ok(serde_json::from_str(content)?),
            Self::Yaml => {
                let value: YamlValue = serde_yaml_ng::from_str(content)?;
                Ok(yaml_to_json(value))
            }
        }
    }
}

/// YAML allows non-string mapping keys (`200:` under `responses`); they are
/// stringified so the rest of the parser only deals with JSON objects.
fn yaml_to_json(value: YamlValue) -> Value {
    match value {
        YamlValue::Null => Value::Null,
        YamlValue::Bool(value) => Value::Bool(value),
        YamlValue::Number(number) => {
            if let Some(value) = number.as_i64() {
                Value::Number(value.into())
            } else if let Some(value) = number.as_u64() {
                Value::Number(value.into())
            } else {
                number
                    .as_f64()
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            }
        }
        YamlValue::String(value) => Value::String(value),
        YamlValue::Sequence(items) => Value::Array(items.into_iter().map(yaml_to_json).collect()),
        YamlValue::Mapping(mapping) => {
            let mut object = Map::new();
            for (key, value) in mapping {
                if let Some(key) = yaml_key(key) {
                    object.insert(key, yaml_to_json(value));
                }
            }
            Value::Object(object)
        }
        YamlValue::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn yaml_key(key: YamlValue) -> Option<String> {
    match key {
        YamlValue::String(value) => Some(value),
        YamlValue::Number(number) => Some(number.to_string()),
        YamlValue::Bool(value) => Some(value.to_string()),
        YamlValue::Null => Some("null".to_string()),
        YamlValue::Tagged(tagged) => yaml_key(tagged.value),
        YamlValue::Sequence(_) | YamlValue::Mapping(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn format_follows_extension_case_insensitively() {
        assert_eq!(DocumentFormat::from_path(Path::new("a/b.YML")), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_path(Path::new("a/b.yaml")), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_path(Path::new("a/b.json")), DocumentFormat::Json);
        assert_eq!(DocumentFormat::from_path(Path::new("a/b")), DocumentFormat::Json);
    }

    #[test]
    fn yaml_integer_keys_become_strings() {
        let value = DocumentFormat::Yaml
            .decode(
                "responses:\n  200:\n    description: OK\n  '201':\n    description: Created\n",
            )
            .expect("decode yaml");
        assert_eq!(value["responses"]["200"]["description"], json!("OK"));
        assert_eq!(value["responses"]["201"]["description"], json!("Created"));
    }

    #[test]
    fn yaml_numbers_keep_their_kind() {
        let value = DocumentFormat::Yaml
            .decode("minimum: 1\nmaximum: 2.5\n")
            .expect("decode yaml");
        assert_eq!(value["minimum"], json!(1));
        assert_eq!(value["maximum"], json!(2.5));
    }
}
