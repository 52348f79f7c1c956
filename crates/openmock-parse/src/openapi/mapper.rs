use std::collections::BTreeMap;

use openmock_core::{
    EndpointPath, FieldFormat, FieldKind, FieldType, FieldValidation, HttpMethod, SchemaField,
};
use serde_json::{Map, Value};

/// Parse `components.schemas` into named schema trees.
pub fn map_schemas(schemas: Option<&Value>) -> BTreeMap<String, SchemaField> {
    let Some(Value::Object(schemas)) = schemas else {
        return BTreeMap::new();
    };

    schemas
        .iter()
        .map(|(name, node)| (name.clone(), parse_schema_field(name, node, &[])))
        .collect()
}

/// Parse one schema node, recursing into object properties and array items.
///
/// `parent_required` is the `required` list of the enclosing object. A `$ref`
/// node becomes an object placeholder carrying the target name; unknown type
/// strings downgrade to objects.
pub fn parse_schema_field(name: &str, node: &Value, parent_required: &[String]) -> SchemaField {
    let description = string_at(node, "description");

    if let Some(target) = node.get("$ref").and_then(Value::as_str) {
        let mut field = SchemaField::reference(name, ref_name(target));
        field.description = description;
        return field;
    }

    let field_type = declared_type(node);
    let kind = match field_type {
        FieldType::Object => FieldKind::Object {
            properties: map_properties(node),
            reference: None,
        },
        FieldType::Array => FieldKind::Array {
            items: node
                .get("items")
                .filter(|items| items.is_object())
                .map(|items| Box::new(parse_schema_field(&format!("{name}_item"), items, &[]))),
        },
        other => FieldKind::empty(other),
    };

    SchemaField {
        name: name.to_string(),
        kind,
        description,
        required: parent_required.iter().any(|item| item == name),
        validation: extract_validation(node),
        example: node.get("example").cloned(),
    }
}

fn map_properties(node: &Value) -> BTreeMap<String, SchemaField> {
    let Some(Value::Object(properties)) = node.get("properties") else {
        return BTreeMap::new();
    };
    let required = string_list(node.get("required"));

    properties
        .iter()
        .map(|(prop_name, prop)| (prop_name.clone(), parse_schema_field(prop_name, prop, &required)))
        .collect()
}

fn declared_type(node: &Value) -> FieldType {
    let declared = match node.get("type") {
        None => Some("object"),
        Some(Value::String(value)) => Some(value.as_str()),
        // OpenAPI 3.1 allows `type: [string, "null"]`.
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .find(|item| *item != "null"),
        Some(_) => None,
    };
    declared.and_then(FieldType::parse).unwrap_or(FieldType::Object)
}

/// Collect declared constraints; `None` when the node declares none.
pub fn extract_validation(node: &Value) -> Option<FieldValidation> {
    let validation = FieldValidation {
        pattern: string_at(node, "pattern"),
        min_length: usize_at(node, "minLength"),
        max_length: usize_at(node, "maxLength"),
        minimum: node.get("minimum").and_then(Value::as_f64),
        maximum: node.get("maximum").and_then(Value::as_f64),
        enum_values: node
            .get("enum")
            .and_then(Value::as_array)
            .filter(|values| !values.is_empty())
            .cloned(),
        format: node
            .get("format")
            .and_then(Value::as_str)
            .and_then(FieldFormat::parse),
    };

    if validation.is_empty() {
        None
    } else {
        Some(validation)
    }
}

/// Parse the `paths` section into endpoints, one per path and known method.
pub fn map_endpoints(paths: Option<&Value>) -> Vec<EndpointPath> {
    let Some(Value::Object(paths)) = paths else {
        return Vec::new();
    };

    let mut endpoints = Vec::new();
    for (path, item) in paths {
        let Some(item) = item.as_object() else {
            continue;
        };
        for (method_key, operation) in item {
            let Some(method) = HttpMethod::parse(method_key) else {
                continue;
            };
            let Some(operation) = operation.as_object() else {
                continue;
            };
            endpoints.push(map_operation(path, method, operation));
        }
    }
    endpoints
}

fn map_operation(path: &str, method: HttpMethod, operation: &Map<String, Value>) -> EndpointPath {
    let request_schema = operation.get("requestBody").and_then(json_schema_ref);

    let responses = operation.get("responses");
    let success = responses
        .and_then(|responses| responses.get("200"))
        .or_else(|| responses.and_then(|responses| responses.get("201")));
    let response_schema = success.and_then(json_schema_ref);

    EndpointPath {
        path: path.to_string(),
        method,
        operation_id: operation
            .get("operationId")
            .and_then(Value::as_str)
            .map(str::to_string),
        summary: operation
            .get("summary")
            .and_then(Value::as_str)
            .map(str::to_string),
        description: operation
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_string),
        request_schema,
        response_schema,
        parameters: operation
            .get("parameters")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default(),
    }
}

/// `$ref` name under `content."application/json".schema`; inline bodies yield `None`.
fn json_schema_ref(body: &Value) -> Option<String> {
    body.get("content")?
        .get("application/json")?
        .get("schema")?
        .get("$ref")?
        .as_str()
        .map(ref_name)
}

fn ref_name(target: &str) -> String {
    target.rsplit('/').next().unwrap_or(target).to_string()
}

fn string_at(node: &Value, key: &str) -> Option<String> {
    node.get(key).and_then(Value::as_str).map(str::to_string)
}

fn usize_at(node: &Value, key: &str) -> Option<usize> {
    node.get(key)
        .and_then(Value::as_u64)
        .and_then(|value| usize::try_from(value).ok())
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
