use openmock_core::{RuleSet, SchemaField};
use schemars::schema_for;

#[test]
fn schema_tree_publishes_json_schema() {
    let generated = schema_for!(SchemaField);
    let json = serde_json::to_string(&generated).expect("serialize generated schema");

    assert!(json.contains("#/definitions/FieldValidation"), "{json}");
    assert!(json.contains("#/definitions/SchemaField"), "{json}");
}

#[test]
fn rule_set_publishes_json_schema() {
    let generated = schema_for!(RuleSet);
    let json = serde_json::to_value(&generated).expect("serialize generated schema");

    let definitions = json["definitions"].as_object().expect("definitions");
    assert!(definitions.contains_key("CorrelationRule"));
    assert!(definitions.contains_key("Relationship"));
}
