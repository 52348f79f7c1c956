use std::collections::BTreeMap;
use std::io::Write;

use openmock_core::{
    Contract, EndpointPath, FieldType, FieldValidation, HttpMethod, RuleSet, SchemaField,
    UNKNOWN_CATEGORY,
};
use serde_json::json;

fn contract(category: &str) -> Contract {
    let mut schemas = BTreeMap::new();
    schemas.insert(
        "Consent".to_string(),
        SchemaField::object(
            "Consent",
            [SchemaField::of_type("consentId", FieldType::String)
                .with_required(true)
                .with_validation(FieldValidation {
                    pattern: Some("^urn:[a-zA-Z0-9]+$".to_string()),
                    ..FieldValidation::default()
                })],
        ),
    );

    Contract {
        name: "API Consents - Open Finance Brasil".to_string(),
        version: Some("3.2.0".to_string()),
        description: None,
        base_path: Some("https://api.banco.com.br/open-banking/consents/v3".to_string()),
        endpoints: vec![EndpointPath {
            path: "/consents".to_string(),
            method: HttpMethod::Post,
            operation_id: Some("consentsPostConsents".to_string()),
            summary: None,
            description: None,
            request_schema: Some("CreateConsent".to_string()),
            response_schema: Some("ResponseConsent".to_string()),
            parameters: Vec::new(),
        }],
        schemas,
        file_path: None,
        category: category.to_string(),
    }
}

#[test]
fn serializes_contract_for_adapters() {
    let value = serde_json::to_value(contract("consents")).expect("serialize contract");

    assert_eq!(value["endpoints"][0]["method"], json!("POST"));
    assert_eq!(
        value["schemas"]["Consent"]["properties"]["consentId"],
        json!({
            "name": "consentId",
            "type": "string",
            "required": true,
            "validation": {"pattern": "^urn:[a-zA-Z0-9]+$"}
        })
    );
}

#[test]
fn store_key_falls_back_to_name_for_unknown_category() {
    assert_eq!(contract("consents").store_key(), "consents");
    assert_eq!(
        contract(UNKNOWN_CATEGORY).store_key(),
        "API Consents - Open Finance Brasil"
    );
}

#[test]
fn loads_rule_file_from_disk() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(
        file,
        r#"[[rules]]
source_contract = "customers"
target_contract = "accounts"
source_field = "customerId"
target_field = "customerId"
relationship = "one-to-many""#
    )
    .expect("write rules");

    let rules = RuleSet::load(file.path()).expect("load rules");
    assert_eq!(rules.len(), 1);
    assert_eq!(rules.iter().next().map(|rule| rule.target_contract.as_str()), Some("accounts"));
}

#[test]
fn missing_rule_file_is_an_io_error() {
    let result = RuleSet::load(std::path::Path::new("does/not/exist.toml"));
    assert!(matches!(result, Err(openmock_core::Error::Io(_))));
}
