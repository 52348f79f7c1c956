use std::collections::BTreeSet;

use openmock_core::{Contract, HttpMethod, MockedData};
use openmock_correlate::{CorrelatedDataSet, CorrelationEngine};
use openmock_generate::MockGenerator;
use openmock_parse::ContractParser;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::CliError;
use crate::config::OpenmockConfig;

/// One-line view of a parsed contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractSummary {
    pub name: String,
    pub version: Option<String>,
    pub category: String,
    pub endpoints: usize,
    pub schemas: usize,
    pub file_path: Option<String>,
}

/// Mocked response for one contract endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndpointResponse {
    pub path: String,
    pub method: HttpMethod,
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    pub response_schema: Option<String>,
    /// Generated response body; an empty object when the endpoint declares
    /// no response schema.
    pub response: Value,
}

impl From<&Contract> for ContractSummary {
    fn from(contract: &Contract) -> Self {
        Self {
            name: contract.name.clone(),
            version: contract.version.clone(),
            category: contract.category.clone(),
            endpoints: contract.endpoints.len(),
            schemas: contract.schemas.len(),
            file_path: contract.file_path.clone(),
        }
    }
}

/// Parsed contracts plus the generator and correlation engine built from
/// one configuration.
#[derive(Debug)]
pub struct Session {
    config: OpenmockConfig,
    contracts: Vec<Contract>,
    generator: MockGenerator,
    engine: CorrelationEngine,
    populated: bool,
}

impl Session {
    /// Parse every contract under the configured specs directory.
    pub fn open(config: OpenmockConfig) -> Result<Self, CliError> {
        if !config.specs_dir.is_dir() {
            return Err(CliError::InvalidConfig(format!(
                "specs directory not found: {}",
                config.specs_dir.display()
            )));
        }

        let contracts = ContractParser::default().parse_directory(&config.specs_dir);
        let generator = MockGenerator::new(config.generate_options());
        let engine = CorrelationEngine::new(config.rule_set()?);
        info!(
            specs_dir = %config.specs_dir.display(),
            contracts = contracts.len(),
            seed = generator.seed(),
            "session opened"
        );

        Ok(Self {
            config,
            contracts,
            generator,
            engine,
            populated: false,
        })
    }

    pub fn contracts(&self) -> &[Contract] {
        &self.contracts
    }

    pub fn engine(&self) -> &CorrelationEngine {
        &self.engine
    }

    /// Contract whose name equals `name`, else whose store key does.
    pub fn find_contract(&self, name: &str) -> Result<&Contract, CliError> {
        self.contract_index(name).map(|index| &self.contracts[index])
    }

    fn contract_index(&self, name: &str) -> Result<usize, CliError> {
        self.contracts
            .iter()
            .position(|contract| contract.name == name)
            .or_else(|| {
                self.contracts
                    .iter()
                    .position(|contract| contract.store_key() == name)
            })
            .ok_or_else(|| CliError::NotFound(format!("contract '{name}'")))
    }

    pub fn summaries(&self, category: Option<&str>) -> Vec<ContractSummary> {
        self.contracts
            .iter()
            .filter(|contract| category.is_none_or(|category| contract.category == category))
            .map(ContractSummary::from)
            .collect()
    }

    /// Distinct contract categories, sorted.
    pub fn categories(&self) -> Vec<String> {
        self.contracts
            .iter()
            .map(|contract| contract.category.as_str())
            .filter(|category| !category.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Generate records for every contract and store them in the engine
    /// under each contract's store key, replacing earlier records.
    pub fn populate(&mut self) {
        let count = self.config.records_per_schema;
        for contract in &self.contracts {
            let records = self.generator.generate_for_contract(contract, count);
            let key = contract.store_key().to_string();
            if self.engine.replace_contract_data(key.as_str(), records).is_some() {
                debug!(contract = %contract.name, key = %key, "stored records replaced");
            }
        }
        self.populated = true;
    }

    fn ensure_populated(&mut self) {
        if !self.populated {
            self.populate();
        }
    }

    /// Records stored for a contract, populating the store on first use.
    /// Contracts sharing a store key share the stored list.
    pub fn data(&mut self, contract: &str) -> Result<&[MockedData], CliError> {
        let index = self.contract_index(contract)?;
        self.ensure_populated();
        let key = self.contracts[index].store_key();
        Ok(self.engine.contract_data(key).unwrap_or_default())
    }

    /// Stored records of one schema of a contract. They come from the same
    /// store [`correlate`](Self::correlate) searches, so ids printed here
    /// correlate under the same seed.
    pub fn mock(&mut self, contract: &str, schema: &str) -> Result<Vec<MockedData>, CliError> {
        let index = self.contract_index(contract)?;
        let found = &self.contracts[index];
        if found.schema(schema).is_none() {
            return Err(CliError::NotFound(format!("schema '{schema}' in '{contract}'")));
        }
        let name = found.name.clone();

        Ok(self
            .data(contract)?
            .iter()
            .filter(|record| record.contract_name == name && record.schema_name == schema)
            .cloned()
            .collect())
    }

    /// Correlate against the populated store.
    pub fn correlate(
        &mut self,
        contract: &str,
        field: &str,
        value: &str,
    ) -> Result<CorrelatedDataSet, CliError> {
        self.ensure_populated();
        self.engine
            .correlate(contract, field, value)
            .ok_or_else(|| CliError::NotFound(format!("record in '{contract}' with {field} = {value}")))
    }

    /// Mocked response for the endpoint at `path` and `method`.
    pub fn query(
        &mut self,
        contract: &str,
        method: HttpMethod,
        path: &str,
    ) -> Result<EndpointResponse, CliError> {
        let index = self.contract_index(contract)?;
        let target = &self.contracts[index];
        let endpoint = target.endpoint(path, method).ok_or_else(|| {
            CliError::NotFound(format!("endpoint {method} {path} in '{contract}'"))
        })?;

        let response = self
            .generator
            .generate_for_endpoint(target, path, method)
            .map(|mocked| Value::Object(mocked.data))
            .unwrap_or_else(|| Value::Object(Default::default()));

        Ok(EndpointResponse {
            path: endpoint.path.clone(),
            method: endpoint.method,
            operation_id: endpoint.operation_id.clone(),
            summary: endpoint.summary.clone(),
            response_schema: endpoint.response_schema.clone(),
            response,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn session_with_specs() -> (tempfile::TempDir, Session) {
        let dir = write_specs();
        let session = open_seeded(&dir, 21);
        (dir, session)
    }

    fn open_seeded(dir: &tempfile::TempDir, seed: u64) -> Session {
        let config = OpenmockConfig {
            specs_dir: dir.path().to_path_buf(),
            records_per_schema: 3,
            seed: Some(seed),
            ..OpenmockConfig::default()
        };
        Session::open(config).expect("open session")
    }

    fn write_specs() -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("temp dir");
        let consents = dir.path().join("consents");
        let resources = dir.path().join("resources");
        fs::create_dir_all(&consents).expect("consents dir");
        fs::create_dir_all(&resources).expect("resources dir");
        fs::write(
            consents.join("openapi.json"),
            r##"{
  "info": {"title": "API Consents", "version": "3.0.0"},
  "paths": {
    "/consents/{consentId}": {
      "get": {
        "operationId": "consentsGetConsentsConsentId",
        "responses": {"200": {"content": {"application/json": {
          "schema": {"$ref": "#/components/schemas/Consent"}
        }}}}
      },
      "delete": {"responses": {"204": {"description": "revoked"}}}
    }
  },
  "components": {"schemas": {"Consent": {
    "type": "object",
    "properties": {"consentId": {"type": "string"}, "status": {"type": "string", "enum": ["AUTHORISED"]}}
  }}}
}"##,
        )
        .expect("write consents");
        fs::write(
            resources.join("openapi.json"),
            r#"{
  "info": {"title": "API Resources"},
  "components": {"schemas": {"Resource": {
    "type": "object",
    "properties": {"consentId": {"type": "string"}, "accountId": {"type": "string"}}
  }}}
}"#,
        )
        .expect("write resources");
        dir
    }

    #[test]
    fn lists_and_filters_contracts() {
        let (_dir, session) = session_with_specs();
        let all = session.summaries(None);
        assert_eq!(all.len(), 2);
        let consents = session.summaries(Some("consents"));
        assert_eq!(consents.len(), 1);
        assert_eq!(consents[0].name, "API Consents");
        assert_eq!(consents[0].schemas, 1);
    }

    #[test]
    fn finds_contract_by_name_or_category() {
        let (_dir, session) = session_with_specs();
        assert_eq!(
            session.find_contract("resources").expect("by category").name,
            "API Resources"
        );
        assert!(session.find_contract("API Consents").is_ok());
        assert!(matches!(
            session.find_contract("loans"),
            Err(CliError::NotFound(_))
        ));
    }

    #[test]
    fn mock_generates_configured_count() {
        let (_dir, mut session) = session_with_specs();
        let records = session.mock("consents", "Consent").expect("records");
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].data["status"], serde_json::json!("AUTHORISED"));
        assert!(matches!(
            session.mock("consents", "Missing"),
            Err(CliError::NotFound(_))
        ));
    }

    #[test]
    fn populate_stores_records_by_category() {
        let (_dir, mut session) = session_with_specs();
        session.populate();
        let stored = session
            .engine()
            .contract_data("consents")
            .expect("stored consents");
        assert_eq!(stored.len(), 3);

        let consent_id = stored[0].data["consentId"]
            .as_str()
            .expect("consent id")
            .to_string();
        let correlated = session
            .engine()
            .correlate("consents", "consentId", &consent_id)
            .expect("primary record");
        assert_eq!(correlated.primary_data.data["consentId"], serde_json::json!(consent_id));
    }

    #[test]
    fn categories_are_sorted_and_distinct() {
        let (_dir, session) = session_with_specs();
        assert_eq!(session.categories(), vec!["consents", "resources"]);
    }

    #[test]
    fn mocked_ids_correlate_in_a_later_run_with_the_same_seed() {
        let dir = write_specs();
        let mut first = open_seeded(&dir, 42);
        let records = first.mock("consents", "Consent").expect("records");
        let consent_id = records[0].data["consentId"]
            .as_str()
            .expect("consent id")
            .to_string();

        let mut second = open_seeded(&dir, 42);
        let correlated = second
            .correlate("consents", "consentId", &consent_id)
            .expect("correlatable id");
        assert_eq!(correlated.primary_data.data, records[0].data);
        assert!(matches!(
            second.correlate("consents", "consentId", "urn:bancoex:missing"),
            Err(CliError::NotFound(_))
        ));
    }

    #[test]
    fn data_lists_the_correlated_store() {
        let (_dir, mut session) = session_with_specs();
        let stored = session.data("API Resources").expect("stored records").to_vec();
        assert_eq!(stored.len(), 3);
        assert!(stored.iter().all(|record| record.schema_name == "Resource"));
        assert_eq!(
            session.engine().contract_data("resources").expect("engine store"),
            stored.as_slice()
        );
        assert!(matches!(session.data("loans"), Err(CliError::NotFound(_))));
    }

    #[test]
    fn query_mocks_endpoint_responses() {
        let (_dir, mut session) = session_with_specs();
        let response = session
            .query("consents", HttpMethod::Get, "/consents/{consentId}")
            .expect("get response");
        assert_eq!(
            response.operation_id.as_deref(),
            Some("consentsGetConsentsConsentId")
        );
        assert_eq!(response.response["status"], serde_json::json!("AUTHORISED"));

        let revoked = session
            .query("consents", HttpMethod::Delete, "consents/{consentId}")
            .expect("delete response");
        assert_eq!(revoked.response_schema, None);
        assert_eq!(revoked.response, serde_json::json!({}));

        assert!(matches!(
            session.query("consents", HttpMethod::Post, "/consents"),
            Err(CliError::NotFound(_))
        ));
    }

    #[test]
    fn missing_specs_dir_is_reported() {
        let config = OpenmockConfig {
            specs_dir: "definitely/not/here".into(),
            ..OpenmockConfig::default()
        };
        assert!(matches!(
            Session::open(config),
            Err(CliError::InvalidConfig(_))
        ));
    }
}
