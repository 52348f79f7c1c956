use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A generated record: field name to arbitrarily nested JSON value.
pub type Record = Map<String, Value>;

/// One synthetic instance of a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MockedData {
    pub schema_name: String,
    pub contract_name: String,
    pub data: Record,
    /// Identifier hints linking this record to other entities.
    #[serde(default)]
    pub correlation_ids: BTreeMap<String, String>,
    pub created_at: DateTime<Utc>,
}

impl MockedData {
    pub fn new(
        schema_name: impl Into<String>,
        contract_name: impl Into<String>,
        data: Record,
    ) -> Self {
        Self {
            schema_name: schema_name.into(),
            contract_name: contract_name.into(),
            data,
            correlation_ids: BTreeMap::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_correlation_ids(mut self, correlation_ids: BTreeMap<String, String>) -> Self {
        self.correlation_ids = correlation_ids;
        self
    }
}
