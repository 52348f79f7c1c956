use std::collections::BTreeMap;

use openmock_core::Record;
use serde_json::Value;

/// Top-level record fields whose string values are remembered per schema.
pub const CORRELATION_FIELDS: &[&str] =
    &["consentId", "accountId", "customerId", "creditCardAccountId"];

/// Identifiers remembered across generated records.
///
/// Two views are kept: the last id produced per id type (`consent`,
/// `account`, `customer`) by the tagged heuristics, and the top-level
/// correlation fields of the last record per `<category>:<schema>` key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorrelationIdCache {
    last_by_type: BTreeMap<String, String>,
    by_schema: BTreeMap<String, BTreeMap<String, String>>,
}

impl CorrelationIdCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store_id(&mut self, id_type: &str, value: &str) {
        self.last_by_type
            .insert(id_type.to_string(), value.to_string());
    }

    /// Last id produced for `id_type`.
    pub fn correlation_id(&self, id_type: &str) -> Option<&str> {
        self.last_by_type.get(id_type).map(String::as_str)
    }

    /// Remember the correlation fields of `record`, returning the ones found.
    pub fn ingest_record(
        &mut self,
        category: &str,
        schema: &str,
        record: &Record,
    ) -> BTreeMap<String, String> {
        let found = correlation_fields(record);
        let entry = self
            .by_schema
            .entry(schema_key(category, schema))
            .or_default();
        for (field, value) in &found {
            entry.insert(field.clone(), value.clone());
        }
        found
    }

    /// Correlation fields seen for `<category>:<schema>`.
    pub fn correlation_ids(&self, category: &str, schema: &str) -> Option<&BTreeMap<String, String>> {
        self.by_schema.get(&schema_key(category, schema))
    }

    pub fn clear(&mut self) {
        self.last_by_type.clear();
        self.by_schema.clear();
    }
}

fn schema_key(category: &str, schema: &str) -> String {
    format!("{category}:{schema}")
}

fn correlation_fields(record: &Record) -> BTreeMap<String, String> {
    CORRELATION_FIELDS
        .iter()
        .filter_map(|field| match record.get(*field) {
            Some(Value::String(value)) => Some((field.to_string(), value.clone())),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keeps_last_id_per_type() {
        let mut cache = CorrelationIdCache::new();
        cache.store_id("account", "a-1");
        cache.store_id("account", "a-2");
        assert_eq!(cache.correlation_id("account"), Some("a-2"));
        assert_eq!(cache.correlation_id("consent"), None);
    }

    #[test]
    fn ingests_only_string_correlation_fields() {
        let mut cache = CorrelationIdCache::new();
        let record = json!({
            "accountId": "acc-1",
            "customerId": 42,
            "data": {"consentId": "nested"}
        });
        let Value::Object(record) = record else {
            panic!("object literal");
        };

        let found = cache.ingest_record("accounts", "Account", &record);
        assert_eq!(found.len(), 1);
        assert_eq!(found["accountId"], "acc-1");

        let stored = cache
            .correlation_ids("accounts", "Account")
            .expect("stored ids");
        assert_eq!(stored.get("accountId").map(String::as_str), Some("acc-1"));
        assert!(cache.correlation_ids("accounts", "Other").is_none());
    }
}
