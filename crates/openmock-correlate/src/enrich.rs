use openmock_core::{MockedData, Record};
use serde_json::{Value, json};

use crate::engine::CorrelationEngine;
use crate::path::{is_falsy, lookup_path};

/// Prefix of the hint lists added by [`CorrelationEngine::enrich_with_correlations`].
pub const CORRELATION_HINT_PREFIX: &str = "_correlations_";

/// Whether a contract name refers to a rule's contract.
///
/// Human-readable names ("API Consents - Open Finance Brasil") carry the
/// rule's short name, so the test is a case-insensitive substring match.
/// Enrichment applies it identically to both rule sides.
pub fn contract_matches(name: &str, rule_contract: &str) -> bool {
    name.to_lowercase().contains(&rule_contract.to_lowercase())
}

impl CorrelationEngine {
    /// Records of `target` linked to `source` by the first rule whose sides
    /// match the source's contract name and `target`.
    pub fn apply_correlation(&self, source: &MockedData, target: &str) -> Vec<&MockedData> {
        self.rules()
            .iter()
            .find(|rule| {
                contract_matches(&source.contract_name, &rule.source_contract)
                    && contract_matches(target, &rule.target_contract)
            })
            .map(|rule| self.find_related(&source.data, rule))
            .unwrap_or_default()
    }

    /// Copy of the record with one `_correlations_<target>` list per target
    /// contract, each hint naming the target field, the linking value and
    /// the relationship.
    pub fn enrich_with_correlations(&self, data: &MockedData) -> Record {
        let mut enriched = data.data.clone();

        for rule in self
            .rules()
            .iter()
            .filter(|rule| contract_matches(&data.contract_name, &rule.source_contract))
        {
            let Some(value) = lookup_path(&data.data, &rule.source_field) else {
                continue;
            };
            if is_falsy(value) {
                continue;
            }

            let hint = json!({
                "field": rule.target_field,
                "value": value,
                "relationship": rule.relationship,
            });
            let key = format!("{CORRELATION_HINT_PREFIX}{}", rule.target_contract);
            match enriched.get_mut(&key) {
                Some(Value::Array(hints)) => hints.push(hint),
                _ => {
                    enriched.insert(key, Value::Array(vec![hint]));
                }
            }
        }

        enriched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_is_case_insensitive_substring() {
        assert!(contract_matches("API Consents - Open Finance Brasil", "consents"));
        assert!(contract_matches("accounts", "Accounts"));
        assert!(!contract_matches("loans", "accounts"));
    }
}
