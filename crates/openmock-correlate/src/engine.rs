use std::collections::BTreeMap;

use openmock_core::{CorrelationRule, MockedData, Record, RuleSet};
use serde::Serialize;
use tracing::debug;

use crate::graph;
use crate::path::{is_falsy, lookup_path, value_matches_text, values_equal};

/// A primary record and the records correlated with it, keyed by contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelatedDataSet {
    pub primary_data: MockedData,
    pub related_data: BTreeMap<String, Vec<MockedData>>,
}

impl CorrelatedDataSet {
    pub fn related(&self, contract: &str) -> &[MockedData] {
        self.related_data
            .get(contract)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Per-contract record store queried through a fixed rule set.
#[derive(Debug, Clone, Default)]
pub struct CorrelationEngine {
    rules: RuleSet,
    store: BTreeMap<String, Vec<MockedData>>,
}

impl CorrelationEngine {
    pub fn new(rules: RuleSet) -> Self {
        Self {
            rules,
            store: BTreeMap::new(),
        }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Replace the records stored for `contract`, returning the previous list.
    pub fn replace_contract_data(
        &mut self,
        contract: impl Into<String>,
        records: Vec<MockedData>,
    ) -> Option<Vec<MockedData>> {
        let contract = contract.into();
        debug!(contract = %contract, records = records.len(), "contract data replaced");
        self.store.insert(contract, records)
    }

    pub fn contract_data(&self, contract: &str) -> Option<&[MockedData]> {
        self.store.get(contract).map(Vec::as_slice)
    }

    /// Names with stored records, in sorted order.
    pub fn contracts(&self) -> impl Iterator<Item = &str> {
        self.store.keys().map(String::as_str)
    }

    /// Correlate the first `primary` record whose `field` equals `value`.
    ///
    /// Rules sourced at `primary` give the direct hop. Each related record is
    /// then expanded once more through the rules sourced at its own contract,
    /// and everything lands in one flat map. Expansion stops there; use
    /// [`correlation_chain`](Self::correlation_chain) for longer paths.
    pub fn correlate(&self, primary: &str, field: &str, value: &str) -> Option<CorrelatedDataSet> {
        let primary_data = self.find_record(primary, field, value)?;
        let mut related_data: BTreeMap<String, Vec<MockedData>> = BTreeMap::new();

        for rule in self.rules.iter().filter(|rule| rule.source_contract == primary) {
            let related = self.find_related(&primary_data.data, rule);
            if related.is_empty() {
                continue;
            }

            related_data
                .entry(rule.target_contract.clone())
                .or_default()
                .extend(related.iter().map(|record| (*record).clone()));

            for record in &related {
                for nested_rule in self
                    .rules
                    .iter()
                    .filter(|nested| nested.source_contract == rule.target_contract)
                {
                    let nested = self.find_related(&record.data, nested_rule);
                    if !nested.is_empty() {
                        related_data
                            .entry(nested_rule.target_contract.clone())
                            .or_default()
                            .extend(nested.into_iter().cloned());
                    }
                }
            }
        }

        debug!(
            contract = primary,
            field,
            related_contracts = related_data.len(),
            "records correlated"
        );
        Some(CorrelatedDataSet {
            primary_data: primary_data.clone(),
            related_data,
        })
    }

    /// Target records of `rule` whose `target_field` equals the source's
    /// `source_field`. Absent or falsy source values relate to nothing;
    /// one-to-one rules stop at the first match.
    pub fn find_related(&self, source: &Record, rule: &CorrelationRule) -> Vec<&MockedData> {
        let Some(source_value) = lookup_path(source, &rule.source_field) else {
            return Vec::new();
        };
        if is_falsy(source_value) {
            return Vec::new();
        }

        let candidates = self
            .store
            .get(&rule.target_contract)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let matches = candidates
            .iter()
            .filter(|record| {
                lookup_path(&record.data, &rule.target_field)
                    .is_some_and(|target| values_equal(target, source_value))
            });

        if rule.relationship.is_single() {
            matches.take(1).collect()
        } else {
            matches.collect()
        }
    }

    pub fn correlation_chain(&self, start: &str, end: &str) -> Option<Vec<CorrelationRule>> {
        graph::correlation_chain(self.rules.as_slice(), start, end)
    }

    pub fn correlation_graph(&self) -> BTreeMap<String, Vec<String>> {
        graph::correlation_graph(self.rules.as_slice())
    }

    pub fn rules_for_contract(&self, contract: &str) -> Vec<&CorrelationRule> {
        graph::rules_for_contract(self.rules.as_slice(), contract)
    }

    fn find_record(&self, contract: &str, field: &str, value: &str) -> Option<&MockedData> {
        self.store.get(contract)?.iter().find(|record| {
            lookup_path(&record.data, field).is_some_and(|found| value_matches_text(found, value))
        })
    }
}
