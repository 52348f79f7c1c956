use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::locale::LocaleKey;

/// Options for the generation engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Fixed seed for reproducible runs; a random seed is drawn when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Locale for names, addresses and free text.
    #[serde(default)]
    pub locale: LocaleKey,
}

impl GenerateOptions {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_locale(mut self, locale: LocaleKey) -> Self {
        self.locale = locale;
        self
    }
}

/// Summary of one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub contract: String,
    pub seed: u64,
    /// Records produced per schema.
    pub schemas: BTreeMap<String, u64>,
    pub records_generated: u64,
    /// Values produced per generator id.
    pub generator_usage: BTreeMap<String, u64>,
    pub example_count: u64,
    pub enum_count: u64,
    pub reference_count: u64,
}

impl GenerationReport {
    pub fn new(contract: impl Into<String>, seed: u64) -> Self {
        Self {
            contract: contract.into(),
            seed,
            ..Self::default()
        }
    }

    pub fn record_schema(&mut self, schema: &str, records: u64) {
        *self.schemas.entry(schema.to_string()).or_insert(0) += records;
        self.records_generated += records;
    }

    pub fn record_generator_usage(&mut self, id: &str) {
        *self.generator_usage.entry(id.to_string()).or_insert(0) += 1;
    }

    pub fn record_example(&mut self) {
        self.example_count += 1;
    }

    pub fn record_enum(&mut self) {
        self.enum_count += 1;
    }

    pub fn record_reference(&mut self) {
        self.reference_count += 1;
    }
}
