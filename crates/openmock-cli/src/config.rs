use std::path::{Path, PathBuf};

use openmock_core::{CorrelationRule, RuleSet};
use openmock_generate::{GenerateOptions, LocaleKey};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::CliError;

pub const DEFAULT_CONFIG_FILE: &str = "openmock.toml";
pub const DEFAULT_SPECS_DIR: &str = "openfinance_specs";
pub const DEFAULT_RECORDS_PER_SCHEMA: usize = 20;

/// Contents of `openmock.toml`. Every key is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OpenmockConfig {
    pub specs_dir: PathBuf,
    pub records_per_schema: usize,
    pub seed: Option<u64>,
    pub locale: LocaleKey,
    /// Correlation rules; the Open Finance defaults apply when empty.
    pub rules: Vec<CorrelationRule>,
}

impl Default for OpenmockConfig {
    fn default() -> Self {
        Self {
            specs_dir: PathBuf::from(DEFAULT_SPECS_DIR),
            records_per_schema: DEFAULT_RECORDS_PER_SCHEMA,
            seed: None,
            locale: LocaleKey::default(),
            rules: Vec::new(),
        }
    }
}

/// Values given on the command line, applied over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub specs_dir: Option<PathBuf>,
    pub records_per_schema: Option<usize>,
    pub seed: Option<u64>,
}

impl OpenmockConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, CliError> {
        Ok(toml::from_str(content)?)
    }

    /// Read `path`, or `openmock.toml` in the working directory when no path
    /// is given. A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        if !path.exists() {
            if path != Path::new(DEFAULT_CONFIG_FILE) {
                warn!(path = %path.display(), "config file not found, using defaults");
            }
            return Ok(Self::default());
        }

        debug!(path = %path.display(), "loading config");
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn apply(mut self, overrides: &ConfigOverrides) -> Self {
        if let Some(specs_dir) = &overrides.specs_dir {
            self.specs_dir = specs_dir.clone();
        }
        if let Some(records) = overrides.records_per_schema {
            self.records_per_schema = records;
        }
        if let Some(seed) = overrides.seed {
            self.seed = Some(seed);
        }
        self
    }

    pub fn rule_set(&self) -> Result<RuleSet, CliError> {
        if self.rules.is_empty() {
            return Ok(RuleSet::open_finance());
        }
        Ok(RuleSet::new(self.rules.clone())?)
    }

    pub fn generate_options(&self) -> GenerateOptions {
        GenerateOptions {
            seed: self.seed,
            locale: self.locale,
        }
    }
}
