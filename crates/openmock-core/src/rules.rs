use std::fmt;
use std::path::Path;
use std::slice;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Multiplicity of a correlation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Relationship {
    OneToOne,
    OneToMany,
    ManyToMany,
}

impl Relationship {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OneToOne => "one-to-one",
            Self::OneToMany => "one-to-many",
            Self::ManyToMany => "many-to-many",
        }
    }

    /// Whether a match search stops at the first hit.
    pub fn is_single(self) -> bool {
        matches!(self, Self::OneToOne)
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declarative edge between two contracts' records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct CorrelationRule {
    pub source_contract: String,
    pub target_contract: String,
    /// Dotted path into the source record.
    pub source_field: String,
    /// Dotted path into the target record.
    pub target_field: String,
    pub relationship: Relationship,
}

impl CorrelationRule {
    pub fn new(
        source_contract: impl Into<String>,
        target_contract: impl Into<String>,
        source_field: impl Into<String>,
        target_field: impl Into<String>,
        relationship: Relationship,
    ) -> Self {
        Self {
            source_contract: source_contract.into(),
            target_contract: target_contract.into(),
            source_field: source_field.into(),
            target_field: target_field.into(),
            relationship,
        }
    }

    fn validate(&self, index: usize) -> Result<()> {
        let fields = [
            ("source_contract", &self.source_contract),
            ("target_contract", &self.target_contract),
            ("source_field", &self.source_field),
            ("target_field", &self.target_field),
        ];
        for (label, value) in fields {
            if value.trim().is_empty() {
                return Err(Error::InvalidRule(format!(
                    "rules[{index}].{label} must not be empty"
                )));
            }
        }
        Ok(())
    }
}

/// Immutable set of correlation rules, supplied once to the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, JsonSchema)]
pub struct RuleSet {
    rules: Vec<CorrelationRule>,
}

#[derive(Debug, Deserialize)]
struct RuleFile {
    #[serde(default)]
    rules: Vec<CorrelationRule>,
}

impl RuleSet {
    /// Build a rule set, rejecting rules with empty contract or field names.
    pub fn new(rules: Vec<CorrelationRule>) -> Result<Self> {
        for (index, rule) in rules.iter().enumerate() {
            rule.validate(index)?;
        }
        Ok(Self { rules })
    }

    /// Default relationships between the Open Finance Brasil APIs.
    pub fn open_finance() -> Self {
        use Relationship::{OneToMany, OneToOne};

        Self {
            rules: vec![
                CorrelationRule::new("consents", "resources", "consentId", "consentId", OneToMany),
                CorrelationRule::new("resources", "accounts", "accountId", "accountId", OneToOne),
                CorrelationRule::new(
                    "accounts",
                    "transactions",
                    "accountId",
                    "accountId",
                    OneToMany,
                ),
                CorrelationRule::new(
                    "customers",
                    "accounts",
                    "customerId",
                    "customerId",
                    OneToMany,
                ),
                CorrelationRule::new(
                    "credit-cards-accounts",
                    "transactions",
                    "creditCardAccountId",
                    "creditCardAccountId",
                    OneToMany,
                ),
            ],
        }
    }

    /// Parse a `[[rules]]` TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: RuleFile = toml::from_str(content)?;
        Self::new(file.rules)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn as_slice(&self) -> &[CorrelationRule] {
        &self.rules
    }

    pub fn iter(&self) -> slice::Iter<'_, CorrelationRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a CorrelationRule;
    type IntoIter = slice::Iter<'a, CorrelationRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rules_from_toml() {
        let rules = RuleSet::from_toml_str(
            r#"
[[rules]]
source_contract = "consents"
target_contract = "accounts"
source_field = "data.consentId"
target_field = "consentId"
relationship = "many-to-many"
"#,
        )
        .expect("parse rules");

        assert_eq!(rules.len(), 1);
        let rule = &rules.as_slice()[0];
        assert_eq!(rule.source_field, "data.consentId");
        assert_eq!(rule.relationship, Relationship::ManyToMany);
    }

    #[test]
    fn rejects_unknown_relationship() {
        let result = RuleSet::from_toml_str(
            r#"
[[rules]]
source_contract = "a"
target_contract = "b"
source_field = "id"
target_field = "id"
relationship = "many-to-one"
"#,
        );
        assert!(matches!(result, Err(Error::Toml(_))));
    }

    #[test]
    fn rejects_blank_fields() {
        let rule = CorrelationRule::new("a", " ", "id", "id", Relationship::OneToOne);
        assert!(matches!(RuleSet::new(vec![rule]), Err(Error::InvalidRule(_))));
    }

    #[test]
    fn empty_document_yields_empty_set() {
        let rules = RuleSet::from_toml_str("").expect("parse empty");
        assert!(rules.is_empty());
    }

    #[test]
    fn open_finance_defaults_start_at_consents() {
        let rules = RuleSet::open_finance();
        assert_eq!(rules.len(), 5);
        let first = &rules.as_slice()[0];
        assert_eq!(first.source_contract, "consents");
        assert_eq!(first.target_contract, "resources");
        assert_eq!(first.relationship.as_str(), "one-to-many");
    }
}
