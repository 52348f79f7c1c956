use std::collections::BTreeMap;

use openmock_core::{
    Contract, FieldFormat, FieldKind, FieldType, HttpMethod, MockedData, Record, SchemaField,
};
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cache::CorrelationIdCache;
use crate::generators::primitives::digit_pattern_length;
use crate::generators::{GeneratorContext, GeneratorRegistry};
use crate::locale::LocaleKey;
use crate::model::{GenerateOptions, GenerationReport};

const ARRAY_MIN_ITEMS: usize = 1;
const ARRAY_MAX_ITEMS: usize = 5;

/// Field-name keywords tried, in order, for plain string fields.
const KEYWORD_GENERATORS: &[(&str, &str)] = &[
    ("name", "semantic.br.name"),
    ("address", "semantic.br.address"),
    ("city", "semantic.br.city"),
    ("state", "semantic.br.state"),
    ("country", "semantic.br.country"),
    ("code", "semantic.br.code"),
    ("description", "semantic.br.description"),
];

/// Produces mock records for contract schemas.
///
/// One seeded `ChaCha8Rng` drives the whole generator, so two generators
/// built with the same seed produce the same value sequence.
#[derive(Debug)]
pub struct MockGenerator {
    options: GenerateOptions,
    seed: u64,
    rng: ChaCha8Rng,
    registry: GeneratorRegistry,
    cache: CorrelationIdCache,
    last_report: Option<GenerationReport>,
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new(GenerateOptions::default())
    }
}

impl MockGenerator {
    pub fn new(options: GenerateOptions) -> Self {
        Self::with_registry(options, GeneratorRegistry::with_defaults())
    }

    /// Build a generator around a custom registry. Ids missing from the
    /// registry yield `null` values.
    pub fn with_registry(options: GenerateOptions, registry: GeneratorRegistry) -> Self {
        let seed = options.seed.unwrap_or_else(|| rand::rng().random());
        Self {
            options,
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
            registry,
            cache: CorrelationIdCache::new(),
            last_report: None,
        }
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    /// Seed in effect, drawn at construction when none was configured.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn registry(&self) -> &GeneratorRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &CorrelationIdCache {
        &self.cache
    }

    /// Last id produced for `consent`, `account` or `customer`.
    pub fn correlation_id(&self, id_type: &str) -> Option<&str> {
        self.cache.correlation_id(id_type)
    }

    /// Top-level correlation fields last seen for `<category>:<schema>`.
    pub fn correlation_ids(&self, category: &str, schema: &str) -> Option<&BTreeMap<String, String>> {
        self.cache.correlation_ids(category, schema)
    }

    /// Report of the most recent `generate_for_*` call.
    pub fn last_report(&self) -> Option<&GenerationReport> {
        self.last_report.as_ref()
    }

    /// Generate `count` records for every schema of `contract`.
    pub fn generate_for_contract(&mut self, contract: &Contract, count: usize) -> Vec<MockedData> {
        let mut report = GenerationReport::new(&contract.name, self.seed);
        let mut records = Vec::with_capacity(contract.schemas.len() * count);

        for (schema_name, schema) in &contract.schemas {
            self.generate_schema(contract, schema_name, schema, count, &mut report, &mut records);
        }

        self.finish(report);
        records
    }

    /// Generate `count` records for one schema; `None` when the contract has
    /// no schema by that name.
    pub fn generate_for_schema(
        &mut self,
        contract: &Contract,
        schema_name: &str,
        count: usize,
    ) -> Option<Vec<MockedData>> {
        let Some(schema) = contract.schema(schema_name) else {
            debug!(contract = %contract.name, schema = schema_name, "schema not found");
            return None;
        };

        let mut report = GenerationReport::new(&contract.name, self.seed);
        let mut records = Vec::with_capacity(count);
        self.generate_schema(contract, schema_name, schema, count, &mut report, &mut records);
        self.finish(report);
        Some(records)
    }

    /// Generate one mocked response for the endpoint at `path` and `method`.
    ///
    /// `None` when the contract declares no such endpoint, when the endpoint
    /// has no `$ref` response schema, or when that schema is missing.
    pub fn generate_for_endpoint(
        &mut self,
        contract: &Contract,
        path: &str,
        method: HttpMethod,
    ) -> Option<MockedData> {
        let Some(endpoint) = contract.endpoint(path, method) else {
            debug!(contract = %contract.name, %method, path, "endpoint not found");
            return None;
        };
        let schema_name = endpoint.response_schema.as_deref()?;
        self.generate_for_schema(contract, schema_name, 1)?.pop()
    }

    fn generate_schema(
        &mut self,
        contract: &Contract,
        schema_name: &str,
        schema: &SchemaField,
        count: usize,
        report: &mut GenerationReport,
        records: &mut Vec<MockedData>,
    ) {
        for _ in 0..count {
            let data = RecordBuilder {
                registry: &self.registry,
                rng: &mut self.rng,
                cache: &mut self.cache,
                locale: self.options.locale,
                report: &mut *report,
            }
            .build(schema);
            let ids = self
                .cache
                .ingest_record(&contract.category, schema_name, &data);
            records.push(
                MockedData::new(schema_name, contract.name.as_str(), data)
                    .with_correlation_ids(ids),
            );
        }

        report.record_schema(schema_name, count as u64);
        debug!(
            contract = %contract.name,
            schema = schema_name,
            records = count,
            "schema generated"
        );
    }

    fn finish(&mut self, report: GenerationReport) {
        info!(
            contract = %report.contract,
            seed = report.seed,
            schemas = report.schemas.len(),
            records = report.records_generated,
            examples = report.example_count,
            enums = report.enum_count,
            "mock generation finished"
        );
        debug!(usage = ?report.generator_usage, "generator usage");
        self.last_report = Some(report);
    }
}

/// Per-record view over the generator's registry, rng and cache.
struct RecordBuilder<'a> {
    registry: &'a GeneratorRegistry,
    rng: &'a mut ChaCha8Rng,
    cache: &'a mut CorrelationIdCache,
    locale: LocaleKey,
    report: &'a mut GenerationReport,
}

impl RecordBuilder<'_> {
    /// A top-level `$ref` becomes a placeholder; other non-objects are empty.
    fn build(mut self, schema: &SchemaField) -> Record {
        if let Some(reference) = schema.reference_name() {
            self.report.record_reference();
            let mut record = Record::new();
            record.insert("$ref".to_string(), Value::String(reference.to_string()));
            return record;
        }

        match &schema.kind {
            FieldKind::Object { properties, .. } => self.object(properties),
            _ => Record::new(),
        }
    }

    fn object(&mut self, properties: &BTreeMap<String, SchemaField>) -> Record {
        properties
            .iter()
            .map(|(name, field)| (name.clone(), self.field_value(name, field)))
            .collect()
    }

    fn field_value(&mut self, name: &str, field: &SchemaField) -> Value {
        if let Some(example) = &field.example {
            self.report.record_example();
            return example.clone();
        }

        match &field.kind {
            FieldKind::Array { items } => {
                let count = self.rng.random_range(ARRAY_MIN_ITEMS..=ARRAY_MAX_ITEMS);
                return match items {
                    Some(items) => {
                        let item_name = format!("{name}_item");
                        Value::Array(
                            (0..count)
                                .map(|_| self.field_value(&item_name, items))
                                .collect(),
                        )
                    }
                    None => Value::Array(Vec::new()),
                };
            }
            FieldKind::Object { properties, .. } => {
                return Value::Object(self.object(properties));
            }
            _ => {}
        }

        if let Some(values) = field
            .validation
            .as_ref()
            .and_then(|validation| validation.enum_values())
        {
            if let Some(value) = values.choose(&mut *self.rng) {
                self.report.record_enum();
                return value.clone();
            }
        }

        self.typed_value(name, field)
    }

    fn typed_value(&mut self, name: &str, field: &SchemaField) -> Value {
        let lower = name.to_lowercase();

        if lower.contains("consent") && lower.contains("id") {
            return self.tagged_id("semantic.br.urn", "consent", field);
        }
        if lower == "accountid" {
            return self.tagged_id("primitive.uuid", "account", field);
        }
        if lower == "customerid" {
            return self.tagged_id("primitive.uuid", "customer", field);
        }
        if lower.contains("cpf") {
            return self.run("semantic.br.cpf", field);
        }
        if lower.contains("cnpj") {
            return self.run("semantic.br.cnpj", field);
        }
        if lower.contains("phone") || lower.contains("telephone") {
            return self.run("semantic.br.phone", field);
        }
        if lower.contains("email") {
            return self.run("semantic.br.email", field);
        }

        match field.field_type() {
            FieldType::String => self.run(string_generator_id(&lower, field), field),
            FieldType::Integer => self.run("primitive.int", field),
            FieldType::Number => self.run("primitive.number", field),
            FieldType::Boolean => self.run("primitive.bool", field),
            FieldType::Array | FieldType::Object => Value::Null,
        }
    }

    fn tagged_id(&mut self, id: &str, id_type: &str, field: &SchemaField) -> Value {
        let value = self.run(id, field);
        if let Value::String(text) = &value {
            self.cache.store_id(id_type, text);
        }
        value
    }

    fn run(&mut self, id: &str, field: &SchemaField) -> Value {
        let Some(generator) = self.registry.get(id) else {
            warn!(generator = id, field = %field.name, "generator not registered");
            return Value::Null;
        };
        self.report.record_generator_usage(id);
        generator.generate(&GeneratorContext::new(field, self.locale), &mut *self.rng)
    }
}

/// Generator for a plain string field: declared format, then declared
/// pattern, then field-name keywords, then free text.
fn string_generator_id(lower_name: &str, field: &SchemaField) -> &'static str {
    let validation = field.validation.as_ref();

    match validation.and_then(|validation| validation.format) {
        Some(FieldFormat::Date) => return "primitive.date",
        Some(FieldFormat::DateTime) => return "primitive.datetime",
        Some(FieldFormat::Email) => return "semantic.br.email",
        Some(FieldFormat::Uuid) => return "primitive.uuid",
        Some(FieldFormat::Uri) => return "primitive.uri",
        _ => {}
    }

    if let Some(pattern) = validation.and_then(|validation| validation.pattern.as_deref()) {
        return pattern_generator_id(pattern);
    }

    KEYWORD_GENERATORS
        .iter()
        .find(|(keyword, _)| lower_name.contains(keyword))
        .map(|(_, id)| *id)
        .unwrap_or("primitive.text")
}

fn pattern_generator_id(pattern: &str) -> &'static str {
    if pattern == r"^\d{11}$" {
        "semantic.br.cpf"
    } else if pattern == r"^\d{14}$" {
        "semantic.br.cnpj"
    } else if pattern.starts_with("^urn:") {
        "semantic.br.urn"
    } else if pattern.contains(r"\d{4}-\d{2}-\d{2}") {
        "primitive.date"
    } else if pattern.to_lowercase().contains("uuid") {
        "primitive.uuid"
    } else if digit_pattern_length(pattern).is_some() {
        "primitive.digits"
    } else {
        "primitive.pattern"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openmock_core::FieldValidation;

    fn string_with(validation: FieldValidation) -> SchemaField {
        SchemaField::of_type("value", FieldType::String).with_validation(validation)
    }

    #[test]
    fn format_beats_pattern() {
        let field = string_with(FieldValidation {
            format: Some(FieldFormat::Date),
            pattern: Some(r"^\d{11}$".to_string()),
            ..FieldValidation::default()
        });
        assert_eq!(string_generator_id("value", &field), "primitive.date");
    }

    #[test]
    fn pattern_dispatch() {
        assert_eq!(pattern_generator_id(r"^\d{11}$"), "semantic.br.cpf");
        assert_eq!(pattern_generator_id(r"^\d{14}$"), "semantic.br.cnpj");
        assert_eq!(pattern_generator_id(r"^urn:[a-z]+$"), "semantic.br.urn");
        assert_eq!(pattern_generator_id(r"^\d{4}-\d{2}-\d{2}T.*$"), "primitive.date");
        assert_eq!(pattern_generator_id(r"^[0-9a-f-]+UUID$"), "primitive.uuid");
        assert_eq!(pattern_generator_id(r"^\d{8}$"), "primitive.digits");
        assert_eq!(pattern_generator_id(r"^[A-Z]{2}$"), "primitive.pattern");
    }

    #[test]
    fn keywords_apply_in_order() {
        let field = SchemaField::of_type("x", FieldType::String);
        assert_eq!(string_generator_id("cityname", &field), "semantic.br.name");
        assert_eq!(string_generator_id("countrycode", &field), "semantic.br.country");
        assert_eq!(string_generator_id("postalcode", &field), "semantic.br.code");
        assert_eq!(string_generator_id("remarks", &field), "primitive.text");
    }
}
