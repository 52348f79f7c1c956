use std::collections::BTreeMap;
use std::fmt;

use openmock_core::{FieldValidation, SchemaField};
use rand::{Rng, RngCore};
use serde_json::Value;

use crate::locale::LocaleKey;

pub mod primitives;
pub mod semantic;

/// A named producer of field values.
pub trait Generator: Send + Sync {
    fn id(&self) -> &'static str;

    fn generate(&self, ctx: &GeneratorContext<'_>, rng: &mut dyn RngCore) -> Value;
}

/// The field being generated and the run settings a generator may consult.
#[derive(Debug, Clone, Copy)]
pub struct GeneratorContext<'a> {
    pub field: &'a SchemaField,
    pub locale: LocaleKey,
}

impl<'a> GeneratorContext<'a> {
    pub fn new(field: &'a SchemaField, locale: LocaleKey) -> Self {
        Self { field, locale }
    }

    pub fn validation(&self) -> Option<&'a FieldValidation> {
        self.field.validation.as_ref()
    }

    pub fn pattern(&self) -> Option<&'a str> {
        self.validation()
            .and_then(|validation| validation.pattern.as_deref())
    }

    /// Declared `[min_length, max_length]`, with defaults for missing sides.
    /// A maximum below the minimum is raised to the minimum.
    pub fn length_bounds(&self, default_min: usize, default_max: usize) -> (usize, usize) {
        let validation = self.validation();
        let min = validation
            .and_then(|validation| validation.min_length)
            .unwrap_or(default_min);
        let max = validation
            .and_then(|validation| validation.max_length)
            .unwrap_or(default_max);
        (min, max.max(min))
    }

    /// Apply only the declared length bounds to `text`.
    pub fn fit_declared(&self, text: String) -> Value {
        let (min, max) = self.length_bounds(0, usize::MAX);
        Value::String(fit_length(text, min, max))
    }
}

/// Generators addressable by id.
#[derive(Default)]
pub struct GeneratorRegistry {
    generators: BTreeMap<&'static str, Box<dyn Generator>>,
}

impl GeneratorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in `primitive.*` and `semantic.br.*` generator.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        primitives::register(&mut registry);
        semantic::register(&mut registry);
        registry
    }

    /// Register a generator, returning the one it replaces.
    pub fn register_generator(
        &mut self,
        generator: Box<dyn Generator>,
    ) -> Option<Box<dyn Generator>> {
        self.generators.insert(generator.id(), generator)
    }

    pub fn get(&self, id: &str) -> Option<&dyn Generator> {
        self.generators.get(id).map(|generator| generator.as_ref())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.generators.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.generators.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }
}

impl fmt::Debug for GeneratorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorRegistry")
            .field("generators", &self.generators.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Truncate to `max` characters, then pad with `x` up to `min`.
pub fn fit_length(text: String, min: usize, max: usize) -> String {
    let mut text = if text.chars().count() > max {
        text.chars().take(max).collect()
    } else {
        text
    };
    let len = text.chars().count();
    if len < min {
        text.extend(std::iter::repeat_n('x', min - len));
    }
    text
}

pub fn random_digits(rng: &mut dyn RngCore, len: usize) -> String {
    (0..len)
        .map(|_| char::from(b'0' + rng.random_range(0..=9_u8)))
        .collect()
}

pub fn random_letters(rng: &mut dyn RngCore, len: usize) -> String {
    const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
    (0..len)
        .map(|_| char::from(LETTERS[rng.random_range(0..LETTERS.len())]))
        .collect()
}

/// Version 4 UUID drawn from `rng`, so seeded runs stay reproducible.
pub fn random_uuid(rng: &mut dyn RngCore) -> String {
    let mut bytes = [0_u8; 16];
    rng.fill_bytes(&mut bytes);
    uuid::Builder::from_random_bytes(bytes)
        .into_uuid()
        .to_string()
}
