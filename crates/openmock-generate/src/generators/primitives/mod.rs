use std::sync::LazyLock;

use chrono::{Days, NaiveDate, SecondsFormat, Utc};
use fake::Fake;
use fake::faker::lorem::raw::{Sentence, Word};
use fake::locales::{EN, PT_BR};
use openmock_core::FieldValidation;
use rand::distr::Distribution;
use rand::{Rng, RngCore};
use rand_regex::Regex as RandRegex;
use regex::Regex;
use serde_json::{Number, Value};
use tracing::debug;

use crate::generators::{
    Generator, GeneratorContext, GeneratorRegistry, fit_length, random_digits, random_letters,
    random_uuid,
};
use crate::locale::LocaleKey;

pub const DEFAULT_MAXIMUM: i64 = 1_000_000;
/// Upper bound on generic text, whatever `max_length` declares.
pub const TEXT_LENGTH_CAP: usize = 50;
const PATTERN_DEFAULT_MAX: usize = 20;
const PATTERN_ATTEMPTS: usize = 16;
const DATE_SPAN_DAYS: u64 = 3650;

static DIGITS_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\^\\d\{(\d+)\}\$$").ok());

pub fn register(registry: &mut GeneratorRegistry) {
    registry.register_generator(Box::new(BoolGenerator));
    registry.register_generator(Box::new(IntGenerator));
    registry.register_generator(Box::new(NumberGenerator));
    registry.register_generator(Box::new(UuidGenerator));
    registry.register_generator(Box::new(DateGenerator));
    registry.register_generator(Box::new(DateTimeGenerator));
    registry.register_generator(Box::new(UriGenerator));
    registry.register_generator(Box::new(DigitsGenerator));
    registry.register_generator(Box::new(PatternGenerator));
    registry.register_generator(Box::new(TextGenerator));
}

/// Length of a `^\d{N}$` pattern.
pub fn digit_pattern_length(pattern: &str) -> Option<usize> {
    DIGITS_PATTERN
        .as_ref()?
        .captures(pattern)?
        .get(1)?
        .as_str()
        .parse()
        .ok()
}

/// Integer bounds, defaulting to `[0, 1_000_000]`. When the two sides
/// conflict, the declared side wins.
pub fn int_bounds(validation: Option<&FieldValidation>) -> (i64, i64) {
    let declared_min = validation.and_then(|validation| validation.minimum);
    let declared_max = validation.and_then(|validation| validation.maximum);
    let min = declared_min.map(|value| value.ceil() as i64).unwrap_or(0);
    let max = declared_max
        .map(|value| value.floor() as i64)
        .unwrap_or(DEFAULT_MAXIMUM);

    if min <= max {
        (min, max)
    } else if declared_max.is_some() && declared_min.is_none() {
        (max, max)
    } else {
        (min, min)
    }
}

/// Number bounds with the same defaults and conflict rule as [`int_bounds`].
pub fn number_bounds(validation: Option<&FieldValidation>) -> (f64, f64) {
    let declared_min = validation.and_then(|validation| validation.minimum);
    let declared_max = validation.and_then(|validation| validation.maximum);
    let min = declared_min.unwrap_or(0.0);
    let max = declared_max.unwrap_or(DEFAULT_MAXIMUM as f64);

    if min <= max {
        (min, max)
    } else if declared_max.is_some() && declared_min.is_none() {
        (max, max)
    } else {
        (min, min)
    }
}

struct BoolGenerator;

impl Generator for BoolGenerator {
    fn id(&self) -> &'static str {
        "primitive.bool"
    }

    fn generate(&self, _ctx: &GeneratorContext<'_>, rng: &mut dyn RngCore) -> Value {
        Value::Bool(rng.random_bool(0.5))
    }
}

struct IntGenerator;

impl Generator for IntGenerator {
    fn id(&self) -> &'static str {
        "primitive.int"
    }

    fn generate(&self, ctx: &GeneratorContext<'_>, rng: &mut dyn RngCore) -> Value {
        let (min, max) = int_bounds(ctx.validation());
        Value::from(rng.random_range(min..=max))
    }
}

struct NumberGenerator;

impl Generator for NumberGenerator {
    fn id(&self) -> &'static str {
        "primitive.number"
    }

    fn generate(&self, ctx: &GeneratorContext<'_>, rng: &mut dyn RngCore) -> Value {
        let (min, max) = number_bounds(ctx.validation());
        // Interpolated so that spans wider than f64::MAX stay finite.
        let t: f64 = rng.random();
        let raw = if min < max {
            (min * (1.0 - t) + max * t).clamp(min, max)
        } else {
            min
        };
        let scaled = raw * 100.0;
        let rounded = if scaled.is_finite() {
            (scaled.round() / 100.0).clamp(min, max)
        } else {
            raw
        };
        Number::from_f64(rounded)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

struct UuidGenerator;

impl Generator for UuidGenerator {
    fn id(&self) -> &'static str {
        "primitive.uuid"
    }

    fn generate(&self, _ctx: &GeneratorContext<'_>, rng: &mut dyn RngCore) -> Value {
        Value::String(random_uuid(rng))
    }
}

/// Calendar dates within the ten years before 2024-01-01.
struct DateGenerator;

impl Generator for DateGenerator {
    fn id(&self) -> &'static str {
        "primitive.date"
    }

    fn generate(&self, _ctx: &GeneratorContext<'_>, rng: &mut dyn RngCore) -> Value {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();
        let offset = rng.random_range(0..=DATE_SPAN_DAYS);
        let date = base.checked_sub_days(Days::new(offset)).unwrap_or(base);
        Value::String(date.format("%Y-%m-%d").to_string())
    }
}

/// Current UTC instant, RFC 3339 with a `Z` suffix.
struct DateTimeGenerator;

impl Generator for DateTimeGenerator {
    fn id(&self) -> &'static str {
        "primitive.datetime"
    }

    fn generate(&self, _ctx: &GeneratorContext<'_>, _rng: &mut dyn RngCore) -> Value {
        Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}

struct UriGenerator;

impl Generator for UriGenerator {
    fn id(&self) -> &'static str {
        "primitive.uri"
    }

    fn generate(&self, ctx: &GeneratorContext<'_>, rng: &mut dyn RngCore) -> Value {
        let segment: String = match ctx.locale {
            LocaleKey::PtBr => Word(PT_BR).fake_with_rng(rng),
            LocaleKey::EnUs => Word(EN).fake_with_rng(rng),
        };
        let segment: String = segment
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect::<String>()
            .to_lowercase();
        let page = rng.random_range(1..=9999);
        Value::String(format!("https://www.example.com/{segment}/{page}"))
    }
}

/// Fixed-width digit strings for `^\d{N}$` patterns.
struct DigitsGenerator;

impl Generator for DigitsGenerator {
    fn id(&self) -> &'static str {
        "primitive.digits"
    }

    fn generate(&self, ctx: &GeneratorContext<'_>, rng: &mut dyn RngCore) -> Value {
        let len = ctx
            .pattern()
            .and_then(digit_pattern_length)
            .unwrap_or_else(|| ctx.length_bounds(1, PATTERN_DEFAULT_MAX).0.max(1));
        Value::String(random_digits(rng, len))
    }
}

/// Strings shaped by an arbitrary declared pattern, within `[min_length,
/// max_length]` (default `[1, 20]`). Patterns that cannot be compiled or
/// sampled within bounds fall back to random letters.
struct PatternGenerator;

impl Generator for PatternGenerator {
    fn id(&self) -> &'static str {
        "primitive.pattern"
    }

    fn generate(&self, ctx: &GeneratorContext<'_>, rng: &mut dyn RngCore) -> Value {
        let (min, max) = ctx.length_bounds(1, PATTERN_DEFAULT_MAX);

        if let Some(pattern) = ctx.pattern() {
            let max_repeat = u32::try_from(max).unwrap_or(u32::MAX);
            match RandRegex::compile(strip_anchors(pattern), max_repeat) {
                Ok(regex) => {
                    for _ in 0..PATTERN_ATTEMPTS {
                        let value: String = regex.sample(rng);
                        if (min..=max).contains(&value.chars().count()) {
                            return Value::String(value);
                        }
                    }
                    debug!(pattern, min, max, "pattern samples out of bounds, using letters");
                }
                Err(err) => {
                    debug!(pattern, error = %err, "pattern not sampleable, using letters");
                }
            }
        }

        let len = rng.random_range(min..=max);
        Value::String(random_letters(rng, len))
    }
}

/// Drop a leading `^` and an unescaped trailing `$`; samples are whole
/// strings already.
fn strip_anchors(pattern: &str) -> &str {
    let pattern = pattern.strip_prefix('^').unwrap_or(pattern);
    match pattern.strip_suffix('$') {
        Some(rest) if !rest.ends_with('\\') => rest,
        _ => pattern,
    }
}

/// Free text of length `[min_length, min(max_length, 50)]`, default `[1, 50]`.
struct TextGenerator;

impl Generator for TextGenerator {
    fn id(&self) -> &'static str {
        "primitive.text"
    }

    fn generate(&self, ctx: &GeneratorContext<'_>, rng: &mut dyn RngCore) -> Value {
        let (min, max) = ctx.length_bounds(1, TEXT_LENGTH_CAP);
        let upper = max.min(TEXT_LENGTH_CAP).max(min);
        let target = rng.random_range(min..=upper);

        let mut text = String::new();
        while text.chars().count() < target {
            let sentence: String = match ctx.locale {
                LocaleKey::PtBr => Sentence(PT_BR, 3..8).fake_with_rng(rng),
                LocaleKey::EnUs => Sentence(EN, 3..8).fake_with_rng(rng),
            };
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(&sentence);
        }
        let text: String = text.chars().take(target).collect();
        let text = text.trim_end().to_string();

        Value::String(fit_length(text, min, max))
    }
}
