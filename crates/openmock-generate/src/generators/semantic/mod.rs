use fake::Fake;
use fake::faker::address::raw::{BuildingNumber, CityName, StateAbbr, StreetName};
use fake::faker::internet::raw::SafeEmail;
use fake::faker::lorem::raw::Sentence;
use fake::faker::name::raw::Name;
use fake::locales::{EN, PT_BR};
use rand::{Rng, RngCore};
use serde_json::Value;

use crate::generators::{Generator, GeneratorContext, GeneratorRegistry, random_uuid};
use crate::locale::LocaleKey;

const CNPJ_FIRST_WEIGHTS: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
const CNPJ_SECOND_WEIGHTS: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

pub fn register(registry: &mut GeneratorRegistry) {
    registry.register_generator(Box::new(CpfGenerator));
    registry.register_generator(Box::new(CnpjGenerator));
    registry.register_generator(Box::new(PhoneBrGenerator));
    registry.register_generator(Box::new(EmailGenerator));
    registry.register_generator(Box::new(UrnGenerator));
    registry.register_generator(Box::new(NameGenerator));
    registry.register_generator(Box::new(AddressGenerator));
    registry.register_generator(Box::new(CityGenerator));
    registry.register_generator(Box::new(StateGenerator));
    registry.register_generator(Box::new(CountryGenerator));
    registry.register_generator(Box::new(CodeGenerator));
    registry.register_generator(Box::new(DescriptionGenerator));
}

/// Build a faker for the run locale and draw a string from it.
macro_rules! localized {
    ($locale:expr, $rng:expr, |$l:ident| $faker:expr) => {
        match $locale {
            LocaleKey::PtBr => {
                let $l = PT_BR;
                let value: String = $faker.fake_with_rng($rng);
                value
            }
            LocaleKey::EnUs => {
                let $l = EN;
                let value: String = $faker.fake_with_rng($rng);
                value
            }
        }
    };
}

struct CpfGenerator;

impl Generator for CpfGenerator {
    fn id(&self) -> &'static str {
        "semantic.br.cpf"
    }

    fn generate(&self, _ctx: &GeneratorContext<'_>, rng: &mut dyn RngCore) -> Value {
        let mut digits = [0_u8; 11];
        for digit in digits.iter_mut().take(9) {
            *digit = rng.random_range(0..=9);
        }
        digits[9] = cpf_check_digit(&digits[..9]);
        digits[10] = cpf_check_digit(&digits[..10]);
        Value::String(to_text(&digits))
    }
}

struct CnpjGenerator;

impl Generator for CnpjGenerator {
    fn id(&self) -> &'static str {
        "semantic.br.cnpj"
    }

    fn generate(&self, _ctx: &GeneratorContext<'_>, rng: &mut dyn RngCore) -> Value {
        let mut digits = [0_u8; 14];
        for digit in digits.iter_mut().take(12) {
            *digit = rng.random_range(0..=9);
        }
        digits[12] = cnpj_check_digit(&digits[..12], &CNPJ_FIRST_WEIGHTS);
        digits[13] = cnpj_check_digit(&digits[..13], &CNPJ_SECOND_WEIGHTS);
        Value::String(to_text(&digits))
    }
}

/// `+55`, a two-digit area code, then a nine-digit mobile number.
struct PhoneBrGenerator;

impl Generator for PhoneBrGenerator {
    fn id(&self) -> &'static str {
        "semantic.br.phone"
    }

    fn generate(&self, _ctx: &GeneratorContext<'_>, rng: &mut dyn RngCore) -> Value {
        let ddd = rng.random_range(11..=99);
        let number = rng.random_range(900_000_000..=999_999_999_u32);
        Value::String(format!("+55{ddd}{number}"))
    }
}

struct EmailGenerator;

impl Generator for EmailGenerator {
    fn id(&self) -> &'static str {
        "semantic.br.email"
    }

    fn generate(&self, ctx: &GeneratorContext<'_>, rng: &mut dyn RngCore) -> Value {
        Value::String(localized!(ctx.locale, rng, |l| SafeEmail(l)))
    }
}

/// Open Finance style resource URN.
struct UrnGenerator;

impl Generator for UrnGenerator {
    fn id(&self) -> &'static str {
        "semantic.br.urn"
    }

    fn generate(&self, _ctx: &GeneratorContext<'_>, rng: &mut dyn RngCore) -> Value {
        Value::String(format!("urn:bancoex:{}", random_uuid(rng)))
    }
}

struct NameGenerator;

impl Generator for NameGenerator {
    fn id(&self) -> &'static str {
        "semantic.br.name"
    }

    fn generate(&self, ctx: &GeneratorContext<'_>, rng: &mut dyn RngCore) -> Value {
        ctx.fit_declared(localized!(ctx.locale, rng, |l| Name(l)))
    }
}

struct AddressGenerator;

impl Generator for AddressGenerator {
    fn id(&self) -> &'static str {
        "semantic.br.address"
    }

    fn generate(&self, ctx: &GeneratorContext<'_>, rng: &mut dyn RngCore) -> Value {
        let street = localized!(ctx.locale, rng, |l| StreetName(l));
        let number = localized!(ctx.locale, rng, |l| BuildingNumber(l));
        let city = localized!(ctx.locale, rng, |l| CityName(l));
        ctx.fit_declared(format!("{street}, {number} - {city}"))
    }
}

struct CityGenerator;

impl Generator for CityGenerator {
    fn id(&self) -> &'static str {
        "semantic.br.city"
    }

    fn generate(&self, ctx: &GeneratorContext<'_>, rng: &mut dyn RngCore) -> Value {
        ctx.fit_declared(localized!(ctx.locale, rng, |l| CityName(l)))
    }
}

struct StateGenerator;

impl Generator for StateGenerator {
    fn id(&self) -> &'static str {
        "semantic.br.state"
    }

    fn generate(&self, ctx: &GeneratorContext<'_>, rng: &mut dyn RngCore) -> Value {
        ctx.fit_declared(localized!(ctx.locale, rng, |l| StateAbbr(l)))
    }
}

struct CountryGenerator;

impl Generator for CountryGenerator {
    fn id(&self) -> &'static str {
        "semantic.br.country"
    }

    fn generate(&self, ctx: &GeneratorContext<'_>, _rng: &mut dyn RngCore) -> Value {
        ctx.fit_declared("BRA".to_string())
    }
}

struct CodeGenerator;

impl Generator for CodeGenerator {
    fn id(&self) -> &'static str {
        "semantic.br.code"
    }

    fn generate(&self, ctx: &GeneratorContext<'_>, rng: &mut dyn RngCore) -> Value {
        ctx.fit_declared(rng.random_range(1000..=9999).to_string())
    }
}

struct DescriptionGenerator;

impl Generator for DescriptionGenerator {
    fn id(&self) -> &'static str {
        "semantic.br.description"
    }

    fn generate(&self, ctx: &GeneratorContext<'_>, rng: &mut dyn RngCore) -> Value {
        ctx.fit_declared(localized!(ctx.locale, rng, |l| Sentence(l, 4..10)))
    }
}

/// CPF check digit over 9 (first) or 10 (second) digits: weights count down
/// to 2, then `sum * 10 mod 11` with 10 mapped to 0.
pub fn cpf_check_digit(digits: &[u8]) -> u8 {
    let top = digits.len() as u32 + 1;
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(idx, digit)| u32::from(*digit) * (top - idx as u32))
        .sum();
    let digit = (sum * 10) % 11;
    if digit == 10 { 0 } else { digit as u8 }
}

pub fn cnpj_check_digit(digits: &[u8], weights: &[u32]) -> u8 {
    let sum: u32 = digits
        .iter()
        .zip(weights)
        .map(|(digit, weight)| u32::from(*digit) * weight)
        .sum();
    let remainder = sum % 11;
    if remainder < 2 {
        0
    } else {
        (11 - remainder) as u8
    }
}

/// Check digits of an 11-digit CPF string.
pub fn is_valid_cpf(value: &str) -> bool {
    let Some(digits) = parse_digits(value, 11) else {
        return false;
    };
    digits[9] == cpf_check_digit(&digits[..9]) && digits[10] == cpf_check_digit(&digits[..10])
}

/// Check digits of a 14-digit CNPJ string.
pub fn is_valid_cnpj(value: &str) -> bool {
    let Some(digits) = parse_digits(value, 14) else {
        return false;
    };
    digits[12] == cnpj_check_digit(&digits[..12], &CNPJ_FIRST_WEIGHTS)
        && digits[13] == cnpj_check_digit(&digits[..13], &CNPJ_SECOND_WEIGHTS)
}

fn parse_digits(value: &str, len: usize) -> Option<Vec<u8>> {
    if value.len() != len {
        return None;
    }
    value
        .chars()
        .map(|ch| ch.to_digit(10).map(|digit| digit as u8))
        .collect()
}

fn to_text(digits: &[u8]) -> String {
    digits.iter().map(|digit| char::from(b'0' + *digit)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use openmock_core::{FieldType, FieldValidation, SchemaField};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn run(id: &str, field: &SchemaField, rng: &mut ChaCha8Rng) -> String {
        let registry = GeneratorRegistry::with_defaults();
        let generator = registry.get(id).expect("registered generator");
        generator
            .generate(&GeneratorContext::new(field, LocaleKey::PtBr), rng)
            .as_str()
            .expect("string value")
            .to_string()
    }

    #[test]
    fn known_documents_validate() {
        assert!(is_valid_cpf("52998224725"));
        assert!(!is_valid_cpf("52998224726"));
        assert!(!is_valid_cpf("5299822472"));
        assert!(is_valid_cnpj("11222333000181"));
        assert!(!is_valid_cnpj("11222333000182"));
        assert!(!is_valid_cnpj("1122233300018a"));
    }

    #[test]
    fn generated_cpfs_are_valid() {
        let field = SchemaField::of_type("cpf", FieldType::String);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..500 {
            let cpf = run("semantic.br.cpf", &field, &mut rng);
            assert_eq!(cpf.len(), 11);
            assert!(is_valid_cpf(&cpf), "{cpf}");
        }
    }

    #[test]
    fn generated_cnpjs_are_valid() {
        let field = SchemaField::of_type("cnpj", FieldType::String);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..500 {
            let cnpj = run("semantic.br.cnpj", &field, &mut rng);
            assert_eq!(cnpj.len(), 14);
            assert!(is_valid_cnpj(&cnpj), "{cnpj}");
        }
    }

    #[test]
    fn phone_has_brazilian_mobile_shape() {
        let field = SchemaField::of_type("phone", FieldType::String);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..100 {
            let phone = run("semantic.br.phone", &field, &mut rng);
            assert!(phone.starts_with("+55"));
            assert_eq!(phone.len(), 14);
            let ddd: u32 = phone[3..5].parse().expect("area code");
            assert!((11..=99).contains(&ddd));
            assert_eq!(&phone[5..6], "9");
        }
    }

    #[test]
    fn keyword_text_honours_declared_bounds() {
        let field = SchemaField::of_type("description", FieldType::String).with_validation(
            FieldValidation {
                min_length: Some(3),
                max_length: Some(12),
                ..FieldValidation::default()
            },
        );
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for id in ["semantic.br.description", "semantic.br.name", "semantic.br.address"] {
            let value = run(id, &field, &mut rng);
            assert!((3..=12).contains(&value.chars().count()), "{id}: {value}");
        }
    }

    #[test]
    fn urn_wraps_a_uuid() {
        let field = SchemaField::of_type("consentId", FieldType::String);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let urn = run("semantic.br.urn", &field, &mut rng);
        let id = urn.strip_prefix("urn:bancoex:").expect("urn prefix");
        assert!(uuid::Uuid::parse_str(id).is_ok());
    }
}
