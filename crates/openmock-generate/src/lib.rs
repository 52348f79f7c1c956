//! Schema-driven mock data generation for openmock.
//!
//! The engine walks a contract's schema trees and resolves every field
//! through a registry of named generators, producing records that honour
//! declared examples, enums, formats, patterns and numeric/length bounds.

pub mod cache;
pub mod engine;
pub mod generators;
pub mod locale;
pub mod model;

pub use cache::CorrelationIdCache;
pub use engine::MockGenerator;
pub use generators::{Generator, GeneratorContext, GeneratorRegistry};
pub use locale::LocaleKey;
pub use model::{GenerateOptions, GenerationReport};
