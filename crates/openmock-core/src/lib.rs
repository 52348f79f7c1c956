//! Core contracts and helpers for openmock.
//!
//! This crate defines the normalized contract model produced by the parser,
//! the synthetic record type produced by the generator, and the correlation
//! rule set shared by the generator's callers and the correlation engine.

pub mod contract;
pub mod error;
pub mod record;
pub mod rules;
pub mod schema;

pub use contract::{Contract, EndpointPath, HttpMethod, UNKNOWN_CATEGORY};
pub use error::{Error, Result};
pub use record::{MockedData, Record};
pub use rules::{CorrelationRule, Relationship, RuleSet};
pub use schema::{FieldFormat, FieldKind, FieldType, FieldValidation, SchemaField};
