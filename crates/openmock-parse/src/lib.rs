//! OpenAPI contract parsing.
//!
//! Turns JSON or YAML OpenAPI documents into normalized
//! [`openmock_core::Contract`] values. Parsing is lenient: unknown schema
//! types downgrade to objects and unreadable files are skipped during
//! directory scans.

pub mod category;
pub mod errors;
pub mod openapi;
pub mod options;
pub mod source;

pub use errors::{ParseError, Result};
pub use openapi::ContractParser;
pub use openapi::mapper::parse_schema_field;
pub use options::ParseOptions;
pub use source::DocumentFormat;
