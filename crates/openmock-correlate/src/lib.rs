//! Cross-contract correlation over generated records.
//!
//! The engine stores the latest record list per contract and answers
//! queries driven by a [`RuleSet`](openmock_core::RuleSet): related records
//! for a primary entity, rule chains between contracts, and the rule graph.

pub mod engine;
pub mod enrich;
pub mod graph;
pub mod path;

pub use engine::{CorrelatedDataSet, CorrelationEngine};
pub use enrich::contract_matches;
pub use graph::{correlation_chain, correlation_graph, rules_for_contract};
pub use path::{is_falsy, lookup_path, value_matches_text, values_equal};
