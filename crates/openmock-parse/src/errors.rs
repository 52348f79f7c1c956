use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading or decoding a single contract document.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
    #[error("invalid document: {0}")]
    InvalidDocument(String),
}

/// Result type for parser operations.
pub type Result<T> = std::result::Result<T, ParseError>;
