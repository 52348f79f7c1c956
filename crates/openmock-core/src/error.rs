use thiserror::Error;

/// Core error type shared across openmock crates.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading a configuration file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// A rule file is not valid TOML for the expected layout.
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
    /// A correlation rule violates internal invariants.
    #[error("invalid rule: {0}")]
    InvalidRule(String),
}

/// Convenience alias for results returned by openmock crates.
pub type Result<T> = std::result::Result<T, Error>;
