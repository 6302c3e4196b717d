//! Error types for the icr crate.

use thiserror::Error;

/// Crate-level error type.
#[derive(Error, Debug)]
pub enum IcrError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid phalange '{name}': {reason}")]
    InvalidPhalange { name: String, reason: String },
}

impl From<toml::de::Error> for IcrError {
    fn from(e: toml::de::Error) -> Self {
        IcrError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, IcrError>;

/// Failure of a service call itself, as opposed to a server refusing a request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Failed to call service {0}")]
    CallFailed(String),
}
