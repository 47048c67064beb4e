//! Error types for the award engine.

use thiserror::Error;

/// Errors raised while loading or validating the season configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error reading season config: {0}")]
    Io(#[from] std::io::Error),

    #[error("season config is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid season config: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ConfigError::Invalid(message.into())
    }
}
