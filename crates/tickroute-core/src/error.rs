use std::path::PathBuf;

use thiserror::Error;

use crate::filter::FilterError;
use crate::provider::ProviderError;

/// Validation errors for caller-supplied request parameters.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("ticker cannot be empty")]
    EmptyTicker,
    #[error("max_items must be greater than zero")]
    ZeroMaxItems,
    #[error("min_score must be within 0..=100, got {value}")]
    MinScoreOutOfRange { value: f64 },
    #[error("invalid market '{value}', expected one of a_share, hk_share, us_share")]
    InvalidMarket { value: String },
    #[error("invalid provider '{value}'")]
    InvalidProvider { value: String },
    #[error("invalid request kind '{value}', expected one of fundamentals, news")]
    InvalidRequestKind { value: String },
}

/// Errors raised while loading [`Settings`](crate::Settings).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error("runtime error: {0}")]
    Runtime(#[from] std::io::Error),
}
