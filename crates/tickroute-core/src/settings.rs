//! Runtime settings.
//!
//! Precedence, lowest to highest: built-in defaults, JSON config file,
//! `TICKROUTE_*` environment variables. Command-line flags are applied on top
//! by the binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::chain::DEFAULT_MIN_NEWS_LEN;
use crate::filter::DEFAULT_FILTER_CACHE_CAPACITY;
use crate::ConfigError;

pub const ENV_PREFIX: &str = "TICKROUTE_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the data gateway. Without it every provider is unconfigured.
    pub gateway_url: Option<String>,
    /// Per-provider call timeout; zero disables the timeout decorator.
    pub request_timeout_ms: u64,
    /// Minimum trimmed length for a news result to count as a success.
    pub min_news_len: usize,
    pub filter_cache_capacity: usize,
    pub filter_cache_ttl_secs: Option<u64>,
    /// `term<TAB>weight` lexicon used by the local-model relevance layer.
    pub local_model_path: Option<PathBuf>,
    pub log_level: String,
    pub log_format: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gateway_url: None,
            request_timeout_ms: 10_000,
            min_news_len: DEFAULT_MIN_NEWS_LEN,
            filter_cache_capacity: DEFAULT_FILTER_CACHE_CAPACITY,
            filter_cache_ttl_secs: None,
            local_model_path: None,
            log_level: String::from("info"),
            log_format: String::from("pretty"),
        }
    }
}

impl Settings {
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Defaults overridden by `TICKROUTE_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides(|name| std::env::var(name).ok())
    }

    /// Config file (when given) overridden by the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => Self::from_json_file(path)?,
            None => Self::default(),
        };
        base.with_env_overrides(|name| std::env::var(name).ok())
    }

    /// Applies overrides from `lookup`, which maps a full variable name
    /// (`TICKROUTE_GATEWAY_URL`) to its value.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(&format!("{ENV_PREFIX}{key}"))
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        if let Some(value) = var("GATEWAY_URL") {
            self.gateway_url = Some(value);
        }
        if let Some(value) = var("REQUEST_TIMEOUT_MS") {
            self.request_timeout_ms = parse_value("request_timeout_ms", &value)?;
        }
        if let Some(value) = var("MIN_NEWS_LEN") {
            self.min_news_len = parse_value("min_news_len", &value)?;
        }
        if let Some(value) = var("FILTER_CACHE_CAPACITY") {
            self.filter_cache_capacity = parse_value("filter_cache_capacity", &value)?;
        }
        if let Some(value) = var("FILTER_CACHE_TTL_SECS") {
            self.filter_cache_ttl_secs = Some(parse_value("filter_cache_ttl_secs", &value)?);
        }
        if let Some(value) = var("LOCAL_MODEL_PATH") {
            self.local_model_path = Some(PathBuf::from(value));
        }
        if let Some(value) = var("LOG_LEVEL") {
            self.log_level = value;
        }
        if let Some(value) = var("LOG_FORMAT") {
            self.log_format = value;
        }

        Ok(self)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_ms > 0).then(|| Duration::from_millis(self.request_timeout_ms))
    }

    pub fn filter_cache_ttl(&self) -> Option<Duration> {
        self.filter_cache_ttl_secs.map(Duration::from_secs)
    }
}

fn parse_value<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.parse::<T>().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_owned(),
    })
}
