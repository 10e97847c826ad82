//! Plugin arguments and telemetry settings.
//!
//! `AllocatableArgs` is the declarative plugin config, usually embedded in a
//! scheduler profile. `MetricsConfig` comes from the process environment.

use std::{env, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{allocatable::ScoringMode, errors::ConfigError};

pub const DEFAULT_METRICS_SERVER_URL: &str = "https://kubernetes.default.svc";
pub const DEFAULT_METRICS_TIMEOUT_MS: u64 = 1000;

/// One weighted resource entry from the plugin args.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResourceSpec {
    pub name: String,
    pub weight: i64,
}

impl ResourceSpec {
    pub fn new(name: &str, weight: i64) -> Self {
        ResourceSpec {
            name: name.to_string(),
            weight,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocatableArgs {
    /// Defaults to `Least` when absent.
    #[serde(default)]
    pub mode: Option<ScoringMode>,
    /// Replaces the default weight table when non-empty.
    #[serde(default)]
    pub resources: Vec<ResourceSpec>,
    /// Query the metrics server for live usage.
    #[serde(default)]
    pub metrics_enabled: bool,
}

impl AllocatableArgs {
    pub fn from_yaml(input: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn from_json(input: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

/// Metrics server connection settings.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    pub server_url: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        MetricsConfig {
            server_url: DEFAULT_METRICS_SERVER_URL.to_string(),
            token: None,
            timeout: Duration::from_millis(DEFAULT_METRICS_TIMEOUT_MS),
        }
    }
}

impl MetricsConfig {
    /// Loads metrics settings from environment variables.
    ///
    /// Falls back to defaults when unset or unparsable.
    pub fn from_env() -> Self {
        let mut config = MetricsConfig::default();

        if let Ok(url) = env::var("METRICS_SERVER_URL") {
            config.server_url = url;
        }

        config.token = env::var("METRICS_SERVER_TOKEN")
            .ok()
            .filter(|t| !t.is_empty());

        if let Some(ms) = env::var("METRICS_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            config.timeout = Duration::from_millis(ms);
        }

        config
    }
}
