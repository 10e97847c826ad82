use thiserror::Error;

/// Rejected plugin configuration. Fatal at construction.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid mode, got {0}")]
    InvalidMode(String),
    #[error("resource name must not be empty")]
    EmptyResourceName,
    #[error("resource weight of {name} should be a non-negative value, got {weight}")]
    NegativeWeight { name: String, weight: i64 },
    #[error("resource {0} is configured more than once")]
    DuplicateResource(String),
    #[error("no resources left to score, every configured weight is zero")]
    NoResources,
    #[error("failed to parse plugin args: {0}")]
    Parse(String),
    #[error("failed to build metrics client: {0}")]
    MetricsClient(String),
}

/// Per-call scoring failure reported to the host.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScoreError {
    #[error("node not found: {0}")]
    NodeNotFound(String),
    #[error("resources not found")]
    NoResourcesConfigured,
    #[error("scheduling cycle cancelled while scoring node {0}")]
    Cancelled(String),
}

/// Telemetry lookup failure. Absorbed by the resolver.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MetricsError {
    #[error("telemetry disabled")]
    Disabled,
    #[error("no metrics for node {0}")]
    NotFound(String),
    #[error("metrics server responded with status {0}")]
    Status(u16),
    #[error("metrics request timed out")]
    Timeout,
    #[error("metrics transport error: {0}")]
    Transport(String),
    #[error("invalid metrics payload: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for MetricsError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            MetricsError::Timeout
        } else if err.is_decode() {
            MetricsError::Decode(err.to_string())
        } else {
            MetricsError::Transport(err.to_string())
        }
    }
}
