//! # Node usage telemetry
//!
//! The resolver asks a [`NodeUsageProvider`] for live usage. Production
//! setups query the metrics server; disabled telemetry uses
//! [`NoopUsageProvider`], which always reports itself unavailable.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use shared::{
    api::{NODE_METRICS_PATH, NodeMetrics},
    models::resource::{CPU, MEMORY},
};

use crate::{config::MetricsConfig, errors::MetricsError};

/// Measured usage of one node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeUsage {
    pub cpu_millis: i64,
    pub memory_bytes: i64,
}

impl From<&NodeMetrics> for NodeUsage {
    fn from(metrics: &NodeMetrics) -> Self {
        NodeUsage {
            cpu_millis: metrics.usage.get(CPU).map_or(0, |q| q.milli_value()),
            memory_bytes: metrics.usage.get(MEMORY).map_or(0, |q| q.value()),
        }
    }
}

#[async_trait]
pub trait NodeUsageProvider: Send + Sync {
    async fn node_usage(&self, node_name: &str) -> Result<NodeUsage, MetricsError>;
}

pub struct NoopUsageProvider;

#[async_trait]
impl NodeUsageProvider for NoopUsageProvider {
    async fn node_usage(&self, _node_name: &str) -> Result<NodeUsage, MetricsError> {
        Err(MetricsError::Disabled)
    }
}

/// Client for the node metrics endpoint of the metrics API.
pub struct MetricsServerClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl MetricsServerClient {
    pub fn new(config: &MetricsConfig) -> Result<Self, MetricsError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.server_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    fn node_url(&self, node_name: &str) -> String {
        format!("{}{}/{}", self.base_url, NODE_METRICS_PATH, node_name)
    }
}

#[async_trait]
impl NodeUsageProvider for MetricsServerClient {
    async fn node_usage(&self, node_name: &str) -> Result<NodeUsage, MetricsError> {
        let mut req = self.client.get(self.node_url(node_name));
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await?;
        match resp.status() {
            status if status.is_success() => {}
            StatusCode::NOT_FOUND => return Err(MetricsError::NotFound(node_name.to_string())),
            status => return Err(MetricsError::Status(status.as_u16())),
        }

        let metrics = resp
            .json::<NodeMetrics>()
            .await
            .map_err(|e| MetricsError::Decode(e.to_string()))?;
        tracing::trace!(node=%node_name, window=?metrics.window, "Fetched node metrics");
        Ok(NodeUsage::from(&metrics))
    }
}
