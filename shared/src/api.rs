use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::ResourceList;

/// Path of the node metrics resource served by the metrics API.
pub const NODE_METRICS_PATH: &str = "/apis/metrics.k8s.io/v1beta1/nodes";

/// Usage sample for one node, as returned by the metrics server.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NodeMetrics {
    pub metadata: MetricsMetadata,
    pub timestamp: Option<DateTime<Utc>>,
    pub window: Option<String>,
    pub usage: ResourceList,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetricsMetadata {
    pub name: String,
    #[serde(rename = "creationTimestamp", default)]
    pub created_at: Option<DateTime<Utc>>,
}
