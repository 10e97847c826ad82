//! Resolves `(allocatable, cost)` for one node and one resource.
//!
//! CPU and memory prefer live usage from the metrics provider. Everything
//! else, and any failed or suspicious telemetry read, uses the requests of the
//! pods already bound to the node.

use std::{
    sync::{Arc, LazyLock},
    time::Duration,
};

use dashmap::DashSet;
use serde::Serialize;
use shared::models::{
    NodeInfo,
    resource::{CPU, EPHEMERAL_STORAGE, MEMORY, PODS, is_scalar_resource_name},
};
use tokio_util::sync::CancellationToken;

use crate::{
    config::DEFAULT_METRICS_TIMEOUT_MS,
    errors::{MetricsError, ScoreError},
    metrics::{NodeUsage, NodeUsageProvider, NoopUsageProvider},
};

/// Resources already reported as ignored by this process.
static IGNORED_RESOURCES: LazyLock<DashSet<String>> = LazyLock::new(DashSet::new);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResourceValuePair {
    pub allocatable: i64,
    pub cost: i64,
}

impl ResourceValuePair {
    pub fn new(allocatable: i64, cost: i64) -> Self {
        Self { allocatable, cost }
    }
}

/// Whether the resolver knows how to read this resource from a node.
pub fn is_supported_resource(resource: &str) -> bool {
    matches!(resource, CPU | MEMORY | PODS | EPHEMERAL_STORAGE) || is_scalar_resource_name(resource)
}

/// Whether live telemetry can report this resource.
pub fn is_measurable_resource(resource: &str) -> bool {
    matches!(resource, CPU | MEMORY)
}

/// Logs an unsupported resource at most once per process. Returns whether
/// this call logged.
pub(crate) fn warn_unsupported(resource: &str) -> bool {
    let first = IGNORED_RESOURCES.insert(resource.to_string());
    if first {
        tracing::warn!(%resource, "Requested resource not considered for node score calculation");
    }
    first
}

/// Request based estimate, used when no trustworthy usage is available.
pub fn static_estimate(info: &NodeInfo, resource: &str) -> ResourceValuePair {
    match resource {
        CPU => ResourceValuePair::new(info.allocatable.milli_cpu, info.non_zero_requested.milli_cpu),
        MEMORY => ResourceValuePair::new(info.allocatable.memory, info.non_zero_requested.memory),
        PODS => ResourceValuePair::new(info.allocatable.allowed_pod_number, info.pods.len() as i64),
        EPHEMERAL_STORAGE => ResourceValuePair::new(
            info.allocatable.ephemeral_storage,
            info.requested.ephemeral_storage,
        ),
        other if is_scalar_resource_name(other) => {
            ResourceValuePair::new(info.allocatable.scalar(other), info.requested.scalar(other))
        }
        other => {
            warn_unsupported(other);
            ResourceValuePair::default()
        }
    }
}

/// Pairs a resource with a usage reading, falling back to [`static_estimate`]
/// when there is no reading or the reading is zero.
pub fn resolve(info: &NodeInfo, resource: &str, usage: Option<&NodeUsage>) -> ResourceValuePair {
    let node = info.node().map(|n| n.name.as_str()).unwrap_or_default();
    match (resource, usage) {
        (CPU, Some(usage)) => {
            if usage.cpu_millis == 0 {
                tracing::info!(%node, "Node CPU usage from metrics server is 0, using requests instead");
                return static_estimate(info, resource);
            }
            ResourceValuePair::new(info.allocatable.milli_cpu, usage.cpu_millis)
        }
        (MEMORY, Some(usage)) => {
            if usage.memory_bytes == 0 {
                tracing::info!(%node, "Node memory usage from metrics server is 0, using requests instead");
                return static_estimate(info, resource);
            }
            ResourceValuePair::new(info.allocatable.memory, usage.memory_bytes)
        }
        _ => static_estimate(info, resource),
    }
}

/// Fetches node usage from a provider with a bounded wait.
#[derive(Clone)]
pub struct ResourceValueResolver {
    provider: Arc<dyn NodeUsageProvider>,
    timeout: Duration,
}

impl ResourceValueResolver {
    pub fn new(provider: Arc<dyn NodeUsageProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    /// Resolver without telemetry: every value comes from requests.
    pub fn static_only() -> Self {
        Self::new(
            Arc::new(NoopUsageProvider),
            Duration::from_millis(DEFAULT_METRICS_TIMEOUT_MS),
        )
    }

    /// Returns live usage, or `None` when telemetry is disabled, failing or
    /// slower than the timeout. Only cancellation of the cycle is an error.
    pub async fn node_usage(
        &self,
        node_name: &str,
        ctx: &CancellationToken,
    ) -> Result<Option<NodeUsage>, ScoreError> {
        let query = tokio::time::timeout(self.timeout, self.provider.node_usage(node_name));
        let result = tokio::select! {
            biased;
            _ = ctx.cancelled() => return Err(ScoreError::Cancelled(node_name.to_string())),
            res = query => res.unwrap_or(Err(MetricsError::Timeout)),
        };

        match result {
            Ok(usage) => Ok(Some(usage)),
            Err(MetricsError::Disabled) => Ok(None),
            Err(err) => {
                tracing::info!(
                    node=%node_name,
                    error=%err,
                    "Could not get node metrics from metrics server, using requests instead"
                );
                Ok(None)
            }
        }
    }

    /// Resolves a single resource, querying telemetry when it can help.
    pub async fn resolve(
        &self,
        info: &NodeInfo,
        resource: &str,
        ctx: &CancellationToken,
    ) -> Result<ResourceValuePair, ScoreError> {
        if ctx.is_cancelled() {
            let node = info.node().map(|n| n.name.clone()).unwrap_or_default();
            return Err(ScoreError::Cancelled(node));
        }
        let usage = match info.node() {
            Some(node) if is_measurable_resource(resource) => self.node_usage(&node.name, ctx).await?,
            _ => None,
        };
        Ok(resolve(info, resource, usage.as_ref()))
    }
}
