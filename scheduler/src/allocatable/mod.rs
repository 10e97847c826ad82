//! # NodeResourcesAllocatable score plugin
//!
//! Ranks candidate nodes by weighted utilization. Usage comes from the
//! metrics server when enabled, otherwise from pod requests.

mod mode;
mod resolver;
mod scorer;
mod weights;

use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use shared::models::Pod;
use tokio_util::sync::CancellationToken;

pub use mode::{MAX_NODE_SCORE, MIN_NODE_SCORE, ScoringMode};
pub use resolver::{
    ResourceValuePair, ResourceValueResolver, is_measurable_resource, is_supported_resource,
    resolve, static_estimate,
};
pub use scorer::ResourceAllocationScorer;
pub use weights::{DEFAULT_RESOURCE_WEIGHTS, ResourceWeightMap};

use crate::{
    config::{AllocatableArgs, MetricsConfig},
    errors::{ConfigError, ScoreError},
    metrics::{MetricsServerClient, NodeUsageProvider, NoopUsageProvider},
    snapshot::NodeInfoLister,
};

/// Score of one node within a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeScore {
    pub name: String,
    pub score: i64,
}

pub struct Allocatable {
    lister: Arc<dyn NodeInfoLister>,
    scorer: ResourceAllocationScorer,
}

impl Allocatable {
    pub const NAME: &'static str = "NodeResourcesAllocatable";

    /// Builds the plugin from its args with an explicit resolver.
    ///
    /// Invalid args fail here so a misconfigured scheduler never starts.
    pub fn new(
        args: &AllocatableArgs,
        lister: Arc<dyn NodeInfoLister>,
        resolver: ResourceValueResolver,
    ) -> Result<Self, ConfigError> {
        let mode = args.mode.unwrap_or_default();
        let weights = ResourceWeightMap::from_specs(&args.resources)?;

        for (resource, _) in weights.iter() {
            if !is_supported_resource(resource) {
                resolver::warn_unsupported(resource);
            }
        }

        tracing::info!(
            plugin=%Self::NAME,
            %mode,
            resources=?weights.iter().collect::<Vec<_>>(),
            "Initialized"
        );

        Ok(Self {
            lister,
            scorer: ResourceAllocationScorer::new(Self::NAME, mode, weights, resolver),
        })
    }

    /// Builds the plugin, wiring the metrics server client when the args
    /// enable telemetry.
    pub fn from_config(
        args: &AllocatableArgs,
        metrics: &MetricsConfig,
        lister: Arc<dyn NodeInfoLister>,
    ) -> Result<Self, ConfigError> {
        let provider: Arc<dyn NodeUsageProvider> = if args.metrics_enabled {
            tracing::debug!(url=%metrics.server_url, "Using metrics server for node usage");
            Arc::new(
                MetricsServerClient::new(metrics)
                    .map_err(|e| ConfigError::MetricsClient(e.to_string()))?,
            )
        } else {
            Arc::new(NoopUsageProvider)
        };
        Self::new(args, lister, ResourceValueResolver::new(provider, metrics.timeout))
    }

    pub fn scorer(&self) -> &ResourceAllocationScorer {
        &self.scorer
    }

    /// Score invoked at the score extension point.
    pub async fn score(
        &self,
        ctx: &CancellationToken,
        pod: &Pod,
        node_name: &str,
    ) -> Result<i64, ScoreError> {
        let Some(info) = self.lister.get(node_name) else {
            return Err(ScoreError::NodeNotFound(format!(
                "getting node {node_name:?} from snapshot"
            )));
        };
        tracing::debug!(pod=%pod.metadata.name, node=%node_name, "Scoring");
        self.scorer.score(&info, ctx).await
    }

    /// Scores a shortlist concurrently, best first.
    ///
    /// Nodes that fail to score are left out; ties keep name order.
    pub async fn score_nodes(
        &self,
        ctx: &CancellationToken,
        pod: &Pod,
        node_names: &[String],
    ) -> Vec<NodeScore> {
        let results = join_all(node_names.iter().map(|name| async move {
            (name, self.score(ctx, pod, name).await)
        }))
        .await;

        let mut scores: Vec<NodeScore> = results
            .into_iter()
            .filter_map(|(name, res)| match res {
                Ok(score) => Some(NodeScore {
                    name: name.clone(),
                    score,
                }),
                Err(err) => {
                    tracing::warn!(node=%name, error=%err, "Excluding node from ranking");
                    None
                }
            })
            .collect();

        scores.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.name.cmp(&b.name)));
        scores
    }
}
