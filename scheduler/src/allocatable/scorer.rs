use std::collections::BTreeMap;

use shared::models::NodeInfo;
use tokio_util::sync::CancellationToken;

use super::{
    mode::ScoringMode,
    resolver::{ResourceValueResolver, is_measurable_resource, resolve},
    weights::ResourceWeightMap,
};
use crate::errors::ScoreError;

/// Weighs the resolved values of every configured resource into one score.
pub struct ResourceAllocationScorer {
    pub name: &'static str,
    mode: ScoringMode,
    weights: ResourceWeightMap,
    resolver: ResourceValueResolver,
}

impl ResourceAllocationScorer {
    pub fn new(
        name: &'static str,
        mode: ScoringMode,
        weights: ResourceWeightMap,
        resolver: ResourceValueResolver,
    ) -> Self {
        Self {
            name,
            mode,
            weights,
            resolver,
        }
    }

    pub fn mode(&self) -> ScoringMode {
        self.mode
    }

    pub fn weights(&self) -> &ResourceWeightMap {
        &self.weights
    }

    /// Score a node from its snapshot.
    ///
    /// Telemetry is queried at most once per call and only when a measurable
    /// resource is configured. A cycle cancelled before or during the call
    /// fails with [`ScoreError::Cancelled`].
    pub async fn score(&self, info: &NodeInfo, ctx: &CancellationToken) -> Result<i64, ScoreError> {
        let Some(node) = info.node() else {
            return Err(ScoreError::NodeNotFound("snapshot carries no node".to_string()));
        };
        if ctx.is_cancelled() {
            return Err(ScoreError::Cancelled(node.name.clone()));
        }
        if self.weights.is_empty() {
            return Err(ScoreError::NoResourcesConfigured);
        }

        let usage = if self.weights.iter().any(|(r, _)| is_measurable_resource(r)) {
            self.resolver.node_usage(&node.name, ctx).await?
        } else {
            None
        };

        let mut allocatable = BTreeMap::new();
        let mut cost = BTreeMap::new();
        let mut weighted_allocatable: i128 = 0;
        let mut weighted_cost: i128 = 0;

        for (resource, weight) in self.weights.iter() {
            let pair = resolve(info, resource, usage.as_ref());
            allocatable.insert(resource, pair.allocatable);
            cost.insert(resource, pair.cost);

            if weight <= 0 {
                continue;
            }
            let weight = i128::from(weight);
            weighted_allocatable =
                weighted_allocatable.saturating_add(i128::from(pair.allocatable) * weight);
            weighted_cost = weighted_cost.saturating_add(i128::from(pair.cost) * weight);
        }

        if weighted_allocatable <= 0 {
            tracing::warn!(
                node=%node.name,
                "Node has no allocatable capacity for the configured resources, treating it as idle"
            );
        }

        let score = self.mode.score(weighted_cost, weighted_allocatable);

        tracing::info!(
            plugin=%self.name,
            node=%node.name,
            score,
            allocatable=%serde_json::to_string(&allocatable).unwrap_or_default(),
            cost=%serde_json::to_string(&cost).unwrap_or_default(),
            "Scored node"
        );
        Ok(score)
    }
}
