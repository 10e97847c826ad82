use std::{
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use async_trait::async_trait;
use shared::models::{Node, NodeInfo, Pod, ResourceList};

use crate::{
    errors::MetricsError,
    metrics::{NodeUsage, NodeUsageProvider},
};

pub fn list(entries: &[(&str, &str)]) -> ResourceList {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.parse().unwrap()))
        .collect()
}

/// Snapshot of a node with one pod per request list.
pub fn node_info(name: &str, capacity: &[(&str, &str)], pods: Vec<ResourceList>) -> NodeInfo {
    let mut info = NodeInfo::new(Node::new(name, list(capacity)));
    for (i, requests) in pods.into_iter().enumerate() {
        let mut pod = Pod::with_requests(&format!("{name}-pod-{i}"), requests);
        pod.spec.node_name = name.to_string();
        info.add_pod(pod);
    }
    info
}

/// Returns the same reading for every node.
pub struct FixedUsage(pub Result<NodeUsage, MetricsError>);

#[async_trait]
impl NodeUsageProvider for FixedUsage {
    async fn node_usage(&self, _node_name: &str) -> Result<NodeUsage, MetricsError> {
        self.0.clone()
    }
}

/// Answers only after the given delay.
pub struct SlowUsage(pub Duration);

#[async_trait]
impl NodeUsageProvider for SlowUsage {
    async fn node_usage(&self, _node_name: &str) -> Result<NodeUsage, MetricsError> {
        tokio::time::sleep(self.0).await;
        Ok(NodeUsage {
            cpu_millis: 1000,
            memory_bytes: 1 << 30,
        })
    }
}

#[derive(Default)]
pub struct CountingUsage {
    calls: AtomicUsize,
}

impl CountingUsage {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NodeUsageProvider for CountingUsage {
    async fn node_usage(&self, _node_name: &str) -> Result<NodeUsage, MetricsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(NodeUsage {
            cpu_millis: 500,
            memory_bytes: 1 << 30,
        })
    }
}
