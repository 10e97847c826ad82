//! Read-only per-node view handed to score plugins: the node, the pods bound
//! to it, and their aggregated requests.

use crate::models::{node::Node, pod::Pod, resource::Resource};

#[derive(Debug, Clone, Default)]
pub struct NodeInfo {
    node: Option<Node>,
    pub pods: Vec<Pod>,
    /// Sum of pod requests as declared.
    pub requested: Resource,
    /// Sum of pod requests with CPU/memory defaults for zero requests.
    pub non_zero_requested: Resource,
    pub allocatable: Resource,
}

impl NodeInfo {
    pub fn new(node: Node) -> Self {
        NodeInfo {
            allocatable: node.allocatable(),
            node: Some(node),
            ..Default::default()
        }
    }

    pub fn node(&self) -> Option<&Node> {
        self.node.as_ref()
    }

    pub fn add_pod(&mut self, pod: Pod) {
        self.requested.add(&pod.requests());
        self.non_zero_requested.add(&pod.non_zero_requests());
        self.pods.push(pod);
    }
}
