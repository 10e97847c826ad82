//! In-memory node snapshot shared with score plugins.
//!
//! Entries are `Arc`ed so a scoring call keeps a consistent view while the
//! snapshot is updated; writers replace entries copy-on-write.

use std::sync::Arc;

use dashmap::{DashMap, mapref::entry::Entry};
use shared::models::{Node, NodeInfo, Pod};

/// Read-only lookup of node snapshots by name.
pub trait NodeInfoLister: Send + Sync {
    fn get(&self, node_name: &str) -> Option<Arc<NodeInfo>>;
}

#[derive(Debug, Default)]
pub struct Snapshot {
    nodes: DashMap<String, Arc<NodeInfo>>,
}

impl Snapshot {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Adds or replaces a node, keeping the pods already bound to it.
    ///
    /// The entry stays locked while it is rebuilt, so readers never see the
    /// node missing and concurrent binds are not lost.
    pub fn add_node(&self, node: Node) {
        match self.nodes.entry(node.name.clone()) {
            Entry::Occupied(mut entry) => {
                let mut info = NodeInfo::new(node);
                for pod in entry.get().pods.iter().cloned() {
                    info.add_pod(pod);
                }
                entry.insert(Arc::new(info));
            }
            Entry::Vacant(entry) => {
                entry.insert(Arc::new(NodeInfo::new(node)));
            }
        }
    }

    pub fn remove_node(&self, node_name: &str) {
        self.nodes.remove(node_name);
    }

    /// Binds a pod to the node named in its spec.
    pub fn add_pod(&self, pod: Pod) -> bool {
        match self.nodes.get_mut(&pod.spec.node_name) {
            Some(mut entry) => {
                Arc::make_mut(entry.value_mut()).add_pod(pod);
                true
            }
            None => {
                tracing::warn!(pod=%pod.metadata.name, node=%pod.spec.node_name, "Pod bound to unknown node");
                false
            }
        }
    }

    pub fn node_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.nodes.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }
}

impl NodeInfoLister for Snapshot {
    fn get(&self, node_name: &str) -> Option<Arc<NodeInfo>> {
        self.nodes.get(node_name).map(|e| e.value().clone())
    }
}
