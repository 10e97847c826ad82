use serde::{Deserialize, Serialize};

use crate::models::{
    metadata::Metadata,
    resource::{CPU, MEMORY, Resource, ResourceList},
};

/// CPU assumed for a container that requests none, in millicores.
pub const DEFAULT_MILLI_CPU_REQUEST: i64 = 100;
/// Memory assumed for a container that requests none, in bytes.
pub const DEFAULT_MEMORY_REQUEST: i64 = 200 * 1024 * 1024;

// --- Core ---

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Pod {
    pub metadata: Metadata,
    pub spec: PodSpec,
}

/// Desired state
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PodSpec {
    #[serde(rename = "nodeName", default)]
    pub node_name: String,
    pub containers: Vec<ContainerSpec>,
    /// Runtime overhead charged on top of the containers.
    #[serde(default)]
    pub overhead: ResourceList,
}

// --- Containers ---

/// Definition of a container within a Pod.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContainerSpec {
    pub name: String,
    pub image: String,
    #[serde(default)]
    pub resources: ResourceRequirements,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ResourceRequirements {
    #[serde(default)]
    pub requests: ResourceList,
    #[serde(default)]
    pub limits: ResourceList,
}

// --- Impl ---

impl Pod {
    /// Builds a single container pod with the given requests.
    pub fn with_requests(name: &str, requests: ResourceList) -> Self {
        Pod {
            metadata: Metadata::named(name),
            spec: PodSpec {
                containers: vec![ContainerSpec {
                    resources: ResourceRequirements {
                        requests,
                        ..Default::default()
                    },
                    ..Default::default()
                }],
                ..Default::default()
            },
        }
    }

    /// Sum of container requests plus pod overhead.
    pub fn requests(&self) -> Resource {
        let mut total = Resource::default();
        for c in &self.spec.containers {
            total.add(&Resource::from_list(&c.resources.requests));
        }
        total.add(&Resource::from_list(&self.spec.overhead));
        total
    }

    /// Requests with defaults substituted for containers that ask for no
    /// CPU or memory, so such pods still count against a node.
    pub fn non_zero_requests(&self) -> Resource {
        let mut total = Resource::default();
        for c in &self.spec.containers {
            let requested = Resource::from_list(&c.resources.requests);
            let cpu = c.resources.requests.get(CPU).map_or(0, |q| q.milli_value());
            let mem = c.resources.requests.get(MEMORY).map_or(0, |q| q.value());
            total.add(&Resource {
                milli_cpu: if cpu == 0 { DEFAULT_MILLI_CPU_REQUEST } else { cpu },
                memory: if mem == 0 { DEFAULT_MEMORY_REQUEST } else { mem },
                ..requested
            });
        }
        total.add(&Resource::from_list(&self.spec.overhead));
        total
    }
}

impl Default for ContainerSpec {
    fn default() -> Self {
        ContainerSpec {
            name: "test-container".to_string(),
            image: "busybox:latest".to_string(),
            resources: ResourceRequirements::default(),
        }
    }
}

impl Default for PodSpec {
    fn default() -> Self {
        PodSpec {
            node_name: "".to_string(),
            containers: vec![ContainerSpec::default()],
            overhead: ResourceList::new(),
        }
    }
}
