use serde::{Deserialize, Serialize};

use super::resource::{Resource, ResourceList};

/// Represents a node in the cluster as seen by the scheduler.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Node {
    pub name: String,
    /// Total resources reported by the node agent.
    pub capacity: ResourceList,
    /// Resources held back for the OS and node daemons.
    #[serde(rename = "systemReserved", default)]
    pub system_reserved: ResourceList,
}

impl Node {
    pub fn new(name: &str, capacity: ResourceList) -> Self {
        Node {
            name: name.to_string(),
            capacity,
            system_reserved: ResourceList::new(),
        }
    }

    /// Capacity minus system reservations, per resource.
    pub fn allocatable(&self) -> Resource {
        Resource::from_list(&self.capacity).saturating_sub(&Resource::from_list(&self.system_reserved))
    }
}
