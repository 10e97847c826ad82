use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::quantity::Quantity;

pub const CPU: &str = "cpu";
pub const MEMORY: &str = "memory";
pub const PODS: &str = "pods";
pub const EPHEMERAL_STORAGE: &str = "ephemeral-storage";

const NATIVE_PREFIX: &str = "kubernetes.io/";
const HUGEPAGES_PREFIX: &str = "hugepages-";
const ATTACHABLE_VOLUMES_PREFIX: &str = "attachable-volumes-";
const QUOTA_REQUESTS_PREFIX: &str = "requests.";

/// Resource name to amount, as reported on node status and container specs.
pub type ResourceList = BTreeMap<String, Quantity>;

/// Native resources are unprefixed names or names under `kubernetes.io/`.
pub fn is_prefixed_native_resource(name: &str) -> bool {
    name.contains(NATIVE_PREFIX)
}

pub fn is_native_resource(name: &str) -> bool {
    !name.contains('/') || is_prefixed_native_resource(name)
}

/// Vendor resources of the form `domain/name`, e.g. `nvidia.com/gpu`.
pub fn is_extended_resource_name(name: &str) -> bool {
    if is_native_resource(name) || name.starts_with(QUOTA_REQUESTS_PREFIX) {
        return false;
    }
    matches!(name.split_once('/'), Some((domain, local)) if !domain.is_empty() && !local.is_empty() && !local.contains('/'))
}

pub fn is_hugepage_resource_name(name: &str) -> bool {
    name.starts_with(HUGEPAGES_PREFIX)
}

pub fn is_attachable_volume_resource_name(name: &str) -> bool {
    name.starts_with(ATTACHABLE_VOLUMES_PREFIX)
}

/// Scalar resources are tracked as plain named integers on a node.
pub fn is_scalar_resource_name(name: &str) -> bool {
    is_extended_resource_name(name)
        || is_hugepage_resource_name(name)
        || is_prefixed_native_resource(name)
        || is_attachable_volume_resource_name(name)
}

/// Resource amounts in base units: millicores, bytes, counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub milli_cpu: i64,
    pub memory: i64,
    pub ephemeral_storage: i64,
    pub allowed_pod_number: i64,
    pub scalar_resources: BTreeMap<String, i64>,
}

impl Resource {
    pub fn from_list(list: &ResourceList) -> Self {
        let mut res = Resource::default();
        for (name, quantity) in list {
            match name.as_str() {
                CPU => res.milli_cpu += quantity.milli_value(),
                MEMORY => res.memory += quantity.value(),
                EPHEMERAL_STORAGE => res.ephemeral_storage += quantity.value(),
                PODS => res.allowed_pod_number += quantity.value(),
                other if is_scalar_resource_name(other) => {
                    *res.scalar_resources.entry(other.to_string()).or_insert(0) +=
                        quantity.value();
                }
                other => tracing::trace!(resource=%other, "Skipping untracked resource"),
            }
        }
        res
    }

    pub fn scalar(&self, name: &str) -> i64 {
        self.scalar_resources.get(name).copied().unwrap_or(0)
    }

    pub fn add(&mut self, other: &Self) {
        self.milli_cpu = self.milli_cpu.saturating_add(other.milli_cpu);
        self.memory = self.memory.saturating_add(other.memory);
        self.ephemeral_storage = self.ephemeral_storage.saturating_add(other.ephemeral_storage);
        self.allowed_pod_number = self
            .allowed_pod_number
            .saturating_add(other.allowed_pod_number);
        for (name, value) in &other.scalar_resources {
            let entry = self.scalar_resources.entry(name.clone()).or_insert(0);
            *entry = entry.saturating_add(*value);
        }
    }

    /// Subtract resources, never going below zero
    pub fn saturating_sub(&self, other: &Self) -> Self {
        let sub = |a: i64, b: i64| a.saturating_sub(b).max(0);
        Resource {
            milli_cpu: sub(self.milli_cpu, other.milli_cpu),
            memory: sub(self.memory, other.memory),
            ephemeral_storage: sub(self.ephemeral_storage, other.ephemeral_storage),
            allowed_pod_number: sub(self.allowed_pod_number, other.allowed_pod_number),
            scalar_resources: self
                .scalar_resources
                .iter()
                .map(|(name, value)| (name.clone(), sub(*value, other.scalar(name))))
                .collect(),
        }
    }
}
