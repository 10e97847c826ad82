use std::{
    collections::{BTreeMap, HashSet},
    sync::LazyLock,
};

use shared::models::resource::{CPU, MEMORY, PODS};

use crate::{config::ResourceSpec, errors::ConfigError};

/// Default weights. The base unit for CPU is a millicore and for memory a
/// byte, so a CPU weight of 1<<20 makes one millicore count as one MiB.
pub static DEFAULT_RESOURCE_WEIGHTS: LazyLock<ResourceWeightMap> = LazyLock::new(|| {
    ResourceWeightMap::new(BTreeMap::from([
        (MEMORY.to_string(), 1),
        (CPU.to_string(), 1 << 20),
        (PODS.to_string(), 1),
    ]))
});

/// Resource name to weight. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceWeightMap(BTreeMap<String, i64>);

impl ResourceWeightMap {
    /// Wraps a map as is. Entries with a weight <= 0 contribute nothing.
    pub fn new(weights: BTreeMap<String, i64>) -> Self {
        Self(weights)
    }

    /// Builds the effective table from plugin args.
    ///
    /// An empty list keeps the defaults; otherwise the list replaces them.
    /// Zero weights drop the resource.
    pub fn from_specs(specs: &[ResourceSpec]) -> Result<Self, ConfigError> {
        if specs.is_empty() {
            return Ok(DEFAULT_RESOURCE_WEIGHTS.clone());
        }

        let mut seen = HashSet::new();
        let mut weights = BTreeMap::new();
        for spec in specs {
            if spec.name.is_empty() {
                return Err(ConfigError::EmptyResourceName);
            }
            if spec.weight < 0 {
                return Err(ConfigError::NegativeWeight {
                    name: spec.name.clone(),
                    weight: spec.weight,
                });
            }
            if !seen.insert(spec.name.as_str()) {
                return Err(ConfigError::DuplicateResource(spec.name.clone()));
            }
            if spec.weight == 0 {
                tracing::debug!(resource=%spec.name, "Zero weight, resource excluded from scoring");
                continue;
            }
            weights.insert(spec.name.clone(), spec.weight);
        }

        if weights.is_empty() {
            return Err(ConfigError::NoResources);
        }
        Ok(Self(weights))
    }

    pub fn get(&self, resource: &str) -> Option<i64> {
        self.0.get(resource).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.0.iter().map(|(name, weight)| (name.as_str(), *weight))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
