//! Load-aware scoring for the scheduler's score extension point.
//!
//! - `allocatable`: the `NodeResourcesAllocatable` plugin and its scorer
//! - `metrics`: live node usage from the metrics server
//! - `snapshot`: node lookup handed in by the scheduler
//! - `config`: plugin args and metrics settings

pub mod allocatable;
pub mod config;
pub mod errors;
pub mod metrics;
pub mod snapshot;

#[cfg(test)]
mod test_utils;

pub use allocatable::{Allocatable, NodeScore, ScoringMode};
pub use errors::{ConfigError, MetricsError, ScoreError};
