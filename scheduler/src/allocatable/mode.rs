use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

pub const MAX_NODE_SCORE: i64 = 100;
pub const MIN_NODE_SCORE: i64 = 0;

/// Ranking policy applied to the weighted utilization of a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum ScoringMode {
    /// Favor nodes with lower weighted utilization.
    #[default]
    Least,
    /// Favor nodes with higher weighted utilization.
    Most,
}

impl ScoringMode {
    /// Maps weighted cost over weighted allocatable to a score in
    /// `[MIN_NODE_SCORE, MAX_NODE_SCORE]`, rounding down.
    ///
    /// A node with no allocatable capacity counts as 0% utilized.
    pub fn score(self, weighted_cost: i128, weighted_allocatable: i128) -> i64 {
        match self {
            ScoringMode::Least => least_allocated(weighted_cost, weighted_allocatable),
            ScoringMode::Most => most_allocated(weighted_cost, weighted_allocatable),
        }
    }
}

fn least_allocated(cost: i128, allocatable: i128) -> i64 {
    if allocatable <= 0 {
        return MAX_NODE_SCORE;
    }
    let free = allocatable.saturating_sub(cost);
    clamp(i128::from(MAX_NODE_SCORE).saturating_mul(free).div_euclid(allocatable))
}

fn most_allocated(cost: i128, allocatable: i128) -> i64 {
    if allocatable <= 0 {
        return MIN_NODE_SCORE;
    }
    clamp(i128::from(MAX_NODE_SCORE).saturating_mul(cost).div_euclid(allocatable))
}

fn clamp(score: i128) -> i64 {
    score.clamp(i128::from(MIN_NODE_SCORE), i128::from(MAX_NODE_SCORE)) as i64
}

impl fmt::Display for ScoringMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoringMode::Least => write!(f, "Least"),
            ScoringMode::Most => write!(f, "Most"),
        }
    }
}

impl FromStr for ScoringMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Least" => Ok(ScoringMode::Least),
            "Most" => Ok(ScoringMode::Most),
            other => Err(ConfigError::InvalidMode(other.to_string())),
        }
    }
}
