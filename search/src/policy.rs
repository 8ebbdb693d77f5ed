//! Search policy: iteration, depth, time and branching budgets.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// Budgets and tuning shared by the tree search and the path finder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchPolicy {
    /// Tree-search iterations (selection → expansion → rollout → backprop).
    pub mcts_iterations: u32,
    /// UCT exploration weight.
    pub exploration_constant: f64,
    /// Maximum depth of the search tree.
    pub max_mcts_depth: u32,
    /// Maximum moves played by one rollout.
    pub max_simulation_depth: u32,
    /// Wall-clock budget per search, in seconds.
    pub max_simulation_time: f64,
    /// Progressive widening: children allowed = `ceil(k · visits^α)`, this is `k`.
    pub widening_constant: f64,
    /// Progressive widening exponent `α`, in `(0, 1]`.
    pub widening_exponent: f64,
    /// Probability a rollout takes the greedy move instead of a random one.
    pub rollout_greediness: f64,
    /// Path finder: hard cap on node expansions.
    pub max_expansions: u64,
    /// Path finder: frontier prune threshold.
    pub max_frontier_size: u64,
    /// Path finder: candidate moves kept per expanded node.
    pub max_candidates_per_node: u64,
}

impl SearchPolicy {
    /// The wall-clock budget as a `Duration` (zero if the field is invalid).
    #[must_use]
    pub fn time_budget(&self) -> Duration {
        Duration::try_from_secs_f64(self.max_simulation_time).unwrap_or(Duration::ZERO)
    }

    /// Reject out-of-range fields before any search starts.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidPolicy`] naming the first bad field.
    pub fn validate(&self) -> Result<(), SearchError> {
        let invalid = |field: &'static str, detail: &str| {
            Err(SearchError::InvalidPolicy {
                field,
                detail: detail.to_string(),
            })
        };
        if self.mcts_iterations == 0 {
            return invalid("mcts_iterations", "must be at least 1");
        }
        if !self.exploration_constant.is_finite() || self.exploration_constant < 0.0 {
            return invalid("exploration_constant", "must be a finite non-negative number");
        }
        if self.max_mcts_depth == 0 {
            return invalid("max_mcts_depth", "must be at least 1");
        }
        if self.max_simulation_depth == 0 {
            return invalid("max_simulation_depth", "must be at least 1");
        }
        if !self.max_simulation_time.is_finite() || self.max_simulation_time <= 0.0 {
            return invalid("max_simulation_time", "must be a positive number of seconds");
        }
        if !self.widening_constant.is_finite() || self.widening_constant <= 0.0 {
            return invalid("widening_constant", "must be positive");
        }
        if !(self.widening_exponent > 0.0 && self.widening_exponent <= 1.0) {
            return invalid("widening_exponent", "must lie in (0, 1]");
        }
        if !(0.0..=1.0).contains(&self.rollout_greediness) {
            return invalid("rollout_greediness", "must lie in [0, 1]");
        }
        if self.max_expansions == 0 {
            return invalid("max_expansions", "must be at least 1");
        }
        if self.max_frontier_size == 0 {
            return invalid("max_frontier_size", "must be at least 1");
        }
        if self.max_candidates_per_node == 0 {
            return invalid("max_candidates_per_node", "must be at least 1");
        }
        Ok(())
    }
}

impl Default for SearchPolicy {
    fn default() -> Self {
        Self {
            mcts_iterations: 1000,
            exploration_constant: std::f64::consts::SQRT_2,
            max_mcts_depth: 20,
            max_simulation_depth: 50,
            max_simulation_time: 5.0,
            widening_constant: 1.0,
            widening_exponent: 0.5,
            rollout_greediness: 0.8,
            max_expansions: 2000,
            max_frontier_size: 10_000,
            max_candidates_per_node: 64,
        }
    }
}
