//! Cascade Search: the solvers that play a level.
//!
//! This crate turns a [`LevelDefinition`](cascade_kernel::level::LevelDefinition)
//! into solvability and difficulty estimates plus concrete solution paths.
//! It depends only on `cascade_kernel`, never on `cascade_validator`.
//!
//! # Crate dependency graph
//!
//! ```text
//! cascade_kernel  ←  cascade_search  ←  cascade_validator
//! (board rules)      (MCTS, finder)      (analyzers, cache, batch)
//! ```
//!
//! # Key types
//!
//! - [`SearchPolicy`] -- iteration, depth, time and branching budgets
//! - [`solve`] -- Monte Carlo tree search with progressive widening
//! - [`find_paths`] -- best-first enumeration of distinct solution paths
//! - [`SolutionPath`] -- a complete move sequence and its summary figures
//! - [`RolloutPolicy`] -- trait for rollout move selection
//! - [`ValidationMetrics`] -- per-analyzer simulation counters

#![forbid(unsafe_code)]

pub mod error;
pub mod finder;
pub mod frontier;
pub mod mcts;
pub mod metrics;
pub mod node;
pub mod path;
pub mod policy;
pub mod rollout;
pub mod tree;

pub use error::SearchError;
pub use finder::{find_paths, FinderTermination, PathFinderOutcome};
pub use mcts::{solve, SolverOutcome, ISSUE_SEARCH_BUDGET_EXHAUSTED};
pub use metrics::ValidationMetrics;
pub use path::{rank_distinct, SolutionPath};
pub use policy::SearchPolicy;
pub use rollout::{GreedyRollout, RolloutPolicy, UniformRollout};
