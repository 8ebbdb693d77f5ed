//! Cascade Validator: orchestration over the solvers.
//!
//! The validator runs a set of analyzers over a level (a structural
//! difficulty heuristic, the Monte Carlo tree search, and the independent
//! path finder), combines their reports into one [`ValidationResult`], and
//! applies the acceptance thresholds from [`ValidatorConfig`].
//!
//! The validator does NOT implement game rules or search: it delegates to
//! `cascade_kernel` and `cascade_search`. It owns the cache, the running
//! statistics and the batch worker pool.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod analyzers;
pub mod batch;
pub mod cache;
pub mod config;
pub mod contract;
pub mod difficulty;
pub mod report;
pub mod result;
pub mod stats;
pub mod validator;

pub use analyzers::{default_analyzers, SearchBasedSolver, SolutionPathFinder};
pub use cache::ValidationCache;
pub use config::{CachePolicy, ConfigError, ValidatorConfig};
pub use contract::{AnalyzerError, AnalyzerKind, AnalyzerReport, LevelAnalyzer};
pub use difficulty::DifficultyAnalyzer;
pub use report::{IssueCount, ReportError, ValidationReport};
pub use result::ValidationResult;
pub use stats::ValidatorStats;
pub use validator::{LevelValidator, ValidationError};
