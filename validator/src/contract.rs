//! Analyzer contract: the trait every verdict source implements.
//!
//! An analyzer reads a level and reports whatever estimates it can make.
//! Analyzers may NOT touch the cache, the statistics, or the acceptance
//! thresholds: combining reports is the validator's job.

use cascade_kernel::level::LevelDefinition;
use cascade_search::{SearchError, SolutionPath, ValidationMetrics};
use thiserror::Error;

/// What an analyzer measured. Absent estimates are `None`, not zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalyzerReport {
    pub solvability: Option<f64>,
    pub difficulty: Option<f64>,
    pub paths: Vec<SolutionPath>,
    pub issues: Vec<String>,
    pub metrics: Option<ValidationMetrics>,
}

/// Typed failure for a single analyzer run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalyzerError {
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error("{detail}")]
    Failed { detail: String },
}

/// The role an analyzer plays when reports are cross-checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyzerKind {
    Difficulty,
    TreeSearch,
    PathEnumeration,
    Custom,
}

/// The contract a verdict source must implement to be run by the validator.
///
/// Implementations must be deterministic for a given level: the cache
/// returns earlier results without calling them again.
pub trait LevelAnalyzer: Send + Sync {
    /// Stable name, used in failure issues and for `analyzer_weights`.
    fn name(&self) -> &str;

    fn kind(&self) -> AnalyzerKind {
        AnalyzerKind::Custom
    }

    /// Examine `level`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError`] if the analyzer cannot produce a report.
    fn analyze(&self, level: &LevelDefinition) -> Result<AnalyzerReport, AnalyzerError>;
}
