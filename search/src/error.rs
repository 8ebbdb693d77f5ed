//! Typed search errors.
//!
//! `SearchError` represents pre-flight failures only. Running out of time or
//! iterations is a normal termination and is reported on the outcome
//! (`SolverOutcome::timed_out`, `PathFinderOutcome::termination`).

use cascade_kernel::level::LevelError;
use thiserror::Error;

/// Typed failure for pre-flight search validation.
///
/// These errors are returned before any search step is taken.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// A policy field is out of range.
    #[error("search policy field `{field}` is invalid: {detail}")]
    InvalidPolicy { field: &'static str, detail: String },
    /// The level failed structural validation.
    #[error("level rejected before search: {0}")]
    Level(#[from] LevelError),
}
