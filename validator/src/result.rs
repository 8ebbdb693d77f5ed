//! Verdicts: one [`ValidationResult`] per level.

use std::time::{SystemTime, UNIX_EPOCH};

use cascade_search::{SolutionPath, ValidationMetrics};
use serde::{Deserialize, Serialize};

pub const ISSUE_LOW_SOLVABILITY: &str = "solvability below minimum threshold";
pub const ISSUE_HIGH_DIFFICULTY: &str = "difficulty above maximum threshold";
pub const ISSUE_TOO_FEW_PATHS: &str = "too few distinct solution paths";
pub const ISSUE_NO_SPECIAL_COMBINATION: &str = "no solution path uses a special combination";
pub const ISSUE_ANALYZERS_DISAGREE: &str = "tree search and path finder disagree on solvability";

/// Issue recorded when analyzer `name` returned an error or panicked.
#[must_use]
pub fn analyzer_failure_issue(name: &str, message: &str) -> String {
    format!("validator {name} failed: {message}")
}

/// The verdict for one level.
///
/// `is_valid` holds only if every acceptance criterion passed and every
/// analyzer reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub level_id: String,
    /// Content hash of the level (the cache key).
    pub content_hash: String,
    pub is_valid: bool,
    pub solvability_score: f64,
    pub difficulty_score: f64,
    /// Distinct, score-descending, at most `max_solution_paths`.
    pub solution_paths: Vec<SolutionPath>,
    pub issues: Vec<String>,
    pub metrics: ValidationMetrics,
    /// Milliseconds since the UNIX epoch when the verdict was produced.
    pub timestamp_ms: u64,
}

impl ValidationResult {
    /// An invalid result carrying a single issue, for levels that could not
    /// be validated at all.
    #[must_use]
    pub fn failed(level_id: &str, content_hash: &str, issue: String) -> Self {
        Self {
            level_id: level_id.to_string(),
            content_hash: content_hash.to_string(),
            is_valid: false,
            solvability_score: 0.0,
            difficulty_score: 0.0,
            solution_paths: Vec::new(),
            issues: vec![issue],
            metrics: ValidationMetrics::default(),
            timestamp_ms: now_ms(),
        }
    }

    /// Sum of special combinations over all sampled paths.
    #[must_use]
    pub fn special_combinations(&self) -> u64 {
        self.solution_paths
            .iter()
            .map(|p| u64::from(p.special_combinations))
            .sum()
    }

    #[must_use]
    pub fn has_issue(&self, issue: &str) -> bool {
        self.issues.iter().any(|i| i == issue)
    }
}

pub(crate) fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}
