//! Aggregate report over a set of verdicts.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ValidatorConfig;
use crate::result::{ValidationResult, ISSUE_HIGH_DIFFICULTY, ISSUE_LOW_SOLVABILITY};

/// How many issues `common_issues` lists.
pub const TOP_ISSUES: usize = 10;

pub const REC_RAISE_MOVE_LIMITS: &str =
    "raise move limits: more than 30% of levels are under-solvable";
pub const REC_REDUCE_OBSTACLES: &str =
    "reduce obstacle density: more than 30% of levels exceed the difficulty threshold";
pub const REC_ADD_SPECIALS: &str =
    "add special-piece opportunities: most passing levels never trigger a special";

/// An issue string and how many levels reported it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueCount {
    pub issue: String,
    pub count: usize,
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("report serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("report could not be written: {0}")]
    Io(#[from] std::io::Error),
}

/// Summary of a batch of [`ValidationResult`]s.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub total_levels: usize,
    pub passed_levels: usize,
    pub failed_levels: usize,
    pub pass_rate_percent: f64,
    pub average_solvability: f64,
    pub average_difficulty: f64,
    pub average_solution_paths: f64,
    pub average_validation_time_ms: f64,
    /// Most frequent issues, count descending then alphabetical.
    pub common_issues: Vec<IssueCount>,
    pub recommendations: Vec<String>,
}

impl ValidationReport {
    /// Aggregate `results`, judging thresholds against `config`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_results(results: &[ValidationResult], config: &ValidatorConfig) -> Self {
        let total = results.len();
        if total == 0 {
            return Self::default();
        }
        let n = total as f64;
        let mean = |f: fn(&ValidationResult) -> f64| results.iter().map(f).sum::<f64>() / n;
        let passed = results.iter().filter(|r| r.is_valid).count();

        // A level counts once per distinct issue.
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for result in results {
            let mut own: Vec<&str> = result.issues.iter().map(String::as_str).collect();
            own.sort_unstable();
            own.dedup();
            for issue in own {
                *counts.entry(issue).or_insert(0) += 1;
            }
        }
        let mut ranked: Vec<IssueCount> = counts
            .into_iter()
            .map(|(issue, count)| IssueCount {
                issue: issue.to_string(),
                count,
            })
            .collect();
        ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.issue.cmp(&b.issue)));

        let mut recommendations = Vec::new();
        let under_solvable = results
            .iter()
            .filter(|r| r.solvability_score < config.min_solvability_threshold)
            .count();
        if under_solvable as f64 > 0.3 * n {
            recommendations.push(REC_RAISE_MOVE_LIMITS.to_string());
        }
        let too_hard = results
            .iter()
            .filter(|r| r.difficulty_score > config.max_difficulty_threshold)
            .count();
        if too_hard as f64 > 0.3 * n {
            recommendations.push(REC_REDUCE_OBSTACLES.to_string());
        }
        let plain_passing = results
            .iter()
            .filter(|r| r.is_valid && r.special_combinations() == 0)
            .count();
        if passed > 0 && plain_passing as f64 > 0.5 * passed as f64 {
            recommendations.push(REC_ADD_SPECIALS.to_string());
        }
        for entry in &ranked {
            if entry.issue == ISSUE_LOW_SOLVABILITY || entry.issue == ISSUE_HIGH_DIFFICULTY {
                continue;
            }
            if entry.count as f64 > 0.3 * n {
                recommendations.push(format!(
                    "investigate recurring issue \"{}\" ({} of {total} levels)",
                    entry.issue, entry.count
                ));
            }
        }
        ranked.truncate(TOP_ISSUES);

        Self {
            total_levels: total,
            passed_levels: passed,
            failed_levels: total - passed,
            pass_rate_percent: passed as f64 / n * 100.0,
            average_solvability: mean(|r| r.solvability_score),
            average_difficulty: mean(|r| r.difficulty_score),
            average_solution_paths: mean(|r| r.solution_paths.len() as f64),
            average_validation_time_ms: mean(|r| r.metrics.simulation_time_ms),
            common_issues: ranked,
            recommendations,
        }
    }

    /// Pretty-printed JSON for pipeline export.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Json`] if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write [`Self::to_json_pretty`] to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] on serialization or I/O failure.
    pub fn write_json(&self, path: &Path) -> Result<(), ReportError> {
        std::fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }
}
