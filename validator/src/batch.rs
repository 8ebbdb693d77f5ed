//! Batch validation on the validator's bounded worker pool.
//!
//! Results come back in input order. A level that is rejected, or whose
//! validation panics, yields an invalid result with a descriptive issue;
//! its siblings are unaffected.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;

use cascade_kernel::level::LevelDefinition;
use rayon::prelude::*;
use tracing::{info, warn};

use crate::report::ValidationReport;
use crate::result::ValidationResult;
use crate::validator::{panic_message, LevelValidator};

/// Issue prefix for levels rejected before analysis.
pub const ISSUE_PREFIX_REJECTED: &str = "level rejected: ";
/// Issue prefix for validations that panicked outside any analyzer.
pub const ISSUE_PREFIX_PANICKED: &str = "validation panicked: ";

impl LevelValidator {
    /// Validate every level, at most `max_concurrent_validations` at a time.
    ///
    /// The output has one result per input level, in input order.
    #[must_use]
    pub fn validate_level_batch(&self, levels: &[LevelDefinition]) -> Vec<ValidationResult> {
        let started = Instant::now();
        let results: Vec<ValidationResult> = self
            .pool
            .install(|| levels.par_iter().map(|level| self.validate_isolated(level)).collect());
        info!(
            levels = levels.len(),
            passed = results.iter().filter(|r| r.is_valid).count(),
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            "batch validated"
        );
        results
    }

    /// Aggregate `results` under this validator's thresholds.
    #[must_use]
    pub fn generate_validation_report(&self, results: &[ValidationResult]) -> ValidationReport {
        ValidationReport::from_results(results, &self.config)
    }

    fn validate_isolated(&self, level: &LevelDefinition) -> ValidationResult {
        let started = Instant::now();
        let issue = match catch_unwind(AssertUnwindSafe(|| self.validate_level(level))) {
            Ok(Ok(result)) => return result,
            Ok(Err(e)) => format!("{ISSUE_PREFIX_REJECTED}{e}"),
            Err(payload) => format!("{ISSUE_PREFIX_PANICKED}{}", panic_message(payload.as_ref())),
        };
        warn!(level = %level.id, %issue, "batch item failed");
        let mut failed = ValidationResult::failed(&level.id, level.content_hash().as_str(), issue);
        failed.metrics.simulation_time_ms = started.elapsed().as_secs_f64() * 1000.0;
        self.stats.record(false, failed.metrics.simulation_time_ms);
        failed
    }
}
