//! Running validation statistics.

use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

/// Snapshot returned by `LevelValidator::stats`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidatorStats {
    pub levels_validated: u64,
    pub levels_passed: u64,
    pub levels_failed: u64,
    pub pass_rate_percent: f64,
    pub average_validation_time_ms: f64,
    pub cache_size: usize,
    pub cache_hits: u64,
}

#[derive(Debug, Default)]
struct Totals {
    validated: u64,
    passed: u64,
    failed: u64,
    total_time_ms: f64,
    cache_hits: u64,
}

/// Mutex-guarded counters shared by concurrent validations.
#[derive(Debug, Default)]
pub(crate) struct StatsRecorder {
    totals: Mutex<Totals>,
}

impl StatsRecorder {
    pub(crate) fn record(&self, passed: bool, elapsed_ms: f64) {
        let mut t = self.totals.lock().unwrap_or_else(PoisonError::into_inner);
        t.validated += 1;
        if passed {
            t.passed += 1;
        } else {
            t.failed += 1;
        }
        t.total_time_ms += elapsed_ms;
    }

    pub(crate) fn record_cache_hit(&self) {
        self.totals
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .cache_hits += 1;
    }

    pub(crate) fn reset(&self) {
        *self.totals.lock().unwrap_or_else(PoisonError::into_inner) = Totals::default();
    }

    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn snapshot(&self, cache_size: usize) -> ValidatorStats {
        let t = self.totals.lock().unwrap_or_else(PoisonError::into_inner);
        let (pass_rate_percent, average_validation_time_ms) = if t.validated == 0 {
            (0.0, 0.0)
        } else {
            let n = t.validated as f64;
            (t.passed as f64 / n * 100.0, t.total_time_ms / n)
        };
        ValidatorStats {
            levels_validated: t.validated,
            levels_passed: t.passed,
            levels_failed: t.failed,
            pass_rate_percent,
            average_validation_time_ms,
            cache_size,
            cache_hits: t.cache_hits,
        }
    }
}
