//! `LevelValidator`: runs the analyzers on a level and turns their reports
//! into one verdict.
//!
//! Per level:
//! 1. reject structurally invalid levels,
//! 2. return a cached verdict if one exists,
//! 3. run every analyzer concurrently, each isolated by `catch_unwind`,
//! 4. combine scores (weighted mean of present estimates), paths and metrics,
//! 5. apply the acceptance thresholds,
//! 6. record statistics and write the verdict back to the cache.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;

use cascade_kernel::board::BoardState;
use cascade_kernel::level::{Goal, LevelDefinition, LevelError};
use cascade_search::{rank_distinct, ValidationMetrics};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use thiserror::Error;
use tracing::{debug, debug_span, info, warn};

use crate::analyzers::default_analyzers;
use crate::cache::ValidationCache;
use crate::config::{ConfigError, ValidatorConfig};
use crate::contract::{AnalyzerKind, AnalyzerReport, LevelAnalyzer};
use crate::result::{
    analyzer_failure_issue, now_ms, ValidationResult, ISSUE_ANALYZERS_DISAGREE,
    ISSUE_HIGH_DIFFICULTY, ISSUE_LOW_SOLVABILITY, ISSUE_NO_SPECIAL_COMBINATION,
    ISSUE_TOO_FEW_PATHS,
};
use crate::stats::{StatsRecorder, ValidatorStats};

/// Precondition failure: the level never reaches the analyzers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("level `{id}` rejected: {source}")]
    InvalidLevel { id: String, source: LevelError },
}

/// One analyzer's contribution, or why it has none.
struct AnalyzerRun {
    name: String,
    kind: AnalyzerKind,
    weight: f64,
    outcome: Result<AnalyzerReport, String>,
}

/// Validation service: owns its configuration, analyzers, cache, statistics
/// and worker pool. Share it by reference; every method takes `&self`.
pub struct LevelValidator {
    pub(crate) config: ValidatorConfig,
    pub(crate) analyzers: Vec<Box<dyn LevelAnalyzer>>,
    pub(crate) cache: ValidationCache,
    pub(crate) stats: StatsRecorder,
    pub(crate) pool: ThreadPool,
}

impl LevelValidator {
    /// A validator running the standard analyzers.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `config` fails validation or the worker
    /// pool cannot start.
    pub fn new(config: ValidatorConfig) -> Result<Self, ConfigError> {
        let analyzers = default_analyzers(&config);
        Self::with_analyzers(config, analyzers)
    }

    /// A validator running exactly `analyzers`, in order.
    ///
    /// # Errors
    ///
    /// Same as [`Self::new`].
    pub fn with_analyzers(
        config: ValidatorConfig,
        analyzers: Vec<Box<dyn LevelAnalyzer>>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.max_concurrent_validations)
            .thread_name(|i| format!("cascade-validate-{i}"))
            .build()
            .map_err(|e| ConfigError::ThreadPool {
                detail: e.to_string(),
            })?;
        Ok(Self {
            cache: ValidationCache::new(config.max_cache_size, config.cache_policy),
            stats: StatsRecorder::default(),
            config,
            analyzers,
            pool,
        })
    }

    /// Append an analyzer after the existing ones.
    pub fn add_analyzer(&mut self, analyzer: Box<dyn LevelAnalyzer>) {
        self.analyzers.push(analyzer);
    }

    #[must_use]
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Names of the configured analyzers, in run order.
    #[must_use]
    pub fn analyzer_names(&self) -> Vec<&str> {
        self.analyzers.iter().map(|a| a.name()).collect()
    }

    /// Validate one level.
    ///
    /// Analyzer errors and panics do not fail the call: they become issues
    /// and make the verdict invalid.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidLevel`] if the level fails
    /// structural validation (for example a zero move limit).
    pub fn validate_level(&self, level: &LevelDefinition) -> Result<ValidationResult, ValidationError> {
        let reject = |source| ValidationError::InvalidLevel {
            id: level.id.clone(),
            source,
        };
        level.validate().map_err(reject)?;
        let root = BoardState::from_level(level).map_err(reject)?;
        let trivially_complete = Goal::from_level(level).is_met(&root);

        let content_hash = level.content_hash();
        let key = content_hash.hex_digest();
        if self.config.enable_cache {
            if let Some(hit) = self.cache.get(key) {
                self.stats.record_cache_hit();
                debug!(level = %level.id, "validation cache hit");
                return Ok(hit);
            }
        }

        let started = Instant::now();
        let _span = debug_span!("validate_level", level = %level.id).entered();
        let runs: Vec<AnalyzerRun> = self.pool.install(|| {
            self.analyzers
                .par_iter()
                .map(|analyzer| AnalyzerRun {
                    name: analyzer.name().to_string(),
                    kind: analyzer.kind(),
                    weight: self.config.weight_of(analyzer.name()),
                    outcome: run_isolated(analyzer.as_ref(), level),
                })
                .collect()
        });

        let mut result = self.combine(level, content_hash.as_str(), runs, trivially_complete);
        result.metrics.simulation_time_ms = started.elapsed().as_secs_f64() * 1000.0;

        self.stats.record(result.is_valid, result.metrics.simulation_time_ms);
        if self.config.enable_cache {
            self.cache.put(key, result.clone());
            debug!(level = %level.id, cache_size = self.cache.len(), "validation cached");
        }
        info!(
            level = %level.id,
            valid = result.is_valid,
            solvability = result.solvability_score,
            difficulty = result.difficulty_score,
            paths = result.solution_paths.len(),
            "level validated"
        );
        Ok(result)
    }

    fn combine(
        &self,
        level: &LevelDefinition,
        content_hash: &str,
        runs: Vec<AnalyzerRun>,
        trivially_complete: bool,
    ) -> ValidationResult {
        let config = &self.config;
        let mut issues: Vec<String> = Vec::new();
        let mut analyzer_failed = false;
        let mut solvability = Vec::new();
        let mut difficulty = Vec::new();
        let mut paths = Vec::new();
        let mut metrics = Vec::new();
        let mut tree_solvability = None;
        let mut finder_paths = None;

        for run in runs {
            let report = match run.outcome {
                Ok(report) => report,
                Err(message) => {
                    warn!(level = %level.id, analyzer = %run.name, %message, "analyzer failed");
                    issues.push(analyzer_failure_issue(&run.name, &message));
                    analyzer_failed = true;
                    continue;
                }
            };
            debug!(level = %level.id, analyzer = %run.name, "analyzer reported");
            if let Some(s) = report.solvability.filter(|v| v.is_finite()) {
                solvability.push((run.weight, s.clamp(0.0, 1.0)));
            }
            if let Some(d) = report.difficulty.filter(|v| v.is_finite()) {
                difficulty.push((run.weight, d.clamp(0.0, 1.0)));
            }
            match run.kind {
                AnalyzerKind::TreeSearch => tree_solvability = report.solvability,
                AnalyzerKind::PathEnumeration => finder_paths = Some(report.paths.len()),
                AnalyzerKind::Difficulty | AnalyzerKind::Custom => {}
            }
            issues.extend(report.issues);
            paths.extend(report.paths);
            metrics.extend(report.metrics);
        }

        let required_paths = if trivially_complete {
            config.min_solution_paths.min(1)
        } else {
            config.min_solution_paths
        };
        if let (Some(s), Some(found)) = (tree_solvability, finder_paths) {
            if s >= config.min_solvability_threshold && found < required_paths {
                issues.push(ISSUE_ANALYZERS_DISAGREE.to_string());
            }
        }

        let solvability_score = weighted_mean(&solvability).unwrap_or(0.0);
        let difficulty_score = weighted_mean(&difficulty).unwrap_or(0.0);
        let solution_paths = rank_distinct(paths, config.max_solution_paths);

        let mut criteria_met = true;
        if solvability_score < config.min_solvability_threshold {
            issues.push(ISSUE_LOW_SOLVABILITY.to_string());
            criteria_met = false;
        }
        if difficulty_score > config.max_difficulty_threshold {
            issues.push(ISSUE_HIGH_DIFFICULTY.to_string());
            criteria_met = false;
        }
        if solution_paths.len() < required_paths {
            issues.push(ISSUE_TOO_FEW_PATHS.to_string());
            criteria_met = false;
        }
        if config.validate_special_combinations
            && !trivially_complete
            && !solution_paths.iter().any(|p| p.special_combinations > 0)
        {
            issues.push(ISSUE_NO_SPECIAL_COMBINATION.to_string());
            criteria_met = false;
        }

        let mut seen = std::collections::HashSet::new();
        issues.retain(|issue| seen.insert(issue.clone()));

        ValidationResult {
            level_id: level.id.clone(),
            content_hash: content_hash.to_string(),
            is_valid: criteria_met && !analyzer_failed,
            solvability_score,
            difficulty_score,
            solution_paths,
            issues,
            metrics: ValidationMetrics::merge(&metrics),
            timestamp_ms: now_ms(),
        }
    }

    /// Counters since construction or the last [`Self::reset_stats`].
    #[must_use]
    pub fn stats(&self) -> ValidatorStats {
        self.stats.snapshot(self.cache.len())
    }

    pub fn reset_stats(&self) {
        self.stats.reset();
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
        info!("validation cache cleared");
    }

    #[must_use]
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }
}

fn run_isolated(analyzer: &dyn LevelAnalyzer, level: &LevelDefinition) -> Result<AnalyzerReport, String> {
    match catch_unwind(AssertUnwindSafe(|| analyzer.analyze(level))) {
        Ok(Ok(report)) => Ok(report),
        Ok(Err(e)) => Err(e.to_string()),
        Err(payload) => Err(format!("panicked: {}", panic_message(payload.as_ref()))),
    }
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Weighted mean of `(weight, value)` pairs.
///
/// Falls back to the plain mean when every weight is zero; `None` if empty.
#[allow(clippy::cast_precision_loss)]
fn weighted_mean(values: &[(f64, f64)]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let total_weight: f64 = values.iter().map(|(w, _)| w).sum();
    let mean = if total_weight > 0.0 {
        values.iter().map(|(w, v)| w * v).sum::<f64>() / total_weight
    } else {
        values.iter().map(|(_, v)| v).sum::<f64>() / values.len() as f64
    };
    Some(mean.clamp(0.0, 1.0))
}
