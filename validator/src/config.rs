//! Validator configuration.
//!
//! Every field has a default, so a partial JSON document (or `{}`) is a
//! complete configuration. Search budgets are flattened into the same
//! object: `{"mcts_iterations": 200, "min_solution_paths": 2}` is valid.

use std::collections::BTreeMap;

use cascade_search::{SearchError, SearchPolicy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which entry the result cache evicts when full.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CachePolicy {
    /// Oldest insertion first.
    Fifo,
    /// Least recently read or written first.
    #[default]
    Lru,
}

/// Typed failure for configuration checks.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error("`{field}` must lie in [0, 1], got {value}")]
    ThresholdOutOfRange { field: &'static str, value: f64 },
    #[error("min_solution_paths ({min}) exceeds max_solution_paths ({max})")]
    PathBounds { min: usize, max: usize },
    #[error("`{field}` must be at least 1")]
    Zero { field: &'static str },
    #[error("analyzer weight for `{name}` must be finite and non-negative, got {value}")]
    BadWeight { name: String, value: f64 },
    #[error("invalid configuration JSON: {detail}")]
    Json { detail: String },
    #[error("worker pool could not start: {detail}")]
    ThreadPool { detail: String },
}

/// Acceptance thresholds, concurrency, caching and search budgets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    #[serde(flatten)]
    pub search: SearchPolicy,
    pub min_solvability_threshold: f64,
    pub max_difficulty_threshold: f64,
    pub min_solution_paths: usize,
    pub max_solution_paths: usize,
    /// Require at least one path that triggers a special piece.
    pub validate_special_combinations: bool,
    pub max_concurrent_validations: usize,
    pub max_cache_size: usize,
    pub enable_cache: bool,
    pub cache_policy: CachePolicy,
    /// Weight per analyzer name when combining scores (missing = 1.0).
    pub analyzer_weights: BTreeMap<String, f64>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            search: SearchPolicy::default(),
            min_solvability_threshold: 0.8,
            max_difficulty_threshold: 0.95,
            min_solution_paths: 3,
            max_solution_paths: 10,
            validate_special_combinations: false,
            max_concurrent_validations: 4,
            max_cache_size: 256,
            enable_cache: true,
            cache_policy: CachePolicy::Lru,
            analyzer_weights: BTreeMap::new(),
        }
    }
}

impl ValidatorConfig {
    /// Parse a (possibly partial) JSON configuration and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] for malformed input, otherwise any
    /// [`Self::validate`] error.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|e| ConfigError::Json {
            detail: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Weight of the analyzer called `name`.
    #[must_use]
    pub fn weight_of(&self, name: &str) -> f64 {
        self.analyzer_weights.get(name).copied().unwrap_or(1.0)
    }

    /// Reject inconsistent settings before any validation runs.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.search.validate()?;
        for (field, value) in [
            ("min_solvability_threshold", self.min_solvability_threshold),
            ("max_difficulty_threshold", self.max_difficulty_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ThresholdOutOfRange { field, value });
            }
        }
        if self.max_solution_paths == 0 {
            return Err(ConfigError::Zero {
                field: "max_solution_paths",
            });
        }
        if self.min_solution_paths > self.max_solution_paths {
            return Err(ConfigError::PathBounds {
                min: self.min_solution_paths,
                max: self.max_solution_paths,
            });
        }
        if self.max_concurrent_validations == 0 {
            return Err(ConfigError::Zero {
                field: "max_concurrent_validations",
            });
        }
        if self.enable_cache && self.max_cache_size == 0 {
            return Err(ConfigError::Zero {
                field: "max_cache_size",
            });
        }
        for (name, &value) in &self.analyzer_weights {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::BadWeight {
                    name: name.clone(),
                    value,
                });
            }
        }
        Ok(())
    }
}
