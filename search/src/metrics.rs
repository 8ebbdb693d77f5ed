//! Per-analyzer simulation metrics.

use serde::{Deserialize, Serialize};

/// Counters gathered while an analyzer explores a level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationMetrics {
    /// Moves simulated in total.
    pub total_moves: u64,
    /// Special-piece triggers observed.
    pub special_moves: u64,
    pub average_score: f64,
    /// Longest cascade observed (rounds resolved by one move).
    pub max_combo: u32,
    /// Share of simulated sequences that met the goal.
    pub completion_rate: f64,
    pub simulation_time_ms: f64,
}

impl ValidationMetrics {
    /// Combine several analyzers' metrics.
    ///
    /// Every field is averaged except `max_combo`, which takes the maximum.
    /// An empty slice yields the zero value.
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn merge(parts: &[ValidationMetrics]) -> Self {
        if parts.is_empty() {
            return Self::default();
        }
        let n = parts.len() as f64;
        let mean = |f: fn(&ValidationMetrics) -> f64| parts.iter().map(f).sum::<f64>() / n;
        Self {
            total_moves: mean(|m| m.total_moves as f64).round() as u64,
            special_moves: mean(|m| m.special_moves as f64).round() as u64,
            average_score: mean(|m| m.average_score),
            max_combo: parts.iter().map(|m| m.max_combo).max().unwrap_or(0),
            completion_rate: mean(|m| m.completion_rate),
            simulation_time_ms: mean(|m| m.simulation_time_ms),
        }
    }
}
