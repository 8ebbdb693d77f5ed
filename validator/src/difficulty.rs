//! Structural difficulty heuristic.
//!
//! `0.3 · tight moves + 0.2 · board size + 0.5 · obstacle density`, each
//! term clamped to `[0, 1]`. Needs no search and never fails.

use cascade_kernel::level::LevelDefinition;

use crate::contract::{AnalyzerError, AnalyzerKind, AnalyzerReport, LevelAnalyzer};

/// Move limit at which the move term reaches zero.
pub const GENEROUS_MOVE_LIMIT: f64 = 50.0;
/// Cell count at which the size term saturates.
pub const LARGE_BOARD_CELLS: f64 = 100.0;

pub const ISSUE_DENSE_OBSTACLES: &str = "obstacle density above one half";
pub const ISSUE_FEW_MOVES: &str = "move limit below five";

/// Difficulty in `[0, 1]` from the level's shape alone.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn structural_difficulty(level: &LevelDefinition) -> f64 {
    let cells = level.cell_count().max(1) as f64;
    let moves = (1.0 - f64::from(level.move_limit) / GENEROUS_MOVE_LIMIT).clamp(0.0, 1.0);
    let size = (cells / LARGE_BOARD_CELLS).clamp(0.0, 1.0);
    let density = (level.obstacle_count() as f64 / cells).clamp(0.0, 1.0);
    (0.3 * moves + 0.2 * size + 0.5 * density).clamp(0.0, 1.0)
}

/// [`structural_difficulty`] as an analyzer.
#[derive(Debug, Clone, Copy, Default)]
pub struct DifficultyAnalyzer;

impl LevelAnalyzer for DifficultyAnalyzer {
    fn name(&self) -> &str {
        "difficulty"
    }

    fn kind(&self) -> AnalyzerKind {
        AnalyzerKind::Difficulty
    }

    fn analyze(&self, level: &LevelDefinition) -> Result<AnalyzerReport, AnalyzerError> {
        let mut issues = Vec::new();
        if level.obstacle_count() * 2 > level.cell_count() {
            issues.push(ISSUE_DENSE_OBSTACLES.to_string());
        }
        if level.move_limit < 5 {
            issues.push(ISSUE_FEW_MOVES.to_string());
        }
        Ok(AnalyzerReport {
            difficulty: Some(structural_difficulty(level)),
            issues,
            ..AnalyzerReport::default()
        })
    }
}
