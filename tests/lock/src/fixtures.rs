//! Single source of truth for the acceptance-test levels.
//!
//! Used by both the `validate_fixture` binary and the integration tests.
//! Any change here changes both, preventing silent drift between what the
//! cross-process check produces and what the in-process tests expect.
//!
//! Boards are small and budgets generous in time but tight in iterations,
//! so every run is bound by iteration counts and therefore deterministic.

use cascade_kernel::level::{LevelDefinition, Objective, SpecialKind};
use cascade_search::SearchPolicy;
use cascade_validator::ValidatorConfig;

/// Validator settings every acceptance test starts from.
#[must_use]
pub fn test_config() -> ValidatorConfig {
    ValidatorConfig {
        search: SearchPolicy {
            mcts_iterations: 60,
            max_simulation_time: 120.0,
            max_expansions: 400,
            ..SearchPolicy::default()
        },
        min_solution_paths: 1,
        max_solution_paths: 5,
        max_concurrent_validations: 4,
        ..ValidatorConfig::default()
    }
}

fn build(
    id: &str,
    rows: &[&str],
    move_limit: u32,
    target_score: u64,
    objectives: Vec<Objective>,
) -> LevelDefinition {
    match LevelDefinition::from_rows(id, rows, move_limit, target_score, objectives) {
        Ok(level) => level,
        Err(e) => panic!("fixture {id} is malformed: {e}"),
    }
}

/// Scenario A: one cell, nothing to do, one move allowed.
#[must_use]
pub fn trivial_level() -> LevelDefinition {
    build("scenario-a", &["1"], 1, 0, vec![Objective::ReachScore { target: 0 }])
}

/// Scenario B: a single-colour 2x2 board can never clear anything.
#[must_use]
pub fn impossible_level() -> LevelDefinition {
    build(
        "scenario-b",
        &["11", "11"],
        10,
        1_000_000_000,
        vec![Objective::ReachScore {
            target: 1_000_000_000,
        }],
    )
}

/// Scenario C: otherwise fine, but with no moves at all.
#[must_use]
pub fn zero_move_level() -> LevelDefinition {
    let mut level = build("scenario-c", &["12", "21"], 1, 0, vec![Objective::ReachScore { target: 0 }]);
    level.move_limit = 0;
    level
}

/// Ten playable levels for the batch scenarios, ids `batch-00`..`batch-09`.
///
/// Each one opens with at least one matching swap; targets vary so some
/// pass and some do not.
#[must_use]
pub fn batch_levels() -> Vec<LevelDefinition> {
    const BOARDS: [[&str; 4]; 5] = [
        ["1213", "3141", "2323", "4141"],
        ["1231", "2312", "1123", "3212"],
        ["2132", "1321", "3213", "2131"],
        ["3123", "1231", "2312", "1233"],
        ["1324", "2413", "3142", "1421"],
    ];
    (0..10)
        .map(|i| {
            let board = &BOARDS[i % BOARDS.len()];
            let target = if i % 3 == 0 { 30 } else { 90 };
            let mut level = build(
                &format!("batch-{i:02}"),
                board,
                4 + u32::try_from(i % 4).unwrap_or(0),
                target,
                vec![Objective::ReachScore { target }],
            );
            if i % 4 == 1 {
                level = level.with_special(3, 3, SpecialKind::Bomb);
            }
            if i % 5 == 2 {
                level = level.with_obstacle(0, 0, 1);
            }
            level
        })
        .collect()
}

/// Distinct small levels for cache-bound checks: same board, different ids.
#[must_use]
pub fn distinct_levels(count: usize) -> Vec<LevelDefinition> {
    (0..count)
        .map(|i| build(&format!("distinct-{i:03}"), &["1"], 1, 0, vec![Objective::ReachScore { target: 0 }]))
        .collect()
}

/// A compact, deterministic text form of a result: everything except timing.
#[must_use]
pub fn fingerprint(result: &cascade_validator::ValidationResult) -> String {
    let keys: Vec<String> = result.solution_paths.iter().map(|p| p.key()).collect();
    format!(
        "id={} valid={} solvability={:.6} difficulty={:.6} paths=[{}] issues={:?}",
        result.level_id,
        result.is_valid,
        result.solvability_score,
        result.difficulty_score,
        keys.join(" | "),
        result.issues
    )
}
