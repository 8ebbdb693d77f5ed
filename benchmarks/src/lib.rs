//! Shared regimes for the cascade benchmark suites.
//!
//! A regime is a level plus the search settings it is measured under. The
//! same regimes feed the Criterion suites and the auditable JSON report so
//! the numbers are comparable.

use cascade_kernel::level::{LevelDefinition, Objective, SpecialKind};
use cascade_search::SearchPolicy;
use cascade_validator::ValidatorConfig;

/// A named benchmark workload.
pub struct Regime {
    pub name: &'static str,
    pub level: LevelDefinition,
    pub policy: SearchPolicy,
}

/// Search settings bound by iteration counts, never by the clock.
#[must_use]
pub fn bench_policy(iterations: u32, expansions: u64) -> SearchPolicy {
    SearchPolicy {
        mcts_iterations: iterations,
        max_expansions: expansions,
        max_simulation_time: 600.0,
        ..SearchPolicy::default()
    }
}

/// Validator configuration wrapping `policy`.
#[must_use]
pub fn bench_config(policy: SearchPolicy) -> ValidatorConfig {
    ValidatorConfig {
        search: policy,
        min_solution_paths: 1,
        max_solution_paths: 5,
        enable_cache: false,
        ..ValidatorConfig::default()
    }
}

/// Build a level from rows.
///
/// # Panics
///
/// Panics if the rows are malformed. Benchmark setup failures are fatal.
#[must_use]
pub fn level(id: &str, rows: &[&str], move_limit: u32, target: u64) -> LevelDefinition {
    LevelDefinition::from_rows(
        id,
        rows,
        move_limit,
        target,
        vec![Objective::ReachScore { target }],
    )
    .expect("benchmark level is well formed")
}

/// Small open board, reachable target.
#[must_use]
pub fn regime_open_board() -> Regime {
    Regime {
        name: "open_board",
        level: level("open_board", &["1213", "3141", "2323", "4141"], 5, 60),
        policy: bench_policy(200, 1_000),
    }
}

/// Larger board with obstacles and a bomb; the search has more to chew on.
#[must_use]
pub fn regime_obstacle_field() -> Regime {
    let rows = ["123412", "341234", "212143", "434321", "123412", "341234"];
    let level = level("obstacle_field", &rows, 8, 150)
        .with_obstacle(0, 0, 2)
        .with_obstacle(5, 5, 1)
        .with_obstacle(2, 3, 1)
        .with_special(3, 2, SpecialKind::Bomb);
    Regime {
        name: "obstacle_field",
        level,
        policy: bench_policy(300, 2_000),
    }
}

/// A board with no legal move: search terminates immediately.
#[must_use]
pub fn regime_dead_board() -> Regime {
    Regime {
        name: "dead_board",
        level: level("dead_board", &["11", "11"], 10, 1_000),
        policy: bench_policy(200, 1_000),
    }
}

/// A target far out of reach: every budget is spent.
#[must_use]
pub fn regime_budget_limited() -> Regime {
    Regime {
        name: "budget_limited",
        level: level("budget_limited", &["1231", "2312", "1123", "3212"], 12, 100_000),
        policy: bench_policy(150, 600),
    }
}

/// All regimes in reporting order.
#[must_use]
pub fn all_regimes() -> Vec<Regime> {
    vec![
        regime_open_board(),
        regime_obstacle_field(),
        regime_dead_board(),
        regime_budget_limited(),
    ]
}

/// `count` variants of the open board with distinct ids, for batch workloads.
#[must_use]
pub fn batch_of(count: usize) -> Vec<LevelDefinition> {
    let base = regime_open_board().level;
    (0..count)
        .map(|i| {
            let mut l = base.clone();
            l.id = format!("batch-{i:03}");
            l
        })
        .collect()
}
