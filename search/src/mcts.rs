//! Monte Carlo tree search over move sequences.
//!
//! Each iteration walks down the tree by UCT, grows one child where
//! progressive widening allows, plays a rollout from there and backs the
//! reward up to the root. The root's most-visited child decides the
//! solvability estimate; the spread of rollout rewards feeds difficulty.

use std::collections::HashMap;
use std::time::Instant;

use cascade_kernel::board::BoardState;
use cascade_kernel::digest::hash::{canonical_hash, HashDomain};
use cascade_kernel::level::{Goal, LevelDefinition};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::debug;

use crate::error::SearchError;
use crate::metrics::ValidationMetrics;
use crate::path::{rank_distinct, SolutionPath};
use crate::policy::SearchPolicy;
use crate::rollout::{rollout, RolloutPolicy};
use crate::tree::{SearchTree, ROOT};

/// Issue reported when the time budget ran out before any rollout finished.
pub const ISSUE_SEARCH_BUDGET_EXHAUSTED: &str = "search budget exhausted with no completed rollout";

/// Result of one tree search.
#[derive(Debug, Clone)]
pub struct SolverOutcome {
    /// Estimated probability the level can be completed, in `[0, 1]`.
    pub solvability: f64,
    /// `None` when no rollout ran (nothing to measure).
    pub difficulty: Option<f64>,
    /// Best distinct completed trajectories.
    pub paths: Vec<SolutionPath>,
    pub metrics: ValidationMetrics,
    pub iterations: u32,
    pub timed_out: bool,
    pub tree_size: usize,
    pub issues: Vec<String>,
}

impl SolverOutcome {
    fn already_complete(root: &BoardState, move_limit: u32, started: Instant) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let metrics = ValidationMetrics {
            average_score: root.score() as f64,
            completion_rate: 1.0,
            simulation_time_ms: elapsed_ms(started),
            ..ValidationMetrics::default()
        };
        Self {
            solvability: 1.0,
            difficulty: None,
            paths: vec![SolutionPath::from_moves(Vec::new(), root, move_limit)],
            metrics,
            iterations: 0,
            timed_out: false,
            tree_size: 1,
            issues: Vec::new(),
        }
    }
}

/// Seed for the rollout RNG: a fixed function of the level's content.
#[must_use]
pub fn rollout_seed(level: &LevelDefinition) -> u64 {
    canonical_hash(
        HashDomain::RolloutSeed,
        level.content_hash().as_str().as_bytes(),
    )
    .seed_u64()
}

/// Running totals over all rollouts.
#[derive(Default)]
struct RolloutTally {
    rewards: Vec<f64>,
    completions: u32,
    total_moves: u64,
    special_moves: u64,
    score_sum: f64,
    max_combo: u32,
}

impl RolloutTally {
    #[allow(clippy::cast_precision_loss)]
    fn completion_rate(&self) -> f64 {
        if self.rewards.is_empty() {
            0.0
        } else {
            f64::from(self.completions) / self.rewards.len() as f64
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn reward_stddev(&self) -> f64 {
        let n = self.rewards.len() as f64;
        if n == 0.0 {
            return 0.0;
        }
        let mean = self.rewards.iter().sum::<f64>() / n;
        let var = self.rewards.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
        var.sqrt()
    }

    #[allow(clippy::cast_precision_loss)]
    fn metrics(&self, started: Instant) -> ValidationMetrics {
        let n = self.rewards.len();
        ValidationMetrics {
            total_moves: self.total_moves,
            special_moves: self.special_moves,
            average_score: if n == 0 { 0.0 } else { self.score_sum / n as f64 },
            max_combo: self.max_combo,
            completion_rate: self.completion_rate(),
            simulation_time_ms: elapsed_ms(started),
        }
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}

/// Run Monte Carlo tree search on `level`.
///
/// Returns up to `max_paths` distinct completed trajectories alongside the
/// solvability and difficulty estimates. Deterministic for a given level and
/// policy as long as the time budget is not the binding limit.
///
/// # Errors
///
/// Returns [`SearchError`] if the policy or the level fails validation.
pub fn solve(
    level: &LevelDefinition,
    policy: &SearchPolicy,
    rollout_policy: &dyn RolloutPolicy,
    max_paths: usize,
) -> Result<SolverOutcome, SearchError> {
    policy.validate()?;
    let root = BoardState::from_level(level)?;
    let goal = Goal::from_level(level);
    let started = Instant::now();
    let budget = policy.time_budget();

    if goal.is_met(&root) {
        debug!(level = %level.id, "goal met before any move");
        return Ok(SolverOutcome::already_complete(&root, level.move_limit, started));
    }

    let mut rng = SmallRng::seed_from_u64(rollout_seed(level));
    let mut tree = SearchTree::new(root, &goal);
    let mut tally = RolloutTally::default();
    let mut completed_paths: HashMap<String, SolutionPath> = HashMap::new();
    let mut iterations = 0u32;
    let mut timed_out = false;

    while iterations < policy.mcts_iterations {
        if started.elapsed() >= budget {
            timed_out = true;
            break;
        }

        // Selection.
        let mut node = ROOT;
        loop {
            if tree.is_terminal(node, &goal)
                || tree.can_expand(
                    node,
                    &goal,
                    policy.max_mcts_depth,
                    policy.widening_constant,
                    policy.widening_exponent,
                )
            {
                break;
            }
            match tree.select_child(node, policy.exploration_constant) {
                Some(child) => node = child,
                None => break,
            }
        }

        // Expansion.
        let mut expanded = false;
        if !tree.is_terminal(node, &goal)
            && tree.can_expand(
                node,
                &goal,
                policy.max_mcts_depth,
                policy.widening_constant,
                policy.widening_exponent,
            )
        {
            if let Some(child) = tree.expand(node, &goal) {
                node = child;
                expanded = true;
            }
        }

        // Simulation.
        let leaf = tree.node(node);
        let result = rollout(
            &goal,
            &leaf.state,
            policy.max_simulation_depth,
            rollout_policy,
            &mut rng,
        );

        tally.rewards.push(result.reward);
        tally.total_moves += result.moves.len() as u64 + u64::from(expanded);
        tally.special_moves += result.specials_triggered;
        #[allow(clippy::cast_precision_loss)]
        {
            tally.score_sum += result.final_state.score() as f64;
        }
        tally.max_combo = tally
            .max_combo
            .max(result.max_combo)
            .max(tree.path_max_combo(node));
        if result.completed {
            tally.completions += 1;
            let mut moves = tree.path_moves(node);
            moves.extend_from_slice(&result.moves);
            let path = SolutionPath::from_moves(moves, &result.final_state, level.move_limit);
            let key = path.key();
            match completed_paths.get(&key) {
                Some(existing) if existing.score >= path.score => {}
                _ => {
                    completed_paths.insert(key, path);
                }
            }
        }

        // Backpropagation.
        tree.backpropagate(node, result.reward, result.completed);
        iterations += 1;

        if tree.node(ROOT).children.is_empty() && tree.is_terminal(ROOT, &goal) {
            break;
        }
    }

    let mut issues = Vec::new();
    let (solvability, difficulty) = if iterations == 0 {
        issues.push(ISSUE_SEARCH_BUDGET_EXHAUSTED.to_string());
        (0.0, None)
    } else {
        let solvability = match tree.robust_child(ROOT) {
            Some(child) => tree.node(child).completion_rate(),
            None => tree.node(ROOT).completion_rate(),
        };
        let spread = 0.5 * (1.0 - tally.completion_rate()) + tally.reward_stddev();
        (solvability, Some(spread.clamp(0.0, 1.0)))
    };

    debug!(
        level = %level.id,
        iterations,
        timed_out,
        tree_size = tree.len(),
        solvability,
        "tree search finished"
    );

    Ok(SolverOutcome {
        solvability,
        difficulty,
        paths: rank_distinct(completed_paths.into_values(), max_paths),
        metrics: tally.metrics(started),
        iterations,
        timed_out,
        tree_size: tree.len(),
        issues,
    })
}
