//! Rollout policies: how a simulation picks its next move.
//!
//! A rollout plays moves from a tree leaf until the goal is met, the move
//! budget runs out, no legal move remains, or the depth cap is hit. The
//! policy sees every legal transition and returns the index to play.

use cascade_kernel::board::{transitions, BoardState, Move, Transition};
use cascade_kernel::level::Goal;
use rand::rngs::SmallRng;
use rand::Rng;

/// Weight of goal progress in [`heuristic_value`].
pub const PROGRESS_WEIGHT: f64 = 1000.0;
/// Bonus per special triggered in [`heuristic_value`].
pub const SPECIAL_BONUS: f64 = 25.0;

/// Trait for rollout move selection.
///
/// Implementations must return an index into `candidates`, which is never
/// empty. Out-of-range answers are clamped by [`rollout`].
pub trait RolloutPolicy: Send + Sync {
    fn choose(
        &self,
        goal: &Goal,
        state: &BoardState,
        candidates: &[Transition],
        rng: &mut SmallRng,
    ) -> usize;
}

/// Uniformly random moves.
#[derive(Debug, Clone, Copy)]
pub struct UniformRollout;

impl RolloutPolicy for UniformRollout {
    fn choose(
        &self,
        _goal: &Goal,
        _state: &BoardState,
        candidates: &[Transition],
        rng: &mut SmallRng,
    ) -> usize {
        rng.gen_range(0..candidates.len())
    }
}

/// ε-greedy: the best-scoring move with probability `greediness`,
/// otherwise a uniformly random one.
#[derive(Debug, Clone, Copy)]
pub struct GreedyRollout {
    pub greediness: f64,
}

impl RolloutPolicy for GreedyRollout {
    fn choose(
        &self,
        goal: &Goal,
        state: &BoardState,
        candidates: &[Transition],
        rng: &mut SmallRng,
    ) -> usize {
        if rng.gen_bool(self.greediness.clamp(0.0, 1.0)) {
            best_index(goal, state, candidates)
        } else {
            rng.gen_range(0..candidates.len())
        }
    }
}

/// Value of playing `t` from `before`: progress gain, points, specials.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn heuristic_value(goal: &Goal, before: &BoardState, t: &Transition) -> f64 {
    let gain = goal.progress(&t.state) - goal.progress(before);
    PROGRESS_WEIGHT * gain
        + t.outcome.score_delta as f64
        + SPECIAL_BONUS * t.outcome.specials_triggered as f64
}

/// Index of the highest [`heuristic_value`]; the first wins ties.
#[must_use]
pub fn best_index(goal: &Goal, state: &BoardState, candidates: &[Transition]) -> usize {
    let mut best = 0;
    let mut best_value = f64::NEG_INFINITY;
    for (i, t) in candidates.iter().enumerate() {
        let value = heuristic_value(goal, state, t);
        if value > best_value {
            best = i;
            best_value = value;
        }
    }
    best
}

/// Reward of a finished simulation, in `[0, 1]`.
///
/// A completed goal earns `0.7 + 0.2·(moves left / limit) + 0.1·min(1, specials / 2)`.
/// Otherwise `0.6·progress + 0.1·min(1, specials / 2)`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn reward(goal: &Goal, state: &BoardState, completed: bool) -> f64 {
    let specials = (state.specials_triggered() as f64 / 2.0).min(1.0);
    let value = if completed {
        let limit = f64::from(goal.move_limit().max(1));
        0.7 + 0.2 * (f64::from(goal.moves_left(state)) / limit) + 0.1 * specials
    } else {
        0.6 * goal.progress(state) + 0.1 * specials
    };
    value.clamp(0.0, 1.0)
}

/// What one simulation produced.
#[derive(Debug, Clone)]
pub struct RolloutResult {
    /// Moves played by the rollout itself (not the tree prefix).
    pub moves: Vec<Move>,
    pub final_state: BoardState,
    pub completed: bool,
    pub reward: f64,
    /// Longest cascade among the rollout's moves.
    pub max_combo: u32,
    /// Specials triggered during the rollout.
    pub specials_triggered: u64,
}

/// Simulate from `start` for at most `max_steps` moves.
pub fn rollout(
    goal: &Goal,
    start: &BoardState,
    max_steps: u32,
    policy: &dyn RolloutPolicy,
    rng: &mut SmallRng,
) -> RolloutResult {
    let mut state = start.clone();
    let mut moves = Vec::new();
    let mut max_combo = 0;
    let mut specials_triggered = 0;
    let mut completed = goal.is_met(&state);

    let mut steps = 0;
    while !completed && steps < max_steps && !goal.is_out_of_moves(&state) {
        let mut candidates = transitions(&state);
        if candidates.is_empty() {
            break;
        }
        let pick = policy
            .choose(goal, &state, &candidates, rng)
            .min(candidates.len() - 1);
        let chosen = candidates.swap_remove(pick);
        max_combo = max_combo.max(chosen.outcome.combo);
        specials_triggered += chosen.outcome.specials_triggered;
        moves.push(chosen.mv);
        state = chosen.state;
        completed = goal.is_met(&state);
        steps += 1;
    }

    RolloutResult {
        reward: reward(goal, &state, completed),
        moves,
        final_state: state,
        completed,
        max_combo,
        specials_triggered,
    }
}
