//! `apply_swap()`: the single entry point for playing a move.
//!
//! A swap is legal iff it clears something:
//! 1. both cells hold specials (both fire), or
//! 2. one cell holds a colour bomb (it fires at the other piece's colour), or
//! 3. the swap forms a run through one of the swapped cells.
//!
//! Failures are typed and fail closed: the input state is never modified.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::cascade::{self, ClearPlan};
use crate::board::state::BoardState;
use crate::level::definition::{Coord, SpecialKind};

/// One atomic action: swap `from` with `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Coord,
    pub to: Coord,
    /// Piece code that started at `from`.
    pub piece_type: u8,
    /// Points the move scored, cascades included.
    pub score_delta: u64,
}

/// What a move did, summed over all cascade rounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub cleared: u64,
    pub score_delta: u64,
    /// Number of resolution rounds (1 = no cascade).
    pub combo: u32,
    pub specials_triggered: u64,
    pub obstacles_damaged: u64,
}

/// A legal move together with the board it produces.
#[derive(Debug, Clone)]
pub struct Transition {
    pub mv: Move,
    pub state: BoardState,
    pub outcome: StepOutcome,
}

/// Typed failure for [`apply_swap`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("cell {coord} is outside the board")]
    OutOfBounds { coord: Coord },
    #[error("cells {from} and {to} are not adjacent")]
    NotAdjacent { from: Coord, to: Coord },
    #[error("cell {coord} is empty or locked")]
    Immovable { coord: Coord },
    #[error("swapping {from} and {to} clears nothing")]
    NoEffect { from: Coord, to: Coord },
}

/// Play the swap `from ↔ to` on a copy of `state`.
///
/// # Errors
///
/// Returns [`MoveError`] if either cell is off the board, the cells are not
/// adjacent, either cell is empty or locked, or the swap clears nothing.
pub fn apply_swap(state: &BoardState, from: Coord, to: Coord) -> Result<Transition, MoveError> {
    let a = state
        .index(from)
        .ok_or(MoveError::OutOfBounds { coord: from })?;
    let b = state.index(to).ok_or(MoveError::OutOfBounds { coord: to })?;
    if !from.is_adjacent(&to) {
        return Err(MoveError::NotAdjacent { from, to });
    }
    for (idx, coord) in [(a, from), (b, to)] {
        if !state.is_live(idx) {
            return Err(MoveError::Immovable { coord });
        }
    }

    let piece_type = state.pieces[a];
    let mut next = state.clone();
    next.pieces.swap(a, b);
    next.specials.swap(a, b);

    let plan = match (next.specials[a], next.specials[b]) {
        (Some(_), Some(_)) => ClearPlan {
            forced_triggers: vec![a, b],
            ..ClearPlan::default()
        },
        (Some(SpecialKind::ColorBomb), None) => colour_burst(a, next.pieces[b]),
        (None, Some(SpecialKind::ColorBomb)) => colour_burst(b, next.pieces[a]),
        _ => {
            if state.pieces[a] == state.pieces[b] {
                return Err(MoveError::NoEffect { from, to });
            }
            let runs = cascade::find_runs(&next);
            if !runs.iter().any(|r| r.contains(a) || r.contains(b)) {
                return Err(MoveError::NoEffect { from, to });
            }
            cascade::plan_from_runs(&runs, &[b, a])
        }
    };

    next.moves_used += 1;
    let report = cascade::resolve(&mut next, plan);
    let outcome = StepOutcome {
        cleared: report.cleared,
        score_delta: report.score_delta,
        combo: report.rounds,
        specials_triggered: report.specials_triggered,
        obstacles_damaged: report.obstacles_damaged,
    };
    Ok(Transition {
        mv: Move {
            from,
            to,
            piece_type,
            score_delta: report.score_delta,
        },
        state: next,
        outcome,
    })
}

fn colour_burst(bomb: usize, colour: u8) -> ClearPlan {
    ClearPlan {
        colour_bursts: vec![(bomb, colour)],
        ..ClearPlan::default()
    }
}

/// Adjacent live pairs in canonical order: row-major, right before down.
#[must_use]
pub fn candidate_swaps(state: &BoardState) -> Vec<(Coord, Coord)> {
    let (w, h) = (state.width, state.height);
    let mut swaps = Vec::new();
    for y in 0..h {
        for x in 0..w {
            let idx = y * w + x;
            if !state.is_live(idx) {
                continue;
            }
            if x + 1 < w && state.is_live(idx + 1) {
                swaps.push((state.coord(idx), state.coord(idx + 1)));
            }
            if y + 1 < h && state.is_live(idx + w) {
                swaps.push((state.coord(idx), state.coord(idx + w)));
            }
        }
    }
    swaps
}

/// Every legal move from `state`, applied, in canonical order.
#[must_use]
pub fn transitions(state: &BoardState) -> Vec<Transition> {
    candidate_swaps(state)
        .into_iter()
        .filter_map(|(from, to)| apply_swap(state, from, to).ok())
        .collect()
}
