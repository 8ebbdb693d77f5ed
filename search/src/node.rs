//! Path-finder node and its frontier ordering key.

use cascade_kernel::board::{BoardState, Move};
use cascade_kernel::level::Goal;

/// Scale of the progress heuristic: a node with no progress costs this much.
pub const PROGRESS_SCALE: f64 = 10_000.0;

/// An open path prefix: the board after `depth` moves from the root.
#[derive(Debug, Clone)]
pub struct PathNode {
    /// Index in the finder's arena.
    pub node_id: u64,
    pub parent_id: Option<u64>,
    pub state: BoardState,
    pub depth: u32,
    /// One per move played.
    pub g_cost: i64,
    /// [`progress_cost`] of `state`.
    pub h_cost: i64,
    /// Unique, increasing; breaks all remaining ties.
    pub creation_order: u64,
    /// `None` only for the root.
    pub producing_move: Option<Move>,
}

impl PathNode {
    #[must_use]
    pub fn f_cost(&self) -> i64 {
        self.g_cost.saturating_add(self.h_cost)
    }

    #[must_use]
    pub fn key(&self) -> FrontierKey {
        FrontierKey {
            f_cost: self.f_cost(),
            depth: self.depth,
            creation_order: self.creation_order,
        }
    }
}

/// `round(PROGRESS_SCALE * (1 - progress))`: zero once the goal is met.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn progress_cost(goal: &Goal, state: &BoardState) -> i64 {
    let remaining = (1.0 - goal.progress(state)).clamp(0.0, 1.0);
    (PROGRESS_SCALE * remaining).round() as i64
}

/// Frontier order. The derived ordering is lexicographic in field order:
/// cheaper first, then shallower, then older.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrontierKey {
    pub f_cost: i64,
    pub depth: u32,
    pub creation_order: u64,
}
