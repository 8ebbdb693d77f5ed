//! Solution paths: complete move sequences and their summary figures.

use std::collections::HashMap;
use std::fmt::Write as _;

use cascade_kernel::board::{BoardState, Move};
use serde::{Deserialize, Serialize};

/// A move sequence that takes the initial board to a goal state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionPath {
    pub moves: Vec<Move>,
    /// Final score reached by the sequence.
    pub score: u64,
    /// `moves / move_limit`: the share of the move budget the path needs.
    pub difficulty: f64,
    /// Special-piece triggers along the path.
    pub special_combinations: u32,
    /// Points per move (`score / max(1, moves)`).
    pub efficiency: f64,
}

impl SolutionPath {
    /// Summarise `moves`, which led to `final_state` under a `move_limit` budget.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_moves(moves: Vec<Move>, final_state: &BoardState, move_limit: u32) -> Self {
        let score = final_state.score();
        let len = moves.len();
        let difficulty = if move_limit == 0 {
            1.0
        } else {
            len as f64 / f64::from(move_limit)
        };
        Self {
            score,
            difficulty,
            special_combinations: u32::try_from(final_state.specials_triggered())
                .unwrap_or(u32::MAX),
            efficiency: score as f64 / len.max(1) as f64,
            moves,
        }
    }

    /// Number of moves in the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Identity of the path: `"x,y>x,y"` per move, joined by `;`.
    ///
    /// The empty path has the empty key.
    #[must_use]
    pub fn key(&self) -> String {
        let mut key = String::with_capacity(self.moves.len() * 8);
        for (i, mv) in self.moves.iter().enumerate() {
            if i > 0 {
                key.push(';');
            }
            let _ = write!(key, "{}>{}", mv.from, mv.to);
        }
        key
    }
}

/// Deduplicate by [`SolutionPath::key`] and keep the best `cap`.
///
/// Duplicates keep the higher score (earlier wins a tie). The result is
/// ordered by score descending, then fewer moves, then key.
#[must_use]
pub fn rank_distinct(paths: impl IntoIterator<Item = SolutionPath>, cap: usize) -> Vec<SolutionPath> {
    let mut best: HashMap<String, SolutionPath> = HashMap::new();
    for path in paths {
        let key = path.key();
        match best.get(&key) {
            Some(existing) if existing.score >= path.score => {}
            _ => {
                best.insert(key, path);
            }
        }
    }
    let mut ranked: Vec<(String, SolutionPath)> = best.into_iter().collect();
    ranked.sort_by(|(ka, a), (kb, b)| {
        b.score
            .cmp(&a.score)
            .then(a.moves.len().cmp(&b.moves.len()))
            .then_with(|| ka.cmp(kb))
    });
    ranked.truncate(cap);
    ranked.into_iter().map(|(_, path)| path).collect()
}
