//! Objectives and the completion test a solver searches toward.

use serde::{Deserialize, Serialize};

use crate::board::state::BoardState;
use crate::level::definition::LevelDefinition;

/// One level objective, serialised as `{"type": ..., "target": ...}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Objective {
    /// Reach at least `target` points.
    ReachScore { target: u64 },
    /// Clear `target` pieces of colour `piece`.
    CollectPieces { piece: u8, target: u64 },
    /// Remove `target` obstacle layers.
    ClearObstacles { target: u64 },
    /// Trigger `target` special pieces.
    TriggerSpecials { target: u64 },
}

impl Objective {
    #[must_use]
    pub fn target(&self) -> u64 {
        match *self {
            Self::ReachScore { target }
            | Self::CollectPieces { target, .. }
            | Self::ClearObstacles { target }
            | Self::TriggerSpecials { target } => target,
        }
    }

    /// How much of this objective `state` has accomplished.
    #[must_use]
    pub fn achieved(&self, state: &BoardState) -> u64 {
        match *self {
            Self::ReachScore { .. } => state.score(),
            Self::CollectPieces { piece, .. } => state.collected(piece),
            Self::ClearObstacles { .. } => state.obstacles_cleared(),
            Self::TriggerSpecials { .. } => state.specials_triggered(),
        }
    }

    #[must_use]
    pub fn is_met(&self, state: &BoardState) -> bool {
        self.achieved(state) >= self.target()
    }

    pub(crate) fn write_identity(&self, buf: &mut Vec<u8>) {
        let (tag, piece) = match *self {
            Self::ReachScore { .. } => (0u8, 0u8),
            Self::CollectPieces { piece, .. } => (1, piece),
            Self::ClearObstacles { .. } => (2, 0),
            Self::TriggerSpecials { .. } => (3, 0),
        };
        buf.push(tag);
        buf.push(piece);
        buf.extend_from_slice(&self.target().to_le_bytes());
    }
}

/// Completion criteria for a level: every objective plus the target score,
/// within the move limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Goal {
    objectives: Vec<Objective>,
    target_score: u64,
    move_limit: u32,
}

impl Goal {
    #[must_use]
    pub fn from_level(level: &LevelDefinition) -> Self {
        Self {
            objectives: level.objectives.clone(),
            target_score: level.target_score,
            move_limit: level.move_limit,
        }
    }

    /// True once every objective is met and the score reaches the target.
    #[must_use]
    pub fn is_met(&self, state: &BoardState) -> bool {
        state.score() >= self.target_score && self.objectives.iter().all(|o| o.is_met(state))
    }

    /// Mean completion fraction over all criteria, in `[0, 1]`.
    ///
    /// Each objective and the target score count as one criterion; each
    /// contributes `min(1, achieved / target)`, and a zero target counts as done.
    #[must_use]
    pub fn progress(&self, state: &BoardState) -> f64 {
        let mut total = ratio(state.score(), self.target_score);
        for objective in &self.objectives {
            total += ratio(objective.achieved(state), objective.target());
        }
        #[allow(clippy::cast_precision_loss)]
        let criteria = (self.objectives.len() + 1) as f64;
        total / criteria
    }

    #[must_use]
    pub fn move_limit(&self) -> u32 {
        self.move_limit
    }

    #[must_use]
    pub fn moves_left(&self, state: &BoardState) -> u32 {
        self.move_limit.saturating_sub(state.moves_used())
    }

    #[must_use]
    pub fn is_out_of_moves(&self, state: &BoardState) -> bool {
        state.moves_used() >= self.move_limit
    }
}

#[allow(clippy::cast_precision_loss)]
fn ratio(achieved: u64, target: u64) -> f64 {
    if target == 0 {
        1.0
    } else {
        (achieved as f64 / target as f64).min(1.0)
    }
}
