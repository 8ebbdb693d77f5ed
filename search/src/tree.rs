//! Arena-backed tree for Monte Carlo search.
//!
//! Nodes live in a `Vec` and refer to each other by index. Each node keeps
//! its not-yet-expanded transitions sorted so the most promising is expanded
//! first; progressive widening decides how many of them may become children.

use cascade_kernel::board::{transitions, BoardState, Move, Transition};
use cascade_kernel::level::Goal;

use crate::rollout::heuristic_value;

/// Index of the root in every [`SearchTree`].
pub const ROOT: usize = 0;

/// One node of the search tree.
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub state: BoardState,
    pub parent: Option<usize>,
    /// Move that produced this node (`None` for the root).
    pub mv: Option<Move>,
    /// Cascade rounds resolved by `mv`.
    pub combo: u32,
    pub depth: u32,
    pub children: Vec<usize>,
    pub visits: u32,
    pub total_reward: f64,
    /// Simulations through this node that met the goal.
    pub completions: u32,
    pub goal_met: bool,
    /// Unexpanded transitions, best last. `None` until first needed.
    pending: Option<Vec<Transition>>,
}

impl TreeNode {
    fn new(
        state: BoardState,
        goal: &Goal,
        parent: Option<usize>,
        mv: Option<Move>,
        combo: u32,
        depth: u32,
    ) -> Self {
        Self {
            goal_met: goal.is_met(&state),
            state,
            parent,
            mv,
            combo,
            depth,
            children: Vec::new(),
            visits: 0,
            total_reward: 0.0,
            completions: 0,
            pending: None,
        }
    }

    /// Mean reward over all visits (0 if unvisited).
    #[must_use]
    pub fn mean_reward(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.total_reward / f64::from(self.visits)
        }
    }

    /// Share of visits that ended in a completed goal.
    #[must_use]
    pub fn completion_rate(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            f64::from(self.completions) / f64::from(self.visits)
        }
    }
}

/// Children allowed at a node with `visits` visits: `max(1, ceil(k · visits^α))`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn widening_limit(visits: u32, k: f64, alpha: f64) -> usize {
    let limit = (k * f64::from(visits).powf(alpha)).ceil();
    if limit.is_finite() && limit >= 1.0 {
        limit as usize
    } else {
        1
    }
}

/// The search tree arena.
#[derive(Debug, Clone)]
pub struct SearchTree {
    nodes: Vec<TreeNode>,
}

impl SearchTree {
    /// A tree holding only the root.
    #[must_use]
    pub fn new(root: BoardState, goal: &Goal) -> Self {
        Self {
            nodes: vec![TreeNode::new(root, goal, None, None, 0, 0)],
        }
    }

    #[must_use]
    pub fn node(&self, id: usize) -> &TreeNode {
        &self.nodes[id]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn ensure_pending(&mut self, id: usize, goal: &Goal) {
        if self.nodes[id].pending.is_some() {
            return;
        }
        let node = &self.nodes[id];
        let pending = if node.goal_met || goal.is_out_of_moves(&node.state) {
            Vec::new()
        } else {
            let mut scored: Vec<(f64, usize, Transition)> = transitions(&node.state)
                .into_iter()
                .enumerate()
                .map(|(i, t)| (heuristic_value(goal, &node.state, &t), i, t))
                .collect();
            // Ascending value, later canonical index first on ties, so that
            // popping from the back yields the best, earliest move.
            scored.sort_by(|a, b| a.0.total_cmp(&b.0).then(b.1.cmp(&a.1)));
            scored.into_iter().map(|(_, _, t)| t).collect()
        };
        self.nodes[id].pending = Some(pending);
    }

    /// Goal met, out of moves, or no legal move left to try.
    pub fn is_terminal(&mut self, id: usize, goal: &Goal) -> bool {
        self.ensure_pending(id, goal);
        let node = &self.nodes[id];
        node.goal_met
            || goal.is_out_of_moves(&node.state)
            || (node.children.is_empty() && node.pending.as_ref().map_or(true, Vec::is_empty))
    }

    /// Whether progressive widening lets `id` grow another child.
    pub fn can_expand(
        &mut self,
        id: usize,
        goal: &Goal,
        max_depth: u32,
        k: f64,
        alpha: f64,
    ) -> bool {
        self.ensure_pending(id, goal);
        let node = &self.nodes[id];
        node.depth < max_depth
            && node.pending.as_ref().is_some_and(|p| !p.is_empty())
            && node.children.len() < widening_limit(node.visits, k, alpha)
    }

    /// Turn the best pending transition of `id` into a child.
    pub fn expand(&mut self, id: usize, goal: &Goal) -> Option<usize> {
        self.ensure_pending(id, goal);
        let t = self.nodes[id].pending.as_mut()?.pop()?;
        let child_id = self.nodes.len();
        let depth = self.nodes[id].depth + 1;
        self.nodes.push(TreeNode::new(
            t.state,
            goal,
            Some(id),
            Some(t.mv),
            t.outcome.combo,
            depth,
        ));
        self.nodes[id].children.push(child_id);
        Some(child_id)
    }

    /// UCT score of `child` under `parent`. Unvisited children score infinity.
    #[must_use]
    pub fn uct(&self, parent: usize, child: usize, exploration: f64) -> f64 {
        let c = &self.nodes[child];
        if c.visits == 0 {
            return f64::INFINITY;
        }
        let n = f64::from(self.nodes[parent].visits.max(1));
        c.mean_reward() + exploration * (n.ln() / f64::from(c.visits)).sqrt()
    }

    /// Child with the highest UCT score; the first wins ties.
    #[must_use]
    pub fn select_child(&self, id: usize, exploration: f64) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for &child in &self.nodes[id].children {
            let score = self.uct(id, child, exploration);
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((child, score));
            }
        }
        best.map(|(child, _)| child)
    }

    /// Most-visited child; ties go to the higher mean reward, then the first.
    #[must_use]
    pub fn robust_child(&self, id: usize) -> Option<usize> {
        let mut best: Option<usize> = None;
        for &child in &self.nodes[id].children {
            let c = &self.nodes[child];
            let better = best.map_or(true, |b| {
                let b = &self.nodes[b];
                c.visits > b.visits || (c.visits == b.visits && c.mean_reward() > b.mean_reward())
            });
            if better {
                best = Some(child);
            }
        }
        best
    }

    /// Add a simulation result to `leaf` and every ancestor.
    pub fn backpropagate(&mut self, leaf: usize, reward: f64, completed: bool) {
        let mut cursor = Some(leaf);
        while let Some(id) = cursor {
            let node = &mut self.nodes[id];
            node.visits += 1;
            node.total_reward += reward;
            if completed {
                node.completions += 1;
            }
            cursor = node.parent;
        }
    }

    /// Moves from the root to `id`, in play order.
    #[must_use]
    pub fn path_moves(&self, id: usize) -> Vec<Move> {
        let mut moves = Vec::new();
        let mut cursor = id;
        while let Some(mv) = self.nodes[cursor].mv {
            moves.push(mv);
            match self.nodes[cursor].parent {
                Some(parent) => cursor = parent,
                None => break,
            }
        }
        moves.reverse();
        moves
    }

    /// Longest cascade among the moves from the root to `id`.
    #[must_use]
    pub fn path_max_combo(&self, id: usize) -> u32 {
        let mut best = 0;
        let mut cursor = Some(id);
        while let Some(node) = cursor.map(|c| &self.nodes[c]) {
            best = best.max(node.combo);
            cursor = node.parent;
        }
        best
    }
}
