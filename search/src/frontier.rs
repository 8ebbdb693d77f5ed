//! Best-first frontier over open path prefixes.
//!
//! Move sequences never merge, so there is no visited set: every pushed
//! node is a distinct path prefix. Open nodes live in a `BTreeMap` keyed by
//! [`FrontierKey`]; `creation_order` makes every key unique, so the map is
//! both the priority queue and the pruning order.

use std::collections::{BTreeMap, BTreeSet};

use crate::node::{FrontierKey, PathNode};

/// Open nodes ordered by `(f_cost, depth, creation_order)`, plus the ids of
/// nodes closed as dead ends.
#[derive(Debug, Default)]
pub struct BestFirstFrontier {
    open: BTreeMap<FrontierKey, PathNode>,
    dead_ends: BTreeSet<u64>,
    high_water: u64,
}

impl BestFirstFrontier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an open node. Callers hand out unique `creation_order` values.
    pub fn push(&mut self, node: PathNode) {
        self.open.insert(node.key(), node);
        self.high_water = self.high_water.max(self.open.len() as u64);
    }

    /// Remove and return the node with the smallest key.
    #[must_use]
    pub fn pop(&mut self) -> Option<PathNode> {
        self.open.pop_first().map(|(_, node)| node)
    }

    /// Close `node_id`: no legal move, or out of moves.
    pub fn mark_dead_end(&mut self, node_id: u64) {
        self.dead_ends.insert(node_id);
    }

    #[must_use]
    pub fn is_dead_end(&self, node_id: u64) -> bool {
        self.dead_ends.contains(&node_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.open.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    /// Largest number of open nodes seen at once.
    #[must_use]
    pub fn high_water(&self) -> u64 {
        self.high_water
    }

    #[must_use]
    pub fn dead_end_count(&self) -> usize {
        self.dead_ends.len()
    }

    /// Drop all but the `max_size` best open nodes; returns the dropped ids
    /// in key order.
    pub fn prune_to(&mut self, max_size: usize) -> Vec<u64> {
        if self.open.len() <= max_size {
            return Vec::new();
        }
        let Some(&cut) = self.open.keys().nth(max_size) else {
            return Vec::new();
        };
        let dropped = self.open.split_off(&cut);
        dropped.into_values().map(|node| node.node_id).collect()
    }
}
