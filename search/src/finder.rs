//! Best-first enumeration of distinct solution paths.
//!
//! Nodes are ordered by `f = moves so far + remaining-progress cost`. A child
//! that meets the goal is recorded as a solution instead of being pushed, so
//! every recorded path is minimal along its own branch.

use std::time::Instant;

use cascade_kernel::board::{transitions, BoardState, Move};
use cascade_kernel::level::{Goal, LevelDefinition};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SearchError;
use crate::frontier::BestFirstFrontier;
use crate::metrics::ValidationMetrics;
use crate::node::{progress_cost, PathNode};
use crate::path::{rank_distinct, SolutionPath};
use crate::policy::SearchPolicy;

/// Why the path finder stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinderTermination {
    /// The requested number of paths was found.
    PathQuotaReached,
    /// Nothing left to expand.
    FrontierExhausted,
    ExpansionBudgetExceeded,
    TimeBudgetExceeded,
}

/// Result of one path-finder run.
#[derive(Debug, Clone)]
pub struct PathFinderOutcome {
    pub paths: Vec<SolutionPath>,
    pub termination: FinderTermination,
    /// True iff the frontier emptied without any pruning or candidate cap,
    /// so `paths` lists every solution (up to the quota).
    pub exhaustive: bool,
    pub expansions: u64,
    pub dead_ends: u64,
    pub frontier_high_water: u64,
    /// Nodes generated, root included.
    pub nodes_generated: u64,
    pub metrics: ValidationMetrics,
}

/// Parent link kept for every generated node, indexed by `node_id`.
#[derive(Debug, Clone, Copy)]
struct Link {
    parent_id: Option<u64>,
    mv: Option<Move>,
}

fn reconstruct_moves(links: &[Link], node_id: u64) -> Vec<Move> {
    let mut moves = Vec::new();
    let mut cursor = Some(node_id);
    while let Some(id) = cursor {
        #[allow(clippy::cast_possible_truncation)]
        let Some(link) = links.get(id as usize) else {
            break;
        };
        if let Some(mv) = link.mv {
            moves.push(mv);
        }
        cursor = link.parent_id;
    }
    moves.reverse();
    moves
}

/// Enumerate up to `max_paths` distinct solution paths for `level`.
///
/// # Errors
///
/// Returns [`SearchError`] if the policy or the level fails validation.
#[allow(clippy::too_many_lines)]
pub fn find_paths(
    level: &LevelDefinition,
    policy: &SearchPolicy,
    max_paths: usize,
) -> Result<PathFinderOutcome, SearchError> {
    policy.validate()?;
    let root_state = BoardState::from_level(level)?;
    let goal = Goal::from_level(level);
    let started = Instant::now();
    let budget = policy.time_budget();

    let mut frontier = BestFirstFrontier::new();
    let mut links: Vec<Link> = Vec::new();
    let mut found: Vec<SolutionPath> = Vec::new();
    let mut expansions = 0u64;
    let mut budget_limited = false;
    let mut total_moves = 0u64;
    let mut special_moves = 0u64;
    let mut max_combo = 0u32;

    if goal.is_met(&root_state) {
        found.push(SolutionPath::from_moves(Vec::new(), &root_state, level.move_limit));
        return Ok(PathFinderOutcome {
            paths: found,
            termination: FinderTermination::FrontierExhausted,
            exhaustive: true,
            expansions: 0,
            dead_ends: 0,
            frontier_high_water: 0,
            nodes_generated: 1,
            metrics: ValidationMetrics {
                completion_rate: 1.0,
                simulation_time_ms: started.elapsed().as_secs_f64() * 1000.0,
                ..ValidationMetrics::default()
            },
        });
    }

    links.push(Link {
        parent_id: None,
        mv: None,
    });
    frontier.push(PathNode {
        node_id: 0,
        parent_id: None,
        h_cost: progress_cost(&goal, &root_state),
        state: root_state,
        depth: 0,
        g_cost: 0,
        creation_order: 0,
        producing_move: None,
    });

    let max_candidates = usize::try_from(policy.max_candidates_per_node).unwrap_or(usize::MAX);
    let max_frontier = usize::try_from(policy.max_frontier_size).unwrap_or(usize::MAX);

    let termination = loop {
        if found.len() >= max_paths {
            break FinderTermination::PathQuotaReached;
        }
        if frontier.is_empty() {
            break FinderTermination::FrontierExhausted;
        }
        if expansions >= policy.max_expansions {
            break FinderTermination::ExpansionBudgetExceeded;
        }
        if started.elapsed() >= budget {
            break FinderTermination::TimeBudgetExceeded;
        }
        let Some(current) = frontier.pop() else {
            break FinderTermination::FrontierExhausted;
        };
        expansions += 1;

        if goal.is_out_of_moves(&current.state) {
            frontier.mark_dead_end(current.node_id);
            continue;
        }

        let mut children: Vec<(i64, usize, _)> = transitions(&current.state)
            .into_iter()
            .enumerate()
            .map(|(i, t)| (progress_cost(&goal, &t.state), i, t))
            .collect();
        if children.is_empty() {
            frontier.mark_dead_end(current.node_id);
            continue;
        }
        children.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));
        if children.len() > max_candidates {
            children.truncate(max_candidates);
            budget_limited = true;
        }

        for (h_cost, _, t) in children {
            total_moves += 1;
            special_moves += t.outcome.specials_triggered;
            max_combo = max_combo.max(t.outcome.combo);

            let node_id = links.len() as u64;
            links.push(Link {
                parent_id: Some(current.node_id),
                mv: Some(t.mv),
            });
            if goal.is_met(&t.state) {
                let moves = reconstruct_moves(&links, node_id);
                found.push(SolutionPath::from_moves(moves, &t.state, level.move_limit));
                if found.len() >= max_paths {
                    break;
                }
                continue;
            }
            // A child with no moves left can only be popped as a dead end.
            if goal.is_out_of_moves(&t.state) {
                frontier.mark_dead_end(node_id);
                continue;
            }
            frontier.push(PathNode {
                node_id,
                parent_id: Some(current.node_id),
                state: t.state,
                depth: current.depth + 1,
                g_cost: current.g_cost + 1,
                h_cost,
                creation_order: node_id,
                producing_move: Some(t.mv),
            });
        }

        if !frontier.prune_to(max_frontier).is_empty() {
            budget_limited = true;
        }
    };

    let nodes_generated = links.len() as u64;
    #[allow(clippy::cast_precision_loss)]
    let metrics = ValidationMetrics {
        total_moves,
        special_moves,
        average_score: if found.is_empty() {
            0.0
        } else {
            found.iter().map(|p| p.score as f64).sum::<f64>() / found.len() as f64
        },
        max_combo,
        completion_rate: if total_moves == 0 {
            0.0
        } else {
            found.len() as f64 / total_moves as f64
        },
        simulation_time_ms: started.elapsed().as_secs_f64() * 1000.0,
    };

    debug!(
        level = %level.id,
        ?termination,
        expansions,
        paths = found.len(),
        "path finder finished"
    );

    Ok(PathFinderOutcome {
        paths: rank_distinct(found, max_paths),
        exhaustive: termination == FinderTermination::FrontierExhausted && !budget_limited,
        termination,
        expansions,
        dead_ends: frontier.dead_end_count() as u64,
        frontier_high_water: frontier.high_water(),
        nodes_generated,
        metrics,
    })
}
