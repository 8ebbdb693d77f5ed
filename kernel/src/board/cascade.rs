//! Clear, trigger, settle, repeat: the resolution loop after a swap.
//!
//! One *round* clears a planned set of cells (expanded by any specials caught
//! in it), damages obstacles next to or hit by the clear, drops pieces, and
//! refills the open top of each column. Rounds repeat while the settled
//! board contains runs, up to [`MAX_CASCADE_ROUNDS`].

use std::collections::BTreeSet;

use crate::board::state::BoardState;
use crate::level::definition::{SpecialKind, EMPTY};

/// Hard cap on resolution rounds per move.
pub(crate) const MAX_CASCADE_ROUNDS: u32 = 64;

/// Points per cleared cell, multiplied by the round number.
pub(crate) const POINTS_PER_CELL: u64 = 10;

/// Minimum run length that clears.
const MIN_RUN: usize = 3;

/// A maximal straight run of one colour across live cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Run {
    pub(crate) cells: Vec<usize>,
    pub(crate) horizontal: bool,
}

impl Run {
    pub(crate) fn contains(&self, idx: usize) -> bool {
        self.cells.contains(&idx)
    }
}

/// What the next round clears.
#[derive(Debug, Default)]
pub(crate) struct ClearPlan {
    pub(crate) cells: BTreeSet<usize>,
    /// Specials that fire regardless of being matched (special-special swaps).
    pub(crate) forced_triggers: Vec<usize>,
    /// Colour bombs fired at a chosen colour: `(bomb_cell, colour)`.
    pub(crate) colour_bursts: Vec<(usize, u8)>,
    /// Specials created by long runs: `(cell, kind)`. The cell keeps its piece.
    pub(crate) creations: Vec<(usize, SpecialKind)>,
}

/// Totals over every round of one move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct CascadeReport {
    pub(crate) cleared: u64,
    pub(crate) score_delta: u64,
    pub(crate) rounds: u32,
    pub(crate) specials_triggered: u64,
    pub(crate) obstacles_damaged: u64,
}

/// Every maximal run of length ≥ 3, horizontal runs first, in scan order.
pub(crate) fn find_runs(state: &BoardState) -> Vec<Run> {
    let (w, h) = (state.width, state.height);
    let colour_at = |idx: usize| state.is_live(idx).then(|| state.pieces[idx]);
    let mut runs = Vec::new();

    for y in 0..h {
        let mut x = 0;
        while x < w {
            let Some(colour) = colour_at(y * w + x) else {
                x += 1;
                continue;
            };
            let mut end = x + 1;
            while end < w && colour_at(y * w + end) == Some(colour) {
                end += 1;
            }
            if end - x >= MIN_RUN {
                runs.push(Run {
                    cells: (x..end).map(|cx| y * w + cx).collect(),
                    horizontal: true,
                });
            }
            x = end;
        }
    }

    for x in 0..w {
        let mut y = 0;
        while y < h {
            let Some(colour) = colour_at(y * w + x) else {
                y += 1;
                continue;
            };
            let mut end = y + 1;
            while end < h && colour_at(end * w + x) == Some(colour) {
                end += 1;
            }
            if end - y >= MIN_RUN {
                runs.push(Run {
                    cells: (y..end).map(|cy| cy * w + x).collect(),
                    horizontal: false,
                });
            }
            y = end;
        }
    }

    runs
}

/// Turn runs into a clear plan. A run of 4 leaves a line special, 5+ a colour
/// bomb, placed on the first anchor inside the run or else the run's middle.
pub(crate) fn plan_from_runs(runs: &[Run], anchors: &[usize]) -> ClearPlan {
    let mut plan = ClearPlan::default();
    for run in runs {
        plan.cells.extend(run.cells.iter().copied());
        let kind = match run.cells.len() {
            0..=3 => None,
            4 if run.horizontal => Some(SpecialKind::LineColumn),
            4 => Some(SpecialKind::LineRow),
            _ => Some(SpecialKind::ColorBomb),
        };
        let Some(kind) = kind else { continue };
        let at = anchors
            .iter()
            .copied()
            .find(|&a| run.contains(a))
            .unwrap_or(run.cells[run.cells.len() / 2]);
        if !plan.creations.iter().any(|&(cell, _)| cell == at) {
            plan.creations.push((at, kind));
        }
    }
    plan
}

/// Run rounds until the board is stable.
pub(crate) fn resolve(state: &mut BoardState, first: ClearPlan) -> CascadeReport {
    let mut report = CascadeReport::default();
    let mut plan = first;
    let mut round = 0u32;
    loop {
        round += 1;
        clear_round(state, plan, round, &mut report);
        settle(state);
        if round >= MAX_CASCADE_ROUNDS {
            break;
        }
        let runs = find_runs(state);
        if runs.is_empty() {
            break;
        }
        plan = plan_from_runs(&runs, &[]);
    }
    report.rounds = round;
    report
}

fn clear_round(state: &mut BoardState, plan: ClearPlan, round: u32, report: &mut CascadeReport) {
    let ClearPlan {
        mut cells,
        forced_triggers,
        colour_bursts,
        creations,
    } = plan;
    let creation_cells: BTreeSet<usize> = creations.iter().map(|&(cell, _)| cell).collect();
    let mut triggered: BTreeSet<usize> = BTreeSet::new();
    let mut damaged: BTreeSet<usize> = BTreeSet::new();
    let mut fired = 0u64;

    for (bomb, colour) in colour_bursts {
        triggered.insert(bomb);
        fired += 1;
        cells.insert(bomb);
        cells.extend((0..state.pieces.len()).filter(|&i| state.is_live(i) && state.pieces[i] == colour));
    }

    cells.extend(forced_triggers.iter().copied());
    let mut queue: Vec<usize> = forced_triggers;
    queue.extend(cells.iter().copied().filter(|&i| state.specials[i].is_some()));

    while let Some(cell) = queue.pop() {
        let Some(kind) = state.specials[cell] else {
            continue;
        };
        if !triggered.insert(cell) {
            continue;
        }
        fired += 1;
        for target in effect_area(state, cell, kind) {
            if state.obstacles[target] > 0 {
                damaged.insert(target);
            } else if state.pieces[target] != EMPTY
                && cells.insert(target)
                && state.specials[target].is_some()
            {
                queue.push(target);
            }
        }
    }

    for &cell in &cells {
        damaged.extend(neighbours(state, cell).filter(|&n| state.obstacles[n] > 0));
    }

    let mut cleared = 0u64;
    for &cell in &cells {
        if creation_cells.contains(&cell) {
            continue;
        }
        let piece = state.pieces[cell];
        if piece == EMPTY {
            continue;
        }
        *state.collected.entry(piece).or_insert(0) += 1;
        state.pieces[cell] = EMPTY;
        state.specials[cell] = None;
        cleared += 1;
    }
    for (cell, kind) in creations {
        if state.pieces[cell] != EMPTY {
            state.specials[cell] = Some(kind);
        }
    }
    for cell in damaged {
        state.obstacles[cell] = state.obstacles[cell].saturating_sub(1);
        state.obstacles_cleared += 1;
        report.obstacles_damaged += 1;
    }

    let delta = cleared * POINTS_PER_CELL * u64::from(round);
    state.score = state.score.saturating_add(delta);
    state.specials_triggered += fired;
    report.cleared += cleared;
    report.score_delta += delta;
    report.specials_triggered += fired;
}

/// Cells hit when the special at `cell` fires (excluding `cell`).
fn effect_area(state: &BoardState, cell: usize, kind: SpecialKind) -> Vec<usize> {
    let (w, h) = (state.width, state.height);
    let (cx, cy) = (cell % w, cell / w);
    let area: Vec<usize> = match kind {
        SpecialKind::LineRow => (0..w).map(|x| cy * w + x).collect(),
        SpecialKind::LineColumn => (0..h).map(|y| y * w + cx).collect(),
        SpecialKind::Bomb => {
            let xs = cx.saturating_sub(1)..=(cx + 1).min(w - 1);
            let ys = cy.saturating_sub(1)..=(cy + 1).min(h - 1);
            ys.flat_map(|y| xs.clone().map(move |x| y * w + x)).collect()
        }
        SpecialKind::ColorBomb => {
            let colour = state.pieces[cell];
            (0..state.pieces.len())
                .filter(|&i| state.is_live(i) && state.pieces[i] == colour)
                .collect()
        }
    };
    area.into_iter().filter(|&i| i != cell).collect()
}

fn neighbours(state: &BoardState, cell: usize) -> impl Iterator<Item = usize> {
    let (w, h) = (state.width, state.height);
    let (x, y) = (cell % w, cell / w);
    [
        (x > 0).then(|| cell - 1),
        (x + 1 < w).then(|| cell + 1),
        (y > 0).then(|| cell - w),
        (y + 1 < h).then(|| cell + w),
    ]
    .into_iter()
    .flatten()
}

/// Gravity, then refill of each column's open top segment.
///
/// Locked cells neither fall nor let pieces pass: they act as floors for the
/// segment above them, and only the segment touching the top edge refills.
fn settle(state: &mut BoardState) {
    let (w, h) = (state.width, state.height);
    for x in 0..w {
        let mut write: Option<usize> = Some(h - 1);
        for y in (0..h).rev() {
            let idx = y * w + x;
            if state.obstacles[idx] > 0 {
                write = y.checked_sub(1);
                continue;
            }
            if state.pieces[idx] == EMPTY {
                continue;
            }
            let Some(target_y) = write else { continue };
            if target_y != y {
                let target = target_y * w + x;
                state.pieces[target] = state.pieces[idx];
                state.specials[target] = state.specials[idx];
                state.pieces[idx] = EMPTY;
                state.specials[idx] = None;
            }
            write = target_y.checked_sub(1);
        }

        for y in 0..h {
            let idx = y * w + x;
            if state.obstacles[idx] > 0 {
                break;
            }
            if state.pieces[idx] == EMPTY {
                state.pieces[idx] = state.next_spawn();
            }
        }
    }
}
