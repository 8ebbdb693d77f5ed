//! Board state and the swap-and-cascade rules the solvers search over.
//!
//! # Dependency direction
//!
//! `state` ← `cascade` ← `apply`. Only `apply` is a public entry point for
//! changing a board; every transition produces a fresh [`state::BoardState`].

pub mod apply;
pub(crate) mod cascade;
pub mod state;

pub use apply::{apply_swap, candidate_swaps, transitions, Move, MoveError, StepOutcome, Transition};
pub use state::BoardState;
