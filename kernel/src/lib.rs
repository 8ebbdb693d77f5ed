//! Cascade Kernel: the deterministic core of the level validator.
//!
//! # API Surface
//!
//! - [`level::LevelDefinition`] -- immutable level input, validated on load
//! - [`board::apply_swap`] -- play one move, producing a new board + outcome
//! - [`level::Goal`] -- completion test and progress measure for a level
//! - [`digest::hash::canonical_hash`] -- domain-separated content hashing
//!
//! # Module Dependency Direction
//!
//! `digest` ← `level` ↔ `board`
//!
//! `level` and `board` share only the objective accounting (`Goal` reads
//! board counters). Nothing in this crate allocates threads or reads the clock.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod board;
pub mod digest;
pub mod level;
