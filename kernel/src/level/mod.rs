//! Level description: the immutable input to every validation.

pub mod definition;
pub mod objective;

pub use definition::{Coord, GridSize, LevelDefinition, LevelError, SpecialKind, EMPTY};
pub use objective::{Goal, Objective};
