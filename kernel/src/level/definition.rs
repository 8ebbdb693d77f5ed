//! `LevelDefinition`: grid, obstacles, special pieces, objectives, move limit.
//!
//! Grids are stored column-major (`grid[x][y]`), `y = 0` is the top row.
//! Nothing in this module mutates a level after construction; the builder
//! helpers consume and return `Self`.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::digest::hash::{canonical_hash, ContentHash, HashDomain};
use crate::level::objective::Objective;

/// Piece code for a cell that holds no piece.
pub const EMPTY: u8 = 0;

/// A grid coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub x: u16,
    pub y: u16,
}

impl Coord {
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// True if `other` shares an edge with `self`.
    #[must_use]
    pub fn is_adjacent(&self, other: &Coord) -> bool {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y) == 1
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// Board dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

impl GridSize {
    #[must_use]
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Total number of cells.
    #[must_use]
    pub fn cells(&self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }
}

/// Special piece kinds and their grid codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialKind {
    /// Clears its whole row when triggered (code 1).
    LineRow,
    /// Clears its whole column when triggered (code 2).
    LineColumn,
    /// Clears the surrounding 3x3 block (code 3).
    Bomb,
    /// Clears every piece of one colour (code 4).
    ColorBomb,
}

impl SpecialKind {
    /// Grid code for this kind.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::LineRow => 1,
            Self::LineColumn => 2,
            Self::Bomb => 3,
            Self::ColorBomb => 4,
        }
    }

    /// Decode a grid code. `Ok(None)` is "no special"; unknown codes are returned as `Err`.
    ///
    /// # Errors
    ///
    /// Returns the offending code if it is not 0..=4.
    pub const fn from_code(code: u8) -> Result<Option<Self>, u8> {
        match code {
            0 => Ok(None),
            1 => Ok(Some(Self::LineRow)),
            2 => Ok(Some(Self::LineColumn)),
            3 => Ok(Some(Self::Bomb)),
            4 => Ok(Some(Self::ColorBomb)),
            other => Err(other),
        }
    }
}

/// Rejected level input. These are precondition failures: a level that
/// fails here never reaches search.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    #[error("level grid must have non-zero width and height")]
    EmptyGrid,
    #[error("{layer} layer does not match the declared {width}x{height} size")]
    ShapeMismatch {
        layer: &'static str,
        width: u16,
        height: u16,
    },
    #[error("move limit must be greater than zero")]
    ZeroMoveLimit,
    #[error("level must declare at least one objective")]
    NoObjectives,
    #[error("unknown special piece code {code} at ({x},{y})")]
    UnknownSpecial { x: usize, y: usize, code: u8 },
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRows {
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error("unrecognised cell {cell:?} in row {row}")]
    BadCell { row: usize, cell: char },
    #[error("grid exceeds {max} cells per side")]
    TooLarge { max: usize },
    #[error("level JSON rejected: {detail}")]
    Json { detail: String },
}

/// Immutable description of a level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDefinition {
    pub id: String,
    pub size: GridSize,
    /// Piece codes, `grid[x][y]`. `0` is an empty cell.
    pub grid: Vec<Vec<u8>>,
    /// Obstacle layers, `obstacles[x][y]`. A cell with layers left is locked.
    pub obstacles: Vec<Vec<u8>>,
    /// Special piece codes, `special_pieces[x][y]` (see [`SpecialKind::code`]).
    pub special_pieces: Vec<Vec<u8>>,
    pub objectives: Vec<Objective>,
    pub move_limit: u32,
    pub target_score: u64,
}

impl LevelDefinition {
    /// Build a level from text rows (top row first).
    ///
    /// `1`-`9` are piece colours, `.` is an empty cell. Obstacle and special
    /// layers start empty; add them with [`Self::with_obstacle`] and
    /// [`Self::with_special`].
    ///
    /// # Errors
    ///
    /// Returns [`LevelError`] for ragged rows, unknown characters, oversized
    /// grids, or a resulting level that fails [`Self::validate`].
    pub fn from_rows(
        id: &str,
        rows: &[&str],
        move_limit: u32,
        target_score: u64,
        objectives: Vec<Objective>,
    ) -> Result<Self, LevelError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.chars().count());
        let (Ok(w16), Ok(h16)) = (u16::try_from(width), u16::try_from(height)) else {
            return Err(LevelError::TooLarge {
                max: usize::from(u16::MAX),
            });
        };

        let mut grid = vec![vec![EMPTY; height]; width];
        for (y, row) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found != width {
                return Err(LevelError::RaggedRows {
                    row: y,
                    found,
                    expected: width,
                });
            }
            for (x, cell) in row.chars().enumerate() {
                grid[x][y] = match cell {
                    '.' => EMPTY,
                    // to_digit(10) is at most 9, so the cast cannot truncate.
                    #[allow(clippy::cast_possible_truncation)]
                    '1'..='9' => cell.to_digit(10).map_or(EMPTY, |d| d as u8),
                    other => return Err(LevelError::BadCell { row: y, cell: other }),
                };
            }
        }

        let level = Self {
            id: id.to_string(),
            size: GridSize::new(w16, h16),
            obstacles: vec![vec![0; height]; width],
            special_pieces: vec![vec![0; height]; width],
            grid,
            objectives,
            move_limit,
            target_score,
        };
        level.validate()?;
        Ok(level)
    }

    /// Return a copy with `layers` obstacle layers at `(x, y)`.
    ///
    /// Out-of-range coordinates leave the level unchanged.
    #[must_use]
    pub fn with_obstacle(mut self, x: usize, y: usize, layers: u8) -> Self {
        if let Some(cell) = self.obstacles.get_mut(x).and_then(|col| col.get_mut(y)) {
            *cell = layers;
        }
        self
    }

    /// Return a copy with a special piece at `(x, y)`.
    ///
    /// Out-of-range coordinates leave the level unchanged.
    #[must_use]
    pub fn with_special(mut self, x: usize, y: usize, kind: SpecialKind) -> Self {
        if let Some(cell) = self.special_pieces.get_mut(x).and_then(|col| col.get_mut(y)) {
            *cell = kind.code();
        }
        self
    }

    /// Check the structural invariants.
    ///
    /// # Errors
    ///
    /// - [`LevelError::EmptyGrid`] if either dimension is zero
    /// - [`LevelError::ShapeMismatch`] if any layer disagrees with `size`
    /// - [`LevelError::ZeroMoveLimit`] if `move_limit == 0`
    /// - [`LevelError::NoObjectives`] if `objectives` is empty
    /// - [`LevelError::UnknownSpecial`] for special codes outside 0..=4
    pub fn validate(&self) -> Result<(), LevelError> {
        if self.size.width == 0 || self.size.height == 0 {
            return Err(LevelError::EmptyGrid);
        }
        for (layer, cells) in [
            ("grid", &self.grid),
            ("obstacles", &self.obstacles),
            ("special_pieces", &self.special_pieces),
        ] {
            let width = usize::from(self.size.width);
            let height = usize::from(self.size.height);
            if cells.len() != width || cells.iter().any(|col| col.len() != height) {
                return Err(LevelError::ShapeMismatch {
                    layer,
                    width: self.size.width,
                    height: self.size.height,
                });
            }
        }
        if self.move_limit == 0 {
            return Err(LevelError::ZeroMoveLimit);
        }
        if self.objectives.is_empty() {
            return Err(LevelError::NoObjectives);
        }
        for (x, col) in self.special_pieces.iter().enumerate() {
            for (y, &code) in col.iter().enumerate() {
                if let Err(code) = SpecialKind::from_code(code) {
                    return Err(LevelError::UnknownSpecial { x, y, code });
                }
            }
        }
        Ok(())
    }

    /// Total number of cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.size.cells()
    }

    /// Number of cells carrying at least one obstacle layer.
    #[must_use]
    pub fn obstacle_count(&self) -> usize {
        self.obstacles.iter().flatten().filter(|&&l| l > 0).count()
    }

    /// Distinct piece colours on the initial board, ascending.
    ///
    /// This is the refill palette.
    #[must_use]
    pub fn palette(&self) -> Vec<u8> {
        let colours: BTreeSet<u8> = self
            .grid
            .iter()
            .flatten()
            .copied()
            .filter(|&p| p != EMPTY)
            .collect();
        colours.into_iter().collect()
    }

    /// Deterministic content hash of the level's structural data.
    ///
    /// Covers id, size, move limit, target score, all three grid layers and
    /// the objectives. Two levels hash equal iff they validate identically.
    #[must_use]
    pub fn content_hash(&self) -> ContentHash {
        canonical_hash(HashDomain::LevelContent, &self.identity_bytes())
    }

    /// Length-prefixed binary encoding hashed by [`Self::content_hash`].
    fn identity_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(64 + 3 * self.cell_count());
        put_len(&mut buf, self.id.len());
        buf.extend_from_slice(self.id.as_bytes());
        buf.extend_from_slice(&self.size.width.to_le_bytes());
        buf.extend_from_slice(&self.size.height.to_le_bytes());
        buf.extend_from_slice(&self.move_limit.to_le_bytes());
        buf.extend_from_slice(&self.target_score.to_le_bytes());
        for layer in [&self.grid, &self.obstacles, &self.special_pieces] {
            put_len(&mut buf, layer.len());
            for col in layer {
                put_len(&mut buf, col.len());
                buf.extend_from_slice(col);
            }
        }
        put_len(&mut buf, self.objectives.len());
        for objective in &self.objectives {
            objective.write_identity(&mut buf);
        }
        buf
    }

    /// Parse a level from JSON and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`LevelError::Json`] on malformed JSON, or any
    /// [`Self::validate`] error.
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let level: Self = serde_json::from_str(json).map_err(|e| LevelError::Json {
            detail: e.to_string(),
        })?;
        level.validate()?;
        Ok(level)
    }

    /// Serialize to compact JSON.
    ///
    /// # Errors
    ///
    /// Returns [`LevelError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, LevelError> {
        serde_json::to_string(self).map_err(|e| LevelError::Json {
            detail: e.to_string(),
        })
    }
}

fn put_len(buf: &mut Vec<u8>, len: usize) {
    buf.extend_from_slice(&(len as u64).to_le_bytes());
}
