//! `BoardState`: one immutable snapshot of a board mid-play.

use std::collections::BTreeMap;

use crate::digest::hash::{canonical_hash, ContentHash, HashDomain};
use crate::level::definition::{Coord, LevelDefinition, LevelError, SpecialKind, EMPTY};

/// A board snapshot plus the running counters objectives are measured on.
///
/// Cells are stored row-major (`index = y * width + x`) for cache-friendly
/// run scanning; the level's column-major layers are transposed on load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState {
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) pieces: Vec<u8>,
    pub(crate) obstacles: Vec<u8>,
    pub(crate) specials: Vec<Option<SpecialKind>>,
    pub(crate) palette: Vec<u8>,
    pub(crate) spawn_seed: u64,
    pub(crate) spawn_counter: u64,
    pub(crate) score: u64,
    pub(crate) moves_used: u32,
    pub(crate) collected: BTreeMap<u8, u64>,
    pub(crate) obstacles_cleared: u64,
    pub(crate) specials_triggered: u64,
}

impl BoardState {
    /// Load the initial board of a level.
    ///
    /// # Errors
    ///
    /// Returns any [`LevelDefinition::validate`] error.
    pub fn from_level(level: &LevelDefinition) -> Result<Self, LevelError> {
        level.validate()?;
        let width = usize::from(level.size.width);
        let height = usize::from(level.size.height);
        let cells = width * height;

        let mut pieces = vec![EMPTY; cells];
        let mut obstacles = vec![0u8; cells];
        let mut specials = vec![None; cells];
        for x in 0..width {
            for y in 0..height {
                let idx = y * width + x;
                pieces[idx] = level.grid[x][y];
                obstacles[idx] = level.obstacles[x][y];
                // validate() already rejected unknown codes.
                specials[idx] = SpecialKind::from_code(level.special_pieces[x][y]).unwrap_or(None);
            }
        }

        let level_hash = level.content_hash();
        let spawn_seed =
            canonical_hash(HashDomain::SpawnSeed, level_hash.as_str().as_bytes()).seed_u64();

        Ok(Self {
            width,
            height,
            pieces,
            obstacles,
            specials,
            palette: level.palette(),
            spawn_seed,
            spawn_counter: 0,
            score: 0,
            moves_used: 0,
            collected: BTreeMap::new(),
            obstacles_cleared: 0,
            specials_triggered: 0,
        })
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    pub(crate) fn index(&self, coord: Coord) -> Option<usize> {
        let (x, y) = (usize::from(coord.x), usize::from(coord.y));
        (x < self.width && y < self.height).then_some(y * self.width + x)
    }

    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn coord(&self, idx: usize) -> Coord {
        // width and height come from u16 level dimensions.
        Coord::new((idx % self.width) as u16, (idx / self.width) as u16)
    }

    /// Piece code at `coord`, or [`EMPTY`] off the board.
    #[must_use]
    pub fn piece(&self, coord: Coord) -> u8 {
        self.index(coord).map_or(EMPTY, |i| self.pieces[i])
    }

    /// Obstacle layers remaining at `coord`.
    #[must_use]
    pub fn obstacle(&self, coord: Coord) -> u8 {
        self.index(coord).map_or(0, |i| self.obstacles[i])
    }

    #[must_use]
    pub fn special(&self, coord: Coord) -> Option<SpecialKind> {
        self.index(coord).and_then(|i| self.specials[i])
    }

    /// A live cell holds a piece and is not locked by an obstacle.
    pub(crate) fn is_live(&self, idx: usize) -> bool {
        self.pieces[idx] != EMPTY && self.obstacles[idx] == 0
    }

    #[must_use]
    pub fn score(&self) -> u64 {
        self.score
    }

    #[must_use]
    pub fn moves_used(&self) -> u32 {
        self.moves_used
    }

    /// Pieces of colour `piece` cleared so far.
    #[must_use]
    pub fn collected(&self, piece: u8) -> u64 {
        self.collected.get(&piece).copied().unwrap_or(0)
    }

    /// Obstacle layers removed so far.
    #[must_use]
    pub fn obstacles_cleared(&self) -> u64 {
        self.obstacles_cleared
    }

    #[must_use]
    pub fn specials_triggered(&self) -> u64 {
        self.specials_triggered
    }

    /// Number of cells still holding a special piece.
    #[must_use]
    pub fn special_count(&self) -> usize {
        self.specials.iter().filter(|s| s.is_some()).count()
    }

    /// Canonical fingerprint of the visible board plus counters.
    #[must_use]
    pub fn fingerprint(&self) -> ContentHash {
        let mut buf = Vec::with_capacity(3 * self.pieces.len() + 48);
        buf.extend_from_slice(&(self.width as u64).to_le_bytes());
        buf.extend_from_slice(&(self.height as u64).to_le_bytes());
        buf.extend_from_slice(&self.pieces);
        buf.extend_from_slice(&self.obstacles);
        buf.extend(self.specials.iter().map(|s| s.map_or(0, SpecialKind::code)));
        buf.extend_from_slice(&self.spawn_counter.to_le_bytes());
        buf.extend_from_slice(&self.score.to_le_bytes());
        buf.extend_from_slice(&self.moves_used.to_le_bytes());
        canonical_hash(HashDomain::BoardState, &buf)
    }

    /// Next refill colour from the deterministic spawn sequence.
    ///
    /// Returns [`EMPTY`] when the level has no colours to draw from.
    pub(crate) fn next_spawn(&mut self) -> u8 {
        if self.palette.is_empty() {
            return EMPTY;
        }
        let z = splitmix64(self.spawn_seed ^ self.spawn_counter.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        self.spawn_counter += 1;
        #[allow(clippy::cast_possible_truncation)]
        let pick = (z % self.palette.len() as u64) as usize;
        self.palette[pick]
    }
}

fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
