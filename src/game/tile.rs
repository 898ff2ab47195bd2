use std::fmt;

use serde::{Deserialize, Serialize};

/// Highest exponent a tile can reach (2^11 = 2048). Tiles at this value never merge.
pub const MAX_TILE_VALUE: u8 = 11;

/// Opaque handle identifying a tile for the lifetime of a board.
///
/// Ids are never reused, so the presentation layer can key its visuals by them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(pub u32);

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A cell on the board. Column `x` grows to the right, row `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Self {
        Position { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Merge state a tile carries between move execution and merge resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PendingMerge {
    #[default]
    None,
    /// The tile absorbs its partner and takes this value.
    PromoteTo(u8),
    /// The tile was absorbed and disappears once merges resolve.
    MarkedForRemoval,
}

impl PendingMerge {
    pub fn is_none(self) -> bool {
        self == PendingMerge::None
    }
}

/// A single numbered piece. The displayed number is `2^value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub(crate) id: TileId,
    pub(crate) value: u8,
    pub(crate) position: Position,
    pub(crate) pending: PendingMerge,
}

impl Tile {
    pub(crate) fn new(id: TileId, value: u8, position: Position) -> Self {
        Tile {
            id,
            value,
            position,
            pending: PendingMerge::None,
        }
    }

    pub fn id(&self) -> TileId {
        self.id
    }

    /// Exponent in `1..=MAX_TILE_VALUE`.
    pub fn value(&self) -> u8 {
        self.value
    }

    /// Displayed magnitude, `2^value`.
    pub fn face_value(&self) -> u32 {
        1u32 << self.value
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn pending(&self) -> PendingMerge {
        self.pending
    }

    /// Whether this tile may still merge with an equal tile this turn.
    pub fn can_merge_with(&self, other: &Tile) -> bool {
        self.value == other.value && self.value < MAX_TILE_VALUE && other.pending.is_none()
    }
}
