use std::fmt;

use rand::Rng;

use super::direction::Direction;
use super::events::{EventQueue, PresentationEvent};
use super::tile::{PendingMerge, Position, Tile, TileId, MAX_TILE_VALUE};

pub const DEFAULT_BOARD_SIZE: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("board is full")]
    Full,

    #[error("position {position} is outside a {size}x{size} board")]
    OutOfBounds { position: Position, size: usize },

    #[error("tile value {0} is outside 1..=11")]
    InvalidValue(u8),

    #[error("cell {0} is already occupied")]
    Occupied(Position),

    #[error("layout has {found} rows, expected {expected}")]
    RowCount { expected: usize, found: usize },

    #[error("layout row {row} has {found} cells, expected {expected}")]
    Shape {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Where a tile ends up when slid in one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveTarget {
    pub position: Position,
    /// Equal-valued tile occupying `position` that the mover will absorb.
    pub merge_with: Option<TileId>,
}

/// Result of [`Board::execute_move`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveSummary {
    pub moved: bool,
    pub merges: usize,
}

/// Result of [`Board::check_game_end`]. `won` wins over `over`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EndCheck {
    pub over: bool,
    pub won: bool,
}

/// Square board holding its tiles in insertion slots rather than a dense grid.
///
/// Two tiles may share a cell between [`execute_move`](Board::execute_move) and
/// [`resolve_merges`](Board::resolve_merges): the mover has slid onto its merge
/// partner but the fusion has not been committed yet. Outside that window every
/// cell holds at most one tile.
#[derive(Debug, Clone)]
pub struct Board {
    size: usize,
    slots: Vec<Option<Tile>>,
    next_id: u32,
    moved: bool,
}

impl Board {
    /// Create an empty `size`×`size` board.
    pub fn new(size: usize) -> Self {
        Board {
            size,
            slots: vec![None; size * size],
            next_id: 0,
            moved: false,
        }
    }

    /// Build a board from row-major exponents, `0` meaning empty.
    pub fn from_rows(rows: &[&[u8]]) -> Result<Self, BoardError> {
        let mut board = Board::new(rows.len());
        board.fill_rows(rows, &mut Vec::new())?;
        Ok(board)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// True if the last move changed any tile's position.
    pub fn moved(&self) -> bool {
        self.moved
    }

    pub fn clear_moved(&mut self) {
        self.moved = false;
    }

    /// Tiles in storage-slot order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.slots.iter().flatten()
    }

    pub fn tile_count(&self) -> usize {
        self.tiles().count()
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles().find(|t| t.id == id)
    }

    /// Tile stored in slot `index`, if any.
    pub fn slot(&self, index: usize) -> Option<&Tile> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// First tile (in slot order) occupying `position`.
    pub fn tile_at(&self, position: Position) -> Option<&Tile> {
        self.tiles().find(|t| t.position == position)
    }

    /// Every tile occupying `position`; more than one only inside a turn.
    pub fn tiles_at(&self, position: Position) -> impl Iterator<Item = &Tile> {
        self.tiles().filter(move |t| t.position == position)
    }

    pub fn value_at(&self, position: Position) -> Option<u8> {
        self.tile_at(position).map(Tile::value)
    }

    pub fn max_value(&self) -> u8 {
        self.tiles().map(Tile::value).max().unwrap_or(0)
    }

    pub fn empty_cells(&self) -> Vec<Position> {
        (0..self.size)
            .flat_map(|y| (0..self.size).map(move |x| Position::new(x, y)))
            .filter(|&p| self.tile_at(p).is_none())
            .collect()
    }

    pub fn is_full(&self) -> bool {
        self.empty_cells().is_empty()
    }

    /// True outside the move→merge window: no markers, no shared cells.
    pub fn is_settled(&self) -> bool {
        self.tiles().all(|t| t.pending.is_none())
            && self.tiles().all(|t| self.tiles_at(t.position).count() == 1)
    }

    /// Remove every tile.
    pub fn clear(&mut self, events: &mut EventQueue) {
        for slot in self.slots.iter_mut() {
            if let Some(tile) = slot.take() {
                events.push(PresentationEvent::TileDestroyed { id: tile.id });
            }
        }
        self.moved = false;
    }

    /// Replace the board's contents with a row-major layout (`0` = empty).
    ///
    /// The whole layout is checked first; on error the board is untouched.
    pub fn fill_rows(&mut self, rows: &[&[u8]], events: &mut EventQueue) -> Result<(), BoardError> {
        if rows.len() != self.size {
            return Err(BoardError::RowCount {
                expected: self.size,
                found: rows.len(),
            });
        }
        for (y, row) in rows.iter().enumerate() {
            if row.len() != self.size {
                return Err(BoardError::Shape {
                    row: y,
                    expected: self.size,
                    found: row.len(),
                });
            }
            if let Some(&value) = row.iter().find(|&&v| v > MAX_TILE_VALUE) {
                return Err(BoardError::InvalidValue(value));
            }
        }
        self.clear(events);
        for (y, row) in rows.iter().enumerate() {
            for (x, &value) in row.iter().enumerate() {
                if value != 0 {
                    self.add_tile_at(Position::new(x, y), value, events)?;
                }
            }
        }
        Ok(())
    }

    /// Place a tile of exponent `value` on an empty cell.
    pub fn add_tile_at(
        &mut self,
        position: Position,
        value: u8,
        events: &mut EventQueue,
    ) -> Result<TileId, BoardError> {
        if position.x >= self.size || position.y >= self.size {
            return Err(BoardError::OutOfBounds {
                position,
                size: self.size,
            });
        }
        if !(1..=MAX_TILE_VALUE).contains(&value) {
            return Err(BoardError::InvalidValue(value));
        }
        if self.tile_at(position).is_some() {
            return Err(BoardError::Occupied(position));
        }
        self.insert(position, value, events)
    }

    /// Spawn a tile valued uniformly in `1..=max_value` on a uniformly chosen empty cell.
    pub fn spawn_random_tile<R: Rng>(
        &mut self,
        max_value: u8,
        rng: &mut R,
        events: &mut EventQueue,
    ) -> Result<TileId, BoardError> {
        let empty = self.empty_cells();
        if empty.is_empty() {
            return Err(BoardError::Full);
        }
        let value = rng.random_range(1..=max_value.clamp(1, MAX_TILE_VALUE));
        let position = empty[rng.random_range(0..empty.len())];
        self.insert(position, value, events)
    }

    fn insert(
        &mut self,
        position: Position,
        value: u8,
        events: &mut EventQueue,
    ) -> Result<TileId, BoardError> {
        let slot = self
            .slots
            .iter_mut()
            .find(|s| s.is_none())
            .ok_or(BoardError::Full)?;
        let id = TileId(self.next_id);
        self.next_id += 1;
        *slot = Some(Tile::new(id, value, position));
        events.push(PresentationEvent::TileCreated {
            id,
            value,
            position,
        });
        Ok(id)
    }

    fn cell(&self, x: isize, y: isize) -> Option<Position> {
        let size = self.size as isize;
        if x < 0 || y < 0 || x >= size || y >= size {
            return None;
        }
        Some(Position::new(x as usize, y as usize))
    }

    fn slot_at(&self, position: Position) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| s.as_ref().is_some_and(|t| t.position == position))
    }

    fn tile_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        self.slots.iter_mut().flatten().find(|t| t.id == id)
    }

    /// Find where `tile` lands when slid towards `direction`.
    ///
    /// The tile passes over empty cells, stops on the first equal, unclaimed
    /// tile it meets (that tile becomes the merge partner), and otherwise stops
    /// just short of the first obstruction or the board edge.
    pub fn resolve_move_target(&self, tile: &Tile, direction: Direction) -> MoveTarget {
        let (dx, dy) = direction.delta();
        let mut target = MoveTarget {
            position: tile.position,
            merge_with: None,
        };
        let (mut x, mut y) = (tile.position.x as isize, tile.position.y as isize);
        loop {
            x += dx;
            y += dy;
            let Some(cell) = self.cell(x, y) else {
                break;
            };
            match self.tile_at(cell) {
                None => {
                    target.position = cell;
                    target.merge_with = None;
                }
                Some(other) => {
                    if tile.can_merge_with(other) {
                        target.position = cell;
                        target.merge_with = Some(other.id);
                    }
                    break;
                }
            }
        }
        target
    }

    /// Slide every tile towards `direction`, marking merge pairs.
    ///
    /// Merges are only marked here; values change in
    /// [`resolve_merges`](Board::resolve_merges) once the slide has been animated.
    pub fn execute_move(&mut self, direction: Direction, events: &mut EventQueue) -> MoveSummary {
        let mut summary = MoveSummary::default();

        for cell in direction.scan_order().cells(self.size) {
            let Some(slot) = self.slot_at(cell) else {
                continue;
            };
            let Some(tile) = self.slots[slot].as_ref() else {
                continue;
            };
            let target = self.resolve_move_target(tile, direction);
            let promoted = tile.value + 1;

            let Some(tile) = self.slots[slot].as_mut() else {
                continue;
            };
            if target.position != cell {
                tile.position = target.position;
                summary.moved = true;
                events.push(PresentationEvent::TileMoved {
                    id: tile.id,
                    position: target.position,
                });
            }
            if let Some(partner) = target.merge_with {
                tile.pending = PendingMerge::PromoteTo(promoted);
                if let Some(partner) = self.tile_mut(partner) {
                    partner.pending = PendingMerge::MarkedForRemoval;
                }
                summary.merges += 1;
            }
        }

        self.moved = summary.moved;
        summary
    }

    /// Commit the merges marked by the last move. Returns the score gained.
    ///
    /// Promotions are applied before any absorbed tile is removed, and each
    /// removal effect carries the absorbed tile's own value.
    pub fn resolve_merges(&mut self, events: &mut EventQueue) -> u32 {
        let mut gained = 0u32;

        for tile in self.slots.iter_mut().flatten() {
            if let PendingMerge::PromoteTo(value) = tile.pending {
                tile.value = value;
                tile.pending = PendingMerge::None;
                gained += 1u32 << value;
                events.push(PresentationEvent::TileValueChanged { id: tile.id, value });
            }
        }

        for slot in self.slots.iter_mut() {
            let absorbed = slot
                .as_ref()
                .is_some_and(|t| t.pending == PendingMerge::MarkedForRemoval);
            if !absorbed {
                continue;
            }
            if let Some(tile) = slot.take() {
                events.push(PresentationEvent::RemovalEffect {
                    position: tile.position,
                    intensity: tile.value,
                });
                events.push(PresentationEvent::TileDestroyed { id: tile.id });
            }
        }

        gained
    }

    /// Decide whether the game has been won or can no longer continue.
    pub fn check_game_end(&self) -> EndCheck {
        if self.tiles().any(|t| t.value >= MAX_TILE_VALUE) {
            return EndCheck {
                over: false,
                won: true,
            };
        }
        if !self.is_full() {
            return EndCheck::default();
        }
        for tile in self.tiles() {
            for direction in Direction::ALL {
                if self.resolve_move_target(tile, direction).position != tile.position {
                    return EndCheck::default();
                }
            }
        }
        EndCheck {
            over: true,
            won: false,
        }
    }

    pub fn set_bounce_all(&self, enabled: bool, events: &mut EventQueue) {
        for tile in self.tiles() {
            events.push(PresentationEvent::BounceEffect { id: tile.id, enabled });
        }
    }

    /// Start the fall effect for the tile in slot `index`, if there is one.
    pub fn start_fall(&self, index: usize, events: &mut EventQueue) -> Option<TileId> {
        let tile = self.slot(index)?;
        events.push(PresentationEvent::FallEffect {
            id: tile.id,
            enabled: true,
        });
        Some(tile.id)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(DEFAULT_BOARD_SIZE)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.size {
            for x in 0..self.size {
                match self.tile_at(Position::new(x, y)) {
                    Some(tile) => write!(f, "{:>5}", tile.face_value())?,
                    None => write!(f, "{:>5}", ".")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
