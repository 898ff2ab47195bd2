use serde::{Deserialize, Serialize};

use super::tile::Position;

/// A direction to slide tiles in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Up,
    Right,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Up,
        Direction::Right,
        Direction::Down,
    ];

    /// Decode a numeric direction code (0 = left, 1 = up, 2 = right, 3 = down).
    ///
    /// Anything else yields `None`, which callers treat as "ignore this input".
    pub fn from_code(code: u8) -> Option<Direction> {
        match code {
            0 => Some(Direction::Left),
            1 => Some(Direction::Up),
            2 => Some(Direction::Right),
            3 => Some(Direction::Down),
            _ => None,
        }
    }

    /// Unit step `(dx, dy)`; `y` grows downward.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
        }
    }

    /// Scan order that processes cells nearest the destination edge first.
    pub fn scan_order(self) -> ScanOrder {
        match self {
            Direction::Left => ScanOrder::FromLeft,
            Direction::Up => ScanOrder::FromTop,
            Direction::Right => ScanOrder::FromRight,
            Direction::Down => ScanOrder::FromBottom,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Up => "up",
            Direction::Right => "right",
            Direction::Down => "down",
        }
    }
}

/// Total orders over the cells of a square board.
///
/// `FromLeft`/`FromRight` walk whole columns at a time, `FromTop`/`FromBottom`
/// whole rows; inside a column or row the other coordinate ascends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOrder {
    FromLeft,
    FromRight,
    FromTop,
    FromBottom,
}

impl ScanOrder {
    /// Step the enumeration.
    ///
    /// `prev == None` is the start sentinel and yields the first cell. Passing
    /// the previously returned cell yields the next one; `None` means every
    /// cell has been visited.
    pub fn advance(self, size: usize, prev: Option<Position>) -> Option<Position> {
        if size == 0 {
            return None;
        }
        let last = size - 1;
        let Some(p) = prev else {
            return Some(match self {
                ScanOrder::FromLeft | ScanOrder::FromTop => Position::new(0, 0),
                ScanOrder::FromRight => Position::new(last, 0),
                ScanOrder::FromBottom => Position::new(0, last),
            });
        };

        match self {
            ScanOrder::FromLeft => {
                if p.y < last {
                    Some(Position::new(p.x, p.y + 1))
                } else if p.x < last {
                    Some(Position::new(p.x + 1, 0))
                } else {
                    None
                }
            }
            ScanOrder::FromRight => {
                if p.y < last {
                    Some(Position::new(p.x, p.y + 1))
                } else if p.x > 0 {
                    Some(Position::new(p.x - 1, 0))
                } else {
                    None
                }
            }
            ScanOrder::FromTop => {
                if p.x < last {
                    Some(Position::new(p.x + 1, p.y))
                } else if p.y < last {
                    Some(Position::new(0, p.y + 1))
                } else {
                    None
                }
            }
            ScanOrder::FromBottom => {
                if p.x < last {
                    Some(Position::new(p.x + 1, p.y))
                } else if p.y > 0 {
                    Some(Position::new(0, p.y - 1))
                } else {
                    None
                }
            }
        }
    }

    /// Iterate every cell of a `size`×`size` board in this order.
    pub fn cells(self, size: usize) -> Cells {
        Cells {
            order: self,
            size,
            cursor: None,
            exhausted: false,
        }
    }
}

/// Iterator returned by [`ScanOrder::cells`].
#[derive(Debug, Clone)]
pub struct Cells {
    order: ScanOrder,
    size: usize,
    cursor: Option<Position>,
    exhausted: bool,
}

impl Iterator for Cells {
    type Item = Position;

    fn next(&mut self) -> Option<Position> {
        if self.exhausted {
            return None;
        }
        match self.order.advance(self.size, self.cursor) {
            Some(p) => {
                self.cursor = Some(p);
                Some(p)
            }
            None => {
                self.exhausted = true;
                None
            }
        }
    }
}
