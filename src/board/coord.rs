//! Grid coordinates and neighbor offsets

use std::cmp::Ordering;
use std::fmt;

/// A position on the board. `x` grows to the right, `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coord {
    pub x: i64,
    pub y: i64,
}

impl Coord {
    pub const fn new(x: i64, y: i64) -> Self {
        Coord { x, y }
    }

    /// The adjacent coordinate in the given direction, None past the edge of `i64`
    pub fn offset(self, offset: Offset) -> Option<Self> {
        let (dx, dy) = offset.delta();
        self.checked_shift(dx, dy)
    }

    /// Shift by an arbitrary displacement, returns None on overflow
    pub fn checked_shift(self, dx: i64, dy: i64) -> Option<Self> {
        Some(Coord::new(self.x.checked_add(dx)?, self.y.checked_add(dy)?))
    }
}

// Row-major order, so sorted iteration reads like the printed board
impl Ord for Coord {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}

impl PartialOrd for Coord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The four unit directions used for neighbor addressing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Offset {
    Left,
    Right,
    Up,
    Down,
}

impl Offset {
    pub fn delta(self) -> (i64, i64) {
        match self {
            Offset::Left => (-1, 0),
            Offset::Right => (1, 0),
            Offset::Up => (0, -1),
            Offset::Down => (0, 1),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Offset::Left => Offset::Right,
            Offset::Right => Offset::Left,
            Offset::Up => Offset::Down,
            Offset::Down => Offset::Up,
        }
    }
}
