//! Bounded board coordinates
//!
//! Coordinates are 1-based and can only be constructed inside the map, so any
//! `Coordinate` value in the engine is a real cell.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::error::GameError;
use crate::grid::direction::Direction;

/// Number of columns on the map
pub const COLUMNS: i32 = 22;
/// Number of rows on the map
pub const ROWS: i32 = 28;

/// A cell on the map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "(i32, i32)", into = "(i32, i32)")]
pub struct Coordinate {
    x: i32,
    y: i32,
}

impl Coordinate {
    /// Create a coordinate, failing if it lies outside the map
    pub fn new(x: i32, y: i32) -> Result<Self, GameError> {
        if Self::in_bounds(x, y) {
            Ok(Self { x, y })
        } else {
            Err(GameError::InvalidCoordinate { x, y })
        }
    }

    pub fn in_bounds(x: i32, y: i32) -> bool {
        (1..=COLUMNS).contains(&x) && (1..=ROWS).contains(&y)
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    /// Chebyshev distance: diagonal steps cost the same as orthogonal ones
    pub fn distance(&self, other: &Self) -> u32 {
        let dx = (self.x - other.x).unsigned_abs();
        let dy = (self.y - other.y).unsigned_abs();
        dx.max(dy)
    }

    /// Compass direction from self towards other; `None` for the same cell
    pub fn direction_to(&self, other: &Self) -> Direction {
        Direction::from_delta(other.x - self.x, other.y - self.y)
    }

    /// The neighboring cell in `direction`, or `None` off the map edge.
    ///
    /// `Direction::None` returns the cell itself.
    pub fn adjacent(&self, direction: Direction) -> Option<Self> {
        let (dx, dy) = direction.delta();
        Self::new(self.x + dx, self.y + dy).ok()
    }

    /// In-map neighbors, in compass order starting at North
    pub fn neighbors(&self) -> Vec<Self> {
        Direction::ALL
            .into_iter()
            .filter_map(|d| self.adjacent(d))
            .collect()
    }

    /// Every cell on the map, row by row
    pub fn all() -> impl Iterator<Item = Coordinate> {
        (1..=ROWS).flat_map(|y| (1..=COLUMNS).map(move |x| Coordinate { x, y }))
    }
}

impl TryFrom<(i32, i32)> for Coordinate {
    type Error = GameError;

    fn try_from((x, y): (i32, i32)) -> Result<Self, Self::Error> {
        Self::new(x, y)
    }
}

impl From<Coordinate> for (i32, i32) {
    fn from(coord: Coordinate) -> Self {
        (coord.x, coord.y)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
