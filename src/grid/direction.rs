//! Eight-point compass used for facing and adjacency
//!
//! Screen convention: x grows east, y grows south, so North is (0, -1).

use serde::{Deserialize, Serialize};

/// Compass direction, or `None` for "no facing"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
    #[default]
    None,
}

impl Direction {
    /// The 8 compass points in clockwise order, starting at North
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    fn compass_index(self) -> Option<usize> {
        Self::ALL.iter().position(|d| *d == self)
    }

    /// Unit (dx, dy) step for this direction
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::NorthEast => (1, -1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, 1),
            Direction::South => (0, 1),
            Direction::SouthWest => (-1, 1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, -1),
            Direction::None => (0, 0),
        }
    }

    /// Direction matching the signs of (dx, dy)
    pub fn from_delta(dx: i32, dy: i32) -> Self {
        let signs = (dx.signum(), dy.signum());
        Self::ALL
            .into_iter()
            .find(|d| d.delta() == signs)
            .unwrap_or(Direction::None)
    }

    /// Rotate by `steps` eighth-turns; positive is clockwise.
    ///
    /// `None` has no rotation and maps to itself.
    pub fn rotate(self, steps: i32) -> Self {
        match self.compass_index() {
            Some(index) => {
                let turned = (index as i32 + steps.rem_euclid(8)).rem_euclid(8);
                Self::ALL[turned as usize]
            }
            None => Direction::None,
        }
    }

    pub fn clockwise(self) -> Self {
        self.rotate(1)
    }

    pub fn counter_clockwise(self) -> Self {
        self.rotate(-1)
    }

    /// Get opposite direction
    pub fn opposite(self) -> Self {
        self.rotate(4)
    }

    /// All 8 compass points ordered by angular distance from `self`,
    /// clockwise neighbor before counter-clockwise at each distance.
    ///
    /// `None` yields the plain compass order.
    pub fn fan(self) -> [Direction; 8] {
        if self == Direction::None {
            return Self::ALL;
        }
        [
            self,
            self.rotate(1),
            self.rotate(-1),
            self.rotate(2),
            self.rotate(-2),
            self.rotate(3),
            self.rotate(-3),
            self.rotate(4),
        ]
    }
}
