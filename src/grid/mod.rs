//! Map geometry: bounded coordinates, the compass, and path search

pub mod coord;
pub mod direction;
pub mod pathfinding;

pub use coord::{Coordinate, COLUMNS, ROWS};
pub use direction::Direction;
pub use pathfinding::{find_path, path_length};
