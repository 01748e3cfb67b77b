//! The board: where every unit stands, and the geometric rules built on it

pub mod control;
pub mod state;

pub use control::zone_of_control;
pub use state::{Board, Placement};
