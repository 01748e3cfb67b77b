//! Gettysburg Engine - rules engine for a turn-based Gettysburg wargame
//!
//! Two armies alternate move and battle steps on a 22 x 28 grid. The engine
//! validates moves against zones of control, detects and resolves battles with
//! the combat results table, and brings reinforcements on as scheduled.

pub mod board;
pub mod combat;
pub mod core;
pub mod game;
pub mod grid;
pub mod units;

pub use crate::core::{ArmyId, GameConfig, GameError, GameStatus, GameStep, Result};
pub use crate::game::{Game, ReinforcementSchedule, ScenarioControl};
pub use crate::grid::{Coordinate, Direction};
pub use crate::units::{Unit, UnitKey, UnitProfile};
