//! Scenario set-up hooks for tests and tools
//!
//! These bypass the rules on purpose. Nothing in the engine calls them.

use crate::combat::CombatResult;
use crate::core::types::GameStep;
use crate::game::state::Game;
use crate::grid::Coordinate;
use crate::units::Unit;

/// Direct control over a game's position
pub trait ScenarioControl {
    /// Jump to a step without running end-of-step processing
    fn set_step(&mut self, step: GameStep);

    fn set_turn(&mut self, turn: u32);

    /// Place a unit without any validation
    fn put_unit_at(&mut self, unit: &Unit, at: Coordinate);

    fn clear_board(&mut self);

    /// Results handed out, in order, by the next battles resolved instead of
    /// rolling the die
    fn script_results(&mut self, results: Vec<CombatResult>);
}

impl ScenarioControl for Game {
    fn set_step(&mut self, step: GameStep) {
        tracing::debug!("Scenario: step set to {}", step);
        self.step = step;
    }

    fn set_turn(&mut self, turn: u32) {
        tracing::debug!("Scenario: turn set to {}", turn);
        self.turn = turn;
    }

    fn put_unit_at(&mut self, unit: &Unit, at: Coordinate) {
        self.board.place(unit, at);
    }

    fn clear_board(&mut self) {
        self.board.clear();
    }

    fn script_results(&mut self, results: Vec<CombatResult>) {
        self.scripted_results.extend(results);
    }
}
