//! The game state machine
//!
//! Turn structure: UMOVE, UBATTLE, CMOVE, CBATTLE, then the next turn. All
//! rules are checked here before the board is touched, so a rejected call
//! leaves the game exactly as it was.

use std::collections::VecDeque;
use std::fmt;

use ahash::AHashSet;

use crate::board::Board;
use crate::combat::{
    Battle, CombatResult, CombatTable, DieRoller, Resolution, RetreatOutcome, SeededDie,
};
use crate::core::config::GameConfig;
use crate::core::error::{GameError, Result};
use crate::core::types::{ArmyId, GameStatus, GameStep};
use crate::game::schedule::ReinforcementSchedule;
use crate::grid::{Coordinate, Direction};
use crate::units::{Unit, UnitKey};

/// One game session. Owns its board outright.
pub struct Game {
    pub(super) board: Board,
    pub(super) step: GameStep,
    pub(super) turn: u32,
    status: GameStatus,
    config: GameConfig,
    schedule: ReinforcementSchedule,
    table: CombatTable,
    dice: Box<dyn DieRoller>,
    pub(super) scripted_results: VecDeque<CombatResult>,
    moved: AHashSet<UnitKey>,
    rotated: AHashSet<UnitKey>,
    fought: AHashSet<UnitKey>,
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("turn", &self.turn)
            .field("step", &self.step)
            .field("status", &self.status)
            .field("units", &self.board.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Game {
    /// Start a game with a die seeded from `config.seed`
    pub fn new(config: GameConfig, schedule: ReinforcementSchedule) -> Result<Self> {
        let dice = SeededDie::from_seed(config.seed);
        Self::with_dice(config, schedule, Box::new(dice))
    }

    /// Start a game rolling combat dice from `dice`
    pub fn with_dice(
        config: GameConfig,
        schedule: ReinforcementSchedule,
        dice: Box<dyn DieRoller>,
    ) -> Result<Self> {
        config.validate().map_err(GameError::Config)?;

        let mut game = Self {
            board: Board::new(),
            step: GameStep::UnionMove,
            turn: 1,
            status: GameStatus::InProgress,
            config,
            schedule,
            table: CombatTable::standard(),
            dice,
            scripted_results: VecDeque::new(),
            moved: AHashSet::new(),
            rotated: AHashSet::new(),
            fought: AHashSet::new(),
        };

        for army in ArmyId::all() {
            game.place_reinforcements(army, 0);
        }
        game.place_reinforcements(GameStep::UnionMove.army(), 1);

        tracing::info!(
            "New game: {} units on the map, turn limit {}",
            game.board.len(),
            game.config.turn_limit
        );
        Ok(game)
    }

    /// The historical scenario with default configuration
    pub fn gettysburg() -> Result<Self> {
        Self::new(GameConfig::default(), ReinforcementSchedule::gettysburg()?)
    }

    /// Replace the combat results table
    pub fn with_table(mut self, table: CombatTable) -> Self {
        self.table = table;
        self
    }

    // ---- Actions ----

    /// Move a unit during its army's move step
    pub fn move_unit(&mut self, key: &UnitKey, from: Coordinate, to: Coordinate) -> Result<()> {
        self.ensure_in_progress()?;

        let unit = self
            .board
            .unit(key)
            .ok_or_else(|| GameError::invalid_move(format!("{key} is not on the board")))?;
        if !self.step.is_move_step_of(key.army) {
            return Err(GameError::invalid_move(format!(
                "{key} cannot move during {}",
                self.step
            )));
        }
        if self.moved.contains(key) {
            return Err(GameError::invalid_move(format!(
                "{key} has already moved this turn"
            )));
        }
        if self.board.position(key) != Some(from) {
            return Err(GameError::invalid_move(format!("{key} is not at {from}")));
        }
        if from.distance(&to) > unit.movement_factor() {
            return Err(GameError::invalid_move(format!(
                "{to} is beyond {key}'s movement factor of {}",
                unit.movement_factor()
            )));
        }
        if self.board.is_occupied(to) {
            return Err(GameError::invalid_move(format!("{to} is occupied")));
        }
        if !self.board.has_path(&unit, from, to) {
            return Err(GameError::invalid_move(format!(
                "no legal path for {key} from {from} to {to}"
            )));
        }

        self.board.move_unit(key, to);
        self.moved.insert(key.clone());
        tracing::debug!("{} moved {} -> {}", key, from, to);
        Ok(())
    }

    /// Change a unit's facing during its army's move step
    pub fn set_unit_facing(&mut self, key: &UnitKey, facing: Direction) -> Result<()> {
        self.ensure_in_progress()?;

        if !self.board.contains(key) {
            return Err(GameError::invalid_move(format!("{key} is not on the board")));
        }
        if !self.step.is_move_step_of(key.army) {
            return Err(GameError::invalid_move(format!(
                "{key} cannot turn during {}",
                self.step
            )));
        }
        if self.rotated.contains(key) {
            return Err(GameError::invalid_move(format!(
                "{key} has already changed facing this turn"
            )));
        }

        self.board.set_facing(key, facing);
        self.rotated.insert(key.clone());
        tracing::debug!("{} now faces {:?}", key, facing);
        Ok(())
    }

    /// End the current step and return the new one.
    ///
    /// A battle step cannot end while a battle is outstanding.
    pub fn end_step(&mut self) -> Result<GameStep> {
        self.ensure_in_progress()?;
        if self.step.is_battle() && self.battles_to_resolve().is_some() {
            return Err(GameError::invalid_action(format!(
                "battles must be resolved before ending {}",
                self.step
            )));
        }

        self.board.remove_stacked_units();

        let ending_turn = self.step.ends_turn();
        self.step = self.step.next();

        if ending_turn {
            self.moved.clear();
            self.rotated.clear();
            self.fought.clear();
            if self.turn >= self.config.turn_limit {
                self.status = GameStatus::Won {
                    winner: self.step.army(),
                };
                tracing::info!(
                    "Turn limit {} reached; {} wins",
                    self.config.turn_limit,
                    self.step.army()
                );
                return Ok(self.step);
            }
            self.turn += 1;
        }

        if self.step.is_move() {
            self.place_reinforcements(self.step.army(), self.turn);
        }
        tracing::info!("Turn {}: {}", self.turn, self.step);
        Ok(self.step)
    }

    /// End a move step; fails in a battle step
    pub fn end_move_step(&mut self) -> Result<GameStep> {
        if !self.step.is_move() {
            return Err(GameError::invalid_action(format!(
                "{} is not a move step",
                self.step
            )));
        }
        self.end_step()
    }

    /// End a battle step; fails in a move step
    pub fn end_battle_step(&mut self) -> Result<GameStep> {
        if !self.step.is_battle() {
            return Err(GameError::invalid_action(format!(
                "{} is not a battle step",
                self.step
            )));
        }
        self.end_step()
    }

    /// The outstanding battle, if any.
    ///
    /// Every engaged unit that has not fought this turn goes into a single
    /// battle: the units whose battle step this is attack, the rest defend.
    pub fn battles_to_resolve(&self) -> Option<Battle> {
        let (attackers, defenders): (Vec<Unit>, Vec<Unit>) = self
            .board
            .units_in_battle_position()
            .into_iter()
            .filter(|unit| !self.fought.contains(&unit.key))
            .partition(|unit| self.step.is_battle_step_of(unit.army()));

        if attackers.is_empty() && defenders.is_empty() {
            None
        } else {
            Some(Battle::new(attackers, defenders))
        }
    }

    /// Resolve a battle taken from `battles_to_resolve`.
    ///
    /// The submitted units may be a subset of the outstanding battle; unit
    /// attributes are always read back from the board.
    pub fn resolve_battle(&mut self, submitted: &Battle) -> Result<Resolution> {
        self.ensure_in_progress()?;
        if !self.step.is_battle() {
            return Err(GameError::invalid_action(format!(
                "no battles are fought during {}",
                self.step
            )));
        }
        let outstanding = self
            .battles_to_resolve()
            .ok_or_else(|| GameError::invalid_action("there is no battle to resolve"))?;
        if submitted.is_empty() {
            return Err(GameError::invalid_action("battle has no units"));
        }
        if let Some(stray) = submitted
            .attackers
            .iter()
            .find(|unit| !outstanding.attackers.contains(unit))
        {
            return Err(GameError::invalid_action(format!(
                "{} is not an attacker in the outstanding battle",
                stray.key
            )));
        }
        if let Some(stray) = submitted
            .defenders
            .iter()
            .find(|unit| !outstanding.defenders.contains(unit))
        {
            return Err(GameError::invalid_action(format!(
                "{} is not a defender in the outstanding battle",
                stray.key
            )));
        }

        let mut seen = AHashSet::new();
        let battle = Battle::new(
            self.current_records(&submitted.attackers, &mut seen),
            self.current_records(&submitted.defenders, &mut seen),
        );
        self.fought.extend(seen);

        let mut resolution = match self.scripted_results.pop_front() {
            Some(result) => Resolution::resolve(&battle, result),
            None => {
                let face = self.dice.roll();
                Resolution::from_face(&battle, &self.table, face)
            }
        };

        self.apply_retreats(&mut resolution);
        for unit in resolution.eliminated() {
            self.board.remove(&unit.key);
        }

        tracing::info!(
            "Battle on turn {} ({}): {} attackers ({}) vs {} defenders ({}) -> {}",
            self.turn,
            self.step,
            battle.attackers.len(),
            battle.attacking_factor(),
            battle.defenders.len(),
            battle.defending_factor(),
            resolution.result
        );
        Ok(resolution)
    }

    // ---- Queries ----

    pub fn units_at(&self, at: Coordinate) -> Vec<Unit> {
        self.board.units_at(at)
    }

    pub fn where_is_unit(&self, key: &UnitKey) -> Option<Coordinate> {
        self.board.position(key)
    }

    pub fn where_is(&self, leader: &str, army: ArmyId) -> Option<Coordinate> {
        self.board.position(&UnitKey::new(army, leader))
    }

    pub fn unit(&self, key: &UnitKey) -> Option<Unit> {
        self.board.unit(key)
    }

    pub fn get_unit(&self, leader: &str, army: ArmyId) -> Option<Unit> {
        self.board.find(leader, army)
    }

    pub fn unit_facing(&self, key: &UnitKey) -> Option<Direction> {
        self.board.facing(key)
    }

    pub fn current_step(&self) -> GameStep {
        self.step
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn has_moved(&self, key: &UnitKey) -> bool {
        self.moved.contains(key)
    }

    pub fn has_rotated(&self, key: &UnitKey) -> bool {
        self.rotated.contains(key)
    }

    pub fn has_fought(&self, key: &UnitKey) -> bool {
        self.fought.contains(key)
    }

    // ---- Internals ----

    fn ensure_in_progress(&self) -> Result<()> {
        match self.status {
            GameStatus::InProgress => Ok(()),
            GameStatus::Won { winner } => Err(GameError::invalid_action(format!(
                "the game is over; {winner} won"
            ))),
        }
    }

    fn place_reinforcements(&mut self, army: ArmyId, turn: u32) {
        for arrival in self.schedule.arrivals(army, turn) {
            self.board.place(&arrival.unit, arrival.at);
            tracing::debug!("{} arrives at {} on turn {}", arrival.unit.key, arrival.at, turn);
        }
    }

    /// Board records for the given units, skipping duplicates and units no
    /// longer on the map
    fn current_records(&self, units: &[Unit], seen: &mut AHashSet<UnitKey>) -> Vec<Unit> {
        units
            .iter()
            .filter(|unit| seen.insert(unit.key.clone()))
            .filter_map(|unit| self.board.unit(&unit.key))
            .collect()
    }

    /// Move each retreating unit to its best retreat cell, one at a time, or
    /// eliminate it if none is open
    fn apply_retreats(&mut self, resolution: &mut Resolution) {
        let retreating: Vec<UnitKey> = resolution
            .retreating()
            .iter()
            .map(|unit| unit.key.clone())
            .collect();

        for key in retreating {
            match self.board.retreat_targets(&key).first().copied() {
                Some(to) => {
                    self.board.move_unit(&key, to);
                    tracing::debug!("{} retreats to {}", key, to);
                    resolution.record_retreat(key, RetreatOutcome::Moved { to });
                }
                None => {
                    self.board.remove(&key);
                    tracing::debug!("{} has nowhere to retreat and is lost", key);
                    resolution.record_retreat(key, RetreatOutcome::Eliminated);
                }
            }
        }
    }
}
