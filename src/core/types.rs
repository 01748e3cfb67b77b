//! Core type definitions used throughout the engine

use std::fmt;

use serde::{Deserialize, Serialize};

/// The two opposing forces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArmyId {
    Union,
    Confederate,
}

impl ArmyId {
    /// The opposing army
    pub fn enemy(self) -> Self {
        match self {
            ArmyId::Union => ArmyId::Confederate,
            ArmyId::Confederate => ArmyId::Union,
        }
    }

    pub fn all() -> [ArmyId; 2] {
        [ArmyId::Union, ArmyId::Confederate]
    }
}

impl fmt::Display for ArmyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArmyId::Union => write!(f, "Union"),
            ArmyId::Confederate => write!(f, "Confederate"),
        }
    }
}

/// Echelon of a unit. Descriptive only, never used in combat math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitSize {
    ArmyGroup,
    Army,
    Corps,
    #[default]
    Division,
    Brigade,
    Regiment,
    Battalion,
}

/// Branch of a unit. Descriptive only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitType {
    Artillery,
    Cavalry,
    #[default]
    Infantry,
    Hq,
}

/// Steps of a turn, in play order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameStep {
    #[default]
    #[serde(rename = "UMOVE")]
    UnionMove,
    #[serde(rename = "UBATTLE")]
    UnionBattle,
    #[serde(rename = "CMOVE")]
    ConfederateMove,
    #[serde(rename = "CBATTLE")]
    ConfederateBattle,
}

impl GameStep {
    /// The step that follows this one. `ConfederateBattle` wraps to `UnionMove`.
    pub fn next(self) -> Self {
        match self {
            GameStep::UnionMove => GameStep::UnionBattle,
            GameStep::UnionBattle => GameStep::ConfederateMove,
            GameStep::ConfederateMove => GameStep::ConfederateBattle,
            GameStep::ConfederateBattle => GameStep::UnionMove,
        }
    }

    /// Army whose step this is
    pub fn army(self) -> ArmyId {
        match self {
            GameStep::UnionMove | GameStep::UnionBattle => ArmyId::Union,
            GameStep::ConfederateMove | GameStep::ConfederateBattle => ArmyId::Confederate,
        }
    }

    pub fn is_move(self) -> bool {
        matches!(self, GameStep::UnionMove | GameStep::ConfederateMove)
    }

    pub fn is_battle(self) -> bool {
        !self.is_move()
    }

    /// Is this the move step of `army`?
    pub fn is_move_step_of(self, army: ArmyId) -> bool {
        self.is_move() && self.army() == army
    }

    /// Is this the battle step of `army`?
    pub fn is_battle_step_of(self, army: ArmyId) -> bool {
        self.is_battle() && self.army() == army
    }

    /// Last step of a turn
    pub fn ends_turn(self) -> bool {
        self == GameStep::ConfederateBattle
    }
}

impl fmt::Display for GameStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GameStep::UnionMove => "UMOVE",
            GameStep::UnionBattle => "UBATTLE",
            GameStep::ConfederateMove => "CMOVE",
            GameStep::ConfederateBattle => "CBATTLE",
        };
        write!(f, "{name}")
    }
}

/// Overall game status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    InProgress,
    Won { winner: ArmyId },
}

impl GameStatus {
    pub fn is_over(&self) -> bool {
        matches!(self, GameStatus::Won { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_cycle_order() {
        let mut step = GameStep::UnionMove;
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(step);
            step = step.next();
        }
        assert_eq!(
            seen,
            vec![
                GameStep::UnionMove,
                GameStep::UnionBattle,
                GameStep::ConfederateMove,
                GameStep::ConfederateBattle
            ]
        );
        assert_eq!(step, GameStep::UnionMove);
    }

    #[test]
    fn test_step_ownership() {
        assert!(GameStep::UnionMove.is_move_step_of(ArmyId::Union));
        assert!(!GameStep::UnionMove.is_move_step_of(ArmyId::Confederate));
        assert!(GameStep::ConfederateBattle.is_battle_step_of(ArmyId::Confederate));
        assert!(GameStep::ConfederateBattle.ends_turn());
    }

    #[test]
    fn test_enemy_is_involution() {
        for army in ArmyId::all() {
            assert_eq!(army.enemy().enemy(), army);
            assert_ne!(army.enemy(), army);
        }
    }
}
