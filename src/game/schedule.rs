//! Reinforcement schedule: which units enter the map, where and when
//!
//! Loaded from `[[reinforcement]]` tables in TOML. The historical order of
//! battle ships in `data/order_of_battle.toml`.

use std::path::Path;

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

use crate::core::error::{GameError, Result};
use crate::core::types::{ArmyId, UnitSize, UnitType};
use crate::grid::{Coordinate, Direction};
use crate::units::{Unit, UnitKey, UnitProfile};

/// Historical order of battle
const GETTYSBURG_ORDER_OF_BATTLE: &str = include_str!("../../data/order_of_battle.toml");

/// A unit due to arrive on a given turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reinforcement {
    pub turn: u32,
    pub at: Coordinate,
    pub unit: Unit,
}

/// One `[[reinforcement]]` table as written in the file
#[derive(Debug, Clone, Deserialize)]
struct ReinforcementRecord {
    turn: u32,
    army: ArmyId,
    leader: String,
    x: i32,
    y: i32,
    combat_factor: u32,
    movement_factor: u32,
    #[serde(default)]
    facing: Direction,
    #[serde(default)]
    size: UnitSize,
    #[serde(default)]
    kind: UnitType,
}

#[derive(Debug, Default, Deserialize)]
struct ScheduleFile {
    #[serde(default)]
    reinforcement: Vec<ReinforcementRecord>,
}

impl TryFrom<ReinforcementRecord> for Reinforcement {
    type Error = GameError;

    fn try_from(record: ReinforcementRecord) -> Result<Self> {
        let at = Coordinate::new(record.x, record.y).map_err(|e| {
            GameError::Schedule(format!("{} ({}): {}", record.leader, record.army, e))
        })?;
        let profile = UnitProfile::new(record.combat_factor, record.movement_factor)
            .with_size(record.size)
            .with_kind(record.kind);
        Ok(Self {
            turn: record.turn,
            at,
            unit: Unit::new(
                UnitKey::new(record.army, record.leader),
                profile,
                record.facing,
            ),
        })
    }
}

/// Arrivals indexed by army and turn, kept in file order
#[derive(Debug, Clone, Default)]
pub struct ReinforcementSchedule {
    entries: Vec<Reinforcement>,
    by_turn: AHashMap<(ArmyId, u32), Vec<usize>>,
}

impl ReinforcementSchedule {
    /// A schedule with no arrivals
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from entries, rejecting a leader listed twice for one army
    pub fn new(entries: Vec<Reinforcement>) -> Result<Self> {
        let mut seen: AHashSet<&UnitKey> = AHashSet::new();
        for entry in &entries {
            if !seen.insert(&entry.unit.key) {
                return Err(GameError::Schedule(format!(
                    "{} is scheduled more than once",
                    entry.unit.key
                )));
            }
        }

        let mut by_turn: AHashMap<(ArmyId, u32), Vec<usize>> = AHashMap::new();
        for (index, entry) in entries.iter().enumerate() {
            by_turn
                .entry((entry.unit.army(), entry.turn))
                .or_default()
                .push(index);
        }

        Ok(Self { entries, by_turn })
    }

    /// Parse `[[reinforcement]]` tables from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: ScheduleFile = toml::from_str(content)?;
        let entries = file
            .reinforcement
            .into_iter()
            .map(Reinforcement::try_from)
            .collect::<Result<Vec<_>>>()?;
        Self::new(entries)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// The historical Gettysburg order of battle
    pub fn gettysburg() -> Result<Self> {
        Self::from_toml_str(GETTYSBURG_ORDER_OF_BATTLE)
    }

    /// Units of `army` arriving on `turn`, in file order
    pub fn arrivals(&self, army: ArmyId, turn: u32) -> impl Iterator<Item = &Reinforcement> {
        self.by_turn
            .get(&(army, turn))
            .into_iter()
            .flatten()
            .filter_map(|index| self.entries.get(*index))
    }

    pub fn entries(&self) -> &[Reinforcement] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
