//! Unit identity and attribute records
//!
//! A unit is addressed by its `UnitKey` everywhere. Attributes that can change
//! during play (facing, position) live on the board, not on the key.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::core::types::{ArmyId, UnitSize, UnitType};
use crate::grid::Direction;

/// Identity of a unit: its army and commanding leader
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitKey {
    pub army: ArmyId,
    pub leader: String,
}

impl UnitKey {
    pub fn new(army: ArmyId, leader: impl Into<String>) -> Self {
        Self {
            army,
            leader: leader.into(),
        }
    }
}

impl fmt::Display for UnitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.leader, self.army)
    }
}

/// Fixed attributes of a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UnitProfile {
    pub combat_factor: u32,
    pub movement_factor: u32,
    pub size: UnitSize,
    pub kind: UnitType,
}

impl UnitProfile {
    pub fn new(combat_factor: u32, movement_factor: u32) -> Self {
        Self {
            combat_factor,
            movement_factor,
            ..Default::default()
        }
    }

    pub fn with_size(mut self, size: UnitSize) -> Self {
        self.size = size;
        self
    }

    pub fn with_kind(mut self, kind: UnitType) -> Self {
        self.kind = kind;
        self
    }
}

/// Snapshot of a unit as exchanged with callers.
///
/// Equality and hashing only look at the key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    pub key: UnitKey,
    pub profile: UnitProfile,
    pub facing: Direction,
}

impl Unit {
    pub fn new(key: UnitKey, profile: UnitProfile, facing: Direction) -> Self {
        Self {
            key,
            profile,
            facing,
        }
    }

    pub fn army(&self) -> ArmyId {
        self.key.army
    }

    pub fn leader(&self) -> &str {
        &self.key.leader
    }

    pub fn combat_factor(&self) -> u32 {
        self.profile.combat_factor
    }

    pub fn movement_factor(&self) -> u32 {
        self.profile.movement_factor
    }
}

impl PartialEq for Unit {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Unit {}

impl Hash for Unit {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [cf {}, mf {}, facing {:?}]",
            self.key, self.profile.combat_factor, self.profile.movement_factor, self.facing
        )
    }
}
