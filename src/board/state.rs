//! Authoritative unit placement
//!
//! The board never validates moves; the game checks legality before calling
//! into it.

use std::collections::BTreeMap;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::ArmyId;
use crate::grid::{Coordinate, Direction};
use crate::units::{Unit, UnitKey, UnitProfile};

/// Where a unit stands and how it is facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub profile: UnitProfile,
    pub facing: Direction,
    pub at: Coordinate,
}

/// All units on the map, keyed by identity
#[derive(Debug, Clone, Default)]
pub struct Board {
    placements: BTreeMap<UnitKey, Placement>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Put a unit at a cell, replacing any previous placement of the same key
    pub fn place(&mut self, unit: &Unit, at: Coordinate) {
        self.placements.insert(
            unit.key.clone(),
            Placement {
                profile: unit.profile,
                facing: unit.facing,
                at,
            },
        );
    }

    /// Relocate a unit. Returns false if it is not on the board.
    pub fn move_unit(&mut self, key: &UnitKey, to: Coordinate) -> bool {
        match self.placements.get_mut(key) {
            Some(placement) => {
                placement.at = to;
                true
            }
            None => false,
        }
    }

    pub fn set_facing(&mut self, key: &UnitKey, facing: Direction) -> bool {
        match self.placements.get_mut(key) {
            Some(placement) => {
                placement.facing = facing;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, key: &UnitKey) -> Option<Unit> {
        self.placements
            .remove_entry(key)
            .map(|(key, placement)| snapshot(key, &placement))
    }

    pub fn clear(&mut self) {
        self.placements.clear();
    }

    pub fn contains(&self, key: &UnitKey) -> bool {
        self.placements.contains_key(key)
    }

    pub fn placement(&self, key: &UnitKey) -> Option<&Placement> {
        self.placements.get(key)
    }

    /// Current snapshot of a unit
    pub fn unit(&self, key: &UnitKey) -> Option<Unit> {
        self.placements
            .get(key)
            .map(|placement| snapshot(key.clone(), placement))
    }

    pub fn position(&self, key: &UnitKey) -> Option<Coordinate> {
        self.placements.get(key).map(|p| p.at)
    }

    pub fn facing(&self, key: &UnitKey) -> Option<Direction> {
        self.placements.get(key).map(|p| p.facing)
    }

    /// Look a unit up by leader name and army
    pub fn find(&self, leader: &str, army: ArmyId) -> Option<Unit> {
        self.unit(&UnitKey::new(army, leader))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&UnitKey, &Placement)> {
        self.placements.iter()
    }

    /// Snapshots of every unit, in key order
    pub fn units(&self) -> Vec<Unit> {
        self.placements
            .iter()
            .map(|(key, placement)| snapshot(key.clone(), placement))
            .collect()
    }

    pub fn units_of(&self, army: ArmyId) -> Vec<Unit> {
        self.placements
            .iter()
            .filter(|(key, _)| key.army == army)
            .map(|(key, placement)| snapshot(key.clone(), placement))
            .collect()
    }

    /// All units at a cell; empty if none
    pub fn units_at(&self, at: Coordinate) -> Vec<Unit> {
        self.placements
            .iter()
            .filter(|(_, placement)| placement.at == at)
            .map(|(key, placement)| snapshot(key.clone(), placement))
            .collect()
    }

    pub fn is_occupied(&self, at: Coordinate) -> bool {
        self.placements.values().any(|p| p.at == at)
    }

    pub fn is_occupied_by(&self, at: Coordinate, army: ArmyId) -> bool {
        self.placements
            .iter()
            .any(|(key, placement)| key.army == army && placement.at == at)
    }

    /// Remove every unit standing on a cell shared with another unit.
    ///
    /// Returns the removed units in key order.
    pub fn remove_stacked_units(&mut self) -> Vec<Unit> {
        let mut counts: AHashMap<Coordinate, usize> = AHashMap::new();
        for placement in self.placements.values() {
            *counts.entry(placement.at).or_insert(0) += 1;
        }

        let stacked: Vec<UnitKey> = self
            .placements
            .iter()
            .filter(|(_, placement)| counts.get(&placement.at).copied().unwrap_or(0) > 1)
            .map(|(key, _)| key.clone())
            .collect();

        let removed: Vec<Unit> = stacked.iter().filter_map(|key| self.remove(key)).collect();
        for unit in &removed {
            tracing::warn!("Removed stacked unit {}", unit.key);
        }
        removed
    }
}

fn snapshot(key: UnitKey, placement: &Placement) -> Unit {
    Unit::new(key, placement.profile, placement.facing)
}
