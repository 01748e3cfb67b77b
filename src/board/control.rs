//! Zone of control, engagement detection and movement legality

use ahash::AHashSet;

use crate::board::state::Board;
use crate::core::types::ArmyId;
use crate::grid::{find_path, Coordinate, Direction};
use crate::units::{Unit, UnitKey};

/// Cells in the forward cone of a unit at `at` facing `facing`.
///
/// The cone is the three cells at facing -1, 0 and +1 eighth-turns. Off-map
/// cells are dropped. A unit with no facing controls only its own cell.
pub fn zone_of_control(at: Coordinate, facing: Direction) -> Vec<Coordinate> {
    let mut cells = Vec::with_capacity(3);
    for steps in [-1, 0, 1] {
        if let Some(cell) = at.adjacent(facing.rotate(steps)) {
            if !cells.contains(&cell) {
                cells.push(cell);
            }
        }
    }
    cells
}

impl Board {
    /// Does some unit of `army` occupy `cell` or hold it in its zone of control?
    pub fn is_controlled_by(&self, cell: Coordinate, army: ArmyId) -> bool {
        // Anything that can reach `cell` stands on it or next to it
        self.iter().any(|(key, placement)| {
            key.army == army
                && placement.at.distance(&cell) <= 1
                && (placement.at == cell
                    || zone_of_control(placement.at, placement.facing).contains(&cell))
        })
    }

    /// Would a unit of `army` standing at `at` facing `facing` have an enemy
    /// in its zone of control?
    pub fn enemy_in_zone(&self, army: ArmyId, at: Coordinate, facing: Direction) -> bool {
        zone_of_control(at, facing)
            .into_iter()
            .any(|cell| self.is_occupied_by(cell, army.enemy()))
    }

    /// Units that are attacking plus the enemies in their zones of control.
    ///
    /// Each unit appears once; order follows board key order, with each
    /// attacker followed by any newly pulled-in enemies.
    pub fn units_in_battle_position(&self) -> Vec<Unit> {
        let mut seen: AHashSet<UnitKey> = AHashSet::new();
        let mut engaged = Vec::new();

        for (key, placement) in self.iter() {
            let enemies: Vec<Unit> = zone_of_control(placement.at, placement.facing)
                .into_iter()
                .flat_map(|cell| self.units_at(cell))
                .filter(|unit| unit.army() != key.army)
                .collect();
            if enemies.is_empty() {
                continue;
            }

            if seen.insert(key.clone()) {
                if let Some(attacker) = self.unit(key) {
                    engaged.push(attacker);
                }
            }
            for enemy in enemies {
                if seen.insert(enemy.key.clone()) {
                    engaged.push(enemy);
                }
            }
        }
        engaged
    }

    /// Cells `unit` may step to from `cell`.
    ///
    /// A unit entering enemy-controlled ground, or one that would have an
    /// enemy in its own zone of control there, is frozen and gets nothing.
    pub fn allowed_neighbors(&self, unit: &Unit, cell: Coordinate) -> Vec<Coordinate> {
        let enemy = unit.army().enemy();
        if self.is_controlled_by(cell, enemy) || self.enemy_in_zone(unit.army(), cell, unit.facing)
        {
            return Vec::new();
        }
        cell.neighbors()
            .into_iter()
            .filter(|n| !self.is_occupied_by(*n, enemy))
            .collect()
    }

    /// Can `unit` get from `from` to `to` within its movement factor?
    pub fn has_path(&self, unit: &Unit, from: Coordinate, to: Coordinate) -> bool {
        find_path(from, to, unit.movement_factor(), |cell| {
            self.allowed_neighbors(unit, cell)
        })
        .is_some()
    }

    /// Open cells a unit may fall back to, best first.
    ///
    /// Ordered straight back from the unit's facing, then sweeping forward
    /// alternating clockwise and counter-clockwise. A unit with no movement
    /// factor, or one not on the board, has none.
    pub fn retreat_targets(&self, key: &UnitKey) -> Vec<Coordinate> {
        let Some(placement) = self.placement(key) else {
            return Vec::new();
        };
        if placement.profile.movement_factor == 0 {
            return Vec::new();
        }

        let enemy = key.army.enemy();
        placement
            .facing
            .opposite()
            .fan()
            .into_iter()
            .filter_map(|dir| placement.at.adjacent(dir))
            .filter(|cell| !self.is_occupied(*cell) && !self.is_controlled_by(*cell, enemy))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::UnitProfile;

    fn c(x: i32, y: i32) -> Coordinate {
        Coordinate::new(x, y).unwrap()
    }

    fn unit(army: ArmyId, leader: &str, mf: u32, facing: Direction) -> Unit {
        Unit::new(UnitKey::new(army, leader), UnitProfile::new(2, mf), facing)
    }

    #[test]
    fn test_zone_of_control_cone() {
        let zoc = zone_of_control(c(5, 5), Direction::North);
        assert_eq!(zoc, vec![c(4, 4), c(5, 4), c(6, 4)]);

        let zoc = zone_of_control(c(5, 5), Direction::East);
        assert_eq!(zoc, vec![c(6, 4), c(6, 5), c(6, 6)]);
    }

    #[test]
    fn test_zone_of_control_at_edge() {
        let zoc = zone_of_control(c(1, 1), Direction::North);
        assert!(zoc.is_empty());

        let zoc = zone_of_control(c(1, 5), Direction::West);
        assert!(zoc.is_empty());

        let zoc = zone_of_control(c(1, 5), Direction::NorthWest);
        assert_eq!(zoc, vec![c(1, 4)]);
    }

    #[test]
    fn test_zone_of_control_no_facing() {
        assert_eq!(zone_of_control(c(5, 5), Direction::None), vec![c(5, 5)]);
    }

    #[test]
    fn test_controlled_cells() {
        let mut board = Board::new();
        board.place(&unit(ArmyId::Confederate, "Heth", 2, Direction::East), c(8, 8));

        assert!(board.is_controlled_by(c(8, 8), ArmyId::Confederate));
        assert!(board.is_controlled_by(c(9, 7), ArmyId::Confederate));
        assert!(board.is_controlled_by(c(9, 8), ArmyId::Confederate));
        assert!(board.is_controlled_by(c(9, 9), ArmyId::Confederate));
        assert!(!board.is_controlled_by(c(7, 8), ArmyId::Confederate));
        assert!(!board.is_controlled_by(c(9, 8), ArmyId::Union));
    }

    #[test]
    fn test_facing_units_are_in_battle_position() {
        let mut board = Board::new();
        let union = unit(ArmyId::Union, "Devin", 4, Direction::East);
        let reb = unit(ArmyId::Confederate, "Heth", 2, Direction::West);
        board.place(&union, c(5, 5));
        board.place(&reb, c(6, 5));

        let engaged = board.units_in_battle_position();
        assert_eq!(engaged.len(), 2);
        assert!(engaged.contains(&union));
        assert!(engaged.contains(&reb));
    }

    #[test]
    fn test_unit_pulled_in_once() {
        let mut board = Board::new();
        let target = unit(ArmyId::Confederate, "Heth", 2, Direction::South);
        board.place(&target, c(5, 5));
        board.place(&unit(ArmyId::Union, "A", 2, Direction::East), c(4, 5));
        board.place(&unit(ArmyId::Union, "B", 2, Direction::West), c(6, 5));

        let engaged = board.units_in_battle_position();
        assert_eq!(engaged.len(), 3);
        assert_eq!(engaged.iter().filter(|u| **u == target).count(), 1);
    }

    #[test]
    fn test_back_to_back_units_not_engaged() {
        let mut board = Board::new();
        board.place(&unit(ArmyId::Union, "A", 2, Direction::West), c(5, 5));
        board.place(&unit(ArmyId::Confederate, "B", 2, Direction::East), c(6, 5));

        assert!(board.units_in_battle_position().is_empty());
    }

    #[test]
    fn test_allowed_neighbors_open_ground() {
        let board = Board::new();
        let mover = unit(ArmyId::Union, "Gamble", 4, Direction::North);
        assert_eq!(board.allowed_neighbors(&mover, c(5, 5)).len(), 8);
    }

    #[test]
    fn test_allowed_neighbors_frozen_in_enemy_zone() {
        let mut board = Board::new();
        board.place(&unit(ArmyId::Confederate, "Heth", 2, Direction::East), c(8, 8));
        let mover = unit(ArmyId::Union, "Gamble", 4, Direction::North);

        assert!(board.allowed_neighbors(&mover, c(9, 8)).is_empty());
        assert!(!board.allowed_neighbors(&mover, c(7, 8)).is_empty());
    }

    #[test]
    fn test_allowed_neighbors_frozen_by_own_zone() {
        let mut board = Board::new();
        board.place(&unit(ArmyId::Confederate, "Heth", 2, Direction::South), c(8, 8));
        let mover = unit(ArmyId::Union, "Gamble", 4, Direction::West);

        // (9, 8) is outside Heth's cone, but facing west from it puts Heth in ours
        assert!(!board.is_controlled_by(c(9, 8), ArmyId::Confederate));
        assert!(board.allowed_neighbors(&mover, c(9, 8)).is_empty());
        assert_eq!(board.allowed_neighbors(&mover, c(10, 10)).len(), 8);
    }

    #[test]
    fn test_allowed_neighbors_skip_enemy_cells() {
        let mut board = Board::new();
        board.place(&unit(ArmyId::Confederate, "Heth", 2, Direction::North), c(5, 5));
        let mover = unit(ArmyId::Union, "Gamble", 4, Direction::South);

        let open = board.allowed_neighbors(&mover, c(4, 6));
        assert!(!open.contains(&c(5, 5)));
        assert_eq!(open.len(), 7);
    }

    #[test]
    fn test_has_path_blocked_by_zone() {
        let mut board = Board::new();
        // Wall of enemies facing south across row 5
        for x in 1..=22 {
            board.place(
                &unit(ArmyId::Confederate, &format!("R{x}"), 2, Direction::South),
                c(x, 5),
            );
        }
        let mover = unit(ArmyId::Union, "Gamble", 8, Direction::North);
        board.place(&mover, c(5, 9));

        // Row 6 is enemy ground: can end there but never pass
        assert!(board.has_path(&mover, c(5, 9), c(5, 6)));
        assert!(!board.has_path(&mover, c(5, 9), c(5, 3)));
    }

    #[test]
    fn test_has_path_respects_movement_factor() {
        let mut board = Board::new();
        let mover = unit(ArmyId::Union, "Devin", 2, Direction::North);
        board.place(&mover, c(5, 5));

        assert!(board.has_path(&mover, c(5, 5), c(7, 7)));
        assert!(!board.has_path(&mover, c(5, 5), c(8, 5)));
    }

    #[test]
    fn test_retreat_targets_zero_movement() {
        let mut board = Board::new();
        let hq = unit(ArmyId::Union, "Reynolds", 0, Direction::North);
        board.place(&hq, c(7, 20));
        assert!(board.retreat_targets(&hq.key).is_empty());
    }

    #[test]
    fn test_retreat_targets_prefer_straight_back() {
        let mut board = Board::new();
        let reb = unit(ArmyId::Confederate, "Heth", 2, Direction::East);
        board.place(&reb, c(8, 8));
        board.place(&unit(ArmyId::Union, "Devin", 4, Direction::West), c(9, 8));

        // Devin occupies (9, 8) and controls (8, 7), (8, 8) and (8, 9)
        let targets = board.retreat_targets(&reb.key);
        assert_eq!(targets, vec![c(7, 8), c(7, 7), c(7, 9), c(9, 7), c(9, 9)]);
    }
}
