//! Turning a combat result into unit dispositions
//!
//! Disposition is a pure function of the battle and the result. Retreats are
//! filled in afterwards by the game, which owns the board.

use serde::{Deserialize, Serialize};

use crate::combat::battle::Battle;
use crate::combat::dice::DieFace;
use crate::combat::table::{CombatResult, CombatTable};
use crate::core::types::ArmyId;
use crate::grid::Coordinate;
use crate::units::{Unit, UnitKey};

/// Units of one side that stay on the board and those that are lost
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SideOutcome {
    pub active: Vec<Unit>,
    pub eliminated: Vec<Unit>,
}

impl SideOutcome {
    fn all_active(units: &[Unit]) -> Self {
        Self {
            active: units.to_vec(),
            eliminated: Vec::new(),
        }
    }

    fn all_eliminated(units: &[Unit]) -> Self {
        Self {
            active: Vec::new(),
            eliminated: units.to_vec(),
        }
    }

    /// Lose the weakest units first until `offset` combat factor is matched
    fn balanced(units: &[Unit], offset: u32) -> Self {
        let mut sorted = units.to_vec();
        sorted.sort_by_key(Unit::combat_factor);

        let mut outcome = Self::default();
        let mut remaining = offset;
        for unit in sorted {
            if remaining > 0 {
                remaining = remaining.saturating_sub(unit.combat_factor());
                outcome.eliminated.push(unit);
            } else {
                outcome.active.push(unit);
            }
        }
        outcome
    }

    fn eliminate(&mut self, key: &UnitKey) {
        if let Some(index) = self.active.iter().position(|unit| &unit.key == key) {
            let unit = self.active.remove(index);
            self.eliminated.push(unit);
        }
    }
}

/// Where a retreating unit ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetreatOutcome {
    Moved { to: Coordinate },
    Eliminated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Retreat {
    pub unit: UnitKey,
    pub outcome: RetreatOutcome,
}

/// Full result of resolving one battle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub result: CombatResult,
    /// Face rolled, if the result came from the table
    pub face: Option<DieFace>,
    pub attacking_army: Option<ArmyId>,
    pub attackers: SideOutcome,
    pub defenders: SideOutcome,
    pub retreats: Vec<Retreat>,
}

impl Resolution {
    /// Dispose of the battle's units according to `result`
    pub fn resolve(battle: &Battle, result: CombatResult) -> Self {
        let (attackers, defenders) = match result {
            CombatResult::AttackerEliminated => (
                SideOutcome::all_eliminated(&battle.attackers),
                SideOutcome::all_active(&battle.defenders),
            ),
            CombatResult::DefenderEliminated => (
                SideOutcome::all_active(&battle.attackers),
                SideOutcome::all_eliminated(&battle.defenders),
            ),
            CombatResult::AttackerRetreats | CombatResult::DefenderRetreats => (
                SideOutcome::all_active(&battle.attackers),
                SideOutcome::all_active(&battle.defenders),
            ),
            CombatResult::Exchange => exchange(battle),
        };

        Self {
            result,
            face: None,
            attacking_army: battle.attacking_army(),
            attackers,
            defenders,
            retreats: Vec::new(),
        }
    }

    /// Look the face up in `table` at the battle's ratio and resolve
    pub fn from_face(battle: &Battle, table: &CombatTable, face: DieFace) -> Self {
        let result = table.lookup(face, battle.ratio());
        Self {
            face: Some(face),
            ..Self::resolve(battle, result)
        }
    }

    /// Units that must fall back
    pub fn retreating(&self) -> &[Unit] {
        match self.result {
            CombatResult::AttackerRetreats => &self.attackers.active,
            CombatResult::DefenderRetreats => &self.defenders.active,
            _ => &[],
        }
    }

    /// Units lost in the battle, attackers first. This includes retreating
    /// units that found no open cell.
    pub fn eliminated(&self) -> impl Iterator<Item = &Unit> {
        self.attackers
            .eliminated
            .iter()
            .chain(self.defenders.eliminated.iter())
    }

    /// Units lost because they had nowhere to retreat; also in `eliminated`
    pub fn retreat_losses(&self) -> impl Iterator<Item = &UnitKey> {
        self.retreats
            .iter()
            .filter(|r| r.outcome == RetreatOutcome::Eliminated)
            .map(|r| &r.unit)
    }

    fn side_for(&self, army: ArmyId) -> &SideOutcome {
        if self.attacking_army == Some(army) {
            &self.attackers
        } else {
            &self.defenders
        }
    }

    /// Active units belonging to `army`
    pub fn active_for(&self, army: ArmyId) -> &[Unit] {
        &self.side_for(army).active
    }

    /// Eliminated units belonging to `army`
    pub fn eliminated_for(&self, army: ArmyId) -> &[Unit] {
        &self.side_for(army).eliminated
    }

    /// Record where a retreating unit went. A unit with nowhere to go moves
    /// from its side's active list to the eliminated list.
    pub(crate) fn record_retreat(&mut self, unit: UnitKey, outcome: RetreatOutcome) {
        if outcome == RetreatOutcome::Eliminated {
            self.side_for_mut(unit.army).eliminate(&unit);
        }
        self.retreats.push(Retreat { unit, outcome });
    }

    fn side_for_mut(&mut self, army: ArmyId) -> &mut SideOutcome {
        if self.attacking_army == Some(army) {
            &mut self.attackers
        } else {
            &mut self.defenders
        }
    }
}

/// Weaker side is wiped out; the stronger loses its weakest units until the
/// loss is offset. Equal strength takes both sides down, unless neither side
/// has any strength at all.
fn exchange(battle: &Battle) -> (SideOutcome, SideOutcome) {
    let attacking = battle.attacking_factor();
    let defending = battle.defending_factor();

    if attacking > defending {
        (
            SideOutcome::balanced(&battle.attackers, defending),
            SideOutcome::all_eliminated(&battle.defenders),
        )
    } else if attacking < defending {
        (
            SideOutcome::all_eliminated(&battle.attackers),
            SideOutcome::balanced(&battle.defenders, attacking),
        )
    } else if attacking == 0 {
        (
            SideOutcome::all_active(&battle.attackers),
            SideOutcome::all_active(&battle.defenders),
        )
    } else {
        (
            SideOutcome::all_eliminated(&battle.attackers),
            SideOutcome::all_eliminated(&battle.defenders),
        )
    }
}
