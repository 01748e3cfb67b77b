//! Attacker/defender groupings and their combat factors

use serde::{Deserialize, Serialize};

use crate::core::types::ArmyId;
use crate::units::Unit;

/// Ratio reported when the defenders bring no strength against a real attack
pub const UNOPPOSED_RATIO: f64 = 6.0;

/// One battle: every attacker against every defender
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Battle {
    pub attackers: Vec<Unit>,
    pub defenders: Vec<Unit>,
}

/// What callers receive from battle detection and submit for resolution
pub type BattleDescriptor = Battle;

impl Battle {
    pub fn new(attackers: Vec<Unit>, defenders: Vec<Unit>) -> Self {
        Self {
            attackers,
            defenders,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.attackers.is_empty() && self.defenders.is_empty()
    }

    /// Sum of the attackers' combat factors
    pub fn attacking_factor(&self) -> u32 {
        self.attackers.iter().map(Unit::combat_factor).sum()
    }

    /// Sum of the defenders' combat factors
    pub fn defending_factor(&self) -> u32 {
        self.defenders.iter().map(Unit::combat_factor).sum()
    }

    /// Attacking factor over defending factor.
    ///
    /// With no defending strength this is `UNOPPOSED_RATIO` if anyone attacks
    /// with strength, and 1.0 when both sides are empty.
    pub fn ratio(&self) -> f64 {
        let attacking = self.attacking_factor();
        let defending = self.defending_factor();
        if defending == 0 {
            if attacking > 0 {
                UNOPPOSED_RATIO
            } else {
                1.0
            }
        } else {
            attacking as f64 / defending as f64
        }
    }

    /// Army on the attack, inferred from whichever side is populated
    pub fn attacking_army(&self) -> Option<ArmyId> {
        self.attackers
            .first()
            .map(Unit::army)
            .or_else(|| self.defenders.first().map(|u| u.army().enemy()))
    }
}
