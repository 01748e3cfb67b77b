//! Battle detection results, the combat table and dispositions
//!
//! Resolution is a pure function of (battle, die face); dice are injected.

pub mod battle;
pub mod dice;
pub mod resolution;
pub mod table;

pub use battle::{Battle, BattleDescriptor, UNOPPOSED_RATIO};
pub use dice::{DieFace, DieRoller, ScriptedDie, SeededDie};
pub use resolution::{Resolution, Retreat, RetreatOutcome, SideOutcome};
pub use table::{CombatResult, CombatTable};
