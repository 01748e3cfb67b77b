//! The combat results table

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::combat::dice::DieFace;

/// Outcome of a battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombatResult {
    #[serde(rename = "AELIM")]
    AttackerEliminated,
    #[serde(rename = "ABACK")]
    AttackerRetreats,
    #[serde(rename = "DBACK")]
    DefenderRetreats,
    #[serde(rename = "DELIM")]
    DefenderEliminated,
    #[serde(rename = "EXCHANGE")]
    Exchange,
}

impl fmt::Display for CombatResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            CombatResult::AttackerEliminated => "AELIM",
            CombatResult::AttackerRetreats => "ABACK",
            CombatResult::DefenderRetreats => "DBACK",
            CombatResult::DefenderEliminated => "DELIM",
            CombatResult::Exchange => "EXCHANGE",
        };
        write!(f, "{code}")
    }
}

/// Per-face threshold rows: the row with the largest threshold not above the
/// battle ratio decides the result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatTable {
    faces: Vec<Vec<(f64, CombatResult)>>,
}

impl CombatTable {
    /// Build a table from one row list per face (1 through 6).
    ///
    /// Rows may be given in any order; each face needs at least one row.
    pub fn new(faces: [Vec<(f64, CombatResult)>; 6]) -> Result<Self, String> {
        let mut faces: Vec<Vec<(f64, CombatResult)>> = faces.into_iter().collect();
        for (index, rows) in faces.iter_mut().enumerate() {
            if rows.is_empty() {
                return Err(format!("die face {} has no results", index + 1));
            }
            if rows.iter().any(|(threshold, _)| !threshold.is_finite() || *threshold < 0.0) {
                return Err(format!("die face {} has an invalid threshold", index + 1));
            }
            rows.sort_by(|a, b| a.0.total_cmp(&b.0));
        }
        Ok(Self { faces })
    }

    /// The Gettysburg results table
    pub fn standard() -> Self {
        use CombatResult::*;

        Self {
            faces: vec![
                // 1
                vec![
                    (0.0, AttackerEliminated),
                    (0.2, AttackerRetreats),
                    (0.333, DefenderRetreats),
                    (0.5, DefenderEliminated),
                ],
                // 2
                vec![
                    (0.0, AttackerEliminated),
                    (0.25, AttackerRetreats),
                    (0.333, Exchange),
                    (1.0, AttackerRetreats),
                    (2.0, Exchange),
                    (5.0, DefenderRetreats),
                ],
                // 3
                vec![
                    (0.0, AttackerEliminated),
                    (0.167, AttackerRetreats),
                    (0.5, DefenderRetreats),
                    (4.0, DefenderEliminated),
                ],
                // 4
                vec![
                    (0.0, AttackerEliminated),
                    (0.2, AttackerRetreats),
                    (0.3, DefenderRetreats),
                    (6.0, DefenderEliminated),
                ],
                // 5
                vec![
                    (0.0, AttackerEliminated),
                    (1.0, Exchange),
                    (4.0, DefenderRetreats),
                    (5.0, DefenderEliminated),
                ],
                // 6
                vec![(0.0, AttackerEliminated), (3.0, DefenderEliminated)],
            ],
        }
    }

    /// Result for a die face at the given battle ratio
    pub fn lookup(&self, face: DieFace, ratio: f64) -> CombatResult {
        let Some(rows) = self.faces.get(face.index()) else {
            return CombatResult::AttackerEliminated;
        };
        rows.iter()
            .rev()
            .find(|(threshold, _)| *threshold <= ratio)
            .or_else(|| rows.first())
            .map(|(_, result)| *result)
            .unwrap_or(CombatResult::AttackerEliminated)
    }

    /// Does any ratio on this face produce `result`?
    pub fn can_produce(&self, face: DieFace, result: CombatResult) -> bool {
        self.faces
            .get(face.index())
            .is_some_and(|rows| rows.iter().any(|(_, r)| *r == result))
    }
}

impl Default for CombatTable {
    fn default() -> Self {
        Self::standard()
    }
}
