//! Die rolls for combat resolution
//!
//! The engine never reaches for a global RNG. Every roll comes through a
//! `DieRoller` handed to the game at construction.

use std::collections::VecDeque;
use std::fmt;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// A face of a six-sided die
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DieFace(u8);

impl DieFace {
    pub const SIDES: u8 = 6;

    /// Face with the given pip count, if it is 1..=6
    pub fn new(pips: u8) -> Option<Self> {
        (1..=Self::SIDES).contains(&pips).then_some(Self(pips))
    }

    pub fn pips(self) -> u8 {
        self.0
    }

    /// Zero-based index, for table lookups
    pub fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    pub fn all() -> impl Iterator<Item = DieFace> {
        (1..=Self::SIDES).map(DieFace)
    }
}

impl TryFrom<u8> for DieFace {
    type Error = String;

    fn try_from(pips: u8) -> Result<Self, Self::Error> {
        DieFace::new(pips).ok_or_else(|| format!("die face must be 1-6, got {pips}"))
    }
}

impl From<DieFace> for u8 {
    fn from(face: DieFace) -> Self {
        face.0
    }
}

impl fmt::Display for DieFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Source of die faces
pub trait DieRoller: Send {
    fn roll(&mut self) -> DieFace;
}

/// Uniform die backed by a ChaCha8 stream
#[derive(Debug, Clone)]
pub struct SeededDie {
    rng: ChaCha8Rng,
}

impl SeededDie {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Seeded when a seed is given, entropy-seeded otherwise
    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::new(seed),
            None => Self::from_entropy(),
        }
    }
}

impl DieRoller for SeededDie {
    fn roll(&mut self) -> DieFace {
        DieFace(self.rng.gen_range(1..=DieFace::SIDES))
    }
}

/// Plays back queued faces, then falls back to a seeded die
#[derive(Debug, Clone)]
pub struct ScriptedDie {
    faces: VecDeque<DieFace>,
    fallback: SeededDie,
}

impl ScriptedDie {
    pub fn new(faces: impl IntoIterator<Item = DieFace>) -> Self {
        Self {
            faces: faces.into_iter().collect(),
            fallback: SeededDie::new(0),
        }
    }

    pub fn push(&mut self, face: DieFace) {
        self.faces.push_back(face);
    }

    /// Faces still queued
    pub fn remaining(&self) -> usize {
        self.faces.len()
    }
}

impl DieRoller for ScriptedDie {
    fn roll(&mut self) -> DieFace {
        match self.faces.pop_front() {
            Some(face) => face,
            None => self.fallback.roll(),
        }
    }
}
