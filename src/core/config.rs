//! Game configuration with documented constants
//!
//! The board dimensions are fixed by the map (see `grid::coord`); everything
//! that varies between scenarios lives here.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{GameError, Result};

/// Last turn of the historical scenario (7/1 0600 through 7/3 evening)
pub const DEFAULT_TURN_LIMIT: u32 = 49;

/// Configuration for one game session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Last playable turn
    ///
    /// When the turn counter would move past this value the game ends and
    /// the army whose move step opens each turn (Union) is declared winner.
    pub turn_limit: u32,

    /// Seed for the combat die
    ///
    /// `None` seeds from system entropy. Fixing the seed makes a whole game
    /// reproducible given the same sequence of caller actions.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            turn_limit: DEFAULT_TURN_LIMIT,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_turn_limit(mut self, turn_limit: u32) -> Self {
        self.turn_limit = turn_limit;
        self
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.turn_limit == 0 {
            return Err("turn_limit must be at least 1".into());
        }
        Ok(())
    }

    /// Parse and validate a config from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: GameConfig = toml::from_str(content)?;
        config.validate().map_err(GameError::Config)?;
        Ok(config)
    }

    /// Load and validate a config from a TOML file on disk
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
