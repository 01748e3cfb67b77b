use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Coordinates for ({x}, {y}) are out of bounds")]
    InvalidCoordinate { x: i32, y: i32 },

    #[error("Invalid move: {0}")]
    InvalidMove(String),

    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Reinforcement schedule error: {0}")]
    Schedule(String),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GameError {
    pub(crate) fn invalid_move(message: impl Into<String>) -> Self {
        Self::InvalidMove(message.into())
    }

    pub(crate) fn invalid_action(message: impl Into<String>) -> Self {
        Self::InvalidAction(message.into())
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
