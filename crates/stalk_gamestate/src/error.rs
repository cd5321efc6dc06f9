//! Error types for levels and sessions

use stalk_ai::AiError;
use stalk_physics::PhysicsError;
use thiserror::Error;

/// Errors raised while loading a level or setting up a session
#[derive(Debug, Error)]
pub enum GameStateError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Level file is not valid JSON for a level
    #[error("Level parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Level parsed but describes an unplayable layout
    #[error("Invalid level: {0}")]
    InvalidLevel(String),

    /// Invalid session configuration
    #[error("Invalid session configuration: {0}")]
    InvalidConfig(String),

    /// Collision geometry rejected
    #[error(transparent)]
    Physics(#[from] PhysicsError),

    /// Pursuer setup rejected
    #[error(transparent)]
    Ai(#[from] AiError),
}

/// Result type for game state operations
pub type Result<T> = std::result::Result<T, GameStateError>;
