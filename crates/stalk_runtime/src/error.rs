//! Runtime errors

use stalk_gamestate::GameStateError;
use thiserror::Error;

/// Anything that stops the runtime from starting a session
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Boot config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid boot configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Game(#[from] GameStateError),
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
