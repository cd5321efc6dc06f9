//! Error types for the pursuer AI

use thiserror::Error;

/// Pursuer AI errors
#[derive(Debug, Error)]
pub enum AiError {
    /// A transition named a state that does not exist
    #[error("Unknown pursuer state: {0}")]
    UnknownState(String),

    /// Invalid configuration
    #[error("Invalid pursuer configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for AI operations
pub type Result<T> = std::result::Result<T, AiError>;

impl AiError {
    /// Whether this error came from a bad state name
    pub fn is_unknown_state(&self) -> bool {
        matches!(self, AiError::UnknownState(_))
    }
}
