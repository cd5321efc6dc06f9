//! Error types for the collision system

use thiserror::Error;

/// Collision system errors
#[derive(Debug, Error)]
pub enum PhysicsError {
    /// Collider not found
    #[error("Collider not found: {0:?}")]
    ColliderNotFound(crate::collider::ColliderHandle),

    /// Box with min > max or non-finite corners
    #[error("Invalid collider bounds: min {min:?}, max {max:?}")]
    InvalidBounds {
        min: [f32; 3],
        max: [f32; 3],
    },

    /// Invalid configuration
    #[error("Invalid physics configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for physics operations
pub type Result<T> = std::result::Result<T, PhysicsError>;
