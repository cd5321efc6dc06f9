//! Physics configuration

use crate::error::{PhysicsError, Result};
use serde::{Deserialize, Serialize};

/// Collision world and actor movement configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Height of the walkable floor; actors are pinned to it and level
    /// boxes stand on it
    pub ground_y: f32,

    /// Velocity blend rate toward the desired velocity (per second)
    pub velocity_blend_rate: f32,

    /// Minimum per-axis progress that counts as "moved" when deciding
    /// whether an axis was blocked
    pub blocked_axis_epsilon: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            ground_y: 0.0,
            velocity_blend_rate: 10.0,
            blocked_axis_epsilon: 1e-5,
        }
    }
}

impl PhysicsConfig {
    /// Set the velocity blend rate
    pub fn with_velocity_blend_rate(mut self, rate: f32) -> Self {
        self.velocity_blend_rate = rate;
        self
    }

    /// Set the floor height
    pub fn with_ground_y(mut self, y: f32) -> Self {
        self.ground_y = y;
        self
    }

    /// Reject values the resolver cannot work with
    pub fn validate(&self) -> Result<()> {
        if !(self.velocity_blend_rate > 0.0) {
            return Err(PhysicsError::InvalidConfig(format!(
                "velocity_blend_rate must be positive, got {}",
                self.velocity_blend_rate
            )));
        }
        if !self.ground_y.is_finite() {
            return Err(PhysicsError::InvalidConfig("ground_y must be finite".into()));
        }
        Ok(())
    }
}
