//! Session configuration

use crate::error::{GameStateError, Result};
use serde::{Deserialize, Serialize};
use stalk_ai::PursuerConfig;
use stalk_physics::PhysicsConfig;

/// Everything a session needs besides the level itself
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Collision resolution and actor movement
    pub physics: PhysicsConfig,
    /// The adversary
    pub pursuer: PursuerConfig,
    /// Player walking speed
    pub player_walk_speed: f32,
    /// Player speed while sprinting
    pub player_sprint_speed: f32,
    /// Player collision radius
    pub player_radius: f32,
    /// A landing distraction further than this from the pursuer goes unheard
    pub noise_hearing_range: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            pursuer: PursuerConfig::default(),
            player_walk_speed: 3.0,
            player_sprint_speed: 4.5,
            player_radius: 0.3,
            noise_hearing_range: 15.0,
        }
    }
}

impl SessionConfig {
    /// Set the pursuer configuration
    pub fn with_pursuer(mut self, pursuer: PursuerConfig) -> Self {
        self.pursuer = pursuer;
        self
    }

    /// Set player walk and sprint speeds
    pub fn with_player_speeds(mut self, walk: f32, sprint: f32) -> Self {
        self.player_walk_speed = walk;
        self.player_sprint_speed = sprint;
        self
    }

    /// Set how far distractions carry
    pub fn with_noise_hearing_range(mut self, range: f32) -> Self {
        self.noise_hearing_range = range;
        self
    }

    /// Player speed for the given sprint flag
    pub fn player_speed(&self, sprinting: bool) -> f32 {
        if sprinting {
            self.player_sprint_speed
        } else {
            self.player_walk_speed
        }
    }

    /// Validate this and the nested configurations
    pub fn validate(&self) -> Result<()> {
        self.physics.validate()?;
        self.pursuer.validate()?;

        if !(self.player_walk_speed > 0.0) || !(self.player_sprint_speed >= self.player_walk_speed) {
            return Err(GameStateError::InvalidConfig(format!(
                "player speeds must satisfy 0 < walk <= sprint, got walk {} sprint {}",
                self.player_walk_speed, self.player_sprint_speed
            )));
        }
        if !(self.player_radius > 0.0) {
            return Err(GameStateError::InvalidConfig(format!(
                "player_radius must be positive, got {}",
                self.player_radius
            )));
        }
        if !(self.noise_hearing_range >= 0.0) {
            return Err(GameStateError::InvalidConfig(format!(
                "noise_hearing_range must not be negative, got {}",
                self.noise_hearing_range
            )));
        }
        Ok(())
    }
}
