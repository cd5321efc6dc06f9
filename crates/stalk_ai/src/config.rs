//! Pursuer configuration

use crate::error::{AiError, Result};
use crate::search::DEFAULT_WAYPOINT_COUNT;
use crate::vision::VisionCone;
use serde::{Deserialize, Serialize};
use stalk_math::consts::TAU;

/// Speeds, senses and recovery limits for a pursuer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PursuerConfig {
    /// Patrol speed; suspicious and search speeds derive from it
    pub walk_speed: f32,
    /// Chase speed
    pub chase_speed: f32,
    /// Walk speed multiplier while suspicious
    pub suspicious_speed_factor: f32,
    /// Walk speed multiplier while searching
    pub search_speed_factor: f32,
    /// Facing blend factor per second
    pub turn_rate: f32,
    /// Idle scan rotation while standing at an investigation point (rad/s)
    pub scan_rate: f32,
    /// Collision sphere radius
    pub radius: f32,
    /// Sight
    pub vision: VisionCone,
    /// Outer radius of the search spiral
    pub search_radius: f32,
    /// Waypoints per search spiral
    pub search_waypoints: usize,
    /// Stuck recoveries allowed per suspicious episode before giving up
    pub max_stuck_retries: u32,
    /// Random offset applied to a recomputed target after getting stuck
    pub stuck_jitter_radius: f32,
    /// Seed for waypoint jitter and stuck recovery
    pub seed: u64,
}

impl Default for PursuerConfig {
    fn default() -> Self {
        Self {
            walk_speed: 2.5,
            chase_speed: 5.0,
            suspicious_speed_factor: 0.6,
            search_speed_factor: 0.7,
            turn_rate: 8.0,
            scan_rate: 1.5,
            radius: 0.3,
            vision: VisionCone::default(),
            search_radius: 5.0,
            search_waypoints: DEFAULT_WAYPOINT_COUNT,
            max_stuck_retries: 3,
            stuck_jitter_radius: 2.0,
            seed: 0x5747_4c4b,
        }
    }
}

impl PursuerConfig {
    /// Set walk and chase speeds
    pub fn with_speeds(mut self, walk: f32, chase: f32) -> Self {
        self.walk_speed = walk;
        self.chase_speed = chase;
        self
    }

    /// Set the vision cone
    pub fn with_vision(mut self, vision: VisionCone) -> Self {
        self.vision = vision;
        self
    }

    /// Set the RNG seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Speed while suspicious
    pub fn suspicious_speed(&self) -> f32 {
        self.walk_speed * self.suspicious_speed_factor
    }

    /// Speed while searching
    pub fn search_speed(&self) -> f32 {
        self.walk_speed * self.search_speed_factor
    }

    /// Reject values the state machine cannot work with
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("walk_speed", self.walk_speed),
            ("chase_speed", self.chase_speed),
            ("suspicious_speed_factor", self.suspicious_speed_factor),
            ("search_speed_factor", self.search_speed_factor),
            ("turn_rate", self.turn_rate),
            ("radius", self.radius),
            ("vision.range", self.vision.range),
            ("search_radius", self.search_radius),
        ];
        for (name, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(AiError::InvalidConfig(format!("{} must be positive, got {}", name, value)));
            }
        }
        if !(self.vision.fov > 0.0 && self.vision.fov <= TAU) {
            return Err(AiError::InvalidConfig(format!(
                "vision.fov must be in (0, 2pi], got {}",
                self.vision.fov
            )));
        }
        if self.search_waypoints == 0 {
            return Err(AiError::InvalidConfig("search_waypoints must be at least 1".into()));
        }
        if self.scan_rate < 0.0 || self.stuck_jitter_radius < 0.0 {
            return Err(AiError::InvalidConfig("scan_rate and stuck_jitter_radius must not be negative".into()));
        }
        Ok(())
    }
}
