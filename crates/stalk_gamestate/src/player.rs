//! The player avatar

use crate::config::SessionConfig;
use serde::{Deserialize, Serialize};
use stalk_math::Vec3;
use stalk_physics::{CollisionWorld, KinematicBody};

/// One tick of player intent
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerInput {
    /// Desired ground-plane direction as (x, z); any length, zero to stand still
    pub movement: (f32, f32),
    pub sprint: bool,
    /// Hide when next to a hiding spot, or leave the current one
    pub toggle_hide: bool,
    /// Throw a distraction to land at this point
    pub throw_at: Option<Vec3>,
}

impl PlayerInput {
    /// Do nothing
    pub fn idle() -> Self {
        Self::default()
    }

    /// Walk along (x, z)
    pub fn moving(x: f32, z: f32) -> Self {
        Self {
            movement: (x, z),
            ..Self::default()
        }
    }

    /// Walk toward `target` from `from`
    pub fn towards(from: Vec3, target: Vec3) -> Self {
        let direction = (target - from).horizontal();
        Self::moving(direction.x, direction.z)
    }

    pub fn with_sprint(mut self) -> Self {
        self.sprint = true;
        self
    }

    pub fn with_toggle_hide(mut self) -> Self {
        self.toggle_hide = true;
        self
    }

    pub fn with_throw(mut self, target: Vec3) -> Self {
        self.throw_at = Some(target);
        self
    }

    /// Movement as a ground-plane vector
    pub fn direction(&self) -> Vec3 {
        Vec3::ground(self.movement.0, self.movement.1)
    }
}

/// Player state
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    body: KinematicBody,
    /// Index into the level's hiding spots while hidden
    hiding_spot: Option<usize>,
    distractions_left: u32,
}

impl Player {
    pub fn new(spawn: Vec3, radius: f32, distractions: u32) -> Self {
        Self {
            body: KinematicBody::new(spawn, radius),
            hiding_spot: None,
            distractions_left: distractions,
        }
    }

    /// Stand on a floor other than `y = 0`
    pub fn with_ground_y(mut self, ground_y: f32) -> Self {
        self.body = self.body.with_ground_y(ground_y);
        self
    }

    pub fn position(&self) -> Vec3 {
        self.body.position
    }

    pub fn body(&self) -> &KinematicBody {
        &self.body
    }

    pub fn is_hidden(&self) -> bool {
        self.hiding_spot.is_some()
    }

    pub fn hiding_spot(&self) -> Option<usize> {
        self.hiding_spot
    }

    pub fn distractions_left(&self) -> u32 {
        self.distractions_left
    }

    /// Slip into a hiding spot; the body stops where it stands
    pub fn hide(&mut self, spot: usize) {
        self.hiding_spot = Some(spot);
        self.body.velocity = Vec3::ZERO;
    }

    /// Leave the hiding spot, returning which one it was
    pub fn emerge(&mut self) -> Option<usize> {
        self.hiding_spot.take()
    }

    /// Use up one distraction; false when none are left
    pub fn take_distraction(&mut self) -> bool {
        if self.distractions_left == 0 {
            return false;
        }
        self.distractions_left -= 1;
        true
    }

    /// Apply movement input. Hidden players stay frozen.
    pub fn apply_movement(&mut self, input: &PlayerInput, config: &SessionConfig, dt: f32, world: &CollisionWorld) -> f32 {
        if self.is_hidden() {
            return 0.0;
        }

        let direction = input.direction();
        if !direction.is_finite() || direction.length_squared() <= f32::EPSILON {
            // Residual velocity still carries the body while it decays
            return self.body.move_in_direction(Vec3::ZERO, 0.0, dt, world);
        }

        let target = self.body.position + direction;
        let moved = self
            .body
            .move_in_direction(direction, config.player_speed(input.sprint), dt, world);
        self.body.face_towards(target, config.pursuer.turn_rate, dt);
        moved
    }
}
