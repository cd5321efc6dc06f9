//! Vision cone and detection strength
//!
//! Detection is a product of two falloffs: how close the target is relative
//! to the cone's range, and how centred it is relative to the half-angle.
//! Both reach zero at the cone boundary, so a target drifting out of sight
//! fades instead of popping. Any occluder between eye and target is a hard
//! gate.

use serde::{Deserialize, Serialize};
use stalk_math::{consts::EPSILON, forward_from_yaw, radians, Vec3};
use stalk_physics::LineOfSight;

/// Field-of-view cone used for sight checks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionCone {
    /// Full field of view (radians)
    pub fov: f32,
    /// Maximum sight distance
    pub range: f32,
    /// Eye height above the observer's feet; the sight ray is cast here
    pub eye_height: f32,
}

impl Default for VisionCone {
    fn default() -> Self {
        Self {
            fov: radians(120.0),
            range: 15.0,
            eye_height: 1.6,
        }
    }
}

impl VisionCone {
    /// Create a cone from a full field of view in degrees
    pub fn new(fov_degrees: f32, range: f32) -> Self {
        Self {
            fov: radians(fov_degrees),
            range,
            ..Default::default()
        }
    }

    /// Set eye height
    pub fn with_eye_height(mut self, eye_height: f32) -> Self {
        self.eye_height = eye_height;
        self
    }

    /// Half of the field of view
    #[inline]
    pub fn half_angle(&self) -> f32 {
        self.fov * 0.5
    }

    /// Detection strength in `[0, 1]` for a target seen from `origin` facing
    /// `yaw`. Zero when out of range, outside the cone, or occluded.
    pub fn detection_strength(
        &self,
        origin: Vec3,
        yaw: f32,
        target: Vec3,
        occluders: &impl LineOfSight,
    ) -> f32 {
        let to_target = (target - origin).horizontal();
        let distance = to_target.length();

        if distance > self.range {
            return 0.0;
        }

        // Standing on top of the observer
        if distance <= EPSILON {
            return 1.0;
        }

        let direction = to_target / distance;
        let angle = self.angle_to(yaw, direction);
        let half_angle = self.half_angle();
        if angle > half_angle {
            return 0.0;
        }

        let eye = origin.with_y(origin.y + self.eye_height);
        let sight_end = eye + direction * distance;
        if occluders.is_occluded(eye, sight_end) {
            return 0.0;
        }

        let distance_factor = (1.0 - distance / self.range).clamp(0.0, 1.0);
        let angle_factor = if half_angle > 0.0 {
            (1.0 - angle / half_angle).clamp(0.0, 1.0)
        } else {
            0.0
        };
        (distance_factor * angle_factor).clamp(0.0, 1.0)
    }

    /// Whether the target is visible at all
    pub fn can_see(&self, origin: Vec3, yaw: f32, target: Vec3, occluders: &impl LineOfSight) -> bool {
        self.detection_strength(origin, yaw, target, occluders) > 0.0
    }

    /// Angle between the facing direction and a unit direction on the ground
    fn angle_to(&self, yaw: f32, direction: Vec3) -> f32 {
        let forward = forward_from_yaw(yaw);
        forward.dot(direction).clamp(-1.0, 1.0).acos()
    }
}
