//! Yaw helpers
//!
//! Yaw is a rotation about +Y. Yaw 0 faces +Z and yaw PI/2 faces +X, so the
//! forward vector is `(sin yaw, 0, cos yaw)`.

use crate::consts::{PI, TAU};
use crate::vector::Vec3;

/// Unit forward vector on the ground plane for a yaw angle
#[inline]
pub fn forward_from_yaw(yaw: f32) -> Vec3 {
    Vec3::new(yaw.sin(), 0.0, yaw.cos())
}

/// Yaw that faces from `from` towards `to` on the ground plane
#[inline]
pub fn yaw_towards(from: Vec3, to: Vec3) -> f32 {
    let d = to - from;
    d.x.atan2(d.z)
}

/// Wrap an angle into `(-PI, PI]`
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    let mut a = (angle + PI).rem_euclid(TAU) - PI;
    if a <= -PI {
        a += TAU;
    }
    a
}

/// Interpolate between two angles along the shortest arc
#[inline]
pub fn lerp_angle(from: f32, to: f32, t: f32) -> f32 {
    wrap_angle(from + wrap_angle(to - from) * t.clamp(0.0, 1.0))
}
