//! # stalk_math - Ground-Plane Math
//!
//! Small vector and bounding-volume toolkit shared by the collision resolver,
//! the vision model and the pursuer AI. Everything lives in world space with
//! +Y up; actors move on the XZ ground plane.

pub mod angle;
pub mod bounds;
pub mod intersect;
pub mod ray;
pub mod vector;

pub use angle::*;
pub use bounds::*;
pub use intersect::*;
pub use ray::*;
pub use vector::*;

/// Common math constants
pub mod consts {
    pub const PI: f32 = core::f32::consts::PI;
    pub const TAU: f32 = PI * 2.0;
    pub const FRAC_PI_2: f32 = PI / 2.0;
    pub const DEG_TO_RAD: f32 = PI / 180.0;
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
    pub const EPSILON: f32 = 1e-6;
}

/// Convert degrees to radians
#[inline]
pub fn radians(degrees: f32) -> f32 {
    degrees * consts::DEG_TO_RAD
}

/// Convert radians to degrees
#[inline]
pub fn degrees(radians: f32) -> f32 {
    radians * consts::RAD_TO_DEG
}

/// Linear interpolation
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

pub mod prelude {
    pub use crate::angle::{forward_from_yaw, lerp_angle, wrap_angle, yaw_towards};
    pub use crate::bounds::Aabb;
    pub use crate::intersect::ray_aabb;
    pub use crate::ray::Ray;
    pub use crate::vector::Vec3;
    pub use crate::{degrees, lerp, radians};
}
