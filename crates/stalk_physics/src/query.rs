//! Query results and the line-of-sight seam

use crate::collider::ColliderHandle;
use stalk_math::Vec3;

/// Overlap between an actor sphere and a solid box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// The box that was hit
    pub collider: ColliderHandle,
    /// Unit push-out direction (from the box toward the sphere centre)
    pub normal: Vec3,
    /// How far the sphere overlaps the box
    pub depth: f32,
    /// Closest point on the box to the sphere centre
    pub point: Vec3,
}

/// Result of a raycast query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    /// The collider that was hit
    pub collider: ColliderHandle,
    /// Hit point in world space
    pub point: Vec3,
    /// Distance from ray origin
    pub distance: f32,
}

/// Anything that can answer "is the segment between these points blocked?"
///
/// The vision model only needs this, so tests can stand in a wall without
/// building a full collision world.
pub trait LineOfSight {
    /// True when something blocks the straight segment from `from` to `to`
    fn is_occluded(&self, from: Vec3, to: Vec3) -> bool;
}

/// Open space: nothing ever blocks sight
impl LineOfSight for () {
    fn is_occluded(&self, _from: Vec3, _to: Vec3) -> bool {
        false
    }
}
