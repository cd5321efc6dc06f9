//! Static box colliders

use crate::layers::CollisionLayers;
use serde::{Deserialize, Serialize};
use stalk_math::Aabb;

/// Handle to a collider in the collision world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColliderHandle(pub(crate) u32);

impl ColliderHandle {
    /// Raw index, stable for the lifetime of the world
    pub fn raw(&self) -> u32 {
        self.0
    }
}

/// An immovable axis-aligned box registered with the world
#[derive(Debug, Clone, PartialEq)]
pub struct Collider {
    /// Handle assigned at registration
    pub handle: ColliderHandle,
    /// World-space bounds
    pub bounds: Aabb,
    /// What this box blocks
    pub layers: CollisionLayers,
}

impl Collider {
    /// Whether this collider blocks movement
    #[inline]
    pub fn is_solid(&self) -> bool {
        self.layers.contains(CollisionLayers::SOLID)
    }

    /// Whether this collider blocks vision
    #[inline]
    pub fn is_occluder(&self) -> bool {
        self.layers.contains(CollisionLayers::OCCLUDER)
    }
}
