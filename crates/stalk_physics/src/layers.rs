//! Collision layer flags
//!
//! A static box can block movement, block vision, or both. Walls do both;
//! waist-high furniture usually only blocks movement.

use serde::{Deserialize, Serialize};

/// Bit set of roles a collider plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollisionLayers(pub u32);

impl CollisionLayers {
    /// Plays no role (kept registered but ignored by every query)
    pub const NONE: Self = Self(0);
    /// Blocks actor movement
    pub const SOLID: Self = Self(1 << 0);
    /// Blocks line of sight
    pub const OCCLUDER: Self = Self(1 << 1);
    /// Full-height wall
    pub const WALL: Self = Self(Self::SOLID.0 | Self::OCCLUDER.0);

    /// Check whether all bits of `other` are set
    #[inline]
    pub fn contains(&self, other: CollisionLayers) -> bool {
        (self.0 & other.0) == other.0 && other.0 != 0
    }

    /// Union of two layer sets
    #[inline]
    pub fn with(self, other: CollisionLayers) -> Self {
        Self(self.0 | other.0)
    }

    /// Remove layers
    #[inline]
    pub fn without(self, other: CollisionLayers) -> Self {
        Self(self.0 & !other.0)
    }
}

impl Default for CollisionLayers {
    fn default() -> Self {
        Self::WALL
    }
}
