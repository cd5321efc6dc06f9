//! 3D ray for line-of-sight queries

use crate::vector::Vec3;

/// 3D ray for intersection testing
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    /// Ray origin point
    pub origin: Vec3,
    /// Ray direction (normalized)
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray with normalized direction
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Create a ray from two points
    #[inline]
    pub fn from_points(start: Vec3, end: Vec3) -> Self {
        Self::new(start, end - start)
    }

    /// Get a point at distance t along the ray
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Get the inverse direction (1.0 / direction component)
    #[inline]
    pub fn inverse_direction(&self) -> Vec3 {
        Vec3::new(
            1.0 / self.direction.x,
            1.0 / self.direction.y,
            1.0 / self.direction.z,
        )
    }

    /// Check if the ray direction is valid (non-zero length)
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.direction.length_squared() > 1e-10
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points() {
        let ray = Ray::from_points(Vec3::ZERO, Vec3::new(0.0, 0.0, 4.0));
        assert_eq!(ray.direction, Vec3::Z);
        assert_eq!(ray.at(2.0), Vec3::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn test_degenerate_ray() {
        let ray = Ray::from_points(Vec3::ONE, Vec3::ONE);
        assert!(!ray.is_valid());
    }
}
