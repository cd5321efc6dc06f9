//! Search waypoint planning
//!
//! Generates a loose outward spiral around the last known position. The
//! small random jitter on each angle keeps the pattern from looking
//! mechanical; the RNG is injected so runs are reproducible.

use rand::Rng;
use serde::{Deserialize, Serialize};
use stalk_math::{consts::TAU, Vec3};

/// Default number of waypoints in a search pattern
pub const DEFAULT_WAYPOINT_COUNT: usize = 8;
/// Maximum random angle added to each waypoint (radians)
pub const ANGLE_JITTER: f32 = 0.5;

/// Ordered search waypoints around a centre, with a wrapping cursor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPattern {
    center: Vec3,
    waypoints: Vec<Vec3>,
    index: usize,
}

impl SearchPattern {
    /// Generate `count` waypoints around `center`.
    ///
    /// Waypoint `i` sits at angle `i/count * TAU` plus jitter and radius
    /// `radius * (0.5 + 0.5 * i/count)`, so later points sit further out.
    pub fn generate<R: Rng>(center: Vec3, radius: f32, count: usize, rng: &mut R) -> Self {
        let waypoints = (0..count)
            .map(|i| {
                let t = i as f32 / count as f32;
                let angle = t * TAU + rng.gen_range(0.0..ANGLE_JITTER);
                let r = radius * (0.5 + 0.5 * t);
                Vec3::new(center.x + angle.cos() * r, center.y, center.z + angle.sin() * r)
            })
            .collect();

        Self {
            center,
            waypoints,
            index: 0,
        }
    }

    /// Start from the waypoint nearest `position` instead of index zero
    pub fn start_nearest(&mut self, position: Vec3) {
        self.index = self
            .waypoints
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                a.distance(position).total_cmp(&b.distance(position))
            })
            .map_or(0, |(i, _)| i);
    }

    /// Current waypoint, or the centre when the pattern is empty
    pub fn current(&self) -> Vec3 {
        self.waypoints.get(self.index).copied().unwrap_or(self.center)
    }

    /// Move to the next waypoint, wrapping at the end
    pub fn advance(&mut self) {
        if !self.waypoints.is_empty() {
            self.index = (self.index + 1) % self.waypoints.len();
        }
    }

    /// Centre the pattern was generated around
    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// All waypoints in visiting order
    pub fn waypoints(&self) -> &[Vec3] {
        &self.waypoints
    }

    /// Cursor into [`Self::waypoints`]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of waypoints
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Whether there are no waypoints
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    #[test]
    fn test_generates_requested_count_around_center() {
        let center = Vec3::ground(4.0, -2.0);
        let pattern = SearchPattern::generate(center, 5.0, DEFAULT_WAYPOINT_COUNT, &mut rng());
        assert_eq!(pattern.len(), 8);
        assert_eq!(pattern.center(), center);
        for (i, wp) in pattern.waypoints().iter().enumerate() {
            let expected = 5.0 * (0.5 + 0.5 * i as f32 / 8.0);
            assert!((wp.distance(center) - expected).abs() < 1e-4);
            assert_eq!(wp.y, center.y);
        }
    }

    #[test]
    fn test_same_seed_same_pattern() {
        let a = SearchPattern::generate(Vec3::ZERO, 5.0, 8, &mut rng());
        let b = SearchPattern::generate(Vec3::ZERO, 5.0, 8, &mut rng());
        assert_eq!(a, b);
    }

    #[test]
    fn test_start_nearest() {
        let mut pattern = SearchPattern::generate(Vec3::ZERO, 5.0, 8, &mut rng());
        let target = pattern.waypoints()[5];
        pattern.start_nearest(target + Vec3::ground(0.01, 0.0));
        assert_eq!(pattern.index(), 5);
        assert_eq!(pattern.current(), target);
    }

    #[test]
    fn test_advance_wraps() {
        let mut pattern = SearchPattern::generate(Vec3::ZERO, 5.0, 3, &mut rng());
        let first = pattern.current();
        pattern.advance();
        pattern.advance();
        pattern.advance();
        assert_eq!(pattern.index(), 0);
        assert_eq!(pattern.current(), first);
    }

    #[test]
    fn test_empty_pattern_falls_back_to_center() {
        let center = Vec3::ground(1.0, 1.0);
        let mut pattern = SearchPattern::generate(center, 5.0, 0, &mut rng());
        pattern.advance();
        pattern.start_nearest(Vec3::ZERO);
        assert!(pattern.is_empty());
        assert_eq!(pattern.current(), center);
    }
}
