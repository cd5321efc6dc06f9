//! Fixed patrol routes

use serde::{Deserialize, Serialize};
use stalk_math::Vec3;

/// Looping list of patrol waypoints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatrolRoute {
    waypoints: Vec<Vec3>,
    #[serde(skip)]
    index: usize,
}

impl PatrolRoute {
    /// Create a route; it loops back to the first point after the last
    pub fn new(waypoints: Vec<Vec3>) -> Self {
        Self { waypoints, index: 0 }
    }

    /// Waypoint being walked to, if the route has any
    pub fn current(&self) -> Option<Vec3> {
        self.waypoints.get(self.index).copied()
    }

    /// Waypoint being walked to, or `fallback` on an empty route
    pub fn current_or(&self, fallback: Vec3) -> Vec3 {
        self.current().unwrap_or(fallback)
    }

    /// Move on to the next waypoint
    pub fn advance(&mut self) {
        if !self.waypoints.is_empty() {
            self.index = (self.index + 1) % self.waypoints.len();
        }
    }

    /// Restart from the first waypoint
    pub fn restart(&mut self) {
        self.index = 0;
    }

    pub fn waypoints(&self) -> &[Vec3] {
        &self.waypoints
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_loops() {
        let mut route = PatrolRoute::new(vec![Vec3::ground(0.0, 0.0), Vec3::ground(5.0, 0.0)]);
        assert_eq!(route.current(), Some(Vec3::ground(0.0, 0.0)));
        route.advance();
        assert_eq!(route.current(), Some(Vec3::ground(5.0, 0.0)));
        route.advance();
        assert_eq!(route.index(), 0);
    }

    #[test]
    fn test_empty_route_uses_fallback() {
        let mut route = PatrolRoute::default();
        route.advance();
        assert_eq!(route.current(), None);
        assert_eq!(route.current_or(Vec3::ONE), Vec3::ONE);
    }
}
