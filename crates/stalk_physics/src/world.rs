//! Collision world - the registry of static boxes every actor collides with

use crate::collider::{Collider, ColliderHandle};
use crate::config::PhysicsConfig;
use crate::error::{PhysicsError, Result};
use crate::layers::CollisionLayers;
use crate::query::{Contact, LineOfSight, RaycastHit};
use stalk_math::{ray_aabb, Aabb, Ray, Vec3};

/// Penetration tolerated after resolution before a move is refused
const PENETRATION_SLOP: f32 = 1e-3;

/// Static level geometry plus the discrete sphere-vs-box resolver
///
/// Boxes are registered at level build time and read by every moving actor
/// on every tick; nothing mutates them during play.
#[derive(Debug, Clone, Default)]
pub struct CollisionWorld {
    /// Configuration
    config: PhysicsConfig,

    /// Registered colliders in registration order
    colliders: Vec<Collider>,

    /// Next handle to hand out
    next_handle: u32,
}

impl CollisionWorld {
    /// Create an empty collision world
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            config,
            colliders: Vec::new(),
            next_handle: 0,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    // ==================== Colliders ====================

    /// Register a static box
    pub fn add_box(&mut self, bounds: Aabb, layers: CollisionLayers) -> Result<ColliderHandle> {
        if !bounds.is_valid() {
            return Err(PhysicsError::InvalidBounds {
                min: bounds.min.to_array(),
                max: bounds.max.to_array(),
            });
        }

        let handle = ColliderHandle(self.next_handle);
        self.next_handle += 1;
        self.colliders.push(Collider {
            handle,
            bounds,
            layers,
        });
        log::trace!("Registered collider {:?} {:?} ({:?})", handle, bounds, layers);
        Ok(handle)
    }

    /// Remove a box, e.g. before re-registering geometry that moved
    pub fn remove(&mut self, handle: ColliderHandle) -> Result<Collider> {
        let index = self
            .colliders
            .iter()
            .position(|c| c.handle == handle)
            .ok_or(PhysicsError::ColliderNotFound(handle))?;
        Ok(self.colliders.remove(index))
    }

    /// Look up a collider
    pub fn get(&self, handle: ColliderHandle) -> Result<&Collider> {
        self.colliders
            .iter()
            .find(|c| c.handle == handle)
            .ok_or(PhysicsError::ColliderNotFound(handle))
    }

    /// All registered colliders
    pub fn colliders(&self) -> &[Collider] {
        &self.colliders
    }

    /// Number of registered colliders
    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    /// Whether no colliders are registered
    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    // ==================== Queries ====================

    /// Test a sphere against every solid box.
    ///
    /// Returns the first overlapping box in registration order; overlaps
    /// with later boxes are not accumulated.
    pub fn sphere_vs_boxes(&self, center: Vec3, radius: f32) -> Option<Contact> {
        self.colliders
            .iter()
            .filter(|c| c.is_solid())
            .find_map(|c| sphere_vs_box(c, center, radius))
    }

    /// Whether a sphere at `center` overlaps any solid box
    pub fn is_blocked(&self, center: Vec3, radius: f32) -> bool {
        self.sphere_vs_boxes(center, radius).is_some()
    }

    /// Resolve a requested move from `current` to `desired`.
    ///
    /// The desired position is pushed out of the first box it overlaps, then
    /// the X-only and Z-only moves are tested separately so that a diagonal
    /// move into a wall keeps sliding along the unblocked axis. Both axes
    /// blocked leaves the actor at the pushed-out position.
    pub fn resolve_movement(&self, current: Vec3, desired: Vec3, radius: f32) -> Vec3 {
        let Some(contact) = self.sphere_vs_boxes(desired, radius) else {
            return desired;
        };

        let pushed = desired + contact.normal * contact.depth;

        let x_only = Vec3::new(desired.x, pushed.y, current.z);
        let z_only = Vec3::new(current.x, pushed.y, desired.z);
        let x_free = !self.is_blocked(x_only, radius);
        let z_free = !self.is_blocked(z_only, radius);

        let resolved = match (x_free, z_free) {
            (true, false) => Vec3::new(desired.x, pushed.y, pushed.z),
            (false, true) => Vec3::new(pushed.x, pushed.y, desired.z),
            // Corner: both axes blocked. Or neither axis blocked on its own
            // while the full move was: keep the push-out.
            _ => pushed,
        };

        // A slide can keep an axis the push-out corrected (past a convex
        // corner), and the push-out itself can land in a neighbouring box
        // where two boxes meet. Fall back to the push-out, then to holding
        // position, rather than end up inside geometry.
        let skin = (radius - PENETRATION_SLOP).max(0.0);
        if self.is_blocked(resolved, skin) {
            if !self.is_blocked(pushed, skin) {
                return pushed;
            }
            if !self.is_blocked(current, skin) {
                return current;
            }
        }
        resolved
    }

    /// Cast a ray against occluding boxes and return the nearest hit within
    /// `max_distance`
    pub fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RaycastHit> {
        let ray = Ray::new(origin, direction);
        if !ray.is_valid() {
            return None;
        }

        self.colliders
            .iter()
            .filter(|c| c.is_occluder())
            .filter_map(|c| {
                ray_aabb(&ray, &c.bounds)
                    .filter(|&t| t <= max_distance)
                    .map(|t| RaycastHit {
                        collider: c.handle,
                        point: ray.at(t),
                        distance: t,
                    })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

impl LineOfSight for CollisionWorld {
    fn is_occluded(&self, from: Vec3, to: Vec3) -> bool {
        let delta = to - from;
        let distance = delta.length();
        if distance <= f32::EPSILON {
            return false;
        }
        self.raycast(from, delta, distance).is_some()
    }
}

/// Sphere-vs-box overlap for a single collider
fn sphere_vs_box(collider: &Collider, center: Vec3, radius: f32) -> Option<Contact> {
    let closest = collider.bounds.closest_point(center);
    let offset = center - closest;
    let distance = offset.length();

    if distance >= radius {
        return None;
    }

    // Centre on the closest point means it sits inside (or on) the box:
    // there is no direction to push along, so push up.
    let normal = if distance > 0.0 { offset / distance } else { Vec3::Y };

    Some(Contact {
        collider: collider.handle,
        normal,
        depth: radius - distance,
        point: closest,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const RADIUS: f32 = 0.3;

    /// Wall spanning x in [-10, 10], z in [5, 6], three units tall
    fn world_with_wall() -> CollisionWorld {
        let mut world = CollisionWorld::new(PhysicsConfig::default());
        world
            .add_box(
                Aabb::new(Vec3::new(-10.0, 0.0, 5.0), Vec3::new(10.0, 3.0, 6.0)),
                CollisionLayers::WALL,
            )
            .unwrap();
        world
    }

    #[test]
    fn test_add_box_rejects_inverted_bounds() {
        let mut world = CollisionWorld::new(PhysicsConfig::default());
        let result = world.add_box(Aabb::new(Vec3::ONE, Vec3::ZERO), CollisionLayers::WALL);
        assert!(matches!(result, Err(PhysicsError::InvalidBounds { .. })));
        assert!(world.is_empty());
    }

    #[test]
    fn test_remove_collider() {
        let mut world = world_with_wall();
        let handle = world.colliders()[0].handle;
        world.remove(handle).unwrap();
        assert!(world.is_empty());
        assert!(matches!(world.get(handle), Err(PhysicsError::ColliderNotFound(_))));
    }

    #[test]
    fn test_sphere_contact_normal_and_depth() {
        let world = world_with_wall();
        let contact = world.sphere_vs_boxes(Vec3::ground(0.0, 4.9), RADIUS).unwrap();
        assert_abs_diff_eq!(contact.normal.z, -1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(contact.depth, 0.2, epsilon = 1e-5);
    }

    #[test]
    fn test_touching_is_not_colliding() {
        let world = world_with_wall();
        assert!(world.sphere_vs_boxes(Vec3::ground(0.0, 4.5), 0.5).is_none());
    }

    #[test]
    fn test_degenerate_contact_pushes_up() {
        let world = world_with_wall();
        let contact = world.sphere_vs_boxes(Vec3::new(0.0, 1.0, 5.5), RADIUS).unwrap();
        assert_eq!(contact.normal, Vec3::Y);
        assert_abs_diff_eq!(contact.depth, RADIUS, epsilon = 1e-6);
    }

    #[test]
    fn test_first_box_wins() {
        let mut world = world_with_wall();
        let second = world
            .add_box(Aabb::new(Vec3::new(-10.0, 0.0, 4.8), Vec3::new(10.0, 3.0, 5.2)), CollisionLayers::WALL)
            .unwrap();
        let contact = world.sphere_vs_boxes(Vec3::ground(0.0, 4.9), RADIUS).unwrap();
        assert_ne!(contact.collider, second);
    }

    #[test]
    fn test_non_solid_boxes_are_ignored_for_movement() {
        let mut world = CollisionWorld::new(PhysicsConfig::default());
        world
            .add_box(Aabb::on_ground(0.0, 0.0, 2.0, 2.0, 3.0), CollisionLayers::OCCLUDER)
            .unwrap();
        assert!(world.sphere_vs_boxes(Vec3::ZERO, RADIUS).is_none());
    }

    #[test]
    fn test_free_move_is_unchanged() {
        let world = world_with_wall();
        let current = Vec3::ground(0.0, 0.0);
        let desired = Vec3::ground(0.5, 0.5);
        assert_eq!(world.resolve_movement(current, desired, RADIUS), desired);
    }

    #[test]
    fn test_head_on_move_is_pushed_out() {
        let world = world_with_wall();
        let resolved = world.resolve_movement(Vec3::ground(0.0, 4.5), Vec3::ground(0.0, 4.9), RADIUS);
        assert_abs_diff_eq!(resolved.z, 4.7, epsilon = 1e-5);
        assert!(world.colliders()[0].bounds.distance_to_point(resolved) >= RADIUS - 1e-4);
    }

    #[test]
    fn test_diagonal_move_slides_along_wall() {
        let world = world_with_wall();
        let current = Vec3::ground(0.0, 4.5);
        let desired = Vec3::ground(0.2, 4.9);
        let resolved = world.resolve_movement(current, desired, RADIUS);

        assert_abs_diff_eq!(resolved.x, 0.2, epsilon = 1e-6);
        assert!(resolved.z < 4.9);
        assert!(world.colliders()[0].bounds.distance_to_point(resolved) >= RADIUS - 1e-4);
    }

    #[test]
    fn test_corner_keeps_pushed_position() {
        let mut world = world_with_wall();
        // Second wall closing the corner on +X
        world
            .add_box(Aabb::new(Vec3::new(1.0, 0.0, -10.0), Vec3::new(2.0, 3.0, 10.0)), CollisionLayers::WALL)
            .unwrap();
        let current = Vec3::ground(0.6, 4.6);
        let desired = Vec3::ground(0.9, 4.9);
        let resolved = world.resolve_movement(current, desired, RADIUS);
        assert!(resolved.x < 0.9 || resolved.z < 4.9);
        for collider in world.colliders() {
            assert!(collider.bounds.distance_to_point(resolved) >= RADIUS - 1e-3);
        }
    }

    #[test]
    fn test_slide_past_convex_corner_keeps_push_out() {
        let mut world = CollisionWorld::new(PhysicsConfig::default());
        world
            .add_box(Aabb::new(Vec3::ZERO, Vec3::new(2.0, 3.0, 2.0)), CollisionLayers::WALL)
            .unwrap();
        let bounds = world.colliders()[0].bounds;

        // Coming up the -X face from below the corner: the face pushes out
        // along X, but X alone is clear while Z alone is blocked, so a plain
        // slide would keep the un-pushed X and sit 0.2 inside the box.
        let current = Vec3::ground(-0.1, -0.5);
        let desired = Vec3::ground(-0.1, 0.6);
        let resolved = world.resolve_movement(current, desired, RADIUS);

        assert_abs_diff_eq!(resolved.x, -0.3, epsilon = 1e-5);
        assert_abs_diff_eq!(resolved.z, 0.6, epsilon = 1e-5);
        assert!(bounds.distance_to_point(resolved) >= RADIUS - 1e-4);
    }

    #[test]
    fn test_corner_between_boxes_holds_position() {
        let mut world = world_with_wall();
        world
            .add_box(Aabb::new(Vec3::new(1.0, 0.0, -10.0), Vec3::new(2.0, 3.0, 10.0)), CollisionLayers::WALL)
            .unwrap();
        let current = Vec3::ground(0.6, 4.6);
        assert_eq!(world.resolve_movement(current, Vec3::ground(0.9, 4.9), RADIUS), current);
    }

    #[test]
    fn test_pressing_into_corner_never_tunnels() {
        let mut world = world_with_wall();
        world
            .add_box(Aabb::new(Vec3::new(1.0, 0.0, -10.0), Vec3::new(2.0, 3.0, 10.0)), CollisionLayers::WALL)
            .unwrap();
        let mut position = Vec3::ground(0.0, 4.0);
        for _ in 0..200 {
            position = world.resolve_movement(position, position + Vec3::ground(0.05, 0.02), RADIUS);
        }
        assert!(position.x < 1.0 - RADIUS + 1e-3);
        assert!(position.z < 5.0 - RADIUS + 1e-3);
    }

    #[test]
    fn test_containment_for_many_approaches() {
        let world = world_with_wall();
        let bounds = world.colliders()[0].bounds;
        for i in 0..16 {
            let x = -3.0 + i as f32 * 0.4;
            let current = Vec3::ground(x, 4.6);
            let desired = Vec3::ground(x + 0.1, 4.85);
            let resolved = world.resolve_movement(current, desired, RADIUS);
            assert!(
                bounds.distance_to_point(resolved) >= RADIUS - 1e-4,
                "penetrated at x = {}",
                x
            );
        }
    }

    #[test]
    fn test_raycast_hits_nearest_occluder() {
        let mut world = world_with_wall();
        let near = world
            .add_box(Aabb::new(Vec3::new(-1.0, 0.0, 2.0), Vec3::new(1.0, 3.0, 2.5)), CollisionLayers::WALL)
            .unwrap();
        let hit = world.raycast(Vec3::new(0.0, 1.6, 0.0), Vec3::Z, 20.0).unwrap();
        assert_eq!(hit.collider, near);
        assert_abs_diff_eq!(hit.distance, 2.0, epsilon = 1e-5);
    }

    #[test]
    fn test_raycast_respects_max_distance() {
        let world = world_with_wall();
        assert!(world.raycast(Vec3::new(0.0, 1.6, 0.0), Vec3::Z, 4.0).is_none());
    }

    #[test]
    fn test_line_of_sight_ignores_solid_only_boxes() {
        let mut world = CollisionWorld::new(PhysicsConfig::default());
        world
            .add_box(Aabb::on_ground(0.0, 3.0, 2.0, 1.0, 3.0), CollisionLayers::SOLID)
            .unwrap();
        let eye = Vec3::new(0.0, 1.6, 0.0);
        assert!(!world.is_occluded(eye, Vec3::new(0.0, 1.6, 8.0)));
    }

    #[test]
    fn test_line_of_sight_blocked_by_wall() {
        let world = world_with_wall();
        let eye = Vec3::new(0.0, 1.6, 0.0);
        assert!(world.is_occluded(eye, Vec3::new(0.0, 1.6, 8.0)));
        assert!(!world.is_occluded(eye, Vec3::new(0.0, 1.6, 4.0)));
    }
}
