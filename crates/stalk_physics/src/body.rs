//! Kinematic actor body shared by the player and the pursuer

use crate::world::CollisionWorld;
use serde::{Deserialize, Serialize};
use stalk_math::{lerp_angle, wrap_angle, yaw_towards, Vec3};

/// A ground-bound circular actor moved by velocity requests
///
/// The body never owns collision geometry: every move is a request that the
/// [`CollisionWorld`] corrects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KinematicBody {
    /// World position; `y` always equals `ground_y`
    pub position: Vec3,
    /// Ground-plane velocity
    pub velocity: Vec3,
    /// Facing angle around +Y (0 faces +Z)
    pub yaw: f32,
    /// Collision sphere radius
    pub radius: f32,
    /// Floor height the body is pinned to
    pub ground_y: f32,
}

impl KinematicBody {
    /// Create a body standing at `position` on the default floor
    pub fn new(position: Vec3, radius: f32) -> Self {
        Self {
            position: position.with_y(0.0),
            velocity: Vec3::ZERO,
            yaw: 0.0,
            radius,
            ground_y: 0.0,
        }
    }

    /// Set the initial facing
    pub fn with_yaw(mut self, yaw: f32) -> Self {
        self.yaw = wrap_angle(yaw);
        self
    }

    /// Pin to a different floor height
    pub fn with_ground_y(mut self, ground_y: f32) -> Self {
        self.ground_y = ground_y;
        self.position.y = ground_y;
        self
    }

    /// Teleport, dropping any velocity
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position.with_y(self.ground_y);
        self.velocity = Vec3::ZERO;
    }

    /// Walk toward `target` at `speed`.
    ///
    /// Returns the distance actually covered this step, which is what stuck
    /// detection watches.
    pub fn move_towards(&mut self, target: Vec3, speed: f32, dt: f32, world: &CollisionWorld) -> f32 {
        let direction = (target - self.position).horizontal().normalize_or_zero();
        self.move_in_direction(direction, speed, dt, world)
    }

    /// Walk along `direction` (ground-plane, any length; normalized here)
    pub fn move_in_direction(&mut self, direction: Vec3, speed: f32, dt: f32, world: &CollisionWorld) -> f32 {
        if dt <= 0.0 {
            return 0.0;
        }

        let direction = direction.horizontal().normalize_or_zero();
        let desired_velocity = direction * speed;
        let blend = (world.config().velocity_blend_rate * dt).min(1.0);
        self.velocity = self.velocity.lerp(desired_velocity, blend).horizontal();

        let start = self.position;
        let desired = start + self.velocity * dt;
        let resolved = world.resolve_movement(start, desired, self.radius);

        // Stop pushing into whatever blocked us, per axis
        let epsilon = world.config().blocked_axis_epsilon;
        if axis_blocked(start.x, desired.x, resolved.x, epsilon) {
            self.velocity.x = 0.0;
        }
        if axis_blocked(start.z, desired.z, resolved.z, epsilon) {
            self.velocity.z = 0.0;
        }

        self.position = resolved.with_y(self.ground_y);
        start.horizontal_distance(self.position)
    }

    /// Turn toward `target` along the shortest arc; `turn_rate` is the blend
    /// factor per second
    pub fn face_towards(&mut self, target: Vec3, turn_rate: f32, dt: f32) {
        if self.position.horizontal_distance(target) <= f32::EPSILON {
            return;
        }
        let bearing = yaw_towards(self.position, target);
        self.yaw = lerp_angle(self.yaw, bearing, turn_rate * dt);
    }

    /// Rotate in place by `amount` radians
    pub fn rotate(&mut self, amount: f32) {
        self.yaw = wrap_angle(self.yaw + amount);
    }

    /// Let velocity decay to rest
    pub fn stop(&mut self, dt: f32, world: &CollisionWorld) {
        let blend = (world.config().velocity_blend_rate * dt).min(1.0);
        self.velocity = self.velocity.lerp(Vec3::ZERO, blend);
    }

    /// Ground-plane speed
    pub fn speed(&self) -> f32 {
        self.velocity.horizontal().length()
    }
}

/// An axis is blocked when the move wanted to change it but the resolved
/// position made no progress in that direction
fn axis_blocked(start: f32, desired: f32, resolved: f32, epsilon: f32) -> bool {
    let wanted = desired - start;
    if wanted.abs() <= epsilon {
        return false;
    }
    (resolved - start) * wanted.signum() <= epsilon
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PhysicsConfig;
    use crate::layers::CollisionLayers;
    use approx::assert_abs_diff_eq;
    use stalk_math::{consts::PI, Aabb};

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_velocity_blends_toward_target_speed() {
        let world = CollisionWorld::default();
        let mut body = KinematicBody::new(Vec3::ZERO, 0.3);

        body.move_towards(Vec3::ground(0.0, 100.0), 3.0, DT, &world);
        let first = body.speed();
        assert!(first > 0.0 && first < 3.0);

        for _ in 0..120 {
            body.move_towards(Vec3::ground(0.0, 100.0), 3.0, DT, &world);
        }
        assert_abs_diff_eq!(body.speed(), 3.0, epsilon = 1e-3);
        assert!(body.position.z > 0.0);
        assert_eq!(body.position.y, 0.0);
    }

    #[test]
    fn test_large_dt_blend_is_capped() {
        let world = CollisionWorld::default();
        let mut body = KinematicBody::new(Vec3::ZERO, 0.3);
        body.move_towards(Vec3::ground(10.0, 0.0), 2.0, 0.5, &world);
        assert_abs_diff_eq!(body.velocity.x, 2.0, epsilon = 1e-5);
    }

    #[test]
    fn test_blocked_axis_velocity_is_zeroed() {
        let mut world = CollisionWorld::new(PhysicsConfig::default());
        world
            .add_box(Aabb::new(Vec3::new(-10.0, 0.0, 1.0), Vec3::new(10.0, 3.0, 2.0)), CollisionLayers::WALL)
            .unwrap();
        let mut body = KinematicBody::new(Vec3::ground(0.0, 0.69), 0.3);

        // Diagonal into the wall: z is blocked, x keeps going
        for _ in 0..30 {
            body.move_in_direction(Vec3::new(1.0, 0.0, 1.0), 3.0, DT, &world);
        }
        assert_eq!(body.velocity.z, 0.0);
        assert!(body.velocity.x > 0.0);
        assert!(body.position.x > 0.1);
        assert!(body.position.z <= 0.7 + 1e-4);
    }

    #[test]
    fn test_arrived_body_comes_to_rest() {
        let world = CollisionWorld::default();
        let mut body = KinematicBody::new(Vec3::ZERO, 0.3);
        for _ in 0..120 {
            body.move_towards(Vec3::ZERO, 3.0, DT, &world);
        }
        assert_abs_diff_eq!(body.speed(), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_face_towards_converges() {
        let mut body = KinematicBody::new(Vec3::ZERO, 0.3);
        for _ in 0..300 {
            body.face_towards(Vec3::ground(5.0, 0.0), 8.0, DT);
        }
        assert_abs_diff_eq!(body.yaw, PI / 2.0, epsilon = 1e-3);
    }

    #[test]
    fn test_rotate_wraps() {
        let mut body = KinematicBody::new(Vec3::ZERO, 0.3).with_yaw(PI - 0.1);
        body.rotate(0.2);
        assert!(body.yaw < 0.0);
    }
}
