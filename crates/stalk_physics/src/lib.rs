//! # stalk_physics - Static Collision and Actor Movement
//!
//! Discrete collision against a fixed set of axis-aligned boxes, shared by
//! every moving actor in the simulation (player and pursuer).
//!
//! ```text
//!              ┌────────────────┐
//!              │ CollisionWorld │  registered static boxes
//!              └───────┬────────┘
//!          ┌───────────┼────────────┐
//!          ▼           ▼            ▼
//!   sphere_vs_boxes  resolve_     raycast / LineOfSight
//!   (push-out)       movement     (occluders only)
//!                    (slide)
//!                      ▲
//!              ┌───────┴────────┐
//!              │ KinematicBody  │  velocity blend + move request
//!              └────────────────┘
//! ```
//!
//! The resolver is intentionally discrete: a single step larger than an
//! obstacle can tunnel through it. Walking speeds and small actor radii keep
//! this out of reach in practice.
//!
//! # Example
//!
//! ```ignore
//! use stalk_physics::prelude::*;
//!
//! let mut world = CollisionWorld::new(PhysicsConfig::default());
//! world.add_box(Aabb::on_ground(0.0, 5.0, 10.0, 1.0, 3.0), CollisionLayers::WALL)?;
//!
//! let mut body = KinematicBody::new(Vec3::ZERO, 0.3);
//! body.move_towards(Vec3::ground(0.0, 10.0), 2.5, 1.0 / 60.0, &world);
//! ```

pub mod body;
pub mod collider;
pub mod config;
pub mod error;
pub mod layers;
pub mod query;
pub mod world;

pub mod prelude {
    //! Common imports for collision functionality
    pub use crate::body::KinematicBody;
    pub use crate::collider::{Collider, ColliderHandle};
    pub use crate::config::PhysicsConfig;
    pub use crate::error::{PhysicsError, Result};
    pub use crate::layers::CollisionLayers;
    pub use crate::query::{Contact, LineOfSight, RaycastHit};
    pub use crate::world::CollisionWorld;
    pub use stalk_math::prelude::*;
}

pub use prelude::*;
