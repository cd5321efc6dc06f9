//! Stalk AI - Pursuer Behaviour
//!
//! This crate provides the adversary that hunts the player.
//!
//! # Features
//!
//! - Vision cone with distance/angle falloff and occlusion
//! - Rolling suspicion history with trend detection
//! - Five-state behaviour machine (patrol, suspicious, chase, search, caught)
//! - Seeded spiral search patterns
//! - Noise investigation and forced transitions
//!
//! # Example
//!
//! ```ignore
//! use stalk_ai::prelude::*;
//! use stalk_physics::{CollisionWorld, PhysicsConfig};
//!
//! let world = CollisionWorld::new(PhysicsConfig::default());
//! let route = PatrolRoute::new(vec![Vec3::ground(0.0, 0.0), Vec3::ground(10.0, 0.0)]);
//! let mut pursuer = Pursuer::new(Vec3::ZERO, 0.0, route, PursuerConfig::default())?;
//!
//! let tick = pursuer.update(1.0 / 60.0, &PerceptionInput::player_at(Vec3::ground(0.0, 6.0)), &world);
//! assert_eq!(tick.state, StateKind::Suspicious);
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod patrol;
pub mod pursuer;
pub mod search;
pub mod state_machine;
pub mod suspicion;
pub mod vision;

pub mod prelude {
    pub use crate::config::PursuerConfig;
    pub use crate::error::{AiError, Result};
    pub use crate::events::{PursuerEvent, PursuerTick, StateChange};
    pub use crate::patrol::PatrolRoute;
    pub use crate::pursuer::{PerceptionInput, Pursuer};
    pub use crate::search::SearchPattern;
    pub use crate::state_machine::{PursuerState, StateKind};
    pub use crate::suspicion::{SuspicionSample, SuspicionTracker};
    pub use crate::vision::VisionCone;
    pub use stalk_math::Vec3;
}

pub use prelude::*;
