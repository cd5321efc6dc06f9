//! Stalk GameState - Levels and Play Sessions
//!
//! This crate turns the pursuer into a playable round.
//!
//! # Features
//!
//! - JSON level description (walls, furniture, hiding spots, exit, patrol)
//! - Player movement, hiding and distractions
//! - Session loop with countdown and outcomes
//!
//! # Example
//!
//! ```ignore
//! use stalk_gamestate::prelude::*;
//!
//! let mut session = Session::new(Level::demo(), SessionConfig::default())?;
//! let tick = session.tick(1.0 / 60.0, &PlayerInput::moving(0.0, 1.0));
//! if let Some(outcome) = tick.outcome {
//!     println!("{}", outcome);
//! }
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod level;
pub mod player;
pub mod session;

pub mod prelude {
    pub use crate::config::SessionConfig;
    pub use crate::error::{GameStateError, Result};
    pub use crate::events::{SessionEvent, SessionOutcome, SessionTick};
    pub use crate::level::{HidingSpot, Level, LevelBox};
    pub use crate::player::{Player, PlayerInput};
    pub use crate::session::Session;
}

pub use prelude::*;
