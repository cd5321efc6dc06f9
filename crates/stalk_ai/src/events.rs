//! Per-tick output of the pursuer
//!
//! The pursuer never calls into HUD, audio or game-over code. Everything
//! the surrounding application needs is returned from `update`.

use crate::state_machine::StateKind;
use serde::{Deserialize, Serialize};
use stalk_math::Vec3;

/// A state transition that happened this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateChange {
    pub from: StateKind,
    pub to: StateKind,
}

/// Notable things the pursuer did
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PursuerEvent {
    /// Behaviour state changed
    StateChanged(StateChange),
    /// Entered CAUGHT; fired exactly once per catch
    PlayerCaught {
        /// Pursuer position at the catch
        position: Vec3,
    },
    /// A noise pulled the pursuer into a search
    NoiseInvestigated {
        position: Vec3,
    },
    /// Movement stalled and a new target or waypoint was chosen
    StuckRecovered {
        state: StateKind,
        new_target: Vec3,
    },
}

/// Result of one pursuer update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PursuerTick {
    /// Detection strength read this tick, for detection meters
    pub detection_level: f32,
    /// State after the tick
    pub state: StateKind,
    /// The last transition that happened during the tick, if any
    pub state_changed: Option<StateChange>,
    /// Everything that happened, in order
    pub events: Vec<PursuerEvent>,
}

impl PursuerTick {
    /// Whether the player was caught during this tick
    pub fn caught_player(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, PursuerEvent::PlayerCaught { .. }))
    }
}
