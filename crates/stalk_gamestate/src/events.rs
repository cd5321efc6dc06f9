//! Session events and per-tick output

use serde::{Deserialize, Serialize};
use stalk_ai::{PursuerEvent, StateKind};
use stalk_math::Vec3;
use std::fmt;

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionOutcome {
    /// The pursuer got the player
    Caught,
    /// The player reached the exit
    Escaped,
    /// The countdown ran out
    TimedOut,
}

impl SessionOutcome {
    /// Whether the player won
    pub fn is_victory(&self) -> bool {
        matches!(self, Self::Escaped)
    }
}

impl fmt::Display for SessionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Caught => write!(f, "caught"),
            Self::Escaped => write!(f, "escaped"),
            Self::TimedOut => write!(f, "timed out"),
        }
    }
}

/// Things a HUD or log wants to know about
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// Forwarded from the pursuer
    Pursuer(PursuerEvent),
    /// Player slipped into a hiding spot
    PlayerHid { spot: usize },
    /// Player left a hiding spot
    PlayerEmerged { spot: usize },
    /// A distraction landed; `heard` when it reached the pursuer
    DistractionThrown { target: Vec3, heard: bool },
    /// The session is over
    Ended(SessionOutcome),
}

/// Result of one session tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionTick {
    /// Pursuer detection strength this tick
    pub detection_level: f32,
    /// Pursuer state after the tick
    pub pursuer_state: StateKind,
    /// Countdown remaining (seconds)
    pub time_remaining: f32,
    /// Set once the session is over
    pub outcome: Option<SessionOutcome>,
    /// Everything that happened this tick, in order
    pub events: Vec<SessionEvent>,
}

impl SessionTick {
    /// Whether the session is over
    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Pursuer state changes this tick
    pub fn state_changes(&self) -> impl Iterator<Item = (StateKind, StateKind)> + '_ {
        self.events.iter().filter_map(|e| match e {
            SessionEvent::Pursuer(PursuerEvent::StateChanged(change)) => Some((change.from, change.to)),
            _ => None,
        })
    }
}
