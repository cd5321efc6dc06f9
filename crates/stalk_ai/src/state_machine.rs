//! Pursuer behaviour states
//!
//! Each state carries exactly the data it owns. Leaving a state drops its
//! payload, so timers and plans cannot leak into the next state.

use crate::error::AiError;
use crate::search::SearchPattern;
use serde::{Deserialize, Serialize};
use stalk_math::Vec3;
use std::fmt;
use std::str::FromStr;

/// Detection above this starts (or keeps) a chase
pub const CHASE_THRESHOLD: f32 = 0.9;
/// Detection above this makes a patrolling or searching pursuer suspicious
pub const SUSPICION_THRESHOLD: f32 = 0.3;
/// Suspicion level above this escalates a suspicious pursuer to a chase
pub const ESCALATION_THRESHOLD: f32 = 0.8;
/// Detection below this counts as "nothing there" while suspicious
pub const CALM_THRESHOLD: f32 = 0.05;
/// Detection below this loses a chase
pub const LOSE_THRESHOLD: f32 = 0.1;
/// Time a suspicious pursuer must spend before calming down (seconds)
pub const SUSPICION_CALM_TIME: f32 = 2.0;
/// Total time spent searching before giving up (seconds)
pub const SEARCH_GIVE_UP_TIME: f32 = 6.0;
/// Horizontal distance at which the player is caught
pub const CATCH_DISTANCE: f32 = 1.5;
/// Horizontal distance at which a waypoint or target counts as reached
pub const ARRIVAL_DISTANCE: f32 = 0.5;
/// Movement per tick below this counts toward being stuck
pub const STUCK_MOVE_EPSILON: f32 = 0.01;
/// Stuck time before a suspicious pursuer picks a new target (seconds)
pub const SUSPICIOUS_STUCK_TIME: f32 = 1.5;
/// Stuck time before a searching pursuer skips a waypoint (seconds)
pub const SEARCH_STUCK_TIME: f32 = 2.0;

/// Name-only view of a state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateKind {
    Patrol,
    Suspicious,
    Chase,
    Search,
    Caught,
}

impl StateKind {
    /// Upper-case display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Patrol => "PATROL",
            Self::Suspicious => "SUSPICIOUS",
            Self::Chase => "CHASE",
            Self::Search => "SEARCH",
            Self::Caught => "CAUGHT",
        }
    }

    /// Whether a noise can pull the pursuer into a search from this state
    pub fn accepts_noise(&self) -> bool {
        !matches!(self, Self::Chase | Self::Caught)
    }

    /// Whether this state is final until an external reset
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Caught)
    }
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StateKind {
    type Err = AiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PATROL" => Ok(Self::Patrol),
            "SUSPICIOUS" => Ok(Self::Suspicious),
            "CHASE" => Ok(Self::Chase),
            "SEARCH" => Ok(Self::Search),
            "CAUGHT" => Ok(Self::Caught),
            _ => Err(AiError::UnknownState(s.to_string())),
        }
    }
}

/// Data owned by the SUSPICIOUS state
#[derive(Debug, Clone, PartialEq)]
pub struct SuspiciousState {
    /// Time spent suspicious
    pub timer: f32,
    /// Accumulated time without measurable progress
    pub stuck_timer: f32,
    /// Point being investigated
    pub target: Vec3,
    /// Stuck recoveries so far this episode; never refunded
    pub stuck_retries: u32,
}

/// Data owned by the CHASE state
#[derive(Debug, Clone, PartialEq)]
pub struct ChaseState {
    /// Time spent chasing
    pub timer: f32,
}

/// Data owned by the SEARCH state
#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    /// Time spent searching
    pub timer: f32,
    /// Accumulated time without measurable progress
    pub stuck_timer: f32,
    /// Spiral around the last known player position
    pub pattern: SearchPattern,
}

/// Active behaviour state with its owned data
#[derive(Debug, Clone, PartialEq)]
pub enum PursuerState {
    Patrol,
    Suspicious(SuspiciousState),
    Chase(ChaseState),
    Search(SearchState),
    Caught,
}

impl PursuerState {
    /// Name-only view
    pub fn kind(&self) -> StateKind {
        match self {
            Self::Patrol => StateKind::Patrol,
            Self::Suspicious(_) => StateKind::Suspicious,
            Self::Chase(_) => StateKind::Chase,
            Self::Search(_) => StateKind::Search,
            Self::Caught => StateKind::Caught,
        }
    }

    /// Time spent in the current state, for states that track it
    pub fn timer(&self) -> Option<f32> {
        match self {
            Self::Suspicious(s) => Some(s.timer),
            Self::Chase(c) => Some(c.timer),
            Self::Search(s) => Some(s.timer),
            Self::Patrol | Self::Caught => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_state_names() {
        assert_eq!("chase".parse::<StateKind>().unwrap(), StateKind::Chase);
        assert_eq!(" SEARCH ".parse::<StateKind>().unwrap(), StateKind::Search);
        assert!(matches!("sleep".parse::<StateKind>(), Err(AiError::UnknownState(_))));
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for kind in [
            StateKind::Patrol,
            StateKind::Suspicious,
            StateKind::Chase,
            StateKind::Search,
            StateKind::Caught,
        ] {
            assert_eq!(kind.to_string().parse::<StateKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_noise_priority() {
        assert!(StateKind::Patrol.accepts_noise());
        assert!(StateKind::Search.accepts_noise());
        assert!(!StateKind::Chase.accepts_noise());
        assert!(!StateKind::Caught.accepts_noise());
    }

    #[test]
    fn test_timer_only_on_timed_states() {
        assert_eq!(PursuerState::Patrol.timer(), None);
        assert_eq!(PursuerState::Chase(ChaseState { timer: 1.25 }).timer(), Some(1.25));
    }
}
