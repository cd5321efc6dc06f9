//! Scripted player
//!
//! Stands in for a human at the keyboard so a level can be played headless.
//! The script is deliberately simple: walk to the exit, throw a distraction
//! behind the pursuer when it grows suspicious, and duck into a nearby
//! hiding spot when chased.

use crate::boot_config::Driver;
use stalk_ai::StateKind;
use stalk_gamestate::{PlayerInput, Session};
use stalk_math::Vec3;

/// Distance at which a waypoint counts as reached
const ARRIVAL_DISTANCE: f32 = 0.5;
/// Hiding spots further than this are not worth running for mid-chase
const HIDE_REACH: f32 = 4.0;
/// How far past the pursuer a decoy is thrown
const DECOY_DISTANCE: f32 = 6.0;

/// Produces one [`PlayerInput`] per tick
#[derive(Debug, Clone)]
pub struct Autopilot {
    driver: Driver,
    waypoints: Vec<Vec3>,
    index: usize,
    /// A decoy was thrown during the current alert
    decoy_thrown: bool,
}

impl Autopilot {
    /// Plan a straight run for the session's exit
    pub fn new(driver: Driver, session: &Session) -> Self {
        Self {
            driver,
            waypoints: vec![session.level().exit_bounds().center().with_y(0.0)],
            index: 0,
            decoy_thrown: false,
        }
    }

    /// Walk through `waypoints` before heading for the exit
    pub fn with_route(mut self, mut waypoints: Vec<Vec3>) -> Self {
        waypoints.extend(self.waypoints.last().copied());
        self.waypoints = waypoints;
        self.index = 0;
        self
    }

    /// Decide this tick's input from what is visible on the HUD
    pub fn next_input(&mut self, session: &Session) -> PlayerInput {
        if self.driver == Driver::Idle {
            return PlayerInput::idle();
        }

        let player = session.player();
        let position = player.position();
        let pursuer_state = session.pursuer().state_kind();

        if pursuer_state == StateKind::Patrol {
            self.decoy_thrown = false;
        }

        if player.is_hidden() {
            // Wait it out
            return if pursuer_state == StateKind::Patrol {
                PlayerInput::idle().with_toggle_hide()
            } else {
                PlayerInput::idle()
            };
        }

        if pursuer_state == StateKind::Chase {
            if let Some(spot) = self.nearest_hiding_spot(session, position) {
                if session.level().hiding_spot_at(position).is_some() {
                    return PlayerInput::idle().with_toggle_hide();
                }
                return PlayerInput::towards(position, spot).with_sprint();
            }
            return self.follow_route(position).with_sprint();
        }

        let mut input = self.follow_route(position);
        if pursuer_state == StateKind::Suspicious && !self.decoy_thrown && player.distractions_left() > 0 {
            let pursuer = session.pursuer().position();
            let away = (pursuer - position).horizontal().normalize_or_zero();
            if away != Vec3::ZERO {
                input = input.with_throw(pursuer + away * DECOY_DISTANCE);
                self.decoy_thrown = true;
                log::debug!("Autopilot throwing a decoy past the pursuer");
            }
        }
        input
    }

    fn follow_route(&mut self, position: Vec3) -> PlayerInput {
        while self.index + 1 < self.waypoints.len()
            && position.horizontal_distance(self.waypoints[self.index]) < ARRIVAL_DISTANCE
        {
            self.index += 1;
        }
        match self.waypoints.get(self.index) {
            Some(&target) => PlayerInput::towards(position, target),
            None => PlayerInput::idle(),
        }
    }

    fn nearest_hiding_spot(&self, session: &Session, position: Vec3) -> Option<Vec3> {
        session
            .level()
            .hiding_spots
            .iter()
            .map(|spot| spot.position)
            .filter(|p| p.horizontal_distance(position) <= HIDE_REACH)
            .min_by(|a, b| {
                a.horizontal_distance(position)
                    .total_cmp(&b.horizontal_distance(position))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stalk_gamestate::{Level, SessionConfig};

    fn demo_session() -> Session {
        Session::new(Level::demo(), SessionConfig::default()).unwrap()
    }

    #[test]
    fn test_heads_for_exit() {
        let session = demo_session();
        let mut pilot = Autopilot::new(Driver::Autopilot, &session);
        let input = pilot.next_input(&session);
        let exit = session.level().exit_bounds().center();
        let to_exit = (exit - session.player().position()).horizontal().normalize();
        let direction = input.direction().normalize();
        assert!(direction.dot(to_exit) > 0.99);
        assert!(!input.toggle_hide);
        assert!(input.throw_at.is_none());
    }

    #[test]
    fn test_idle_driver_does_nothing() {
        let session = demo_session();
        let mut pilot = Autopilot::new(Driver::Idle, &session);
        assert_eq!(pilot.next_input(&session), PlayerInput::idle());
    }

    #[test]
    fn test_route_is_walked_in_order() {
        let session = demo_session();
        let start = session.player().position();
        let mut pilot = Autopilot::new(Driver::Autopilot, &session)
            .with_route(vec![start, Vec3::ground(-8.0, -13.0)]);
        // First waypoint is where the player stands, so it is skipped
        let input = pilot.next_input(&session);
        assert!(input.direction().x < 0.0);
        assert_eq!(input.direction().z, 0.0);
    }

    #[test]
    fn test_autopilot_session_finishes() {
        let mut session = demo_session();
        let mut pilot = Autopilot::new(Driver::Autopilot, &session);
        let step = 1.0 / 30.0;
        for _ in 0..4000 {
            let input = pilot.next_input(&session);
            if session.tick(step, &input).is_over() {
                break;
            }
        }
        assert!(session.is_over());
    }
}
