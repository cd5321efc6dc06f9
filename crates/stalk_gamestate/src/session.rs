//! Play session
//!
//! Owns the level geometry, the player and the pursuer and advances them in
//! a fixed order each tick:
//!
//! ```text
//! input (hide / throw) -> player movement -> pursuer update -> outcome
//! ```
//!
//! Hiding is resolved here, upstream of perception: a hidden player is simply
//! not handed to the pursuer.

use crate::config::SessionConfig;
use crate::error::Result;
use crate::events::{SessionEvent, SessionOutcome, SessionTick};
use crate::level::Level;
use crate::player::{Player, PlayerInput};
use stalk_ai::{PerceptionInput, Pursuer};
use stalk_math::{Aabb, Vec3};
use stalk_physics::CollisionWorld;

/// A running level
#[derive(Debug, Clone)]
pub struct Session {
    level: Level,
    config: SessionConfig,
    world: CollisionWorld,
    exit: Aabb,
    player: Player,
    pursuer: Pursuer,
    time_remaining: f32,
    elapsed: f32,
    last_detection: f32,
    outcome: Option<SessionOutcome>,
}

impl Session {
    /// Validate the level and configuration and set everything at its spawn
    pub fn new(level: Level, config: SessionConfig) -> Result<Self> {
        config.validate()?;
        level.validate()?;

        let world = level.build_world(&config.physics)?;
        let pursuer = Pursuer::new(
            level.pursuer_spawn,
            level.pursuer_yaw,
            level.patrol(),
            config.pursuer.clone(),
        )?
        .with_ground_y(config.physics.ground_y);
        let player = Player::new(level.player_spawn, config.player_radius, level.distractions)
            .with_ground_y(config.physics.ground_y);

        log::info!(
            "Session started on '{}': {} colliders, {:.0}s on the clock, {} distractions",
            level.name,
            world.len(),
            level.time_limit,
            level.distractions
        );

        Ok(Self {
            exit: level.exit_bounds(),
            time_remaining: level.time_limit,
            elapsed: 0.0,
            last_detection: 0.0,
            outcome: None,
            world,
            player,
            pursuer,
            config,
            level,
        })
    }

    // ==================== Queries ====================

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn world(&self) -> &CollisionWorld {
        &self.world
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn pursuer(&self) -> &Pursuer {
        &self.pursuer
    }

    /// Countdown remaining (seconds)
    pub fn time_remaining(&self) -> f32 {
        self.time_remaining
    }

    /// Simulated time since the start (seconds)
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn outcome(&self) -> Option<SessionOutcome> {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    // ==================== Simulation ====================

    /// Advance the session by `dt` seconds.
    ///
    /// Once an outcome is reached further ticks change nothing and keep
    /// reporting it.
    pub fn tick(&mut self, dt: f32, input: &PlayerInput) -> SessionTick {
        if self.outcome.is_some() || !(dt > 0.0 && dt.is_finite()) {
            return self.snapshot(Vec::new());
        }

        let mut events = Vec::new();

        // Input
        if input.toggle_hide {
            self.toggle_hide(&mut events);
        }
        if let Some(target) = input.throw_at {
            self.throw_distraction(target, &mut events);
        }

        // Player
        self.player.apply_movement(input, &self.config, dt, &self.world);

        // Pursuer
        let perception = if self.player.is_hidden() {
            PerceptionInput::none()
        } else {
            PerceptionInput::player_at(self.player.position())
        };
        let pursuer_tick = self.pursuer.update(dt, &perception, &self.world);
        self.last_detection = pursuer_tick.detection_level;
        let caught = pursuer_tick.caught_player();
        events.extend(pursuer_tick.events.into_iter().map(SessionEvent::Pursuer));

        // Outcome
        self.elapsed += dt;
        self.time_remaining = (self.time_remaining - dt).max(0.0);

        let outcome = if caught {
            Some(SessionOutcome::Caught)
        } else if self.exit.contains_horizontal(self.player.position()) {
            Some(SessionOutcome::Escaped)
        } else if self.time_remaining <= 0.0 {
            Some(SessionOutcome::TimedOut)
        } else {
            None
        };

        if let Some(outcome) = outcome {
            log::info!("Session over after {:.2}s: {}", self.elapsed, outcome);
            self.outcome = Some(outcome);
            events.push(SessionEvent::Ended(outcome));
        }

        self.snapshot(events)
    }

    /// Put everyone back at their spawn with a full clock
    pub fn restart(&mut self) {
        self.player = Player::new(
            self.level.player_spawn,
            self.config.player_radius,
            self.level.distractions,
        )
        .with_ground_y(self.config.physics.ground_y);
        self.pursuer.reset(self.level.pursuer_spawn, self.level.pursuer_yaw);
        self.time_remaining = self.level.time_limit;
        self.elapsed = 0.0;
        self.last_detection = 0.0;
        self.outcome = None;
        log::info!("Session restarted on '{}'", self.level.name);
    }

    fn snapshot(&self, events: Vec<SessionEvent>) -> SessionTick {
        SessionTick {
            detection_level: self.last_detection,
            pursuer_state: self.pursuer.state_kind(),
            time_remaining: self.time_remaining,
            outcome: self.outcome,
            events,
        }
    }

    fn toggle_hide(&mut self, events: &mut Vec<SessionEvent>) {
        if let Some(spot) = self.player.emerge() {
            log::debug!("Player left hiding spot {}", spot);
            events.push(SessionEvent::PlayerEmerged { spot });
            return;
        }

        match self.level.hiding_spot_at(self.player.position()) {
            Some(spot) => {
                self.player.hide(spot);
                log::debug!("Player hid in spot {}", spot);
                events.push(SessionEvent::PlayerHid { spot });
            }
            None => log::debug!("Hide ignored: no hiding spot at {:?}", self.player.position()),
        }
    }

    fn throw_distraction(&mut self, target: Vec3, events: &mut Vec<SessionEvent>) {
        if !target.is_finite() {
            log::warn!("Ignoring distraction thrown at a non-finite point");
            return;
        }
        if !self.player.take_distraction() {
            log::debug!("No distractions left");
            return;
        }

        let target = target.with_y(self.config.physics.ground_y);
        let in_earshot =
            self.pursuer.position().horizontal_distance(target) <= self.config.noise_hearing_range;
        let heard = in_earshot && self.pursuer.investigate_noise(target);
        log::debug!(
            "Distraction landed at {:?} ({} left, heard: {})",
            target,
            self.player.distractions_left(),
            heard
        );
        events.push(SessionEvent::DistractionThrown { target, heard });
    }

    /// Pursuer state name for a HUD
    pub fn pursuer_state_name(&self) -> &'static str {
        self.pursuer.state_name()
    }
}
