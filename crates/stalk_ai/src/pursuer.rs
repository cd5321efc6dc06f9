//! The pursuer: perception, suspicion and movement wired into five states
//!
//! Every tick reads detection first, then lets the active state decide
//! whether to hand over to another state or keep moving. A transition
//! requested by a state is applied at the end of the same tick.

use crate::config::PursuerConfig;
use crate::error::Result;
use crate::events::{PursuerEvent, PursuerTick, StateChange};
use crate::patrol::PatrolRoute;
use crate::search::SearchPattern;
use crate::state_machine::*;
use crate::suspicion::SuspicionTracker;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use stalk_math::{consts::TAU, Vec3};
use stalk_physics::{CollisionWorld, KinematicBody};

/// What the pursuer is allowed to know about the player this tick
///
/// `player` is `None` when no player exists yet or the player is hidden;
/// hiding is resolved by whoever builds this input.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PerceptionInput {
    pub player: Option<Vec3>,
}

impl PerceptionInput {
    /// Player visible to the senses at `position`
    pub fn player_at(position: Vec3) -> Self {
        Self { player: Some(position) }
    }

    /// No player to perceive
    pub fn none() -> Self {
        Self { player: None }
    }
}

/// The adversary
#[derive(Debug, Clone)]
pub struct Pursuer {
    body: KinematicBody,
    config: PursuerConfig,
    state: PursuerState,
    previous: Option<StateKind>,
    speed: f32,
    last_known_player_position: Vec3,
    patrol: PatrolRoute,
    tracker: SuspicionTracker,
    rng: ChaCha8Rng,
    clock: f64,
    last_detection: f32,
    /// Events raised outside `update` (noise, forced transitions)
    pending: Vec<PursuerEvent>,
}

impl Pursuer {
    /// Create a patrolling pursuer
    pub fn new(spawn: Vec3, yaw: f32, patrol: PatrolRoute, config: PursuerConfig) -> Result<Self> {
        config.validate()?;

        let body = KinematicBody::new(spawn, config.radius).with_yaw(yaw);
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        let ground_y = body.ground_y;

        Ok(Self {
            last_known_player_position: body.position,
            speed: config.walk_speed,
            tracker: SuspicionTracker::new().with_ground_y(ground_y),
            body,
            config,
            state: PursuerState::Patrol,
            previous: None,
            patrol,
            rng,
            clock: 0.0,
            last_detection: 0.0,
            pending: Vec::new(),
        })
    }

    /// Stand on a floor other than `y = 0`
    pub fn with_ground_y(mut self, ground_y: f32) -> Self {
        self.body = self.body.with_ground_y(ground_y);
        self.tracker = self.tracker.with_ground_y(ground_y);
        self.last_known_player_position = self.last_known_player_position.with_y(ground_y);
        self
    }

    // ==================== Queries ====================

    /// Active state
    pub fn state(&self) -> &PursuerState {
        &self.state
    }

    /// Active state name for HUD/telemetry
    pub fn state_name(&self) -> &'static str {
        self.state.kind().name()
    }

    /// Active state kind
    pub fn state_kind(&self) -> StateKind {
        self.state.kind()
    }

    /// State before the last transition
    pub fn previous_state(&self) -> Option<StateKind> {
        self.previous
    }

    pub fn position(&self) -> Vec3 {
        self.body.position
    }

    pub fn yaw(&self) -> f32 {
        self.body.yaw
    }

    pub fn velocity(&self) -> Vec3 {
        self.body.velocity
    }

    /// Speed set by the active state
    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn config(&self) -> &PursuerConfig {
        &self.config
    }

    pub fn last_known_player_position(&self) -> Vec3 {
        self.last_known_player_position
    }

    /// Point being investigated while suspicious
    pub fn investigation_target(&self) -> Option<Vec3> {
        match &self.state {
            PursuerState::Suspicious(s) => Some(s.target),
            _ => None,
        }
    }

    /// Spiral being walked while searching
    pub fn search_pattern(&self) -> Option<&SearchPattern> {
        match &self.state {
            PursuerState::Search(s) => Some(&s.pattern),
            _ => None,
        }
    }

    pub fn suspicion(&self) -> &SuspicionTracker {
        &self.tracker
    }

    pub fn patrol_route(&self) -> &PatrolRoute {
        &self.patrol
    }

    /// Detection strength read on the last update
    pub fn detection_level(&self) -> f32 {
        self.last_detection
    }

    // ==================== External signals ====================

    /// A distraction made a noise at `position`.
    ///
    /// Starts a fresh search around the noise unless the pursuer is chasing
    /// or has already caught the player. Returns whether it was taken up.
    pub fn investigate_noise(&mut self, position: Vec3) -> bool {
        if !self.state.kind().accepts_noise() {
            log::debug!("Pursuer ignored noise at {:?} while {}", position, self.state_name());
            return false;
        }

        self.last_known_player_position = position.with_y(self.body.ground_y);
        self.pending.push(PursuerEvent::NoiseInvestigated { position });
        let mut events = std::mem::take(&mut self.pending);
        self.transition(StateKind::Search, &mut events);
        self.pending = events;
        true
    }

    /// Force a transition by state name.
    ///
    /// Unknown names are a programming error on the caller's side: they are
    /// logged and the pursuer stays where it is.
    pub fn request_transition(&mut self, name: &str) -> Result<()> {
        let to = match name.parse::<StateKind>() {
            Ok(kind) => kind,
            Err(err) => {
                log::warn!("Ignoring transition request from {}: {}", self.state_name(), err);
                return Err(err);
            }
        };

        let mut events = std::mem::take(&mut self.pending);
        self.transition(to, &mut events);
        self.pending = events;
        Ok(())
    }

    /// Put the pursuer back on its patrol at `spawn`, e.g. after a catch
    pub fn reset(&mut self, spawn: Vec3, yaw: f32) {
        self.body.set_position(spawn);
        self.body.yaw = yaw;
        self.patrol.restart();
        self.last_known_player_position = self.body.position;
        self.last_detection = 0.0;
        self.pending.clear();
        self.tracker.clear();
        self.previous = Some(self.state.kind());
        self.state = PursuerState::Patrol;
        self.speed = self.config.walk_speed;
    }

    // ==================== Simulation ====================

    /// Advance one tick.
    ///
    /// Detection is read before the active state does anything, so a strong
    /// sighting transitions on this very tick.
    pub fn update(&mut self, dt: f32, input: &PerceptionInput, world: &CollisionWorld) -> PursuerTick {
        let mut events = std::mem::take(&mut self.pending);

        if !(dt > 0.0 && dt.is_finite()) {
            return self.finish_tick(events);
        }
        self.clock += f64::from(dt);

        let player = input.player.filter(|p| p.is_finite());
        let detection = self.detect(player, world);
        self.last_detection = detection;
        if detection > 0.0 {
            if let Some(p) = player {
                self.last_known_player_position = p.with_y(self.body.ground_y);
            }
        }

        // The payload is taken out so handlers can borrow the rest of self
        let mut state = std::mem::replace(&mut self.state, PursuerState::Caught);
        let request = match &mut state {
            PursuerState::Patrol => self.execute_patrol(dt, detection, world),
            PursuerState::Suspicious(s) => self.execute_suspicious(s, dt, detection, player, world, &mut events),
            PursuerState::Chase(c) => self.execute_chase(c, dt, detection, player, world),
            PursuerState::Search(s) => self.execute_search(s, dt, detection, player, world, &mut events),
            PursuerState::Caught => None,
        };
        self.state = state;

        if let Some(to) = request {
            self.transition(to, &mut events);
        }

        self.finish_tick(events)
    }

    fn finish_tick(&self, events: Vec<PursuerEvent>) -> PursuerTick {
        let state_changed = events.iter().rev().find_map(|e| match e {
            PursuerEvent::StateChanged(change) => Some(*change),
            _ => None,
        });
        PursuerTick {
            detection_level: self.last_detection,
            state: self.state.kind(),
            state_changed,
            events,
        }
    }

    fn detect(&self, player: Option<Vec3>, world: &CollisionWorld) -> f32 {
        player.map_or(0.0, |p| {
            self.config
                .vision
                .detection_strength(self.body.position, self.body.yaw, p, world)
        })
    }

    // ==================== Transitions ====================

    fn transition(&mut self, to: StateKind, events: &mut Vec<PursuerEvent>) {
        let from = self.state.kind();

        // Exit: the old payload is dropped by the replacement below; only
        // the shared suspicion buffer needs explicit clearing.
        if matches!(from, StateKind::Suspicious | StateKind::Search) {
            self.tracker.clear();
        }

        self.previous = Some(from);
        self.state = self.enter(to, events);

        log::debug!(
            "Pursuer {} -> {} at {:?} (detection {:.2})",
            from,
            to,
            self.body.position,
            self.last_detection
        );
        events.push(PursuerEvent::StateChanged(StateChange { from, to }));
    }

    fn enter(&mut self, to: StateKind, events: &mut Vec<PursuerEvent>) -> PursuerState {
        let position = self.body.position;
        match to {
            StateKind::Patrol => {
                self.speed = self.config.walk_speed;
                self.tracker.clear();
                PursuerState::Patrol
            }
            StateKind::Suspicious => {
                self.speed = self.config.suspicious_speed();
                self.tracker.note_last_known(self.last_known_player_position);
                let target = self.tracker.estimate_investigation_target(
                    position,
                    self.tracker.current_level(),
                    self.last_known_player_position,
                );
                PursuerState::Suspicious(SuspiciousState {
                    timer: 0.0,
                    stuck_timer: 0.0,
                    target,
                    stuck_retries: 0,
                })
            }
            StateKind::Chase => {
                self.speed = self.config.chase_speed;
                PursuerState::Chase(ChaseState { timer: 0.0 })
            }
            StateKind::Search => {
                self.speed = self.config.search_speed();
                let last_known = self.last_known_player_position;
                self.tracker.note_last_known(last_known);
                let mut pattern = SearchPattern::generate(
                    last_known,
                    self.config.search_radius,
                    self.config.search_waypoints,
                    &mut self.rng,
                );
                pattern.start_nearest(position);
                PursuerState::Search(SearchState {
                    timer: 0.0,
                    stuck_timer: 0.0,
                    pattern,
                })
            }
            StateKind::Caught => {
                self.speed = 0.0;
                self.body.velocity = Vec3::ZERO;
                log::info!("Pursuer caught the player at {:?}", position);
                events.push(PursuerEvent::PlayerCaught { position });
                PursuerState::Caught
            }
        }
    }

    // ==================== State handlers ====================

    fn execute_patrol(&mut self, dt: f32, detection: f32, world: &CollisionWorld) -> Option<StateKind> {
        if detection > CHASE_THRESHOLD {
            return Some(StateKind::Chase);
        }
        if detection > SUSPICION_THRESHOLD {
            return Some(StateKind::Suspicious);
        }

        let Some(mut waypoint) = self.patrol.current() else {
            self.body.stop(dt, world);
            return None;
        };
        if self.body.position.horizontal_distance(waypoint) < ARRIVAL_DISTANCE {
            self.patrol.advance();
            waypoint = self.patrol.current_or(waypoint);
        }

        self.walk_to(waypoint, dt, world);
        None
    }

    fn execute_suspicious(
        &mut self,
        s: &mut SuspiciousState,
        dt: f32,
        detection: f32,
        player: Option<Vec3>,
        world: &CollisionWorld,
        events: &mut Vec<PursuerEvent>,
    ) -> Option<StateKind> {
        s.timer += dt;
        self.record_sample(detection, player);

        if detection > CHASE_THRESHOLD {
            return Some(StateKind::Chase);
        }
        if detection < CALM_THRESHOLD && s.timer > SUSPICION_CALM_TIME {
            return Some(StateKind::Patrol);
        }

        if self.tracker.is_increasing() {
            s.target = self.estimate_target();
            s.stuck_timer = 0.0;
        }

        // Retries are counted per suspicious episode and never refunded
        if self.body.position.horizontal_distance(s.target) > ARRIVAL_DISTANCE {
            let moved = self.walk_to(s.target, dt, world);
            if moved < STUCK_MOVE_EPSILON {
                s.stuck_timer += dt;
            } else {
                s.stuck_timer = 0.0;
            }

            if s.stuck_timer > SUSPICIOUS_STUCK_TIME {
                s.stuck_retries += 1;
                if s.stuck_retries > self.config.max_stuck_retries {
                    log::debug!("Pursuer gave up investigating after {} stuck retries", s.stuck_retries - 1);
                    return Some(StateKind::Patrol);
                }
                s.target = self.jittered(self.estimate_target());
                s.stuck_timer = 0.0;
                log::debug!("Pursuer stuck while suspicious, new target {:?}", s.target);
                events.push(PursuerEvent::StuckRecovered {
                    state: StateKind::Suspicious,
                    new_target: s.target,
                });
            }
        } else {
            // At the spot: look around
            self.body.stop(dt, world);
            self.body.rotate(self.config.scan_rate * dt);
        }

        if self.tracker.current_level() > ESCALATION_THRESHOLD {
            return Some(StateKind::Chase);
        }
        None
    }

    fn execute_chase(
        &mut self,
        c: &mut ChaseState,
        dt: f32,
        detection: f32,
        player: Option<Vec3>,
        world: &CollisionWorld,
    ) -> Option<StateKind> {
        c.timer += dt;

        if let Some(p) = player {
            if self.body.position.horizontal_distance(p) < CATCH_DISTANCE {
                return Some(StateKind::Caught);
            }
        }
        if detection < LOSE_THRESHOLD {
            return Some(StateKind::Search);
        }

        if let Some(p) = player {
            self.walk_to(p, dt, world);
        }
        None
    }

    fn execute_search(
        &mut self,
        s: &mut SearchState,
        dt: f32,
        detection: f32,
        player: Option<Vec3>,
        world: &CollisionWorld,
        events: &mut Vec<PursuerEvent>,
    ) -> Option<StateKind> {
        s.timer += dt;
        self.record_sample(detection, player);

        if detection > CHASE_THRESHOLD {
            return Some(StateKind::Chase);
        }
        if detection > SUSPICION_THRESHOLD {
            return Some(StateKind::Suspicious);
        }
        if s.timer >= SEARCH_GIVE_UP_TIME {
            return Some(StateKind::Patrol);
        }

        if self.tracker.is_increasing() {
            // Something is building up: head straight for it
            let target = self.estimate_target();
            self.walk_to(target, dt, world);
            s.stuck_timer = 0.0;
            return None;
        }

        let waypoint = s.pattern.current();
        if self.body.position.horizontal_distance(waypoint) < ARRIVAL_DISTANCE {
            s.pattern.advance();
            s.stuck_timer = 0.0;
            return None;
        }

        let moved = self.walk_to(waypoint, dt, world);
        if moved < STUCK_MOVE_EPSILON {
            s.stuck_timer += dt;
        } else {
            s.stuck_timer = 0.0;
        }

        if s.stuck_timer > SEARCH_STUCK_TIME {
            s.pattern.advance();
            s.stuck_timer = 0.0;
            log::debug!("Pursuer stuck while searching, skipping to waypoint {}", s.pattern.index());
            events.push(PursuerEvent::StuckRecovered {
                state: StateKind::Search,
                new_target: s.pattern.current(),
            });
        }
        None
    }

    // ==================== Helpers ====================

    /// Move and turn toward `target` at the state's speed; returns distance covered
    fn walk_to(&mut self, target: Vec3, dt: f32, world: &CollisionWorld) -> f32 {
        let moved = self.body.move_towards(target, self.speed, dt, world);
        self.body.face_towards(target, self.config.turn_rate, dt);
        moved
    }

    fn record_sample(&mut self, detection: f32, player: Option<Vec3>) {
        let seen = if detection > 0.0 { player } else { None };
        self.tracker.record_sample(detection, seen, self.body.position, self.clock);
        self.tracker.prune_expired(self.clock);
    }

    fn estimate_target(&self) -> Vec3 {
        self.tracker.estimate_investigation_target(
            self.body.position,
            self.tracker.current_level(),
            self.last_known_player_position,
        )
    }

    /// Random offset around `target` so a retry does not walk into the same wall
    fn jittered(&mut self, target: Vec3) -> Vec3 {
        let radius = self.config.stuck_jitter_radius;
        if radius <= 0.0 {
            return target;
        }
        let angle = self.rng.gen_range(0.0..TAU);
        let distance = self.rng.gen_range(0.0..=radius);
        Vec3::new(
            target.x + angle.cos() * distance,
            self.body.ground_y,
            target.z + angle.sin() * distance,
        )
    }
}
