//! Stalk Runtime
//!
//! Plays a level headless: loads the boot config and level, drives the
//! player with the autopilot at a fixed timestep and reports how the round
//! went.
//!
//! Run with: cargo run --bin stalk [config.toml]
//!
//! Exit status: 0 escaped, 1 caught, 2 timed out, 3 failed to start.

mod autopilot;
mod boot_config;
mod error;

use autopilot::Autopilot;
use boot_config::BootConfig;
use error::Result;
use stalk_ai::PursuerEvent;
use stalk_gamestate::{Level, Session, SessionEvent, SessionOutcome, SessionTick};
use std::process::ExitCode;

fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();

    let config_path = std::env::args().nth(1);
    match run(config_path.as_deref()) {
        Ok(SessionOutcome::Escaped) => ExitCode::SUCCESS,
        Ok(SessionOutcome::Caught) => ExitCode::from(1),
        Ok(SessionOutcome::TimedOut) => ExitCode::from(2),
        Err(e) => {
            log::error!("Failed to run session: {}", e);
            ExitCode::from(3)
        }
    }
}

fn run(config_path: Option<&str>) -> Result<SessionOutcome> {
    let config = BootConfig::load(config_path)?;
    config.print_summary();

    let level = match &config.level {
        Some(path) => Level::load(path)?,
        None => Level::demo(),
    };

    let mut session = Session::new(level, config.session.clone())?;
    let mut pilot = Autopilot::new(config.driver, &session).with_route(config.autopilot_route.clone());

    let step = config.simulation.fixed_timestep;
    let mut next_report = config.simulation.report_interval;

    loop {
        let input = pilot.next_input(&session);
        let tick = session.tick(step, &input);
        log_events(&session, &tick);

        if let Some(outcome) = tick.outcome {
            report(&session, outcome);
            return Ok(outcome);
        }

        if session.elapsed() >= next_report {
            next_report += config.simulation.report_interval;
            log::info!(
                "[{:6.2}s] pursuer {} at {:?}, detection {:.2}, {:.1}s left",
                session.elapsed(),
                session.pursuer_state_name(),
                session.pursuer().position(),
                tick.detection_level,
                tick.time_remaining
            );
        }
    }
}

fn log_events(session: &Session, tick: &SessionTick) {
    let t = session.elapsed();
    for event in &tick.events {
        match event {
            SessionEvent::Pursuer(PursuerEvent::StateChanged(change)) => {
                log::info!("[{:6.2}s] pursuer {} -> {}", t, change.from, change.to);
            }
            SessionEvent::Pursuer(PursuerEvent::NoiseInvestigated { position }) => {
                log::info!("[{:6.2}s] pursuer heads for the noise at {:?}", t, position);
            }
            SessionEvent::Pursuer(PursuerEvent::StuckRecovered { state, new_target }) => {
                log::debug!("[{:6.2}s] pursuer unstuck in {}, now heading to {:?}", t, state, new_target);
            }
            SessionEvent::Pursuer(PursuerEvent::PlayerCaught { position }) => {
                log::info!("[{:6.2}s] player caught at {:?}", t, position);
            }
            SessionEvent::PlayerHid { spot } => log::info!("[{:6.2}s] player hides (spot {})", t, spot),
            SessionEvent::PlayerEmerged { spot } => log::info!("[{:6.2}s] player leaves spot {}", t, spot),
            SessionEvent::DistractionThrown { target, heard } => {
                log::info!("[{:6.2}s] distraction thrown at {:?} (heard: {})", t, target, heard);
            }
            SessionEvent::Ended(_) => {}
        }
    }
}

fn report(session: &Session, outcome: SessionOutcome) {
    let player = session.player();
    log::info!("=== {} ===", outcome.to_string().to_uppercase());
    log::info!("  Level: {}", session.level().name);
    log::info!("  Time: {:.2}s ({:.2}s left)", session.elapsed(), session.time_remaining());
    log::info!("  Player at {:?}, {} distractions unused", player.position(), player.distractions_left());
    log::info!(
        "  Pursuer ended in {} (previously {})",
        session.pursuer_state_name(),
        session
            .pursuer()
            .previous_state()
            .map_or("-", |s| s.name())
    );
}
