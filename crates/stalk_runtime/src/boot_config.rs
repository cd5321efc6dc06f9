//! Boot Configuration
//!
//! Decides which level to play, how the player is driven and how the
//! simulation is stepped.
//!
//! # Configuration Sources (in priority order)
//!
//! 1. Environment variables: `STALK_LEVEL`, `STALK_SEED`, `STALK_DRIVER`
//! 2. Config file: first CLI argument, or `stalk.toml` in the working directory
//! 3. Built-in defaults (demo level, autopilot player)
//!
//! # Example Config File
//!
//! ```toml
//! level = "levels/warehouse.json"
//! seed = 7
//! driver = "autopilot"  # autopilot, idle
//! autopilot_route = [{ x = -8.0, z = 0.0 }]
//!
//! [simulation]
//! fixed_timestep = 0.016666668
//! report_interval = 5.0
//!
//! [session]
//! player_walk_speed = 3.0
//! noise_hearing_range = 15.0
//!
//! [session.pursuer]
//! chase_speed = 5.0
//! ```

use crate::error::{Result, RuntimeError};
use serde::{Deserialize, Serialize};
use stalk_gamestate::SessionConfig;
use stalk_math::Vec3;
use std::path::Path;

/// Default config file looked up when no path is given
pub const DEFAULT_CONFIG_PATH: &str = "stalk.toml";

/// How the player is driven
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Driver {
    /// Scripted player heading for the exit, hiding and throwing when pressed
    Autopilot,
    /// Player stands still at spawn
    Idle,
}

impl Default for Driver {
    fn default() -> Self {
        Self::Autopilot
    }
}

impl std::fmt::Display for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Autopilot => write!(f, "autopilot"),
            Self::Idle => write!(f, "idle"),
        }
    }
}

impl std::str::FromStr for Driver {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "autopilot" | "auto" | "bot" => Ok(Self::Autopilot),
            "idle" | "none" => Ok(Self::Idle),
            _ => Err(format!("Unknown driver: {}", s)),
        }
    }
}

/// Simulation stepping
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seconds per tick
    pub fixed_timestep: f32,
    /// Seconds of simulated time between status lines
    pub report_interval: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            fixed_timestep: 1.0 / 60.0,
            report_interval: 5.0,
        }
    }
}

/// Complete boot configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BootConfig {
    /// Level JSON to play; the built-in demo when unset
    pub level: Option<String>,
    /// Overrides the pursuer seed
    pub seed: Option<u64>,
    /// Player driver
    pub driver: Driver,
    /// Points the autopilot walks through before heading for the exit
    pub autopilot_route: Vec<Vec3>,
    /// Stepping
    pub simulation: SimulationConfig,
    /// Player, pursuer and physics tuning
    pub session: SessionConfig,
    /// Config file path (for reporting)
    #[serde(skip)]
    pub config_path: Option<String>,
}

impl Default for BootConfig {
    fn default() -> Self {
        Self {
            level: None,
            seed: None,
            driver: Driver::Autopilot,
            autopilot_route: Vec::new(),
            simulation: SimulationConfig::default(),
            session: SessionConfig::default(),
            config_path: None,
        }
    }
}

impl BootConfig {
    /// Load boot configuration from all sources.
    ///
    /// An explicitly named file must exist; the default `stalk.toml` is
    /// optional.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::load_from_file(DEFAULT_CONFIG_PATH)?,
            None => {
                log::info!("No {} found, using defaults", DEFAULT_CONFIG_PATH);
                Self::default()
            }
        };

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.finalize();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml(&content)?;
        config.config_path = Some(path.to_string());
        log::info!("Loaded boot config from {}", path);
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `STALK_*` overrides read through `lookup`
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(level) = lookup("STALK_LEVEL").filter(|v| !v.is_empty()) {
            log::info!("Level from env: {}", level);
            self.level = Some(level);
        }

        if let Some(seed) = lookup("STALK_SEED").filter(|v| !v.is_empty()) {
            let seed = seed
                .trim()
                .parse()
                .map_err(|_| RuntimeError::Config(format!("STALK_SEED is not a number: {}", seed)))?;
            self.seed = Some(seed);
        }

        if let Some(driver) = lookup("STALK_DRIVER").filter(|v| !v.is_empty()) {
            self.driver = driver.parse().map_err(RuntimeError::Config)?;
        }

        Ok(())
    }

    /// Push top-level overrides down into the session config
    pub fn finalize(&mut self) {
        if let Some(seed) = self.seed {
            self.session.pursuer.seed = seed;
        }
    }

    /// Reject configurations the loop cannot run
    pub fn validate(&self) -> Result<()> {
        let step = self.simulation.fixed_timestep;
        if !(step > 0.0 && step <= 0.25) {
            return Err(RuntimeError::Config(format!(
                "fixed_timestep must be in (0, 0.25], got {}",
                step
            )));
        }
        if !(self.simulation.report_interval > 0.0) {
            return Err(RuntimeError::Config(format!(
                "report_interval must be positive, got {}",
                self.simulation.report_interval
            )));
        }
        self.session.validate()?;
        Ok(())
    }

    /// Print configuration summary
    pub fn print_summary(&self) {
        log::info!("Boot Configuration:");
        log::info!("  Level: {}", self.level.as_deref().unwrap_or("<built-in demo>"));
        log::info!("  Driver: {}", self.driver);
        log::info!("  Seed: {:#x}", self.session.pursuer.seed);
        log::info!(
            "  Timestep: {:.4}s, report every {:.1}s",
            self.simulation.fixed_timestep,
            self.simulation.report_interval
        );
        if let Some(path) = &self.config_path {
            log::info!("  Config: {}", path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_driver_parse() {
        assert_eq!("autopilot".parse::<Driver>().unwrap(), Driver::Autopilot);
        assert_eq!("IDLE".parse::<Driver>().unwrap(), Driver::Idle);
        assert!("teleport".parse::<Driver>().is_err());
    }

    #[test]
    fn test_driver_display() {
        assert_eq!(Driver::Autopilot.to_string(), "autopilot");
        assert_eq!(Driver::Idle.to_string(), "idle");
    }

    #[test]
    fn test_default_config() {
        let config = BootConfig::default();
        assert_eq!(config.driver, Driver::Autopilot);
        assert!(config.level.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_toml() {
        let config = BootConfig::from_toml(
            r#"
            level = "levels/a.json"
            seed = 7
            driver = "idle"
            autopilot_route = [{ x = -8.0, z = 1.0 }]

            [simulation]
            fixed_timestep = 0.02

            [session.pursuer]
            chase_speed = 6.0
            "#,
        )
        .unwrap();
        assert_eq!(config.level.as_deref(), Some("levels/a.json"));
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.driver, Driver::Idle);
        assert_eq!(config.autopilot_route, vec![Vec3::ground(-8.0, 1.0)]);
        assert_eq!(config.simulation.fixed_timestep, 0.02);
        assert_eq!(config.simulation.report_interval, 5.0);
        assert_eq!(config.session.pursuer.chase_speed, 6.0);
        assert_eq!(config.session.pursuer.walk_speed, 2.5);
    }

    #[test]
    fn test_bad_toml_is_an_error() {
        assert!(matches!(BootConfig::from_toml("driver = 3"), Err(RuntimeError::Toml(_))));
    }

    #[test]
    fn test_env_overrides_and_seed_propagation() {
        let mut config = BootConfig::default();
        config
            .apply_env_overrides(env(&[("STALK_LEVEL", "x.json"), ("STALK_SEED", "99"), ("STALK_DRIVER", "idle")]))
            .unwrap();
        config.finalize();
        assert_eq!(config.level.as_deref(), Some("x.json"));
        assert_eq!(config.driver, Driver::Idle);
        assert_eq!(config.session.pursuer.seed, 99);
    }

    #[test]
    fn test_bad_seed_is_rejected() {
        let mut config = BootConfig::default();
        let result = config.apply_env_overrides(env(&[("STALK_SEED", "lots")]));
        assert!(matches!(result, Err(RuntimeError::Config(_))));
    }

    #[test]
    fn test_timestep_bounds() {
        let mut config = BootConfig::default();
        config.simulation.fixed_timestep = 0.0;
        assert!(config.validate().is_err());
        config.simulation.fixed_timestep = 0.5;
        assert!(config.validate().is_err());
    }
}
