//! Level description
//!
//! A level is plain data: boxes on the ground plane, a few marked areas and
//! spawn points. It is loaded from JSON and turned into a [`CollisionWorld`]
//! once per session; nothing in it changes while playing.

use crate::error::{GameStateError, Result};
use serde::{Deserialize, Serialize};
use stalk_ai::PatrolRoute;
use stalk_math::{Aabb, Vec3};
use stalk_physics::{CollisionLayers, CollisionWorld, PhysicsConfig};
use std::fs;
use std::path::Path;

/// A box standing on the floor, described by its footprint centre
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelBox {
    pub x: f32,
    pub z: f32,
    pub width: f32,
    pub depth: f32,
    pub height: f32,
    /// Overrides the default layers for the list the box appears in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layers: Option<CollisionLayers>,
}

impl LevelBox {
    /// Create a box with the list's default layers
    pub fn new(x: f32, z: f32, width: f32, depth: f32, height: f32) -> Self {
        Self {
            x,
            z,
            width,
            depth,
            height,
            layers: None,
        }
    }

    /// Force specific layers
    pub fn with_layers(mut self, layers: CollisionLayers) -> Self {
        self.layers = Some(layers);
        self
    }

    /// World-space bounds
    pub fn bounds(&self) -> Aabb {
        Aabb::on_ground(self.x, self.z, self.width, self.depth, self.height)
    }

    /// Layers, falling back to `default`
    pub fn layers_or(&self, default: CollisionLayers) -> CollisionLayers {
        self.layers.unwrap_or(default)
    }

    fn has_valid_size(&self) -> bool {
        [self.x, self.z, self.width, self.depth, self.height]
            .iter()
            .all(|v| v.is_finite())
            && self.width > 0.0
            && self.depth > 0.0
            && self.height > 0.0
    }
}

/// A spot the player can hide in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HidingSpot {
    pub position: Vec3,
    pub radius: f32,
}

impl HidingSpot {
    pub fn new(position: Vec3, radius: f32) -> Self {
        Self { position, radius }
    }

    /// Whether `point` is close enough to slip in
    pub fn contains(&self, point: Vec3) -> bool {
        self.position.horizontal_distance(point) <= self.radius
    }
}

/// A complete level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Full-height walls (block movement and sight unless overridden)
    #[serde(default)]
    pub walls: Vec<LevelBox>,
    /// Furniture (blocks movement only unless overridden)
    #[serde(default)]
    pub furniture: Vec<LevelBox>,
    #[serde(default)]
    pub hiding_spots: Vec<HidingSpot>,
    /// Reaching this area wins
    pub exit: LevelBox,
    pub player_spawn: Vec3,
    pub pursuer_spawn: Vec3,
    /// Initial pursuer facing (radians, 0 looks down +Z)
    #[serde(default)]
    pub pursuer_yaw: f32,
    #[serde(default)]
    pub patrol_route: Vec<Vec3>,
    /// Countdown in seconds
    pub time_limit: f32,
    /// Number of distractions the player can throw
    #[serde(default)]
    pub distractions: u32,
}

impl Level {
    /// Parse a level from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read, parse and validate a level file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let level = Self::from_json(&json)?;
        level.validate()?;
        log::info!("Loaded level '{}' from {}", level.name, path.display());
        Ok(level)
    }

    /// Check that the level is playable
    pub fn validate(&self) -> Result<()> {
        if !(self.time_limit > 0.0 && self.time_limit.is_finite()) {
            return Err(GameStateError::InvalidLevel(format!(
                "time_limit must be positive, got {}",
                self.time_limit
            )));
        }

        for (list, boxes) in [("walls", &self.walls), ("furniture", &self.furniture)] {
            if let Some(i) = boxes.iter().position(|b| !b.has_valid_size()) {
                return Err(GameStateError::InvalidLevel(format!("{}[{}] has a degenerate size", list, i)));
            }
        }
        if !self.exit.has_valid_size() {
            return Err(GameStateError::InvalidLevel("exit has a degenerate size".into()));
        }

        if let Some(i) = self.hiding_spots.iter().position(|s| !(s.radius > 0.0)) {
            return Err(GameStateError::InvalidLevel(format!(
                "hiding_spots[{}] needs a positive radius",
                i
            )));
        }

        for (who, spawn) in [("player_spawn", self.player_spawn), ("pursuer_spawn", self.pursuer_spawn)] {
            if !spawn.is_finite() {
                return Err(GameStateError::InvalidLevel(format!("{} is not finite", who)));
            }
            if self.solid_boxes().any(|b| b.contains_horizontal(spawn)) {
                return Err(GameStateError::InvalidLevel(format!("{} is inside solid geometry", who)));
            }
        }

        for (i, waypoint) in self.patrol_route.iter().enumerate() {
            if self.solid_boxes().any(|b| b.contains_horizontal(*waypoint)) {
                // Reachable neighbours still work; the pursuer just gets stuck there
                log::warn!("Level '{}': patrol waypoint {} is inside solid geometry", self.name, i);
            }
        }

        Ok(())
    }

    /// Register every wall and piece of furniture in a fresh collision world,
    /// standing on the configured floor
    pub fn build_world(&self, config: &PhysicsConfig) -> Result<CollisionWorld> {
        let mut world = CollisionWorld::new(config.clone());
        let floor = Vec3::new(0.0, config.ground_y, 0.0);
        for wall in &self.walls {
            world.add_box(wall.bounds().translated(floor), wall.layers_or(CollisionLayers::WALL))?;
        }
        for item in &self.furniture {
            world.add_box(item.bounds().translated(floor), item.layers_or(CollisionLayers::SOLID))?;
        }
        log::debug!(
            "Built collision world for '{}' with {} colliders",
            self.name,
            world.len()
        );
        Ok(world)
    }

    /// The pursuer's patrol route
    pub fn patrol(&self) -> PatrolRoute {
        PatrolRoute::new(self.patrol_route.clone())
    }

    /// Exit area bounds
    pub fn exit_bounds(&self) -> Aabb {
        self.exit.bounds()
    }

    /// Index of the hiding spot covering `point`, nearest first
    pub fn hiding_spot_at(&self, point: Vec3) -> Option<usize> {
        self.hiding_spots
            .iter()
            .enumerate()
            .filter(|(_, spot)| spot.contains(point))
            .min_by(|(_, a), (_, b)| {
                a.position
                    .horizontal_distance(point)
                    .total_cmp(&b.position.horizontal_distance(point))
            })
            .map(|(i, _)| i)
    }

    fn solid_boxes(&self) -> impl Iterator<Item = Aabb> + '_ {
        let walls = self
            .walls
            .iter()
            .filter(|b| b.layers_or(CollisionLayers::WALL).contains(CollisionLayers::SOLID));
        let furniture = self
            .furniture
            .iter()
            .filter(|b| b.layers_or(CollisionLayers::SOLID).contains(CollisionLayers::SOLID));
        walls.chain(furniture).map(LevelBox::bounds)
    }

    /// A small warehouse: two aisles split by a shelf wall with a gap in the
    /// middle. The player starts at the south end of the west aisle and the
    /// exit is at its north end.
    pub fn demo() -> Self {
        Self {
            name: "Warehouse".into(),
            walls: vec![
                // Outer shell, 20 x 30
                LevelBox::new(0.0, -15.0, 20.0, 0.5, 3.0),
                LevelBox::new(0.0, 15.0, 20.0, 0.5, 3.0),
                LevelBox::new(-10.0, 0.0, 0.5, 30.0, 3.0),
                LevelBox::new(10.0, 0.0, 0.5, 30.0, 3.0),
                // Shelving splitting the aisles, with a gap in the middle
                LevelBox::new(0.0, -7.5, 0.5, 11.0, 3.0),
                LevelBox::new(0.0, 7.5, 0.5, 11.0, 3.0),
            ],
            furniture: vec![
                LevelBox::new(-7.5, -4.0, 2.0, 1.0, 0.9),
                LevelBox::new(7.5, 4.0, 1.5, 1.5, 0.9),
            ],
            hiding_spots: vec![
                HidingSpot::new(Vec3::ground(-8.5, 1.0), 1.0),
                HidingSpot::new(Vec3::ground(8.5, -9.0), 1.0),
            ],
            exit: LevelBox::new(-5.0, 13.5, 4.0, 2.0, 3.0),
            player_spawn: Vec3::ground(-5.0, -13.0),
            pursuer_spawn: Vec3::ground(5.0, 10.0),
            pursuer_yaw: std::f32::consts::PI,
            patrol_route: vec![
                Vec3::ground(5.0, 10.0),
                Vec3::ground(5.0, -10.0),
                Vec3::ground(5.0, 0.0),
                Vec3::ground(-4.0, 0.0),
                Vec3::ground(5.0, 0.0),
            ],
            time_limit: 90.0,
            distractions: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "walls": [ { "x": 0.0, "z": 5.0, "width": 10.0, "depth": 0.5, "height": 3.0 } ],
        "furniture": [ { "x": 3.0, "z": 0.0, "width": 1.0, "depth": 1.0, "height": 1.0, "layers": 3 } ],
        "exit": { "x": 0.0, "z": -8.0, "width": 2.0, "depth": 2.0, "height": 3.0 },
        "player_spawn": { "x": 0.0, "z": -5.0 },
        "pursuer_spawn": { "x": 0.0, "z": 2.0 },
        "patrol_route": [ { "x": -3.0, "z": 2.0 }, { "x": 3.0, "z": 2.0 } ],
        "time_limit": 60.0
    }"#;

    #[test]
    fn test_parse_minimal_level() {
        let level = Level::from_json(MINIMAL).unwrap();
        assert_eq!(level.walls.len(), 1);
        assert_eq!(level.player_spawn, Vec3::ground(0.0, -5.0));
        assert_eq!(level.distractions, 0);
        assert_eq!(level.pursuer_yaw, 0.0);
        assert_eq!(level.furniture[0].layers, Some(CollisionLayers::WALL));
        assert!(level.validate().is_ok());
    }

    #[test]
    fn test_build_world_applies_default_layers() {
        let mut level = Level::from_json(MINIMAL).unwrap();
        level.furniture[0].layers = None;
        let world = level.build_world(&PhysicsConfig::default()).unwrap();
        assert_eq!(world.len(), 2);
        let layers: Vec<_> = world.colliders().iter().map(|c| c.layers).collect();
        assert_eq!(layers, vec![CollisionLayers::WALL, CollisionLayers::SOLID]);
    }

    #[test]
    fn test_spawn_inside_wall_is_rejected() {
        let mut level = Level::from_json(MINIMAL).unwrap();
        level.player_spawn = Vec3::ground(1.0, 5.0);
        let err = level.validate().unwrap_err();
        assert!(err.to_string().contains("player_spawn"));
    }

    #[test]
    fn test_spawn_inside_non_solid_box_is_fine() {
        let mut level = Level::from_json(MINIMAL).unwrap();
        level.furniture[0].layers = Some(CollisionLayers::OCCLUDER);
        level.pursuer_spawn = Vec3::ground(3.0, 0.0);
        assert!(level.validate().is_ok());
    }

    #[test]
    fn test_non_positive_time_limit_is_rejected() {
        let mut level = Level::from_json(MINIMAL).unwrap();
        level.time_limit = 0.0;
        assert!(matches!(level.validate(), Err(GameStateError::InvalidLevel(_))));
    }

    #[test]
    fn test_degenerate_box_is_rejected() {
        let mut level = Level::from_json(MINIMAL).unwrap();
        level.walls[0].height = 0.0;
        assert!(level.validate().is_err());
    }

    #[test]
    fn test_malformed_json_is_a_parse_error() {
        assert!(matches!(Level::from_json("{ nope"), Err(GameStateError::Parse(_))));
    }

    #[test]
    fn test_hiding_spot_lookup_prefers_nearest() {
        let mut level = Level::demo();
        level.hiding_spots = vec![
            HidingSpot::new(Vec3::ground(0.0, 0.0), 2.0),
            HidingSpot::new(Vec3::ground(1.0, 0.0), 2.0),
        ];
        assert_eq!(level.hiding_spot_at(Vec3::ground(0.8, 0.0)), Some(1));
        assert_eq!(level.hiding_spot_at(Vec3::ground(-1.5, 0.0)), Some(0));
        assert_eq!(level.hiding_spot_at(Vec3::ground(9.0, 9.0)), None);
    }

    #[test]
    fn test_demo_level_is_valid_and_survives_json() {
        let level = Level::demo();
        assert!(level.validate().is_ok());
        let back = Level::from_json(&level.to_json().unwrap()).unwrap();
        assert_eq!(back, level);
    }

    #[test]
    fn test_load_from_disk() {
        let path = std::env::temp_dir().join("stalk_level_load_test.json");
        fs::write(&path, MINIMAL).unwrap();
        let level = Level::load(&path).unwrap();
        assert_eq!(level.time_limit, 60.0);
        let _ = fs::remove_file(&path); // Clean up
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("stalk_level_does_not_exist.json");
        assert!(matches!(Level::load(&path), Err(GameStateError::Io(_))));
    }
}
