//! World configuration: starting layout and every tunable of the simulation.
//!
//! Defaults reproduce the stock scene. A YAML file may override any subset
//! of fields; missing fields keep their defaults.

use std::path::Path;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::camera::{CameraRig, MAX_FOV_DEGREES, MIN_FOV_DEGREES};
use crate::patrol::{PatrolDirection, PatrolRoute};

/// Errors from loading or validating a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub start: Vec3,
    pub facing_degrees: f32,
    /// Units per second.
    pub speed: f32,
    pub half_extents: Vec2,
    pub scale: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            start: Vec3::ZERO,
            facing_degrees: 0.0,
            speed: 3.0,
            half_extents: Vec2::new(0.5, 0.4),
            scale: 0.15,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleConfig {
    pub position: Vec3,
    pub scale: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemConfig {
    pub position: Vec3,
    pub scale: f32,
    pub half_extents: Vec2,
    pub spin_degrees_per_second: f32,
}

impl Default for ItemConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(2.0, 0.0, -4.0),
            scale: 0.8,
            half_extents: Vec2::splat(0.6),
            spin_degrees_per_second: 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub start: Vec3,
    pub half_extents: Vec2,
    pub scale: f32,
    pub patrol: PatrolRoute,
    pub initial_direction: PatrolDirection,
    pub spin_degrees_per_second: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            start: Vec3::new(-6.0, 0.0, 2.0),
            half_extents: Vec2::splat(0.7),
            scale: 0.015,
            patrol: PatrolRoute {
                center_x: -6.0,
                amplitude: 3.0,
                speed: 1.0,
            },
            initial_direction: PatrolDirection::Positive,
            spin_degrees_per_second: 30.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub start: Vec3,
    pub fov_degrees: f32,
    pub rig: CameraRig,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            start: Vec3::new(0.0, 3.0, 6.0),
            fov_degrees: MAX_FOV_DEGREES,
            rig: CameraRig::default(),
        }
    }
}

/// Where drawables sit relative to their simulated positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawConfig {
    /// Offset for player, enemy and item meshes.
    pub actor_offset: Vec3,
    pub obstacle_offset: Vec3,
    pub ground_translation: Vec3,
    pub ground_scale: Vec3,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            actor_offset: Vec3::new(0.0, -1.0, 0.0),
            obstacle_offset: Vec3::new(0.0, -0.5, 0.0),
            ground_translation: Vec3::new(0.0, -1.3, 0.0),
            ground_scale: Vec3::new(20.0, 0.5, 20.0),
        }
    }
}

/// Bounds applied to the elapsed time of each tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Replaces zero, negative and non-finite deltas.
    pub min_frame_seconds: f32,
    /// Caps the delta after a pause or a stall.
    pub max_frame_seconds: f32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            min_frame_seconds: 1e-6,
            max_frame_seconds: 0.25,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub player: PlayerConfig,
    pub obstacles: Vec<ObstacleConfig>,
    /// Obstacle half-extent per unit of scale, on both axes.
    pub obstacle_extent: f32,
    pub item: ItemConfig,
    pub enemy: EnemyConfig,
    /// How far the enemy shoves the player on contact.
    pub knockback_distance: f32,
    pub camera: CameraConfig,
    pub draw: DrawConfig,
    pub timing: TimingConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            player: PlayerConfig::default(),
            obstacles: vec![
                ObstacleConfig {
                    position: Vec3::new(3.0, 0.0, -2.0),
                    scale: 1.2,
                },
                ObstacleConfig {
                    position: Vec3::new(-4.0, 0.0, -1.0),
                    scale: 1.6,
                },
                ObstacleConfig {
                    position: Vec3::new(0.0, 0.0, -6.0),
                    scale: 2.0,
                },
                ObstacleConfig {
                    position: Vec3::new(5.0, 0.0, 3.0),
                    scale: 1.5,
                },
            ],
            obstacle_extent: 1.0,
            item: ItemConfig::default(),
            enemy: EnemyConfig::default(),
            knockback_distance: 1.2,
            camera: CameraConfig::default(),
            draw: DrawConfig::default(),
            timing: TimingConfig::default(),
        }
    }
}

impl WorldConfig {
    /// Read and validate a YAML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_yaml(&text)?;
        tracing::debug!(
            path = %path.display(),
            obstacles = config.obstacles.len(),
            "loaded world config"
        );
        Ok(config)
    }

    /// Parse and validate YAML text.
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check every value the simulation relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let points = [
            ("player.start", self.player.start),
            ("enemy.start", self.enemy.start),
            ("item.position", self.item.position),
            ("camera.start", self.camera.start),
            ("draw.actor_offset", self.draw.actor_offset),
            ("draw.obstacle_offset", self.draw.obstacle_offset),
            ("draw.ground_translation", self.draw.ground_translation),
            ("draw.ground_scale", self.draw.ground_scale),
        ];
        for (name, point) in points {
            if !point.is_finite() {
                return Err(invalid(format!("{name} must be finite")));
            }
        }
        let scalars = [
            ("player.facing_degrees", self.player.facing_degrees),
            ("item.spin_degrees_per_second", self.item.spin_degrees_per_second),
            ("enemy.spin_degrees_per_second", self.enemy.spin_degrees_per_second),
            ("camera.rig.back_distance", self.camera.rig.back_distance),
            ("camera.rig.height", self.camera.rig.height),
        ];
        for (name, value) in scalars {
            if !value.is_finite() {
                return Err(invalid(format!("{name} must be finite")));
            }
        }
        let scales = [
            ("player.scale", self.player.scale),
            ("item.scale", self.item.scale),
            ("enemy.scale", self.enemy.scale),
        ];
        for (name, scale) in scales {
            if !positive(scale) {
                return Err(invalid(format!("{name} must be positive")));
            }
        }
        let boxes = [
            ("player.half_extents", self.player.half_extents),
            ("item.half_extents", self.item.half_extents),
            ("enemy.half_extents", self.enemy.half_extents),
        ];
        for (name, extents) in boxes {
            if !non_negative(extents.x) || !non_negative(extents.y) {
                return Err(invalid(format!("{name} must be finite and non-negative")));
            }
        }
        if !positive(self.player.speed) {
            return Err(invalid("player.speed must be positive"));
        }
        if !non_negative(self.obstacle_extent) {
            return Err(invalid("obstacle_extent must be non-negative"));
        }
        for (i, obstacle) in self.obstacles.iter().enumerate() {
            if !obstacle.position.is_finite() || !positive(obstacle.scale) {
                return Err(invalid(format!(
                    "obstacles[{i}] needs a finite position and positive scale"
                )));
            }
        }
        let patrol = &self.enemy.patrol;
        if !patrol.center_x.is_finite()
            || !non_negative(patrol.amplitude)
            || !non_negative(patrol.speed)
        {
            return Err(invalid(
                "enemy.patrol needs a finite center and non-negative amplitude and speed",
            ));
        }
        if !non_negative(self.knockback_distance) {
            return Err(invalid("knockback_distance must be non-negative"));
        }
        if !self.camera.rig.smoothing.is_valid() {
            return Err(invalid(
                "camera.rig.smoothing: per_frame must be in [0, 1], decay_rate non-negative",
            ));
        }
        if !(MIN_FOV_DEGREES..=MAX_FOV_DEGREES).contains(&self.camera.fov_degrees) {
            return Err(invalid(format!(
                "camera.fov_degrees must be in [{MIN_FOV_DEGREES}, {MAX_FOV_DEGREES}]"
            )));
        }
        let timing = &self.timing;
        if !positive(timing.min_frame_seconds)
            || !timing.max_frame_seconds.is_finite()
            || timing.max_frame_seconds < timing.min_frame_seconds
        {
            return Err(invalid(
                "timing needs 0 < min_frame_seconds <= max_frame_seconds",
            ));
        }
        Ok(())
    }
}

fn positive(v: f32) -> bool {
    v.is_finite() && v > 0.0
}

fn non_negative(v: f32) -> bool {
    v.is_finite() && v >= 0.0
}

fn invalid(msg: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(msg.into())
}
