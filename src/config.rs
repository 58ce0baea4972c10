//! Game balance and screen configuration
//!
//! Defaults reproduce the shipped tuning. A JSON file can override any subset
//! of fields; missing fields fall back to the defaults.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Rect;
use crate::consts::*;

/// Errors loading or validating a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Tuning values for one play session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Visible viewport size in points (camera is centred on the player)
    pub screen_size: Vec2,
    /// Seed for the simulation RNG (None = caller picks one)
    pub seed: Option<u64>,

    pub player_radius: f32,

    pub enemy_radius: f32,
    pub enemy_speed: f32,
    pub enemy_count: usize,
    pub enemy_fire_interval: f32,

    pub player_bullet_speed: f32,
    pub player_bullet_radius: f32,
    pub enemy_bullet_speed: f32,
    pub enemy_bullet_radius: f32,
    pub bullet_lifetime: f32,

    pub star_count: usize,

    /// Attraction field strength (acceleration * distance²)
    pub field_strength: f32,
    pub field_min_radius: f32,

    /// Pause control hit region, screen space, origin bottom-left.
    /// None places it in the top-right corner.
    pub pause_control: Option<Rect>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            // iPhone 8 logical resolution
            screen_size: Vec2::new(375.0, 667.0),
            seed: None,

            player_radius: PLAYER_RADIUS,

            enemy_radius: ENEMY_RADIUS,
            enemy_speed: ENEMY_SPEED,
            enemy_count: ENEMY_COUNT,
            enemy_fire_interval: ENEMY_FIRE_INTERVAL,

            player_bullet_speed: PLAYER_BULLET_SPEED,
            player_bullet_radius: PLAYER_BULLET_RADIUS,
            enemy_bullet_speed: ENEMY_BULLET_SPEED,
            enemy_bullet_radius: ENEMY_BULLET_RADIUS,
            bullet_lifetime: BULLET_LIFETIME,

            star_count: STAR_COUNT,

            field_strength: FIELD_STRENGTH,
            field_min_radius: FIELD_MIN_RADIUS,

            pause_control: None,
        }
    }
}

impl GameConfig {
    /// Default tuning for a given screen size
    pub fn for_screen(width: f32, height: f32) -> Self {
        Self {
            screen_size: Vec2::new(width, height),
            ..Self::default()
        }
    }

    /// Distance from the player beyond which entities are reaped.
    /// The circle encloses the viewport at any corner.
    pub fn max_distance_from_player(&self) -> f32 {
        MAX_DISTANCE_FACTOR * self.screen_size.x.max(self.screen_size.y)
    }

    /// Farthest an edge-spawned enemy can start from the player (a spawn at
    /// the end of an edge, `2 * enemy_radius` outside it)
    pub fn max_spawn_distance(&self) -> f32 {
        let half = self.screen_size * 0.5;
        let margin = 2.0 * self.enemy_radius;
        let side = Vec2::new(half.x + margin, half.y).length();
        let top = Vec2::new(half.x, half.y + margin).length();
        side.max(top)
    }

    /// True when some edge spawns fall beyond the boundary radius. Those
    /// enemies are reaped and replaced on their first tick without ever
    /// being seen; the count stays constant but the slot churns.
    pub fn spawns_outside_boundary(&self) -> bool {
        self.max_spawn_distance() > self.max_distance_from_player()
    }

    /// Pause control region (explicit, or a square in the top-right corner)
    pub fn pause_region(&self) -> Rect {
        self.pause_control.unwrap_or_else(|| {
            let side = 0.12 * self.screen_size.x;
            Rect::new(self.screen_size - Vec2::splat(side), self.screen_size)
        })
    }

    /// Parse a JSON document and validate it
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("screen_size.x", self.screen_size.x),
            ("screen_size.y", self.screen_size.y),
            ("player_radius", self.player_radius),
            ("enemy_radius", self.enemy_radius),
            ("enemy_fire_interval", self.enemy_fire_interval),
            ("player_bullet_speed", self.player_bullet_speed),
            ("enemy_bullet_speed", self.enemy_bullet_speed),
            ("bullet_lifetime", self.bullet_lifetime),
            ("field_min_radius", self.field_min_radius),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be a positive number, got {value}"),
                });
            }
        }
        if !(self.enemy_speed.is_finite() && self.enemy_speed >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "enemy_speed",
                reason: format!("must be non-negative, got {}", self.enemy_speed),
            });
        }
        if !(self.field_strength.is_finite() && self.field_strength >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "field_strength",
                reason: format!("must be non-negative, got {}", self.field_strength),
            });
        }
        if self.spawns_outside_boundary() {
            log::warn!(
                "Screen {}x{} with enemy radius {}: corner spawns reach {:.1}, past the \
                 boundary at {:.1}; those enemies will respawn immediately",
                self.screen_size.x,
                self.screen_size.y,
                self.enemy_radius,
                self.max_spawn_distance(),
                self.max_distance_from_player()
            );
        }
        Ok(())
    }
}
