//! Pew Pew Planets - An open-space arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, targeting, contacts, reaping)
//! - `session`: Play session orchestration (score, pause, game over)
//! - `app`: Front-end shell routing touches between screens and play
//! - `scenes`: Menu / tutorial / game-over navigation
//! - `highscores`: High score storage
//! - `config`: Data-driven game balance

pub mod app;
pub mod config;
pub mod highscores;
pub mod scenes;
pub mod session;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use app::{App, AppView, PlaySession};
pub use config::{ConfigError, GameConfig};
pub use highscores::{HighScoreStore, LocalHighScore, MemoryHighScore, StorageError};
pub use scenes::{Scene, SceneCommand, SceneFlow, TutorialPage};
pub use session::{GameOverReport, GameSession, Navigator, TouchEvent, TouchPhase};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta fed into the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Boundary radius as a fraction of the longer screen side.
    /// Must exceed 0.5 * sqrt(2) so the circle encloses the whole viewport.
    /// Edge spawns sit 2 * enemy_radius further out, so on near-square screens
    /// some spawn points land past the boundary and are reaped at once
    /// (see `GameConfig::spawns_outside_boundary`).
    pub const MAX_DISTANCE_FACTOR: f32 = 0.71;

    /// Player body
    pub const PLAYER_RADIUS: f32 = 10.0;

    /// Enemy defaults
    pub const ENEMY_RADIUS: f32 = 20.0;
    pub const ENEMY_SPEED: f32 = 100.0;
    pub const ENEMY_COUNT: usize = 6;
    /// Seconds between enemy shots
    pub const ENEMY_FIRE_INTERVAL: f32 = 0.5;

    /// Bullets
    pub const PLAYER_BULLET_SPEED: f32 = 500.0;
    pub const PLAYER_BULLET_RADIUS: f32 = 10.0;
    pub const ENEMY_BULLET_SPEED: f32 = 200.0;
    pub const ENEMY_BULLET_RADIUS: f32 = 5.0;
    /// Bullets older than this are dropped even if still in range
    pub const BULLET_LIFETIME: f32 = 8.0;

    /// Background starfield size
    pub const STAR_COUNT: usize = 171;
    /// Rejection-sampling attempts before a star is forced inside the boundary
    pub const STAR_SPAWN_ATTEMPTS: u32 = 64;

    /// Radial attraction fields (player <-> enemies)
    pub const FIELD_STRENGTH: f32 = 2.0e6;
    /// Distances below this are clamped when computing field falloff
    pub const FIELD_MIN_RADIUS: f32 = 50.0;

    /// Explosion effect timing (seconds)
    pub const EXPLOSION_EMIT_DURATION: f32 = 0.1;
    pub const EXPLOSION_LINGER_DURATION: f32 = 2.0;
}

/// Heading angle of a vector in radians, in [-π, π]
#[inline]
pub fn heading(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}

/// Axis-aligned screen-space rectangle (UI hit regions)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Rectangle of the given size centred on `center`
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self::new(center - size * 0.5, center + size * 0.5)
    }

    /// Inclusive point-in-rect test
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }
}
