//! Spawn placement and entity factories
//!
//! The camera is always centred on the player, so every placement here is
//! relative to the player's position: the visible viewport is
//! `player ± screen_size / 2`.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Enemy, EntityId, Player, Star};
use super::vulnerability::Vulnerability;
use crate::config::GameConfig;
use crate::consts::STAR_SPAWN_ATTEMPTS;

/// Viewport edge an enemy enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScreenEdge {
    Left,
    Right,
    Top,
    Bottom,
}

impl ScreenEdge {
    /// Two fair coin flips: edge pair first, then side
    pub fn random(rng: &mut impl Rng) -> Self {
        match (rng.random_bool(0.5), rng.random_bool(0.5)) {
            (true, true) => ScreenEdge::Left,
            (true, false) => ScreenEdge::Right,
            (false, true) => ScreenEdge::Top,
            (false, false) => ScreenEdge::Bottom,
        }
    }

    /// Unit vector pointing into the viewport
    pub fn inward(&self) -> Vec2 {
        match self {
            ScreenEdge::Left => Vec2::X,
            ScreenEdge::Right => Vec2::NEG_X,
            ScreenEdge::Top => Vec2::NEG_Y,
            ScreenEdge::Bottom => Vec2::Y,
        }
    }

    /// Spawn point for a body of `radius`, `t` in [0, 1) along the edge.
    /// The body sits `2 * radius` beyond the edge so it is fully hidden.
    pub fn spawn_point(&self, player_pos: Vec2, screen: Vec2, radius: f32, t: f32) -> Vec2 {
        let half = screen * 0.5;
        let margin = 2.0 * radius;
        let offset = match self {
            ScreenEdge::Left => Vec2::new(-half.x - margin, screen.y * t - half.y),
            ScreenEdge::Right => Vec2::new(half.x + margin, screen.y * t - half.y),
            ScreenEdge::Top => Vec2::new(screen.x * t - half.x, half.y + margin),
            ScreenEdge::Bottom => Vec2::new(screen.x * t - half.x, -half.y - margin),
        };
        player_pos + offset
    }
}

/// Fresh player at the origin, invulnerable with the field on
pub fn build_player(config: &GameConfig) -> Player {
    Player {
        pos: Vec2::ZERO,
        vel: Vec2::ZERO,
        radius: config.player_radius,
        vulnerability: Vulnerability::Invulnerable,
        field_strength: config.field_strength,
    }
}

/// Enemy record with the configured radius and a full fire interval ahead
pub fn build_enemy(config: &GameConfig, id: EntityId, pos: Vec2, vel: Vec2, now: f32) -> Enemy {
    Enemy {
        id,
        pos,
        vel,
        radius: config.enemy_radius,
        next_fire_at: now + config.enemy_fire_interval,
    }
}

/// Enemy entering from a random screen edge, heading straight in
pub fn spawn_enemy(
    rng: &mut impl Rng,
    config: &GameConfig,
    id: EntityId,
    player_pos: Vec2,
    now: f32,
) -> Enemy {
    let edge = ScreenEdge::random(rng);
    let t: f32 = rng.random();
    let pos = edge.spawn_point(player_pos, config.screen_size, config.enemy_radius, t);
    let vel = edge.inward() * config.enemy_speed;
    build_enemy(config, id, pos, vel, now)
}

/// Star somewhere within `max_distance` of the player.
///
/// Rejection sampling over the bounding square; after `STAR_SPAWN_ATTEMPTS`
/// misses the last candidate is pulled back onto the disk.
pub fn spawn_star(rng: &mut impl Rng, id: EntityId, player_pos: Vec2, max_distance: f32) -> Star {
    let mut offset = Vec2::ZERO;
    for _ in 0..STAR_SPAWN_ATTEMPTS {
        offset = Vec2::new(
            (2.0 * rng.random::<f32>() - 1.0) * max_distance,
            (2.0 * rng.random::<f32>() - 1.0) * max_distance,
        );
        if offset.length() <= max_distance {
            return Star {
                id,
                pos: player_pos + offset,
            };
        }
    }
    Star {
        id,
        pos: player_pos + offset.clamp_length_max(max_distance),
    }
}
