//! World state and core simulation types
//!
//! The `World` is the explicit stand-in for a scene graph: it owns every
//! entity record, the simulation clock and the seeded RNG.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::registry::EntityRegistry;
use super::spawn;
use super::targeting;
use super::vulnerability::Vulnerability;
use crate::config::GameConfig;
use crate::consts::*;
use crate::heading;

/// Stable handle for a live entity. Never reused within one world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// The player is always entity 0
pub const PLAYER_ID: EntityId = EntityId(0);

/// Role of an entity for contact classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Player,
    Enemy,
    PlayerBullet,
    EnemyBullet,
    Star,
}

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Simulation frozen behind the pause overlay
    Paused,
    /// Player was hit while vulnerable
    GameOver,
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub vulnerability: Vulnerability,
    /// Strength of the player's own attraction field (0 while firing)
    pub field_strength: f32,
}

impl Player {
    pub fn is_vulnerable(&self) -> bool {
        self.vulnerability == Vulnerability::Vulnerable
    }
}

/// An enemy planet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EntityId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Simulation time of the next shot
    pub next_fire_at: f32,
}

/// A bullet; whose bullet it is depends on which registry list holds it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: EntityId,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Facing angle (radians), matches the velocity direction
    pub rotation: f32,
    pub radius: f32,
    pub expires_at: f32,
}

/// Background star (no body, never destroyed)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Star {
    pub id: EntityId,
    pub pos: Vec2,
}

/// Enemy death effect, self-terminating
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub pos: Vec2,
    pub born_at: f32,
    /// Particles are emitted until this time
    pub emit_until: f32,
    pub expires_at: f32,
}

impl Explosion {
    pub fn new(pos: Vec2, now: f32) -> Self {
        Self {
            pos,
            born_at: now,
            emit_until: now + EXPLOSION_EMIT_DURATION,
            expires_at: now + EXPLOSION_EMIT_DURATION + EXPLOSION_LINGER_DURATION,
        }
    }

    pub fn is_emitting(&self, now: f32) -> bool {
        now < self.emit_until
    }
}

/// Things that happened during a tick or input callback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    EnemySpawned { id: EntityId, pos: Vec2 },
    EnemyFired { enemy: EntityId, bullet: EntityId },
    PlayerFired { bullet: EntityId, target: EntityId },
    EnemyKilled { enemy: EntityId, pos: Vec2 },
    ScoreChanged { num_kills: u64 },
    VulnerabilityChanged { vulnerable: bool },
    /// Game over. Carries the killer bullet so the game-over screen can draw it.
    PlayerKilled {
        score: u64,
        bullet_pos: Vec2,
        bullet_angle: f32,
    },
}

/// Complete simulation world
#[derive(Debug, Clone)]
pub struct World {
    pub config: GameConfig,
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub player: Player,
    pub registry: EntityRegistry,
    /// Enemies shot this session
    pub num_kills: u64,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
    /// Boundary radius, fixed at construction
    max_distance: f32,
}

impl World {
    /// Build a world with the player at the origin, the starfield and the
    /// initial enemy wave
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let max_distance = config.max_distance_from_player();
        let mut world = Self {
            player: spawn::build_player(&config),
            config,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            phase: GamePhase::Playing,
            registry: EntityRegistry::new(),
            num_kills: 0,
            events: Vec::new(),
            max_distance,
        };

        for _ in 0..world.config.star_count {
            let id = world.registry.allocate_id();
            let star = spawn::spawn_star(&mut world.rng, id, world.player.pos, max_distance);
            world.registry.stars.push(star);
        }

        for _ in 0..world.config.enemy_count {
            world.spawn_enemy();
        }

        log::debug!(
            "World created (seed {}, {} stars, {} enemies, boundary {:.1})",
            seed,
            world.registry.stars.len(),
            world.registry.enemies.len(),
            max_distance
        );
        world
    }

    /// Simulation clock in seconds
    #[inline]
    pub fn time(&self) -> f32 {
        self.time_ticks as f32 * SIM_DT
    }

    /// Distance from the player beyond which entities are reaped
    #[inline]
    pub fn max_distance(&self) -> f32 {
        self.max_distance
    }

    /// Category of a live entity, None if it is gone
    pub fn category_of(&self, id: EntityId) -> Option<Category> {
        if id == PLAYER_ID {
            Some(Category::Player)
        } else {
            self.registry.category_of(id)
        }
    }

    pub fn is_live(&self, id: EntityId) -> bool {
        self.category_of(id).is_some()
    }

    /// Position and collision radius of a live body (stars have none)
    pub fn body(&self, id: EntityId) -> Option<(Vec2, f32)> {
        if id == PLAYER_ID {
            return Some((self.player.pos, self.player.radius));
        }
        match self.registry.category_of(id)? {
            Category::Enemy => self.registry.enemy(id).map(|e| (e.pos, e.radius)),
            Category::PlayerBullet | Category::EnemyBullet => {
                self.registry.bullet(id).map(|b| (b.pos, b.radius))
            }
            Category::Player | Category::Star => None,
        }
    }

    /// Spawn one enemy at a screen edge around the player
    pub fn spawn_enemy(&mut self) -> EntityId {
        let id = self.registry.allocate_id();
        let now = self.time();
        let enemy = spawn::spawn_enemy(&mut self.rng, &self.config, id, self.player.pos, now);
        log::trace!("Enemy {:?} spawned at {:?}", id, enemy.pos);
        self.events.push(GameEvent::EnemySpawned { id, pos: enemy.pos });
        self.registry.insert_enemy(enemy);
        id
    }

    /// Fire one bullet from an enemy at the player's current position.
    /// Skipped when the enemy sits exactly on the player.
    pub fn fire_enemy_bullet(&mut self, enemy_id: EntityId) -> Option<EntityId> {
        let origin = self.registry.enemy(enemy_id)?.pos;
        let speed = self.config.enemy_bullet_speed;
        let Some(vel) = targeting::aim_vector(origin, self.player.pos, speed) else {
            log::trace!("Enemy {:?} has no aim on the player, holding fire", enemy_id);
            return None;
        };
        let id = self.registry.allocate_id();
        self.registry.insert_enemy_bullet(Bullet {
            id,
            pos: origin,
            vel,
            rotation: heading(vel),
            radius: self.config.enemy_bullet_radius,
            expires_at: self.time() + self.config.bullet_lifetime,
        });
        self.events.push(GameEvent::EnemyFired {
            enemy: enemy_id,
            bullet: id,
        });
        Some(id)
    }

    /// Fire one player bullet at the nearest enemy, leading its motion.
    /// No-op without enemies or with a degenerate aim.
    pub fn fire_player_bullet(&mut self) -> Option<EntityId> {
        let (target, aim) = {
            let Some(enemy) = self.registry.nearest_enemy(self.player.pos) else {
                log::debug!("No enemies alive, shot skipped");
                return None;
            };
            let aim = targeting::lead_aim(
                self.player.pos,
                enemy.pos,
                enemy.vel,
                self.config.player_bullet_speed,
            );
            (enemy.id, aim)
        };
        let Some(vel) = aim else {
            log::debug!("Nearest enemy {:?} overlaps the player, shot skipped", target);
            return None;
        };
        let id = self.registry.allocate_id();
        self.registry.insert_player_bullet(Bullet {
            id,
            pos: self.player.pos,
            vel,
            rotation: heading(vel),
            radius: self.config.player_bullet_radius,
            expires_at: self.time() + self.config.bullet_lifetime,
        });
        self.events.push(GameEvent::PlayerFired { bullet: id, target });
        Some(id)
    }

    /// Take all events recorded so far
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Serializable view for renderers
    pub fn snapshot(&self) -> Snapshot {
        let now = self.time();
        Snapshot {
            time: now,
            phase: self.phase,
            num_kills: self.num_kills,
            player: self.player.clone(),
            enemies: self.registry.enemies.clone(),
            enemy_bullets: self.registry.enemy_bullets.clone(),
            player_bullets: self.registry.player_bullets.clone(),
            stars: self.registry.stars.iter().map(|s| s.pos).collect(),
            explosions: self
                .registry
                .explosions
                .iter()
                .map(|e| ExplosionSnapshot {
                    pos: e.pos,
                    age: now - e.born_at,
                    emitting: e.is_emitting(now),
                })
                .collect(),
        }
    }
}

/// Explosion as seen by a renderer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplosionSnapshot {
    pub pos: Vec2,
    pub age: f32,
    pub emitting: bool,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub time: f32,
    pub phase: GamePhase,
    pub num_kills: u64,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub enemy_bullets: Vec<Bullet>,
    pub player_bullets: Vec<Bullet>,
    pub stars: Vec<Vec2>,
    pub explosions: Vec<ExplosionSnapshot>,
}
