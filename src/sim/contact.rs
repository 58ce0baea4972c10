//! Contact classification and effects
//!
//! A contact names two entity ids in whatever order the physics backend
//! reported them. Categories are looked up in the world, sorted, and the
//! sorted pair selects a rule. Contacts that mention an entity which is no
//! longer live are dropped before classification, so a duplicate delivery
//! never scores or respawns twice.

use serde::{Deserialize, Serialize};

use super::state::{Category, EntityId, Explosion, GameEvent, GamePhase, World};
use crate::heading;

/// Two bodies that started touching
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Contact {
    pub a: EntityId,
    pub b: EntityId,
}

impl Contact {
    /// Contact with the ids in ascending order
    pub fn new(a: EntityId, b: EntityId) -> Self {
        if a <= b {
            Self { a, b }
        } else {
            Self { a: b, b: a }
        }
    }
}

/// What a category pair does on contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactRule {
    /// Player bullet hits an enemy
    KillEnemy,
    /// Enemy bullet hits the player (only lethal while vulnerable)
    KillPlayer,
    Ignore,
}

impl ContactRule {
    /// Rule for an unordered category pair
    pub fn for_pair(a: Category, b: Category) -> Self {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        match (lo, hi) {
            (Category::Enemy, Category::PlayerBullet) => ContactRule::KillEnemy,
            (Category::Player, Category::EnemyBullet) => ContactRule::KillPlayer,
            _ => ContactRule::Ignore,
        }
    }
}

/// Result of resolving one contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContactOutcome {
    EnemyKilled { enemy: EntityId, bullet: EntityId },
    PlayerKilled { bullet: EntityId },
    Ignored,
}

/// Apply the effect of one contact to the world
pub fn resolve_contact(world: &mut World, contact: Contact) -> ContactOutcome {
    if world.phase != GamePhase::Playing {
        return ContactOutcome::Ignored;
    }
    let (Some(cat_a), Some(cat_b)) = (world.category_of(contact.a), world.category_of(contact.b))
    else {
        log::trace!("Contact {:?} involves a removed entity, ignored", contact);
        return ContactOutcome::Ignored;
    };

    // Sorting by category gives each side a fixed role below
    let (first, second) = if cat_a <= cat_b {
        (contact.a, contact.b)
    } else {
        (contact.b, contact.a)
    };

    match ContactRule::for_pair(cat_a, cat_b) {
        ContactRule::KillEnemy => {
            kill_enemy(world, first, second);
            ContactOutcome::EnemyKilled {
                enemy: first,
                bullet: second,
            }
        }
        ContactRule::KillPlayer if world.player.is_vulnerable() => {
            kill_player(world, second);
            ContactOutcome::PlayerKilled { bullet: second }
        }
        ContactRule::KillPlayer | ContactRule::Ignore => ContactOutcome::Ignored,
    }
}

/// Remove a shot enemy and the bullet, leave an explosion, replace the enemy
/// and count the kill
pub(crate) fn kill_enemy(world: &mut World, enemy_id: EntityId, bullet_id: EntityId) {
    let Some(enemy) = world.registry.remove_enemy(enemy_id) else {
        return;
    };
    world.registry.remove_player_bullet(bullet_id);

    let now = world.time();
    world.registry.explosions.push(Explosion::new(enemy.pos, now));
    world.spawn_enemy();

    world.num_kills += 1;
    log::debug!("Enemy {:?} destroyed at {:?} ({} kills)", enemy_id, enemy.pos, world.num_kills);
    world.events.push(GameEvent::EnemyKilled {
        enemy: enemy_id,
        pos: enemy.pos,
    });
    world.events.push(GameEvent::ScoreChanged {
        num_kills: world.num_kills,
    });
}

/// End the run; the killer bullet is reported so it can be drawn on the
/// game-over screen
pub(crate) fn kill_player(world: &mut World, bullet_id: EntityId) {
    let Some(bullet) = world.registry.remove_enemy_bullet(bullet_id) else {
        return;
    };
    world.phase = GamePhase::GameOver;
    log::info!(
        "Player hit by {:?} at {:?}, final score {}",
        bullet_id,
        bullet.pos,
        world.num_kills
    );
    world.events.push(GameEvent::PlayerKilled {
        score: world.num_kills,
        bullet_pos: bullet.pos,
        bullet_angle: heading(bullet.vel),
    });
}
