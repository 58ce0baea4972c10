//! Touch-driven vulnerability
//!
//! The player is safe until they shoot. Holding a touch makes them
//! vulnerable; lifting or cancelling it makes them safe again. While
//! vulnerable the attraction fields are switched off so drift does not
//! spoil the aim.

use serde::{Deserialize, Serialize};

use super::contact;
use super::physics::PhysicsBackend;
use super::state::{Category, EntityId, GameEvent, GamePhase, PLAYER_ID, World};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Vulnerability {
    #[default]
    Invulnerable,
    Vulnerable,
}

/// Touch-down on the play field (the pause control is filtered out by the
/// caller). Returns the bullet fired, if any.
///
/// If an enemy bullet is already overlapping the player the run ends here,
/// before anything is fired: the backend only reports contacts as they begin
/// and would otherwise miss it.
pub fn begin_firing(world: &mut World, backend: &impl PhysicsBackend) -> Option<EntityId> {
    if world.phase != GamePhase::Playing {
        return None;
    }

    let overlapping_bullet = backend
        .touching(world, PLAYER_ID)
        .into_iter()
        .find(|id| world.category_of(*id) == Some(Category::EnemyBullet));
    if let Some(bullet) = overlapping_bullet {
        log::debug!("Touch-down while overlapping enemy bullet {:?}", bullet);
        become_vulnerable(world);
        contact::kill_player(world, bullet);
        return None;
    }

    become_vulnerable(world);
    world.fire_player_bullet()
}

/// Flag, field and event change together
fn become_vulnerable(world: &mut World) {
    if world.player.is_vulnerable() {
        return;
    }
    world.player.vulnerability = Vulnerability::Vulnerable;
    world.player.field_strength = 0.0;
    world
        .events
        .push(GameEvent::VulnerabilityChanged { vulnerable: true });
}

/// Touch-up or touch-cancel
pub fn cease_firing(world: &mut World) {
    if !world.player.is_vulnerable() {
        return;
    }
    world.player.vulnerability = Vulnerability::Invulnerable;
    world.player.field_strength = world.config.field_strength;
    world
        .events
        .push(GameEvent::VulnerabilityChanged { vulnerable: false });
}
