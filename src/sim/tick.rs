//! Fixed timestep simulation tick
//!
//! Core game loop that advances the world deterministically.

use super::contact::{ContactOutcome, resolve_contact};
use super::physics::PhysicsBackend;
use super::reaper::{ReapReport, reap};
use super::state::{EntityId, GamePhase, World};
use crate::consts::SIM_DT;

/// Summary of one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub enemy_shots: usize,
    pub bullets_expired: usize,
    pub kills: usize,
    pub reaped: ReapReport,
}

/// Advance the world by one fixed timestep.
///
/// Order: clock, enemy fire timers, expiry, physics step, contacts, reaping.
/// Paused and finished worlds do not move.
pub fn tick(world: &mut World, backend: &mut impl PhysicsBackend, dt: f32) -> TickReport {
    let mut report = TickReport::default();
    if world.phase != GamePhase::Playing {
        return report;
    }

    world.time_ticks += 1;
    let now = world.time();

    // Enemy fire timers
    let due: Vec<EntityId> = world
        .registry
        .enemies
        .iter()
        .filter(|e| now >= e.next_fire_at)
        .map(|e| e.id)
        .collect();
    let interval = world.config.enemy_fire_interval.max(SIM_DT);
    for id in due {
        if world.fire_enemy_bullet(id).is_some() {
            report.enemy_shots += 1;
        }
        if let Some(enemy) = world.registry.enemy_mut(id) {
            // Catch up in whole intervals if a long pause left us behind
            while enemy.next_fire_at <= now {
                enemy.next_fire_at += interval;
            }
        }
    }

    // Timed expiry
    let before = world.registry.enemy_bullets.len() + world.registry.player_bullets.len();
    world.registry.enemy_bullets.retain(|b| b.expires_at > now);
    world.registry.player_bullets.retain(|b| b.expires_at > now);
    report.bullets_expired =
        before - world.registry.enemy_bullets.len() - world.registry.player_bullets.len();
    world.registry.explosions.retain(|e| e.expires_at > now);

    backend.step(world, dt);

    for contact in backend.contacts(world) {
        match resolve_contact(world, contact) {
            ContactOutcome::EnemyKilled { .. } => report.kills += 1,
            ContactOutcome::PlayerKilled { .. } => return report,
            ContactOutcome::Ignored => {}
        }
    }

    report.reaped = reap(world);
    report
}
