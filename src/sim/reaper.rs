//! Boundary reaping
//!
//! Anything that drifts farther than the boundary radius from the player is
//! culled each tick. Enemies are replaced one for one, bullets are dropped,
//! and stars are mirrored through the player so the starfield never runs out.

use glam::Vec2;

use super::state::World;

/// How far inside the boundary a wrapped star lands, so it is not wrapped
/// straight back on the next tick
const STAR_WRAP_INSET: f32 = 1.0;

/// What one reaping pass did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReapReport {
    pub enemies_replaced: usize,
    pub bullets_removed: usize,
    pub stars_wrapped: usize,
}

/// Point reflection of `pos` through `center`
#[inline]
pub fn reflect_through(pos: Vec2, center: Vec2) -> Vec2 {
    2.0 * center - pos
}

/// Point reflection through `center`, pulled in to at most `radius` from it
#[inline]
pub fn wrap_star(pos: Vec2, center: Vec2, radius: f32) -> Vec2 {
    center + (reflect_through(pos, center) - center).clamp_length_max(radius)
}

/// Cull or wrap everything beyond the boundary radius
pub fn reap(world: &mut World) -> ReapReport {
    let player = world.player.pos;
    let max_sq = world.max_distance() * world.max_distance();
    let beyond = |pos: Vec2| pos.distance_squared(player) > max_sq;
    let mut report = ReapReport::default();

    let before = world.registry.enemies.len();
    world.registry.enemies.retain(|e| !beyond(e.pos));
    report.enemies_replaced = before - world.registry.enemies.len();

    let before = world.registry.enemy_bullets.len() + world.registry.player_bullets.len();
    world.registry.enemy_bullets.retain(|b| !beyond(b.pos));
    world.registry.player_bullets.retain(|b| !beyond(b.pos));
    report.bullets_removed =
        before - world.registry.enemy_bullets.len() - world.registry.player_bullets.len();

    let wrap_radius = (world.max_distance() - STAR_WRAP_INSET).max(0.0);
    for star in &mut world.registry.stars {
        if beyond(star.pos) {
            star.pos = wrap_star(star.pos, player, wrap_radius);
            report.stars_wrapped += 1;
        }
    }

    for _ in 0..report.enemies_replaced {
        world.spawn_enemy();
    }

    if report.enemies_replaced > 0 {
        log::trace!("Reaped {} enemies beyond the boundary", report.enemies_replaced);
    }
    report
}
