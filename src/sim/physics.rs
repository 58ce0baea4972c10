//! Physics adapter
//!
//! The simulation only needs three things from a physics layer: move the
//! bodies, report contacts as they begin, and say what is touching a body
//! right now. `CircleBackend` is the built-in implementation: explicit Euler
//! integration, radial attraction fields and circle overlap tests.

use std::collections::BTreeSet;

use glam::Vec2;

use super::contact::Contact;
use super::state::{EntityId, PLAYER_ID, World};

pub trait PhysicsBackend {
    /// Advance every body by `dt` seconds
    fn step(&mut self, world: &mut World, dt: f32);

    /// Contacts that began since the previous call, in ascending order
    fn contacts(&mut self, world: &World) -> Vec<Contact>;

    /// Bodies currently overlapping `id`
    fn touching(&self, world: &World, id: EntityId) -> Vec<EntityId>;
}

/// Acceleration toward `source` from a radial field with inverse-square falloff.
/// Distances below `min_radius` are clamped so the pull stays bounded.
pub fn field_acceleration(pos: Vec2, source: Vec2, strength: f32, min_radius: f32) -> Vec2 {
    let to_source = source - pos;
    let Some(dir) = to_source.try_normalize() else {
        return Vec2::ZERO;
    };
    let d = to_source.length().max(min_radius);
    dir * (strength / (d * d))
}

#[inline]
fn overlaps(a: (Vec2, f32), b: (Vec2, f32)) -> bool {
    let reach = a.1 + b.1;
    a.0.distance_squared(b.0) < reach * reach
}

/// Default backend: circles, fields, begin-contact tracking
#[derive(Debug, Clone, Default)]
pub struct CircleBackend {
    /// Pairs that were overlapping at the last `contacts` call
    touching_pairs: BTreeSet<Contact>,
}

impl CircleBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every pair that can produce a contact event and overlaps now
    fn overlapping_pairs(world: &World) -> BTreeSet<Contact> {
        let mut pairs = BTreeSet::new();
        let player = (world.player.pos, world.player.radius);
        for bullet in &world.registry.enemy_bullets {
            if overlaps(player, (bullet.pos, bullet.radius)) {
                pairs.insert(Contact::new(PLAYER_ID, bullet.id));
            }
        }
        for enemy in &world.registry.enemies {
            for bullet in &world.registry.player_bullets {
                if overlaps((enemy.pos, enemy.radius), (bullet.pos, bullet.radius)) {
                    pairs.insert(Contact::new(enemy.id, bullet.id));
                }
            }
        }
        pairs
    }
}

impl PhysicsBackend for CircleBackend {
    fn step(&mut self, world: &mut World, dt: f32) {
        // Fields are off entirely while the player is shooting
        if !world.player.is_vulnerable() {
            let min_radius = world.config.field_min_radius;
            let enemy_strength = world.config.field_strength;
            let player_pos = world.player.pos;
            let player_strength = world.player.field_strength;

            let mut player_accel = Vec2::ZERO;
            for enemy in &mut world.registry.enemies {
                player_accel +=
                    field_acceleration(player_pos, enemy.pos, enemy_strength, min_radius);
                enemy.vel +=
                    field_acceleration(enemy.pos, player_pos, player_strength, min_radius) * dt;
            }
            world.player.vel += player_accel * dt;
        }

        world.player.pos += world.player.vel * dt;
        for enemy in &mut world.registry.enemies {
            enemy.pos += enemy.vel * dt;
        }
        for bullet in world
            .registry
            .enemy_bullets
            .iter_mut()
            .chain(world.registry.player_bullets.iter_mut())
        {
            bullet.pos += bullet.vel * dt;
        }
    }

    fn contacts(&mut self, world: &World) -> Vec<Contact> {
        let current = Self::overlapping_pairs(world);
        let began: Vec<Contact> = current.difference(&self.touching_pairs).copied().collect();
        self.touching_pairs = current;
        began
    }

    fn touching(&self, world: &World, id: EntityId) -> Vec<EntityId> {
        let Some(body) = world.body(id) else {
            return Vec::new();
        };
        let registry = &world.registry;
        let others = std::iter::once((PLAYER_ID, world.player.pos, world.player.radius))
            .chain(registry.enemies.iter().map(|e| (e.id, e.pos, e.radius)))
            .chain(registry.enemy_bullets.iter().map(|b| (b.id, b.pos, b.radius)))
            .chain(registry.player_bullets.iter().map(|b| (b.id, b.pos, b.radius)));
        others
            .filter(|(other, pos, radius)| *other != id && overlaps(body, (*pos, *radius)))
            .map(|(other, _, _)| other)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::state::Bullet;
    use crate::sim::vulnerability::Vulnerability;

    fn empty_world() -> World {
        let mut world = World::new(GameConfig::default(), 9);
        world.registry.enemies.clear();
        world
    }

    fn enemy_bullet(world: &mut World, pos: Vec2, vel: Vec2) -> EntityId {
        let id = world.registry.allocate_id();
        world.registry.insert_enemy_bullet(Bullet {
            id,
            pos,
            vel,
            rotation: 0.0,
            radius: 5.0,
            expires_at: 100.0,
        });
        id
    }

    #[test]
    fn test_field_acceleration_falloff() {
        let near = field_acceleration(Vec2::new(100.0, 0.0), Vec2::ZERO, 1.0e6, 50.0);
        let far = field_acceleration(Vec2::new(200.0, 0.0), Vec2::ZERO, 1.0e6, 50.0);
        assert!((near.x + 100.0).abs() < 1e-3);
        assert!((far.x + 25.0).abs() < 1e-3);

        // Clamped inside the minimum radius
        let inside = field_acceleration(Vec2::new(10.0, 0.0), Vec2::ZERO, 1.0e6, 50.0);
        assert!((inside.x + 400.0).abs() < 1e-3);

        assert_eq!(field_acceleration(Vec2::ONE, Vec2::ONE, 1.0e6, 50.0), Vec2::ZERO);
    }

    #[test]
    fn test_enemies_drift_toward_player() {
        let mut world = empty_world();
        let id = world.spawn_enemy();
        world.registry.enemies[0].pos = Vec2::new(300.0, 0.0);
        world.registry.enemies[0].vel = Vec2::ZERO;

        let mut backend = CircleBackend::new();
        backend.step(&mut world, 0.1);

        let enemy = world.registry.enemy(id).unwrap();
        assert!(enemy.vel.x < 0.0);
        assert!(world.player.vel.x > 0.0);
    }

    #[test]
    fn test_fields_off_while_vulnerable() {
        let mut world = empty_world();
        let id = world.spawn_enemy();
        world.registry.enemies[0].pos = Vec2::new(300.0, 0.0);
        world.registry.enemies[0].vel = Vec2::ZERO;
        world.player.vulnerability = Vulnerability::Vulnerable;

        let mut backend = CircleBackend::new();
        backend.step(&mut world, 0.1);

        assert_eq!(world.registry.enemy(id).unwrap().vel, Vec2::ZERO);
        assert_eq!(world.player.vel, Vec2::ZERO);
    }

    #[test]
    fn test_bullets_move_in_straight_lines() {
        let mut world = empty_world();
        let id = enemy_bullet(&mut world, Vec2::new(0.0, 300.0), Vec2::new(0.0, -200.0));
        let mut backend = CircleBackend::new();
        backend.step(&mut world, 0.5);
        assert_eq!(world.registry.bullet(id).unwrap().pos, Vec2::new(0.0, 200.0));
    }

    #[test]
    fn test_contacts_reported_once_per_overlap() {
        let mut world = empty_world();
        let id = enemy_bullet(&mut world, Vec2::new(6.0, 0.0), Vec2::ZERO);
        let mut backend = CircleBackend::new();

        assert_eq!(backend.contacts(&world), vec![Contact::new(PLAYER_ID, id)]);
        assert!(backend.contacts(&world).is_empty());

        // Separate, then touch again
        world.registry.enemy_bullets[0].pos = Vec2::new(100.0, 0.0);
        assert!(backend.contacts(&world).is_empty());
        world.registry.enemy_bullets[0].pos = Vec2::new(-6.0, 0.0);
        assert_eq!(backend.contacts(&world), vec![Contact::new(PLAYER_ID, id)]);
    }

    #[test]
    fn test_touching_lists_overlaps() {
        let mut world = empty_world();
        let near = enemy_bullet(&mut world, Vec2::new(0.0, 12.0), Vec2::ZERO);
        let _far = enemy_bullet(&mut world, Vec2::new(0.0, 40.0), Vec2::ZERO);
        let backend = CircleBackend::new();
        assert_eq!(backend.touching(&world, PLAYER_ID), vec![near]);
    }
}
