//! Live entities grouped by role
//!
//! Each list is kept sorted by id (ids are allocated monotonically and only
//! ever appended), so lookups are binary searches and iteration order is
//! deterministic.

use glam::Vec2;

use super::state::{Bullet, Category, EntityId, Enemy, Explosion, Star};

#[derive(Debug, Clone)]
pub struct EntityRegistry {
    pub enemies: Vec<Enemy>,
    pub enemy_bullets: Vec<Bullet>,
    pub player_bullets: Vec<Bullet>,
    pub stars: Vec<Star>,
    pub explosions: Vec<Explosion>,
    /// Next entity ID (0 is the player)
    next_id: u32,
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self {
            enemies: Vec::new(),
            enemy_bullets: Vec::new(),
            player_bullets: Vec::new(),
            stars: Vec::new(),
            explosions: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn insert_enemy(&mut self, enemy: Enemy) {
        insert_sorted(&mut self.enemies, enemy, |e| e.id);
    }

    pub fn insert_enemy_bullet(&mut self, bullet: Bullet) {
        insert_sorted(&mut self.enemy_bullets, bullet, |b| b.id);
    }

    pub fn insert_player_bullet(&mut self, bullet: Bullet) {
        insert_sorted(&mut self.player_bullets, bullet, |b| b.id);
    }

    /// Which list holds `id`, if any
    pub fn category_of(&self, id: EntityId) -> Option<Category> {
        if find(&self.enemies, id, |e| e.id).is_some() {
            Some(Category::Enemy)
        } else if find(&self.player_bullets, id, |b| b.id).is_some() {
            Some(Category::PlayerBullet)
        } else if find(&self.enemy_bullets, id, |b| b.id).is_some() {
            Some(Category::EnemyBullet)
        } else if find(&self.stars, id, |s| s.id).is_some() {
            Some(Category::Star)
        } else {
            None
        }
    }

    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        find(&self.enemies, id, |e| e.id).map(|i| &self.enemies[i])
    }

    pub fn enemy_mut(&mut self, id: EntityId) -> Option<&mut Enemy> {
        find(&self.enemies, id, |e| e.id).map(|i| &mut self.enemies[i])
    }

    /// A bullet of either side
    pub fn bullet(&self, id: EntityId) -> Option<&Bullet> {
        find(&self.player_bullets, id, |b| b.id)
            .map(|i| &self.player_bullets[i])
            .or_else(|| find(&self.enemy_bullets, id, |b| b.id).map(|i| &self.enemy_bullets[i]))
    }

    pub fn remove_enemy(&mut self, id: EntityId) -> Option<Enemy> {
        find(&self.enemies, id, |e| e.id).map(|i| self.enemies.remove(i))
    }

    pub fn remove_player_bullet(&mut self, id: EntityId) -> Option<Bullet> {
        find(&self.player_bullets, id, |b| b.id).map(|i| self.player_bullets.remove(i))
    }

    pub fn remove_enemy_bullet(&mut self, id: EntityId) -> Option<Bullet> {
        find(&self.enemy_bullets, id, |b| b.id).map(|i| self.enemy_bullets.remove(i))
    }

    /// Enemy closest to `pos` (lowest id wins ties), None when there are none
    pub fn nearest_enemy(&self, pos: Vec2) -> Option<&Enemy> {
        let mut best: Option<(&Enemy, f32)> = None;
        for enemy in &self.enemies {
            let dist = enemy.pos.distance_squared(pos);
            match best {
                Some((_, best_dist)) if dist >= best_dist => {}
                _ => best = Some((enemy, dist)),
            }
        }
        best.map(|(enemy, _)| enemy)
    }

    /// Number of entities with a body or a star
    pub fn len(&self) -> usize {
        self.enemies.len()
            + self.enemy_bullets.len()
            + self.player_bullets.len()
            + self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn find<T>(items: &[T], id: EntityId, key: impl Fn(&T) -> EntityId) -> Option<usize> {
    items.binary_search_by_key(&id, key).ok()
}

fn insert_sorted<T>(items: &mut Vec<T>, item: T, key: impl Fn(&T) -> EntityId) {
    let id = key(&item);
    match items.last() {
        Some(last) if key(last) > id => {
            let idx = items.partition_point(|existing| key(existing) < id);
            items.insert(idx, item);
        }
        _ => items.push(item),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enemy(id: u32, x: f32, y: f32) -> Enemy {
        Enemy {
            id: EntityId(id),
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            radius: 20.0,
            next_fire_at: 0.0,
        }
    }

    fn bullet(id: u32) -> Bullet {
        Bullet {
            id: EntityId(id),
            pos: Vec2::ZERO,
            vel: Vec2::X,
            rotation: 0.0,
            radius: 5.0,
            expires_at: 10.0,
        }
    }

    #[test]
    fn test_allocate_ids_start_after_player() {
        let mut registry = EntityRegistry::new();
        assert_eq!(registry.allocate_id(), EntityId(1));
        assert_eq!(registry.allocate_id(), EntityId(2));
    }

    #[test]
    fn test_nearest_enemy() {
        let mut registry = EntityRegistry::new();
        assert!(registry.nearest_enemy(Vec2::ZERO).is_none());

        registry.insert_enemy(enemy(1, 300.0, 0.0));
        registry.insert_enemy(enemy(2, -50.0, 40.0));
        registry.insert_enemy(enemy(3, 0.0, -200.0));
        assert_eq!(registry.nearest_enemy(Vec2::ZERO).unwrap().id, EntityId(2));
        assert_eq!(
            registry.nearest_enemy(Vec2::new(250.0, 0.0)).unwrap().id,
            EntityId(1)
        );
    }

    #[test]
    fn test_nearest_enemy_tie_prefers_lowest_id() {
        let mut registry = EntityRegistry::new();
        registry.insert_enemy(enemy(4, 100.0, 0.0));
        registry.insert_enemy(enemy(5, -100.0, 0.0));
        assert_eq!(registry.nearest_enemy(Vec2::ZERO).unwrap().id, EntityId(4));
    }

    #[test]
    fn test_insert_keeps_order() {
        let mut registry = EntityRegistry::new();
        registry.insert_enemy(enemy(5, 0.0, 0.0));
        registry.insert_enemy(enemy(2, 0.0, 0.0));
        registry.insert_enemy(enemy(9, 0.0, 0.0));
        let ids: Vec<u32> = registry.enemies.iter().map(|e| e.id.0).collect();
        assert_eq!(ids, vec![2, 5, 9]);
    }

    #[test]
    fn test_categories_are_exclusive() {
        let mut registry = EntityRegistry::new();
        registry.insert_enemy(enemy(1, 0.0, 0.0));
        registry.insert_player_bullet(bullet(2));
        registry.insert_enemy_bullet(bullet(3));
        assert_eq!(registry.category_of(EntityId(1)), Some(Category::Enemy));
        assert_eq!(registry.category_of(EntityId(2)), Some(Category::PlayerBullet));
        assert_eq!(registry.category_of(EntityId(3)), Some(Category::EnemyBullet));
        assert_eq!(registry.category_of(EntityId(4)), None);
    }

    #[test]
    fn test_enemy_mut_edits_in_place() {
        let mut registry = EntityRegistry::new();
        registry.insert_enemy(enemy(1, 0.0, 0.0));
        registry.insert_enemy(enemy(5, 10.0, 0.0));

        registry.enemy_mut(EntityId(5)).unwrap().next_fire_at = 3.5;
        assert_eq!(registry.enemy(EntityId(5)).unwrap().next_fire_at, 3.5);
        assert!(registry.enemy_mut(EntityId(2)).is_none());
    }

    #[test]
    fn test_remove_is_one_shot() {
        let mut registry = EntityRegistry::new();
        registry.insert_enemy(enemy(1, 0.0, 0.0));
        registry.insert_player_bullet(bullet(2));
        assert!(registry.remove_enemy(EntityId(1)).is_some());
        assert!(registry.remove_enemy(EntityId(1)).is_none());
        assert!(registry.remove_player_bullet(EntityId(2)).is_some());
        assert!(registry.remove_player_bullet(EntityId(2)).is_none());
        assert!(registry.is_empty());
    }
}
