use std::ops::{Add, Mul, Sub};

use crate::agent::Agent;
use crate::constants::TILE_SIZE;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(self, other: Vec2) -> f32 {
        (self - other).length()
    }

    /// Unit vector, or zero for a zero-length input.
    pub fn normalize_or_zero(self) -> Vec2 {
        let len = self.length();
        if len > 0.0 {
            Vec2::new(self.x / len, self.y / len)
        } else {
            Vec2::ZERO
        }
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// Axis-aligned box anchored at its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    pub fn tile(min: Vec2) -> Self {
        Self::new(min, Vec2::new(TILE_SIZE, TILE_SIZE))
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Strict overlap: boxes that only share an edge do not intersect.
    pub fn intersects(&self, other: &Aabb) -> bool {
        let (a_max, b_max) = (self.max(), other.max());
        self.min.x < b_max.x && other.min.x < a_max.x && self.min.y < b_max.y && other.min.y < a_max.y
    }
}

/// Position and extent shared by every simulated thing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub size: Vec2,
}

impl Body {
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self { position, size }
    }

    pub fn tile(position: Vec2) -> Self {
        Self::new(position, Vec2::new(TILE_SIZE, TILE_SIZE))
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.position, self.size)
    }

    pub fn aabb_at(&self, position: Vec2) -> Aabb {
        Aabb::new(position, self.size)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Wall,
    Key,
    Agent,
    Projectile,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeyItem {
    pub body: Body,
    pub active: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projectile {
    pub body: Body,
    pub velocity: Vec2,
    pub lifetime: u32,
    pub active: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Entity {
    Wall(Body),
    Key(KeyItem),
    Agent(Agent),
    Projectile(Projectile),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Wall(_) => EntityKind::Wall,
            Entity::Key(_) => EntityKind::Key,
            Entity::Agent(_) => EntityKind::Agent,
            Entity::Projectile(_) => EntityKind::Projectile,
        }
    }

    pub fn body(&self) -> &Body {
        match self {
            Entity::Wall(body) => body,
            Entity::Key(key) => &key.body,
            Entity::Agent(agent) => &agent.body,
            Entity::Projectile(projectile) => &projectile.body,
        }
    }

    /// Whether the render layer should draw it and collisions should see it.
    pub fn is_active(&self) -> bool {
        match self {
            Entity::Wall(_) => true,
            Entity::Key(key) => key.active,
            Entity::Agent(agent) => agent.is_active(),
            Entity::Projectile(projectile) => projectile.active,
        }
    }
}

/// Stable handle into an [`EntityArena`]. Handles of removed entities are recycled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u32);

impl EntityId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug, Default)]
pub struct EntityArena {
    slots: Vec<Option<Entity>>,
    free: Vec<u32>,
    len: usize,
}

impl EntityArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entity: Entity) -> EntityId {
        self.len += 1;
        if let Some(slot) = self.free.pop() {
            self.slots[slot as usize] = Some(entity);
            return EntityId(slot);
        }
        self.slots.push(Some(entity));
        EntityId((self.slots.len() - 1) as u32)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.slots.get_mut(id.index()).and_then(Option::as_mut)
    }

    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let removed = self.slots.get_mut(id.index()).and_then(Option::take);
        if removed.is_some() {
            self.len -= 1;
            self.free.push(id.0);
        }
        removed
    }

    /// Removes every entity for which `keep` returns false.
    pub fn retain(&mut self, mut keep: impl FnMut(&Entity) -> bool) -> usize {
        let doomed: Vec<EntityId> = self
            .iter()
            .filter(|(_, entity)| !keep(*entity))
            .map(|(id, _)| id)
            .collect();
        for id in &doomed {
            self.remove(*id);
        }
        doomed.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|e| (EntityId(i as u32), e)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut Entity)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_mut().map(|e| (EntityId(i as u32), e)))
    }

    pub fn count_kind(&self, kind: EntityKind) -> usize {
        self.iter().filter(|(_, e)| e.kind() == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall(x: f32) -> Entity {
        Entity::Wall(Body::tile(Vec2::new(x, 0.0)))
    }

    #[test]
    fn touching_boxes_do_not_intersect() {
        let a = Aabb::tile(Vec2::new(0.0, 0.0));
        let b = Aabb::tile(Vec2::new(32.0, 0.0));
        let c = Aabb::tile(Vec2::new(31.0, 31.0));
        assert!(!a.intersects(&b));
        assert!(a.intersects(&c));
        assert!(c.intersects(&a));
    }

    #[test]
    fn normalize_handles_zero() {
        assert_eq!(Vec2::ZERO.normalize_or_zero(), Vec2::ZERO);
        let n = Vec2::new(3.0, 4.0).normalize_or_zero();
        assert!((n.length() - 1.0).abs() < 1e-6);
        assert_eq!(Vec2::new(3.0, 4.0).distance(Vec2::ZERO), 5.0);
    }

    #[test]
    fn arena_handles_stay_stable_across_removal() {
        let mut arena = EntityArena::new();
        let a = arena.insert(wall(0.0));
        let b = arena.insert(wall(32.0));
        let c = arena.insert(wall(64.0));
        assert_eq!(arena.len(), 3);

        assert!(arena.remove(b).is_some());
        assert!(arena.remove(b).is_none());
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.get(a).map(|e| e.body().position.x), Some(0.0));
        assert_eq!(arena.get(c).map(|e| e.body().position.x), Some(64.0));
        assert!(arena.get(b).is_none());

        let d = arena.insert(wall(96.0));
        assert_eq!(d, b);
        assert_eq!(arena.len(), 3);
    }

    #[test]
    fn retain_drops_inactive_projectiles() {
        let mut arena = EntityArena::new();
        arena.insert(wall(0.0));
        for active in [true, false, false] {
            arena.insert(Entity::Projectile(Projectile {
                body: Body::new(Vec2::ZERO, Vec2::new(8.0, 8.0)),
                velocity: Vec2::ZERO,
                lifetime: 1,
                active,
            }));
        }
        let removed = arena.retain(|e| !matches!(e, Entity::Projectile(p) if !p.active));
        assert_eq!(removed, 2);
        assert_eq!(arena.count_kind(EntityKind::Projectile), 1);
        assert_eq!(arena.count_kind(EntityKind::Wall), 1);
    }
}
