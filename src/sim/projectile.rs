//! Projectiles: bullets and laser segments
//!
//! Projectiles move in straight lines with no gravity. They never resolve
//! collisions themselves; they only know how far they've traveled and
//! whether they've left the world.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Rect, World};

/// Who fired a projectile (selects the collision layer)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Player,
    Enemy,
}

/// Collision shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle { radius: f32 },
    /// Axis-aligned box around a (possibly rotated) laser segment
    Segment { half_extents: Vec2 },
}

/// Everything needed to put a projectile into the world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileSpec {
    /// Range is measured from here
    pub origin: Vec2,
    /// Spawn position (laser segments trail behind the origin)
    pub pos: Vec2,
    pub vel: Vec2,
    pub damage: i32,
    pub range: f32,
    pub pierces_platforms: bool,
    pub destroy_on_hit: bool,
    pub shape: Shape,
}

/// A live projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub owner: Owner,
    /// Spawn snapshot, never updated
    pub origin: Vec2,
    pub pos: Vec2,
    pub vel: Vec2,
    pub damage: i32,
    pub range: f32,
    /// Survives platform contact
    pub pierces_platforms: bool,
    /// Destroyed when it damages an actor
    pub destroy_on_hit: bool,
    pub shape: Shape,
    /// Cleared when destroyed; dead projectiles are skipped by every later check
    pub alive: bool,
    /// Enemies already damaged (only grows for bullets that survive hits)
    #[serde(default)]
    pub struck: Vec<u32>,
}

impl Projectile {
    /// Distance traveled from the origin
    pub fn traveled(&self) -> f32 {
        self.pos.distance(self.origin)
    }

    /// Strictly beyond its range
    pub fn out_of_range(&self) -> bool {
        self.traveled() > self.range
    }

    /// Bounding box
    pub fn bounds(&self) -> Rect {
        match self.shape {
            Shape::Circle { radius } => Rect::from_center(self.pos, Vec2::splat(radius * 2.0)),
            Shape::Segment { half_extents } => Rect::from_center(self.pos, half_extents * 2.0),
        }
    }

    /// Overlap test against an actor or platform rectangle
    pub fn overlaps(&self, rect: &Rect) -> bool {
        match self.shape {
            Shape::Circle { radius } => rect.intersects_circle(self.pos, radius),
            Shape::Segment { .. } => self.bounds().intersects(rect),
        }
    }

    pub fn destroy(&mut self) {
        self.alive = false;
    }

    pub fn has_struck(&self, enemy_id: u32) -> bool {
        self.struck.contains(&enemy_id)
    }
}

/// One owner's projectile collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectiles {
    owner: Owner,
    items: Vec<Projectile>,
    next_id: u32,
}

impl Projectiles {
    pub fn new(owner: Owner) -> Self {
        Self { owner, items: Vec::new(), next_id: 1 }
    }

    pub fn owner(&self) -> Owner {
        self.owner
    }

    /// Add a projectile, returning its id
    pub fn spawn(&mut self, spec: ProjectileSpec) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.items.push(Projectile {
            id,
            owner: self.owner,
            origin: spec.origin,
            pos: spec.pos,
            vel: spec.vel,
            damage: spec.damage,
            range: spec.range,
            pierces_platforms: spec.pierces_platforms,
            destroy_on_hit: spec.destroy_on_hit,
            shape: spec.shape,
            alive: true,
            struck: Vec::new(),
        });
        id
    }

    /// Move every projectile and expire those past their range
    ///
    /// Enemy projectiles are also removed once they leave the world.
    pub fn advance(&mut self, dt: f32, world: &World) {
        for p in self.items.iter_mut() {
            p.pos += p.vel * dt;
            if p.out_of_range() {
                p.destroy();
            } else if p.owner == Owner::Enemy && world.out_of_bounds(p.pos) {
                p.destroy();
            }
        }
        self.sweep();
    }

    /// Drop destroyed projectiles
    pub fn sweep(&mut self) {
        self.items.retain(|p| p.alive);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Projectile> {
        self.items.iter_mut()
    }

    /// Live (not yet destroyed) projectiles
    pub fn live_mut(&mut self) -> impl Iterator<Item = &mut Projectile> {
        self.items.iter_mut().filter(|p| p.alive)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn world() -> World {
        World::new(Rect::new(0.0, 0.0, 1000.0, 600.0), Vec::new())
    }

    fn bullet(pos: Vec2, vel: Vec2, range: f32) -> ProjectileSpec {
        ProjectileSpec {
            origin: pos,
            pos,
            vel,
            damage: 10,
            range,
            pierces_platforms: false,
            destroy_on_hit: true,
            shape: Shape::Circle { radius: 4.0 },
        }
    }

    #[test]
    fn test_ids_are_monotonic() {
        let mut list = Projectiles::new(Owner::Player);
        let a = list.spawn(bullet(Vec2::ZERO, Vec2::X, 10.0));
        let b = list.spawn(bullet(Vec2::ZERO, Vec2::X, 10.0));
        assert!(b > a);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_range_expiry_is_strict() {
        let mut list = Projectiles::new(Owner::Player);
        // 100 px/s, 0.5 s steps -> 50 px per advance, range 100
        list.spawn(bullet(Vec2::new(100.0, 100.0), Vec2::new(100.0, 0.0), 100.0));
        list.advance(0.5, &world());
        assert_eq!(list.len(), 1);
        list.advance(0.5, &world());
        // Exactly at the range: still alive
        assert_eq!(list.len(), 1);
        list.advance(0.5, &world());
        assert!(list.is_empty());
    }

    #[test]
    fn test_origin_is_never_moved() {
        let mut list = Projectiles::new(Owner::Player);
        list.spawn(bullet(Vec2::new(10.0, 10.0), Vec2::new(50.0, 0.0), 1000.0));
        list.advance(1.0, &world());
        let p = list.iter().next().unwrap();
        assert_eq!(p.origin, Vec2::new(10.0, 10.0));
        assert_eq!(p.pos, Vec2::new(60.0, 10.0));
    }

    #[test]
    fn test_enemy_bullets_die_out_of_bounds() {
        let mut enemy = Projectiles::new(Owner::Enemy);
        let mut player = Projectiles::new(Owner::Player);
        let spec = bullet(Vec2::new(990.0, 100.0), Vec2::new(100.0, 0.0), 10_000.0);
        enemy.spawn(spec);
        player.spawn(spec);
        enemy.advance(0.5, &world());
        player.advance(0.5, &world());
        assert!(enemy.is_empty());
        assert_eq!(player.len(), 1);
    }

    #[test]
    fn test_segment_overlap_uses_box() {
        let mut list = Projectiles::new(Owner::Player);
        let mut spec = bullet(Vec2::new(50.0, 50.0), Vec2::ZERO, 100.0);
        spec.shape = Shape::Segment { half_extents: Vec2::new(8.0, 1.5) };
        list.spawn(spec);
        let p = list.iter().next().unwrap();
        assert!(p.overlaps(&Rect::new(57.0, 49.0, 10.0, 10.0)));
        assert!(!p.overlaps(&Rect::new(59.0, 49.0, 10.0, 10.0)));
    }

    proptest! {
        #[test]
        fn prop_range_expiry_deterministic(
            angle in 0.0f32..std::f32::consts::TAU,
            speed in 50.0f32..800.0,
            range in 50.0f32..600.0,
        ) {
            let dir = Vec2::new(angle.cos(), angle.sin());
            let origin = Vec2::new(5000.0, 5000.0);
            let world = World::new(Rect::new(0.0, 0.0, 10_000.0, 10_000.0), Vec::new());
            let mut list = Projectiles::new(Owner::Player);
            list.spawn(bullet(origin, dir * speed, range));

            let dt = 1.0 / 60.0;
            for _ in 0..1000 {
                let before = list.iter().next().cloned();
                list.advance(dt, &world);
                match (before, list.iter().next()) {
                    (Some(_), Some(p)) => prop_assert!(p.traveled() <= range),
                    (Some(b), None) => prop_assert!((b.pos + b.vel * dt).distance(origin) > range),
                    (None, _) => break,
                }
            }
            prop_assert!(list.is_empty());
        }
    }
}
