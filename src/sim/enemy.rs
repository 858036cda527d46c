//! Enemies: shared body plus a per-variant targeting policy

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::actor::{Body, Facing, MoveState};
use super::geometry::Rect;
use super::projectile::{ProjectileSpec, Shape};
use super::weapon::Cooldown;
use crate::consts::ENEMY_BULLET_RADIUS;
use crate::level::EnemySpawn;
use crate::tuning::Tuning;

/// Enemy variant tag used in level config
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyVariant {
    /// Hurts only by contact
    #[default]
    Melee,
    /// Periodically shoots straight at the player
    Ranged,
    /// Shoots horizontally when the player is in its sight line
    Horizontal,
}

/// What an enemy knows about its target this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub center: Vec2,
    pub rect: Rect,
}

/// A request to spawn one enemy bullet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireIntent {
    pub origin: Vec2,
    /// Unit direction
    pub dir: Vec2,
    pub speed: f32,
    pub damage: i32,
}

impl FireIntent {
    pub fn to_spec(self, range: f32) -> ProjectileSpec {
        ProjectileSpec {
            origin: self.origin,
            pos: self.origin,
            vel: self.dir * self.speed,
            damage: self.damage,
            range,
            pierces_platforms: false,
            destroy_on_hit: true,
            shape: Shape::Circle { radius: ENEMY_BULLET_RADIUS },
        }
    }
}

/// Variant-specific firing policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Behavior {
    Melee,
    Ranged {
        cooldown: Cooldown,
        bullet_speed: f32,
    },
    Horizontal {
        cooldown: Cooldown,
        bullet_speed: f32,
        sight_range: f32,
    },
}

impl Behavior {
    /// Build the policy for a variant; cooldowns start at `now`
    pub fn for_variant(variant: EnemyVariant, tuning: &Tuning, now: f64) -> Self {
        match variant {
            EnemyVariant::Melee => Behavior::Melee,
            EnemyVariant::Ranged => Behavior::Ranged {
                cooldown: Cooldown::primed_at(tuning.ranged_fire_interval, now),
                bullet_speed: tuning.ranged_bullet_speed,
            },
            EnemyVariant::Horizontal => Behavior::Horizontal {
                cooldown: Cooldown::primed_at(tuning.horizontal_fire_interval, now),
                bullet_speed: tuning.horizontal_bullet_speed,
                sight_range: tuning.horizontal_sight_range,
            },
        }
    }

    pub fn variant(&self) -> EnemyVariant {
        match self {
            Behavior::Melee => EnemyVariant::Melee,
            Behavior::Ranged { .. } => EnemyVariant::Ranged,
            Behavior::Horizontal { .. } => EnemyVariant::Horizontal,
        }
    }

    /// Decide whether to shoot this tick
    pub fn decide(&mut self, now: f64, me: &Body, target: Option<&Target>, damage: i32) -> Option<FireIntent> {
        match self {
            Behavior::Melee => None,

            Behavior::Ranged { cooldown, bullet_speed } => {
                if !cooldown.ready(now) {
                    return None;
                }
                // The interval keeps running with or without a target
                cooldown.trigger(now);
                let target = target?;
                let origin = me.center();
                let dir = (target.center - origin).normalize_or_zero();
                let dir = if dir == Vec2::ZERO { Vec2::new(me.facing.sign(), 0.0) } else { dir };
                Some(FireIntent { origin, dir, speed: *bullet_speed, damage })
            }

            Behavior::Horizontal { cooldown, bullet_speed, sight_range } => {
                let target = target?;
                if !can_see(me, target, *sight_range) || !cooldown.ready(now) {
                    return None;
                }
                cooldown.trigger(now);
                Some(FireIntent {
                    origin: me.center(),
                    dir: Vec2::new(me.facing.sign(), 0.0),
                    speed: *bullet_speed,
                    damage,
                })
            }
        }
    }
}

/// Horizontal line of sight: in range, sharing a vertical band, on the faced side
pub fn can_see(me: &Body, target: &Target, sight_range: f32) -> bool {
    let dx = target.center.x - me.center().x;
    if dx.abs() > sight_range {
        return false;
    }
    if !me.rect().overlaps_vertically(&target.rect) {
        return false;
    }
    match me.facing {
        Facing::Right => dx >= 0.0,
        Facing::Left => dx <= 0.0,
    }
}

/// An enemy actor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub body: Body,
    pub behavior: Behavior,
}

impl Enemy {
    pub fn from_spawn(id: u32, spawn: &EnemySpawn, tuning: &Tuning, now: f64) -> Self {
        let body = Body::spawn(Vec2::new(spawn.x, spawn.y), tuning.enemy_size, spawn.hp, spawn.facing);
        Self { id, body, behavior: Behavior::for_variant(spawn.variant, tuning, now) }
    }

    pub fn variant(&self) -> EnemyVariant {
        self.behavior.variant()
    }

    pub fn is_alive(&self) -> bool {
        self.body.is_alive()
    }

    /// Advance one tick: timers, facing, firing decision and gravity
    pub fn update(&mut self, now: f64, dt: f32, target: Option<&Target>, tuning: &Tuning) -> Option<FireIntent> {
        if self.body.is_dead() {
            return None;
        }
        self.body.expire_timers(now);

        let knocked = self.body.is_knocked_back(now);
        let intent = if knocked {
            None
        } else {
            let variant = self.variant();
            let center = self.body.center();
            // Only the horizontal shooter is locked to its spawn facing
            if variant != EnemyVariant::Horizontal {
                if let Some(t) = target {
                    self.body.facing = self.body.facing.toward(t.center.x - center.x);
                }
            }
            self.body.aim = match (variant, target) {
                (EnemyVariant::Ranged, Some(t)) => (t.center - center).normalize_or(self.body.aim),
                _ => Vec2::new(self.body.facing.sign(), 0.0),
            };
            self.behavior.decide(now, &self.body, target, tuning.enemy_bullet_damage)
        };

        if knocked {
            self.body.state = MoveState::Knockback;
        } else {
            self.body.state = MoveState::Idle;
            self.body.vel.x = 0.0;
        }
        self.body.integrate(dt, tuning.gravity, tuning.max_fall_speed);
        intent
    }
}
