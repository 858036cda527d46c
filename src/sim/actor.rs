//! Shared actor body and state machine pieces
//!
//! Player and enemies both own a [`Body`]: position, velocity, hitbox,
//! health and the timed damage windows. The variant-specific policy lives in
//! `player.rs` and `enemy.rs`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::tuning::DamageResponse;

/// Discrete movement/combat state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MoveState {
    #[default]
    Idle,
    Running,
    Jumping,
    Prone,
    Knockback,
    /// Terminal
    Dead,
}

/// Which way the actor looks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// -1.0 for left, +1.0 for right
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    /// Facing toward a horizontal offset (zero keeps `self`)
    pub fn toward(self, dx: f32) -> Self {
        if dx > 0.0 {
            Facing::Right
        } else if dx < 0.0 {
            Facing::Left
        } else {
            self
        }
    }
}

/// Result of a damage attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Invulnerable or already dead - nothing changed
    Ignored,
    /// Health went down, actor still alive
    Hurt,
    /// This hit killed the actor
    Killed,
}

/// Result of aim resolution for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aim {
    /// Unit aim vector, never zero
    pub dir: Vec2,
    /// Actor should be (or stay) prone
    pub prone: bool,
}

/// Resolve the aim vector from input intents
///
/// `horizontal` and `vertical` are -1/0/+1 (vertical -1 = aim up).
pub fn resolve_aim(facing: Facing, horizontal: i8, vertical: i8, grounded: bool) -> Aim {
    let facing_x = facing.sign();
    let mut aim = Vec2::new(facing_x, 0.0);
    let mut prone = false;

    if vertical < 0 {
        aim.y = -1.0;
        if horizontal == 0 {
            aim.x = 0.0;
        }
    } else if vertical > 0 {
        if horizontal != 0 {
            aim.y = 1.0;
        } else if grounded {
            prone = true;
        } else {
            aim = Vec2::new(0.0, 1.0);
        }
    }

    let dir = aim.normalize_or_zero();
    let dir = if dir == Vec2::ZERO { Vec2::new(facing_x, 0.0) } else { dir };
    Aim { dir, prone }
}

/// Direction an actor is pushed when hit from `source`
///
/// Points from the source to the actor center, straight up when the two
/// coincide. The result is a unit vector whose upward component is at least
/// `min_lift`; a flatter push keeps its horizontal side.
pub fn knockback_dir(center: Vec2, source: Vec2, min_lift: f32) -> Vec2 {
    let away = (center - source).normalize_or_zero();
    let dir = if away == Vec2::ZERO { Vec2::NEG_Y } else { away };

    // y grows downward: upward lift is a negative y
    let lift = min_lift.clamp(0.0, 1.0).max(f32::EPSILON);
    if dir.y <= -lift {
        return dir;
    }
    let side = if dir.x < 0.0 { -1.0 } else { 1.0 };
    Vec2::new(side * (1.0 - lift * lift).sqrt(), -lift)
}

/// Physical body shared by every actor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner of the hitbox
    pub pos: Vec2,
    /// Position at the start of the last integration step
    pub prev_pos: Vec2,
    pub vel: Vec2,
    /// Hitbox size, always positive
    pub size: Vec2,
    pub health: i32,
    pub max_health: i32,
    pub facing: Facing,
    pub state: MoveState,
    /// Unit aim vector
    pub aim: Vec2,
    /// Standing on something after the last collision pass
    pub grounded: bool,
    /// Invulnerable while `now` is before this time
    pub invulnerable_until: Option<f64>,
    /// Knocked back while `now` is before this time
    pub knockback_until: Option<f64>,
}

impl Body {
    /// Spawn a body centered on `center`
    pub fn spawn(center: Vec2, size: Vec2, max_health: i32, facing: Facing) -> Self {
        let size = sanitize_size(size);
        let max_health = max_health.max(1);
        let pos = center - size / 2.0;
        Self {
            pos,
            prev_pos: pos,
            vel: Vec2::ZERO,
            size,
            health: max_health,
            max_health,
            facing,
            state: MoveState::Idle,
            aim: Vec2::new(facing.sign(), 0.0),
            grounded: false,
            invulnerable_until: None,
            knockback_until: None,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.state == MoveState::Dead
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        !self.is_dead()
    }

    pub fn is_invulnerable(&self, now: f64) -> bool {
        self.invulnerable_until.is_some_and(|t| now < t)
    }

    pub fn is_knocked_back(&self, now: f64) -> bool {
        self.knockback_until.is_some_and(|t| now < t)
    }

    /// Close any damage window whose expiry has passed
    pub fn expire_timers(&mut self, now: f64) {
        if self.invulnerable_until.is_some_and(|t| now >= t) {
            self.invulnerable_until = None;
        }
        if self.knockback_until.is_some_and(|t| now >= t) {
            self.knockback_until = None;
        }
    }

    /// Change the hitbox keeping the feet and horizontal center in place
    pub fn resize_anchored(&mut self, size: Vec2) {
        let size = sanitize_size(size);
        if size == self.size {
            return;
        }
        let bottom = self.bottom();
        let center_x = self.pos.x + self.size.x / 2.0;
        let prev_bottom = self.prev_pos.y + self.size.y;
        let prev_center_x = self.prev_pos.x + self.size.x / 2.0;
        self.size = size;
        self.pos = Vec2::new(center_x - size.x / 2.0, bottom - size.y);
        self.prev_pos = Vec2::new(prev_center_x - size.x / 2.0, prev_bottom - size.y);
    }

    /// Apply gravity and velocity for one step
    pub fn integrate(&mut self, dt: f32, gravity: f32, max_fall: f32) {
        if self.is_dead() {
            return;
        }
        self.prev_pos = self.pos;
        self.vel.y = (self.vel.y + gravity * dt).min(max_fall);
        self.pos += self.vel * dt;
    }

    /// Apply `amount` damage coming from `source`
    ///
    /// No-op while invulnerable or dead. Health clamps at zero and a lethal
    /// hit is final.
    pub fn take_hit(&mut self, amount: i32, source: Vec2, now: f64, response: &DamageResponse) -> HitOutcome {
        if self.is_dead() || self.is_invulnerable(now) {
            return HitOutcome::Ignored;
        }

        let amount = amount.max(0);
        self.health = (self.health - amount).clamp(0, self.max_health);

        if self.health == 0 {
            self.die();
            return HitOutcome::Killed;
        }

        if response.invulnerable_secs > 0.0 {
            self.invulnerable_until = Some(now + response.invulnerable_secs);
        }
        if response.knockback_secs > 0.0 {
            self.knockback_until = Some(now + response.knockback_secs);
            let dir = knockback_dir(self.center(), source, response.knockback_min_lift);
            self.vel = dir * response.knockback_force;
            self.state = MoveState::Knockback;
            self.grounded = false;
        }
        HitOutcome::Hurt
    }

    /// Enter the terminal state
    pub fn die(&mut self) {
        self.health = 0;
        self.state = MoveState::Dead;
        self.vel = Vec2::ZERO;
        self.invulnerable_until = None;
        self.knockback_until = None;
    }
}

fn sanitize_size(size: Vec2) -> Vec2 {
    let fix = |v: f32| if v.is_finite() && v > 0.0 { v } else { 1.0 };
    Vec2::new(fix(size.x), fix(size.y))
}
