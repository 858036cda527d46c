//! Player controller: input to movement, aim, hitbox and firing

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::actor::{Body, Facing, MoveState, resolve_aim};
use super::input::InputState;
use super::projectile::Projectiles;
use super::weapon::{Weapon, WeaponConfig};
use crate::error::ConfigError;
use crate::tuning::Tuning;

/// What happened during a player update that the session reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerUpdate {
    /// New active weapon index, if it changed
    pub switched_to: Option<usize>,
    /// Projectiles spawned this step
    pub shots: usize,
}

/// The player actor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    weapons: Vec<Weapon>,
    active: usize,
    /// One-way platforms are ignored while `now` is before this time
    pub drop_through_until: Option<f64>,
}

impl Player {
    /// Spawn centered on `center` with the given loadout
    pub fn new(center: Vec2, loadout: Vec<WeaponConfig>, tuning: &Tuning) -> Result<Self, ConfigError> {
        if loadout.is_empty() {
            return Err(ConfigError::NoWeapons);
        }
        for cfg in &loadout {
            cfg.validate()?;
        }
        let body = Body::spawn(center, tuning.player_hitboxes.idle, tuning.player_max_health, Facing::Right);
        Ok(Self {
            body,
            weapons: loadout.into_iter().map(Weapon::new).collect(),
            active: 0,
            drop_through_until: None,
        })
    }

    pub fn weapons(&self) -> &[Weapon] {
        &self.weapons
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_weapon(&self) -> &Weapon {
        &self.weapons[self.active]
    }

    pub fn is_dropping(&self, now: f64) -> bool {
        self.drop_through_until.is_some_and(|t| now < t)
    }

    /// Select a slot, clamped to the inventory. Returns true on change.
    pub fn select_weapon(&mut self, index: usize) -> bool {
        let index = index.min(self.weapons.len() - 1);
        let changed = index != self.active;
        self.active = index;
        changed
    }

    /// Step through the inventory with wrap-around. Returns true on change.
    pub fn cycle_weapon(&mut self, delta: i32) -> bool {
        let len = self.weapons.len() as i64;
        let index = (self.active as i64 + delta as i64).rem_euclid(len) as usize;
        self.select_weapon(index)
    }

    fn handle_weapon_switch(&mut self, input: &InputState) -> Option<usize> {
        let changed = if let Some(slot) = input.select_weapon {
            self.select_weapon(slot)
        } else if input.next_weapon_pressed && !input.prev_weapon_pressed {
            self.cycle_weapon(1)
        } else if input.prev_weapon_pressed && !input.next_weapon_pressed {
            self.cycle_weapon(-1)
        } else {
            false
        };
        if changed {
            log::debug!("Switched to weapon {} ({})", self.active, self.active_weapon().config.name);
            Some(self.active)
        } else {
            None
        }
    }

    /// Advance one step from input
    ///
    /// `body.grounded` must hold the ground contact from the previous
    /// collision pass. Bullets fired this step go into `bullets`.
    pub fn update(
        &mut self,
        input: &InputState,
        now: f64,
        dt: f32,
        tuning: &Tuning,
        bullets: &mut Projectiles,
    ) -> PlayerUpdate {
        let mut out = PlayerUpdate::default();
        if self.body.is_dead() {
            return out;
        }

        self.body.expire_timers(now);
        if self.drop_through_until.is_some_and(|t| now >= t) {
            self.drop_through_until = None;
        }

        out.switched_to = self.handle_weapon_switch(input);

        if self.body.is_knocked_back(now) {
            self.body.state = MoveState::Knockback;
            self.body.resize_anchored(tuning.player_hitboxes.knockback);
            self.body.integrate(dt, tuning.gravity, tuning.max_fall_speed);
            return out;
        }

        let horizontal = input.horizontal();
        let grounded = self.body.grounded;
        self.body.facing = self.body.facing.toward(horizontal as f32);

        let aim = resolve_aim(self.body.facing, horizontal, input.vertical(), grounded);
        self.body.aim = aim.dir;

        // Only from an established prone pose; `state` still holds last step's
        if aim.prone && self.body.state == MoveState::Prone && input.jump_pressed {
            self.drop_through_until = Some(now + tuning.drop_through_secs);
        }

        self.body.vel.x = if aim.prone { 0.0 } else { horizontal as f32 * tuning.run_speed };

        let wants_jump = input.jump || input.jump_pressed;
        if wants_jump && grounded && !aim.prone {
            self.body.vel.y = tuning.jump_impulse;
            self.body.grounded = false;
        }

        self.body.state = if !self.body.grounded {
            MoveState::Jumping
        } else if aim.prone {
            MoveState::Prone
        } else if horizontal != 0 {
            MoveState::Running
        } else {
            MoveState::Idle
        };
        self.body.resize_anchored(tuning.player_hitboxes.for_state(self.body.state));

        let weapon = &mut self.weapons[self.active];
        if input.fire_pressed || (input.fire && weapon.config.automatic) {
            out.shots = weapon.fire(self.body.center(), aim.dir, now, bullets);
        }

        self.body.integrate(dt, tuning.gravity, tuning.max_fall_speed);
        out
    }
}
