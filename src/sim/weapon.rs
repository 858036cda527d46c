//! Weapons: fire-rate gating and spread fan-out
//!
//! A weapon is an immutable [`WeaponConfig`] plus a [`Cooldown`]. Firing
//! turns one trigger pull into projectiles in the caller's collection.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::projectile::{ProjectileSpec, Projectiles, Shape};
use crate::consts::{LASER_LENGTH, LASER_WIDTH, PLAYER_BULLET_RADIUS};
use crate::error::ConfigError;
use crate::{angle_to_dir, dir_to_angle};

/// What a trigger pull produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectileKind {
    #[default]
    Ballistic,
    /// Trailing segments that pass through platforms
    Laser,
}

fn default_true() -> bool {
    true
}

fn default_segments() -> u32 {
    3
}

/// Immutable weapon description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponConfig {
    pub name: String,
    /// Seconds between shots
    pub fire_interval: f64,
    /// Projectile speed (pixels/s)
    pub speed: f32,
    pub damage: i32,
    /// Max travel distance (pixels)
    pub range: f32,
    /// Projectiles per shot
    pub count: u32,
    /// Total fan-out angle in degrees
    pub spread_deg: f32,
    /// Bullets survive platform contact
    #[serde(default)]
    pub pierces_platforms: bool,
    /// Bullets disappear after damaging an enemy
    #[serde(default = "default_true")]
    pub destroy_on_hit: bool,
    #[serde(default)]
    pub kind: ProjectileKind,
    /// Segments per laser beam
    #[serde(default = "default_segments")]
    pub laser_segments: u32,
    /// Keeps firing while the trigger is held instead of once per press
    #[serde(default)]
    pub automatic: bool,
}

impl WeaponConfig {
    /// Single-shot workhorse
    pub fn rifle() -> Self {
        Self {
            name: "Rifle".to_string(),
            fire_interval: 0.15,
            speed: 600.0,
            damage: 10,
            range: 600.0,
            count: 1,
            spread_deg: 0.0,
            pierces_platforms: false,
            destroy_on_hit: true,
            kind: ProjectileKind::Ballistic,
            laser_segments: 0,
            automatic: false,
        }
    }

    /// Five-way fan
    pub fn spread_gun() -> Self {
        Self {
            name: "Spread".to_string(),
            fire_interval: 0.5,
            speed: 500.0,
            damage: 8,
            range: 400.0,
            count: 5,
            spread_deg: 30.0,
            pierces_platforms: false,
            destroy_on_hit: true,
            kind: ProjectileKind::Ballistic,
            laser_segments: 0,
            automatic: false,
        }
    }

    pub fn laser() -> Self {
        Self {
            name: "Laser".to_string(),
            fire_interval: 0.3,
            speed: 800.0,
            damage: 15,
            range: 700.0,
            count: 1,
            spread_deg: 0.0,
            pierces_platforms: true,
            destroy_on_hit: true,
            kind: ProjectileKind::Laser,
            laser_segments: 4,
            automatic: false,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let bad = |reason: &str| {
            Err(ConfigError::InvalidWeapon { name: self.name.clone(), reason: reason.to_string() })
        };
        if !(self.fire_interval.is_finite() && self.fire_interval >= 0.0) {
            return bad("fire_interval must be >= 0");
        }
        if !(self.speed.is_finite() && self.speed > 0.0) {
            return bad("speed must be > 0");
        }
        if !(self.range.is_finite() && self.range > 0.0) {
            return bad("range must be > 0");
        }
        if self.damage < 0 {
            return bad("damage must be >= 0");
        }
        if self.count == 0 {
            return bad("count must be >= 1");
        }
        if !(self.spread_deg.is_finite() && self.spread_deg >= 0.0) {
            return bad("spread_deg must be >= 0");
        }
        if self.kind == ProjectileKind::Laser && self.laser_segments == 0 {
            return bad("laser needs at least one segment");
        }
        Ok(())
    }
}

/// The weapons a player starts with
pub fn default_loadout() -> Vec<WeaponConfig> {
    vec![WeaponConfig::rifle(), WeaponConfig::spread_gun(), WeaponConfig::laser()]
}

/// Fire-rate gate: ready strictly after `last + interval`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cooldown {
    pub interval: f64,
    /// Time of the last trigger; `None` = never fired
    pub last: Option<f64>,
}

impl Cooldown {
    pub fn new(interval: f64) -> Self {
        Self { interval, last: None }
    }

    /// Gate that counts as having fired at `at` (delays the first shot)
    pub fn primed_at(interval: f64, at: f64) -> Self {
        Self { interval, last: Some(at) }
    }

    pub fn ready(&self, now: f64) -> bool {
        match self.last {
            Some(last) => now > last + self.interval,
            None => true,
        }
    }

    pub fn trigger(&mut self, now: f64) {
        self.last = Some(now);
    }
}

/// Evenly distributed shot angles (degrees) centered on `base_deg`
pub fn spread_angles_deg(base_deg: f32, count: u32, spread_deg: f32) -> Vec<f32> {
    match count {
        0 => Vec::new(),
        1 => vec![base_deg],
        n => {
            let start = base_deg - spread_deg / 2.0;
            let step = spread_deg / (n - 1) as f32;
            (0..n).map(|i| start + step * i as f32).collect()
        }
    }
}

/// A weapon in an inventory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weapon {
    pub config: WeaponConfig,
    pub cooldown: Cooldown,
}

impl Weapon {
    pub fn new(config: WeaponConfig) -> Self {
        let cooldown = Cooldown::new(config.fire_interval);
        Self { config, cooldown }
    }

    pub fn can_fire(&self, now: f64) -> bool {
        self.cooldown.ready(now)
    }

    /// Pull the trigger
    ///
    /// Does nothing while cooling down. Otherwise records the shot and spawns
    /// the fan of projectiles into `out`, returning how many were spawned.
    pub fn fire(&mut self, origin: Vec2, aim: Vec2, now: f64, out: &mut Projectiles) -> usize {
        if !self.can_fire(now) {
            return 0;
        }
        self.cooldown.trigger(now);

        let aim = if aim == Vec2::ZERO { Vec2::X } else { aim };
        let base_deg = dir_to_angle(aim).to_degrees();
        let cfg = &self.config;
        let mut spawned = 0;

        for deg in spread_angles_deg(base_deg, cfg.count, cfg.spread_deg) {
            let dir = angle_to_dir(deg.to_radians());
            let vel = dir * cfg.speed;
            match cfg.kind {
                ProjectileKind::Ballistic => {
                    out.spawn(ProjectileSpec {
                        origin,
                        pos: origin,
                        vel,
                        damage: cfg.damage,
                        range: cfg.range,
                        pierces_platforms: cfg.pierces_platforms,
                        destroy_on_hit: cfg.destroy_on_hit,
                        shape: Shape::Circle { radius: PLAYER_BULLET_RADIUS },
                    });
                    spawned += 1;
                }
                ProjectileKind::Laser => {
                    let segments = cfg.laser_segments.max(1);
                    let seg_len = LASER_LENGTH / segments as f32;
                    let half_extents = Vec2::new(
                        dir.x.abs() * seg_len / 2.0 + dir.y.abs() * LASER_WIDTH / 2.0,
                        dir.y.abs() * seg_len / 2.0 + dir.x.abs() * LASER_WIDTH / 2.0,
                    );
                    for i in 0..segments {
                        // Head segment just behind the muzzle, the rest trailing
                        let offset = seg_len * (i as f32 + 0.5);
                        out.spawn(ProjectileSpec {
                            origin,
                            pos: origin - dir * offset,
                            vel,
                            damage: cfg.damage,
                            range: cfg.range,
                            pierces_platforms: true,
                            destroy_on_hit: true,
                            shape: Shape::Segment { half_extents },
                        });
                        spawned += 1;
                    }
                }
            }
        }

        log::trace!("{} fired {} projectile(s) at t={:.3}", cfg.name, spawned, now);
        spawned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::projectile::Owner;
    use proptest::prelude::*;

    #[test]
    fn test_spread_five_over_thirty() {
        assert_eq!(spread_angles_deg(0.0, 5, 30.0), vec![-15.0, -7.5, 0.0, 7.5, 15.0]);
    }

    #[test]
    fn test_single_projectile_ignores_spread() {
        assert_eq!(spread_angles_deg(45.0, 1, 90.0), vec![45.0]);
    }

    #[test]
    fn test_fire_rate_boundary_is_rejected() {
        let mut weapon = Weapon::new(WeaponConfig::rifle()); // 0.15 s
        let mut out = Projectiles::new(Owner::Player);
        assert_eq!(weapon.fire(Vec2::ZERO, Vec2::X, 1.0, &mut out), 1);
        assert!(!weapon.can_fire(1.0 + 0.15));
        assert_eq!(weapon.fire(Vec2::ZERO, Vec2::X, 1.0 + 0.15, &mut out), 0);
        assert_eq!(weapon.fire(Vec2::ZERO, Vec2::X, 1.2, &mut out), 1);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_cooldown_does_not_advance_on_rejected_shot() {
        let mut weapon = Weapon::new(WeaponConfig::spread_gun()); // 0.5 s
        let mut out = Projectiles::new(Owner::Player);
        weapon.fire(Vec2::ZERO, Vec2::X, 0.0, &mut out);
        weapon.fire(Vec2::ZERO, Vec2::X, 0.25, &mut out);
        assert_eq!(weapon.cooldown.last, Some(0.0));
        assert!(weapon.can_fire(0.5001));
    }

    #[test]
    fn test_spread_gun_velocities() {
        let mut weapon = Weapon::new(WeaponConfig::spread_gun());
        let mut out = Projectiles::new(Owner::Player);
        assert_eq!(weapon.fire(Vec2::new(5.0, 5.0), Vec2::X, 0.0, &mut out), 5);
        for p in out.iter() {
            assert!((p.vel.length() - 500.0).abs() < 1e-3);
            assert_eq!(p.origin, Vec2::new(5.0, 5.0));
            assert!(!p.pierces_platforms);
            assert!(p.destroy_on_hit);
        }
        // Middle bullet flies straight along the aim
        let mid = out.iter().nth(2).unwrap();
        assert!(mid.vel.y.abs() < 1e-3);
    }

    #[test]
    fn test_laser_segments_trail_the_muzzle() {
        let mut weapon = Weapon::new(WeaponConfig::laser());
        let mut out = Projectiles::new(Owner::Player);
        let muzzle = Vec2::new(100.0, 100.0);
        assert_eq!(weapon.fire(muzzle, Vec2::X, 0.0, &mut out), 4);

        let xs: Vec<f32> = out.iter().map(|p| p.pos.x).collect();
        assert_eq!(xs, vec![92.0, 76.0, 60.0, 44.0]);
        for p in out.iter() {
            assert_eq!(p.origin, muzzle);
            assert!(p.pierces_platforms);
            assert!(p.destroy_on_hit);
            assert_eq!(p.shape, Shape::Segment { half_extents: Vec2::new(8.0, 1.5) });
        }
    }

    #[test]
    fn test_validate() {
        assert!(default_loadout().iter().all(|w| w.validate().is_ok()));
        let mut w = WeaponConfig::rifle();
        w.count = 0;
        assert!(matches!(w.validate(), Err(ConfigError::InvalidWeapon { .. })));
        let mut l = WeaponConfig::laser();
        l.laser_segments = 0;
        assert!(l.validate().is_err());
    }

    #[test]
    fn test_weapon_config_json_defaults() {
        let json = r#"{
            "name": "Pistol", "fire_interval": 0.4, "speed": 450.0,
            "damage": 5, "range": 300.0, "count": 1, "spread_deg": 0.0
        }"#;
        let cfg: WeaponConfig = serde_json::from_str(json).unwrap();
        assert!(cfg.destroy_on_hit);
        assert!(!cfg.pierces_platforms);
        assert_eq!(cfg.kind, ProjectileKind::Ballistic);
    }

    proptest! {
        #[test]
        fn prop_spread_is_symmetric(base in -180.0f32..180.0, count in 2u32..12, spread in 0.0f32..180.0) {
            let angles = spread_angles_deg(base, count, spread);
            prop_assert_eq!(angles.len(), count as usize);
            let first = angles[0];
            let last = angles[angles.len() - 1];
            prop_assert!((first - (base - spread / 2.0)).abs() < 1e-3);
            prop_assert!((last - (base + spread / 2.0)).abs() < 1e-3);
            prop_assert!(((first + last) / 2.0 - base).abs() < 1e-3);
        }

        #[test]
        fn prop_no_fire_before_interval(t0 in 0.0f64..100.0, dt in 0.0f64..0.15) {
            let mut weapon = Weapon::new(WeaponConfig::rifle());
            let mut out = Projectiles::new(Owner::Player);
            prop_assert_eq!(weapon.fire(Vec2::ZERO, Vec2::X, t0, &mut out), 1);
            prop_assert_eq!(weapon.fire(Vec2::ZERO, Vec2::X, t0 + dt, &mut out), 0);
        }
    }
}
