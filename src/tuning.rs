//! Data-driven game balance
//!
//! Every physics and combat constant the simulation reads lives here, so a
//! designer can override them from JSON without touching code.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::actor::MoveState;

/// Hitbox size for each movement state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitboxTable {
    pub idle: Vec2,
    pub running: Vec2,
    pub jumping: Vec2,
    pub prone: Vec2,
    pub knockback: Vec2,
}

impl Default for HitboxTable {
    fn default() -> Self {
        Self {
            idle: Vec2::new(32.0, 64.0),
            running: Vec2::new(30.0, 64.0),
            jumping: Vec2::new(30.0, 44.0),
            prone: Vec2::new(64.0, 32.0),
            knockback: Vec2::new(32.0, 60.0),
        }
    }
}

impl HitboxTable {
    /// Every state uses the same box
    pub fn uniform(size: Vec2) -> Self {
        Self { idle: size, running: size, jumping: size, prone: size, knockback: size }
    }

    /// Hitbox for a state. Dead keeps the standing box.
    pub fn for_state(&self, state: MoveState) -> Vec2 {
        match state {
            MoveState::Idle | MoveState::Dead => self.idle,
            MoveState::Running => self.running,
            MoveState::Jumping => self.jumping,
            MoveState::Prone => self.prone,
            MoveState::Knockback => self.knockback,
        }
    }

    fn all(&self) -> [(&'static str, Vec2); 5] {
        [
            ("idle", self.idle),
            ("running", self.running),
            ("jumping", self.jumping),
            ("prone", self.prone),
            ("knockback", self.knockback),
        ]
    }
}

/// How an actor reacts to taking a hit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageResponse {
    /// Invulnerability window after a hit (seconds, 0 = none)
    pub invulnerable_secs: f64,
    /// Knockback window after a hit (seconds, 0 = immovable)
    pub knockback_secs: f64,
    /// Knockback speed (pixels/s)
    pub knockback_force: f32,
    /// Minimum upward share of the knockback direction (0..1)
    pub knockback_min_lift: f32,
}

impl DamageResponse {
    /// Takes damage but is never pushed around or protected
    pub const IMMOVABLE: Self = Self {
        invulnerable_secs: 0.0,
        knockback_secs: 0.0,
        knockback_force: 0.0,
        knockback_min_lift: 0.0,
    };
}

/// Complete balance sheet
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Movement ===
    /// Downward acceleration (pixels/s²)
    pub gravity: f32,
    /// Terminal falling speed (pixels/s)
    pub max_fall_speed: f32,
    /// Horizontal run speed (pixels/s)
    pub run_speed: f32,
    /// Vertical velocity applied on jump (negative = up)
    pub jump_impulse: f32,
    /// How long a drop-through ignores one-way platforms (seconds)
    pub drop_through_secs: f64,

    // === Player ===
    pub player_max_health: i32,
    pub player_hitboxes: HitboxTable,
    pub player_damage: DamageResponse,

    // === Enemies ===
    pub enemy_size: Vec2,
    pub enemy_damage: DamageResponse,
    /// Damage dealt to the player by touching any enemy
    pub contact_damage: i32,
    pub ranged_fire_interval: f64,
    pub ranged_bullet_speed: f32,
    pub horizontal_fire_interval: f64,
    pub horizontal_bullet_speed: f32,
    /// How far a horizontal shooter can see (pixels)
    pub horizontal_sight_range: f32,
    pub enemy_bullet_damage: i32,
    /// Enemy bullets also expire by distance
    pub enemy_bullet_range: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            // Movement
            gravity: 1200.0,
            max_fall_speed: 900.0,
            run_speed: 200.0,
            jump_impulse: -550.0,
            drop_through_secs: 0.3,

            // Player
            player_max_health: 100,
            player_hitboxes: HitboxTable::default(),
            player_damage: DamageResponse {
                invulnerable_secs: 1.0,
                knockback_secs: 0.25,
                knockback_force: 300.0,
                knockback_min_lift: 0.5,
            },

            // Enemies
            enemy_size: Vec2::new(40.0, 60.0),
            enemy_damage: DamageResponse::IMMOVABLE,
            contact_damage: 10,
            ranged_fire_interval: 2.0,
            ranged_bullet_speed: 300.0,
            horizontal_fire_interval: 1.5,
            horizontal_bullet_speed: 400.0,
            horizontal_sight_range: 500.0,
            enemy_bullet_damage: 10,
            enemy_bullet_range: 1200.0,
        }
    }
}

impl Tuning {
    /// Parse tuning overrides from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation can't run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let bad = |msg: String| Err(ConfigError::InvalidTuning(msg));

        let positive = [
            ("max_fall_speed", self.max_fall_speed as f64),
            ("run_speed", self.run_speed as f64),
            ("drop_through_secs", self.drop_through_secs),
            ("ranged_bullet_speed", self.ranged_bullet_speed as f64),
            ("horizontal_bullet_speed", self.horizontal_bullet_speed as f64),
            ("enemy_bullet_range", self.enemy_bullet_range as f64),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return bad(format!("{name} must be > 0, got {value}"));
            }
        }
        let non_negative = [
            ("gravity", self.gravity as f64),
            ("ranged_fire_interval", self.ranged_fire_interval),
            ("horizontal_fire_interval", self.horizontal_fire_interval),
            ("horizontal_sight_range", self.horizontal_sight_range as f64),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return bad(format!("{name} must be >= 0, got {value}"));
            }
        }
        if !(self.jump_impulse.is_finite() && self.jump_impulse < 0.0) {
            return bad(format!("jump_impulse must point up (< 0), got {}", self.jump_impulse));
        }
        if self.player_max_health <= 0 {
            return bad(format!("player_max_health must be > 0, got {}", self.player_max_health));
        }
        for (state, size) in self.player_hitboxes.all() {
            if !(size.is_finite() && size.x > 0.0 && size.y > 0.0) {
                return bad(format!("player hitbox '{state}' must be positive, got {size}"));
            }
        }
        if !(self.enemy_size.is_finite() && self.enemy_size.x > 0.0 && self.enemy_size.y > 0.0) {
            return bad(format!("enemy_size must be positive, got {}", self.enemy_size));
        }
        for (who, resp) in [("player", &self.player_damage), ("enemy", &self.enemy_damage)] {
            let windows = [resp.invulnerable_secs, resp.knockback_secs];
            if !windows.iter().all(|t| t.is_finite() && *t >= 0.0) {
                return bad(format!("{who} damage windows must be >= 0"));
            }
            if !(resp.knockback_force.is_finite() && resp.knockback_force >= 0.0) {
                return bad(format!("{who} knockback_force must be >= 0, got {}", resp.knockback_force));
            }
            if !(0.0..=1.0).contains(&resp.knockback_min_lift) {
                return bad(format!("{who} knockback_min_lift must be within 0..=1"));
            }
        }
        if self.contact_damage < 0 || self.enemy_bullet_damage < 0 {
            return bad("damage values must be >= 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_from_json_keeps_defaults_for_missing_fields() {
        let tuning = Tuning::from_json(r#"{ "run_speed": 250.0, "contact_damage": 15 }"#).unwrap();
        assert_eq!(tuning.run_speed, 250.0);
        assert_eq!(tuning.contact_damage, 15);
        assert_eq!(tuning.gravity, Tuning::default().gravity);
    }

    #[test]
    fn test_rejects_flat_hitbox() {
        let mut tuning = Tuning::default();
        tuning.player_hitboxes.prone = Vec2::new(64.0, 0.0);
        assert!(matches!(tuning.validate(), Err(ConfigError::InvalidTuning(_))));
    }

    #[test]
    fn test_rejects_downward_jump() {
        let result = Tuning::from_json(r#"{ "jump_impulse": 100.0 }"#);
        assert!(matches!(result, Err(ConfigError::InvalidTuning(_))));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(Tuning::from_json("{ nope"), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_hitbox_lookup() {
        let table = HitboxTable::default();
        assert_eq!(table.for_state(MoveState::Prone), table.prone);
        assert_eq!(table.for_state(MoveState::Dead), table.idle);
    }

    #[test]
    fn test_rejects_bad_speeds_and_ranges() {
        let cases = [
            Tuning { max_fall_speed: f32::NAN, ..Tuning::default() },
            Tuning { run_speed: -1.0, ..Tuning::default() },
            Tuning { drop_through_secs: 0.0, ..Tuning::default() },
            Tuning { ranged_bullet_speed: 0.0, ..Tuning::default() },
            Tuning { horizontal_bullet_speed: f32::INFINITY, ..Tuning::default() },
            Tuning { horizontal_sight_range: -10.0, ..Tuning::default() },
            Tuning { enemy_bullet_range: 0.0, ..Tuning::default() },
        ];
        for tuning in cases {
            assert!(matches!(tuning.validate(), Err(ConfigError::InvalidTuning(_))), "{tuning:?}");
        }
    }

    #[test]
    fn test_rejects_negative_knockback_force() {
        let mut tuning = Tuning::default();
        tuning.player_damage.knockback_force = -300.0;
        assert!(matches!(tuning.validate(), Err(ConfigError::InvalidTuning(_))));

        let json = r#"{ "enemy_damage": { "invulnerable_secs": 0.0, "knockback_secs": 0.0, "knockback_force": -1.0, "knockback_min_lift": 0.0 } }"#;
        assert!(matches!(Tuning::from_json(json), Err(ConfigError::InvalidTuning(_))));
    }
}
