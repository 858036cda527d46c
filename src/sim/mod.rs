//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time comes from the caller, never from a system clock
//! - Stable iteration order (level order for platforms and enemies, spawn
//!   order for projectiles)
//! - No rendering, audio or input-device dependencies

pub mod actor;
pub mod collision;
pub mod enemy;
pub mod geometry;
pub mod input;
pub mod player;
pub mod projectile;
pub mod resolve;
pub mod session;
pub mod snapshot;
pub mod weapon;

pub use actor::{Aim, Body, Facing, HitOutcome, MoveState, knockback_dir, resolve_aim};
pub use collision::{Contact, resolve_body};
pub use enemy::{Behavior, Enemy, EnemyVariant, FireIntent, Target};
pub use geometry::{Motion, Platform, PlatformKind, Rect, World};
pub use input::InputState;
pub use player::{Player, PlayerUpdate};
pub use projectile::{Owner, Projectile, ProjectileSpec, Projectiles, Shape};
pub use session::LevelSession;
pub use snapshot::{ActorView, EnemyView, GameEvent, ProjectileView, Snapshot};
pub use weapon::{Cooldown, ProjectileKind, Weapon, WeaponConfig, default_loadout, spread_angles_deg};
