//! Contra Clone - combat simulation core for a side-scrolling run-and-gun
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, weapons, enemy AI, collisions)
//! - `level`: Level configuration, built-in levels and procedural generation
//! - `tuning`: Data-driven game balance
//! - `error`: Load-time configuration errors

pub mod error;
pub mod level;
pub mod sim;
pub mod tuning;

pub use error::ConfigError;
pub use level::LevelConfig;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for stable platform contact)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default world height when a level doesn't specify one
    pub const WORLD_HEIGHT: f32 = 600.0;
    /// Minimum world width
    pub const MIN_WORLD_WIDTH: f32 = 1600.0;
    /// Space left to the right of the exit zone
    pub const WORLD_EXIT_MARGIN: f32 = 200.0;
    /// Safety floor thickness (sits just below the world bottom edge)
    pub const SAFETY_FLOOR_THICKNESS: f32 = 20.0;

    /// Player bullet radius
    pub const PLAYER_BULLET_RADIUS: f32 = 4.0;
    /// Enemy bullet radius
    pub const ENEMY_BULLET_RADIUS: f32 = 5.0;

    /// Total length of one laser shot, split across its segments
    pub const LASER_LENGTH: f32 = 64.0;
    /// Laser segment thickness
    pub const LASER_WIDTH: f32 = 3.0;

    /// Contact tolerance for "resting on" checks (pixels)
    pub const CONTACT_EPSILON: f32 = 0.5;
}

/// Unit vector for an angle in radians (y grows downward, like screen space)
#[inline]
pub fn angle_to_dir(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

/// Angle of a direction vector in radians
#[inline]
pub fn dir_to_angle(dir: Vec2) -> f32 {
    dir.y.atan2(dir.x)
}
