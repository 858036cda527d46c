//! Load-time configuration errors
//!
//! Everything that can go wrong is caught when a level session is built.
//! Once the simulation is running, no operation returns an error.

use thiserror::Error;

/// Errors raised while validating level, weapon or tuning configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("player loadout has no weapons")]
    NoWeapons,

    #[error("level {level_id} has no player start")]
    MissingPlayerStart { level_id: u32 },

    #[error("platform #{index}: {reason}")]
    InvalidPlatform { index: usize, reason: String },

    #[error("enemy spawn #{index}: {reason}")]
    InvalidEnemy { index: usize, reason: String },

    #[error("exit zone: {0}")]
    InvalidExitZone(String),

    #[error("world size must be positive, got {width}x{height}")]
    InvalidWorldSize { width: f32, height: f32 },

    #[error("weapon '{name}': {reason}")]
    InvalidWeapon { name: String, reason: String },

    #[error("tuning: {0}")]
    InvalidTuning(String),

    #[error("no built-in level with id {0}")]
    UnknownLevel(u32),

    #[error("malformed config json: {0}")]
    Json(#[from] serde_json::Error),
}
