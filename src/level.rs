//! Level configuration
//!
//! - Authored levels come from JSON (`LevelConfig::from_json`)
//! - Three built-in levels chain into each other (`builtin`)
//! - `generate` builds a seeded random level of platform rows
//!
//! Rectangles are top-left based. Player and enemy spawn points are actor
//! centers.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::{MIN_WORLD_WIDTH, SAFETY_FLOOR_THICKNESS, WORLD_EXIT_MARGIN, WORLD_HEIGHT};
use crate::error::ConfigError;
use crate::sim::actor::Facing;
use crate::sim::enemy::EnemyVariant;
use crate::sim::geometry::{Platform, PlatformKind, Rect, World};

fn default_enemy_facing() -> Facing {
    Facing::Left
}

/// One enemy placement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    /// Center x
    pub x: f32,
    /// Center y
    pub y: f32,
    pub hp: i32,
    #[serde(default)]
    pub variant: EnemyVariant,
    #[serde(default = "default_enemy_facing")]
    pub facing: Facing,
}

impl EnemySpawn {
    pub fn new(x: f32, y: f32, hp: i32, variant: EnemyVariant) -> Self {
        Self { x, y, hp, variant, facing: Facing::Left }
    }
}

/// Static description of one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub id: u32,
    pub name: String,
    /// Level to load after this one (`None` = last level)
    #[serde(default)]
    pub next_level_id: Option<u32>,
    #[serde(default)]
    pub platforms: Vec<Platform>,
    #[serde(default)]
    pub enemies: Vec<EnemySpawn>,
    pub exit_zone: Rect,
    /// Player spawn center; required to start a session
    #[serde(default)]
    pub player_start: Option<Vec2>,
    /// Explicit world size; derived from the exit zone when absent
    #[serde(default)]
    pub world_size: Option<Vec2>,
}

impl LevelConfig {
    /// Parse and validate a level
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let level: LevelConfig = serde_json::from_str(json)?;
        level.validate()?;
        Ok(level)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let start = self.player_start.ok_or(ConfigError::MissingPlayerStart { level_id: self.id })?;
        if !start.is_finite() {
            return Err(ConfigError::MissingPlayerStart { level_id: self.id });
        }

        for (index, platform) in self.platforms.iter().enumerate() {
            if !platform.rect.is_valid() {
                return Err(ConfigError::InvalidPlatform {
                    index,
                    reason: format!("size must be positive and finite, got {:?}", platform.rect),
                });
            }
        }

        for (index, enemy) in self.enemies.iter().enumerate() {
            let reason = if enemy.hp <= 0 {
                Some(format!("hp must be > 0, got {}", enemy.hp))
            } else if !(enemy.x.is_finite() && enemy.y.is_finite()) {
                Some("position must be finite".to_string())
            } else {
                None
            };
            if let Some(reason) = reason {
                return Err(ConfigError::InvalidEnemy { index, reason });
            }
        }

        if !self.exit_zone.is_valid() {
            return Err(ConfigError::InvalidExitZone(format!("{:?}", self.exit_zone)));
        }

        match self.world_size {
            Some(size) if !(size.is_finite() && size.x > 0.0 && size.y > 0.0) => {
                Err(ConfigError::InvalidWorldSize { width: size.x, height: size.y })
            }
            _ => Ok(()),
        }
    }

    /// World bounds: explicit size, or wide enough to run past the exit
    pub fn world_bounds(&self) -> Rect {
        let size = self.world_size.unwrap_or_else(|| {
            let width = MIN_WORLD_WIDTH.max(self.exit_zone.center().x + WORLD_EXIT_MARGIN);
            Vec2::new(width, WORLD_HEIGHT)
        });
        Rect::new(0.0, 0.0, size.x, size.y)
    }

    /// Level platforms plus a solid floor just under the bottom edge
    pub fn build_world(&self) -> World {
        let bounds = self.world_bounds();
        let mut platforms = self.platforms.clone();
        platforms.push(Platform::solid(0.0, bounds.bottom(), bounds.w, SAFETY_FLOOR_THICKNESS));
        World::new(bounds, platforms)
    }
}

/// Convert center-based authoring coordinates to a top-left rect
fn centered(x: f32, y: f32, w: f32, h: f32) -> Rect {
    Rect::from_center(Vec2::new(x, y), Vec2::new(w, h))
}

fn ledge(kind: PlatformKind, x: f32, y: f32, w: f32, h: f32) -> Platform {
    Platform { rect: centered(x, y, w, h), kind }
}

/// The shipped levels, in play order
pub fn builtin_levels() -> Vec<LevelConfig> {
    use EnemyVariant::{Horizontal, Melee, Ranged};
    use PlatformKind::{OneWay, Solid};

    vec![
        LevelConfig {
            id: 1,
            name: "The Beginning".to_string(),
            next_level_id: Some(2),
            platforms: vec![
                ledge(Solid, 400.0, 550.0, 200.0, 32.0),
                ledge(Solid, 800.0, 450.0, 200.0, 32.0),
                ledge(Solid, 1200.0, 550.0, 200.0, 32.0),
            ],
            enemies: vec![EnemySpawn::new(600.0, 400.0, 30, Melee), EnemySpawn::new(1300.0, 400.0, 30, Melee)],
            exit_zone: centered(1500.0, 500.0, 50.0, 200.0),
            player_start: Some(Vec2::new(100.0, 400.0)),
            world_size: None,
        },
        LevelConfig {
            id: 2,
            name: "The Ascent".to_string(),
            next_level_id: Some(3),
            platforms: vec![
                ledge(OneWay, 300.0, 500.0, 150.0, 32.0),
                ledge(OneWay, 500.0, 400.0, 150.0, 32.0),
                ledge(OneWay, 700.0, 300.0, 150.0, 32.0),
                ledge(OneWay, 900.0, 200.0, 150.0, 32.0),
                ledge(Solid, 1200.0, 500.0, 400.0, 32.0),
            ],
            enemies: vec![
                EnemySpawn::new(500.0, 300.0, 50, Ranged),
                EnemySpawn::new(700.0, 200.0, 50, Melee),
                EnemySpawn::new(1200.0, 400.0, 50, Horizontal),
            ],
            exit_zone: centered(1500.0, 450.0, 50.0, 200.0),
            player_start: Some(Vec2::new(50.0, 500.0)),
            world_size: None,
        },
        LevelConfig {
            id: 3,
            name: "The Gauntlet".to_string(),
            next_level_id: None,
            platforms: [300.0, 500.0, 700.0, 900.0, 1100.0]
                .into_iter()
                .map(|x| ledge(Solid, x, 550.0, 100.0, 32.0))
                .collect(),
            enemies: [(300.0, Melee), (500.0, Horizontal), (700.0, Ranged), (900.0, Horizontal), (1100.0, Melee)]
                .into_iter()
                .map(|(x, variant)| EnemySpawn::new(x, 450.0, 20, variant))
                .collect(),
            exit_zone: centered(1300.0, 500.0, 50.0, 200.0),
            player_start: Some(Vec2::new(50.0, 500.0)),
            world_size: None,
        },
    ]
}

/// Look up a built-in level by id
pub fn builtin(id: u32) -> Result<LevelConfig, ConfigError> {
    builtin_levels()
        .into_iter()
        .find(|level| level.id == id)
        .ok_or(ConfigError::UnknownLevel(id))
}

/// Seeded random level: a ground strip, a low row of solid ledges and a
/// high row of one-way ledges. Same seed, same level.
pub fn generate(seed: u64, width: f32) -> LevelConfig {
    let mut rng = Pcg32::seed_from_u64(seed);
    let width = width.max(MIN_WORLD_WIDTH);
    let h = WORLD_HEIGHT;

    let mut platforms = vec![Platform::solid(0.0, h - 64.0, width, 64.0)];
    let mut enemies = Vec::new();

    let mut x = 400.0;
    let mut i = 0;
    while x < width - 200.0 {
        let y = rng.random_range(h - 250.0..=h - 150.0);
        let w = rng.random_range(100.0..=200.0);
        platforms.push(ledge(PlatformKind::Solid, x, y, w, 32.0));
        if i % 2 == 1 {
            let variant = match rng.random_range(0..3) {
                0 => EnemyVariant::Melee,
                1 => EnemyVariant::Ranged,
                _ => EnemyVariant::Horizontal,
            };
            // Standing on the ledge it spawns over
            enemies.push(EnemySpawn::new(x, y - 16.0 - 30.0, 30, variant));
        }
        x += 300.0;
        i += 1;
    }

    let mut x = 600.0;
    while x < width - 200.0 {
        let y = rng.random_range(h - 450.0..=h - 350.0);
        let w = rng.random_range(100.0..=150.0);
        platforms.push(ledge(PlatformKind::OneWay, x, y, w, 32.0));
        x += 500.0;
    }

    LevelConfig {
        id: 0,
        name: format!("Generated #{seed}"),
        next_level_id: None,
        platforms,
        enemies,
        exit_zone: Rect::new(width - 100.0, h - 264.0, 50.0, 200.0),
        player_start: Some(Vec2::new(100.0, h - 150.0)),
        world_size: Some(Vec2::new(width, h)),
    }
}
