//! Read-only views handed to rendering / game-flow code, plus the events
//! raised during a step

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::actor::{Body, Facing, MoveState};
use super::enemy::{Enemy, EnemyVariant};
use super::projectile::{Owner, Projectile, Shape};

/// Something the game-flow or presentation layer should react to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// Player reached the exit zone (raised once per session)
    LevelCompleted { level_id: u32, next_level_id: Option<u32> },
    PlayerDied,
    PlayerHit { damage: i32, health: i32 },
    EnemyKilled { id: u32 },
    WeaponSwitched { index: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorView {
    /// Hitbox top-left
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    pub health: i32,
    pub max_health: i32,
    pub facing: Facing,
    pub state: MoveState,
    pub aim: Vec2,
    pub invulnerable: bool,
}

impl ActorView {
    pub fn of(body: &Body, now: f64) -> Self {
        Self {
            pos: body.pos,
            size: body.size,
            vel: body.vel,
            health: body.health,
            max_health: body.max_health,
            facing: body.facing,
            state: body.state,
            aim: body.aim,
            invulnerable: body.is_invulnerable(now),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyView {
    pub id: u32,
    pub variant: EnemyVariant,
    pub actor: ActorView,
}

impl EnemyView {
    pub fn of(enemy: &Enemy, now: f64) -> Self {
        Self { id: enemy.id, variant: enemy.variant(), actor: ActorView::of(&enemy.body, now) }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileView {
    pub id: u32,
    pub owner: Owner,
    pub pos: Vec2,
    pub vel: Vec2,
    pub shape: Shape,
}

impl From<&Projectile> for ProjectileView {
    fn from(p: &Projectile) -> Self {
        Self { id: p.id, owner: p.owner, pos: p.pos, vel: p.vel, shape: p.shape }
    }
}

/// Full state after one step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub time: f64,
    pub level_id: u32,
    pub player: ActorView,
    pub active_weapon: usize,
    pub active_weapon_name: String,
    pub enemies: Vec<EnemyView>,
    pub player_bullets: Vec<ProjectileView>,
    pub enemy_bullets: Vec<ProjectileView>,
    pub completed: bool,
    pub player_dead: bool,
    /// Raised during this step, in order
    pub events: Vec<GameEvent>,
}
