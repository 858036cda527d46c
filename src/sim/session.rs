//! One level being played
//!
//! A step always runs in the same order:
//! 1. Actor update (player input, enemy AI, gravity)
//! 2. Projectile update (movement, range expiry)
//! 3. Collision and damage resolution
//!
//! The session clock starts at 0 when the level loads; `now` passed to
//! [`LevelSession::step`] is measured from there.

use super::enemy::{Enemy, Target};
use super::geometry::{Rect, World};
use super::input::InputState;
use super::player::Player;
use super::projectile::{Owner, Projectiles};
use super::resolve::{Arena, Progress, resolve_step};
use super::snapshot::{ActorView, EnemyView, GameEvent, ProjectileView, Snapshot};
use super::weapon::{WeaponConfig, default_loadout};
use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::error::ConfigError;
use crate::level::LevelConfig;
use crate::tuning::Tuning;

/// Longest frame the fixed-step driver will try to catch up on
const MAX_FRAME_DT: f32 = 0.1;

pub struct LevelSession {
    name: String,
    tuning: Tuning,
    world: World,
    exit_zone: Rect,
    player: Player,
    enemies: Vec<Enemy>,
    player_bullets: Projectiles,
    enemy_bullets: Projectiles,
    progress: Progress,
    /// Time of the last step
    time: f64,
    /// Fixed-step driver state
    accumulator: f32,
    steps: u64,
}

impl LevelSession {
    /// Build a session, failing fast on bad configuration
    pub fn new(level: &LevelConfig, loadout: Vec<WeaponConfig>, tuning: Tuning) -> Result<Self, ConfigError> {
        tuning.validate()?;
        level.validate()?;
        let start = level.player_start.ok_or(ConfigError::MissingPlayerStart { level_id: level.id })?;
        let player = Player::new(start, loadout, &tuning)?;

        let enemies: Vec<Enemy> = level
            .enemies
            .iter()
            .zip(1u32..)
            .map(|(spawn, id)| Enemy::from_spawn(id, spawn, &tuning, 0.0))
            .collect();
        let world = level.build_world();

        log::info!(
            "Loaded level {} '{}': {} platforms, {} enemies, world {}x{}",
            level.id,
            level.name,
            level.platforms.len(),
            enemies.len(),
            world.bounds.w,
            world.bounds.h
        );

        Ok(Self {
            name: level.name.clone(),
            tuning,
            world,
            exit_zone: level.exit_zone,
            player,
            enemies,
            player_bullets: Projectiles::new(Owner::Player),
            enemy_bullets: Projectiles::new(Owner::Enemy),
            progress: Progress { level_id: level.id, next_level_id: level.next_level_id, completed: false },
            time: 0.0,
            accumulator: 0.0,
            steps: 0,
        })
    }

    /// Session with the shipped weapons and default balance
    pub fn with_defaults(level: &LevelConfig) -> Result<Self, ConfigError> {
        Self::new(level, default_loadout(), Tuning::default())
    }

    pub fn level_id(&self) -> u32 {
        self.progress.level_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn is_completed(&self) -> bool {
        self.progress.completed
    }

    pub fn is_player_dead(&self) -> bool {
        self.player.body.is_dead()
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// Advance the simulation by `dt` seconds ending at `now`
    pub fn step(&mut self, input: &InputState, dt: f32, now: f64) -> Snapshot {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let mut events = Vec::new();
        self.time = now;
        self.steps += 1;

        // Actors
        let update = self.player.update(input, now, dt, &self.tuning, &mut self.player_bullets);
        if let Some(index) = update.switched_to {
            events.push(GameEvent::WeaponSwitched { index });
        }

        let target = self
            .player
            .body
            .is_alive()
            .then(|| Target { center: self.player.body.center(), rect: self.player.body.rect() });
        for enemy in self.enemies.iter_mut() {
            if let Some(intent) = enemy.update(now, dt, target.as_ref(), &self.tuning) {
                self.enemy_bullets.spawn(intent.to_spec(self.tuning.enemy_bullet_range));
            }
        }

        // Projectiles
        self.player_bullets.advance(dt, &self.world);
        self.enemy_bullets.advance(dt, &self.world);

        // Collisions
        let mut arena = Arena {
            world: &self.world,
            exit_zone: self.exit_zone,
            player: &mut self.player,
            enemies: &mut self.enemies,
            player_bullets: &mut self.player_bullets,
            enemy_bullets: &mut self.enemy_bullets,
        };
        resolve_step(&mut arena, &mut self.progress, now, &self.tuning, &mut events);

        self.snapshot(events)
    }

    /// Run as many fixed steps as `frame_dt` covers
    ///
    /// Fresh presses are delivered to the first substep only. Returns the
    /// last snapshot with the events of every substep, or `None` if the
    /// frame was too short for a step.
    pub fn advance(&mut self, input: &InputState, frame_dt: f32) -> Option<Snapshot> {
        let frame_dt = if frame_dt.is_finite() { frame_dt.clamp(0.0, MAX_FRAME_DT) } else { 0.0 };
        self.accumulator += frame_dt;

        let mut input = input.clone();
        let mut events = Vec::new();
        let mut last = None;
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let now = (self.steps + 1) as f64 * SIM_DT as f64;
            let mut snapshot = self.step(&input, SIM_DT, now);
            events.append(&mut snapshot.events);
            last = Some(snapshot);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            input.jump_pressed = false;
            input.fire_pressed = false;
            input.prev_weapon_pressed = false;
            input.next_weapon_pressed = false;
            input.select_weapon = None;
        }
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }

        last.map(|mut snapshot| {
            snapshot.events = events;
            snapshot
        })
    }

    /// Current state without stepping
    pub fn snapshot(&self, events: Vec<GameEvent>) -> Snapshot {
        let now = self.time;
        let weapon = self.player.active_weapon();
        Snapshot {
            time: now,
            level_id: self.progress.level_id,
            player: ActorView::of(&self.player.body, now),
            active_weapon: self.player.active_index(),
            active_weapon_name: weapon.config.name.clone(),
            enemies: self.enemies.iter().map(|e| EnemyView::of(e, now)).collect(),
            player_bullets: self.player_bullets.iter().map(ProjectileView::from).collect(),
            enemy_bullets: self.enemy_bullets.iter().map(ProjectileView::from).collect(),
            completed: self.progress.completed,
            player_dead: self.player.body.is_dead(),
            events,
        }
    }
}
