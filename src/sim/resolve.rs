//! Ordered collision and damage resolution
//!
//! Runs once per step after every position update. Phase order matters:
//! a projectile destroyed in one phase is skipped by all later ones, and an
//! enemy killed by a bullet is gone before it can touch the player.

use glam::Vec2;

use super::actor::HitOutcome;
use super::collision::resolve_body;
use super::enemy::Enemy;
use super::geometry::{Rect, World};
use super::player::Player;
use super::projectile::{Owner, Projectiles};
use super::snapshot::GameEvent;
use crate::tuning::Tuning;

/// Everything the resolver mutates during one step
pub struct Arena<'a> {
    pub world: &'a World,
    pub exit_zone: Rect,
    pub player: &'a mut Player,
    pub enemies: &'a mut Vec<Enemy>,
    pub player_bullets: &'a mut Projectiles,
    pub enemy_bullets: &'a mut Projectiles,
}

/// Level-completion bookkeeping carried across steps
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    pub level_id: u32,
    pub next_level_id: Option<u32>,
    pub completed: bool,
}

/// Run all eight phases in order
pub fn resolve_step(arena: &mut Arena<'_>, progress: &mut Progress, now: f64, tuning: &Tuning, events: &mut Vec<GameEvent>) {
    // 1-2: actors vs platforms
    let dropping = arena.player.is_dropping(now);
    resolve_body(&mut arena.player.body, arena.world, dropping);
    for enemy in arena.enemies.iter_mut() {
        resolve_body(&mut enemy.body, arena.world, false);
    }

    // 3-4: bullets vs platforms
    bullets_vs_platforms(arena.player_bullets, arena.world);
    bullets_vs_platforms(arena.enemy_bullets, arena.world);

    // 5: player bullets vs enemies, then clear out the dead
    player_bullets_vs_enemies(arena.player_bullets, arena.enemies, now, tuning, events);
    arena.enemies.retain(Enemy::is_alive);

    // 6-7: damage to the player
    player_vs_enemies(arena.player, arena.enemies, now, tuning, events);
    player_vs_enemy_bullets(arena.player, arena.enemy_bullets, now, tuning, events);

    // 8: exit
    player_vs_exit(arena.player, arena.exit_zone, progress, events);

    arena.player_bullets.sweep();
    arena.enemy_bullets.sweep();
}

/// Destroy projectiles touching a platform
///
/// Player projectiles survive when they pierce platforms; enemy projectiles
/// never do.
pub fn bullets_vs_platforms(bullets: &mut Projectiles, world: &World) {
    let respect_pierce = bullets.owner() == Owner::Player;
    for p in bullets.live_mut() {
        if respect_pierce && p.pierces_platforms {
            continue;
        }
        if world.platforms.iter().any(|platform| p.overlaps(&platform.rect)) {
            p.destroy();
        }
    }
}

/// Apply player projectile damage to enemies
///
/// Each projectile damages a given enemy at most once. Projectiles with
/// `destroy_on_hit` stop at the first enemy they touch, even one that is
/// invulnerable at the moment.
pub fn player_bullets_vs_enemies(
    bullets: &mut Projectiles,
    enemies: &mut [Enemy],
    now: f64,
    tuning: &Tuning,
    events: &mut Vec<GameEvent>,
) {
    for p in bullets.live_mut() {
        for enemy in enemies.iter_mut() {
            if enemy.body.is_dead() || p.has_struck(enemy.id) || !p.overlaps(&enemy.body.rect()) {
                continue;
            }
            let outcome = enemy.body.take_hit(p.damage, p.pos, now, &tuning.enemy_damage);
            match outcome {
                HitOutcome::Ignored => {}
                HitOutcome::Hurt => {
                    log::debug!("Enemy {} hit for {} ({} hp left)", enemy.id, p.damage, enemy.body.health);
                }
                HitOutcome::Killed => {
                    log::debug!("Enemy {} killed", enemy.id);
                    events.push(GameEvent::EnemyKilled { id: enemy.id });
                }
            }
            if p.destroy_on_hit {
                p.destroy();
                break;
            }
            if outcome != HitOutcome::Ignored {
                p.struck.push(enemy.id);
            }
        }
    }
}

/// Contact damage from every overlapping enemy (source = enemy center)
pub fn player_vs_enemies(player: &mut Player, enemies: &[Enemy], now: f64, tuning: &Tuning, events: &mut Vec<GameEvent>) {
    for enemy in enemies {
        if player.body.is_dead() {
            return;
        }
        if enemy.is_alive() && player.body.rect().intersects(&enemy.body.rect()) {
            hurt_player(player, tuning.contact_damage, enemy.body.center(), now, tuning, events);
        }
    }
}

/// Enemy projectiles touching the player deal damage and are always consumed
pub fn player_vs_enemy_bullets(
    player: &mut Player,
    bullets: &mut Projectiles,
    now: f64,
    tuning: &Tuning,
    events: &mut Vec<GameEvent>,
) {
    for p in bullets.live_mut() {
        if player.body.is_dead() {
            return;
        }
        if p.overlaps(&player.body.rect()) {
            p.destroy();
            hurt_player(player, p.damage, p.pos, now, tuning, events);
        }
    }
}

/// Raise completion the first time the player touches the exit
pub fn player_vs_exit(player: &Player, exit_zone: Rect, progress: &mut Progress, events: &mut Vec<GameEvent>) {
    if progress.completed || player.body.is_dead() {
        return;
    }
    if player.body.rect().intersects(&exit_zone) {
        progress.completed = true;
        log::info!("Level {} complete", progress.level_id);
        events.push(GameEvent::LevelCompleted {
            level_id: progress.level_id,
            next_level_id: progress.next_level_id,
        });
    }
}

fn hurt_player(player: &mut Player, damage: i32, source: Vec2, now: f64, tuning: &Tuning, events: &mut Vec<GameEvent>) {
    match player.body.take_hit(damage, source, now, &tuning.player_damage) {
        HitOutcome::Ignored => {}
        HitOutcome::Hurt => {
            log::debug!("Player hit for {} ({} hp left)", damage, player.body.health);
            events.push(GameEvent::PlayerHit { damage, health: player.body.health });
        }
        HitOutcome::Killed => {
            log::info!("Player died");
            events.push(GameEvent::PlayerHit { damage, health: 0 });
            events.push(GameEvent::PlayerDied);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::EnemySpawn;
    use crate::sim::actor::{Facing, MoveState};
    use crate::sim::enemy::EnemyVariant;
    use crate::sim::geometry::Platform;
    use crate::sim::projectile::{ProjectileSpec, Shape};
    use crate::sim::weapon::default_loadout;

    fn bullet(pos: Vec2, damage: i32) -> ProjectileSpec {
        ProjectileSpec {
            origin: pos,
            pos,
            vel: Vec2::ZERO,
            damage,
            range: 1000.0,
            pierces_platforms: false,
            destroy_on_hit: true,
            shape: Shape::Circle { radius: 4.0 },
        }
    }

    fn melee(id: u32, x: f32, y: f32, hp: i32, tuning: &Tuning) -> Enemy {
        let spawn = EnemySpawn { x, y, hp, variant: EnemyVariant::Melee, facing: Facing::Left };
        Enemy::from_spawn(id, &spawn, tuning, 0.0)
    }

    fn player_at(center: Vec2, tuning: &Tuning) -> Player {
        Player::new(center, default_loadout(), tuning).unwrap()
    }

    fn world(platforms: Vec<Platform>) -> World {
        World::new(Rect::new(0.0, 0.0, 1600.0, 600.0), platforms)
    }

    #[test]
    fn test_platform_phase_respects_pierce_for_player_only() {
        let w = world(vec![Platform::solid(0.0, 100.0, 100.0, 20.0)]);
        let mut player = Projectiles::new(Owner::Player);
        let mut enemy = Projectiles::new(Owner::Enemy);

        let mut piercing = bullet(Vec2::new(50.0, 110.0), 10);
        piercing.pierces_platforms = true;
        player.spawn(piercing);
        player.spawn(bullet(Vec2::new(50.0, 110.0), 10));
        enemy.spawn(piercing);

        bullets_vs_platforms(&mut player, &w);
        bullets_vs_platforms(&mut enemy, &w);
        player.sweep();
        enemy.sweep();
        assert_eq!(player.len(), 1);
        assert!(player.iter().all(|p| p.pierces_platforms));
        assert!(enemy.is_empty());
    }

    #[test]
    fn test_three_bullets_kill_thirty_hp_melee() {
        let tuning = Tuning::default();
        let mut enemies = vec![melee(7, 500.0, 300.0, 30, &tuning)];
        let mut bullets = Projectiles::new(Owner::Player);
        let mut events = Vec::new();

        for shot in 1..=3 {
            bullets.spawn(bullet(Vec2::new(500.0, 300.0), 10));
            player_bullets_vs_enemies(&mut bullets, &mut enemies, shot as f64 * 0.01, &tuning, &mut events);
            bullets.sweep();
            assert!(bullets.is_empty());
            if shot < 3 {
                assert_eq!(enemies[0].body.health, 30 - 10 * shot);
                assert!(events.is_empty());
            }
        }
        assert!(enemies[0].body.is_dead());
        assert_eq!(events, vec![GameEvent::EnemyKilled { id: 7 }]);
    }

    #[test]
    fn test_surviving_bullet_hits_each_enemy_once() {
        let tuning = Tuning::default();
        let mut enemies = vec![melee(1, 500.0, 300.0, 100, &tuning), melee(2, 510.0, 300.0, 100, &tuning)];
        let mut bullets = Projectiles::new(Owner::Player);
        let mut events = Vec::new();
        let mut spec = bullet(Vec2::new(505.0, 300.0), 15);
        spec.destroy_on_hit = false;
        bullets.spawn(spec);

        for i in 0..5 {
            player_bullets_vs_enemies(&mut bullets, &mut enemies, i as f64, &tuning, &mut events);
        }
        assert_eq!(bullets.len(), 1);
        assert_eq!(enemies[0].body.health, 85);
        assert_eq!(enemies[1].body.health, 85);
    }

    #[test]
    fn test_destroying_bullet_stops_at_first_enemy() {
        let tuning = Tuning::default();
        let mut enemies = vec![melee(1, 500.0, 300.0, 100, &tuning), melee(2, 510.0, 300.0, 100, &tuning)];
        let mut bullets = Projectiles::new(Owner::Player);
        bullets.spawn(bullet(Vec2::new(505.0, 300.0), 15));
        player_bullets_vs_enemies(&mut bullets, &mut enemies, 0.0, &tuning, &mut Vec::new());
        assert_eq!(enemies[0].body.health, 85);
        assert_eq!(enemies[1].body.health, 100);
    }

    #[test]
    fn test_invulnerable_enemy_still_stops_bullet() {
        let mut tuning = Tuning::default();
        tuning.enemy_damage.invulnerable_secs = 1.0;
        let mut enemies = vec![melee(1, 500.0, 300.0, 100, &tuning)];
        let mut bullets = Projectiles::new(Owner::Player);
        let mut events = Vec::new();

        bullets.spawn(bullet(Vec2::new(500.0, 300.0), 10));
        player_bullets_vs_enemies(&mut bullets, &mut enemies, 0.0, &tuning, &mut events);
        bullets.sweep();
        assert_eq!(enemies[0].body.health, 90);

        // Inside the window: no damage, but the bullet is spent
        bullets.spawn(bullet(Vec2::new(500.0, 300.0), 10));
        player_bullets_vs_enemies(&mut bullets, &mut enemies, 0.5, &tuning, &mut events);
        bullets.sweep();
        assert_eq!(enemies[0].body.health, 90);
        assert!(bullets.is_empty());
        assert!(events.is_empty());
    }

    #[test]
    fn test_contact_damage_then_invulnerable() {
        let tuning = Tuning::default();
        let mut player = player_at(Vec2::new(500.0, 300.0), &tuning);
        let enemies = vec![melee(1, 510.0, 300.0, 30, &tuning)];
        let mut events = Vec::new();

        player_vs_enemies(&mut player, &enemies, 1.0, &tuning, &mut events);
        assert_eq!(player.body.health, 90);
        assert_eq!(player.body.state, MoveState::Knockback);
        // Enemy was to the right: pushed left and up
        assert!(player.body.vel.x < 0.0 && player.body.vel.y < 0.0);

        player.body.pos = Vec2::new(490.0, 270.0);
        player_vs_enemies(&mut player, &enemies, 1.5, &tuning, &mut events);
        assert_eq!(player.body.health, 90);
        assert_eq!(events, vec![GameEvent::PlayerHit { damage: 10, health: 90 }]);
    }

    #[test]
    fn test_enemy_bullet_always_consumed() {
        let tuning = Tuning::default();
        let mut player = player_at(Vec2::new(500.0, 300.0), &tuning);
        player.body.invulnerable_until = Some(10.0);
        let mut bullets = Projectiles::new(Owner::Enemy);
        bullets.spawn(bullet(Vec2::new(500.0, 300.0), 10));
        let mut events = Vec::new();

        player_vs_enemy_bullets(&mut player, &mut bullets, 1.0, &tuning, &mut events);
        bullets.sweep();
        assert!(bullets.is_empty());
        assert_eq!(player.body.health, 100);
        assert!(events.is_empty());
    }

    #[test]
    fn test_lethal_bullet_reports_death_once() {
        let tuning = Tuning::default();
        let mut player = player_at(Vec2::new(500.0, 300.0), &tuning);
        player.body.health = 5;
        let mut bullets = Projectiles::new(Owner::Enemy);
        bullets.spawn(bullet(Vec2::new(500.0, 300.0), 10));
        bullets.spawn(bullet(Vec2::new(500.0, 300.0), 10));
        let mut events = Vec::new();

        player_vs_enemy_bullets(&mut player, &mut bullets, 1.0, &tuning, &mut events);
        assert!(player.body.is_dead());
        assert_eq!(events, vec![GameEvent::PlayerHit { damage: 10, health: 0 }, GameEvent::PlayerDied]);
        // Second bullet was never reached
        bullets.sweep();
        assert_eq!(bullets.len(), 1);
    }

    #[test]
    fn test_exit_completes_once() {
        let tuning = Tuning::default();
        let player = player_at(Vec2::new(100.0, 300.0), &tuning);
        let exit = Rect::new(90.0, 250.0, 50.0, 200.0);
        let mut progress = Progress { level_id: 1, next_level_id: Some(2), completed: false };
        let mut events = Vec::new();

        for _ in 0..3 {
            player_vs_exit(&player, exit, &mut progress, &mut events);
        }
        assert!(progress.completed);
        assert_eq!(events, vec![GameEvent::LevelCompleted { level_id: 1, next_level_id: Some(2) }]);
    }

    #[test]
    fn test_killed_enemy_cannot_touch_player() {
        let tuning = Tuning::default();
        let w = world(Vec::new());
        let mut player = player_at(Vec2::new(500.0, 300.0), &tuning);
        let mut enemies = vec![melee(3, 505.0, 300.0, 10, &tuning)];
        let mut player_bullets = Projectiles::new(Owner::Player);
        let mut enemy_bullets = Projectiles::new(Owner::Enemy);
        player_bullets.spawn(bullet(Vec2::new(505.0, 300.0), 10));

        let mut progress = Progress::default();
        let mut events = Vec::new();
        let mut arena = Arena {
            world: &w,
            exit_zone: Rect::new(1500.0, 0.0, 50.0, 50.0),
            player: &mut player,
            enemies: &mut enemies,
            player_bullets: &mut player_bullets,
            enemy_bullets: &mut enemy_bullets,
        };
        resolve_step(&mut arena, &mut progress, 0.0, &tuning, &mut events);

        assert!(enemies.is_empty());
        assert_eq!(player.body.health, 100);
        assert_eq!(events, vec![GameEvent::EnemyKilled { id: 3 }]);
    }
}
