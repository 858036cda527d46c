//! Contra Clone headless runner
//!
//! Loads a level (built-in, JSON file or seeded), drives it with a scripted
//! input pattern at the fixed timestep and prints a JSON summary.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    use clap::Parser;
    use serde::Serialize;

    use contra_clone::consts::SIM_DT;
    use contra_clone::level::{self, LevelConfig};
    use contra_clone::sim::weapon::default_loadout;
    use contra_clone::sim::{GameEvent, InputState, LevelSession};
    use contra_clone::{ConfigError, Tuning};

    /// Headless combat simulation runner
    #[derive(Parser)]
    #[command(author, version, about, long_about = None)]
    pub struct Args {
        /// Built-in level to start on
        #[arg(short, long, default_value_t = 1)]
        level: u32,

        /// Load the level from a JSON file instead
        #[arg(long)]
        level_file: Option<PathBuf>,

        /// Generate a level from this seed instead
        #[arg(long, conflicts_with = "level_file")]
        seed: Option<u64>,

        /// Override balance values from a JSON file
        #[arg(long)]
        tuning_file: Option<PathBuf>,

        /// Number of fixed steps to simulate
        #[arg(short, long, default_value_t = 3600)]
        ticks: u64,

        /// Keep going into the next built-in level on completion
        #[arg(long)]
        chain: bool,
    }

    #[derive(Serialize)]
    struct Summary {
        level_id: u32,
        level_name: String,
        ticks: u64,
        time: f64,
        levels_completed: u32,
        completed: bool,
        player_dead: bool,
        player_health: i32,
        enemies_left: usize,
        events: BTreeMap<&'static str, u32>,
    }

    fn event_name(event: &GameEvent) -> &'static str {
        match event {
            GameEvent::LevelCompleted { .. } => "level_completed",
            GameEvent::PlayerDied => "player_died",
            GameEvent::PlayerHit { .. } => "player_hit",
            GameEvent::EnemyKilled { .. } => "enemy_killed",
            GameEvent::WeaponSwitched { .. } => "weapon_switched",
        }
    }

    /// Run right tapping the trigger, hop regularly, aim up now and then
    /// and rotate weapons every few seconds
    fn scripted_input(tick: u64) -> InputState {
        let jump_pressed = tick % 90 == 0;
        let fire_pressed = tick % 12 == 0;
        InputState {
            move_right: true,
            aim_up: tick % 240 >= 200,
            jump: jump_pressed,
            jump_pressed,
            fire: fire_pressed,
            fire_pressed,
            next_weapon_pressed: tick > 0 && tick % 600 == 0,
            ..Default::default()
        }
    }

    fn read(path: &PathBuf) -> Result<String, String> {
        std::fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))
    }

    fn load_level(args: &Args) -> Result<LevelConfig, String> {
        if let Some(path) = &args.level_file {
            return LevelConfig::from_json(&read(path)?).map_err(|e| e.to_string());
        }
        if let Some(seed) = args.seed {
            return Ok(level::generate(seed, 3200.0));
        }
        level::builtin(args.level).map_err(|e| e.to_string())
    }

    fn start(level: &LevelConfig, tuning: &Tuning) -> Result<LevelSession, ConfigError> {
        LevelSession::new(level, default_loadout(), tuning.clone())
    }

    pub fn run(args: Args) -> Result<(), String> {
        let tuning = match &args.tuning_file {
            Some(path) => Tuning::from_json(&read(path)?).map_err(|e| e.to_string())?,
            None => Tuning::default(),
        };
        let level = load_level(&args)?;
        let mut session = start(&level, &tuning).map_err(|e| e.to_string())?;

        let mut counts: BTreeMap<&'static str, u32> = BTreeMap::new();
        let mut levels_completed = 0;
        let mut ticks = 0;
        let mut clock = 0.0f64;
        let mut snapshot = session.snapshot(Vec::new());

        while ticks < args.ticks {
            clock += SIM_DT as f64;
            snapshot = session.step(&scripted_input(ticks), SIM_DT, clock);
            ticks += 1;

            let mut next_level = None;
            for event in &snapshot.events {
                *counts.entry(event_name(event)).or_default() += 1;
                log::info!("t={:.3} {:?}", snapshot.time, event);
                if let GameEvent::LevelCompleted { next_level_id, .. } = event {
                    levels_completed += 1;
                    next_level = *next_level_id;
                }
            }

            if snapshot.player_dead {
                break;
            }
            if snapshot.completed {
                match next_level {
                    Some(id) if args.chain => {
                        let level = level::builtin(id).map_err(|e| e.to_string())?;
                        session = start(&level, &tuning).map_err(|e| e.to_string())?;
                        clock = 0.0;
                    }
                    _ => break,
                }
            }
        }

        let summary = Summary {
            level_id: session.level_id(),
            level_name: session.name().to_string(),
            ticks,
            time: snapshot.time,
            levels_completed,
            completed: snapshot.completed,
            player_dead: snapshot.player_dead,
            player_health: snapshot.player.health,
            enemies_left: snapshot.enemies.len(),
            events: counts,
        };
        let json = serde_json::to_string_pretty(&summary).map_err(|e| e.to_string())?;
        println!("{json}");
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    use clap::Parser;

    env_logger::init();
    let args = native::Args::parse();
    log::info!("Contra Clone (headless) starting...");

    match native::run(args) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            std::process::ExitCode::FAILURE
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulation is a library on the web; there is no headless runner
}
