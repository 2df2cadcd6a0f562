//! Bubble Shooter entry point
//!
//! The simulation has no renderer of its own. Natively this runs a headless
//! demo: an autoplayer aims at matching bubbles until the game ends, logging
//! events as they happen.
//!
//! Usage: `bubble-shooter [seed] [tuning.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use bubble_shooter::Tuning;

    env_logger::init();
    log::info!("Bubble Shooter (headless) starting...");

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0)
        });

    let tuning = match args.next() {
        Some(path) => match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| Tuning::from_json(&json).map_err(|e| e.to_string()))
        {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("Failed to load tuning from {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => Tuning::default(),
    };

    demo::run(seed, tuning);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser host drives the library directly
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use bubble_shooter::highscores::{JsonFileStore, MemoryStore};
    use bubble_shooter::sim::GameSession;
    use bubble_shooter::{Game, GameEvent, HighScoreStore, TickInput, Tuning, aim_from_pointer};

    /// Stop the demo after this many frames (~10 minutes at 60 Hz)
    const MAX_TICKS: u64 = 36_000;

    pub fn run(seed: u64, tuning: Tuning) {
        match JsonFileStore::in_data_dir() {
            Ok(store) => play(Game::new(seed, tuning, store)),
            Err(e) => {
                log::warn!("{}; high score will not be kept", e);
                play(Game::new(seed, tuning, MemoryStore::default()));
            }
        }
    }

    fn play<S: HighScoreStore>(mut game: Game<S>) {
        log::info!("Seed {}, high score {}", game.session.seed, game.high_score());

        while !game.is_game_over() && game.session.time_ticks < MAX_TICKS {
            let input = TickInput {
                aim: Some(choose_aim(&game.session)),
                fire: true,
                restart: None,
            };
            game.tick(&input);

            for event in game.drain_events() {
                match event {
                    GameEvent::ShotFired => {}
                    GameEvent::LevelStarted { level } => println!("Level {}", level),
                    GameEvent::GameOver { score } => println!("Game over, score {}", score),
                    GameEvent::NewHighScore { score } => println!("New high score {}", score),
                    other => log::debug!("{:?}", other),
                }
            }
        }

        println!(
            "Finished: level {}, score {}, high score {}",
            game.level(),
            game.score(),
            game.high_score()
        );
    }

    /// Aim at the lowest bubble matching the loaded color, or straight up
    fn choose_aim(session: &GameSession) -> f32 {
        let max = session.tuning.max_aim_angle;
        let Some(current) = session.shooter.current.as_ref() else {
            return session.shooter.angle;
        };
        session
            .grid
            .iter()
            .filter(|(_, b)| b.color == current.color)
            .max_by(|(_, a), (_, b)| a.pos.y.total_cmp(&b.pos.y))
            .map(|(_, b)| aim_from_pointer(session.tuning.shooter_origin(), b.pos, max))
            .unwrap_or(0.0)
    }
}
