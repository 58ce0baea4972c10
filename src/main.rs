//! Pew Pew Planets entry point
//!
//! Native builds run a headless scripted session and log how it went. The
//! browser build starts from `pew_pew_planets::web::wasm_main`.

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use glam::Vec2;
    use pew_pew_planets::sim::GameEvent;
    use pew_pew_planets::{App, GameConfig, LocalHighScore, Scene, TouchEvent, TouchPhase};

    const FRAME_DT: f32 = 1.0 / 60.0;
    /// Give up after this much play
    const MAX_FRAMES: u32 = 60 * 120;
    /// Touch pattern: press every `BURST_PERIOD` frames, hold for `BURST_HOLD`
    const BURST_PERIOD: u32 = 45;
    const BURST_HOLD: u32 = 8;

    fn seed_from_clock() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }

    fn touch(app: &mut App<LocalHighScore>, phase: TouchPhase, point: Vec2, seed: u64) {
        app.handle_touch(TouchEvent::new(phase, point), seed);
    }

    pub fn run() {
        let config = match std::env::args().nth(1) {
            Some(path) => match GameConfig::load(&path) {
                Ok(config) => config,
                Err(err) => {
                    log::error!("Could not load {}: {}", path, err);
                    std::process::exit(1);
                }
            },
            None => GameConfig::default(),
        };
        let seed = config.seed.unwrap_or_else(seed_from_clock);
        // Anywhere away from the buttons and the pause control
        let field_point = config.screen_size * Vec2::new(0.2, 0.9);

        let mut app = App::new(config, seed, LocalHighScore::load());

        // Leave the menu
        touch(&mut app, TouchPhase::Down, field_point, seed);
        touch(&mut app, TouchPhase::Up, field_point, seed);
        log::info!("Playing with seed {}", seed);

        let mut shots = 0u32;
        for frame in 0..MAX_FRAMES {
            match frame % BURST_PERIOD {
                0 => touch(&mut app, TouchPhase::Down, field_point, seed),
                BURST_HOLD => touch(&mut app, TouchPhase::Up, field_point, seed),
                _ => {}
            }
            app.frame(FRAME_DT);

            for event in app.session_mut().drain_events() {
                match event {
                    GameEvent::PlayerFired { .. } => shots += 1,
                    GameEvent::ScoreChanged { num_kills } => log::debug!("Score: {}", num_kills),
                    _ => {}
                }
            }
            if !matches!(app.scene(), Scene::Playing) {
                break;
            }
        }

        let session = app.session();
        match session.game_over_report() {
            Some(report) => println!(
                "Game over after {:.1}s: {} kills from {} shots (high score {}{})",
                session.world().time(),
                report.score,
                shots,
                report.high_score,
                if report.new_high_score { ", new record!" } else { "" }
            ),
            None => println!(
                "Survived {:.1}s: {} kills from {} shots",
                session.world().time(),
                session.num_kills(),
                shots
            ),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Pew Pew Planets (native) starting...");
    demo::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::wasm_main, this is just to satisfy the compiler
}
