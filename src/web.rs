//! Browser bridge
//!
//! JavaScript owns the canvas and the animation frame loop; it forwards
//! touches and frame deltas here and draws whatever `snapshot_json` returns.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::app::App;
use crate::config::GameConfig;
use crate::highscores::LocalHighScore;
use crate::session::{TouchEvent, TouchPhase};
use crate::sim::GameEvent;

#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Pew Pew Planets starting...");
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    match serde_json::to_string(value) {
        Ok(json) => json,
        Err(err) => {
            log::warn!("Failed to serialize for the page: {}", err);
            String::from("null")
        }
    }
}

fn now_seed() -> u64 {
    js_sys::Date::now() as u64
}

#[wasm_bindgen]
pub struct WebGame {
    app: App<LocalHighScore>,
    height: f32,
    /// Events from the most recent frame
    events: Vec<GameEvent>,
}

impl WebGame {
    /// Browser coordinates grow downward; the game's grow upward
    fn touch(&mut self, phase: TouchPhase, x: f32, y: f32) {
        let point = Vec2::new(x, self.height - y);
        self.app.handle_touch(TouchEvent::new(phase, point), now_seed());
    }
}

#[wasm_bindgen]
impl WebGame {
    /// Canvas size in CSS pixels
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32) -> WebGame {
        let config = GameConfig::for_screen(width, height);
        let seed = now_seed();
        log::info!("Game initialized with seed: {}", seed);
        WebGame {
            app: App::new(config, seed, LocalHighScore::load()),
            height,
            events: Vec::new(),
        }
    }

    pub fn touch_down(&mut self, x: f32, y: f32) {
        self.touch(TouchPhase::Down, x, y);
    }

    pub fn touch_moved(&mut self, x: f32, y: f32) {
        self.touch(TouchPhase::Moved, x, y);
    }

    pub fn touch_up(&mut self, x: f32, y: f32) {
        self.touch(TouchPhase::Up, x, y);
    }

    pub fn touch_cancel(&mut self, x: f32, y: f32) {
        self.touch(TouchPhase::Cancelled, x, y);
    }

    /// Advance by the frame delta in seconds
    pub fn frame(&mut self, dt: f32) -> u32 {
        let steps = self.app.frame(dt);
        self.events = self.app.session_mut().drain_events();
        steps
    }

    /// Current screen and world state as JSON
    pub fn snapshot_json(&self) -> String {
        to_json(&self.app.view())
    }

    /// Events from the last frame as a JSON array (kills, shots, game over)
    pub fn events_json(&self) -> String {
        to_json(&self.events)
    }
}
