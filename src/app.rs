//! Host-facing application shell
//!
//! Ties the scene flow to a play session so every front end (native demo,
//! browser) routes touches and frames the same way.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::highscores::HighScoreStore;
use crate::scenes::{Scene, SceneCommand, SceneFlow};
use crate::session::{GameSession, TouchEvent, TouchPhase};
use crate::sim::{CircleBackend, Player, Snapshot};

/// Session type every front end runs
pub type PlaySession<S> = GameSession<CircleBackend, S, SceneFlow>;

/// What a renderer needs to draw the current screen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppView {
    pub scene: Scene,
    pub high_score: u64,
    /// World state while a run is on screen (including its game-over frame)
    pub world: Option<Snapshot>,
    /// Demo ship for the shooting tutorial page
    pub tutorial_player: Option<Player>,
}

pub struct App<S: HighScoreStore> {
    session: PlaySession<S>,
    /// A touch began on a menu screen; its release counts as a tap
    tap_armed: bool,
}

impl<S: HighScoreStore> App<S> {
    /// Open on the menu
    pub fn new(config: GameConfig, seed: u64, store: S) -> Self {
        let flow = SceneFlow::new(config.screen_size, store.high_score());
        Self {
            session: GameSession::standby(config, seed, store, flow),
            tap_armed: false,
        }
    }

    pub fn scene(&self) -> &Scene {
        self.session.navigator().scene()
    }

    pub fn session(&self) -> &PlaySession<S> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut PlaySession<S> {
        &mut self.session
    }

    /// Route one touch. `seed` is used if the touch starts a new run.
    pub fn handle_touch(&mut self, event: TouchEvent, seed: u64) {
        let in_game = self.session.navigator().routes_to_game();
        match event.phase {
            TouchPhase::Down => {
                if in_game {
                    self.session.handle_touch(event);
                } else {
                    self.tap_armed = true;
                }
            }
            TouchPhase::Moved => {
                if in_game {
                    self.session.handle_touch(event);
                }
            }
            TouchPhase::Up => {
                if std::mem::take(&mut self.tap_armed) && !in_game {
                    self.tap(event, seed);
                } else {
                    self.session.handle_touch(event);
                }
            }
            TouchPhase::Cancelled => {
                self.tap_armed = false;
                self.session.handle_touch(event);
            }
        }
    }

    fn tap(&mut self, event: TouchEvent, seed: u64) {
        match self.session.navigator_mut().tap(event.point) {
            SceneCommand::StartGame => self.session.restart(seed),
            SceneCommand::None => {}
        }
    }

    /// Advance one rendered frame. Returns fixed steps taken.
    pub fn frame(&mut self, dt: f32) -> u32 {
        if *self.scene() == Scene::Playing {
            self.session.advance(dt)
        } else {
            0
        }
    }

    pub fn view(&self) -> AppView {
        let scene = self.scene().clone();
        let world = match scene {
            Scene::Playing | Scene::Paused | Scene::GameOver(_) => {
                Some(self.session.world().snapshot())
            }
            Scene::Menu { .. } | Scene::Tutorial { .. } => None,
        };
        AppView {
            tutorial_player: self
                .session
                .navigator()
                .tutorial_player(&self.session.world().config),
            high_score: self.session.store().high_score(),
            scene,
            world,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::MemoryHighScore;
    use crate::sim::{Bullet, GamePhase};
    use glam::Vec2;

    fn tap(app: &mut App<MemoryHighScore>, point: Vec2, seed: u64) {
        app.handle_touch(TouchEvent::new(TouchPhase::Down, point), seed);
        app.handle_touch(TouchEvent::new(TouchPhase::Up, point), seed);
    }

    fn app() -> App<MemoryHighScore> {
        App::new(GameConfig::default(), 1, MemoryHighScore::new(7))
    }

    #[test]
    fn test_opens_on_menu_without_running() {
        let mut app = app();
        assert_eq!(app.scene(), &Scene::Menu { high_score: 7 });
        assert_eq!(app.frame(0.05), 0);
        assert_eq!(app.session().world().time_ticks, 0);
        assert!(app.view().world.is_none());
    }

    #[test]
    fn test_menu_tap_starts_run() {
        let mut app = app();
        tap(&mut app, Vec2::new(10.0, 600.0), 55);
        assert_eq!(app.scene(), &Scene::Playing);
        assert_eq!(app.session().world().seed, 55);
        assert!(app.frame(0.05) > 0);
        assert!(app.view().world.is_some());
    }

    #[test]
    fn test_touch_release_after_game_over_is_not_a_tap() {
        let mut app = app();
        tap(&mut app, Vec2::new(10.0, 600.0), 2);

        // An enemy bullet already sits on the player when the touch lands
        let world = app.session_mut().world_mut();
        let id = world.registry.allocate_id();
        let pos = world.player.pos;
        world.registry.insert_enemy_bullet(Bullet {
            id,
            pos,
            vel: Vec2::ZERO,
            rotation: 0.0,
            radius: 5.0,
            expires_at: 100.0,
        });
        let point = Vec2::new(100.0, 100.0);
        app.handle_touch(TouchEvent::new(TouchPhase::Down, point), 3);
        assert!(matches!(app.scene(), Scene::GameOver(_)));

        app.handle_touch(TouchEvent::new(TouchPhase::Up, point), 3);
        assert!(matches!(app.scene(), Scene::GameOver(_)));
        assert_eq!(app.session().phase(), GamePhase::GameOver);

        // A fresh tap plays again
        tap(&mut app, point, 4);
        assert_eq!(app.scene(), &Scene::Playing);
        assert_eq!(app.session().world().seed, 4);
    }

    #[test]
    fn test_pause_via_app() {
        let mut app = app();
        tap(&mut app, Vec2::new(10.0, 600.0), 2);
        let pause = app.session().world().config.pause_region().max;

        tap(&mut app, pause, 9);
        assert_eq!(app.scene(), &Scene::Paused);
        assert_eq!(app.frame(0.05), 0);

        tap(&mut app, pause, 9);
        assert_eq!(app.scene(), &Scene::Playing);
    }

    #[test]
    fn test_tutorial_view_has_demo_ship() {
        let mut app = app();
        let flow = app.session().navigator().clone();
        tap(&mut app, flow.tutorial_button().min + Vec2::ONE, 0);
        tap(&mut app, flow.next_button().min + Vec2::ONE, 0);

        let view = app.view();
        assert!(view.tutorial_player.is_some());
        assert_eq!(view.high_score, 7);
    }
}
