//! Menu, tutorial and game-over navigation
//!
//! `SceneFlow` is the navigator the session reports to. Outside of play it
//! also turns taps (on touch-up) into scene changes. Hit regions are laid out
//! relative to the screen size, origin bottom-left.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::Rect;
use crate::config::GameConfig;
use crate::session::{GameOverReport, Navigator};
use crate::sim::{Player, build_player};

/// Tutorial pages, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TutorialPage {
    /// Enemies shoot at you and cannot hurt you
    Enemies,
    /// Shooting makes you vulnerable
    Shooting,
}

impl TutorialPage {
    /// Caption lines, top to bottom
    pub fn captions(self) -> &'static [&'static str] {
        match self {
            TutorialPage::Enemies => &["enemies shoot you, you no vincible"],
            TutorialPage::Shooting => &[
                "Shoot back by tapping the screen!",
                "(it doesn't matter where you tap)",
                "Be careful:",
                "when shooting, you ARE",
                "VULNERABLE to enemy fire!",
            ],
        }
    }
}

/// The screen currently shown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Scene {
    Menu { high_score: u64 },
    Tutorial { page: TutorialPage },
    Playing,
    Paused,
    GameOver(GameOverReport),
}

/// What the host should do after a tap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    None,
    /// Start a fresh run
    StartGame,
}

/// Scene state machine
#[derive(Debug, Clone)]
pub struct SceneFlow {
    scene: Scene,
    screen_size: Vec2,
    /// Best score seen, shown on the menu
    high_score: u64,
}

impl SceneFlow {
    /// Start on the menu
    pub fn new(screen_size: Vec2, high_score: u64) -> Self {
        Self {
            scene: Scene::Menu { high_score },
            screen_size,
            high_score,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Whether touches belong to the running game rather than to a screen
    pub fn routes_to_game(&self) -> bool {
        matches!(self.scene, Scene::Playing | Scene::Paused)
    }

    /// Small rounded button (menu "tutorial", game-over "menu")
    fn small_button_size(&self) -> Vec2 {
        Vec2::new(0.267, 0.133) * self.screen_size.x
    }

    /// Menu "tutorial" button
    pub fn tutorial_button(&self) -> Rect {
        let center = Vec2::new(self.screen_size.x / 2.0, 3.0 * self.screen_size.y / 8.0);
        Rect::from_center(center, self.small_button_size())
    }

    /// Game-over "menu" button
    pub fn menu_button(&self) -> Rect {
        let center = Vec2::new(self.screen_size.x / 2.0, 2.0 * self.screen_size.y / 8.0);
        Rect::from_center(center, self.small_button_size())
    }

    /// Tutorial page 1 "next" label
    pub fn next_button(&self) -> Rect {
        let center = Vec2::new(self.screen_size.x / 2.0, 0.4 * self.screen_size.y);
        Rect::from_center(center, self.small_button_size())
    }

    /// Tutorial page 2 "play" button
    pub fn play_button(&self) -> Rect {
        let center = Vec2::new(self.screen_size.x / 2.0, self.screen_size.y / 8.0);
        let size = Vec2::new(0.8, 0.213) * self.screen_size.x;
        Rect::from_center(center, size)
    }

    /// Handle a tap on a non-game screen
    pub fn tap(&mut self, point: Vec2) -> SceneCommand {
        match &self.scene {
            Scene::Menu { .. } => {
                if self.tutorial_button().contains(point) {
                    self.scene = Scene::Tutorial {
                        page: TutorialPage::Enemies,
                    };
                    SceneCommand::None
                } else {
                    SceneCommand::StartGame
                }
            }
            Scene::Tutorial {
                page: TutorialPage::Enemies,
            } => {
                if self.next_button().contains(point) {
                    self.scene = Scene::Tutorial {
                        page: TutorialPage::Shooting,
                    };
                }
                SceneCommand::None
            }
            Scene::Tutorial {
                page: TutorialPage::Shooting,
            } => {
                if self.play_button().contains(point) {
                    SceneCommand::StartGame
                } else {
                    SceneCommand::None
                }
            }
            Scene::GameOver(_) => {
                if self.menu_button().contains(point) {
                    self.return_to_menu();
                    SceneCommand::None
                } else {
                    SceneCommand::StartGame
                }
            }
            Scene::Playing | Scene::Paused => SceneCommand::None,
        }
    }

    /// Ship drawn in the middle of the shooting tutorial page
    pub fn tutorial_player(&self, config: &GameConfig) -> Option<Player> {
        match self.scene {
            Scene::Tutorial {
                page: TutorialPage::Shooting,
            } => {
                let mut player = build_player(config);
                player.pos = self.screen_size / 2.0;
                Some(player)
            }
            _ => None,
        }
    }
}

impl Navigator for SceneFlow {
    fn start_new_game(&mut self) {
        self.scene = Scene::Playing;
    }

    fn show_game_over(&mut self, report: &GameOverReport) {
        self.high_score = self.high_score.max(report.high_score);
        self.scene = Scene::GameOver(report.clone());
    }

    fn show_pause_overlay(&mut self) {
        if self.scene == Scene::Playing {
            self.scene = Scene::Paused;
        }
    }

    fn hide_pause_overlay(&mut self) {
        if self.scene == Scene::Paused {
            self.scene = Scene::Playing;
        }
    }

    fn return_to_menu(&mut self) {
        self.scene = Scene::Menu {
            high_score: self.high_score,
        };
    }
}
