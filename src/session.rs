//! Play session orchestration
//!
//! Owns the world, the physics backend and the frame accumulator, routes
//! touches, and hands the result to the high score store and the navigator
//! when the run ends.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::highscores::HighScoreStore;
use crate::sim::{
    EntityId, GameEvent, GamePhase, PhysicsBackend, World, begin_firing, cease_firing, tick,
};

/// Touch lifecycle stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TouchPhase {
    Down,
    Moved,
    Up,
    Cancelled,
}

/// One touch sample, screen space with the origin at the bottom-left
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchEvent {
    pub phase: TouchPhase,
    pub point: Vec2,
}

impl TouchEvent {
    pub fn new(phase: TouchPhase, point: Vec2) -> Self {
        Self { phase, point }
    }
}

/// Everything the game-over screen shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameOverReport {
    pub score: u64,
    /// Best score after this run was recorded
    pub high_score: u64,
    pub new_high_score: bool,
    /// Where the killing bullet was, and which way it faced
    pub bullet_pos: Vec2,
    pub bullet_angle: f32,
}

/// Scene-transition collaborator. One-way notifications only.
pub trait Navigator {
    fn start_new_game(&mut self) {}
    fn show_game_over(&mut self, report: &GameOverReport);
    fn show_pause_overlay(&mut self) {}
    fn hide_pause_overlay(&mut self) {}
    fn return_to_menu(&mut self) {}
}

/// One play session: world + physics + collaborators
pub struct GameSession<B, S, N>
where
    B: PhysicsBackend + Default,
    S: HighScoreStore,
    N: Navigator,
{
    world: World,
    backend: B,
    store: S,
    navigator: N,
    /// Unsimulated frame time
    accumulator: f32,
    /// Events not yet taken by the host (score label, effects)
    pending_events: Vec<GameEvent>,
    game_over: Option<GameOverReport>,
}

impl<B, S, N> GameSession<B, S, N>
where
    B: PhysicsBackend + Default,
    S: HighScoreStore,
    N: Navigator,
{
    /// Start a session and tell the navigator a game has begun
    pub fn new(config: GameConfig, seed: u64, store: S, navigator: N) -> Self {
        log::info!("Starting game with seed {}", seed);
        let mut session = Self::standby(config, seed, store, navigator);
        session.navigator.start_new_game();
        session
    }

    /// Build the world without telling the navigator; the first `restart`
    /// starts play. Used when the host opens on a menu.
    pub fn standby(config: GameConfig, seed: u64, store: S, navigator: N) -> Self {
        Self {
            world: World::new(config, seed),
            backend: B::default(),
            store,
            navigator,
            accumulator: 0.0,
            pending_events: Vec::new(),
            game_over: None,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut N {
        &mut self.navigator
    }

    pub fn phase(&self) -> GamePhase {
        self.world.phase
    }

    pub fn num_kills(&self) -> u64 {
        self.world.num_kills
    }

    /// Report of the finished run, if it has finished
    pub fn game_over_report(&self) -> Option<&GameOverReport> {
        self.game_over.as_ref()
    }

    /// Dispatch a touch sample
    pub fn handle_touch(&mut self, event: TouchEvent) {
        match event.phase {
            TouchPhase::Down => {
                self.touch_down(event.point);
            }
            TouchPhase::Moved => self.touch_moved(event.point),
            TouchPhase::Up => self.touch_up(event.point),
            TouchPhase::Cancelled => self.touch_cancel(event.point),
        }
    }

    /// Touch-down: the pause control toggles pause, anywhere else shoots.
    /// Returns the bullet fired, if any.
    pub fn touch_down(&mut self, point: Vec2) -> Option<EntityId> {
        if self.world.config.pause_region().contains(point) {
            self.toggle_pause();
            return None;
        }
        if self.world.phase != GamePhase::Playing {
            return None;
        }
        let bullet = begin_firing(&mut self.world, &self.backend);
        self.collect_events();
        bullet
    }

    pub fn touch_moved(&mut self, point: Vec2) {
        log::trace!("Touch moved to {:?}", point);
    }

    pub fn touch_up(&mut self, _point: Vec2) {
        cease_firing(&mut self.world);
        self.collect_events();
    }

    pub fn touch_cancel(&mut self, point: Vec2) {
        self.touch_up(point);
    }

    pub fn pause(&mut self) {
        if self.world.phase == GamePhase::Playing {
            self.world.phase = GamePhase::Paused;
            self.accumulator = 0.0;
            log::info!("Paused");
            self.navigator.show_pause_overlay();
        }
    }

    pub fn resume(&mut self) {
        if self.world.phase == GamePhase::Paused {
            self.world.phase = GamePhase::Playing;
            self.accumulator = 0.0;
            log::info!("Resumed");
            self.navigator.hide_pause_overlay();
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.world.phase {
            GamePhase::Playing => self.pause(),
            GamePhase::Paused => self.resume(),
            GamePhase::GameOver => {}
        }
    }

    /// Feed one rendered frame's elapsed time; runs whole fixed steps.
    /// Returns the number of steps taken.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        if self.world.phase != GamePhase::Playing {
            return 0;
        }
        // NaN never reaches SIM_DT and would stall the accumulator for good
        if !frame_dt.is_finite() {
            log::debug!("Ignoring non-finite frame delta {}", frame_dt);
            return 0;
        }
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.world, &mut self.backend, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            self.collect_events();
            if self.world.phase != GamePhase::Playing {
                self.accumulator = 0.0;
                break;
            }
        }
        substeps
    }

    /// Take events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Throw away the current run and start another
    pub fn restart(&mut self, seed: u64) {
        log::info!("Restarting with seed {}", seed);
        let config = self.world.config.clone();
        self.world = World::new(config, seed);
        self.backend = B::default();
        self.accumulator = 0.0;
        self.pending_events.clear();
        self.game_over = None;
        self.navigator.start_new_game();
    }

    pub fn quit_to_menu(&mut self) {
        log::info!("Returning to menu");
        self.navigator.return_to_menu();
    }

    /// Move world events to the host queue, finishing the run on a kill
    fn collect_events(&mut self) {
        for event in self.world.drain_events() {
            if let GameEvent::PlayerKilled {
                score,
                bullet_pos,
                bullet_angle,
            } = event
            {
                self.finish(score, bullet_pos, bullet_angle);
            }
            self.pending_events.push(event);
        }
    }

    fn finish(&mut self, score: u64, bullet_pos: Vec2, bullet_angle: f32) {
        if self.game_over.is_some() {
            return;
        }
        let previous = self.store.high_score();
        let new_high_score = score > previous;
        if new_high_score {
            self.store.save_high_score(score);
        }
        let report = GameOverReport {
            score,
            high_score: previous.max(score),
            new_high_score,
            bullet_pos,
            bullet_angle,
        };
        log::info!(
            "Game over: {} kills (best {}{})",
            report.score,
            report.high_score,
            if new_high_score { ", new record" } else { "" }
        );
        self.navigator.show_game_over(&report);
        self.game_over = Some(report);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Bullet, CircleBackend, Contact, PLAYER_ID, resolve_contact};

    /// Store that records every save
    #[derive(Default)]
    struct RecordingStore {
        stored: u64,
        saves: Vec<u64>,
    }

    impl HighScoreStore for RecordingStore {
        fn high_score(&self) -> u64 {
            self.stored
        }

        fn save_high_score(&mut self, score: u64) {
            self.stored = score;
            self.saves.push(score);
        }
    }

    #[derive(Debug, Default)]
    struct RecordingNavigator {
        started: u32,
        paused: u32,
        resumed: u32,
        menu: u32,
        game_over: Vec<GameOverReport>,
    }

    impl Navigator for RecordingNavigator {
        fn start_new_game(&mut self) {
            self.started += 1;
        }

        fn show_game_over(&mut self, report: &GameOverReport) {
            self.game_over.push(report.clone());
        }

        fn show_pause_overlay(&mut self) {
            self.paused += 1;
        }

        fn hide_pause_overlay(&mut self) {
            self.resumed += 1;
        }

        fn return_to_menu(&mut self) {
            self.menu += 1;
        }
    }

    type TestSession = GameSession<CircleBackend, RecordingStore, RecordingNavigator>;

    fn session(stored: u64) -> TestSession {
        let store = RecordingStore {
            stored,
            saves: Vec::new(),
        };
        GameSession::new(GameConfig::default(), 2024, store, RecordingNavigator::default())
    }

    /// A point on the play field away from the pause control
    fn field_point() -> Vec2 {
        Vec2::new(100.0, 100.0)
    }

    fn kill_enemies(session: &mut TestSession, n: usize) {
        for _ in 0..n {
            let world = session.world_mut();
            let bullet = world.fire_player_bullet().unwrap();
            let enemy = world.registry.enemies[0].id;
            resolve_contact(world, Contact::new(enemy, bullet));
        }
    }

    /// Put an enemy bullet on top of the player
    fn enemy_bullet_on_player(session: &mut TestSession) -> EntityId {
        let world = session.world_mut();
        let id = world.registry.allocate_id();
        let pos = world.player.pos + Vec2::new(0.0, 30.0);
        world.registry.insert_enemy_bullet(Bullet {
            id,
            pos,
            vel: Vec2::new(0.0, -600.0),
            rotation: -std::f32::consts::FRAC_PI_2,
            radius: 5.0,
            expires_at: 100.0,
        });
        id
    }

    fn run_until_over(session: &mut TestSession) {
        for _ in 0..120 {
            session.advance(1.0 / 60.0);
            if session.phase() == GamePhase::GameOver {
                break;
            }
        }
    }

    #[test]
    fn test_new_session_notifies_start() {
        let session = session(0);
        assert_eq!(session.navigator().started, 1);
        assert_eq!(session.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_three_kills_beat_high_score_of_two() {
        let mut session = session(2);
        kill_enemies(&mut session, 3);
        assert_eq!(session.num_kills(), 3);

        session.touch_down(field_point());
        enemy_bullet_on_player(&mut session);
        run_until_over(&mut session);

        assert_eq!(session.phase(), GamePhase::GameOver);
        assert_eq!(session.store().saves, vec![3]);
        let report = session.game_over_report().unwrap();
        assert_eq!(report.score, 3);
        assert_eq!(report.high_score, 3);
        assert!(report.new_high_score);
        assert_eq!(session.navigator().game_over.len(), 1);
    }

    #[test]
    fn test_high_score_of_five_not_overwritten() {
        let mut session = session(5);
        kill_enemies(&mut session, 3);

        session.touch_down(field_point());
        enemy_bullet_on_player(&mut session);
        run_until_over(&mut session);

        assert_eq!(session.phase(), GamePhase::GameOver);
        assert!(session.store().saves.is_empty());
        let report = session.game_over_report().unwrap();
        assert_eq!(report.high_score, 5);
        assert!(!report.new_high_score);
    }

    #[test]
    fn test_enemy_bullet_harmless_when_not_touching() {
        let mut session = session(0);
        let bullet = enemy_bullet_on_player(&mut session);
        for _ in 0..10 {
            session.advance(1.0 / 60.0);
        }
        assert_eq!(session.phase(), GamePhase::Playing);
        // Passed straight through
        assert!(session.world().is_live(bullet));
    }

    #[test]
    fn test_touch_down_on_overlapping_bullet_ends_game() {
        let mut session = session(0);
        let world = session.world_mut();
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

        assert!(session.touch_down(field_point()).is_none());
        assert_eq!(session.phase(), GamePhase::GameOver);
        assert_eq!(session.navigator().game_over.len(), 1);
        assert!(session.world().registry.player_bullets.is_empty());
    }

    #[test]
    fn test_pause_control_toggles_pause() {
        let mut session = session(0);
        let pause_point = session.world().config.pause_region().max;

        assert!(session.touch_down(pause_point).is_none());
        assert_eq!(session.phase(), GamePhase::Paused);
        assert_eq!(session.navigator().paused, 1);
        assert!(!session.world().player.is_vulnerable());
        assert_eq!(session.advance(0.05), 0);

        // Field touches do nothing while paused
        assert!(session.touch_down(field_point()).is_none());

        session.touch_down(pause_point);
        assert_eq!(session.phase(), GamePhase::Playing);
        assert_eq!(session.navigator().resumed, 1);
    }

    #[test]
    fn test_touch_lifecycle() {
        let mut session = session(0);
        session.handle_touch(TouchEvent::new(TouchPhase::Down, field_point()));
        assert!(session.world().player.is_vulnerable());
        assert_eq!(session.world().registry.player_bullets.len(), 1);

        session.handle_touch(TouchEvent::new(TouchPhase::Moved, field_point() + Vec2::X));
        assert!(session.world().player.is_vulnerable());

        session.handle_touch(TouchEvent::new(TouchPhase::Cancelled, field_point()));
        assert!(!session.world().player.is_vulnerable());

        let events = session.drain_events();
        assert!(events.contains(&GameEvent::VulnerabilityChanged { vulnerable: true }));
        assert!(events.contains(&GameEvent::VulnerabilityChanged { vulnerable: false }));
    }

    #[test]
    fn test_advance_runs_fixed_steps() {
        let mut session = session(0);
        assert_eq!(session.advance(SIM_DT * 3.5), 3);
        assert_eq!(session.world().time_ticks, 3);
        // Leftover half step carries over
        assert_eq!(session.advance(SIM_DT * 0.6), 1);
        // Huge frames are clamped
        assert_eq!(session.advance(10.0), MAX_SUBSTEPS);
    }

    #[test]
    fn test_non_finite_frame_delta_skipped() {
        let mut session = session(0);
        assert_eq!(session.advance(f32::NAN), 0);
        assert_eq!(session.advance(f32::INFINITY), 0);
        assert_eq!(session.advance(f32::NEG_INFINITY), 0);

        let mut steps = 0;
        for _ in 0..60 {
            steps += session.advance(1.0 / 60.0);
        }
        assert!(steps >= 119);
        assert_eq!(session.world().time_ticks, u64::from(steps));
    }

    #[test]
    fn test_restart_resets_run() {
        let mut session = session(0);
        kill_enemies(&mut session, 2);
        session.touch_down(field_point());
        enemy_bullet_on_player(&mut session);
        run_until_over(&mut session);
        assert!(session.game_over_report().is_some());

        session.restart(99);
        assert_eq!(session.phase(), GamePhase::Playing);
        assert_eq!(session.num_kills(), 0);
        assert!(session.game_over_report().is_none());
        assert_eq!(session.navigator().started, 2);
        assert_eq!(session.world().seed, 99);

        session.quit_to_menu();
        assert_eq!(session.navigator().menu, 1);
    }

    #[test]
    fn test_player_contact_reported_with_bullet_heading() {
        let mut session = session(0);
        session.touch_down(field_point());
        let bullet = enemy_bullet_on_player(&mut session);
        run_until_over(&mut session);

        assert!(!session.world().is_live(bullet));
        let report = session.game_over_report().unwrap();
        assert!((report.bullet_angle + std::f32::consts::FRAC_PI_2).abs() < 1e-5);
        assert!(session.world().body(PLAYER_ID).is_some());
    }
}
