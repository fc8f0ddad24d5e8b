//! Frame driver - binds a session to the canvas hosting it
//!
//! Each frame runs physics and collision, then renders, then tells the
//! host whether to request another frame. Once the canvas has been
//! detached (its window closed) the loop halts for good and schedules
//! nothing further.

use super::{GameSession, HighScoreTable, InputOutcome, SubmitOutcome};
use crate::{config::GameConfig, storage::KeyValueStore};
use tracing::{debug, info};

/// Drawing surface a game is mounted on
pub trait GameCanvas {
    /// Still part of the visible surface
    fn is_attached(&self) -> bool;

    /// Draw the current session. Called after physics on every frame,
    /// including the one that ends the game (which shows the overlay).
    fn render(&mut self, session: &GameSession, high_scores: &HighScoreTable);
}

/// What the host should do after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    /// Request another frame
    Continue,
    /// Game over; wait for input before scheduling again
    Idle,
    /// Canvas is gone; never schedule again
    Halt,
}

/// A mounted game: session, canvas and high-score table
pub struct GameLoop<C: GameCanvas> {
    session: GameSession,
    canvas: C,
    high_scores: HighScoreTable,
    last_outcome: Option<SubmitOutcome>,
    halted: bool,
}

impl<C: GameCanvas> GameLoop<C> {
    /// Mount a new session, loading the high-score table from `store`
    pub fn mount<S: KeyValueStore + ?Sized>(config: GameConfig, seed: u64, canvas: C, store: &S) -> Self {
        let high_scores = HighScoreTable::load(store, config.high_score_capacity);
        let session = GameSession::new(config, seed);
        info!(session = %session.id(), "Game mounted");
        Self {
            session,
            canvas,
            high_scores,
            last_outcome: None,
            halted: false,
        }
    }

    /// Run one frame
    pub fn frame<S: KeyValueStore + ?Sized>(&mut self, store: &mut S) -> LoopControl {
        if self.halted {
            return LoopControl::Halt;
        }
        if !self.canvas.is_attached() {
            self.halted = true;
            debug!(session = %self.session.id(), "Canvas detached, halting game loop");
            return LoopControl::Halt;
        }

        let report = self.session.tick();
        if report.game_over.is_some() {
            self.last_outcome = self.session.record_score(&mut self.high_scores, store);
        }
        self.canvas.render(&self.session, &self.high_scores);

        if self.session.is_over() {
            LoopControl::Idle
        } else {
            LoopControl::Continue
        }
    }

    /// Jump gesture (click, tap or space).
    ///
    /// After a restart the host must resume scheduling frames.
    pub fn input(&mut self) -> Option<InputOutcome> {
        if self.halted {
            return None;
        }
        let outcome = self.session.jump();
        if outcome == InputOutcome::Restarted {
            self.last_outcome = None;
        }
        Some(outcome)
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    pub fn high_scores(&self) -> &HighScoreTable {
        &self.high_scores
    }

    /// How the last finished play-through fared against the table
    pub fn last_outcome(&self) -> Option<SubmitOutcome> {
        self.last_outcome
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        game::GameState,
        storage::{keys, MemoryStore},
        Error, Result,
    };

    #[derive(Default)]
    struct RecordingCanvas {
        detached: bool,
        frames: usize,
        overlays: usize,
    }

    impl GameCanvas for RecordingCanvas {
        fn is_attached(&self) -> bool {
            !self.detached
        }

        fn render(&mut self, session: &GameSession, _high_scores: &HighScoreTable) {
            self.frames += 1;
            if session.state() == GameState::GameOver {
                self.overlays += 1;
            }
        }
    }

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(Error::StorageUnavailable("quota exceeded".into()))
        }

        fn set(&mut self, key: &str, _value: &str) -> Result<()> {
            Err(Error::storage_write(key, "quota exceeded"))
        }

        fn remove(&mut self, _key: &str) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_detached_canvas_halts() {
        let mut store = MemoryStore::new();
        let mut game = GameLoop::mount(GameConfig::default(), 1, RecordingCanvas::default(), &store);

        assert_eq!(game.frame(&mut store), LoopControl::Continue);
        game.canvas_mut().detached = true;
        assert_eq!(game.frame(&mut store), LoopControl::Halt);

        game.canvas_mut().detached = false;
        assert_eq!(game.frame(&mut store), LoopControl::Halt);
        assert_eq!(game.canvas().frames, 1);
        assert_eq!(game.input(), None);
    }

    #[test]
    fn test_game_over_goes_idle_and_saves_once() {
        let mut store = MemoryStore::new();
        let mut game = GameLoop::mount(GameConfig::default(), 1, RecordingCanvas::default(), &store);

        let mut control = LoopControl::Continue;
        while control == LoopControl::Continue {
            control = game.frame(&mut store);
        }
        assert_eq!(control, LoopControl::Idle);
        assert_eq!(game.canvas().overlays, 1);
        assert_eq!(game.last_outcome(), Some(SubmitOutcome::Added));
        assert!(store.get(keys::HIGH_SCORES).unwrap().is_some());

        assert_eq!(game.input(), Some(InputOutcome::Restarted));
        assert_eq!(game.frame(&mut store), LoopControl::Continue);
    }

    #[test]
    fn test_scores_written_after_mount_are_kept() {
        let mut store = MemoryStore::new();
        let mut game = GameLoop::mount(GameConfig::default(), 1, RecordingCanvas::default(), &store);

        // another window records a better score while this one is running
        let mut other = HighScoreTable::load(&store, GameConfig::default().high_score_capacity);
        other.submit("Player", 50);
        other.save(&mut store).unwrap();

        while game.frame(&mut store) == LoopControl::Continue {}
        assert!(game.session().score() < 50);
        assert_eq!(game.last_outcome(), Some(SubmitOutcome::NotImproved { best: 50 }));
        assert_eq!(game.high_scores().best("Player"), Some(50));

        let stored = HighScoreTable::load(&store, GameConfig::default().high_score_capacity);
        assert_eq!(stored.best("Player"), Some(50));
    }

    #[test]
    fn test_two_windows_share_one_table() {
        let mut store = MemoryStore::new();
        let first = GameConfig {
            player_name: "Glorp".into(),
            ..GameConfig::default()
        };
        let mut a = GameLoop::mount(first, 1, RecordingCanvas::default(), &store);
        let mut b = GameLoop::mount(GameConfig::default(), 2, RecordingCanvas::default(), &store);

        while a.frame(&mut store) == LoopControl::Continue {}
        while b.frame(&mut store) == LoopControl::Continue {}

        let stored = HighScoreTable::load(&store, GameConfig::default().high_score_capacity);
        assert_eq!(stored.len(), 2);
        assert!(stored.best("Glorp").is_some());
        assert!(stored.best("Player").is_some());
    }

    #[test]
    fn test_storage_failure_still_finalizes() {
        let mut store = BrokenStore;
        let mut game = GameLoop::mount(GameConfig::default(), 1, RecordingCanvas::default(), &store);

        while game.frame(&mut store) == LoopControl::Continue {}
        assert!(game.session().is_score_saved());
        assert_eq!(game.frame(&mut store), LoopControl::Idle);
    }
}
