//! Glorpy Bird - gravity, scrolling obstacles, scoring and high scores
//!
//! A [`GameSession`] is a two-state machine:
//!
//! ```text
//!            collision / out of bounds
//!   Running ───────────────────────────▶ GameOver
//!      ▲                                    │
//!      └──────────── jump (restart) ────────┘
//! ```
//!
//! [`GameSession::tick`] advances the simulation by one redraw. The
//! [`driver`] module pairs a session with a canvas and the high-score table.

pub mod driver;
pub mod physics;
pub mod scores;

pub use driver::{GameCanvas, GameLoop, LoopControl};
pub use physics::{Bird, Hitbox, Obstacle};
pub use scores::{HighScore, HighScoreTable, SubmitOutcome};

use crate::{
    config::GameConfig,
    storage::KeyValueStore,
    types::SessionId,
};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde::Serialize;
use tracing::{info, warn};

/// Session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameState {
    Running,
    GameOver,
}

impl std::fmt::Display for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameState::Running => write!(f, "running"),
            GameState::GameOver => write!(f, "game over"),
        }
    }
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameOverCause {
    Collision,
    OutOfBounds,
}

/// What a single tick did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Obstacles passed during this tick
    pub scored: u32,
    /// Set on the tick that ended the session, never again afterwards
    pub game_over: Option<GameOverCause>,
}

/// Result of the jump gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    Jumped,
    Restarted,
}

/// One play-through, reset in place on restart
#[derive(Debug, Clone)]
pub struct GameSession {
    id: SessionId,
    config: GameConfig,
    bird: Bird,
    obstacles: Vec<Obstacle>,
    score: u32,
    speed: f64,
    state: GameState,
    score_saved: bool,
    ticks: u64,
    rng: SmallRng,
}

impl GameSession {
    pub fn new(config: GameConfig, seed: u64) -> Self {
        Self {
            id: SessionId::new(),
            bird: Bird::new(&config),
            obstacles: Vec::new(),
            score: 0,
            speed: config.base_speed,
            state: GameState::Running,
            score_saved: false,
            ticks: 0,
            rng: SmallRng::seed_from_u64(seed),
            config,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn bird(&self) -> &Bird {
        &self.bird
    }

    /// Obstacles, oldest (leftmost) first
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_over(&self) -> bool {
        self.state == GameState::GameOver
    }

    /// Whether this play-through's score went through the high-score table
    pub fn is_score_saved(&self) -> bool {
        self.score_saved
    }

    /// Ticks simulated since the last (re)start
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// The jump gesture: an upward impulse while running, a restart after game over
    pub fn jump(&mut self) -> InputOutcome {
        match self.state {
            GameState::Running => {
                self.bird.velocity = self.config.jump_impulse;
                InputOutcome::Jumped
            }
            GameState::GameOver => {
                self.restart();
                InputOutcome::Restarted
            }
        }
    }

    /// Reset every piece of session state to its initial value
    pub fn restart(&mut self) {
        self.bird = Bird::new(&self.config);
        self.obstacles.clear();
        self.score = 0;
        self.speed = self.config.base_speed;
        self.state = GameState::Running;
        self.score_saved = false;
        self.ticks = 0;
        info!(session = %self.id, "Game restarted");
    }

    /// Advance one redraw. Does nothing once the session is over.
    pub fn tick(&mut self) -> TickReport {
        let mut report = TickReport::default();
        if self.state == GameState::GameOver {
            return report;
        }
        self.ticks += 1;

        self.bird.integrate(self.config.gravity);

        let spawn_before = self.config.width - self.config.spawn_distance;
        if self.obstacles.last().map_or(true, |newest| newest.x < spawn_before) {
            self.spawn_obstacle();
        }

        let hitbox = self.bird.hitbox(self.config.hitbox_inset);
        let mut collided = false;
        for obstacle in &mut self.obstacles {
            obstacle.x -= self.speed;

            if obstacle.collides(&hitbox) {
                collided = true;
            }

            if !obstacle.scored && self.bird.x > obstacle.trailing_edge() {
                obstacle.scored = true;
                self.score += 1;
                self.speed = (self.speed + self.config.speed_increment).min(self.config.max_speed);
                report.scored += 1;
            }
        }
        self.obstacles.retain(|o| !o.is_off_screen());

        let cause = if collided {
            Some(GameOverCause::Collision)
        } else if self.bird.out_of_bounds(self.config.height) {
            Some(GameOverCause::OutOfBounds)
        } else {
            None
        };

        if let Some(cause) = cause {
            self.state = GameState::GameOver;
            report.game_over = Some(cause);
            info!(session = %self.id, score = self.score, cause = ?cause, "Game over");
        }
        report
    }

    fn spawn_obstacle(&mut self) {
        let min = self.config.min_obstacle_height;
        let max = self.config.height - self.config.gap - min;
        let gap_top = if max > min { self.rng.gen_range(min..max) } else { min };

        self.obstacles.push(Obstacle {
            x: self.config.width,
            width: self.config.obstacle_width,
            gap_top,
            gap_bottom: gap_top + self.config.gap,
            scored: false,
        });
    }

    /// Submit the final score once per play-through.
    ///
    /// `table` is refreshed from `store` first, so scores written by other
    /// windows since mount are compared against and kept.
    /// Returns `None` while running or when the score was already handled.
    /// A failed write is logged and still finalizes the session.
    pub fn record_score<S: KeyValueStore + ?Sized>(
        &mut self,
        table: &mut HighScoreTable,
        store: &mut S,
    ) -> Option<SubmitOutcome> {
        if self.state != GameState::GameOver || self.score_saved {
            return None;
        }
        self.score_saved = true;

        *table = HighScoreTable::load(&*store, table.capacity());
        let outcome = table.submit(&self.config.player_name, self.score);
        if outcome.is_recorded() {
            match table.save(store) {
                Ok(()) => info!(player = %self.config.player_name, score = self.score, "High score saved"),
                Err(e) => warn!(error = %e, score = self.score, "Failed to save high score"),
            }
        }
        Some(outcome)
    }

    /// Put the bird somewhere specific, for scripted scenarios
    pub fn place_bird(&mut self, y: f64, velocity: f64) {
        self.bird.y = y;
        self.bird.velocity = velocity;
    }
}
