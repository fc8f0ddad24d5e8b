//! Glorp Core - Desktop Simulation Library for GlorpCat OS
//!
//! This crate provides the host-agnostic parts of the desktop:
//! - Window manager with z-order, taskbar mirroring and pointer dragging
//! - Host-driven timer queue
//! - Glorpy Bird physics, collision, scoring and persisted high scores
//! - Chat simulator, terminal and settings panels
//! - Boot screen, clock, lock screen and power chrome
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          Glorp Core                             │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐           │
//! │  │    Window    │  │    Timer     │  │    Shell     │           │
//! │  │   Manager    │  │    Queue     │  │   Chrome     │           │
//! │  └──────┬───────┘  └──────┬───────┘  └──────┬───────┘           │
//! │         │                 │                 │                   │
//! │         └─────────────────┼─────────────────┘                   │
//! │                           │                                     │
//! │                    ┌──────┴──────┐                              │
//! │                    │   Desktop   │                              │
//! │                    └──────┬──────┘                              │
//! │                           │                                     │
//! │  ┌──────────────┐  ┌──────┴──────┐  ┌──────────────┐            │
//! │  │  Game Loop   │  │    Apps     │  │  Key-Value   │            │
//! │  │ + HighScores │  │ chat / term │  │    Store     │            │
//! │  └──────────────┘  └─────────────┘  └──────────────┘            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing in here touches a DOM, a file or a clock other than through
//! [`KeyValueStore`], [`GameCanvas`] and the timestamps the host passes in.

pub mod error;
pub mod types;
pub mod config;
pub mod timer;
pub mod storage;
pub mod settings;
pub mod wm;
pub mod game;
pub mod apps;
pub mod shell;
pub mod desktop;

pub use error::{Error, Result};
pub use types::*;
pub use config::{DesktopConfig, GameConfig};
pub use timer::{TimerId, TimerQueue};
pub use storage::{KeyValueStore, MemoryStore};
pub use settings::{Settings, Theme, ThemePalette};
pub use wm::{DisplayState, Window, WindowContent, WindowManager};
pub use game::{GameCanvas, GameLoop, GameSession, GameState, HighScoreTable, LoopControl};
pub use apps::AppKind;
pub use shell::{Shell, ShellEvent};
pub use desktop::{Desktop, DesktopEvent};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the desktop library
pub fn init() {
    tracing::info!(version = VERSION, "Glorp Core initialized");
}
