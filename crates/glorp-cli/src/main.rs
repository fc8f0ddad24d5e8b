//! Glorp CLI - Headless GlorpCat OS
//!
//! Features:
//! - Glorpy Bird with an autopilot, scores persisted to the store
//! - High-score and settings management
//! - The GlorpCat terminal as a REPL
//! - Scripted desktop sessions with a real-time timer pump

use clap::{Parser, Subcommand};
use output::OutputFormat;
use std::path::PathBuf;

mod commands;
mod output;
mod store;

/// Glorp CLI - GlorpCat OS without a browser
#[derive(Parser)]
#[command(name = "glorp-cli")]
#[command(author = "GlorpCat OS Contributors")]
#[command(version)]
#[command(about = "Headless driver for the GlorpCat OS desktop", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Output format (text, json, table)
    #[arg(short, long, default_value = "text")]
    format: String,

    /// JSON file standing in for localStorage
    #[arg(short, long, default_value = "glorp-store.json")]
    store: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play Glorpy Bird with the autopilot
    Play {
        /// Number of play-throughs
        #[arg(short, long, default_value = "1")]
        games: usize,

        /// Seed for obstacle placement
        #[arg(long, default_value = "7")]
        seed: u64,

        /// Ticks the autopilot keeps flying before letting go
        #[arg(short, long, default_value = "5000")]
        max_ticks: u64,

        /// Name to record scores under
        #[arg(short, long, default_value = "Player")]
        player: String,
    },

    /// Inspect or edit the high-score table
    Scores {
        #[command(subcommand)]
        action: Option<ScoresAction>,
    },

    /// Inspect or edit desktop settings
    Settings {
        #[command(subcommand)]
        action: Option<SettingsAction>,
    },

    /// Run the GlorpCat terminal (reads stdin when no commands are given)
    Terminal {
        /// Commands to run in order
        commands: Vec<String>,
    },

    /// Boot a desktop, open apps and pump its timers
    Session {
        /// Apps to open (slug or title)
        #[arg(short, long)]
        app: Vec<String>,

        /// Simulated time to run, in milliseconds
        #[arg(short, long, default_value = "10000")]
        duration: u64,

        /// Timer pump step in milliseconds
        #[arg(short, long, default_value = "100")]
        tick: u64,

        /// Pump in real time instead of as fast as possible
        #[arg(long)]
        realtime: bool,
    },

    /// List launchable apps
    Apps,
}

#[derive(Subcommand)]
enum ScoresAction {
    /// Show the ranked table
    Show,
    /// Record a score by hand
    Submit { player: String, score: u32 },
    /// Remove every score
    Clear,
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Show current values
    Show,
    /// Set a value by storage key (theme, windowOpacity, blurEffects, systemSounds)
    Set { key: String, value: String },
    /// Print the theme's CSS custom properties
    Css,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(level)
        .init();
    glorp_core::init();

    let format = OutputFormat::from(cli.format.as_str());

    match cli.command {
        Commands::Play { games, seed, max_ticks, player } => {
            commands::play(&cli.store, games, seed, max_ticks, &player, format)?;
        }
        Commands::Scores { action } => match action.unwrap_or(ScoresAction::Show) {
            ScoresAction::Show => commands::scores_show(&cli.store, format)?,
            ScoresAction::Submit { player, score } => commands::scores_submit(&cli.store, &player, score)?,
            ScoresAction::Clear => commands::scores_clear(&cli.store)?,
        },
        Commands::Settings { action } => match action.unwrap_or(SettingsAction::Show) {
            SettingsAction::Show => commands::settings_show(&cli.store, format)?,
            SettingsAction::Set { key, value } => commands::settings_set(&cli.store, &key, &value)?,
            SettingsAction::Css => commands::settings_css(&cli.store)?,
        },
        Commands::Terminal { commands: lines } => {
            commands::terminal(&lines).await?;
        }
        Commands::Session { app, duration, tick, realtime } => {
            commands::session(&cli.store, &app, duration, tick, realtime, format).await?;
        }
        Commands::Apps => {
            commands::apps(format)?;
        }
    }

    Ok(())
}
