//! CLI command implementations

use crate::output::{format_rows, format_value, OutputFormat};
use crate::store::FileStore;
use anyhow::{bail, Context};
use console::{style, Term};
use glorp_core::{
    apps::{CommandOutput, Terminal},
    game::{HighScoreTable, SubmitOutcome},
    storage::keys,
    AppKind, Desktop, DesktopConfig, DesktopEvent, GameCanvas, GameConfig, GameLoop, GameSession,
    KeyValueStore, LoopControl, Settings, ShellEvent, Viewport, WindowContent,
};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use tabled::Tabled;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

fn open_desktop(store: &Path, game_config: GameConfig) -> anyhow::Result<Desktop<FileStore>> {
    let store = FileStore::open(store).with_context(|| format!("opening store {}", store.display()))?;
    Ok(Desktop::new(DesktopConfig::default(), game_config, Viewport::default(), store)?)
}

// =============================================================================
// Play
// =============================================================================

/// Canvas with no pixels, detached when its window closes
#[derive(Default)]
struct HeadlessCanvas {
    detached: bool,
    frames: u64,
}

impl GameCanvas for HeadlessCanvas {
    fn is_attached(&self) -> bool {
        !self.detached
    }

    fn render(&mut self, _session: &GameSession, _high_scores: &HighScoreTable) {
        self.frames += 1;
    }
}

/// Jump when falling past the middle of the next gap
fn autopilot_wants_jump(session: &GameSession) -> bool {
    let bird = session.bird();
    let target = session
        .obstacles()
        .iter()
        .find(|o| o.trailing_edge() >= bird.x)
        .map(|o| o.gap_center())
        .unwrap_or(session.config().height / 2.0);
    bird.velocity > 0.0 && bird.y + bird.size / 2.0 > target + 20.0
}

#[derive(Serialize, Tabled)]
struct PlayRow {
    game: usize,
    score: u32,
    ticks: u64,
    speed: String,
    high_score: String,
}

fn describe_outcome(outcome: Option<SubmitOutcome>) -> String {
    match outcome {
        Some(SubmitOutcome::Added) => "new entry".to_string(),
        Some(SubmitOutcome::Improved { previous }) => format!("improved (was {previous})"),
        Some(SubmitOutcome::NotImproved { best }) => format!("best is {best}"),
        Some(SubmitOutcome::Rejected) => "did not qualify".to_string(),
        None => "unfinished".to_string(),
    }
}

/// Play Glorpy Bird with an autopilot
pub fn play(
    store: &Path,
    games: usize,
    seed: u64,
    max_ticks: u64,
    player: &str,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let config = GameConfig {
        player_name: player.to_string(),
        ..GameConfig::default()
    };
    let mut desktop = open_desktop(store, config)?.with_seed(seed);
    let window = desktop.launch(AppKind::Game)?;
    let mut game: GameLoop<HeadlessCanvas> = desktop.mount_game(window, HeadlessCanvas::default())?;

    let mut rows = Vec::with_capacity(games);
    for number in 1..=games {
        if number > 1 {
            game.input();
        }
        // past max_ticks the autopilot lets go and the bird drops out
        let mut control = LoopControl::Continue;
        while control == LoopControl::Continue {
            if game.session().ticks() < max_ticks && autopilot_wants_jump(game.session()) {
                game.input();
            }
            control = game.frame(desktop.store_mut());
        }

        let session = game.session();
        debug!(game = number, score = session.score(), "Play-through finished");
        rows.push(PlayRow {
            game: number,
            score: session.score(),
            ticks: session.ticks(),
            speed: format!("{:.1}", session.speed()),
            high_score: describe_outcome(game.last_outcome()),
        });
    }

    desktop.close(window)?;
    game.canvas_mut().detached = true;
    let halted = game.frame(desktop.store_mut()) == LoopControl::Halt;
    info!(frames = game.canvas().frames, halted, "Game window closed");

    println!(
        "{}",
        format_rows(&rows, format, |r| format!(
            "Game {}: score {} after {} ticks at speed {} ({})",
            r.game, r.score, r.ticks, r.speed, r.high_score
        ))
    );
    Ok(())
}

// =============================================================================
// High scores
// =============================================================================

#[derive(Serialize, Tabled)]
struct ScoreRow {
    rank: usize,
    player: String,
    score: u32,
}

fn load_scores(store: &FileStore) -> HighScoreTable {
    HighScoreTable::load(store, GameConfig::default().high_score_capacity)
}

/// Show the high-score table
pub fn scores_show(store: &Path, format: OutputFormat) -> anyhow::Result<()> {
    let store = FileStore::open(store)?;
    let rows: Vec<ScoreRow> = load_scores(&store)
        .ranked()
        .into_iter()
        .enumerate()
        .map(|(i, h)| ScoreRow {
            rank: i + 1,
            player: h.player,
            score: h.score,
        })
        .collect();

    if rows.is_empty() && format != OutputFormat::Json {
        println!("{}", style("No high scores yet").dim());
        return Ok(());
    }
    println!(
        "{}",
        format_rows(&rows, format, |r| format!("{}. {} - {}", r.rank, r.player, r.score))
    );
    Ok(())
}

/// Record a score by hand
pub fn scores_submit(store: &Path, player: &str, score: u32) -> anyhow::Result<()> {
    let mut store = FileStore::open(store)?;
    let mut table = load_scores(&store);
    let outcome = table.submit(player, score);
    if outcome.is_recorded() {
        table.save(&mut store)?;
    }
    println!("{player}: {}", describe_outcome(Some(outcome)));
    Ok(())
}

pub fn scores_clear(store: &Path) -> anyhow::Result<()> {
    let mut store = FileStore::open(store)?;
    store.remove(keys::HIGH_SCORES)?;
    println!("{}", style("High scores cleared").yellow());
    Ok(())
}

// =============================================================================
// Settings
// =============================================================================

pub fn settings_show(store: &Path, format: OutputFormat) -> anyhow::Result<()> {
    let store = FileStore::open(store)?;
    let settings = Settings::load(&store);
    println!(
        "{}",
        format_value(&settings, format, |s| format!(
            "theme:          {}\nwindow opacity: {}\nblur effects:   {}\nsystem sounds:  {}",
            s.theme, s.window_opacity, s.blur_effects, s.system_sounds
        ))
    );
    Ok(())
}

fn parse_flag(value: &str) -> anyhow::Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        other => bail!("expected a boolean, got '{other}'"),
    }
}

/// Change one setting by its storage key
pub fn settings_set(store: &Path, key: &str, value: &str) -> anyhow::Result<()> {
    let mut desktop = open_desktop(store, GameConfig::default())?;
    match key {
        keys::THEME => desktop.set_theme(value)?,
        keys::WINDOW_OPACITY => {
            let opacity: f64 = value.parse().with_context(|| format!("invalid opacity '{value}'"))?;
            desktop.set_window_opacity(opacity)?;
        }
        keys::BLUR_EFFECTS => desktop.set_blur_effects(parse_flag(value)?)?,
        keys::SYSTEM_SOUNDS => desktop.set_system_sounds(parse_flag(value)?)?,
        other => bail!(
            "unknown setting '{other}' (expected {}, {}, {} or {})",
            keys::THEME,
            keys::WINDOW_OPACITY,
            keys::BLUR_EFFECTS,
            keys::SYSTEM_SOUNDS
        ),
    }
    println!("{} {key} updated", style("✔").green());
    Ok(())
}

/// Print the theme's CSS custom properties
pub fn settings_css(store: &Path) -> anyhow::Result<()> {
    let store = FileStore::open(store)?;
    println!("{}", Settings::load(&store).to_css());
    Ok(())
}

// =============================================================================
// Terminal
// =============================================================================

fn print_new_lines(terminal: &Terminal, from: usize) {
    for line in terminal.lines().iter().skip(from) {
        println!("{line}");
    }
}

fn run_line(terminal: &mut Terminal, line: &str) -> anyhow::Result<()> {
    let before = terminal.lines().len();
    if terminal.execute(line) == Some(CommandOutput::Clear) {
        Term::stdout().clear_screen()?;
        print_new_lines(terminal, 0);
    } else {
        print_new_lines(terminal, before);
    }
    Ok(())
}

/// Run commands given on the command line, or read them from stdin
pub async fn terminal(commands: &[String]) -> anyhow::Result<()> {
    let mut terminal = Terminal::new();
    print_new_lines(&terminal, 0);

    if !commands.is_empty() {
        for command in commands {
            run_line(&mut terminal, command)?;
        }
        return Ok(());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if matches!(line.trim(), "exit" | "quit") {
            break;
        }
        run_line(&mut terminal, &line)?;
    }
    Ok(())
}

// =============================================================================
// Desktop session
// =============================================================================

fn describe_event(event: &DesktopEvent) -> String {
    match event {
        DesktopEvent::Shell(ShellEvent::BootMessage(text)) => format!("boot     {text}"),
        DesktopEvent::Shell(ShellEvent::BootFading) => "boot     fading out".to_string(),
        DesktopEvent::Shell(ShellEvent::BootFinished) => "boot     done".to_string(),
        DesktopEvent::Shell(ShellEvent::Clock(text)) => format!("clock    {text}"),
        DesktopEvent::ChatMessage { window, message } => {
            format!("chat     [{window} {}] {}", message.timestamp, message.content)
        }
    }
}

#[derive(Serialize, Tabled)]
struct WindowRow {
    id: String,
    title: String,
    size: String,
    position: String,
    state: String,
    z: usize,
}

/// Boot a desktop, open apps and pump its timers
pub async fn session(
    store: &Path,
    apps: &[String],
    duration_ms: u64,
    tick_ms: u64,
    realtime: bool,
    format: OutputFormat,
) -> anyhow::Result<()> {
    if tick_ms == 0 {
        bail!("tick must be at least 1ms");
    }
    let mut desktop = open_desktop(store, GameConfig::default())?;
    println!("{} {}", style("GlorpCat OS").green().bold(), style(desktop.boot(0)).dim());

    for name in apps {
        let app: AppKind = name.parse()?;
        let id = desktop.launch(app)?;
        println!("opened   {} ({id})", app.title());
    }
    if apps.is_empty() {
        desktop.open(
            "Welcome",
            WindowContent::Markup("<p>Welcome to GlorpCat OS</p>".into()),
            400.0,
            300.0,
        );
    }

    let mut interval = tokio::time::interval(Duration::from_millis(tick_ms));
    let mut now = 0;
    while now < duration_ms {
        if realtime {
            interval.tick().await;
        }
        now = (now + tick_ms).min(duration_ms);
        for event in desktop.advance(now) {
            println!("{:>6}ms {}", now, describe_event(&event));
        }
    }

    let wm = desktop.wm();
    let rows: Vec<WindowRow> = wm
        .stacking_order()
        .iter()
        .filter_map(|id| wm.window(*id))
        .map(|w| WindowRow {
            id: w.id.to_string(),
            title: w.title.clone(),
            size: w.size.to_string(),
            position: format!("{:.0},{:.0}", w.position.x, w.position.y),
            state: w.state().to_string(),
            z: wm.z_index(w.id).unwrap_or(0),
        })
        .collect();
    println!(
        "{}",
        format_rows(&rows, format, |r| format!("{} {} {} at {} ({})", r.z, r.title, r.size, r.position, r.state))
    );

    desktop.power_off();
    info!(timers = desktop.timers().len(), "Session powered off");
    println!("{}", style("Shutting down GlorpCat OS...").dim());
    Ok(())
}

// =============================================================================
// Apps
// =============================================================================

#[derive(Serialize, Tabled)]
struct AppRow {
    slug: &'static str,
    title: &'static str,
    size: String,
    content: &'static str,
}

pub fn apps(format: OutputFormat) -> anyhow::Result<()> {
    let rows: Vec<AppRow> = AppKind::ALL
        .iter()
        .map(|app| AppRow {
            slug: app.slug(),
            title: app.title(),
            size: app.default_size().to_string(),
            content: if app.embed_url().is_some() { "embed" } else { "app" },
        })
        .collect();
    println!(
        "{}",
        format_rows(&rows, format, |r| format!("{:<12} {:<16} {}", r.slug, r.title, r.size))
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_autopilot_scores() {
        let mut session = GameSession::new(GameConfig::default(), 4);
        for _ in 0..20_000 {
            if autopilot_wants_jump(&session) {
                session.jump();
            }
            session.tick();
            if session.is_over() {
                break;
            }
        }
        assert!(session.score() > 0);
    }

    #[test]
    fn test_play_records_high_score() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        play(&path, 2, 9, 20_000, "tester", OutputFormat::Json).unwrap();

        let store = FileStore::open(&path).unwrap();
        let table = load_scores(&store);
        assert!(table.best("tester").is_some());
    }

    #[test]
    fn test_settings_set_validates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");

        settings_set(&path, "theme", "dark").unwrap();
        settings_set(&path, "blurEffects", "off").unwrap();
        assert!(settings_set(&path, "theme", "neon").is_err());
        assert!(settings_set(&path, "volume", "11").is_err());

        let settings = Settings::load(&FileStore::open(&path).unwrap());
        assert_eq!(settings.theme.name(), "dark");
        assert!(!settings.blur_effects);
    }

    #[test]
    fn test_flag_parsing() {
        assert!(parse_flag("ON").unwrap());
        assert!(!parse_flag("0").unwrap());
        assert!(parse_flag("maybe").is_err());
    }
}
