//! Desktop - routes host events to the window manager, timers and apps
//!
//! The desktop owns everything that outlives a single window: the timer
//! queue, the key-value store, the settings and the chrome. Per-window
//! application state (chat and terminal panes) lives in maps keyed by
//! [`WindowId`] and is dropped in [`Desktop::close`], which also cancels
//! every timer the window owned.
//!
//! Game windows are mounted by the host with [`Desktop::mount_game`]
//! because only the host has a canvas to draw on.

use crate::{
    apps::{AppKind, ChatMessage, ChatSimulator, CommandOutput, Terminal},
    config::{DesktopConfig, GameConfig},
    game::{GameCanvas, GameLoop, HighScoreTable},
    settings::{Settings, Theme},
    shell::{Shell, ShellEvent},
    storage::KeyValueStore,
    timer::{TimerId, TimerQueue},
    types::{Viewport, WindowId},
    wm::{WindowContent, WindowManager},
    Error, Result,
};
use chrono::Local;
use std::collections::HashMap;
use tracing::{debug, info, instrument, warn};

/// Something changed that the host has to redraw
#[derive(Debug, Clone, PartialEq)]
pub enum DesktopEvent {
    Shell(ShellEvent),
    ChatMessage { window: WindowId, message: ChatMessage },
}

pub struct Desktop<S: KeyValueStore> {
    wm: WindowManager,
    timers: TimerQueue,
    store: S,
    settings: Settings,
    shell: Shell,
    game_config: GameConfig,
    chats: HashMap<WindowId, ChatSimulator>,
    terminals: HashMap<WindowId, Terminal>,
    chat_timers: HashMap<TimerId, WindowId>,
    next_seed: u64,
}

impl<S: KeyValueStore> Desktop<S> {
    /// Build a desktop over `store`, loading the saved settings
    pub fn new(config: DesktopConfig, game_config: GameConfig, viewport: Viewport, store: S) -> Result<Self> {
        config.validate()?;
        game_config.validate()?;
        let settings = Settings::load(&store);
        info!(theme = %settings.theme, viewport = %viewport.size(), "Desktop ready");

        Ok(Self {
            wm: WindowManager::new(config, viewport),
            timers: TimerQueue::new(),
            store,
            settings,
            shell: Shell::new(),
            game_config,
            chats: HashMap::new(),
            terminals: HashMap::new(),
            chat_timers: HashMap::new(),
            next_seed: 0x6c6f_7270,
        })
    }

    /// Seed for the next chat or game, so a run is reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.next_seed = seed;
        self
    }

    fn take_seed(&mut self) -> u64 {
        let seed = self.next_seed;
        self.next_seed = self.next_seed.wrapping_add(1);
        seed
    }

    /// Start the boot screen and clock at host time `now_ms`. Returns the
    /// first clock reading.
    pub fn boot(&mut self, now_ms: u64) -> String {
        self.timers.sync_to(now_ms);
        self.shell.boot(&mut self.timers, Local::now())
    }

    /// Bring the timer clock up to host time before scheduling something
    pub fn sync_clock(&mut self, now_ms: u64) {
        self.timers.sync_to(now_ms);
    }

    /// Open an app from the catalog at its default size
    #[instrument(skip(self))]
    pub fn launch(&mut self, app: AppKind) -> Result<WindowId> {
        let size = app.default_size();
        let id = self.wm.create_window(app.title(), app.content(), size.width, size.height);

        match app {
            AppKind::Chat => {
                let mut chat = ChatSimulator::new(self.take_seed());
                let timer = chat.start(&mut self.timers);
                self.wm.attach_timer(id, timer)?;
                self.chat_timers.insert(timer, id);
                self.chats.insert(id, chat);
            }
            AppKind::Terminal => {
                self.terminals.insert(id, Terminal::new());
            }
            _ => {}
        }
        self.shell.close_start_menu();
        Ok(id)
    }

    /// Open a window with arbitrary content
    pub fn open(&mut self, title: &str, content: WindowContent, width: f64, height: f64) -> WindowId {
        self.wm.create_window(title, content, width, height)
    }

    /// Close a window, cancel its timers and drop its app state
    pub fn close(&mut self, id: WindowId) -> Result<()> {
        let closed = self.wm.close_window(id)?;
        for timer in &closed.timers {
            self.timers.cancel(*timer);
            self.chat_timers.remove(timer);
        }
        if let Some(mut chat) = self.chats.remove(&id) {
            chat.stop(&mut self.timers);
        }
        self.terminals.remove(&id);
        debug!(window = %id, canceled = closed.timers.len(), "Window resources released");
        Ok(())
    }

    /// Advance the timer queue to `now_ms` and apply every firing
    pub fn advance(&mut self, now_ms: u64) -> Vec<DesktopEvent> {
        let mut events = Vec::new();
        for id in self.timers.advance_to(now_ms) {
            if let Some(event) = self.shell.on_timer(id, &mut self.timers, Local::now()) {
                events.push(DesktopEvent::Shell(event));
                continue;
            }

            let Some(window) = self.chat_timers.get(&id).copied() else {
                warn!(timer = %id, "Fired timer has no owner");
                continue;
            };
            if let Some(chat) = self.chats.get_mut(&window) {
                let message = chat.on_timer().clone();
                events.push(DesktopEvent::ChatMessage { window, message });
            }
        }
        events
    }

    /// Send a chat message from the user
    pub fn send_chat(&mut self, id: WindowId, text: &str) -> Result<Option<ChatMessage>> {
        let chat = self.chats.get_mut(&id).ok_or(Error::NoAppState(id))?;
        Ok(chat.send(text).cloned())
    }

    pub fn chat(&self, id: WindowId) -> Option<&ChatSimulator> {
        self.chats.get(&id)
    }

    /// Run one line in a terminal window
    pub fn run_terminal(&mut self, id: WindowId, input: &str) -> Result<Option<CommandOutput>> {
        let terminal = self.terminals.get_mut(&id).ok_or(Error::NoAppState(id))?;
        Ok(terminal.execute(input))
    }

    pub fn terminal(&self, id: WindowId) -> Option<&Terminal> {
        self.terminals.get(&id)
    }

    /// Mount a game on `canvas` inside a Glorpy Bird window
    pub fn mount_game<C: GameCanvas>(&mut self, id: WindowId, canvas: C) -> Result<GameLoop<C>> {
        let window = self.wm.window(id).ok_or(Error::WindowNotFound(id))?;
        if window.content != WindowContent::App(AppKind::Game) {
            return Err(Error::NoAppState(id));
        }
        let seed = self.take_seed();
        Ok(GameLoop::mount(self.game_config.clone(), seed, canvas, &self.store))
    }

    /// Current high-score table as stored
    pub fn high_scores(&self) -> HighScoreTable {
        HighScoreTable::load(&self.store, self.game_config.high_score_capacity)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_theme(&mut self, name: &str) -> Result<()> {
        let theme: Theme = name.parse()?;
        self.settings.set_theme(&mut self.store, theme)
    }

    pub fn set_window_opacity(&mut self, value: f64) -> Result<()> {
        self.settings.set_window_opacity(&mut self.store, value)
    }

    pub fn set_blur_effects(&mut self, enabled: bool) -> Result<()> {
        self.settings.set_blur_effects(&mut self.store, enabled)
    }

    pub fn set_system_sounds(&mut self, enabled: bool) -> Result<()> {
        self.settings.set_system_sounds(&mut self.store, enabled)
    }

    /// Unlock the lock screen
    pub fn unlock(&mut self, password: &str) -> Result<()> {
        self.shell.unlock(password)
    }

    /// Shut down: close every window and stop every timer
    pub fn power_off(&mut self) {
        let ids: Vec<WindowId> = self.wm.stacking_order().to_vec();
        for id in ids {
            if let Err(e) = self.close(id) {
                debug!(window = %id, error = %e, "Close during power off failed");
            }
        }
        self.shell.power_off(&mut self.timers);
    }

    pub fn wm(&self) -> &WindowManager {
        &self.wm
    }

    pub fn wm_mut(&mut self) -> &mut WindowManager {
        &mut self.wm
    }

    pub fn shell(&self) -> &Shell {
        &self.shell
    }

    pub fn shell_mut(&mut self) -> &mut Shell {
        &mut self.shell
    }

    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn game_config(&self) -> &GameConfig {
        &self.game_config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{keys, MemoryStore};

    fn desktop() -> Desktop<MemoryStore> {
        Desktop::new(
            DesktopConfig::default(),
            GameConfig::default(),
            Viewport::DESKTOP_1080P,
            MemoryStore::new(),
        )
        .unwrap()
        .with_seed(3)
    }

    #[test]
    fn test_chat_spams_until_closed() {
        let mut desktop = desktop();
        let chat = desktop.launch(AppKind::Chat).unwrap();

        let events: Vec<_> = (1..=90).flat_map(|step| desktop.advance(step * 100)).collect();
        assert_eq!(events.len(), 3);
        assert_eq!(desktop.chat(chat).unwrap().messages().len(), 3);

        desktop.close(chat).unwrap();
        assert!(desktop.timers().is_empty());
        assert!(desktop.advance(30_000).is_empty());
        assert!(desktop.chat(chat).is_none());
    }

    #[test]
    fn test_terminal_per_window() {
        let mut desktop = desktop();
        let first = desktop.launch(AppKind::Terminal).unwrap();
        let second = desktop.launch(AppKind::Terminal).unwrap();

        desktop.run_terminal(first, "whoami").unwrap();
        assert_ne!(
            desktop.terminal(first).unwrap().lines().len(),
            desktop.terminal(second).unwrap().lines().len()
        );

        let help = desktop.launch(AppKind::Help).unwrap();
        assert!(matches!(desktop.run_terminal(help, "help"), Err(Error::NoAppState(_))));
    }

    #[test]
    fn test_settings_persist() {
        let mut desktop = desktop();
        desktop.set_theme("dark").unwrap();
        assert!(matches!(desktop.set_theme("neon"), Err(Error::UnknownTheme(_))));
        assert_eq!(desktop.store().get(keys::THEME).unwrap().as_deref(), Some("dark"));
        assert_eq!(desktop.settings().theme, Theme::Dark);
    }

    #[test]
    fn test_power_off_clears_everything() {
        let mut desktop = desktop();
        desktop.boot(0);
        desktop.launch(AppKind::Chat).unwrap();
        desktop.launch(AppKind::Game).unwrap();

        desktop.power_off();
        assert!(desktop.wm().is_empty());
        assert!(desktop.timers().is_empty());
        assert!(desktop.shell().is_powered_off());
    }

    #[test]
    fn test_boot_counts_from_host_time() {
        let mut desktop = desktop();
        desktop.boot(1_200);

        let boot_messages = |events: &[DesktopEvent]| {
            events
                .iter()
                .filter(|e| matches!(e, DesktopEvent::Shell(ShellEvent::BootMessage(_))))
                .count()
        };
        assert_eq!(boot_messages(&desktop.advance(1_216)), 0);
        assert_eq!(boot_messages(&desktop.advance(1_600)), 1);

        let mut shown = 1;
        for now in (1_616..=5_000).step_by(16) {
            let count = boot_messages(&desktop.advance(now));
            assert!(count <= 1);
            shown += count;
        }
        assert_eq!(shown, 8);
    }

    #[test]
    fn test_background_tab_does_not_replay_chat() {
        let mut desktop = desktop();
        desktop.sync_clock(1_200);
        let chat = desktop.launch(AppKind::Chat).unwrap();

        assert_eq!(desktop.advance(4_200).len(), 1);
        assert_eq!(desktop.advance(4_200 + 3_600_000).len(), 1);
        assert_eq!(desktop.chat(chat).unwrap().messages().len(), 2);
        assert_eq!(desktop.advance(4_200 + 3_603_000).len(), 1);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = GameConfig {
            high_score_capacity: 0,
            ..GameConfig::default()
        };
        let result = Desktop::new(DesktopConfig::default(), config, Viewport::default(), MemoryStore::new());
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }
}
