//! Desktop chrome: boot screen, clock, start menu, lock screen and power

use crate::{timer::TimerId, timer::TimerQueue, Error, Result};
use chrono::{DateTime, TimeZone};
use serde::Serialize;
use tracing::{debug, info};

/// Shown one after another while booting
pub const BOOT_MESSAGES: [&str; 8] = [
    "Initializing GlorpCat OS v1.0...",
    "Loading Glorp Modules...",
    "Calculating Glorp Trajectories...",
    "Preparing Glorp Launch Sequence...",
    "Syncing with Glorp Network...",
    "Creating Glorp Systems...",
    "Starting GlorpCat Services...",
    "Welcome to GlorpCat OS!",
];

pub const BOOT_MESSAGE_INTERVAL_MS: u64 = 400;
pub const BOOT_FADE_AFTER_MS: u64 = 3000;
pub const BOOT_REMOVE_AFTER_FADE_MS: u64 = 500;
pub const CLOCK_INTERVAL_MS: u64 = 1000;

const UNLOCK_PASSWORD: &str = "glorp";

/// Boot screen visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BootStage {
    NotStarted,
    Showing,
    FadingOut,
    Done,
}

/// Something the host has to reflect on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    BootMessage(&'static str),
    BootFading,
    BootFinished,
    Clock(String),
}

#[derive(Debug, Default)]
struct ShellTimers {
    messages: Option<TimerId>,
    fade: Option<TimerId>,
    remove: Option<TimerId>,
    clock: Option<TimerId>,
}

impl ShellTimers {
    fn all(&self) -> impl Iterator<Item = TimerId> {
        [self.messages, self.fade, self.remove, self.clock]
            .into_iter()
            .flatten()
    }
}

/// Chrome state around the windows
#[derive(Debug)]
pub struct Shell {
    stage: BootStage,
    boot_index: usize,
    clock: String,
    start_menu_open: bool,
    locked: bool,
    powered_off: bool,
    timers: ShellTimers,
}

impl Shell {
    pub fn new() -> Self {
        Self {
            stage: BootStage::NotStarted,
            boot_index: 0,
            clock: String::new(),
            start_menu_open: false,
            locked: false,
            powered_off: false,
            timers: ShellTimers::default(),
        }
    }

    /// Schedule the boot screen and the clock, and set the first clock reading
    pub fn boot<Tz: TimeZone>(&mut self, timers: &mut TimerQueue, now: DateTime<Tz>) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        self.stop(timers);
        self.stage = BootStage::Showing;
        self.boot_index = 0;
        self.timers.messages = Some(timers.set_interval(BOOT_MESSAGE_INTERVAL_MS));
        self.timers.fade = Some(timers.set_timeout(BOOT_FADE_AFTER_MS));
        self.timers.clock = Some(timers.set_interval(CLOCK_INTERVAL_MS));
        self.clock = format_clock(&now);
        info!("Boot sequence started");
        self.clock.clone()
    }

    /// Route a fired timer. `None` when the timer is not ours.
    pub fn on_timer<Tz: TimeZone>(
        &mut self,
        id: TimerId,
        timers: &mut TimerQueue,
        now: DateTime<Tz>,
    ) -> Option<ShellEvent>
    where
        Tz::Offset: std::fmt::Display,
    {
        if self.timers.clock == Some(id) {
            self.clock = format_clock(&now);
            return Some(ShellEvent::Clock(self.clock.clone()));
        }

        if self.timers.messages == Some(id) {
            let Some(message) = BOOT_MESSAGES.get(self.boot_index) else {
                timers.cancel(id);
                self.timers.messages = None;
                return None;
            };
            self.boot_index += 1;
            if self.boot_index == BOOT_MESSAGES.len() {
                timers.cancel(id);
                self.timers.messages = None;
            }
            return Some(ShellEvent::BootMessage(message));
        }

        if self.timers.fade == Some(id) {
            self.timers.fade = None;
            self.stage = BootStage::FadingOut;
            self.timers.remove = Some(timers.set_timeout(BOOT_REMOVE_AFTER_FADE_MS));
            return Some(ShellEvent::BootFading);
        }

        if self.timers.remove == Some(id) {
            self.timers.remove = None;
            self.stage = BootStage::Done;
            debug!("Boot screen removed");
            return Some(ShellEvent::BootFinished);
        }

        None
    }

    /// Cancel every chrome timer
    pub fn stop(&mut self, timers: &mut TimerQueue) {
        for id in self.timers.all() {
            timers.cancel(id);
        }
        self.timers = ShellTimers::default();
    }

    pub fn owns_timer(&self, id: TimerId) -> bool {
        self.timers.all().any(|t| t == id)
    }

    pub fn boot_stage(&self) -> BootStage {
        self.stage
    }

    /// Last boot message shown
    pub fn boot_message(&self) -> Option<&'static str> {
        self.boot_index.checked_sub(1).map(|i| BOOT_MESSAGES[i])
    }

    pub fn clock(&self) -> &str {
        &self.clock
    }

    /// Returns the new open flag
    pub fn toggle_start_menu(&mut self) -> bool {
        self.start_menu_open = !self.start_menu_open;
        self.start_menu_open
    }

    /// Click outside the menu
    pub fn close_start_menu(&mut self) {
        self.start_menu_open = false;
    }

    pub fn is_start_menu_open(&self) -> bool {
        self.start_menu_open
    }

    pub fn lock(&mut self) {
        self.start_menu_open = false;
        self.locked = true;
        info!("System locked");
    }

    pub fn unlock(&mut self, password: &str) -> Result<()> {
        if !self.locked {
            return Ok(());
        }
        if password != UNLOCK_PASSWORD {
            debug!("Unlock attempt rejected");
            return Err(Error::IncorrectPassword);
        }
        self.locked = false;
        info!("System unlocked");
        Ok(())
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Shut down: stops every chrome timer
    pub fn power_off(&mut self, timers: &mut TimerQueue) {
        self.stop(timers);
        self.start_menu_open = false;
        self.powered_off = true;
        info!("Shutting down GlorpCat OS");
    }

    pub fn is_powered_off(&self) -> bool {
        self.powered_off
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}

/// Taskbar clock text, e.g. `09:05 PM`
pub fn format_clock<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format("%I:%M %p").to_string()
}
