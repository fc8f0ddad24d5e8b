//! Desktop and game configuration

use crate::{types::Size, Error, Result};
use serde::{Deserialize, Serialize};

/// Layout rules for the window manager
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesktopConfig {
    /// Viewports at or below this width use the narrow (mobile) layout
    pub narrow_breakpoint: f64,
    /// Narrow layout: window width as a fraction of the viewport width
    pub narrow_width_ratio: f64,
    /// Narrow layout: maximum window height as a fraction of the viewport height
    pub narrow_height_ratio: f64,
    /// Narrow layout: top offset as a fraction of the viewport height
    pub narrow_top_ratio: f64,
    /// Wide layout: horizontal space kept free around a window
    pub horizontal_margin: f64,
    /// Wide layout: vertical space kept free around a window (taskbar included)
    pub vertical_margin: f64,
    /// Smallest distance from the top/left edge for a freshly placed window
    pub min_offset: f64,
    /// Smallest size a manual resize may produce
    pub min_window: Size,
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self {
            narrow_breakpoint: 768.0,
            narrow_width_ratio: 0.9,
            narrow_height_ratio: 0.8,
            narrow_top_ratio: 0.1,
            horizontal_margin: 40.0,
            vertical_margin: 100.0,
            min_offset: 20.0,
            min_window: Size::new(200.0, 150.0),
        }
    }
}

impl DesktopConfig {
    /// Reject ratios and margins that cannot produce a visible window
    pub fn validate(&self) -> Result<()> {
        let ratios = [
            ("narrow_width_ratio", self.narrow_width_ratio),
            ("narrow_height_ratio", self.narrow_height_ratio),
            ("narrow_top_ratio", self.narrow_top_ratio),
        ];
        for (name, value) in ratios {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidConfig(format!("{name} must be within [0, 1], got {value}")));
            }
        }
        if self.horizontal_margin < 0.0 || self.vertical_margin < 0.0 || self.min_offset < 0.0 {
            return Err(Error::InvalidConfig("margins must not be negative".into()));
        }
        if self.min_window.width <= 0.0 || self.min_window.height <= 0.0 {
            return Err(Error::InvalidConfig("min_window must be positive".into()));
        }
        Ok(())
    }
}

/// Glorpy Bird tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Play field width
    pub width: f64,
    /// Play field height
    pub height: f64,
    /// Added to the vertical velocity every tick
    pub gravity: f64,
    /// Vertical velocity set by a jump (negative is up)
    pub jump_impulse: f64,
    /// Side length of the bird sprite
    pub bird_size: f64,
    /// Fraction of the bird size trimmed from each side for collisions
    pub hitbox_inset: f64,
    /// Obstacle width
    pub obstacle_width: f64,
    /// Vertical opening between the top and bottom obstacle
    pub gap: f64,
    /// Minimum height of either obstacle half
    pub min_obstacle_height: f64,
    /// A new obstacle spawns once the newest one is this far from the right edge
    pub spawn_distance: f64,
    /// Horizontal scroll speed at the start of a session
    pub base_speed: f64,
    /// Speed added for every obstacle passed
    pub speed_increment: f64,
    /// Upper bound for the scroll speed
    pub max_speed: f64,
    /// How many players the high-score table keeps
    pub high_score_capacity: usize,
    /// Name scores are recorded under
    pub player_name: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            gravity: 0.2,
            jump_impulse: -5.0,
            bird_size: 40.0,
            hitbox_inset: 0.2,
            obstacle_width: 60.0,
            gap: 180.0,
            min_obstacle_height: 50.0,
            spawn_distance: 300.0,
            base_speed: 1.5,
            speed_increment: 0.1,
            max_speed: 3.0,
            high_score_capacity: 5,
            player_name: "Player".to_string(),
        }
    }
}

impl GameConfig {
    /// Leaderboard-style table that only keeps the top three players
    pub fn top_three() -> Self {
        Self {
            high_score_capacity: 3,
            ..Default::default()
        }
    }

    /// Field sized to a canvas, everything else at the defaults
    pub fn with_field(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Horizontal position of the bird
    pub fn bird_x(&self) -> f64 {
        self.width / 3.0
    }

    /// Vertical position the bird starts (and restarts) at
    pub fn bird_start_y(&self) -> f64 {
        self.height / 2.0
    }

    pub fn validate(&self) -> Result<()> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(Error::InvalidConfig("play field must have a positive size".into()));
        }
        if self.gap + 2.0 * self.min_obstacle_height > self.height {
            return Err(Error::InvalidConfig(format!(
                "gap {} plus two minimum obstacles does not fit a field of height {}",
                self.gap, self.height
            )));
        }
        if !(0.0..0.5).contains(&self.hitbox_inset) {
            return Err(Error::InvalidConfig("hitbox_inset must be within [0, 0.5)".into()));
        }
        if self.base_speed <= 0.0 || self.max_speed < self.base_speed {
            return Err(Error::InvalidConfig("speeds must satisfy 0 < base_speed <= max_speed".into()));
        }
        if self.high_score_capacity == 0 {
            return Err(Error::InvalidConfig("high_score_capacity must be at least 1".into()));
        }
        Ok(())
    }
}
