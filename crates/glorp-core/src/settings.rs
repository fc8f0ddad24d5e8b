//! Desktop settings - theme palette, window opacity, blur and sounds
//!
//! Every value is read from the [`KeyValueStore`] with a baked-in default
//! when the key is missing or malformed, and written back as a plain
//! string on change.
//!
//! # Usage
//!
//! ```rust
//! use glorp_core::settings::{Settings, Theme};
//! use glorp_core::storage::MemoryStore;
//!
//! let mut store = MemoryStore::new();
//! let mut settings = Settings::load(&store);
//! assert_eq!(settings.theme, Theme::Forest);
//!
//! settings.set_theme(&mut store, Theme::Dark).unwrap();
//! assert_eq!(Settings::load(&store).theme, Theme::Dark);
//! ```

use crate::{
    storage::{keys, KeyValueStore},
    Error, Result,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Color palette for a theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThemePalette {
    /// Primary accent, hex
    pub primary: &'static str,
    /// Primary accent as `r, g, b` for `rgba()` composition
    pub primary_rgb: &'static str,
    /// Secondary accent, hex
    pub secondary: &'static str,
    /// Secondary accent as `r, g, b`
    pub secondary_rgb: &'static str,
}

/// Selectable desktop themes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Default,
    Dark,
    Forest,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Default, Theme::Dark, Theme::Forest];

    pub fn name(&self) -> &'static str {
        match self {
            Theme::Default => "default",
            Theme::Dark => "dark",
            Theme::Forest => "forest",
        }
    }

    pub fn palette(&self) -> ThemePalette {
        match self {
            Theme::Default => ThemePalette {
                primary: "#ff69b4",
                primary_rgb: "255, 105, 180",
                secondary: "#ffbd44",
                secondary_rgb: "255, 189, 68",
            },
            Theme::Dark => ThemePalette {
                primary: "#2c3e50",
                primary_rgb: "44, 62, 80",
                secondary: "#3498db",
                secondary_rgb: "52, 152, 219",
            },
            Theme::Forest => ThemePalette {
                primary: "#27ae60",
                primary_rgb: "39, 174, 96",
                secondary: "#2ecc71",
                secondary_rgb: "46, 204, 113",
            },
        }
    }

    /// Gradient used by the theme picker preview swatch
    pub fn preview_gradient(&self) -> String {
        let p = self.palette();
        format!("linear-gradient(45deg, {}, {})", p.primary, p.secondary)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::Forest
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Theme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "default" => Ok(Theme::Default),
            "dark" => Ok(Theme::Dark),
            "forest" => Ok(Theme::Forest),
            other => Err(Error::UnknownTheme(other.to_string())),
        }
    }
}

/// Snapshot of the persisted settings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    pub theme: Theme,
    pub window_opacity: f64,
    pub blur_effects: bool,
    pub system_sounds: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            window_opacity: Self::DEFAULT_OPACITY,
            blur_effects: true,
            system_sounds: true,
        }
    }
}

impl Settings {
    pub const DEFAULT_OPACITY: f64 = 0.9;
    pub const MIN_OPACITY: f64 = 0.5;
    pub const MAX_OPACITY: f64 = 1.0;

    /// Read every setting, falling back to defaults
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        let theme = store
            .get_or_none(keys::THEME)
            .and_then(|raw| match raw.parse() {
                Ok(theme) => Some(theme),
                Err(e) => {
                    debug!(value = %raw, error = %e, "Ignoring stored theme");
                    None
                }
            })
            .unwrap_or_default();

        let window_opacity = store
            .get_or_none(keys::WINDOW_OPACITY)
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .map(Self::clamp_opacity)
            .unwrap_or(Self::DEFAULT_OPACITY);

        Self {
            theme,
            window_opacity,
            blur_effects: flag_enabled(store.get_or_none(keys::BLUR_EFFECTS)),
            system_sounds: flag_enabled(store.get_or_none(keys::SYSTEM_SOUNDS)),
        }
    }

    fn clamp_opacity(value: f64) -> f64 {
        value.clamp(Self::MIN_OPACITY, Self::MAX_OPACITY)
    }

    pub fn set_theme<S: KeyValueStore + ?Sized>(&mut self, store: &mut S, theme: Theme) -> Result<()> {
        store.set(keys::THEME, theme.name())?;
        self.theme = theme;
        info!(theme = %theme, "Theme changed");
        Ok(())
    }

    /// Store a new opacity, clamped to [0.5, 1.0]
    pub fn set_window_opacity<S: KeyValueStore + ?Sized>(&mut self, store: &mut S, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(Error::InvalidConfig(format!("window opacity must be finite, got {value}")));
        }
        let value = Self::clamp_opacity(value);
        store.set(keys::WINDOW_OPACITY, &value.to_string())?;
        self.window_opacity = value;
        Ok(())
    }

    pub fn set_blur_effects<S: KeyValueStore + ?Sized>(&mut self, store: &mut S, enabled: bool) -> Result<()> {
        store.set(keys::BLUR_EFFECTS, if enabled { "true" } else { "false" })?;
        self.blur_effects = enabled;
        Ok(())
    }

    pub fn set_system_sounds<S: KeyValueStore + ?Sized>(&mut self, store: &mut S, enabled: bool) -> Result<()> {
        store.set(keys::SYSTEM_SOUNDS, if enabled { "true" } else { "false" })?;
        self.system_sounds = enabled;
        Ok(())
    }

    /// Blur radius applied to translucent surfaces
    pub fn blur_amount(&self) -> &'static str {
        if self.blur_effects {
            "10px"
        } else {
            "0px"
        }
    }

    /// CSS custom properties the host applies to the document root
    pub fn css_variables(&self) -> Vec<(&'static str, String)> {
        let palette = self.theme.palette();
        vec![
            ("--primary", palette.primary.to_string()),
            ("--primary-rgb", palette.primary_rgb.to_string()),
            ("--secondary", palette.secondary.to_string()),
            ("--secondary-rgb", palette.secondary_rgb.to_string()),
            ("--blur-amount", self.blur_amount().to_string()),
        ]
    }

    /// The same variables as a `:root { ... }` block
    pub fn to_css(&self) -> String {
        let body: String = self
            .css_variables()
            .iter()
            .map(|(name, value)| format!("  {name}: {value};\n"))
            .collect();
        format!(":root {{\n{body}}}")
    }

    /// Export as JSON for JS interop
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Flags default to on and only an explicit `"false"` turns them off
fn flag_enabled(raw: Option<String>) -> bool {
    raw.as_deref().map(str::trim) != Some("false")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_defaults_when_empty() {
        let settings = Settings::load(&MemoryStore::new());
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.theme, Theme::Forest);
        assert_eq!(settings.window_opacity, 0.9);
    }

    #[test]
    fn test_malformed_values_fall_back() {
        let store = MemoryStore::with_values([
            (keys::THEME, "neon"),
            (keys::WINDOW_OPACITY, "very"),
            (keys::BLUR_EFFECTS, "nope"),
        ]);
        let settings = Settings::load(&store);
        assert_eq!(settings.theme, Theme::Forest);
        assert_eq!(settings.window_opacity, 0.9);
        assert!(settings.blur_effects);
    }

    #[test]
    fn test_flags_only_disabled_by_false() {
        let store = MemoryStore::with_values([
            (keys::BLUR_EFFECTS, "false"),
            (keys::SYSTEM_SOUNDS, "true"),
        ]);
        let settings = Settings::load(&store);
        assert!(!settings.blur_effects);
        assert!(settings.system_sounds);
        assert_eq!(settings.blur_amount(), "0px");
    }

    #[test]
    fn test_opacity_is_clamped() {
        let mut store = MemoryStore::new();
        let mut settings = Settings::load(&store);

        settings.set_window_opacity(&mut store, 0.1).unwrap();
        assert_eq!(settings.window_opacity, 0.5);
        assert_eq!(store.get(keys::WINDOW_OPACITY).unwrap().as_deref(), Some("0.5"));

        let stored = MemoryStore::with_values([(keys::WINDOW_OPACITY, "4")]);
        assert_eq!(Settings::load(&stored).window_opacity, 1.0);
    }

    #[test]
    fn test_css_generation() {
        let settings = Settings::default();
        let css = settings.to_css();
        assert!(css.contains("--primary: #27ae60;"));
        assert!(css.contains("--secondary-rgb: 46, 204, 113;"));
        assert!(css.contains("--blur-amount: 10px;"));
    }

    #[test]
    fn test_theme_parse() {
        assert_eq!("Dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert!(matches!("neon".parse::<Theme>(), Err(Error::UnknownTheme(_))));
    }
}
