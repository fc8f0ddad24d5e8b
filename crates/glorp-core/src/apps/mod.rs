//! Built-in applications and the launcher catalog

pub mod chat;
pub mod terminal;

pub use chat::{ChatMessage, ChatSimulator, MessageDirection};
pub use terminal::{CommandOutput, CommandRegistry, Terminal};

use crate::{types::Size, wm::WindowContent, Error, Result};
use serde::{Deserialize, Serialize};

/// Everything the start menu and desktop icons can open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppKind {
    Chat,
    Terminal,
    Settings,
    Game,
    Help,
    Donate,
    Music,
    Generator,
    Web,
    Wallet,
    Chart,
    MagicEden,
}

impl AppKind {
    pub const ALL: [AppKind; 12] = [
        AppKind::Chat,
        AppKind::Terminal,
        AppKind::Settings,
        AppKind::Game,
        AppKind::Help,
        AppKind::Donate,
        AppKind::Music,
        AppKind::Generator,
        AppKind::Web,
        AppKind::Wallet,
        AppKind::Chart,
        AppKind::MagicEden,
    ];

    /// Window title
    pub fn title(&self) -> &'static str {
        match self {
            AppKind::Chat => "GlorpChat",
            AppKind::Terminal => "Terminal",
            AppKind::Settings => "Settings",
            AppKind::Game => "Glorpy Bird",
            AppKind::Help => "Help",
            AppKind::Donate => "Donate",
            AppKind::Music => "Music Player",
            AppKind::Generator => "Glorp Generator",
            AppKind::Web => "Web",
            AppKind::Wallet => "GlorpWallet",
            AppKind::Chart => "Chart",
            AppKind::MagicEden => "Magic Eden",
        }
    }

    /// Size requested when the app opens
    pub fn default_size(&self) -> Size {
        match self {
            AppKind::Chat | AppKind::Settings | AppKind::Music => Size::new(400.0, 600.0),
            AppKind::Terminal => Size::new(600.0, 400.0),
            AppKind::Help => Size::new(400.0, 300.0),
            AppKind::Donate => Size::new(500.0, 700.0),
            _ => Size::new(800.0, 600.0),
        }
    }

    /// Third-party page for iframe apps
    pub fn embed_url(&self) -> Option<&'static str> {
        match self {
            AppKind::Generator => Some("https://glorp-meme.netlify.app/"),
            AppKind::Web => Some("https://linktr.ee/glorpcat"),
            AppKind::Wallet => Some("https://jup.ag/swap/SOL-FkBF9u1upwEMUPxnXjcydxxVSxgr8f3k1YXbz7G7bmtA"),
            AppKind::Chart => Some("https://chart.glorpcat.lol"),
            AppKind::MagicEden => Some("https://magiceden.io/marketplace/glorp"),
            _ => None,
        }
    }

    /// Content handed to the window manager
    pub fn content(&self) -> WindowContent {
        match self.embed_url() {
            Some(url) => WindowContent::Embed { url: url.to_string() },
            None => WindowContent::App(*self),
        }
    }

    /// Short name used on the command line and by the JS bridge
    pub fn slug(&self) -> &'static str {
        match self {
            AppKind::Chat => "chat",
            AppKind::Terminal => "terminal",
            AppKind::Settings => "settings",
            AppKind::Game => "game",
            AppKind::Help => "help",
            AppKind::Donate => "donate",
            AppKind::Music => "music",
            AppKind::Generator => "generator",
            AppKind::Web => "web",
            AppKind::Wallet => "wallet",
            AppKind::Chart => "chart",
            AppKind::MagicEden => "magic-eden",
        }
    }
}

impl std::fmt::Display for AppKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

impl std::str::FromStr for AppKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        AppKind::ALL
            .into_iter()
            .find(|app| app.slug() == wanted || app.title().to_lowercase() == wanted)
            .ok_or(Error::UnknownApp(wanted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_sizes() {
        assert_eq!(AppKind::Terminal.default_size(), Size::new(600.0, 400.0));
        assert_eq!(AppKind::Donate.default_size(), Size::new(500.0, 700.0));
        assert_eq!(AppKind::Chart.default_size(), Size::new(800.0, 600.0));
    }

    #[test]
    fn test_embeds_and_apps() {
        assert!(matches!(AppKind::Web.content(), WindowContent::Embed { .. }));
        assert_eq!(AppKind::Game.content(), WindowContent::App(AppKind::Game));
    }

    #[test]
    fn test_parse_by_slug_or_title() {
        assert_eq!("magic-eden".parse::<AppKind>().unwrap(), AppKind::MagicEden);
        assert_eq!("Glorpy Bird".parse::<AppKind>().unwrap(), AppKind::Game);
        assert!("minesweeper".parse::<AppKind>().is_err());
    }
}
