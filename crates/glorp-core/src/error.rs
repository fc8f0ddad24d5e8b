//! Error types for Glorp Core

use crate::types::WindowId;
use thiserror::Error;

/// Result type alias for desktop operations
pub type Result<T> = std::result::Result<T, Error>;

/// Desktop error types
#[derive(Error, Debug)]
pub enum Error {
    // Window manager errors
    #[error("Window not found: {0}")]
    WindowNotFound(WindowId),

    #[error("Window {0} is fullscreen")]
    WindowFullscreen(WindowId),

    #[error("Window {0} is minimized")]
    WindowMinimized(WindowId),

    #[error("Fullscreen is not available for window {0} in the narrow layout")]
    FullscreenUnavailable(WindowId),

    #[error("No application state for window {0}")]
    NoAppState(WindowId),

    // Shell errors
    #[error("Incorrect password")]
    IncorrectPassword,

    #[error("Unknown application: {0}")]
    UnknownApp(String),

    #[error("Unknown theme: {0}")]
    UnknownTheme(String),

    // Storage errors
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Storage write failed for key '{key}': {reason}")]
    StorageWrite { key: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a storage write error
    pub fn storage_write(key: impl Into<String>, reason: impl ToString) -> Self {
        Error::StorageWrite {
            key: key.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns true if the host should swallow this error and keep running.
    ///
    /// Window operations on stale ids or in a state that forbids them leave
    /// the surface untouched, so nothing needs to be surfaced to the user.
    pub fn is_soft(&self) -> bool {
        matches!(
            self,
            Error::WindowNotFound(_)
                | Error::WindowFullscreen(_)
                | Error::WindowMinimized(_)
                | Error::FullscreenUnavailable(_)
                | Error::NoAppState(_)
                | Error::StorageUnavailable(_)
                | Error::StorageWrite { .. }
        )
    }

    /// Returns a stable error code for logs and the JS boundary
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::WindowNotFound(_) => "WINDOW_NOT_FOUND",
            Error::WindowFullscreen(_) => "WINDOW_FULLSCREEN",
            Error::WindowMinimized(_) => "WINDOW_MINIMIZED",
            Error::FullscreenUnavailable(_) => "FULLSCREEN_UNAVAILABLE",
            Error::NoAppState(_) => "NO_APP_STATE",
            Error::IncorrectPassword => "INCORRECT_PASSWORD",
            Error::UnknownApp(_) => "UNKNOWN_APP",
            Error::UnknownTheme(_) => "UNKNOWN_THEME",
            Error::StorageUnavailable(_) => "STORAGE_UNAVAILABLE",
            Error::StorageWrite { .. } => "STORAGE_WRITE",
            Error::Serialization(_) => "SERIALIZATION",
            Error::InvalidConfig(_) => "INVALID_CONFIG",
            Error::Io(_) => "IO",
        }
    }
}
