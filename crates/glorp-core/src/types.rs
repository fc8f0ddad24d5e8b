//! Core types for Glorp Core

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique, time-derived window identifier.
///
/// Rendered as `window-<unix millis>`. Two windows created within the same
/// millisecond get consecutive values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WindowId(pub u64);

impl WindowId {
    /// Parse the `window-<millis>` form used by DOM ids
    pub fn parse(s: &str) -> Option<Self> {
        s.strip_prefix("window-")
            .and_then(|n| n.parse().ok())
            .map(WindowId)
    }
}

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "window-{}", self.0)
    }
}

/// Produces strictly increasing, wall-clock derived window ids
#[derive(Debug, Default)]
pub struct WindowIdGenerator {
    last: u64,
}

impl WindowIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id based on the current wall clock
    pub fn next_id(&mut self) -> WindowId {
        let now = chrono::Utc::now().timestamp_millis().max(0) as u64;
        self.next_at(now)
    }

    /// Next id for a given timestamp, bumped past the previous one if needed
    pub fn next_at(&mut self, millis: u64) -> WindowId {
        let id = if millis > self.last { millis } else { self.last + 1 };
        self.last = id;
        WindowId(id)
    }
}

/// Unique identifier for a game session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A point on the desktop surface, in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Width and height, in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// The visible desktop surface windows live on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Common viewports
    pub const DESKTOP_1080P: Viewport = Viewport { width: 1920.0, height: 1080.0 };
    pub const LAPTOP: Viewport = Viewport { width: 1366.0, height: 768.0 };
    pub const PHONE: Viewport = Viewport { width: 390.0, height: 844.0 };
}

impl Default for Viewport {
    fn default() -> Self {
        Self::LAPTOP
    }
}

/// Input device that produced a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerKind {
    Mouse,
    Touch,
}

/// A pointer position reported by the host, mouse or touch alike
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub position: Point,
}

impl PointerEvent {
    pub fn mouse(x: f64, y: f64) -> Self {
        Self {
            kind: PointerKind::Mouse,
            position: Point::new(x, y),
        }
    }

    pub fn touch(x: f64, y: f64) -> Self {
        Self {
            kind: PointerKind::Touch,
            position: Point::new(x, y),
        }
    }
}
