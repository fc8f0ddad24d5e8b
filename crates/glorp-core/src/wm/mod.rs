//! Window manager - window lifecycle, z-order, taskbar sync and dragging
//!
//! Every live [`Window`] has exactly one [`TaskbarEntry`] with the same id,
//! title and minimized flag, and vice versa. All mutations go through
//! [`WindowManager`] so the two lists cannot drift apart;
//! [`WindowManager::check_consistency`] verifies it.

mod drag;
mod layout;
mod taskbar;

pub use drag::DragSession;
pub use layout::{clamp_origin, clamp_size, is_narrow, place, Placement};
pub use taskbar::{Taskbar, TaskbarEntry};

use crate::{
    apps::AppKind,
    config::DesktopConfig,
    timer::TimerId,
    types::{Point, PointerEvent, Size, Viewport, WindowId, WindowIdGenerator},
    Error, Result,
};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

/// What a window hosts. The manager stores it and never looks inside.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WindowContent {
    /// Markup supplied by an external content provider
    Markup(String),
    /// Third-party page shown in an iframe
    Embed { url: String },
    /// A built-in application
    App(AppKind),
}

/// How a window is currently shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DisplayState {
    Normal,
    Minimized,
    Fullscreen,
}

impl std::fmt::Display for DisplayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisplayState::Normal => write!(f, "normal"),
            DisplayState::Minimized => write!(f, "minimized"),
            DisplayState::Fullscreen => write!(f, "fullscreen"),
        }
    }
}

/// A positioned, titled container
#[derive(Debug, Clone, Serialize)]
pub struct Window {
    pub id: WindowId,
    pub title: String,
    pub content: WindowContent,
    /// Size the opener asked for
    pub requested_size: Size,
    /// Size after clamping (or manual resize)
    pub size: Size,
    pub position: Point,
    minimized: bool,
    fullscreen: bool,
    narrow: bool,
    timers: Vec<TimerId>,
}

impl Window {
    pub fn state(&self) -> DisplayState {
        if self.minimized {
            DisplayState::Minimized
        } else if self.fullscreen {
            DisplayState::Fullscreen
        } else {
            DisplayState::Normal
        }
    }

    pub fn is_minimized(&self) -> bool {
        self.minimized
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn is_visible(&self) -> bool {
        !self.minimized
    }

    /// Placed with the narrow layout (no fullscreen control)
    pub fn is_narrow(&self) -> bool {
        self.narrow
    }

    /// Drag and manual resize are only allowed outside fullscreen
    pub fn is_movable(&self) -> bool {
        !self.fullscreen
    }

    /// Recurring activities owned by this window
    pub fn timers(&self) -> &[TimerId] {
        &self.timers
    }
}

/// A window removed by [`WindowManager::close_window`]
#[derive(Debug, Clone)]
pub struct ClosedWindow {
    pub id: WindowId,
    pub title: String,
    /// Timers the window owned; the caller must cancel them
    pub timers: Vec<TimerId>,
}

/// Window manager state
#[derive(Debug)]
pub struct WindowManager {
    config: DesktopConfig,
    viewport: Viewport,
    windows: BTreeMap<WindowId, Window>,
    /// Bottom to top
    stack: Vec<WindowId>,
    taskbar: Taskbar,
    drag: Option<DragSession>,
    ids: WindowIdGenerator,
}

impl WindowManager {
    pub fn new(config: DesktopConfig, viewport: Viewport) -> Self {
        Self {
            config,
            viewport,
            windows: BTreeMap::new(),
            stack: Vec::new(),
            taskbar: Taskbar::new(),
            drag: None,
            ids: WindowIdGenerator::new(),
        }
    }

    pub fn config(&self) -> &DesktopConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Create, show and focus a window
    #[instrument(skip(self, content))]
    pub fn create_window(&mut self, title: &str, content: WindowContent, width: f64, height: f64) -> WindowId {
        let requested = Size::new(width, height);
        let placement = place(requested, self.viewport, &self.config);
        let id = self.ids.next_id();

        self.windows.insert(
            id,
            Window {
                id,
                title: title.to_string(),
                content,
                requested_size: requested,
                size: placement.size,
                position: placement.origin,
                minimized: false,
                fullscreen: false,
                narrow: placement.narrow,
                timers: Vec::new(),
            },
        );
        self.stack.push(id);
        self.taskbar.add(id, title);
        self.taskbar.activate_only(id);

        info!(
            window = %id,
            size = %placement.size,
            narrow = placement.narrow,
            "Window created"
        );
        id
    }

    /// Hand a timer to a window; it is returned from [`close_window`](Self::close_window)
    pub fn attach_timer(&mut self, id: WindowId, timer: TimerId) -> Result<()> {
        let window = self.windows.get_mut(&id).ok_or(Error::WindowNotFound(id))?;
        window.timers.push(timer);
        Ok(())
    }

    /// Remove a window and its taskbar entry
    #[instrument(skip(self))]
    pub fn close_window(&mut self, id: WindowId) -> Result<ClosedWindow> {
        let window = self.windows.remove(&id).ok_or(Error::WindowNotFound(id))?;
        self.stack.retain(|w| *w != id);
        self.taskbar.remove(id);
        if self.drag.map(|d| d.window_id) == Some(id) {
            self.drag = None;
        }

        info!(window = %id, timers = window.timers.len(), "Window closed");
        Ok(ClosedWindow {
            id,
            title: window.title,
            timers: window.timers,
        })
    }

    /// Hide a window without touching its position, size or fullscreen flag
    pub fn minimize_window(&mut self, id: WindowId) -> Result<()> {
        let window = self.windows.get_mut(&id).ok_or(Error::WindowNotFound(id))?;
        window.minimized = true;
        self.taskbar.set_minimized(id, true);
        if self.drag.map(|d| d.window_id) == Some(id) {
            self.drag = None;
        }
        debug!(window = %id, "Window minimized");
        Ok(())
    }

    /// Show a minimized window again and focus it
    pub fn maximize_window(&mut self, id: WindowId) -> Result<()> {
        self.focus_window(id)
    }

    /// Toggle fullscreen. Returns the new fullscreen flag.
    pub fn toggle_maximize(&mut self, id: WindowId) -> Result<bool> {
        let window = self.windows.get_mut(&id).ok_or(Error::WindowNotFound(id))?;
        if window.narrow {
            return Err(Error::FullscreenUnavailable(id));
        }
        window.fullscreen = !window.fullscreen;
        let fullscreen = window.fullscreen;
        if fullscreen && self.drag.map(|d| d.window_id) == Some(id) {
            self.drag = None;
        }
        debug!(window = %id, fullscreen, "Fullscreen toggled");
        Ok(fullscreen)
    }

    /// Raise a window above all siblings, restoring it if minimized, and
    /// make its taskbar entry the only active one
    pub fn focus_window(&mut self, id: WindowId) -> Result<()> {
        let window = self.windows.get_mut(&id).ok_or(Error::WindowNotFound(id))?;
        if window.minimized {
            window.minimized = false;
            self.taskbar.set_minimized(id, false);
        }
        self.stack.retain(|w| *w != id);
        self.stack.push(id);
        self.taskbar.activate_only(id);
        Ok(())
    }

    /// Taskbar entry clicked
    pub fn taskbar_click(&mut self, id: WindowId) -> Result<()> {
        self.focus_window(id)
    }

    /// Manual resize, clamped to the minimum size and the viewport
    pub fn resize_window(&mut self, id: WindowId, width: f64, height: f64) -> Result<Size> {
        let viewport = self.viewport;
        let min = self.config.min_window;
        let window = self.windows.get_mut(&id).ok_or(Error::WindowNotFound(id))?;
        if window.fullscreen {
            return Err(Error::WindowFullscreen(id));
        }

        let max_width = (viewport.width - window.position.x).max(min.width);
        let max_height = (viewport.height - window.position.y).max(min.height);
        window.size = Size::new(width.clamp(min.width, max_width), height.clamp(min.height, max_height));
        Ok(window.size)
    }

    /// Pointer-down on a window header
    pub fn begin_drag(&mut self, id: WindowId, pointer: PointerEvent) -> Result<()> {
        let window = self.windows.get(&id).ok_or(Error::WindowNotFound(id))?;
        if window.fullscreen {
            return Err(Error::WindowFullscreen(id));
        }
        if window.minimized {
            return Err(Error::WindowMinimized(id));
        }

        self.drag = Some(DragSession::new(id, pointer.position, window.position, pointer.kind));
        self.focus_window(id)?;
        debug!(window = %id, kind = ?pointer.kind, "Drag started");
        Ok(())
    }

    /// Pointer moved; returns the new origin when a drag is in progress
    pub fn drag_to(&mut self, pointer: PointerEvent) -> Option<Point> {
        let drag = self.drag?;
        let surface = self.viewport;
        let window = self.windows.get_mut(&drag.window_id)?;

        window.position = clamp_origin(drag.origin_for(pointer.position), window.size, surface);
        Some(window.position)
    }

    /// Pointer released
    pub fn end_drag(&mut self) -> Option<WindowId> {
        self.drag.take().map(|d| d.window_id)
    }

    pub fn active_drag(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    /// New surface size; windows are shrunk and pulled back inside it
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        for window in self.windows.values_mut() {
            window.size = clamp_size(window.size, viewport);
            window.position = clamp_origin(window.position, window.size, viewport);
        }
        debug!(width = viewport.width, height = viewport.height, "Viewport changed");
    }

    pub fn window(&self, id: WindowId) -> Option<&Window> {
        self.windows.get(&id)
    }

    pub fn contains(&self, id: WindowId) -> bool {
        self.windows.contains_key(&id)
    }

    /// Windows in creation order
    pub fn windows(&self) -> impl Iterator<Item = &Window> {
        self.windows.values()
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Window ids from bottom to top
    pub fn stacking_order(&self) -> &[WindowId] {
        &self.stack
    }

    /// 1-based z-index, higher is closer to the viewer
    pub fn z_index(&self, id: WindowId) -> Option<usize> {
        self.stack.iter().position(|w| *w == id).map(|i| i + 1)
    }

    /// Topmost window, visible or not
    pub fn topmost(&self) -> Option<WindowId> {
        self.stack.last().copied()
    }

    pub fn taskbar(&self) -> &Taskbar {
        &self.taskbar
    }

    /// Window whose taskbar entry is active
    pub fn focused(&self) -> Option<WindowId> {
        self.taskbar.active().map(|e| e.window_id)
    }

    /// Check the window/taskbar/stack invariants, describing the first violation
    pub fn check_consistency(&self) -> std::result::Result<(), String> {
        if self.taskbar.len() != self.windows.len() {
            return Err(format!(
                "{} windows but {} taskbar entries",
                self.windows.len(),
                self.taskbar.len()
            ));
        }
        for entry in self.taskbar.entries() {
            let window = self
                .windows
                .get(&entry.window_id)
                .ok_or_else(|| format!("taskbar entry {} has no window", entry.window_id))?;
            if window.title != entry.title {
                return Err(format!("title mismatch for {}", entry.window_id));
            }
            if window.minimized != entry.minimized {
                return Err(format!("minimized flag mismatch for {}", entry.window_id));
            }
            if entry.active && window.minimized {
                return Err(format!("minimized window {} is marked active", entry.window_id));
            }
        }
        let active = self.taskbar.entries().iter().filter(|e| e.active).count();
        if active > 1 {
            return Err(format!("{active} taskbar entries are active"));
        }
        if self.stack.len() != self.windows.len() || !self.stack.iter().all(|id| self.windows.contains_key(id)) {
            return Err("stacking order does not match live windows".to_string());
        }
        Ok(())
    }
}
