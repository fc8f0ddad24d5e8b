//! Taskbar entries mirroring live windows

use crate::types::WindowId;
use serde::Serialize;

/// Summary of one window shown in the taskbar
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskbarEntry {
    pub window_id: WindowId,
    pub title: String,
    pub minimized: bool,
    pub active: bool,
}

/// Open-program list, in window creation order
#[derive(Debug, Default, Clone, Serialize)]
pub struct Taskbar {
    entries: Vec<TaskbarEntry>,
}

impl Taskbar {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&mut self, window_id: WindowId, title: &str) {
        self.entries.push(TaskbarEntry {
            window_id,
            title: title.to_string(),
            minimized: false,
            active: false,
        });
    }

    pub(crate) fn remove(&mut self, window_id: WindowId) -> Option<TaskbarEntry> {
        let index = self.entries.iter().position(|e| e.window_id == window_id)?;
        Some(self.entries.remove(index))
    }

    pub(crate) fn set_minimized(&mut self, window_id: WindowId, minimized: bool) {
        if let Some(entry) = self.get_mut(window_id) {
            entry.minimized = minimized;
            if minimized {
                entry.active = false;
            }
        }
    }

    /// Mark `window_id` active and every other entry inactive
    pub(crate) fn activate_only(&mut self, window_id: WindowId) {
        for entry in &mut self.entries {
            entry.active = entry.window_id == window_id;
        }
    }

    pub fn entries(&self) -> &[TaskbarEntry] {
        &self.entries
    }

    pub fn get(&self, window_id: WindowId) -> Option<&TaskbarEntry> {
        self.entries.iter().find(|e| e.window_id == window_id)
    }

    fn get_mut(&mut self, window_id: WindowId) -> Option<&mut TaskbarEntry> {
        self.entries.iter_mut().find(|e| e.window_id == window_id)
    }

    /// The entry currently marked active
    pub fn active(&self) -> Option<&TaskbarEntry> {
        self.entries.iter().find(|e| e.active)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
