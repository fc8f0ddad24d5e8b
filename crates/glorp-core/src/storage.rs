//! Durable key-value storage
//!
//! Settings and high scores go through [`KeyValueStore`]. The browser
//! backs it with `localStorage`, the CLI with a JSON file, tests with
//! [`MemoryStore`]. Reads and writes are synchronous and each call is
//! atomic; the last writer wins.

use crate::Result;
use std::collections::HashMap;

/// Storage keys shared by every host
pub mod keys {
    pub const THEME: &str = "theme";
    pub const WINDOW_OPACITY: &str = "windowOpacity";
    pub const BLUR_EFFECTS: &str = "blurEffects";
    pub const SYSTEM_SOUNDS: &str = "systemSounds";
    pub const HIGH_SCORES: &str = "glorpy-bird-scores";
}

/// String key-value store
pub trait KeyValueStore {
    /// Read a value; `Ok(None)` when the key was never written
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite a value
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove a value if present
    fn remove(&mut self, key: &str) -> Result<()>;

    /// Read a value, treating an unavailable store like a missing key
    fn get_or_none(&self, key: &str) -> Option<String> {
        match self.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(key, error = %e, "Storage read failed, using default");
                None
            }
        }
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with the given pairs
    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: values.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}
