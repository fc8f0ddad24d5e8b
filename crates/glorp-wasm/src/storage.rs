//! localStorage-backed key-value store

use glorp_core::{Error, KeyValueStore, Result};
use web_sys::Storage;

/// Handle to `window.localStorage`. Every call goes straight to the
/// browser, so several handles see the same data.
#[derive(Clone, Default)]
pub struct LocalStorage {
    storage: Option<Storage>,
}

impl LocalStorage {
    /// Grab the page's storage. Private browsing modes may refuse it, in
    /// which case reads return nothing and writes fail.
    pub fn open() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            web_sys::console::warn_1(&"[Glorp WASM] localStorage unavailable, settings will not persist".into());
        }
        Self { storage }
    }

    fn storage(&self) -> Result<&Storage> {
        self.storage
            .as_ref()
            .ok_or_else(|| Error::StorageUnavailable("localStorage is not available".into()))
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage()?
            .get_item(key)
            .map_err(|e| Error::StorageUnavailable(format!("{e:?}")))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| Error::storage_write(key, format!("{e:?}")))
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.storage()?
            .remove_item(key)
            .map_err(|e| Error::storage_write(key, format!("{e:?}")))
    }
}
