//! `localStorage` adapter for canvas persistence.

use sk_core::{CanvasError, Result, Storage};

pub struct LocalStorage {
    inner: web_sys::Storage,
}

impl LocalStorage {
    /// The window's `localStorage`, if the page is allowed to use it.
    pub fn from_window() -> Option<Self> {
        let inner = web_sys::window()?.local_storage().ok()??;
        Some(Self { inner })
    }
}

impl Storage for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.inner
            .set_item(key, &value)
            .map_err(|e| CanvasError::Storage(format!("{e:?}")))
    }
}
