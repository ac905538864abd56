//! `localStorage`-backed preference store.
//!
//! Browser calls are synchronous; the [`PrefsStore`] futures resolve immediately. Off `wasm32`
//! every load misses and every write succeeds, so host-side tests can use this type.

use platform_host::{PrefsError, PrefsStore, PrefsStoreFuture};
use serde::{de::DeserializeOwned, Serialize};

#[derive(Debug, Clone, Copy, Default)]
/// Browser preference store backed by `window.localStorage`.
pub struct WebPrefsStore;

impl WebPrefsStore {
    /// Loads the raw JSON stored under `key`.
    pub fn load_json(self, key: &str) -> Option<String> {
        #[cfg(target_arch = "wasm32")]
        {
            let storage = web_sys::window()?.local_storage().ok().flatten()?;
            storage.get_item(key).ok().flatten()
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = key;
            None
        }
    }

    /// Saves raw JSON under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`PrefsError::Backend`] when localStorage is unavailable or the write fails.
    pub fn save_json(self, key: &str, raw_json: &str) -> Result<(), PrefsError> {
        #[cfg(target_arch = "wasm32")]
        {
            local_storage()?
                .set_item(key, raw_json)
                .map_err(|e| PrefsError::Backend(format!("localStorage set_item failed: {e:?}")))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = (key, raw_json);
            Ok(())
        }
    }

    /// Removes `key`.
    ///
    /// # Errors
    ///
    /// Returns [`PrefsError::Backend`] when localStorage is unavailable or the delete fails.
    pub fn delete_json(self, key: &str) -> Result<(), PrefsError> {
        #[cfg(target_arch = "wasm32")]
        {
            local_storage()?
                .remove_item(key)
                .map_err(|e| PrefsError::Backend(format!("localStorage remove_item failed: {e:?}")))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = key;
            Ok(())
        }
    }

    /// Loads and decodes a typed value, treating malformed JSON as absent.
    pub fn load_typed<T: DeserializeOwned>(self, key: &str) -> Option<T> {
        let raw = self.load_json(key)?;
        serde_json::from_str(&raw).ok()
    }

    /// Encodes and saves a typed value.
    ///
    /// # Errors
    ///
    /// Returns an error when encoding or the localStorage write fails.
    pub fn save_typed<T: Serialize>(self, key: &str, value: &T) -> Result<(), PrefsError> {
        let raw = serde_json::to_string(value).map_err(|e| PrefsError::Malformed {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.save_json(key, &raw)
    }
}

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Result<web_sys::Storage, PrefsError> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .ok_or_else(|| PrefsError::Backend("localStorage unavailable".to_string()))
}

impl PrefsStore for WebPrefsStore {
    fn load_pref<'a>(
        &'a self,
        key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, PrefsError>> {
        let store = *self;
        Box::pin(async move { Ok(store.load_json(key)) })
    }

    fn save_pref<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), PrefsError>> {
        let store = *self;
        Box::pin(async move { store.save_json(key, raw_json) })
    }

    fn delete_pref<'a>(&'a self, key: &'a str) -> PrefsStoreFuture<'a, Result<(), PrefsError>> {
        let store = *self;
        Box::pin(async move { store.delete_json(key) })
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use futures::executor::block_on;
    use platform_host::load_pref_with;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn host_build_misses_loads_and_accepts_writes() {
        let store = WebPrefsStore;
        assert_eq!(store.load_json("winsim.desktop.config.v1"), None);
        assert_eq!(store.save_typed("winsim.desktop.config.v1", &42_u32), Ok(()));
        assert_eq!(
            block_on(load_pref_with::<_, u32>(&store, "winsim.desktop.config.v1")),
            Ok(None)
        );
        assert_eq!(block_on(store.delete_pref("winsim.desktop.config.v1")), Ok(()));
    }
}
