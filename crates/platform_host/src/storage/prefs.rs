//! Key/value preference storage used for desktop configuration.

use std::{cell::RefCell, collections::HashMap, future::Future, pin::Pin, rc::Rc};

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Object-safe boxed future returned by [`PrefsStore`] methods.
pub type PrefsStoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Preference storage failures.
pub enum PrefsError {
    /// The backing store rejected the operation.
    #[error("preference backend failed: {0}")]
    Backend(String),
    /// The stored text is not valid JSON for the requested type.
    #[error("preference `{key}` is malformed: {message}")]
    Malformed {
        /// Key that failed to decode.
        key: String,
        /// Decoder message.
        message: String,
    },
}

/// Host service holding one JSON document per key.
pub trait PrefsStore {
    /// Loads the raw JSON stored under `key`.
    fn load_pref<'a>(&'a self, key: &'a str)
        -> PrefsStoreFuture<'a, Result<Option<String>, PrefsError>>;

    /// Stores raw JSON under `key`.
    fn save_pref<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), PrefsError>>;

    /// Removes `key`.
    fn delete_pref<'a>(&'a self, key: &'a str) -> PrefsStoreFuture<'a, Result<(), PrefsError>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Store that never holds anything; every load misses.
pub struct NoopPrefsStore;

impl PrefsStore for NoopPrefsStore {
    fn load_pref<'a>(
        &'a self,
        _key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, PrefsError>> {
        Box::pin(async { Ok(None) })
    }

    fn save_pref<'a>(
        &'a self,
        _key: &'a str,
        _raw_json: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), PrefsError>> {
        Box::pin(async { Ok(()) })
    }

    fn delete_pref<'a>(&'a self, _key: &'a str) -> PrefsStoreFuture<'a, Result<(), PrefsError>> {
        Box::pin(async { Ok(()) })
    }
}

#[derive(Debug, Clone, Default)]
/// Shared in-memory store; clones see the same entries.
pub struct MemoryPrefsStore {
    inner: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryPrefsStore {
    /// Creates a store pre-populated with one raw entry.
    pub fn with_entry(key: impl Into<String>, raw_json: impl Into<String>) -> Self {
        let store = Self::default();
        store.inner.borrow_mut().insert(key.into(), raw_json.into());
        store
    }
}

impl PrefsStore for MemoryPrefsStore {
    fn load_pref<'a>(
        &'a self,
        key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, PrefsError>> {
        Box::pin(async move { Ok(self.inner.borrow().get(key).cloned()) })
    }

    fn save_pref<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), PrefsError>> {
        Box::pin(async move {
            self.inner
                .borrow_mut()
                .insert(key.to_string(), raw_json.to_string());
            Ok(())
        })
    }

    fn delete_pref<'a>(&'a self, key: &'a str) -> PrefsStoreFuture<'a, Result<(), PrefsError>> {
        Box::pin(async move {
            self.inner.borrow_mut().remove(key);
            Ok(())
        })
    }
}

/// Loads and decodes a typed value stored under `key`.
///
/// # Errors
///
/// Returns [`PrefsError::Backend`] when the store fails and [`PrefsError::Malformed`] when the
/// stored JSON does not decode as `T`.
pub async fn load_pref_with<S: PrefsStore + ?Sized, T: DeserializeOwned>(
    store: &S,
    key: &str,
) -> Result<Option<T>, PrefsError> {
    let Some(raw) = store.load_pref(key).await? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|err| PrefsError::Malformed {
            key: key.to_string(),
            message: err.to_string(),
        })
}

/// Encodes and stores a typed value under `key`.
///
/// # Errors
///
/// Returns [`PrefsError::Malformed`] when encoding fails, or the store error.
pub async fn save_pref_with<S: PrefsStore + ?Sized, T: Serialize>(
    store: &S,
    key: &str,
    value: &T,
) -> Result<(), PrefsError> {
    let raw = serde_json::to_string(value).map_err(|err| PrefsError::Malformed {
        key: key.to_string(),
        message: err.to_string(),
    })?;
    store.save_pref(key, &raw).await
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Pacing {
        delay_ms: u64,
    }

    #[test]
    fn typed_values_round_trip_through_memory_store() {
        let store = MemoryPrefsStore::default();
        block_on(save_pref_with(&store, "pacing", &Pacing { delay_ms: 120 })).expect("save");

        let loaded: Option<Pacing> = block_on(load_pref_with(&store, "pacing")).expect("load");
        assert_eq!(loaded, Some(Pacing { delay_ms: 120 }));

        block_on(store.delete_pref("pacing")).expect("delete");
        let gone: Option<Pacing> = block_on(load_pref_with(&store, "pacing")).expect("load");
        assert_eq!(gone, None);
    }

    #[test]
    fn malformed_entry_reports_its_key() {
        let store = MemoryPrefsStore::with_entry("pacing", "{not json");
        let store_obj: &dyn PrefsStore = &store;

        let err = block_on(load_pref_with::<_, Pacing>(store_obj, "pacing"))
            .expect_err("malformed json");
        assert!(matches!(err, PrefsError::Malformed { ref key, .. } if key == "pacing"));
    }

    #[test]
    fn noop_store_always_misses() {
        let store = NoopPrefsStore;
        block_on(store.save_pref("k", "{}")).expect("save");
        assert_eq!(block_on(store.load_pref("k")).expect("load"), None);
    }
}
