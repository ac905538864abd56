//! Browser (`wasm32`) implementations of [`platform_host`] service contracts.
//!
//! Only preference storage has a browser backend; the file store lives in memory and the chat
//! boundary is wired by the entry crate.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod storage;

pub use storage::local_prefs::WebPrefsStore;

/// Returns the preference store for the current target.
pub fn prefs_store() -> WebPrefsStore {
    WebPrefsStore
}
