//! Persistent preference storage.

pub mod prefs;
