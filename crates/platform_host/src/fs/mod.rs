//! Virtual filesystem: entry records and the process-wide store.

pub mod store;
pub mod types;
