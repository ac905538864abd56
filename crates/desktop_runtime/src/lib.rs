//! Desktop session runtime: window manager reducer, shell chrome, and the Leptos desktop UI.
//!
//! State transitions live in [`reducer`] and [`window_manager`] and are plain Rust. The
//! [`DesktopProvider`] component owns the reactive state and the shared file store, and
//! [`DesktopShell`] renders the login screen, the welcome screen, or the desktop.

pub mod app_runtime;
pub mod apps;
pub mod chrome;
pub mod components;
pub mod config;
mod effect_executor;
pub mod model;
pub mod reducer;
pub mod runtime_context;
pub mod window_manager;

pub use app_runtime::AppRuntimeState;
pub use components::DesktopShell;
pub use config::{
    load_desktop_config, load_desktop_config_or_default, DesktopConfig, DESKTOP_CONFIG_KEY,
};
pub use model::*;
pub use reducer::{reduce_desktop, DesktopAction, ReducerError, RuntimeEffect};
pub use runtime_context::{
    apply_file_command, use_desktop_runtime, DesktopProvider, DesktopRuntimeContext,
};
