//! Desktop tuning knobs loaded from the preference store at boot.

use std::time::Duration;

use platform_host::{load_pref_with, PrefsError, PrefsStore};
use serde::{Deserialize, Serialize};

/// Preference key holding the serialized [`DesktopConfig`].
pub const DESKTOP_CONFIG_KEY: &str = "winsim.desktop.config.v1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Timing and layout constants for the desktop. Missing fields take their defaults.
pub struct DesktopConfig {
    /// Delay between paced terminal script lines.
    pub pacing_ms: u64,
    /// Delay between a log-off request and the session ending.
    pub logoff_delay_ms: u64,
    /// How long the welcome screen shows after sign-in.
    pub welcome_delay_ms: u64,
    /// Height reserved for the taskbar; maximized windows stop above it.
    pub taskbar_height: i32,
    /// Z-index counter value at session start.
    pub initial_z_index: u64,
    /// Left edge of the first cascaded window.
    pub cascade_x: i32,
    /// Top edge of the first cascaded window.
    pub cascade_y: i32,
    /// Per-window diagonal cascade offset.
    pub cascade_step: i32,
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self {
            pacing_ms: 200,
            logoff_delay_ms: 800,
            welcome_delay_ms: 2000,
            taskbar_height: 48,
            initial_z_index: 10,
            cascade_x: 100,
            cascade_y: 50,
            cascade_step: 40,
        }
    }
}

impl DesktopConfig {
    /// Pacing delay as a [`Duration`].
    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_ms)
    }

    /// Log-off delay as a [`Duration`].
    pub fn logoff_delay(&self) -> Duration {
        Duration::from_millis(self.logoff_delay_ms)
    }

    /// Welcome-screen delay as a [`Duration`].
    pub fn welcome_delay(&self) -> Duration {
        Duration::from_millis(self.welcome_delay_ms)
    }

    /// Top-left corner for a new window given how many are already open.
    pub fn cascade_origin(&self, open_windows: usize) -> (i32, i32) {
        let step = self.cascade_step.saturating_mul(open_windows as i32);
        (self.cascade_x + step, self.cascade_y + step)
    }
}

/// Loads the stored config, or `None` when nothing is stored.
///
/// # Errors
///
/// Returns [`PrefsError`] when the backend fails or the stored JSON does not decode.
pub async fn load_desktop_config<S: PrefsStore + ?Sized>(
    store: &S,
) -> Result<Option<DesktopConfig>, PrefsError> {
    load_pref_with(store, DESKTOP_CONFIG_KEY).await
}

/// Loads the stored config, logging and falling back to defaults on any failure.
pub async fn load_desktop_config_or_default<S: PrefsStore + ?Sized>(store: &S) -> DesktopConfig {
    match load_desktop_config(store).await {
        Ok(Some(config)) => config,
        Ok(None) => DesktopConfig::default(),
        Err(err) => {
            leptos::logging::warn!("desktop config load failed, using defaults: {err}");
            DesktopConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use platform_host::{MemoryPrefsStore, NoopPrefsStore};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn partial_config_fills_missing_fields_with_defaults() {
        let store = MemoryPrefsStore::with_entry(DESKTOP_CONFIG_KEY, r#"{"pacing_ms":50}"#);
        let config = block_on(load_desktop_config(&store))
            .expect("load")
            .expect("stored");

        assert_eq!(config.pacing(), Duration::from_millis(50));
        assert_eq!(config.taskbar_height, 48);
        assert_eq!(config.initial_z_index, 10);
    }

    #[test]
    fn malformed_or_missing_config_falls_back_to_defaults() {
        let store = MemoryPrefsStore::with_entry(DESKTOP_CONFIG_KEY, "not json");
        assert!(block_on(load_desktop_config(&store)).is_err());
        assert_eq!(
            block_on(load_desktop_config_or_default(&store)),
            DesktopConfig::default()
        );
        assert_eq!(
            block_on(load_desktop_config_or_default(&NoopPrefsStore)),
            DesktopConfig::default()
        );
    }

    #[test]
    fn cascade_steps_diagonally_per_open_window() {
        let config = DesktopConfig::default();
        assert_eq!(config.cascade_origin(0), (100, 50));
        assert_eq!(config.cascade_origin(3), (220, 170));
    }
}
