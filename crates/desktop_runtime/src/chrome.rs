//! View-model queries for the taskbar, start menu, desktop icons, and task manager.
//!
//! Everything here is derived from [`DesktopState`] so components stay declarative.

use chrono::NaiveDateTime;
use desktop_app_contract::AppId;

use crate::model::{DesktopState, WindowId};

/// Start-menu tiles that are shown but do nothing.
pub const PLACEHOLDER_START_APPS: [&str; 6] = ["Word", "Excel", "Store", "Solitaire", "Mail", "Photos"];

/// Icon used for placeholder tiles.
pub const PLACEHOLDER_ICON: &str = "monitor";

/// Message shown by the task manager when nothing is open.
pub const NO_APPS_RUNNING: &str = "No user apps running";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// One taskbar button.
pub struct TaskbarEntry {
    /// App launched by the button.
    pub app_id: AppId,
    /// Whether the app has a window.
    pub is_open: bool,
    /// Whether the app owns the active window.
    pub is_active: bool,
}

/// Taskbar buttons in pinned order, flagged from the current windows.
pub fn taskbar_entries(state: &DesktopState) -> Vec<TaskbarEntry> {
    let active_app = state.active_window().map(|w| w.app_id);
    AppId::PINNED
        .into_iter()
        .map(|app_id| TaskbarEntry {
            app_id,
            is_open: state.is_app_open(app_id),
            is_active: active_app == Some(app_id),
        })
        .collect()
}

/// Apps shown as desktop icons, in display order.
pub fn desktop_icons() -> &'static [AppId] {
    &AppId::PINNED
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// A start-menu grid cell.
pub enum StartMenuTile {
    /// Launches an app.
    App(AppId),
    /// Inert tile with a label.
    Placeholder(&'static str),
}

impl StartMenuTile {
    /// Tile caption.
    pub fn label(self) -> &'static str {
        match self {
            Self::App(app_id) => app_id.label(),
            Self::Placeholder(label) => label,
        }
    }

    /// Tile icon id.
    pub fn icon(self) -> &'static str {
        match self {
            Self::App(app_id) => app_id.icon(),
            Self::Placeholder(_) => PLACEHOLDER_ICON,
        }
    }
}

/// Pinned apps followed by placeholder tiles.
pub fn start_menu_tiles() -> Vec<StartMenuTile> {
    AppId::PINNED
        .into_iter()
        .map(StartMenuTile::App)
        .chain(PLACEHOLDER_START_APPS.into_iter().map(StartMenuTile::Placeholder))
        .collect()
}

/// Start-menu greeting.
pub fn welcome_heading(user_name: &str) -> String {
    format!("Welcome, {user_name}")
}

/// Taskbar clock: time line and date line.
pub fn clock_lines(now: NaiveDateTime) -> (String, String) {
    (
        now.format("%-I:%M %p").to_string(),
        now.format("%-m/%-d/%Y").to_string(),
    )
}

/// Login-screen clock: 24-hour time and long date.
pub fn lock_screen_lines(now: NaiveDateTime) -> (String, String) {
    (
        now.format("%H:%M").to_string(),
        now.format("%A, %B %-d").to_string(),
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One task-manager process row.
pub struct ProcessRow {
    /// Window ended by "End task".
    pub window_id: WindowId,
    /// Window title.
    pub name: String,
    /// Executable name shown under the title.
    pub image: String,
    /// Four-digit hex process id.
    pub pid: String,
    /// Resident memory in MB.
    pub memory_mb: u32,
}

/// Status column text; every listed process is running.
pub const PROCESS_STATUS: &str = "Running";

/// Process rows for every open window in creation order.
pub fn process_rows(state: &DesktopState) -> Vec<ProcessRow> {
    state
        .windows
        .iter()
        .map(|w| {
            let mixed = w.id.0.wrapping_mul(2_654_435_761);
            ProcessRow {
                window_id: w.id,
                name: w.title.clone(),
                image: format!("{}.exe", w.app_id.token()),
                pid: format!("{:04X}", (mixed >> 8) & 0xFFFF),
                memory_mb: 50 + (mixed % 150) as u32,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Header gauges in percent.
pub struct SystemStats {
    /// CPU usage.
    pub cpu: u32,
    /// Memory usage.
    pub memory: u32,
    /// Disk usage.
    pub disk: u32,
}

impl Default for SystemStats {
    fn default() -> Self {
        Self {
            cpu: 12,
            memory: 45,
            disk: 2,
        }
    }
}

impl SystemStats {
    /// Interval between samples.
    pub const REFRESH_MS: u64 = 2000;

    /// Draws new gauges from a source of uniform values in `[0, 1)`.
    pub fn sample(mut unit: impl FnMut() -> f64) -> Self {
        let mut pick = |span: u32, base: u32| base + ((unit().clamp(0.0, 0.999_999) * span as f64) as u32);
        Self {
            cpu: pick(20, 5),
            memory: pick(10, 40),
            disk: pick(5, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use desktop_app_contract::AppPayload;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::reducer::{reduce_desktop, DesktopAction};
    use crate::model::InteractionState;

    fn desktop_with(apps: &[AppId]) -> DesktopState {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::LogIn {
                user_name: "Guest".into(),
            },
        )
        .expect("log in");
        for app_id in apps {
            reduce_desktop(
                &mut state,
                &mut interaction,
                DesktopAction::OpenApp {
                    app_id: *app_id,
                    payload: None::<AppPayload>,
                },
            )
            .expect("open");
        }
        state
    }

    #[test]
    fn taskbar_marks_open_apps_and_the_top_window_as_active() {
        let state = desktop_with(&[AppId::Terminal, AppId::Explorer]);
        let entries = taskbar_entries(&state);

        assert_eq!(entries.len(), AppId::PINNED.len());
        let explorer = entries[0];
        assert_eq!(explorer.app_id, AppId::Explorer);
        assert!(explorer.is_open && explorer.is_active);
        let terminal = entries
            .iter()
            .find(|e| e.app_id == AppId::Terminal)
            .expect("terminal entry");
        assert!(terminal.is_open && !terminal.is_active);
        assert!(entries
            .iter()
            .filter(|e| !matches!(e.app_id, AppId::Terminal | AppId::Explorer))
            .all(|e| !e.is_open));
    }

    #[test]
    fn start_menu_lists_pinned_apps_before_placeholders() {
        let tiles = start_menu_tiles();
        assert_eq!(tiles.len(), 15);
        assert_eq!(tiles[0].label(), "This PC");
        assert_eq!(tiles[9], StartMenuTile::Placeholder("Word"));
        assert_eq!(tiles[14].icon(), PLACEHOLDER_ICON);
        assert_eq!(welcome_heading("Administrator"), "Welcome, Administrator");
    }

    #[test]
    fn clock_uses_twelve_hour_time_and_numeric_date() {
        let now = NaiveDate::from_ymd_opt(2024, 5, 3)
            .and_then(|d| d.and_hms_opt(14, 7, 0))
            .expect("valid");
        assert_eq!(
            clock_lines(now),
            ("2:07 PM".to_string(), "5/3/2024".to_string())
        );
        assert_eq!(
            lock_screen_lines(now),
            ("14:07".to_string(), "Friday, May 3".to_string())
        );
    }

    #[test]
    fn process_rows_follow_window_order_with_stable_figures() {
        let state = desktop_with(&[AppId::Notepad, AppId::TaskManager]);
        let rows = process_rows(&state);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Notepad");
        assert_eq!(rows[1].image, "taskmanager.exe");
        assert_eq!(rows[0].pid.len(), 4);
        assert!((50..200).contains(&rows[0].memory_mb));
        assert_eq!(process_rows(&state), rows);
        assert!(process_rows(&desktop_with(&[])).is_empty());
    }

    #[test]
    fn sampled_stats_stay_in_their_ranges() {
        let low = SystemStats::sample(|| 0.0);
        let high = SystemStats::sample(|| 1.0);
        assert_eq!(
            low,
            SystemStats {
                cpu: 5,
                memory: 40,
                disk: 0
            }
        );
        assert_eq!(
            high,
            SystemStats {
                cpu: 24,
                memory: 49,
                disk: 4
            }
        );
    }
}
