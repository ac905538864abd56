//! Window-manager transition helpers shared by the reducer and the window chrome.

use desktop_app_contract::{AppId, AppPayload};

use crate::model::{DesktopState, ResizeEdge, WindowId, WindowRecord, WindowRect};

/// Minimum allowed managed window width.
pub const MIN_WINDOW_WIDTH: i32 = 220;
/// Minimum allowed managed window height.
pub const MIN_WINDOW_HEIGHT: i32 = 140;

/// Title for a freshly opened window: `name.ext - Label` for file payloads, else the label.
pub fn window_title(app_id: AppId, payload: Option<&AppPayload>) -> String {
    match payload.and_then(AppPayload::file) {
        Some(file) if !file.name.is_empty() => {
            format!("{} - {}", file.file_name(), app_id.label())
        }
        _ => app_id.label().to_string(),
    }
}

/// Allocates the next z-index and assigns it to `window_id`, clearing minimization.
///
/// Returns `false` when the window does not exist; the counter is left untouched in that case.
pub fn raise_window(state: &mut DesktopState, window_id: WindowId) -> bool {
    let next_z = state.max_z_index.saturating_add(1);
    let Some(window) = state.windows.iter_mut().find(|w| w.id == window_id) else {
        return false;
    };
    window.z_index = next_z;
    window.minimized = false;
    state.max_z_index = next_z;
    true
}

/// Initial rectangle for a new window of `app_id`, cascaded by the current window count.
pub fn cascade_rect(state: &DesktopState, app_id: AppId) -> WindowRect {
    let (x, y) = state.config.cascade_origin(state.windows.len());
    let (w, h) = app_id.default_size();
    WindowRect { x, y, w, h }
}

/// Rectangle a window occupies on screen.
///
/// A maximized window fills `viewport` minus the taskbar; its stored rect is kept for restore.
pub fn effective_rect(window: &WindowRecord, viewport: WindowRect, taskbar_height: i32) -> WindowRect {
    if window.maximized {
        WindowRect {
            x: viewport.x,
            y: viewport.y,
            w: viewport.w,
            h: (viewport.h - taskbar_height).max(0),
        }
    } else {
        window.rect
    }
}

/// Applies resize deltas for a given edge/corner drag.
pub fn resize_rect(start: WindowRect, edge: ResizeEdge, dx: i32, dy: i32) -> WindowRect {
    let (left, top, right, bottom) = match edge {
        ResizeEdge::North => (false, true, false, false),
        ResizeEdge::South => (false, false, false, true),
        ResizeEdge::East => (false, false, true, false),
        ResizeEdge::West => (true, false, false, false),
        ResizeEdge::NorthEast => (false, true, true, false),
        ResizeEdge::NorthWest => (true, true, false, false),
        ResizeEdge::SouthEast => (false, false, true, true),
        ResizeEdge::SouthWest => (true, false, false, true),
    };

    let mut rect = start;
    if right {
        rect.w = (start.w + dx).max(MIN_WINDOW_WIDTH);
    }
    if left {
        rect.w = (start.w - dx).max(MIN_WINDOW_WIDTH);
        rect.x = start.x + start.w - rect.w;
    }
    if bottom {
        rect.h = (start.h + dy).max(MIN_WINDOW_HEIGHT);
    }
    if top {
        rect.h = (start.h - dy).max(MIN_WINDOW_HEIGHT);
        rect.y = start.y + start.h - rect.h;
    }
    rect
}

#[cfg(test)]
mod tests {
    use platform_host::{FileDraft, RootFolder, VirtualFileStore};
    use pretty_assertions::assert_eq;

    use super::*;

    fn rect() -> WindowRect {
        WindowRect {
            x: 100,
            y: 100,
            w: 400,
            h: 300,
        }
    }

    #[test]
    fn west_and_north_edges_keep_the_opposite_edge_anchored_at_minimum_size() {
        let shrunk = resize_rect(rect(), ResizeEdge::NorthWest, 1000, 1000);
        assert_eq!(shrunk.w, MIN_WINDOW_WIDTH);
        assert_eq!(shrunk.h, MIN_WINDOW_HEIGHT);
        assert_eq!(shrunk.x + shrunk.w, 500);
        assert_eq!(shrunk.y + shrunk.h, 400);
    }

    #[test]
    fn south_east_grows_without_moving_origin() {
        let grown = resize_rect(rect(), ResizeEdge::SouthEast, 30, 20);
        assert_eq!(
            grown,
            WindowRect {
                x: 100,
                y: 100,
                w: 430,
                h: 320
            }
        );
    }

    #[test]
    fn file_payload_titles_include_name_and_extension() {
        let mut store = VirtualFileStore::new();
        let file = store.save(FileDraft::text("notes", "txt", RootFolder::Documents, ""));
        assert_eq!(
            window_title(AppId::Notepad, Some(&AppPayload::File(file))),
            "notes.txt - Notepad"
        );
        assert_eq!(
            window_title(AppId::Browser, Some(&AppPayload::Url("https://example.com".into()))),
            "Edge"
        );
        assert_eq!(window_title(AppId::TaskManager, None), "Task Manager");
    }

    #[test]
    fn maximized_windows_fill_the_viewport_above_the_taskbar() {
        let window = WindowRecord {
            id: WindowId(1),
            app_id: AppId::Terminal,
            title: "Terminal".into(),
            rect: rect(),
            z_index: 11,
            minimized: false,
            maximized: true,
            payload: None,
        };
        let viewport = WindowRect {
            x: 0,
            y: 0,
            w: 1280,
            h: 720,
        };
        assert_eq!(
            effective_rect(&window, viewport, 48),
            WindowRect {
                x: 0,
                y: 0,
                w: 1280,
                h: 672
            }
        );
        let restored = WindowRecord {
            maximized: false,
            ..window
        };
        assert_eq!(effective_rect(&restored, viewport, 48), rect());
    }
}
