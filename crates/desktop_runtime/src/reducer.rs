//! Reducer actions, side-effect intents, and transition logic for the desktop runtime.

use desktop_app_contract::{AppId, AppPayload};
use thiserror::Error;

use crate::{
    config::DesktopConfig,
    model::{
        DesktopState, DragSession, InteractionState, PointerPosition, ResizeEdge, ResizeSession,
        SessionPhase, WindowId, WindowRecord,
    },
    window_manager::{cascade_rect, raise_window, resize_rect, window_title},
};

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_desktop`] to mutate [`DesktopState`].
pub enum DesktopAction {
    /// Sign in and show the welcome screen.
    LogIn {
        /// Account name shown in the start menu and terminal prompt.
        user_name: String,
    },
    /// Leave the welcome screen for the desktop.
    FinishWelcome,
    /// End the session, closing every window.
    LogOff,
    /// Open an app, or bring its existing window forward.
    OpenApp {
        /// App to open.
        app_id: AppId,
        /// Replacement payload; `None` keeps the existing window's payload.
        payload: Option<AppPayload>,
    },
    /// Close a window by id.
    CloseWindow {
        /// Window to close.
        window_id: WindowId,
    },
    /// Focus (and raise) a window by id.
    FocusWindow {
        /// Window to focus.
        window_id: WindowId,
    },
    /// Minimize a window.
    MinimizeWindow {
        /// Window to minimize.
        window_id: WindowId,
    },
    /// Flip a window's minimized flag.
    ToggleMinimize {
        /// Window to toggle.
        window_id: WindowId,
    },
    /// Flip a window's maximized flag, keeping its stored rect for restore.
    ToggleMaximize {
        /// Window to toggle.
        window_id: WindowId,
    },
    /// Move a window's top-left corner.
    MoveWindow {
        /// Window to move.
        window_id: WindowId,
        /// New left edge.
        x: i32,
        /// New top edge.
        y: i32,
    },
    /// Begin dragging a window.
    BeginMove {
        /// Window being dragged.
        window_id: WindowId,
        /// Pointer position at drag start.
        pointer: PointerPosition,
    },
    /// Update the active drag with a new pointer position.
    UpdateMove {
        /// Current pointer position.
        pointer: PointerPosition,
    },
    /// End the active drag.
    EndMove,
    /// Begin resizing a window from an edge or corner.
    BeginResize {
        /// Window being resized.
        window_id: WindowId,
        /// Edge or corner being dragged.
        edge: ResizeEdge,
        /// Pointer position at resize start.
        pointer: PointerPosition,
    },
    /// Update the active resize with a new pointer position.
    UpdateResize {
        /// Current pointer position.
        pointer: PointerPosition,
    },
    /// End the active resize.
    EndResize,
    /// Toggle the start menu, closing quick settings.
    ToggleStartMenu,
    /// Toggle quick settings, closing the start menu.
    ToggleQuickSettings,
    /// Close both popovers.
    CloseMenus,
    /// Set display brightness, clamped to 0..=100.
    SetBrightness(i32),
    /// Set output volume, clamped to 0..=100.
    SetVolume(i32),
    /// Flip the Wi-Fi toggle.
    ToggleWifi,
    /// Replace timing and layout constants.
    ApplyConfig(DesktopConfig),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Side-effect intents emitted by [`reduce_desktop`] for the shell runtime to execute.
pub enum RuntimeEffect {
    /// A new window was created.
    WindowOpened(WindowId),
    /// A window was removed; its background work must stop.
    WindowClosed(WindowId),
    /// The welcome screen should advance after the configured delay.
    ScheduleWelcomeEnd,
    /// The session ended.
    SessionEnded,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reducer errors for invalid actions. State is left untouched when one is returned.
pub enum ReducerError {
    /// The target window id was not found in the current state.
    #[error("window not found")]
    WindowNotFound,
    /// A window action arrived while no user is signed in.
    #[error("no active session")]
    NoActiveSession,
}

/// Applies a [`DesktopAction`] to the desktop runtime state and collects resulting side effects.
///
/// # Errors
///
/// Returns [`ReducerError::WindowNotFound`] when an action references a window that is not
/// present, and [`ReducerError::NoActiveSession`] for window actions while signed out.
pub fn reduce_desktop(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    action: DesktopAction,
) -> Result<Vec<RuntimeEffect>, ReducerError> {
    let mut effects = Vec::new();
    match action {
        DesktopAction::LogIn { user_name } => {
            state.user_name = Some(user_name);
            state.phase = SessionPhase::Welcome;
            effects.push(RuntimeEffect::ScheduleWelcomeEnd);
        }
        DesktopAction::FinishWelcome => {
            require_session(state)?;
            state.phase = SessionPhase::Desktop;
        }
        DesktopAction::LogOff => {
            require_session(state)?;
            effects.extend(
                state
                    .windows
                    .iter()
                    .map(|w| RuntimeEffect::WindowClosed(w.id)),
            );
            effects.push(RuntimeEffect::SessionEnded);
            *state = DesktopState {
                quick_settings: state.quick_settings.clone(),
                ..DesktopState::with_config(state.config.clone())
            };
            *interaction = InteractionState::default();
        }
        DesktopAction::OpenApp { app_id, payload } => {
            require_session(state)?;
            close_menus(state);
            if let Some(existing) = state.window_for_app(app_id).map(|w| w.id) {
                if let Some(payload) = payload {
                    find_window_mut(state, existing)?.payload = Some(payload);
                }
                raise_window(state, existing);
            } else {
                let window_id = next_window_id(state);
                let record = WindowRecord {
                    id: window_id,
                    app_id,
                    title: window_title(app_id, payload.as_ref()),
                    rect: cascade_rect(state, app_id),
                    z_index: 0,
                    minimized: false,
                    maximized: false,
                    payload,
                };
                state.windows.push(record);
                raise_window(state, window_id);
                effects.push(RuntimeEffect::WindowOpened(window_id));
            }
        }
        DesktopAction::CloseWindow { window_id } => {
            require_session(state)?;
            let before_len = state.windows.len();
            state.windows.retain(|w| w.id != window_id);
            if state.windows.len() == before_len {
                return Err(ReducerError::WindowNotFound);
            }
            interaction.forget_window(window_id);
            effects.push(RuntimeEffect::WindowClosed(window_id));
        }
        DesktopAction::FocusWindow { window_id } => {
            require_session(state)?;
            if !raise_window(state, window_id) {
                return Err(ReducerError::WindowNotFound);
            }
        }
        DesktopAction::MinimizeWindow { window_id } => {
            require_session(state)?;
            find_window_mut(state, window_id)?.minimized = true;
            interaction.forget_window(window_id);
        }
        DesktopAction::ToggleMinimize { window_id } => {
            require_session(state)?;
            let window = find_window_mut(state, window_id)?;
            window.minimized = !window.minimized;
            if window.minimized {
                interaction.forget_window(window_id);
            }
        }
        DesktopAction::ToggleMaximize { window_id } => {
            require_session(state)?;
            let window = find_window_mut(state, window_id)?;
            window.maximized = !window.maximized;
            interaction.forget_window(window_id);
        }
        DesktopAction::MoveWindow { window_id, x, y } => {
            require_session(state)?;
            let window = find_window_mut(state, window_id)?;
            if !window.maximized {
                window.rect.x = x;
                window.rect.y = y;
            }
        }
        DesktopAction::BeginMove { window_id, pointer } => {
            require_session(state)?;
            let window = find_window_mut(state, window_id)?;
            if window.maximized {
                return Ok(effects);
            }
            let rect_start = window.rect;
            raise_window(state, window_id);
            interaction.dragging = Some(DragSession {
                window_id,
                pointer_start: pointer,
                rect_start,
            });
        }
        DesktopAction::UpdateMove { pointer } => {
            let Some(session) = interaction.dragging.clone() else {
                return Ok(effects);
            };
            let dx = pointer.x - session.pointer_start.x;
            let dy = pointer.y - session.pointer_start.y;
            let window = find_window_mut(state, session.window_id)?;
            if !window.maximized {
                window.rect = session.rect_start.offset(dx, dy);
            }
        }
        DesktopAction::EndMove => {
            interaction.dragging = None;
        }
        DesktopAction::BeginResize {
            window_id,
            edge,
            pointer,
        } => {
            require_session(state)?;
            let window = find_window_mut(state, window_id)?;
            if window.maximized {
                return Ok(effects);
            }
            let rect_start = window.rect;
            raise_window(state, window_id);
            interaction.resizing = Some(ResizeSession {
                window_id,
                edge,
                pointer_start: pointer,
                rect_start,
            });
        }
        DesktopAction::UpdateResize { pointer } => {
            let Some(session) = interaction.resizing.clone() else {
                return Ok(effects);
            };
            let dx = pointer.x - session.pointer_start.x;
            let dy = pointer.y - session.pointer_start.y;
            let window = find_window_mut(state, session.window_id)?;
            if !window.maximized {
                window.rect = resize_rect(session.rect_start, session.edge, dx, dy);
            }
        }
        DesktopAction::EndResize => {
            interaction.resizing = None;
        }
        DesktopAction::ToggleStartMenu => {
            state.start_menu_open = !state.start_menu_open;
            state.quick_settings_open = false;
        }
        DesktopAction::ToggleQuickSettings => {
            state.quick_settings_open = !state.quick_settings_open;
            state.start_menu_open = false;
        }
        DesktopAction::CloseMenus => close_menus(state),
        DesktopAction::SetBrightness(value) => {
            state.quick_settings.brightness = clamp_percent(value);
        }
        DesktopAction::SetVolume(value) => {
            state.quick_settings.volume = clamp_percent(value);
        }
        DesktopAction::ToggleWifi => {
            state.quick_settings.wifi_enabled = !state.quick_settings.wifi_enabled;
        }
        DesktopAction::ApplyConfig(config) => {
            if state.windows.is_empty() {
                state.max_z_index = state.max_z_index.max(config.initial_z_index);
            }
            state.config = config;
        }
    }

    Ok(effects)
}

fn require_session(state: &DesktopState) -> Result<(), ReducerError> {
    if state.is_signed_in() {
        Ok(())
    } else {
        Err(ReducerError::NoActiveSession)
    }
}

fn close_menus(state: &mut DesktopState) {
    state.start_menu_open = false;
    state.quick_settings_open = false;
}

fn clamp_percent(value: i32) -> u8 {
    value.clamp(0, 100) as u8
}

fn next_window_id(state: &mut DesktopState) -> WindowId {
    let id = WindowId(state.next_window_id);
    state.next_window_id = state.next_window_id.saturating_add(1);
    id
}

fn find_window_mut(
    state: &mut DesktopState,
    window_id: WindowId,
) -> Result<&mut WindowRecord, ReducerError> {
    state
        .windows
        .iter_mut()
        .find(|w| w.id == window_id)
        .ok_or(ReducerError::WindowNotFound)
}
