use desktop_app_contract::{AppId, AppPayload};
use serde::{Deserialize, Serialize};

use crate::config::DesktopConfig;

pub const DEFAULT_BRIGHTNESS: u8 = 100;
pub const DEFAULT_VOLUME: u8 = 65;
pub const DEFAULT_NETWORK_NAME: &str = "Neighbour's wifi";
pub const LOGIN_ACCOUNTS: [&str; 2] = ["Administrator", "Guest"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WindowId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl WindowRect {
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    pub fn clamped_min(self, min_w: i32, min_h: i32) -> Self {
        Self {
            w: self.w.max(min_w),
            h: self.h.max(min_h),
            ..self
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRecord {
    pub id: WindowId,
    pub app_id: AppId,
    pub title: String,
    pub rect: WindowRect,
    pub z_index: u64,
    pub minimized: bool,
    pub maximized: bool,
    pub payload: Option<AppPayload>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickSettings {
    pub brightness: u8,
    pub volume: u8,
    pub wifi_enabled: bool,
    pub network: String,
}

impl Default for QuickSettings {
    fn default() -> Self {
        Self {
            brightness: DEFAULT_BRIGHTNESS,
            volume: DEFAULT_VOLUME,
            wifi_enabled: true,
            network: DEFAULT_NETWORK_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionPhase {
    #[default]
    SignedOut,
    Welcome,
    Desktop,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesktopState {
    pub phase: SessionPhase,
    pub user_name: Option<String>,
    pub windows: Vec<WindowRecord>,
    pub max_z_index: u64,
    pub next_window_id: u64,
    pub start_menu_open: bool,
    pub quick_settings_open: bool,
    pub quick_settings: QuickSettings,
    pub config: DesktopConfig,
}

impl Default for DesktopState {
    fn default() -> Self {
        Self::with_config(DesktopConfig::default())
    }
}

impl DesktopState {
    pub fn with_config(config: DesktopConfig) -> Self {
        Self {
            phase: SessionPhase::SignedOut,
            user_name: None,
            windows: Vec::new(),
            max_z_index: config.initial_z_index,
            next_window_id: 1,
            start_menu_open: false,
            quick_settings_open: false,
            quick_settings: QuickSettings::default(),
            config,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.user_name.is_some()
    }

    pub fn window(&self, window_id: WindowId) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| w.id == window_id)
    }

    pub fn window_for_app(&self, app_id: AppId) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| w.app_id == app_id)
    }

    pub fn is_app_open(&self, app_id: AppId) -> bool {
        self.window_for_app(app_id).is_some()
    }

    pub fn active_window(&self) -> Option<&WindowRecord> {
        self.windows
            .iter()
            .filter(|w| !w.minimized)
            .max_by_key(|w| w.z_index)
    }

    pub fn active_window_id(&self) -> Option<WindowId> {
        self.active_window().map(|w| w.id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResizeEdge {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl ResizeEdge {
    pub const ALL: [Self; 8] = [
        Self::North,
        Self::South,
        Self::East,
        Self::West,
        Self::NorthEast,
        Self::NorthWest,
        Self::SouthEast,
        Self::SouthWest,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    pub window_id: WindowId,
    pub pointer_start: PointerPosition,
    pub rect_start: WindowRect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeSession {
    pub window_id: WindowId,
    pub edge: ResizeEdge,
    pub pointer_start: PointerPosition,
    pub rect_start: WindowRect,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InteractionState {
    pub dragging: Option<DragSession>,
    pub resizing: Option<ResizeSession>,
}

impl InteractionState {
    pub fn forget_window(&mut self, window_id: WindowId) {
        if self
            .dragging
            .as_ref()
            .is_some_and(|drag| drag.window_id == window_id)
        {
            self.dragging = None;
        }
        if self
            .resizing
            .as_ref()
            .is_some_and(|resize| resize.window_id == window_id)
        {
            self.resizing = None;
        }
    }
}
