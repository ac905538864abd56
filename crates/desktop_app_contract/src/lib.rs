//! Shared contract types between the desktop window manager runtime and managed apps.
//!
//! An app is mounted with an [`AppMountContext`]: the signed-in user, a reactive view of the
//! shared file store, the window payload, and an [`AppServices`] bundle whose calls travel to the
//! runtime as [`AppCommand`] values.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use std::{rc::Rc, time::Duration};

use leptos::{Callable, Callback, Signal, SignalGetUntracked, View};
use platform_host::{ChatService, FileDraft, FileId, ParentFolder, VirtualFile, VirtualFileStore};
use serde::{Deserialize, Serialize};
use system_shell_contract::{CancellationToken, DEFAULT_LOGOFF_DELAY_MS};

/// Stable identifier for a runtime-managed window.
pub type WindowRuntimeId = u64;

/// Width and height used when an app has no size of its own.
pub const DEFAULT_WINDOW_SIZE: (i32, i32) = (800, 550);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Bundled applications.
pub enum AppId {
    /// File explorer.
    Explorer,
    /// Plain-text editor.
    Notepad,
    /// Settings panel.
    Settings,
    /// Chat assistant.
    Copilot,
    /// Calculator.
    Calculator,
    /// Web browser frame.
    Browser,
    /// Weather widget.
    Weather,
    /// Command prompt.
    Terminal,
    /// Open-window list.
    TaskManager,
    /// Rich-text editor.
    Word,
}

impl AppId {
    /// Every app.
    pub const ALL: [Self; 10] = [
        Self::Explorer,
        Self::Notepad,
        Self::Settings,
        Self::Copilot,
        Self::Calculator,
        Self::Browser,
        Self::Weather,
        Self::Terminal,
        Self::TaskManager,
        Self::Word,
    ];

    /// Apps shown as desktop icons, start-menu tiles, and taskbar buttons, in display order.
    pub const PINNED: [Self; 9] = [
        Self::Explorer,
        Self::Browser,
        Self::Word,
        Self::Notepad,
        Self::Terminal,
        Self::Copilot,
        Self::Calculator,
        Self::Settings,
        Self::TaskManager,
    ];

    /// Stable lower-case token, as typed after `start`.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Explorer => "explorer",
            Self::Notepad => "notepad",
            Self::Settings => "settings",
            Self::Copilot => "copilot",
            Self::Calculator => "calculator",
            Self::Browser => "browser",
            Self::Weather => "weather",
            Self::Terminal => "terminal",
            Self::TaskManager => "taskmanager",
            Self::Word => "word",
        }
    }

    /// Parses a token case-insensitively.
    pub fn from_token(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|app| app.token().eq_ignore_ascii_case(raw))
    }

    /// Display label used for icons and window titles.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Explorer => "This PC",
            Self::Notepad => "Notepad",
            Self::Settings => "Settings",
            Self::Copilot => "Copilot",
            Self::Calculator => "Calculator",
            Self::Browser => "Edge",
            Self::Weather => "Weather",
            Self::Terminal => "Terminal",
            Self::TaskManager => "Task Manager",
            Self::Word => "Word",
        }
    }

    /// Icon id rendered by the shell.
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Explorer => "folder",
            Self::Notepad => "file-text",
            Self::Settings => "settings",
            Self::Copilot => "message-square",
            Self::Calculator => "calculator",
            Self::Browser => "globe",
            Self::Weather => "cloud-sun",
            Self::Terminal => "terminal",
            Self::TaskManager => "activity",
            Self::Word => "word",
        }
    }

    /// Width and height of a freshly opened window.
    pub const fn default_size(self) -> (i32, i32) {
        match self {
            Self::Terminal => (700, 450),
            Self::Settings => (900, 650),
            _ => DEFAULT_WINDOW_SIZE,
        }
    }

    /// Whether the app appears on the desktop, the start menu, and the taskbar.
    pub fn is_pinned(self) -> bool {
        Self::PINNED.contains(&self)
    }
}

impl std::fmt::Display for AppId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
/// App-specific data handed to a window.
pub enum AppPayload {
    /// A file to edit or, for the terminal, a batch script to run.
    File(VirtualFile),
    /// Address for the browser.
    Url(String),
    /// Settings category to show first.
    SettingsCategory(String),
}

impl AppPayload {
    /// The file carried by this payload.
    pub fn file(&self) -> Option<&VirtualFile> {
        match self {
            Self::File(file) => Some(file),
            _ => None,
        }
    }

    /// The URL carried by this payload.
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Url(url) => Some(url),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Requests sent from an app to the desktop runtime.
pub enum AppCommand {
    /// Open an app or bring it forward.
    OpenApp {
        /// Target app.
        app_id: AppId,
        /// Replacement payload; `None` keeps the current one.
        payload: Option<AppPayload>,
    },
    /// Upsert a file in the shared store.
    SaveFile(FileDraft),
    /// Create a folder with an exact name.
    CreateFolder {
        /// Containing folder.
        parent: ParentFolder,
        /// Folder name.
        name: String,
    },
    /// Create a folder with a collision-free name derived from `base`.
    CreateUniqueFolder {
        /// Containing folder.
        parent: ParentFolder,
        /// Base name.
        base: String,
    },
    /// Rename an entry.
    RenameFile {
        /// Entry id.
        id: FileId,
        /// New name.
        name: String,
    },
    /// Delete an entry and its descendants.
    DeleteFile {
        /// Entry id.
        id: FileId,
    },
    /// Close the sending window.
    CloseWindow,
    /// End the desktop session after a delay.
    LogOff {
        /// Delay before the session ends.
        delay_ms: u64,
    },
}

#[derive(Clone, Copy)]
/// Window and session requests.
pub struct WindowService {
    sender: Callback<AppCommand>,
}

impl WindowService {
    /// Opens or refocuses an app.
    pub fn open_app(&self, app_id: AppId, payload: Option<AppPayload>) {
        self.sender.call(AppCommand::OpenApp { app_id, payload });
    }

    /// Closes the current window.
    pub fn close(&self) {
        self.sender.call(AppCommand::CloseWindow);
    }

    /// Schedules a log-off.
    pub fn log_off(&self, delay_ms: u64) {
        self.sender.call(AppCommand::LogOff { delay_ms });
    }
}

#[derive(Clone, Copy)]
/// Access to the shared virtual file store.
pub struct FileService {
    sender: Callback<AppCommand>,
    /// Reactive snapshot of the store.
    pub store: Signal<VirtualFileStore>,
}

impl FileService {
    /// Current store contents without tracking.
    pub fn snapshot(&self) -> VirtualFileStore {
        self.store.get_untracked()
    }

    /// Upserts a file.
    pub fn save(&self, draft: FileDraft) {
        self.sender.call(AppCommand::SaveFile(draft));
    }

    /// Creates a folder named exactly `name`.
    pub fn create_folder(&self, parent: ParentFolder, name: impl Into<String>) {
        self.sender.call(AppCommand::CreateFolder {
            parent,
            name: name.into(),
        });
    }

    /// Creates a folder named `base`, `base (2)`, ... whichever is free.
    pub fn create_unique_folder(&self, parent: ParentFolder, base: impl Into<String>) {
        self.sender.call(AppCommand::CreateUniqueFolder {
            parent,
            base: base.into(),
        });
    }

    /// Renames an entry.
    pub fn rename(&self, id: FileId, name: impl Into<String>) {
        self.sender.call(AppCommand::RenameFile {
            id,
            name: name.into(),
        });
    }

    /// Deletes an entry.
    pub fn delete(&self, id: FileId) {
        self.sender.call(AppCommand::DeleteFile { id });
    }
}

#[derive(Clone)]
/// Injected app services bundle.
pub struct AppServices {
    /// Window and session requests.
    pub window: WindowService,
    /// Shared file store.
    pub files: FileService,
    /// Chat assistant backend.
    pub chat: Rc<dyn ChatService>,
    sender: Callback<AppCommand>,
}

impl AppServices {
    /// Creates service handles from the runtime command callback.
    pub fn new(
        sender: Callback<AppCommand>,
        store: Signal<VirtualFileStore>,
        chat: Rc<dyn ChatService>,
    ) -> Self {
        Self {
            window: WindowService { sender },
            files: FileService { sender, store },
            chat,
            sender,
        }
    }

    /// Low-level transport send.
    pub fn send(&self, command: AppCommand) {
        self.sender.call(command);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Delays an app reads from the desktop configuration.
pub struct AppTiming {
    /// Delay between lines a terminal script prints.
    pub pacing: Duration,
    /// Delay between `logoff` and the end of the session.
    pub logoff_delay: Duration,
}

impl Default for AppTiming {
    fn default() -> Self {
        Self {
            pacing: Duration::from_millis(200),
            logoff_delay: Duration::from_millis(DEFAULT_LOGOFF_DELAY_MS),
        }
    }
}

#[derive(Clone)]
/// App mount context injected by the desktop runtime per window instance.
pub struct AppMountContext {
    /// App mounted in the window.
    pub app_id: AppId,
    /// Runtime window id.
    pub window_id: WindowRuntimeId,
    /// Signed-in account name.
    pub user_name: String,
    /// Window payload; replaced when the app is reopened with a new one.
    pub payload: Signal<Option<AppPayload>>,
    /// Cancelled when the window closes or the session ends.
    pub lifetime: CancellationToken,
    /// Runtime service bundle.
    pub services: AppServices,
    /// Configured delays.
    pub timing: AppTiming,
}

/// Static app mount function used by the runtime registry.
pub type AppMountFn = fn(AppMountContext) -> View;

#[derive(Debug, Clone, Copy)]
/// Mounted app module descriptor used by the runtime app registry.
pub struct AppModule {
    mount_fn: AppMountFn,
}

impl AppModule {
    /// Creates a module from a mount function.
    pub const fn new(mount_fn: AppMountFn) -> Self {
        Self { mount_fn }
    }

    /// Mounts the app view with a runtime-provided context.
    pub fn mount(self, context: AppMountContext) -> View {
        (self.mount_fn)(context)
    }
}
