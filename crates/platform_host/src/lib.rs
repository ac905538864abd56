//! Host-side services and shared models for the simulated desktop.
//!
//! This crate owns the process-wide virtual filesystem, the preference store used for desktop
//! configuration, the chat assistant boundary, and clock helpers. Nothing here renders UI; the
//! runtime and apps consume these types through `desktop_app_contract`.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod chat;
pub mod fs;
pub mod storage;
pub mod time;

pub use chat::{
    send_chat_checked, ChatError, ChatFuture, ChatMessage, ChatReply, ChatRequest, ChatRole,
    ChatService, NoopChatService, ScriptedChatService,
};
pub use fs::store::{BreadcrumbSegment, VirtualFileStore, MAX_FOLDER_DEPTH, NEW_FOLDER_NAME};
pub use fs::types::{
    FileDraft, FileId, FileKind, FolderView, FsError, ParentFolder, RootFolder, VirtualFile,
    HOME_LABEL,
};
pub use storage::prefs::{
    load_pref_with, save_pref_with, MemoryPrefsStore, NoopPrefsStore, PrefsError, PrefsStore,
    PrefsStoreFuture,
};
pub use time::{next_monotonic_timestamp_ms, unix_time_ms_now};
