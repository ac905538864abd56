//! Navigation and selection state for the Explorer window.

use desktop_app_contract::{AppId, AppPayload};
use platform_host::{
    FileId, FileKind, FolderView, ParentFolder, RootFolder, VirtualFile, VirtualFileStore,
    HOME_LABEL, NEW_FOLDER_NAME,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Item layout.
pub enum ViewMode {
    /// Icon grid.
    #[default]
    Grid,
    /// One row per entry.
    List,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A sidebar link.
pub struct SidebarEntry {
    /// Caption.
    pub label: &'static str,
    /// View shown when clicked.
    pub target: FolderView,
}

/// Home followed by each root folder.
pub fn sidebar_entries() -> Vec<SidebarEntry> {
    std::iter::once(SidebarEntry {
        label: HOME_LABEL,
        target: FolderView::Home,
    })
    .chain(RootFolder::ALL.into_iter().map(|root| SidebarEntry {
        label: root.label(),
        target: FolderView::from(root),
    }))
    .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// What double-clicking an entry does.
pub enum OpenAction {
    /// Show the folder's contents.
    Navigate(FolderView),
    /// Open an app with the file as payload.
    Launch {
        /// App to open.
        app_id: AppId,
        /// The opened file.
        payload: AppPayload,
    },
}

/// Decides how an entry opens: folders navigate, batch files run, anything else is edited.
pub fn open_action(file: &VirtualFile) -> OpenAction {
    match file.kind {
        FileKind::Folder => OpenAction::Navigate(FolderView::Parent(ParentFolder::Folder(
            file.id.clone(),
        ))),
        FileKind::Batch => OpenAction::Launch {
            app_id: AppId::Terminal,
            payload: AppPayload::File(file.clone()),
        },
        FileKind::File => OpenAction::Launch {
            app_id: AppId::Notepad,
            payload: AppPayload::File(file.clone()),
        },
    }
}

/// Icon id for an entry.
pub fn file_icon(file: &VirtualFile) -> &'static str {
    match file.kind {
        FileKind::Folder => "folder",
        FileKind::Batch => "file-code",
        FileKind::File => "file-text",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Explorer window state.
pub struct ExplorerState {
    /// Folder being shown.
    pub view: FolderView,
    /// Case-insensitive name filter.
    pub filter: String,
    /// Highlighted entry.
    pub selected: Option<FileId>,
    /// Item layout.
    pub view_mode: ViewMode,
    /// Entry being renamed and the draft name.
    pub renaming: Option<(FileId, String)>,
}

impl Default for ExplorerState {
    fn default() -> Self {
        Self {
            view: FolderView::Home,
            filter: String::new(),
            selected: None,
            view_mode: ViewMode::default(),
            renaming: None,
        }
    }
}

impl ExplorerState {
    /// Shows `view`, clearing selection and any rename in progress.
    pub fn navigate(&mut self, view: FolderView) {
        self.view = view;
        self.selected = None;
        self.renaming = None;
    }

    /// Goes to the containing folder, or Home from a root.
    pub fn up(&mut self, store: &VirtualFileStore) {
        let next = match &self.view {
            FolderView::Home => FolderView::Home,
            FolderView::Parent(parent) => store.parent_view(parent),
        };
        self.navigate(next);
    }

    /// Entries visible with the current view and filter.
    pub fn visible(&self, store: &VirtualFileStore) -> Vec<VirtualFile> {
        store.list(&self.view, &self.filter)
    }

    /// Folder that "New folder" creates into; `None` on Home.
    pub fn new_folder_parent(&self) -> Option<ParentFolder> {
        match &self.view {
            FolderView::Home => None,
            FolderView::Parent(parent) => Some(parent.clone()),
        }
    }

    /// Base name for "New folder".
    pub fn new_folder_base(&self) -> &'static str {
        NEW_FOLDER_NAME
    }

    /// Starts renaming the selected entry.
    pub fn begin_rename(&mut self, store: &VirtualFileStore) {
        self.renaming = self
            .selected
            .as_ref()
            .and_then(|id| store.get(id))
            .map(|file| (file.id.clone(), file.name.clone()));
    }

    /// Finishes a rename, returning the id and trimmed new name when there is one to apply.
    pub fn commit_rename(&mut self) -> Option<(FileId, String)> {
        let (id, name) = self.renaming.take()?;
        let name = name.trim().to_string();
        (!name.is_empty()).then_some((id, name))
    }

    /// Drops the selection if the entry is gone, and leaves a deleted folder for its parent.
    pub fn reconcile(&mut self, store: &VirtualFileStore) {
        if self
            .selected
            .as_ref()
            .is_some_and(|id| store.get(id).is_none())
        {
            self.selected = None;
        }
        if let FolderView::Parent(ParentFolder::Folder(id)) = &self.view {
            if store.get(id).is_none() {
                self.navigate(FolderView::Home);
            }
        }
    }

    /// Header caption for the current view.
    pub fn title(&self, store: &VirtualFileStore) -> String {
        store
            .breadcrumb(&self.view)
            .last()
            .map(|segment| segment.label.clone())
            .unwrap_or_else(|| HOME_LABEL.to_string())
    }
}
