//! Flat, parent-linked in-memory file store.

use serde::{Deserialize, Serialize};

use super::types::{
    FileDraft, FileId, FileKind, FolderView, FsError, ParentFolder, RootFolder, VirtualFile,
    HOME_LABEL,
};
use crate::time::next_monotonic_timestamp_ms;

/// Upper bound on parent hops when walking toward a root.
pub const MAX_FOLDER_DEPTH: usize = 64;
/// Base name used by the "new folder" action.
pub const NEW_FOLDER_NAME: &str = "New Folder";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Clickable segment of a folder breadcrumb.
pub struct BreadcrumbSegment {
    /// Segment label.
    pub label: String,
    /// Folder the segment navigates to.
    pub target: FolderView,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
/// Process-wide virtual filesystem.
///
/// Entries form a tree through [`VirtualFile::parent`]. Every mutation goes through a store method
/// so the upsert and naming rules live in one place.
pub struct VirtualFileStore {
    files: Vec<VirtualFile>,
}

impl VirtualFileStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the store a fresh session boots with: a single readme in Documents.
    pub fn seeded() -> Self {
        Self {
            files: vec![VirtualFile {
                id: FileId("initial-readme".to_string()),
                name: "readme".to_string(),
                content: "Welcome to Windows 11 Simulation!".to_string(),
                parent: ParentFolder::Root(RootFolder::Documents),
                extension: "txt".to_string(),
                kind: FileKind::File,
            }],
        }
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> &[VirtualFile] {
        &self.files
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` when the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Looks up an entry by id.
    pub fn get(&self, id: &FileId) -> Option<&VirtualFile> {
        self.files.iter().find(|file| &file.id == id)
    }

    /// Direct children of `parent`, in insertion order.
    pub fn children<'a>(
        &'a self,
        parent: &'a ParentFolder,
    ) -> impl Iterator<Item = &'a VirtualFile> + 'a {
        self.files.iter().filter(move |file| &file.parent == parent)
    }

    /// Lists a folder view with a case-insensitive substring filter on the entry name.
    ///
    /// [`FolderView::Home`] aggregates every entry in the store. An empty filter matches all.
    pub fn list(&self, view: &FolderView, filter: &str) -> Vec<VirtualFile> {
        let needle = filter.trim().to_lowercase();
        self.files
            .iter()
            .filter(|file| match view {
                FolderView::Home => true,
                FolderView::Parent(parent) => &file.parent == parent,
            })
            .filter(|file| needle.is_empty() || file.name.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    /// Finds a direct child of `parent` named `token`, with or without its extension.
    pub fn find_in(&self, parent: &ParentFolder, token: &str) -> Option<&VirtualFile> {
        self.files
            .iter()
            .find(|file| &file.parent == parent && file.matches_token(token))
    }

    /// Saves a draft, replacing an existing entry or appending a new one.
    ///
    /// An entry is replaced when its id equals the draft id, or else when it has the same
    /// `(name, parent, kind)`. The replaced entry keeps its stored id.
    pub fn save(&mut self, draft: FileDraft) -> VirtualFile {
        let by_id = draft
            .id
            .as_ref()
            .and_then(|id| self.files.iter().position(|file| &file.id == id));
        let existing = by_id.or_else(|| {
            self.files.iter().position(|file| {
                file.name == draft.name && file.parent == draft.parent && file.kind == draft.kind
            })
        });

        match existing {
            Some(index) => {
                let id = self.files[index].id.clone();
                let file = Self::materialize(id, draft);
                self.files[index] = file.clone();
                file
            }
            None => {
                let file = Self::materialize(self.fresh_id(), draft);
                self.files.push(file.clone());
                file
            }
        }
    }

    /// Appends a folder named `name` under `parent`.
    ///
    /// Name collisions are not checked; use [`Self::create_unique_folder`] for generated names.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::EmptyName`] for a blank name, [`FsError::NotFound`] when the parent folder
    /// does not exist, and [`FsError::NotAFolder`] when the parent is a file.
    pub fn create_folder(
        &mut self,
        name: &str,
        parent: ParentFolder,
    ) -> Result<VirtualFile, FsError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(FsError::EmptyName);
        }
        self.ensure_folder(&parent)?;

        let folder = VirtualFile {
            id: self.fresh_id(),
            name: name.to_string(),
            content: String::new(),
            parent,
            extension: String::new(),
            kind: FileKind::Folder,
        };
        self.files.push(folder.clone());
        Ok(folder)
    }

    /// Returns `base`, or the first free `base (n)` for `n >= 2`, among folders in `parent`.
    pub fn unique_folder_name(&self, parent: &ParentFolder, base: &str) -> String {
        let taken = |candidate: &str| {
            self.children(parent)
                .any(|file| file.is_folder() && file.name == candidate)
        };
        if !taken(base) {
            return base.to_string();
        }
        (2..)
            .map(|n| format!("{base} ({n})"))
            .find(|candidate| !taken(candidate))
            .unwrap_or_else(|| base.to_string())
    }

    /// Creates a folder under `parent` with a collision-free name derived from `base`.
    ///
    /// # Errors
    ///
    /// See [`Self::create_folder`].
    pub fn create_unique_folder(
        &mut self,
        parent: ParentFolder,
        base: &str,
    ) -> Result<VirtualFile, FsError> {
        let name = self.unique_folder_name(&parent, base);
        self.create_folder(&name, parent)
    }

    /// Renames the entry with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::NotFound`] for an unknown id and [`FsError::EmptyName`] for a blank name.
    /// The store is unchanged on error.
    pub fn rename(&mut self, id: &FileId, new_name: &str) -> Result<(), FsError> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(FsError::EmptyName);
        }
        let file = self
            .files
            .iter_mut()
            .find(|file| &file.id == id)
            .ok_or_else(|| FsError::NotFound(id.clone()))?;
        file.name = new_name.to_string();
        Ok(())
    }

    /// Deletes the entry with `id` and, for folders, every descendant.
    ///
    /// Returns the removed entries.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::NotFound`] for an unknown id.
    pub fn delete(&mut self, id: &FileId) -> Result<Vec<VirtualFile>, FsError> {
        if self.get(id).is_none() {
            return Err(FsError::NotFound(id.clone()));
        }

        let mut doomed = vec![id.clone()];
        let mut cursor = 0;
        while cursor < doomed.len() {
            let parent = ParentFolder::Folder(doomed[cursor].clone());
            let nested: Vec<FileId> = self.children(&parent).map(|file| file.id.clone()).collect();
            doomed.extend(nested);
            cursor += 1;
        }

        let (removed, kept) = std::mem::take(&mut self.files)
            .into_iter()
            .partition(|file| doomed.contains(&file.id));
        self.files = kept;
        Ok(removed)
    }

    /// Returns the root that ultimately contains `parent`.
    pub fn root_of(&self, parent: &ParentFolder) -> Option<RootFolder> {
        let mut current = parent.clone();
        for _ in 0..MAX_FOLDER_DEPTH {
            match current {
                ParentFolder::Root(root) => return Some(root),
                ParentFolder::Folder(id) => current = self.get(&id)?.parent.clone(),
            }
        }
        None
    }

    /// Returns the view one level above `parent`; roots go up to Home.
    pub fn parent_view(&self, parent: &ParentFolder) -> FolderView {
        match parent {
            ParentFolder::Root(_) => FolderView::Home,
            ParentFolder::Folder(id) => self
                .get(id)
                .map(|folder| FolderView::Parent(folder.parent.clone()))
                .unwrap_or(FolderView::Home),
        }
    }

    /// Returns Home-to-leaf breadcrumb segments for a view.
    pub fn breadcrumb(&self, view: &FolderView) -> Vec<BreadcrumbSegment> {
        let mut segments = Vec::new();
        if let FolderView::Parent(parent) = view {
            let mut current = parent.clone();
            for _ in 0..MAX_FOLDER_DEPTH {
                match current {
                    ParentFolder::Root(root) => {
                        segments.push(BreadcrumbSegment {
                            label: root.label().to_string(),
                            target: FolderView::from(root),
                        });
                        break;
                    }
                    ParentFolder::Folder(id) => {
                        let Some(folder) = self.get(&id) else {
                            break;
                        };
                        segments.push(BreadcrumbSegment {
                            label: folder.name.clone(),
                            target: FolderView::Parent(ParentFolder::Folder(id.clone())),
                        });
                        current = folder.parent.clone();
                    }
                }
            }
        }
        segments.push(BreadcrumbSegment {
            label: HOME_LABEL.to_string(),
            target: FolderView::Home,
        });
        segments.reverse();
        segments
    }

    fn ensure_folder(&self, parent: &ParentFolder) -> Result<(), FsError> {
        match parent {
            ParentFolder::Root(_) => Ok(()),
            ParentFolder::Folder(id) => match self.get(id) {
                None => Err(FsError::NotFound(id.clone())),
                Some(entry) if !entry.is_folder() => Err(FsError::NotAFolder(id.clone())),
                Some(_) => Ok(()),
            },
        }
    }

    fn fresh_id(&self) -> FileId {
        loop {
            let id = FileId(format!("vf-{}", next_monotonic_timestamp_ms()));
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    fn materialize(id: FileId, draft: FileDraft) -> VirtualFile {
        VirtualFile {
            id,
            name: draft.name,
            content: draft.content,
            parent: draft.parent,
            extension: draft.extension,
            kind: draft.kind,
        }
    }
}
