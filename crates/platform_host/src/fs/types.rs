//! Virtual filesystem records shared by the store, the shell, and the desktop apps.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Display label for the synthetic aggregate view across every root folder.
pub const HOME_LABEL: &str = "Home";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
/// Opaque identifier of a [`VirtualFile`], stable for the entry's lifetime.
pub struct FileId(pub String);

impl FileId {
    /// Returns the raw identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Entry kind stored in the virtual filesystem.
pub enum FileKind {
    /// Plain text file.
    File,
    /// Text file whose content is a newline-separated terminal script.
    Batch,
    /// Folder that other entries may reference as their parent.
    Folder,
}

impl FileKind {
    /// Returns the kind implied by a file extension (`bat` is a batch script).
    pub fn for_extension(extension: &str) -> Self {
        if extension.eq_ignore_ascii_case("bat") {
            Self::Batch
        } else {
            Self::File
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
/// Fixed top-level folders of the simulated user profile.
pub enum RootFolder {
    /// `Documents` root.
    #[default]
    Documents,
    /// `Desktop` root.
    Desktop,
    /// `Downloads` root.
    Downloads,
}

impl RootFolder {
    /// Every root folder in sidebar order.
    pub const ALL: [Self; 3] = [Self::Documents, Self::Desktop, Self::Downloads];

    /// Display label of the root.
    pub fn label(self) -> &'static str {
        match self {
            Self::Documents => "Documents",
            Self::Desktop => "Desktop",
            Self::Downloads => "Downloads",
        }
    }

    /// Parses a root name case-insensitively.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|root| root.label().eq_ignore_ascii_case(token.trim()))
    }
}

impl fmt::Display for RootFolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Containing folder of a [`VirtualFile`].
pub enum ParentFolder {
    /// One of the fixed roots.
    Root(RootFolder),
    /// A folder entry identified by id.
    Folder(FileId),
}

impl From<RootFolder> for ParentFolder {
    fn from(root: RootFolder) -> Self {
        Self::Root(root)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Location shown by a listing: the Home aggregate or a concrete parent folder.
pub enum FolderView {
    /// Union of every root.
    Home,
    /// A single folder.
    Parent(ParentFolder),
}

impl From<RootFolder> for FolderView {
    fn from(root: RootFolder) -> Self {
        Self::Parent(ParentFolder::Root(root))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// In-memory record representing a file or folder.
pub struct VirtualFile {
    /// Stable identifier.
    pub id: FileId,
    /// Display name without extension.
    pub name: String,
    /// Text payload, empty for folders.
    pub content: String,
    /// Containing folder.
    pub parent: ParentFolder,
    /// Suffix without the dot, empty for folders.
    pub extension: String,
    /// Entry kind.
    pub kind: FileKind,
}

impl VirtualFile {
    /// Returns `name.ext`, or just the name when there is no extension.
    pub fn file_name(&self) -> String {
        if self.extension.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.name, self.extension)
        }
    }

    /// Returns `true` for folder entries.
    pub fn is_folder(&self) -> bool {
        self.kind == FileKind::Folder
    }

    /// Returns `true` when `token` names this entry with or without its extension.
    ///
    /// Matching is case-insensitive.
    pub fn matches_token(&self, token: &str) -> bool {
        self.name.eq_ignore_ascii_case(token) || self.file_name().eq_ignore_ascii_case(token)
    }

    /// Returns the content split into script lines.
    pub fn lines(&self) -> Vec<String> {
        self.content
            .split('\n')
            .map(|line| line.trim_end_matches('\r').to_string())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Save request accepted by the store upsert.
///
/// With an `id` the matching entry is replaced; without one the store matches on
/// `(name, parent, kind)` before appending.
pub struct FileDraft {
    /// Identifier of the entry being re-saved, if known.
    pub id: Option<FileId>,
    /// Display name without extension.
    pub name: String,
    /// Text payload.
    pub content: String,
    /// Target folder.
    pub parent: ParentFolder,
    /// Suffix without the dot.
    pub extension: String,
    /// Entry kind.
    pub kind: FileKind,
}

impl FileDraft {
    /// Creates a draft for a text or batch file, picking the kind from the extension.
    pub fn text(
        name: impl Into<String>,
        extension: impl Into<String>,
        parent: impl Into<ParentFolder>,
        content: impl Into<String>,
    ) -> Self {
        let extension = extension.into();
        Self {
            id: None,
            name: name.into(),
            content: content.into(),
            parent: parent.into(),
            kind: FileKind::for_extension(&extension),
            extension,
        }
    }

    /// Attaches an existing id so the save replaces that entry.
    pub fn with_id(mut self, id: FileId) -> Self {
        self.id = Some(id);
        self
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Store errors for lookups and folder creation.
pub enum FsError {
    /// No entry has the given id.
    #[error("no entry with id `{0}`")]
    NotFound(FileId),
    /// The referenced parent exists but is not a folder.
    #[error("entry `{0}` is not a folder")]
    NotAFolder(FileId),
    /// A blank name was supplied.
    #[error("name must not be empty")]
    EmptyName,
}
