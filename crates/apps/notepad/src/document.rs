//! Editor document model shared by the Notepad and Word windows.

use platform_host::{FileDraft, FileId, ParentFolder, RootFolder, VirtualFile};

/// Extensions offered by the Notepad "Save As" dialog.
pub const NOTEPAD_EXTENSIONS: [&str; 3] = ["txt", "bat", "md"];

/// Content of the "New Batch Script" template.
pub const BATCH_TEMPLATE: &str = "@echo off\necho Hello World!\npause";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Which editor flavour a window hosts.
pub enum EditorMode {
    /// Plain-text editor with selectable extension.
    Notepad,
    /// Document editor that always saves `.docx`.
    Word,
}

impl EditorMode {
    /// Name used for a blank document.
    pub fn default_name(self) -> &'static str {
        match self {
            Self::Notepad => "Untitled",
            Self::Word => "Document1",
        }
    }

    /// Extension used for a blank document.
    pub fn default_extension(self) -> &'static str {
        match self {
            Self::Notepad => "txt",
            Self::Word => "docx",
        }
    }

    /// Extensions the save dialog lets the user pick.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Notepad => &NOTEPAD_EXTENSIONS,
            Self::Word => &["docx"],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Text being edited plus where it will be saved.
pub struct EditorDocument {
    /// Id of the stored file this document was opened from.
    pub file_id: Option<FileId>,
    /// Name without extension.
    pub name: String,
    /// Extension without the dot.
    pub extension: String,
    /// Current text.
    pub content: String,
    /// Folder a plain save writes to.
    pub target_folder: ParentFolder,
}

impl EditorDocument {
    /// Blank document in Documents.
    pub fn blank(mode: EditorMode) -> Self {
        Self {
            file_id: None,
            name: mode.default_name().to_string(),
            extension: mode.default_extension().to_string(),
            content: String::new(),
            target_folder: ParentFolder::Root(RootFolder::Documents),
        }
    }

    /// Document for a window payload, or a blank one.
    pub fn open(mode: EditorMode, file: Option<&VirtualFile>) -> Self {
        match file {
            Some(file) if !file.is_folder() => Self {
                file_id: Some(file.id.clone()),
                name: file.name.clone(),
                extension: if file.extension.is_empty() {
                    mode.default_extension().to_string()
                } else {
                    file.extension.clone()
                },
                content: file.content.clone(),
                target_folder: file.parent.clone(),
            },
            _ => Self::blank(mode),
        }
    }

    /// Replaces the document with the batch-script template.
    pub fn new_batch_script() -> Self {
        Self {
            name: "myscript".to_string(),
            extension: "bat".to_string(),
            content: BATCH_TEMPLATE.to_string(),
            ..Self::blank(EditorMode::Notepad)
        }
    }

    /// `name.ext` as shown in the menu bar.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.name, self.extension)
    }

    /// Draft for "Save": keeps the opened file's id so the stored entry is replaced in place.
    pub fn save_draft(&self) -> FileDraft {
        let draft = FileDraft::text(
            self.name.clone(),
            self.extension.clone(),
            self.target_folder.clone(),
            self.content.clone(),
        );
        match &self.file_id {
            Some(id) => draft.with_id(id.clone()),
            None => draft,
        }
    }

    /// Retargets the document and returns the "Save As" draft.
    ///
    /// The id is dropped so the store matches by name, folder, and kind instead.
    pub fn save_as(&mut self, name: &str, extension: &str, folder: RootFolder) -> FileDraft {
        let name = name.trim();
        if !name.is_empty() {
            self.name = name.to_string();
        }
        if !extension.trim().is_empty() {
            self.extension = extension.trim().trim_start_matches('.').to_string();
        }
        self.target_folder = ParentFolder::Root(folder);
        self.file_id = None;
        self.save_draft()
    }

    /// Number of lines, counting an empty document as one.
    pub fn line_count(&self) -> usize {
        self.content.split('\n').count()
    }

    /// Number of characters.
    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    /// Number of whitespace-separated words.
    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }
}

/// Counts case-insensitive, non-overlapping occurrences of `query`.
pub fn count_matches(content: &str, query: &str) -> usize {
    if query.is_empty() {
        return 0;
    }
    content
        .to_ascii_lowercase()
        .matches(&query.to_ascii_lowercase())
        .count()
}

/// Byte range of the next match at or after `cursor`, wrapping to the start.
pub fn find_next(content: &str, query: &str, cursor: usize) -> Option<(usize, usize)> {
    if query.is_empty() {
        return None;
    }
    let haystack = content.to_ascii_lowercase();
    let needle = query.to_ascii_lowercase();
    let start = floor_boundary(&haystack, cursor);
    haystack[start..]
        .find(&needle)
        .map(|index| index + start)
        .or_else(|| haystack.find(&needle))
        .map(|index| (index, index + needle.len()))
}

/// Byte range of the last match starting before `cursor`, wrapping to the end.
pub fn find_previous(content: &str, query: &str, cursor: usize) -> Option<(usize, usize)> {
    if query.is_empty() {
        return None;
    }
    let haystack = content.to_ascii_lowercase();
    let needle = query.to_ascii_lowercase();
    let end = floor_boundary(&haystack, cursor.saturating_sub(1) + needle.len());
    haystack[..end]
        .rfind(&needle)
        .filter(|index| *index < cursor)
        .or_else(|| haystack.rfind(&needle))
        .map(|index| (index, index + needle.len()))
}

fn floor_boundary(text: &str, index: usize) -> usize {
    let mut index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use platform_host::{FileKind, VirtualFileStore};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn opening_a_payload_keeps_its_id_and_folder_for_save() {
        let mut store = VirtualFileStore::new();
        let file = store.save(FileDraft::text("todo", "txt", RootFolder::Desktop, "milk"));
        let mut doc = EditorDocument::open(EditorMode::Notepad, Some(&file));
        doc.content = "milk\neggs".to_string();

        store.save(doc.save_draft());

        assert_eq!(store.len(), 1);
        let saved = store.get(&file.id).expect("saved in place");
        assert_eq!(saved.content, "milk\neggs");
        assert_eq!(saved.parent, ParentFolder::Root(RootFolder::Desktop));
    }

    #[test]
    fn save_as_writes_a_new_entry_and_bat_becomes_a_batch_script() {
        let mut store = VirtualFileStore::new();
        let file = store.save(FileDraft::text("todo", "txt", RootFolder::Documents, "x"));
        let mut doc = EditorDocument::open(EditorMode::Notepad, Some(&file));
        doc.content = "echo hi".to_string();

        let draft = doc.save_as("run", "bat", RootFolder::Downloads);
        let saved = store.save(draft);

        assert_eq!(store.len(), 2);
        assert_eq!(saved.kind, FileKind::Batch);
        assert_eq!(saved.file_name(), "run.bat");
        assert_eq!(doc.file_id, None);
        assert_eq!(doc.target_folder, ParentFolder::Root(RootFolder::Downloads));

        doc.content = "echo bye".to_string();
        store.save(doc.save_draft());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn blank_documents_follow_the_editor_mode() {
        assert_eq!(EditorDocument::blank(EditorMode::Notepad).file_name(), "Untitled.txt");
        assert_eq!(EditorDocument::blank(EditorMode::Word).file_name(), "Document1.docx");
        let script = EditorDocument::new_batch_script();
        assert_eq!(script.file_name(), "myscript.bat");
        assert_eq!(script.line_count(), 3);
        assert_eq!(script.word_count(), 6);
    }

    #[test]
    fn find_counts_case_insensitively_and_wraps_both_ways() {
        let text = "Echo one\necho two\nECHO three";
        assert_eq!(count_matches(text, "echo"), 3);
        assert_eq!(count_matches(text, ""), 0);

        assert_eq!(find_next(text, "echo", 0), Some((0, 4)));
        assert_eq!(find_next(text, "echo", 4), Some((9, 13)));
        assert_eq!(find_next(text, "echo", 20), Some((0, 4)));

        assert_eq!(find_previous(text, "echo", 9), Some((0, 4)));
        assert_eq!(find_previous(text, "echo", 0), Some((18, 22)));
        assert_eq!(find_next(text, "missing", 0), None);
    }
}
