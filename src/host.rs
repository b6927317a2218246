//! Host editor and workspace API surface.
//!
//! The plugin never touches files or editor state directly; everything goes
//! through these traits. [`crate::vault::FsVault`] implements them over a
//! directory of notes, and tests use the fakes at the bottom of this file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::Result;

/// A file as reported by the host's file-open notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Path relative to the workspace root.
    pub path: PathBuf,

    /// Size in bytes.
    pub size: u64,
}

impl FileEntry {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
}

/// How the active editor presents the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Raw text editing
    Source,
    /// Rendered reading view
    Preview,
}

/// Zero-based line, character column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub line: usize,
    pub ch: usize,
}

/// Transient view state that is never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EphemeralState {
    /// Put the whole title into rename mode.
    RenameAll,
}

/// An open document view.
#[async_trait]
pub trait EditorView: Send {
    fn mode(&self) -> ViewMode;

    /// Replace the whole document. `mark_dirty == false` means the change is
    /// not tracked as an external modification.
    async fn set_content(&mut self, content: &str, mark_dirty: bool) -> Result<()>;

    async fn focus(&mut self) -> Result<()>;

    async fn set_cursor(&mut self, cursor: Cursor) -> Result<()>;

    async fn set_ephemeral_state(&mut self, state: EphemeralState) -> Result<()>;
}

/// The host workspace: active view lookup, file creation and opening.
#[async_trait]
pub trait Workspace: Send {
    /// The active document view, if any.
    fn active_view(&mut self) -> Option<&mut dyn EditorView>;

    /// Create a file at `path`. Fails with [`crate::Error::AlreadyExists`]
    /// when the path is taken.
    async fn create_file(&mut self, path: &Path, content: &str) -> Result<FileEntry>;

    /// Open `file` in the active view, or in a new pane if `new_pane`.
    async fn open_file(&mut self, file: &FileEntry, new_pane: bool) -> Result<()>;
}
