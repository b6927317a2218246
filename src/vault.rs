//! Filesystem host - a directory of notes standing in for the editor.
//!
//! Opening a file makes it the active editor; editor operations write
//! straight back to disk. Cursor, focus and rename state are kept in memory
//! so the CLI can report them.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::Error;
use crate::host::{Cursor, EditorView, EphemeralState, FileEntry, ViewMode, Workspace};
use crate::Result;

/// The document open in an [`FsVault`].
#[derive(Debug, Clone)]
pub struct FsEditor {
    path: PathBuf,
    full_path: PathBuf,
    mode: ViewMode,
    content: Option<String>,
    pub cursor: Option<Cursor>,
    pub focused: bool,
    pub ephemeral: Option<EphemeralState>,
    pub dirty: bool,
}

impl FsEditor {
    /// Path relative to the vault root
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Content written through this editor, if any
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }
}

#[async_trait]
impl EditorView for FsEditor {
    fn mode(&self) -> ViewMode {
        self.mode
    }

    async fn set_content(&mut self, content: &str, mark_dirty: bool) -> Result<()> {
        tokio::fs::write(&self.full_path, content).await?;
        self.content = Some(content.to_string());
        self.dirty = mark_dirty;
        Ok(())
    }

    async fn focus(&mut self) -> Result<()> {
        self.focused = true;
        Ok(())
    }

    async fn set_cursor(&mut self, cursor: Cursor) -> Result<()> {
        self.cursor = Some(cursor);
        Ok(())
    }

    async fn set_ephemeral_state(&mut self, state: EphemeralState) -> Result<()> {
        self.ephemeral = Some(state);
        Ok(())
    }
}

/// A vault rooted at a directory, with at most one open editor.
pub struct FsVault {
    root: PathBuf,
    mode: ViewMode,
    active: Option<FsEditor>,
}

impl FsVault {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            mode: ViewMode::Source,
            active: None,
        }
    }

    /// Mode newly opened editors start in
    pub fn with_view_mode(mut self, mode: ViewMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn active_editor(&self) -> Option<&FsEditor> {
        self.active.as_ref()
    }

    /// Open `path` (absolute, or relative to the root) in the editor and
    /// return the entry the host would report in its file-open event.
    pub async fn open(&mut self, path: &Path) -> Result<FileEntry> {
        let full_path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        };

        let metadata = tokio::fs::metadata(&full_path).await?;
        if !metadata.is_file() {
            return Err(Error::Storage(format!("{} is not a file", full_path.display())));
        }

        let relative = full_path
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| full_path.clone());

        debug!("Opening {:?} in {:?}", relative, self.root);
        self.active = Some(FsEditor {
            path: relative.clone(),
            full_path,
            mode: self.mode,
            content: None,
            cursor: None,
            focused: false,
            ephemeral: None,
            dirty: false,
        });

        Ok(FileEntry { path: relative, size: metadata.len() })
    }
}

#[async_trait]
impl Workspace for FsVault {
    fn active_view(&mut self) -> Option<&mut dyn EditorView> {
        self.active.as_mut().map(|e| e as &mut dyn EditorView)
    }

    async fn create_file(&mut self, path: &Path, content: &str) -> Result<FileEntry> {
        let full_path = self.root.join(path);

        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&full_path)
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::AlreadyExists => Error::AlreadyExists(path.to_path_buf()),
                _ => Error::Io(e),
            })?;

        file.write_all(content.as_bytes()).await?;
        file.flush().await?;

        Ok(FileEntry {
            path: path.to_path_buf(),
            size: content.len() as u64,
        })
    }

    async fn open_file(&mut self, file: &FileEntry, new_pane: bool) -> Result<()> {
        if new_pane {
            debug!("Single-pane vault, opening {:?} in the active view", file.path);
        }
        self.open(&file.path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::{InMemoryStore, Settings};
    use crate::plugin::NewFileTemplatePlugin;
    use crate::template::FixedClock;
    use tempfile::TempDir;

    fn plugin() -> NewFileTemplatePlugin {
        let clock = FixedClock::parse("2024-03-05T08:00:00+00:00").unwrap();
        let settings = Settings { template: "# {{date:YYYY-MM-DD}}\n\n".to_string(), ..Settings::default() };
        NewFileTemplatePlugin::load(Box::new(InMemoryStore::with_settings(settings)), Arc::new(clock))
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_file_conflict() {
        let tmp = TempDir::new().unwrap();
        let mut vault = FsVault::new(tmp.path());
        assert_eq!(vault.root(), tmp.path());

        let entry = vault.create_file(Path::new("a.md"), "hi").await.unwrap();
        assert_eq!(entry.size, 2);
        assert_eq!(std::fs::read_to_string(tmp.path().join("a.md")).unwrap(), "hi");

        let err = vault.create_file(Path::new("a.md"), "again").await.unwrap_err();
        assert!(matches!(err, Error::AlreadyExists(_)));
        assert_eq!(std::fs::read_to_string(tmp.path().join("a.md")).unwrap(), "hi");
    }

    #[tokio::test]
    async fn test_create_file_other_error_is_not_conflict() {
        let tmp = TempDir::new().unwrap();
        let mut vault = FsVault::new(tmp.path());

        let err = vault.create_file(Path::new("missing/dir/a.md"), "hi").await.unwrap_err();
        assert!(!err.is_conflict());
    }

    #[tokio::test]
    async fn test_create_command_on_disk() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("Untitled.md"), "taken").unwrap();
        let mut vault = FsVault::new(tmp.path());

        let file = plugin().create_new_file(&mut vault).await.unwrap().unwrap();
        assert_eq!(file.path, PathBuf::from("Untitled 1.md"));
        assert_eq!(
            std::fs::read_to_string(tmp.path().join("Untitled 1.md")).unwrap(),
            "# 2024-03-05\n\n"
        );
        assert_eq!(std::fs::read_to_string(tmp.path().join("Untitled.md")).unwrap(), "taken");
        assert_eq!(vault.active_editor().unwrap().path(), Path::new("Untitled 1.md"));
    }

    #[tokio::test]
    async fn test_fill_on_open_on_disk() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("note.md"), "").unwrap();
        let mut vault = FsVault::new(tmp.path());

        let entry = vault.open(Path::new("note.md")).await.unwrap();
        assert!(entry.is_empty());

        assert!(plugin().on_file_open(Some(&entry), &mut vault).await.unwrap());
        assert_eq!(std::fs::read_to_string(tmp.path().join("note.md")).unwrap(), "# 2024-03-05\n\n");

        let editor = vault.active_editor().unwrap();
        assert_eq!(editor.cursor, Some(Cursor { line: 3, ch: 1 }));
        assert!(editor.focused);
        assert!(!editor.dirty);
        assert_eq!(editor.content(), Some("# 2024-03-05\n\n"));
        assert_eq!(editor.ephemeral, Some(EphemeralState::RenameAll));

        // now non-empty, so a second open leaves it alone
        let entry = vault.open(Path::new("note.md")).await.unwrap();
        assert!(!plugin().on_file_open(Some(&entry), &mut vault).await.unwrap());
    }

    #[tokio::test]
    async fn test_preview_mode_is_left_alone() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("note.md"), "").unwrap();
        let mut vault = FsVault::new(tmp.path()).with_view_mode(ViewMode::Preview);

        let entry = vault.open(Path::new("note.md")).await.unwrap();
        assert!(!plugin().on_file_open(Some(&entry), &mut vault).await.unwrap());
        assert_eq!(std::fs::read_to_string(tmp.path().join("note.md")).unwrap(), "");
    }

    #[tokio::test]
    async fn test_open_rejects_directories() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join("folder")).unwrap();
        let mut vault = FsVault::new(tmp.path());

        assert!(matches!(vault.open(Path::new("folder")).await, Err(Error::Storage(_))));
        assert!(vault.open(Path::new("nope.md")).await.is_err());
    }
}
