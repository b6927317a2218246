//! Fill an empty note with the template when it is opened.

use tracing::{debug, info};

use super::NewFileTemplatePlugin;
use crate::host::{Cursor, EphemeralState, FileEntry, ViewMode, Workspace};
use crate::Result;

/// Cursor position on the line just past the rendered content.
pub fn cursor_after(content: &str) -> Cursor {
    Cursor {
        line: content.split('\n').count(),
        ch: 1,
    }
}

impl NewFileTemplatePlugin {
    /// Handle the host's file-open notification.
    ///
    /// Only an empty file shown in a source-mode view is touched. Returns
    /// whether the template was inserted.
    pub async fn on_file_open<W>(&self, file: Option<&FileEntry>, workspace: &mut W) -> Result<bool>
    where
        W: Workspace + ?Sized,
    {
        if !self.settings.trigger.fills_on_open() {
            return Ok(false);
        }

        let Some(file) = file else {
            return Ok(false);
        };

        let Some(view) = workspace.active_view() else {
            debug!("No active editor for {:?}", file.path);
            return Ok(false);
        };

        if !file.is_empty() || view.mode() != ViewMode::Source {
            return Ok(false);
        }

        let content = self.render_template();
        view.set_content(&content, false).await?;

        view.focus().await?;
        view.set_cursor(cursor_after(&content)).await?;
        // prompt for a title right away
        view.set_ephemeral_state(EphemeralState::RenameAll).await?;

        info!("Inserted template into {:?}", file.path);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use super::*;
    use crate::config::{InMemoryStore, Settings, Trigger};
    use crate::host::fake::{FakeWorkspace, ViewCall};
    use crate::template::FixedClock;

    fn plugin(trigger: Trigger) -> NewFileTemplatePlugin {
        let clock = FixedClock::parse("2024-03-05T08:00:00+00:00").unwrap();
        let settings = Settings { trigger, ..Settings::default() };
        NewFileTemplatePlugin::load(Box::new(InMemoryStore::with_settings(settings)), Arc::new(clock))
            .unwrap()
    }

    fn file(size: u64) -> FileEntry {
        FileEntry { path: PathBuf::from("Untitled.md"), size }
    }

    #[test]
    fn test_cursor_after() {
        assert_eq!(cursor_after(""), Cursor { line: 1, ch: 1 });
        assert_eq!(cursor_after("one"), Cursor { line: 1, ch: 1 });
        assert_eq!(cursor_after("one\ntwo\n"), Cursor { line: 3, ch: 1 });
    }

    #[tokio::test]
    async fn test_fills_empty_source_file() {
        let plugin = plugin(Trigger::OnOpen);
        let mut ws = FakeWorkspace::with_view(ViewMode::Source);

        let applied = plugin.on_file_open(Some(&file(0)), &mut ws).await.unwrap();
        assert!(applied);

        let expected = "---\ndate: 2024-03-05\naliases: []\n---\n\n\n\n";
        assert_eq!(
            ws.view_calls(),
            &[
                ViewCall::SetContent { content: expected.to_string(), mark_dirty: false },
                ViewCall::Focus,
                ViewCall::SetCursor(Cursor { line: 8, ch: 1 }),
                ViewCall::SetEphemeralState(EphemeralState::RenameAll),
            ]
        );
    }

    #[tokio::test]
    async fn test_ignores_non_empty_file() {
        let plugin = plugin(Trigger::Both);
        let mut ws = FakeWorkspace::with_view(ViewMode::Source);

        assert!(!plugin.on_file_open(Some(&file(12)), &mut ws).await.unwrap());
        assert!(ws.view_calls().is_empty());
    }

    #[tokio::test]
    async fn test_ignores_preview_mode() {
        let plugin = plugin(Trigger::Both);
        let mut ws = FakeWorkspace::with_view(ViewMode::Preview);

        assert!(!plugin.on_file_open(Some(&file(0)), &mut ws).await.unwrap());
        assert!(ws.view_calls().is_empty());
    }

    #[tokio::test]
    async fn test_ignores_missing_file_or_view() {
        let plugin = plugin(Trigger::Both);

        let mut ws = FakeWorkspace::with_view(ViewMode::Source);
        assert!(!plugin.on_file_open(None, &mut ws).await.unwrap());
        assert!(ws.view_calls().is_empty());

        let mut ws = FakeWorkspace::default();
        assert!(!plugin.on_file_open(Some(&file(0)), &mut ws).await.unwrap());
    }

    #[tokio::test]
    async fn test_disabled_by_command_trigger() {
        let plugin = plugin(Trigger::Command);
        let mut ws = FakeWorkspace::with_view(ViewMode::Source);

        assert!(!plugin.on_file_open(Some(&file(0)), &mut ws).await.unwrap());
        assert!(ws.view_calls().is_empty());
    }
}
