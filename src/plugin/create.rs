//! The "Create new file with template" command.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use super::NewFileTemplatePlugin;
use crate::error::Error;
use crate::host::{FileEntry, Workspace};
use crate::Result;

/// Number of `Untitled` names tried before giving up.
pub const MAX_UNTITLED: usize = 1000;

/// `Untitled.md` for 0, `Untitled N.md` otherwise.
pub fn untitled_name(n: usize) -> String {
    if n == 0 {
        "Untitled.md".to_string()
    } else {
        format!("Untitled {}.md", n)
    }
}

/// `Untitled.md`, `Untitled 1.md`, ..., `Untitled 999.md`.
pub fn candidate_names() -> impl Iterator<Item = String> {
    (0..MAX_UNTITLED).map(untitled_name)
}

impl NewFileTemplatePlugin {
    /// Create a note holding the rendered template under the first free
    /// `Untitled` name and open it in the active view.
    ///
    /// Returns `Ok(None)` when every candidate name is taken. Storage errors
    /// other than a name conflict abort the probe.
    pub async fn create_new_file<W>(&self, workspace: &mut W) -> Result<Option<FileEntry>>
    where
        W: Workspace + ?Sized,
    {
        let content = self.render_template();

        for name in candidate_names() {
            let path = PathBuf::from(&name);
            match workspace.create_file(&path, &content).await {
                Ok(file) => {
                    workspace.open_file(&file, false).await?;
                    info!("Created {:?} from template", file.path);
                    return Ok(Some(file));
                }
                Err(e) if e.is_conflict() => {
                    debug!("{} already exists, trying next name", name);
                }
                Err(e) => {
                    warn!("Failed to create {}: {}", name, e);
                    return Err(Error::Storage(format!("Failed to create {}: {}", name, e)));
                }
            }
        }

        warn!("No free file name after {} attempts", MAX_UNTITLED);
        Ok(None)
    }
}
