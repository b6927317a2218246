//! Plugin lifecycle and command registry.
//!
//! [`NewFileTemplatePlugin`] owns the loaded [`Settings`] and the store they
//! are persisted to. The two ways of getting a template into a new note live
//! in their own modules:
//!
//! - [`fill`]: fill an empty note when the host reports it was opened
//! - [`create`]: the explicit "Create new file with template" command
//!
//! Which of them is active is controlled by [`Settings::trigger`].

pub mod create;
pub mod fill;

use std::sync::Arc;

use tracing::info;

use crate::config::{Settings, SettingsStore};
use crate::error::Error;
use crate::host::Workspace;
use crate::settings::SettingsTab;
use crate::template::{self, Clock};
use crate::Result;

pub use create::{candidate_names, untitled_name, MAX_UNTITLED};
pub use fill::cursor_after;

/// A command the plugin registers with the host's command palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    pub id: &'static str,
    pub name: &'static str,
}

/// Id of the create-with-template command
pub const CREATE_COMMAND_ID: &str = "create-new-file-with-template";

const CREATE_COMMAND: CommandSpec = CommandSpec {
    id: CREATE_COMMAND_ID,
    name: "Create new file with template",
};

/// The loaded plugin.
pub struct NewFileTemplatePlugin {
    settings: Settings,
    store: Box<dyn SettingsStore>,
    clock: Arc<dyn Clock>,
}

impl NewFileTemplatePlugin {
    /// Activate the plugin: load persisted settings.
    pub fn load(store: Box<dyn SettingsStore>, clock: Arc<dyn Clock>) -> Result<Self> {
        info!("loading new-file-template plugin");

        let settings = store.load()?;
        Ok(Self { settings, store, clock })
    }

    /// Deactivate the plugin. Handlers are owned by the host, so there is
    /// nothing to tear down here.
    pub fn unload(self) {
        info!("unloading new-file-template plugin");
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Settings panel bound to this plugin's settings and store.
    pub fn settings_tab(&mut self) -> SettingsTab<'_> {
        SettingsTab::new(&mut self.settings, self.store.as_ref())
    }

    /// Replace the settings wholesale and persist them.
    pub fn update_settings(&mut self, settings: Settings) -> Result<()> {
        self.settings = settings;
        self.store.save(&self.settings)
    }

    /// Render the configured template at the clock's current time.
    pub fn render_template(&self) -> String {
        template::render(&self.settings.template, &self.clock.now())
    }

    /// Commands enabled by the current trigger setting.
    pub fn commands(&self) -> Vec<CommandSpec> {
        if self.settings.trigger.allows_command() {
            vec![CREATE_COMMAND]
        } else {
            Vec::new()
        }
    }

    /// Dispatch a command palette invocation.
    ///
    /// Returns whether the command did anything.
    pub async fn run_command<W>(&self, id: &str, workspace: &mut W) -> Result<bool>
    where
        W: Workspace + ?Sized,
    {
        if !self.commands().iter().any(|c| c.id == id) {
            return Err(Error::UnknownCommand(id.to_string()));
        }

        match id {
            CREATE_COMMAND_ID => Ok(self.create_new_file(workspace).await?.is_some()),
            other => Err(Error::UnknownCommand(other.to_string())),
        }
    }
}
