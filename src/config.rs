//! Settings and their persistence

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;
use crate::Result;
use crate::error::Error;

/// Template used when none has been configured
pub const DEFAULT_TEMPLATE: &str = "---
date: {{date:YYYY-MM-DD}}
aliases: []
---



";

/// Which of the two new-note flows is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Trigger {
    /// Fill empty notes when they are opened
    OnOpen,
    /// Only the explicit "Create new file with template" command
    Command,
    #[default]
    Both,
}

impl Trigger {
    pub fn fills_on_open(self) -> bool {
        matches!(self, Trigger::OnOpen | Trigger::Both)
    }

    pub fn allows_command(self) -> bool {
        matches!(self, Trigger::Command | Trigger::Both)
    }
}

impl std::str::FromStr for Trigger {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "on-open" => Ok(Trigger::OnOpen),
            "command" => Ok(Trigger::Command),
            "both" => Ok(Trigger::Both),
            other => Err(Error::Config(format!(
                "Unknown trigger '{}', expected on-open, command or both",
                other
            ))),
        }
    }
}

/// Persisted plugin settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Template inserted into new notes
    #[serde(default = "default_template")]
    pub template: String,

    #[serde(default)]
    pub trigger: Trigger,
}

fn default_template() -> String {
    DEFAULT_TEMPLATE.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            template: default_template(),
            trigger: Trigger::default(),
        }
    }
}

/// Persistence boundary for [`Settings`]: read once on load, written
/// wholesale on every change.
pub trait SettingsStore: Send + Sync {
    /// Load stored settings, falling back to defaults for anything missing.
    fn load(&self) -> Result<Settings>;

    /// Overwrite the stored settings.
    fn save(&self, settings: &Settings) -> Result<()>;
}

/// Settings kept as a JSON file on disk
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location under the home directory
    pub fn default_location() -> Self {
        Self::new(config_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the stored file so the next load yields defaults
    pub fn remove(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(&self.path)?;
        Ok(true)
    }
}

impl SettingsStore for JsonFileStore {
    fn load(&self) -> Result<Settings> {
        if !self.path.exists() {
            debug!("No settings at {:?}, using defaults", self.path);
            return Ok(Settings::default());
        }

        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() || content.trim() == "null" {
            return Ok(Settings::default());
        }

        let settings: Settings = serde_json::from_str(&content)?;
        Ok(settings)
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(settings)?;
        std::fs::write(&self.path, content)?;
        debug!("Saved settings to {:?}", self.path);
        Ok(())
    }
}

/// In-memory store for testing
pub struct InMemoryStore {
    settings: Mutex<Option<Settings>>,
    saves: Mutex<usize>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            settings: Mutex::new(None),
            saves: Mutex::new(0),
        }
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            settings: Mutex::new(Some(settings)),
            saves: Mutex::new(0),
        }
    }

    /// What was last saved, if anything
    pub fn stored(&self) -> Option<Settings> {
        self.settings.lock().ok().and_then(|s| s.clone())
    }

    /// Number of times `save` has been called
    pub fn save_count(&self) -> usize {
        self.saves.lock().map(|n| *n).unwrap_or(0)
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsStore for InMemoryStore {
    fn load(&self) -> Result<Settings> {
        let stored = self.settings.lock()
            .map_err(|_| Error::Config("Settings lock poisoned".to_string()))?;
        Ok(stored.clone().unwrap_or_default())
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        let mut stored = self.settings.lock()
            .map_err(|_| Error::Config("Settings lock poisoned".to_string()))?;
        *stored = Some(settings.clone());
        if let Ok(mut n) = self.saves.lock() {
            *n += 1;
        }
        Ok(())
    }
}

/// Get the config directory path
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".newfile-template")
}

/// Get the config file path
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}
