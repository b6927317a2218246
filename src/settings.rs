//! Settings panel - one multi-line text input bound to the template

use tracing::debug;
use crate::config::{Settings, SettingsStore, DEFAULT_TEMPLATE};
use crate::Result;

/// Description of a text-area setting as the host should draw it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextAreaSetting {
    pub name: &'static str,
    pub description: &'static str,
    pub placeholder: &'static str,
    pub value: String,
    pub rows: usize,
}

/// Settings tab editing the template of a [`Settings`] value.
///
/// Every change is persisted immediately through the store.
pub struct SettingsTab<'a> {
    settings: &'a mut Settings,
    store: &'a dyn SettingsStore,
}

impl<'a> SettingsTab<'a> {
    pub fn new(settings: &'a mut Settings, store: &'a dyn SettingsStore) -> Self {
        Self { settings, store }
    }

    /// Build the single template input
    pub fn display(&self) -> TextAreaSetting {
        TextAreaSetting {
            name: "Template",
            description: "Template string\nDate formats are supported {{date:YYYYMMDDHHmm}}",
            placeholder: DEFAULT_TEMPLATE,
            value: self.settings.template.clone(),
            rows: 10,
        }
    }

    /// Called on every edit of the input
    pub fn on_change(&mut self, value: &str) -> Result<()> {
        debug!("Template string: {}", value);
        self.settings.template = value.to_string();
        self.store.save(&*self.settings)
    }
}
