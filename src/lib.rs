//! newfile-template - insert a dated template into new notes
//!
//! The plugin reacts to two host events: an empty note being opened, and the
//! "Create new file with template" command. Both render the configured
//! template, replacing `{{date:FORMAT}}` tokens with the current time.

pub mod config;
pub mod error;
pub mod host;
pub mod plugin;
pub mod settings;
pub mod template;
pub mod ui;
pub mod vault;

pub use error::{Error, Result};
