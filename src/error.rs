//! Error types for newfile-template

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for newfile-template operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading settings or talking to the host
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The host refused to create a file because the path is taken.
    #[error("File already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

impl Error {
    /// Whether this error is a path conflict rather than a real storage failure.
    pub fn is_conflict(&self) -> bool {
        match self {
            Error::AlreadyExists(_) => true,
            Error::Io(e) => e.kind() == std::io::ErrorKind::AlreadyExists,
            _ => false,
        }
    }
}
