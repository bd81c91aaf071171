//! Error types for folder-drain-core

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for folder-drain operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to watch for changes: {0}")]
    Watch(#[from] notify::Error),

    #[error("Configuration file created at {path}, add your folder pairs and restart")]
    ConfigCreated { path: PathBuf },

    #[error("No folder pairs given in configuration file {path}")]
    NoPairs { path: PathBuf },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Returns true for errors that stop the whole process rather than a single watcher.
    pub fn is_fatal_config(&self) -> bool {
        matches!(
            self,
            Self::ConfigCreated { .. } | Self::NoPairs { .. } | Self::Config(_)
        )
    }
}

/// Result type alias for folder-drain operations
pub type Result<T> = std::result::Result<T, Error>;
