//! Error types shared by moodscope services.

use std::path::PathBuf;

use thiserror::Error;

use crate::validation::ValidationError;

/// Result type alias using the shared error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Startup failures: the config file could not be read, parsed, or accepted.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read config from {}: {source}", path.display())]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config from {}: {source}", path.display())]
    ParseConfig {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] ValidationError),
}

impl Error {
    /// Path of the offending file, when the failure came from disk.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::ReadConfig { path, .. } | Self::ParseConfig { path, .. } => Some(path),
            Self::Invalid(_) => None,
        }
    }
}
