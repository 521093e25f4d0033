//! Error types for APM
//!
//! Centralized error handling using thiserror.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for APM
#[derive(Error, Debug)]
pub enum ApmError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML parse error in {path}: {source}")]
    TomlParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Couldn't write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for APM operations
pub type Result<T> = std::result::Result<T, ApmError>;

impl ApmError {
    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            ApmError::Io(e) => format!("File operation failed: {}", e),
            ApmError::TomlParse { path, .. } => {
                format!("{}. Delete or fix {}", self, path.display())
            }
            _ => self.to_string(),
        }
    }
}
