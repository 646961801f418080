use std::path::Path;

use thiserror::Error;

/// Error types for the prefsync application.
///
/// Covers everything around the preference engine: reading the application
/// settings, setting up file watching and logging. Errors of the engine
/// itself are recovered internally and never surface here.
#[derive(Error, Debug)]
pub enum PrefsError {
    /// Application settings are missing or invalid
    #[error("invalid setting '{field}': {reason}")]
    InvalidSetting {
        /// The setting that is invalid
        field: String,
        /// Reason why the setting is invalid
        reason: String,
    },

    /// I/O operation error
    #[error("I/O error on '{path}': {details}")]
    IoError {
        /// Path where I/O error occurred
        path: std::path::PathBuf,
        /// I/O error details
        details: String,
    },

    /// Standard I/O operation error (for compatibility)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error with location context
    #[error("failed to parse TOML at '{location}': {details}")]
    TomlParseError {
        /// Location of TOML being parsed (file path or "string")
        location: String,
        /// Parse error details
        details: String,
    },

    /// The file system watcher could not be set up
    #[error("failed to watch '{path}': {details}")]
    WatchError {
        /// Path that could not be watched
        path: std::path::PathBuf,
        /// Watcher error details
        details: String,
    },

    /// Logging could not be initialized
    #[error("failed to initialize logging: {0}")]
    Logging(String),
}

/// A specialized `Result` type for prefsync operations.
pub type Result<T> = std::result::Result<T, PrefsError>;

impl PrefsError {
    /// Creates a TOML parsing error with optional file path context.
    ///
    /// # Arguments
    ///
    /// * `error` - The underlying parsing error
    /// * `path` - Optional path to the file that failed to parse
    pub fn toml_parse(error: impl std::fmt::Display, path: Option<&Path>) -> Self {
        let location = match path {
            Some(p) => {
                let clean_path = p.canonicalize().unwrap_or_else(|_| p.to_path_buf());
                clean_path.to_string_lossy().to_string()
            }
            None => "string".to_string(),
        };

        PrefsError::TomlParseError {
            location,
            details: error.to_string(),
        }
    }

    /// Creates an I/O error with file path context.
    pub fn io(error: impl std::fmt::Display, path: &Path) -> Self {
        PrefsError::IoError {
            path: path.to_path_buf(),
            details: error.to_string(),
        }
    }
}
