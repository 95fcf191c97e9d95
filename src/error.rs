//! Error types for l10n-rewrite
//!
//! Errors are grouped by category: file handling and configuration.
//! Lines that fail to match a definition pattern are not errors; they are
//! passed through untouched by every pass.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type encompassing all error categories
#[derive(Error, Debug)]
pub enum AppError {
    /// File I/O related errors
    #[error(transparent)]
    FileIO(#[from] FileError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// File I/O related errors
#[derive(Error, Debug)]
pub enum FileError {
    /// File not found at specified path
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// File content is not valid UTF-8
    #[error("Unable to read file as UTF-8 text: {path}")]
    EncodingError { path: PathBuf },

    /// Error reading file
    #[error("Could not read file: {path}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error writing the rewritten file
    #[error("Could not write file: {path}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error moving the original aside before a rewrite
    #[error("Could not stage {path} as {staged}")]
    StagingError {
        path: PathBuf,
        staged: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error deleting the staged original after a successful write
    #[error("Rewrote {path} but could not remove {staged}")]
    CleanupError {
        path: PathBuf,
        staged: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error scanning a source directory
    #[error("Could not read directory: {path}")]
    DirectoryScanError {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Configuration related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error reading the configuration file
    #[error("Could not load configuration from {path}")]
    LoadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error parsing configuration
    #[error("Invalid configuration format in {path}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Invalid configuration value
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

/// Result type alias for operations that can fail with AppError
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for file operations
pub type FileResult<T> = Result<T, FileError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
