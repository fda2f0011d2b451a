//! Domain-specific error types and error handling utilities.
//!
//! This module defines [`PopError`], the error type for the failures that
//! surface at the boundary of the tool. The resolution engine itself degrades
//! gracefully (skipped patterns, empty caches, dropped paths) and only uses
//! these variants where a caller has to decide what to do.
//!
//! # Public API
//! - [`PopError`]: Main error enum covering all reportable failure modes
//! - [`Result<T>`]: Type alias for `std::result::Result<T, PopError>`
//!
//! # Error Categories
//! - **Configuration**: Missing, unreadable or malformed config and includes
//! - **Patterns**: Invalid glob syntax, recursive globs
//! - **History**: Serialization and write failures
//! - **Resolution**: Nothing left to pick from

use std::path::PathBuf;
use thiserror::Error;

/// Domain-specific error types for pop
#[derive(Error, Debug)]
pub enum PopError {
    // Configuration errors
    #[error("Config file does not exist at '{path}'")]
    ConfigNotFound { path: PathBuf },

    #[error("Failed to read config file '{path}': {source}")]
    ConfigReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ConfigParseFailed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to load include '{include}': {source}")]
    IncludeFailed {
        include: String,
        source: Box<PopError>,
    },

    #[error("Could not determine home directory")]
    HomeDirectoryNotFound,

    // Pattern errors
    #[error("Invalid glob pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: glob::PatternError,
    },

    #[error("Recursive glob '**' is not supported: {pattern}")]
    RecursiveGlob { pattern: String },

    // History errors
    #[error("Failed to serialize history: {source}")]
    HistorySerializationFailed { source: serde_json::Error },

    #[error("Failed to write history file '{path}': {source}")]
    HistoryWriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    // Resolution errors
    #[error("No projects found. Check your config at {path}")]
    NoProjectsFound { path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results using PopError
pub type Result<T> = std::result::Result<T, PopError>;

impl PopError {
    /// Create a config not found error
    pub fn config_not_found(path: impl Into<PathBuf>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create a config read failed error
    pub fn config_read_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ConfigReadFailed {
            path: path.into(),
            source,
        }
    }

    /// Create a config parse failed error
    pub fn config_parse_failed(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::ConfigParseFailed {
            path: path.into(),
            source,
        }
    }

    /// Wrap a failure that happened while loading an included config file
    pub fn include_failed(include: impl Into<String>, source: PopError) -> Self {
        Self::IncludeFailed {
            include: include.into(),
            source: Box::new(source),
        }
    }

    /// Create an invalid pattern error
    pub fn invalid_pattern(pattern: impl Into<String>, source: glob::PatternError) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            source,
        }
    }

    /// Create a recursive glob error
    pub fn recursive_glob(pattern: impl Into<String>) -> Self {
        Self::RecursiveGlob {
            pattern: pattern.into(),
        }
    }

    /// Create a history serialization failed error
    pub fn history_serialization_failed(source: serde_json::Error) -> Self {
        Self::HistorySerializationFailed { source }
    }

    /// Create a history write failed error
    pub fn history_write_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::HistoryWriteFailed {
            path: path.into(),
            source,
        }
    }

    /// Create a no projects found error
    pub fn no_projects_found(config_path: impl Into<PathBuf>) -> Self {
        Self::NoProjectsFound {
            path: config_path.into(),
        }
    }

    /// True when the error only means "there is no config file yet"
    pub fn is_missing_config(&self) -> bool {
        matches!(self, Self::ConfigNotFound { .. })
    }
}
