//! Data flowing between the stages of the resolution pipeline.
//!
//! # Public API
//! - [`ResolvedPath`]: an expanded candidate directory with its display depth
//! - [`NamedEntry`]: a project or worktree with its (soon unique) display name
//! - [`Destination`]: the record handed to the picker

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Sentinel prefix for destinations that are bare sessions, not directories
pub const SESSION_PATH_PREFIX: &str = "tmux:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    pub path: PathBuf,
    pub display_depth: usize,
}

impl ResolvedPath {
    pub fn new(path: impl Into<PathBuf>, display_depth: usize) -> Self {
        Self {
            path: path.into(),
            display_depth,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_worktree: bool,
    /// Base name of the configured project directory
    pub project_name: String,
}

impl NamedEntry {
    pub fn project(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let project_name = base_name(&path);
        Self {
            name: name.into(),
            path,
            is_worktree: false,
            project_name,
        }
    }
}

/// One row of the picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    pub name: String,
    pub path: PathBuf,
    pub context: String,
    pub has_active_session: bool,
}

impl Destination {
    /// A live session with no configured directory behind it
    pub fn standalone_session(session: &str) -> Self {
        Self {
            name: session.to_string(),
            path: PathBuf::from(format!("{SESSION_PATH_PREFIX}{session}")),
            context: String::new(),
            has_active_session: true,
        }
    }

    /// The session name if this is a standalone session entry
    pub fn standalone_session_name(&self) -> Option<&str> {
        self.path.to_str()?.strip_prefix(SESSION_PATH_PREFIX)
    }

    pub fn is_standalone_session(&self) -> bool {
        self.standalone_session_name().is_some()
    }
}

impl From<NamedEntry> for Destination {
    fn from(entry: NamedEntry) -> Self {
        Self {
            name: entry.name,
            path: entry.path,
            context: entry.project_name,
            has_active_session: false,
        }
    }
}

pub(crate) fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
