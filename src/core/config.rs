//! User configuration: which directories to offer and how to name them.
//!
//! The config is a JSON document, by default at
//! `$XDG_CONFIG_HOME/pop/config.json`:
//!
//! ```json
//! {
//!   "projects": [
//!     { "path": "~/Dev/*" },
//!     { "path": "~/Work/*/*", "display_depth": 2 },
//!     { "path": "~/dotfiles" }
//!   ],
//!   "includes": ["work.json"],
//!   "exclude_current_dir": true,
//!   "disambiguation_strategy": "full_path"
//! }
//! ```
//!
//! Included files contribute only their `projects`. A missing include becomes
//! a warning on the loaded [`Config`]; any other include failure is an error.

use crate::core::deps::FileSystem;
use crate::core::dirs::expand_home;
use crate::core::error::{PopError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One configured directory pattern
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PatternEntry {
    /// Absolute or `~/`-relative path, optionally with single-level `*` wildcards
    #[serde(rename = "path")]
    pub pattern: String,
    /// Trailing path segments shown as the name; 0 means 1
    #[serde(default)]
    pub display_depth: usize,
}

impl PatternEntry {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            display_depth: 0,
        }
    }

    pub fn with_display_depth(mut self, display_depth: usize) -> Self {
        self.display_depth = display_depth;
        self
    }

    /// Effective display depth, never below 1
    pub fn display_depth(&self) -> usize {
        self.display_depth.max(1)
    }
}

/// How colliding display names are lengthened
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisambiguationStrategy {
    /// `app (frontend)`: append the first parent segment that tells members apart
    #[default]
    FirstUniqueSegment,
    /// `frontend/app`: grow every colliding name by whole parent segments
    FullPath,
}

impl DisambiguationStrategy {
    /// Unknown or missing values fall back to the default
    pub fn from_config(value: Option<&str>) -> Self {
        match value {
            Some("full_path") => Self::FullPath,
            _ => Self::FirstUniqueSegment,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub includes: Vec<String>,
    #[serde(default)]
    pub projects: Vec<PatternEntry>,
    #[serde(default)]
    pub exclude_current_dir: bool,
    #[serde(default)]
    pub disambiguation_strategy: Option<String>,

    /// Non-fatal problems met while loading
    #[serde(skip)]
    pub warnings: Vec<String>,
}

impl Config {
    /// Load the config at `path` and merge the projects of its includes
    pub fn load(fs: &dyn FileSystem, path: &Path) -> Result<Self> {
        let mut config = Self::read(fs, path)?;

        let config_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        for include in config.includes.clone() {
            let mut include_path = PathBuf::from(expand_home(fs, &include));
            if include_path.is_relative() {
                include_path = config_dir.join(include_path);
            }

            match Self::read(fs, &include_path) {
                Ok(included) => {
                    log::debug!(
                        "Merged {} projects from include {}",
                        included.projects.len(),
                        include_path.display()
                    );
                    config.projects.extend(included.projects);
                }
                Err(e) if e.is_missing_config() => {
                    log::warn!("Include {include:?} not found, skipping");
                    config
                        .warnings
                        .push(format!("include file {include:?} not found, skipping"));
                }
                Err(e) => return Err(PopError::include_failed(include, e)),
            }
        }

        Ok(config)
    }

    fn read(fs: &dyn FileSystem, path: &Path) -> Result<Self> {
        let content = fs.read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PopError::config_not_found(path)
            } else {
                PopError::config_read_failed(path, e)
            }
        })?;
        serde_json::from_str(&content).map_err(|e| PopError::config_parse_failed(path, e))
    }

    pub fn strategy(&self) -> DisambiguationStrategy {
        DisambiguationStrategy::from_config(self.disambiguation_strategy.as_deref())
    }
}
