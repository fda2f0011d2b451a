//! Persisted access history: which destination was picked, and when.
//!
//! The file lives at `$XDG_DATA_HOME/pop/history.json` and holds one entry
//! per canonical path. It is read once per run, updated in memory and written
//! back at most once; a missing or corrupt file is simply an empty history.

use crate::core::deps::{Deps, FileSystem};
use crate::core::error::{PopError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub path: PathBuf,
    pub last_access: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone)]
pub struct History {
    #[serde(default)]
    pub entries: Vec<HistoryEntry>,
    #[serde(skip)]
    path: PathBuf,
}

impl History {
    /// An empty history that will be saved to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            entries: Vec::new(),
            path: path.into(),
        }
    }

    pub fn load(fs: &dyn FileSystem, path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let content = match fs.read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    log::warn!("Cannot read history {}: {e}", path.display());
                }
                return Self::new(path);
            }
        };

        match serde_json::from_str::<History>(&content) {
            Ok(mut history) => {
                log::debug!("Loaded {} history entries", history.entries.len());
                history.path = path;
                history
            }
            Err(e) => {
                log::warn!("Ignoring corrupt history {}: {e}", path.display());
                Self::new(path)
            }
        }
    }

    /// Mark `path` as accessed now
    pub fn record(&mut self, deps: &Deps, path: &Path) {
        let path = deps.resolve_or_keep(path);
        let now = deps.clock.now();

        match self.entries.iter_mut().find(|entry| entry.path == path) {
            Some(entry) => entry.last_access = now,
            None => self.entries.push(HistoryEntry {
                path,
                last_access: now,
            }),
        }
    }

    /// Forget `path`, matching it as given or after symlink resolution.
    /// Returns whether anything was removed.
    pub fn remove(&mut self, deps: &Deps, path: &Path) -> bool {
        let resolved = deps.resolve_or_keep(path);
        let before = self.entries.len();
        self.entries
            .retain(|entry| entry.path != path && entry.path != resolved);
        self.entries.len() != before
    }

    pub fn save(&self, fs: &dyn FileSystem) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs.create_dir_all(dir)
                .map_err(|e| PopError::history_write_failed(dir, e))?;
        }

        let json =
            serde_json::to_string_pretty(self).map_err(PopError::history_serialization_failed)?;
        fs.write(&self.path, &json)
            .map_err(|e| PopError::history_write_failed(&self.path, e))?;

        log::debug!(
            "Saved {} history entries to {}",
            self.entries.len(),
            self.path.display()
        );
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
