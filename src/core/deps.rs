//! Explicit dependency context for the resolution engine.
//!
//! Every entry point takes a [`Deps`] built once by the caller instead of
//! reaching for the real filesystem, clock or tmux server directly. The
//! binary uses [`Deps::real`]; tests swap in a [`FixedSessionFeed`] and a
//! [`FixedClock`] while still running against temporary directories.
//!
//! # Public API
//! - [`FileSystem`] / [`RealFileSystem`]: stat, listing, symlink resolution, globbing
//! - [`SessionFeed`] / [`TmuxSessionFeed`] / [`FixedSessionFeed`]: live session activity
//! - [`Clock`] / [`SystemClock`] / [`FixedClock`]: current time for history updates
//! - [`Deps`]: the bundle threaded through the pipeline

use crate::core::error::{PopError, Result};
use chrono::{DateTime, Utc};
use glob::MatchOptions;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

/// Session name to last activity time (epoch seconds)
pub type SessionActivity = HashMap<String, i64>;

/// The two facts the engine needs from a stat call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    pub is_dir: bool,
    pub modified: DateTime<Utc>,
}

/// Filesystem operations used by the engine
pub trait FileSystem: Send + Sync {
    /// Home directory of the current user
    fn home_dir(&self) -> Option<PathBuf>;

    /// Environment variable lookup; empty values count as unset
    fn env_var(&self, key: &str) -> Option<String>;

    fn current_dir(&self) -> std::io::Result<PathBuf>;

    /// Stat following symlinks
    fn stat(&self, path: &Path) -> std::io::Result<FileStat>;

    /// Names of the entries of a directory, in no particular order
    fn read_dir_names(&self, path: &Path) -> std::io::Result<Vec<String>>;

    fn read_to_string(&self, path: &Path) -> std::io::Result<String>;

    fn write(&self, path: &Path, contents: &str) -> std::io::Result<()>;

    fn create_dir_all(&self, path: &Path) -> std::io::Result<()>;

    /// Resolve every symlink in `path`
    fn canonicalize(&self, path: &Path) -> std::io::Result<PathBuf>;

    /// Match `suffix` (a glob) under the literal directory `base`.
    ///
    /// Returned paths are prefixed with `base`. Wildcards never match hidden
    /// entries.
    fn glob(&self, base: &Path, suffix: &str) -> Result<Vec<PathBuf>>;
}

/// [`FileSystem`] backed by `std::fs`
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn home_dir(&self) -> Option<PathBuf> {
        dirs::home_dir()
    }

    fn env_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|value| !value.is_empty())
    }

    fn current_dir(&self) -> std::io::Result<PathBuf> {
        std::env::current_dir()
    }

    fn stat(&self, path: &Path) -> std::io::Result<FileStat> {
        let metadata = std::fs::metadata(path)?;
        Ok(FileStat {
            is_dir: metadata.is_dir(),
            modified: DateTime::<Utc>::from(metadata.modified()?),
        })
    }

    fn read_dir_names(&self, path: &Path) -> std::io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(path)? {
            names.push(entry?.file_name().to_string_lossy().into_owned());
        }
        Ok(names)
    }

    fn read_to_string(&self, path: &Path) -> std::io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &str) -> std::io::Result<()> {
        std::fs::write(path, contents)
    }

    fn create_dir_all(&self, path: &Path) -> std::io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn canonicalize(&self, path: &Path) -> std::io::Result<PathBuf> {
        std::fs::canonicalize(path)
    }

    fn glob(&self, base: &Path, suffix: &str) -> Result<Vec<PathBuf>> {
        let escaped = glob::Pattern::escape(&base.to_string_lossy());
        let full = if escaped.ends_with('/') {
            format!("{escaped}{suffix}")
        } else {
            format!("{escaped}/{suffix}")
        };

        let options = MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            require_literal_leading_dot: true,
        };

        let paths =
            glob::glob_with(&full, options).map_err(|e| PopError::invalid_pattern(&full, e))?;

        Ok(paths
            .filter_map(|entry| match entry {
                Ok(path) => Some(path),
                Err(e) => {
                    log::debug!("Skipping unreadable glob entry: {e}");
                    None
                }
            })
            .collect())
    }
}

/// Source of live session activity
pub trait SessionFeed: Send + Sync {
    /// Currently live sessions. Failures yield an empty map.
    fn activity(&self) -> SessionActivity;
}

/// Reads session activity from the local tmux server
#[derive(Debug, Default, Clone, Copy)]
pub struct TmuxSessionFeed;

impl SessionFeed for TmuxSessionFeed {
    fn activity(&self) -> SessionActivity {
        let output = Command::new("tmux")
            .args(["list-sessions", "-F", "#{session_name} #{session_activity}"])
            .output();

        match output {
            Ok(output) if output.status.success() => {
                parse_session_activity(&String::from_utf8_lossy(&output.stdout))
            }
            Ok(output) => {
                log::debug!("tmux list-sessions exited with {}", output.status);
                SessionActivity::new()
            }
            Err(e) => {
                log::debug!("tmux is not available: {e}");
                SessionActivity::new()
            }
        }
    }
}

/// Parse `"<name> <epoch>"` lines. Unparsable timestamps count as 0.
pub fn parse_session_activity(output: &str) -> SessionActivity {
    output
        .lines()
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            let name = parts.next()?;
            let timestamp = parts.next()?;
            Some((name.to_string(), timestamp.parse().unwrap_or_default()))
        })
        .collect()
}

/// A session feed with a fixed answer. `Default` is "no sessions".
#[derive(Debug, Default, Clone)]
pub struct FixedSessionFeed(pub SessionActivity);

impl SessionFeed for FixedSessionFeed {
    fn activity(&self) -> SessionActivity {
        self.0.clone()
    }
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stuck at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Everything the engine touches outside its own memory
#[derive(Clone)]
pub struct Deps {
    pub fs: Arc<dyn FileSystem>,
    pub sessions: Arc<dyn SessionFeed>,
    pub clock: Arc<dyn Clock>,
}

impl Deps {
    /// Real filesystem, tmux and wall clock
    pub fn real() -> Self {
        Self {
            fs: Arc::new(RealFileSystem),
            sessions: Arc::new(TmuxSessionFeed),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_sessions(mut self, sessions: impl SessionFeed + 'static) -> Self {
        self.sessions = Arc::new(sessions);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Canonical form of `path`, or `path` itself when it cannot be resolved
    pub fn resolve_or_keep(&self, path: &Path) -> PathBuf {
        self.fs
            .canonicalize(path)
            .unwrap_or_else(|_| path.to_path_buf())
    }
}

impl std::fmt::Debug for Deps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Deps").finish_non_exhaustive()
    }
}
