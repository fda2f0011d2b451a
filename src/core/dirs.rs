use crate::core::deps::FileSystem;
use crate::core::error::{PopError, Result};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "pop";

/// Locations of every file the tool reads or writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub config_file: PathBuf,
    pub glob_cache_file: PathBuf,
    pub history_file: PathBuf,
}

impl AppPaths {
    /// XDG locations, falling back to the usual dot-directories under home
    pub fn resolve(fs: &dyn FileSystem) -> Result<Self> {
        Ok(Self {
            config_file: xdg_dir(fs, "XDG_CONFIG_HOME", ".config")?
                .join(APP_DIR)
                .join("config.json"),
            glob_cache_file: xdg_dir(fs, "XDG_CACHE_HOME", ".cache")?
                .join(APP_DIR)
                .join("glob_cache.json"),
            history_file: xdg_dir(fs, "XDG_DATA_HOME", ".local/share")?
                .join(APP_DIR)
                .join("history.json"),
        })
    }

    pub fn with_config_file(mut self, config_file: impl Into<PathBuf>) -> Self {
        self.config_file = config_file.into();
        self
    }
}

fn xdg_dir(fs: &dyn FileSystem, var: &str, fallback: &str) -> Result<PathBuf> {
    if let Some(dir) = fs.env_var(var) {
        return Ok(PathBuf::from(dir));
    }
    fs.home_dir()
        .map(|home| home.join(fallback))
        .ok_or(PopError::HomeDirectoryNotFound)
}

/// Replace a leading `~/` with the home directory
pub fn expand_home(fs: &dyn FileSystem, path: &str) -> String {
    match (path.strip_prefix("~/"), fs.home_dir()) {
        (Some(rest), Some(home)) => home.join(rest).to_string_lossy().into_owned(),
        _ => path.to_string(),
    }
}

/// The last `n` segments of `path` joined with `/`. `n <= 1` is the base name.
pub fn last_n_segments(path: &Path, n: usize) -> String {
    let segments: Vec<String> = path
        .components()
        .filter_map(|component| match component {
            std::path::Component::Normal(segment) => Some(segment.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    let keep = n.max(1).min(segments.len());
    segments[segments.len() - keep..].join("/")
}
