//! Isolated home and XDG directories for running the binary
//!
//! Every [`TestWorkspace`] owns a temporary directory laid out as a home
//! directory, with `XDG_CONFIG_HOME`, `XDG_CACHE_HOME` and `XDG_DATA_HOME`
//! pointing inside it.

#![allow(dead_code)]

use assert_cmd::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// The TempDir must be kept alive for the duration of the test to prevent
/// cleanup.
pub struct TestWorkspace {
    pub temp_dir: TempDir,
    pub home: PathBuf,
}

impl TestWorkspace {
    pub fn new() -> anyhow::Result<Self> {
        let temp_dir = TempDir::new()?;
        // canonical so expected paths match what the binary prints
        let home = temp_dir.path().canonicalize()?;
        Ok(Self { temp_dir, home })
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.home.join(relative)
    }

    pub fn config_file(&self) -> PathBuf {
        self.path(".config/pop/config.json")
    }

    pub fn glob_cache_file(&self) -> PathBuf {
        self.path(".cache/pop/glob_cache.json")
    }

    pub fn history_file(&self) -> PathBuf {
        self.path(".local/share/pop/history.json")
    }

    /// Create directories relative to the home directory
    pub fn create_dirs(&self, dirs: &[&str]) -> anyhow::Result<()> {
        for dir in dirs {
            fs::create_dir_all(self.path(dir))?;
        }
        Ok(())
    }

    /// Write the main config file
    pub fn write_config(&self, json: &str) -> anyhow::Result<()> {
        write_file(&self.config_file(), json)
    }

    /// Write a config listing `patterns`, each with display depth 1
    pub fn write_patterns(&self, patterns: &[&str]) -> anyhow::Result<()> {
        let projects: Vec<serde_json::Value> = patterns
            .iter()
            .map(|pattern| serde_json::json!({ "path": pattern }))
            .collect();
        self.write_config(&serde_json::json!({ "projects": projects }).to_string())
    }

    /// The binary with HOME and XDG variables pointing into the workspace
    pub fn command(&self) -> anyhow::Result<Command> {
        let mut cmd = Command::cargo_bin("pop")?;
        cmd.env("HOME", &self.home)
            .env("XDG_CONFIG_HOME", self.path(".config"))
            .env("XDG_CACHE_HOME", self.path(".cache"))
            .env("XDG_DATA_HOME", self.path(".local/share"))
            .env_remove("RUST_LOG")
            .current_dir(&self.home);
        Ok(cmd)
    }

    /// `pop list --no-sessions` so tests never depend on a tmux server
    pub fn list_command(&self) -> anyhow::Result<Command> {
        let mut cmd = self.command()?;
        cmd.args(["list", "--no-sessions"]);
        Ok(cmd)
    }
}

pub fn write_file(path: &Path, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(())
}
