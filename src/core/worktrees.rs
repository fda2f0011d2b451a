//! Worktree detection and the parallel fan-out over reduced project paths.
//!
//! A project directory laid out as a bare repository with linked worktrees
//! (`.bare/` next to the worktrees, or a `.git/worktrees/` with entries)
//! expands into one entry per worktree. Everything else stays one entry.
//! Detection only looks at the filesystem and never runs git.
//!
//! # Public API
//! - [`has_worktrees`]: is this directory a worktree container
//! - [`list_worktrees`]: the worktree checkouts inside a container
//! - [`expand_entries`]: named entries for every reduced path, probed in parallel

use crate::core::deps::{Deps, FileSystem};
use crate::core::dirs::last_n_segments;
use crate::core::types::{base_name, NamedEntry, ResolvedPath};
use crossbeam_channel::bounded;
use std::path::{Path, PathBuf};
use std::thread;

const BARE_DIR: &str = ".bare";
const GIT_DIR: &str = ".git";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Worktree {
    pub name: String,
    pub path: PathBuf,
}

pub fn has_worktrees(fs: &dyn FileSystem, path: &Path) -> bool {
    if is_dir(fs, &path.join(BARE_DIR)) {
        return true;
    }

    let linked = path.join(GIT_DIR).join("worktrees");
    is_dir(fs, &linked)
        && fs
            .read_dir_names(&linked)
            .map(|names| !names.is_empty())
            .unwrap_or(false)
}

/// Child directories whose `.git` is a file, sorted by name
pub fn list_worktrees(fs: &dyn FileSystem, path: &Path) -> std::io::Result<Vec<Worktree>> {
    let mut names = fs.read_dir_names(path)?;
    names.sort();

    let worktrees = names
        .into_iter()
        .filter(|name| name != BARE_DIR && name != GIT_DIR)
        .map(|name| Worktree {
            path: path.join(&name),
            name,
        })
        .filter(|worktree| is_dir(fs, &worktree.path))
        .filter(|worktree| {
            fs.stat(&worktree.path.join(GIT_DIR))
                .map(|stat| !stat.is_dir)
                .unwrap_or(false)
        })
        .collect();

    Ok(worktrees)
}

/// Probe every path on its own scoped thread and return the entries in the
/// order of `paths`
pub fn expand_entries(deps: &Deps, paths: &[ResolvedPath]) -> Vec<NamedEntry> {
    if paths.is_empty() {
        return Vec::new();
    }

    let (tx, rx) = bounded::<(usize, Vec<NamedEntry>)>(paths.len());

    thread::scope(|scope| {
        let handles: Vec<_> = paths
            .iter()
            .enumerate()
            .map(|(index, resolved)| {
                let tx = tx.clone();
                scope.spawn(move || {
                    let entries = probe(deps, resolved);
                    // receiver outlives every worker
                    let _ = tx.send((index, entries));
                })
            })
            .collect();
        drop(tx);

        for handle in handles {
            if handle.join().is_err() {
                log::warn!("Worktree probe panicked; its entries are skipped");
            }
        }
    });

    let mut by_index: Vec<Vec<NamedEntry>> = vec![Vec::new(); paths.len()];
    for (index, entries) in rx.try_iter() {
        by_index[index] = entries;
    }
    by_index.into_iter().flatten().collect()
}

fn probe(deps: &Deps, resolved: &ResolvedPath) -> Vec<NamedEntry> {
    let display_name = last_n_segments(&resolved.path, resolved.display_depth);
    let project_name = base_name(&resolved.path);
    let fs = deps.fs.as_ref();

    if !has_worktrees(fs, &resolved.path) {
        return vec![NamedEntry {
            name: display_name,
            path: resolved.path.clone(),
            is_worktree: false,
            project_name,
        }];
    }

    match list_worktrees(fs, &resolved.path) {
        Ok(worktrees) => {
            log::debug!(
                "{} holds {} worktrees",
                resolved.path.display(),
                worktrees.len()
            );
            worktrees
                .into_iter()
                .map(|worktree| NamedEntry {
                    name: format!("{display_name}/{}", worktree.name),
                    path: worktree.path,
                    is_worktree: true,
                    project_name: project_name.clone(),
                })
                .collect()
        }
        Err(e) => {
            log::warn!("Cannot list worktrees in {}: {e}", resolved.path.display());
            Vec::new()
        }
    }
}

fn is_dir(fs: &dyn FileSystem, path: &Path) -> bool {
    fs.stat(path).map(|stat| stat.is_dir).unwrap_or(false)
}
