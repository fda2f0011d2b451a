//! Project layouts and history files for predefined scenarios

#![allow(dead_code)]

use super::workspace::{write_file, TestWorkspace};
use std::fs;

/// Scenario: `~/code/<owner>/<project>` with a name shared across owners
pub fn create_owner_layout() -> anyhow::Result<TestWorkspace> {
    let workspace = TestWorkspace::new()?;
    workspace.create_dirs(&["code/work/api", "code/work/web", "code/personal/api"])?;
    workspace.write_patterns(&["~/code/*/*"])?;
    Ok(workspace)
}

/// Make `<home>/<relative>` a bare repository container with linked worktrees
pub fn create_bare_repo(
    workspace: &TestWorkspace,
    relative: &str,
    worktrees: &[&str],
) -> anyhow::Result<()> {
    let repo = workspace.path(relative);
    fs::create_dir_all(repo.join(".bare"))?;
    for worktree in worktrees {
        write_file(
            &repo.join(worktree).join(".git"),
            "gitdir: ../.bare/worktrees/x",
        )?;
    }
    Ok(())
}

/// Write a history file with `(path relative to home, epoch seconds)` entries
pub fn write_history(workspace: &TestWorkspace, entries: &[(&str, i64)]) -> anyhow::Result<()> {
    let entries: Vec<serde_json::Value> = entries
        .iter()
        .map(|(relative, secs)| {
            let time = chrono::DateTime::from_timestamp(*secs, 0)
                .ok_or_else(|| anyhow::anyhow!("bad timestamp {secs}"))?;
            Ok(serde_json::json!({
                "path": workspace.path(relative),
                "last_access": time.to_rfc3339(),
            }))
        })
        .collect::<anyhow::Result<_>>()?;
    write_file(
        &workspace.history_file(),
        &serde_json::json!({ "entries": entries }).to_string(),
    )
}
