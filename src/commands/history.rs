use crate::core::{
    deps::Deps,
    dirs::AppPaths,
    error::Result,
    history::History,
    output::{print_info, print_success},
};
use std::path::{Path, PathBuf};

/// Mark `path` as just visited. Silent on success so pickers can call it
/// after every selection.
pub fn execute_record(deps: &Deps, path: &Path) -> Result<()> {
    let paths = AppPaths::resolve(deps.fs.as_ref())?;
    let mut history = History::load(deps.fs.as_ref(), &paths.history_file);

    history.record(deps, &absolute(deps, path)?);
    history.save(deps.fs.as_ref())
}

/// Forget `path` so it drops back among the unvisited entries
pub fn execute_reset(deps: &Deps, path: &Path) -> Result<()> {
    let paths = AppPaths::resolve(deps.fs.as_ref())?;
    let mut history = History::load(deps.fs.as_ref(), &paths.history_file);

    let path = absolute(deps, path)?;
    if history.remove(deps, &path) {
        history.save(deps.fs.as_ref())?;
        print_success(&format!("Removed {} from history", path.display()));
    } else {
        print_info(&format!("{} is not in history", path.display()));
    }

    Ok(())
}

fn absolute(deps: &Deps, path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    Ok(deps.fs.current_dir()?.join(path))
}
