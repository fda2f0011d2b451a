//! Reduction of the candidate union to a clean set of project directories.
//!
//! Candidates that are not (or no longer) directories are dropped, duplicates
//! are collapsed on their canonical path, and any directory that has another
//! surviving directory below it is removed so the more specific one wins.

use crate::core::deps::Deps;
use crate::core::types::ResolvedPath;
use std::collections::HashSet;
use std::path::Path;

/// Filter, dedup and subsumption in one pass over `candidates`
pub fn reduce(deps: &Deps, candidates: Vec<ResolvedPath>) -> Vec<ResolvedPath> {
    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let is_dir = deps
            .fs
            .stat(&candidate.path)
            .map(|stat| stat.is_dir)
            .unwrap_or(false);
        if !is_dir {
            log::debug!("Dropping non-directory {}", candidate.path.display());
            continue;
        }

        if seen.insert(deps.resolve_or_keep(&candidate.path)) {
            unique.push(candidate);
        }
    }

    remove_subsumed(unique)
}

/// Drop every path that is a strict ancestor of another path in the set
pub fn remove_subsumed(paths: Vec<ResolvedPath>) -> Vec<ResolvedPath> {
    let subsumed: Vec<bool> = paths
        .iter()
        .map(|p| paths.iter().any(|q| is_strict_descendant(&q.path, &p.path)))
        .collect();

    paths
        .into_iter()
        .zip(subsumed)
        .filter_map(|(path, subsumed)| (!subsumed).then_some(path))
        .collect()
}

/// `child` lies below `ancestor` on a component boundary
fn is_strict_descendant(child: &Path, ancestor: &Path) -> bool {
    child != ancestor && child.starts_with(ancestor)
}
