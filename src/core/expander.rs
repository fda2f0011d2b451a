//! Expansion of one configured pattern into candidate directories.
//!
//! Exact paths are resolved through symlinks and returned as-is. Patterns
//! with `*` are split into a literal base directory and a wildcard suffix,
//! then answered from the [`GlobCache`] or globbed under the resolved base.
//! Recursive `**` patterns and invalid globs are skipped, never fatal.

use crate::core::config::PatternEntry;
use crate::core::deps::Deps;
use crate::core::dirs::expand_home;
use crate::core::error::{PopError, Result};
use crate::core::glob_cache::GlobCache;
use crate::core::types::ResolvedPath;
use std::path::{Path, PathBuf};

const GLOB_META: [char; 3] = ['*', '?', '['];

pub struct PatternExpander<'a> {
    deps: &'a Deps,
    cache: &'a mut GlobCache,
}

impl<'a> PatternExpander<'a> {
    pub fn new(deps: &'a Deps, cache: &'a mut GlobCache) -> Self {
        Self { deps, cache }
    }

    /// Candidate paths for `entry`, each stamped with its display depth
    pub fn expand(&mut self, entry: &PatternEntry) -> Vec<ResolvedPath> {
        let expanded = expand_home(self.deps.fs.as_ref(), &entry.pattern);
        let display_depth = entry.display_depth();

        if expanded.contains("**") {
            log::warn!("Skipping pattern: {}", PopError::recursive_glob(&entry.pattern));
            return Vec::new();
        }

        if !expanded.contains('*') {
            let resolved = self.deps.resolve_or_keep(Path::new(&expanded));
            return vec![ResolvedPath::new(resolved, display_depth)];
        }

        let matches = match self.cache.lookup(self.deps.fs.as_ref(), &expanded) {
            Some(matches) => matches.to_vec(),
            None => match self.glob_and_store(&expanded) {
                Ok(matches) => matches,
                Err(e) => {
                    log::warn!("Skipping pattern: {e}");
                    self.cache.remove(&expanded);
                    return Vec::new();
                }
            },
        };

        matches
            .into_iter()
            .map(|path| ResolvedPath::new(path, display_depth))
            .collect()
    }

    fn glob_and_store(&mut self, pattern: &str) -> Result<Vec<String>> {
        let (base, suffix) = split_pattern(pattern);

        // resolve the base once, not every match
        let resolved_base = self.deps.resolve_or_keep(&base);
        let matches: Vec<String> = self
            .deps
            .fs
            .glob(&resolved_base, &suffix)?
            .into_iter()
            .map(|path| path.to_string_lossy().into_owned())
            .collect();

        log::debug!("Globbed {pattern}: {} matches", matches.len());
        self.cache.store(
            self.deps.fs.as_ref(),
            pattern,
            matches.clone(),
            &resolved_base,
            &suffix,
        );
        Ok(matches)
    }
}

/// Split a pattern into its literal base directory and the wildcard suffix
/// starting at the first segment holding a glob metacharacter.
pub fn split_pattern(pattern: &str) -> (PathBuf, String) {
    let segments: Vec<&str> = pattern.split('/').collect();
    let first_glob = segments
        .iter()
        .position(|segment| segment.contains(GLOB_META))
        .unwrap_or(segments.len());

    let base = segments[..first_glob].join("/");
    let base = match (base.is_empty(), pattern.starts_with('/')) {
        (true, true) => PathBuf::from("/"),
        (true, false) => PathBuf::from("."),
        (false, _) => PathBuf::from(base),
    };

    (base, segments[first_glob..].join("/"))
}
