//! Persistent, mtime-validated cache of glob expansions.
//!
//! Walking `~/Dev/*/*` on every invocation means listing every directory one
//! level below `~/Dev`. The cache remembers the matches of each pattern along
//! with the modification times of every directory whose listing could change
//! them; if none of those mtimes moved, the stored matches are reused as-is.
//!
//! # Public API
//! - [`GlobCache`]: load-or-default, lookup, store, save-or-ignore
//! - [`CacheEntry`]: one pattern's matches and the directory mtimes guarding them
//! - [`wildcard_depth`] / [`collect_dir_mtimes`]: how the guard set is derived
//!
//! # Failure Policy
//! - **Unreadable, unparsable or other-version files** load as an empty cache
//! - **Write failures** are logged at debug level and otherwise ignored
//! - **Concurrent runs** are not coordinated: the last writer wins

use crate::core::deps::FileSystem;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const CACHE_VERSION: u32 = 1;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Base directory of the pattern after symlink resolution
    pub base_path: String,
    /// Absolute matches, before any directory filtering
    pub matches: Vec<String>,
    /// Every directory whose listing contributes to `matches`
    pub dir_mtimes: BTreeMap<String, DateTime<Utc>>,
}

#[derive(Serialize, Deserialize, Debug)]
struct CacheFile {
    version: u32,
    #[serde(default)]
    entries: BTreeMap<String, CacheEntry>,
}

#[derive(Debug)]
pub struct GlobCache {
    path: PathBuf,
    entries: BTreeMap<String, CacheEntry>,
    modified: bool,
}

impl GlobCache {
    /// An empty cache that will persist to `path`
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: BTreeMap::new(),
            modified: false,
        }
    }

    /// Read the cache file, treating any problem as an empty cache
    pub fn load(fs: &dyn FileSystem, path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let content = match fs.read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                log::debug!("No glob cache at {}: {e}", path.display());
                return Self::empty(path);
            }
        };

        match serde_json::from_str::<CacheFile>(&content) {
            Ok(file) if file.version == CACHE_VERSION => {
                log::debug!("Loaded {} glob cache entries", file.entries.len());
                Self {
                    path,
                    entries: file.entries,
                    modified: false,
                }
            }
            Ok(file) => {
                log::debug!(
                    "Discarding glob cache with version {} (expected {CACHE_VERSION})",
                    file.version
                );
                Self::empty(path)
            }
            Err(e) => {
                log::debug!("Discarding unparsable glob cache {}: {e}", path.display());
                Self::empty(path)
            }
        }
    }

    /// Cached matches for `pattern`, only if the entry is still valid
    pub fn lookup(&self, fs: &dyn FileSystem, pattern: &str) -> Option<&[String]> {
        let entry = self.entries.get(pattern)?;
        if is_entry_valid(fs, entry) {
            log::debug!("Glob cache hit for {pattern}");
            Some(&entry.matches)
        } else {
            log::debug!("Glob cache entry for {pattern} is stale");
            None
        }
    }

    /// Record fresh matches for `pattern`, globbed as `wildcard_suffix` under `resolved_base`.
    ///
    /// An entry whose base directory cannot be stat'ed would have no guard
    /// directories and stay valid forever, so it is dropped instead.
    pub fn store(
        &mut self,
        fs: &dyn FileSystem,
        pattern: &str,
        matches: Vec<String>,
        resolved_base: &Path,
        wildcard_suffix: &str,
    ) {
        let dir_mtimes = collect_dir_mtimes(fs, resolved_base, wildcard_suffix);
        self.modified = true;

        if dir_mtimes.is_empty() {
            log::debug!(
                "Base {} of {pattern} is not accessible, not caching",
                resolved_base.display()
            );
            self.entries.remove(pattern);
            return;
        }

        self.entries.insert(
            pattern.to_string(),
            CacheEntry {
                base_path: resolved_base.to_string_lossy().into_owned(),
                matches,
                dir_mtimes,
            },
        );
    }

    /// Forget `pattern`, e.g. after its expansion failed
    pub fn remove(&mut self, pattern: &str) {
        if self.entries.remove(pattern).is_some() {
            self.modified = true;
        }
    }

    pub fn entry(&self, pattern: &str) -> Option<&CacheEntry> {
        self.entries.get(pattern)
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Write the cache back if anything changed. Failures are ignored.
    pub fn persist(&self, fs: &dyn FileSystem) {
        if !self.modified {
            return;
        }

        if let Some(dir) = self.path.parent() {
            if let Err(e) = fs.create_dir_all(dir) {
                log::debug!("Cannot create glob cache directory {}: {e}", dir.display());
                return;
            }
        }

        let file = CacheFile {
            version: CACHE_VERSION,
            entries: self.entries.clone(),
        };
        let json = match serde_json::to_string_pretty(&file) {
            Ok(json) => json,
            Err(e) => {
                log::debug!("Cannot serialize glob cache: {e}");
                return;
            }
        };

        match fs.write(&self.path, &json) {
            Ok(()) => log::debug!(
                "Saved {} glob cache entries to {}",
                self.entries.len(),
                self.path.display()
            ),
            Err(e) => log::debug!("Cannot write glob cache {}: {e}", self.path.display()),
        }
    }
}

/// An entry is valid while every guard directory exists with its recorded mtime
pub fn is_entry_valid(fs: &dyn FileSystem, entry: &CacheEntry) -> bool {
    entry.dir_mtimes.iter().all(|(dir, cached)| {
        fs.stat(Path::new(dir))
            .map(|stat| stat.modified == *cached)
            .unwrap_or(false)
    })
}

/// Number of segments of `pattern` containing a `*`
pub fn wildcard_depth(pattern: &str) -> usize {
    pattern.split('/').filter(|seg| seg.contains('*')).count()
}

/// Mtimes of `resolved_base` and, for patterns deeper than one wildcard
/// level, of every subdirectory down to `depth - 1` levels below it.
pub fn collect_dir_mtimes(
    fs: &dyn FileSystem,
    resolved_base: &Path,
    wildcard_suffix: &str,
) -> BTreeMap<String, DateTime<Utc>> {
    let mut mtimes = BTreeMap::new();

    if let Ok(stat) = fs.stat(resolved_base) {
        mtimes.insert(resolved_base.to_string_lossy().into_owned(), stat.modified);
    }

    let depth = wildcard_depth(wildcard_suffix);
    if depth > 1 {
        collect_child_dir_mtimes(fs, resolved_base, depth - 1, &mut mtimes);
    }

    mtimes
}

fn collect_child_dir_mtimes(
    fs: &dyn FileSystem,
    dir: &Path,
    remaining_depth: usize,
    mtimes: &mut BTreeMap<String, DateTime<Utc>>,
) {
    if remaining_depth == 0 {
        return;
    }

    let Ok(names) = fs.read_dir_names(dir) else {
        return;
    };

    for name in names {
        let child = dir.join(name);
        // stat follows symlinks: a linked directory's own listing is what matters
        let Ok(stat) = fs.stat(&child) else {
            continue;
        };
        if !stat.is_dir {
            continue;
        }
        mtimes.insert(child.to_string_lossy().into_owned(), stat.modified);

        if remaining_depth > 1 {
            collect_child_dir_mtimes(fs, &child, remaining_depth - 1, mtimes);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::deps::RealFileSystem;
    use std::fs;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn set_mtime(dir: &Path, time: SystemTime) {
        fs::File::open(dir).unwrap().set_modified(time).unwrap();
    }

    fn root(temp: &TempDir) -> PathBuf {
        temp.path().canonicalize().unwrap()
    }

    #[test]
    fn test_wildcard_depth() {
        assert_eq!(wildcard_depth("*"), 1);
        assert_eq!(wildcard_depth("*/*"), 2);
        assert_eq!(wildcard_depth("*/src/*"), 2);
        assert_eq!(wildcard_depth("app-*/x"), 1);
        assert_eq!(wildcard_depth("plain"), 0);
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let temp = TempDir::new().unwrap();
        let cache = GlobCache::load(&RealFileSystem, temp.path().join("glob_cache.json"));
        assert!(cache.entry("anything").is_none());
        assert!(!cache.is_modified());
    }

    #[test]
    fn test_corrupt_and_foreign_versions_load_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("glob_cache.json");

        fs::write(&path, "{ not json").unwrap();
        assert!(GlobCache::load(&RealFileSystem, &path).entry("/p/*").is_none());

        fs::write(
            &path,
            r#"{"version":2,"entries":{"/p/*":{"base_path":"/p","matches":["/p/a"],"dir_mtimes":{}}}}"#,
        )
        .unwrap();
        assert!(GlobCache::load(&RealFileSystem, &path).entry("/p/*").is_none());
    }

    #[test]
    fn test_store_persist_reload_hits_with_identical_matches() {
        let temp = TempDir::new().unwrap();
        let root = root(&temp);
        fs::create_dir_all(root.join("a/x")).unwrap();
        // outside the watched tree, or persisting would bump the base mtime
        let cache_dir = TempDir::new().unwrap();
        let cache_path = cache_dir.path().join("cache").join("glob_cache.json");
        let pattern = format!("{}/*/*", root.display());
        let matches = vec![root.join("a/x").to_string_lossy().into_owned()];

        let mut cache = GlobCache::empty(&cache_path);
        cache.store(&RealFileSystem, &pattern, matches.clone(), &root, "*/*");
        assert!(cache.is_modified());
        cache.persist(&RealFileSystem);

        let reloaded = GlobCache::load(&RealFileSystem, &cache_path);
        assert_eq!(
            reloaded.lookup(&RealFileSystem, &pattern),
            Some(matches.as_slice())
        );
        assert_eq!(reloaded.entry(&pattern), cache.entry(&pattern));
    }

    #[test]
    fn test_mtime_change_invalidates() {
        let temp = TempDir::new().unwrap();
        let root = root(&temp);
        let pattern = format!("{}/*", root.display());

        let mut cache = GlobCache::empty(root.join("glob_cache.json"));
        cache.store(&RealFileSystem, &pattern, Vec::new(), &root, "*");
        assert!(cache.lookup(&RealFileSystem, &pattern).is_some());

        set_mtime(&root, SystemTime::now() + Duration::from_secs(60));
        assert!(cache.lookup(&RealFileSystem, &pattern).is_none());
    }

    #[test]
    fn test_missing_guard_directory_invalidates() {
        let mut dir_mtimes = BTreeMap::new();
        dir_mtimes.insert("/definitely/not/here/pop".to_string(), Utc::now());
        let entry = CacheEntry {
            base_path: "/definitely/not/here".to_string(),
            matches: Vec::new(),
            dir_mtimes,
        };
        assert!(!is_entry_valid(&RealFileSystem, &entry));
    }

    #[test]
    fn test_entry_without_guards_is_valid() {
        let entry = CacheEntry {
            base_path: "/x".to_string(),
            matches: vec!["/x/y".to_string()],
            dir_mtimes: BTreeMap::new(),
        };
        assert!(is_entry_valid(&RealFileSystem, &entry));
    }

    #[test]
    fn test_inaccessible_base_is_not_cached() {
        let temp = TempDir::new().unwrap();
        let missing = root(&temp).join("missing");
        let mut cache = GlobCache::empty(root(&temp).join("glob_cache.json"));

        cache.store(&RealFileSystem, "/missing/*", Vec::new(), &missing, "*");
        assert!(cache.entry("/missing/*").is_none());
    }

    #[test]
    fn test_collect_dir_mtimes_tracks_one_level_for_two_wildcards() {
        let temp = TempDir::new().unwrap();
        let root = root(&temp);
        fs::create_dir_all(root.join("work/app")).unwrap();
        fs::create_dir_all(root.join("personal/app")).unwrap();
        fs::write(root.join("notes.txt"), "not a dir").unwrap();

        let single = collect_dir_mtimes(&RealFileSystem, &root, "*");
        assert_eq!(single.len(), 1);

        let double = collect_dir_mtimes(&RealFileSystem, &root, "*/*");
        let mut tracked: Vec<&String> = double.keys().collect();
        tracked.sort();
        let mut expected = vec![
            root.to_string_lossy().into_owned(),
            root.join("work").to_string_lossy().into_owned(),
            root.join("personal").to_string_lossy().into_owned(),
        ];
        expected.sort();
        assert_eq!(tracked, expected.iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_remove_marks_modified() {
        let temp = TempDir::new().unwrap();
        let root = root(&temp);
        let mut cache = GlobCache::empty(root.join("glob_cache.json"));
        cache.remove("/nothing/*");
        assert!(!cache.is_modified());

        cache.store(&RealFileSystem, "/p/*", Vec::new(), &root, "*");
        cache.persist(&RealFileSystem);

        let mut reloaded = GlobCache::load(&RealFileSystem, root.join("glob_cache.json"));
        assert!(!reloaded.is_modified());
        reloaded.remove("/p/*");
        assert!(reloaded.entry("/p/*").is_none());
        assert!(reloaded.is_modified());
    }

    #[test]
    fn test_persist_skips_unmodified_and_ignores_write_errors() {
        let temp = TempDir::new().unwrap();
        let root = root(&temp);

        let untouched = GlobCache::empty(root.join("glob_cache.json"));
        untouched.persist(&RealFileSystem);
        assert!(!root.join("glob_cache.json").exists());

        // parent "directory" is a regular file, so creating it fails
        fs::write(root.join("blocker"), "").unwrap();
        let mut cache = GlobCache::empty(root.join("blocker").join("glob_cache.json"));
        cache.store(&RealFileSystem, "/p/*", Vec::new(), &root, "*");
        cache.persist(&RealFileSystem);
        assert!(!root.join("blocker").join("glob_cache.json").exists());
    }
}
