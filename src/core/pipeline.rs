//! End-to-end resolution from configured patterns to picker records.
//!
//! [`Resolver`] handles the setup every command shares (locating files and
//! loading the config) and then runs the stages in order:
//!
//! 1. **Expansion**: every pattern through the [`PatternExpander`], backed by
//!    the persisted [`GlobCache`]
//! 2. **Reduction**: filter, dedup and subsumption
//! 3. **Worktree fan-out**: containers expand into their worktrees
//! 4. **Naming**: optional current-directory exclusion, then disambiguation
//! 5. **Ranking**: live sessions merged in, everything ordered by recency
//!
//! The glob cache is loaded once and written at most once per resolution.
//! History is only read here; commands that change it save it themselves.

use crate::core::config::Config;
use crate::core::deps::{Deps, SessionActivity};
use crate::core::dirs::AppPaths;
use crate::core::disambiguate::disambiguate;
use crate::core::error::{PopError, Result};
use crate::core::expander::PatternExpander;
use crate::core::glob_cache::GlobCache;
use crate::core::history::History;
use crate::core::reducer::reduce;
use crate::core::sessions::unify;
use crate::core::types::{Destination, NamedEntry, ResolvedPath};
use crate::core::worktrees::expand_entries;
use std::path::{Path, PathBuf};

/// Shared state for one run of the resolution pipeline
pub struct Resolver<'a> {
    pub deps: &'a Deps,
    pub paths: AppPaths,
    pub config: Config,
}

impl<'a> Resolver<'a> {
    /// Locate the tool's files and load the config, honoring an explicit
    /// config path when given
    pub fn initialize(deps: &'a Deps, config_file: Option<PathBuf>) -> Result<Self> {
        let mut paths = AppPaths::resolve(deps.fs.as_ref())?;
        if let Some(config_file) = config_file {
            paths = paths.with_config_file(config_file);
        }

        let config = Config::load(deps.fs.as_ref(), &paths.config_file)?;
        log::debug!(
            "Loaded {} patterns from {}",
            config.projects.len(),
            paths.config_file.display()
        );

        Ok(Self {
            deps,
            paths,
            config,
        })
    }

    /// Build a resolver around an already loaded config
    pub fn with_config(deps: &'a Deps, paths: AppPaths, config: Config) -> Self {
        Self {
            deps,
            paths,
            config,
        }
    }

    /// Expanded, reduced project directories in configuration order
    pub fn resolve_paths(&self) -> Vec<ResolvedPath> {
        let fs = self.deps.fs.as_ref();
        let mut cache = GlobCache::load(fs, &self.paths.glob_cache_file);

        let candidates: Vec<ResolvedPath> = {
            let mut expander = PatternExpander::new(self.deps, &mut cache);
            self.config
                .projects
                .iter()
                .flat_map(|entry| expander.expand(entry))
                .collect()
        };
        cache.persist(fs);

        let reduced = reduce(self.deps, candidates);
        log::debug!("Resolved {} project directories", reduced.len());
        reduced
    }

    /// Uniquely named entries for every project and worktree
    pub fn resolve_entries(&self) -> Result<Vec<NamedEntry>> {
        let paths = self.resolve_paths();
        if paths.is_empty() {
            return Err(PopError::no_projects_found(&self.paths.config_file));
        }

        let mut entries = expand_entries(self.deps, &paths);
        if self.config.exclude_current_dir {
            if let Ok(cwd) = self.deps.fs.current_dir() {
                exclude_path(&mut entries, &self.deps.resolve_or_keep(&cwd));
            }
        }

        disambiguate(&mut entries, self.config.strategy());
        Ok(entries)
    }

    /// Picker records, ranked and merged with `live_activity`
    pub fn resolve_destinations(
        &self,
        history: &History,
        live_activity: &SessionActivity,
    ) -> Result<Vec<Destination>> {
        let destinations = self
            .resolve_entries()?
            .into_iter()
            .map(Destination::from)
            .collect();

        Ok(unify(self.deps, destinations, history, live_activity))
    }

    pub fn load_history(&self) -> History {
        History::load(self.deps.fs.as_ref(), &self.paths.history_file)
    }
}

/// Drop the entry sitting exactly at `path`; worktrees below it survive
pub fn exclude_path(entries: &mut Vec<NamedEntry>, path: &Path) {
    entries.retain(|entry| entry.path != path);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::PatternEntry;
    use crate::core::deps::FixedSessionFeed;
    use std::fs;
    use tempfile::TempDir;

    struct Sandbox {
        _temp: TempDir,
        root: PathBuf,
    }

    impl Sandbox {
        fn new(dirs: &[&str]) -> Self {
            let temp = TempDir::new().unwrap();
            let root = temp.path().canonicalize().unwrap();
            for dir in dirs {
                fs::create_dir_all(root.join(dir)).unwrap();
            }
            Self { _temp: temp, root }
        }

        fn paths(&self) -> AppPaths {
            AppPaths {
                config_file: self.root.join("config/config.json"),
                glob_cache_file: self.root.join("cache/glob_cache.json"),
                history_file: self.root.join("data/history.json"),
            }
        }

        fn pattern(&self, suffix: &str) -> PatternEntry {
            PatternEntry::new(format!("{}/{suffix}", self.root.display()))
        }
    }

    fn config(projects: Vec<PatternEntry>) -> Config {
        Config {
            projects,
            ..Config::default()
        }
    }

    fn names(destinations: &[Destination]) -> Vec<&str> {
        destinations.iter().map(|d| d.name.as_str()).collect()
    }

    #[test]
    fn test_resolves_and_disambiguates_projects() {
        let sandbox = Sandbox::new(&["work/api", "work/web", "personal/api"]);
        let deps = Deps::real();
        let resolver = Resolver::with_config(
            &deps,
            sandbox.paths(),
            config(vec![sandbox.pattern("*/*")]),
        );

        let destinations = resolver
            .resolve_destinations(&History::default(), &SessionActivity::new())
            .unwrap();

        assert_eq!(
            names(&destinations),
            vec!["api (personal)", "api (work)", "web"]
        );
        assert!(sandbox.root.join("cache/glob_cache.json").exists());
    }

    #[test]
    fn test_more_specific_pattern_wins() {
        let sandbox = Sandbox::new(&["mono/services/auth", "mono/services/billing"]);
        let deps = Deps::real();
        let resolver = Resolver::with_config(
            &deps,
            sandbox.paths(),
            config(vec![
                sandbox.pattern("mono"),
                sandbox.pattern("mono/services/*"),
            ]),
        );

        let paths: Vec<PathBuf> = resolver
            .resolve_paths()
            .into_iter()
            .map(|r| r.path)
            .collect();
        assert_eq!(
            paths,
            vec![
                sandbox.root.join("mono/services/auth"),
                sandbox.root.join("mono/services/billing"),
            ]
        );
    }

    #[test]
    fn test_no_projects_is_an_error() {
        let sandbox = Sandbox::new(&[]);
        let deps = Deps::real();
        let resolver =
            Resolver::with_config(&deps, sandbox.paths(), config(vec![sandbox.pattern("*")]));

        let err = resolver.resolve_entries().unwrap_err();
        assert!(matches!(err, PopError::NoProjectsFound { .. }));
    }

    #[test]
    fn test_sessions_are_merged() {
        let sandbox = Sandbox::new(&["projects/app"]);
        let mut live = SessionActivity::new();
        live.insert("app".to_string(), 10);
        live.insert("scratch".to_string(), 5);
        let deps = Deps::real().with_sessions(FixedSessionFeed(live));
        let resolver = Resolver::with_config(
            &deps,
            sandbox.paths(),
            config(vec![sandbox.pattern("projects/*")]),
        );

        let destinations = resolver
            .resolve_destinations(&History::default(), &deps.sessions.activity())
            .unwrap();

        // app has no history so it sorts before the timed standalone session
        assert_eq!(names(&destinations), vec!["app", "scratch"]);
        assert!(destinations[0].has_active_session);
        assert!(destinations[1].is_standalone_session());
    }

    #[test]
    fn test_exclude_path_keeps_worktrees_below() {
        let mut entries = vec![
            NamedEntry::project("repo", "/p/repo"),
            NamedEntry::project("repo/main", "/p/repo/main"),
        ];
        exclude_path(&mut entries, Path::new("/p/repo"));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, PathBuf::from("/p/repo/main"));
    }

    #[test]
    fn test_initialize_reads_config_file() {
        let sandbox = Sandbox::new(&["cfg", "code/one"]);
        let config_file = sandbox.root.join("cfg/config.json");
        fs::write(
            &config_file,
            format!(
                r#"{{"projects": [{{"path": "{}/code/*"}}]}}"#,
                sandbox.root.display()
            ),
        )
        .unwrap();

        let deps = Deps::real();
        let resolver = Resolver::initialize(&deps, Some(config_file.clone())).unwrap();
        assert_eq!(resolver.paths.config_file, config_file);
        assert_eq!(resolver.config.projects.len(), 1);
    }
}
