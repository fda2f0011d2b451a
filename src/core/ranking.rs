//! Recency ordering shared by projects and live sessions.
//!
//! The picker is anchored at the bottom, so the list runs oldest first and
//! the most recently used destination ends up last, closest to the cursor.
//! Never-visited entries come first in name order, then visited entries by
//! access time. Standalone sessions take their time from the live session
//! feed so both sources land on one timeline.

use crate::core::deps::{Deps, SessionActivity};
use crate::core::history::History;
use crate::core::types::{Destination, NamedEntry};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Something the ranker can order
pub trait Rankable {
    fn rank_name(&self) -> &str;
    fn rank_path(&self) -> &Path;

    /// Session name for entries that are a bare session rather than a directory
    fn session_handle(&self) -> Option<&str> {
        None
    }
}

impl Rankable for NamedEntry {
    fn rank_name(&self) -> &str {
        &self.name
    }

    fn rank_path(&self) -> &Path {
        &self.path
    }
}

impl Rankable for Destination {
    fn rank_name(&self) -> &str {
        &self.name
    }

    fn rank_path(&self) -> &Path {
        &self.path
    }

    fn session_handle(&self) -> Option<&str> {
        self.standalone_session_name()
    }
}

/// History access times, addressable by the path as recorded or as resolved
#[derive(Debug, Default)]
pub struct AccessTimes {
    direct: HashMap<PathBuf, DateTime<Utc>>,
    resolved: HashMap<PathBuf, DateTime<Utc>>,
}

impl AccessTimes {
    pub fn from_history(deps: &Deps, history: &History) -> Self {
        let mut times = Self::default();
        for entry in &history.entries {
            times.direct.insert(entry.path.clone(), entry.last_access);
            times
                .resolved
                .insert(deps.resolve_or_keep(&entry.path), entry.last_access);
        }
        times
    }

    /// A direct match wins; otherwise compare after symlink resolution
    pub fn get(&self, deps: &Deps, path: &Path) -> Option<DateTime<Utc>> {
        if let Some(time) = self.direct.get(path) {
            return Some(*time);
        }
        if self.resolved.is_empty() {
            return None;
        }
        self.resolved.get(&deps.resolve_or_keep(path)).copied()
    }
}

/// Stable recency sort of `entries`
pub fn rank<T: Rankable>(
    deps: &Deps,
    entries: Vec<T>,
    history: &History,
    live_activity: &SessionActivity,
) -> Vec<T> {
    let times = AccessTimes::from_history(deps, history);

    let mut keyed: Vec<(Option<DateTime<Utc>>, T)> = entries
        .into_iter()
        .map(|entry| (access_time(deps, &times, live_activity, &entry), entry))
        .collect();

    keyed.sort_by(|(time_a, a), (time_b, b)| compare(*time_a, a, *time_b, b));
    keyed.into_iter().map(|(_, entry)| entry).collect()
}

fn access_time<T: Rankable>(
    deps: &Deps,
    times: &AccessTimes,
    live_activity: &SessionActivity,
    entry: &T,
) -> Option<DateTime<Utc>> {
    if let Some(handle) = entry.session_handle() {
        if let Some(time) = times.direct.get(entry.rank_path()) {
            return Some(*time);
        }
        return live_activity
            .get(handle)
            .and_then(|secs| DateTime::from_timestamp(*secs, 0));
    }
    times.get(deps, entry.rank_path())
}

fn compare<T: Rankable>(
    time_a: Option<DateTime<Utc>>,
    a: &T,
    time_b: Option<DateTime<Utc>>,
    b: &T,
) -> Ordering {
    match (time_a, time_b) {
        (Some(time_a), Some(time_b)) => time_a.cmp(&time_b),
        // unvisited entries surface before any visited one
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => a.rank_name().cmp(b.rank_name()),
    }
}
