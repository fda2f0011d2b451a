//! Unique display names for entries that would otherwise collide.
//!
//! Entries sharing a name are told apart by the directories above them. Each
//! member of a colliding group gets the list of its parent segments, innermost
//! first; the strategy then decides how much of that list ends up in the name.
//!
//! With [`DisambiguationStrategy::FirstUniqueSegment`], `/work/frontend/app`
//! and `/work/backend/app` become `app (frontend)` and `app (backend)`. Members
//! that no single level can separate get a compound suffix such as
//! `app (a/c)`. With [`DisambiguationStrategy::FullPath`] the same group
//! becomes `frontend/app` and `backend/app`, every member growing by whole
//! segments until the group is unique.
//!
//! Each level is computed from scratch from the group and the still
//! unresolved members, so no counters are carried from one level to the next.

use crate::core::config::DisambiguationStrategy;
use crate::core::types::NamedEntry;
use std::collections::{HashMap, HashSet};
use std::path::{Component, Path};

/// A colliding entry and the parent segments available to describe it
#[derive(Debug, Clone, PartialEq, Eq)]
struct Member {
    index: usize,
    /// Innermost first: `/a/b/c/d` named `d` yields `["c", "b", "a"]`
    segments: Vec<String>,
}

impl Member {
    fn segment(&self, level: usize) -> Option<&str> {
        self.segments.get(level).map(String::as_str)
    }

    /// Segments `0..=level` in path order, e.g. level 1 of `["c", "b"]` is `b/c`
    fn compound(&self, level: usize) -> String {
        let depth = (level + 1).min(self.segments.len());
        let mut parts: Vec<&str> = self.segments[..depth].iter().map(String::as_str).collect();
        parts.reverse();
        parts.join("/")
    }
}

/// Rewrite colliding names in place
pub fn disambiguate(entries: &mut [NamedEntry], strategy: DisambiguationStrategy) {
    let mut groups: HashMap<String, Vec<usize>> = HashMap::new();
    for (index, entry) in entries.iter().enumerate() {
        groups.entry(entry.name.clone()).or_default().push(index);
    }

    for (name, indices) in groups {
        if indices.len() < 2 {
            continue;
        }

        let members: Vec<Member> = indices
            .into_iter()
            .map(|index| Member {
                index,
                segments: parent_segments(&entries[index].path, &name),
            })
            .collect();

        let renames = match strategy {
            DisambiguationStrategy::FirstUniqueSegment => first_unique_segment(&name, &members),
            DisambiguationStrategy::FullPath => full_path(&name, &members),
        };

        log::debug!(
            "Disambiguated {} of {} entries named {name:?}",
            renames.len(),
            members.len()
        );
        for (index, renamed) in renames {
            entries[index].name = renamed;
        }
    }
}

fn first_unique_segment(name: &str, members: &[Member]) -> Vec<(usize, String)> {
    let max_levels = max_levels(members);
    let mut suffixes = Vec::new();
    let mut unresolved: Vec<&Member> = members.iter().collect();

    for level in 0..max_levels {
        if unresolved.is_empty() {
            break;
        }
        let (resolved, rest) = partition_at_level(&unresolved, level);
        suffixes.extend(
            resolved
                .into_iter()
                .map(|(member, segment)| (member.index, segment.to_string())),
        );
        unresolved = rest;
    }

    if !unresolved.is_empty() {
        suffixes.extend(compound_suffixes(&unresolved, max_levels));
    }

    suffixes
        .into_iter()
        .map(|(index, suffix)| (index, format!("{name} ({suffix})")))
        .collect()
}

/// Members whose segment at `level` is unique among `unresolved`, and the rest
fn partition_at_level<'m>(
    unresolved: &[&'m Member],
    level: usize,
) -> (Vec<(&'m Member, &'m str)>, Vec<&'m Member>) {
    let counts = segment_counts(unresolved, level);
    let mut resolved = Vec::new();
    let mut rest = Vec::new();

    for &member in unresolved {
        match member.segment(level) {
            Some(segment) if counts.get(segment) == Some(&1) => resolved.push((member, segment)),
            _ => rest.push(member),
        }
    }

    (resolved, rest)
}

fn segment_counts<'m>(members: &[&'m Member], level: usize) -> HashMap<&'m str, usize> {
    let mut counts = HashMap::new();
    for segment in members.iter().filter_map(|member| member.segment(level)) {
        *counts.entry(segment).or_insert(0) += 1;
    }
    counts
}

/// Grow compound suffixes level by level until they are pairwise unique or
/// every member has run out of segments.
fn compound_suffixes(unresolved: &[&Member], max_levels: usize) -> Vec<(usize, String)> {
    let mut chosen = None;
    for level in 0..max_levels {
        if unresolved.iter().all(|member| member.segments.len() <= level) {
            break;
        }
        chosen = Some(level);
        let compounds: Vec<String> = unresolved.iter().map(|m| m.compound(level)).collect();
        if all_unique(&compounds) {
            break;
        }
    }

    let Some(level) = chosen else {
        return Vec::new();
    };
    unresolved
        .iter()
        .map(|member| (member.index, member.compound(level)))
        .filter(|(_, compound)| !compound.is_empty())
        .collect()
}

/// Prefix every member with its parent segments until the group is unique.
///
/// Only the colliding group is considered: a grown name may still equal an
/// unrelated entry that already carried that multi-segment name.
fn full_path(name: &str, members: &[Member]) -> Vec<(usize, String)> {
    let max_levels = max_levels(members);

    for level in 0..max_levels {
        let names: Vec<String> = members
            .iter()
            .map(|member| match member.compound(level).as_str() {
                "" => name.to_string(),
                prefix => format!("{prefix}/{name}"),
            })
            .collect();

        if all_unique(&names) || level + 1 == max_levels {
            return members.iter().map(|m| m.index).zip(names).collect();
        }
    }

    Vec::new()
}

fn max_levels(members: &[Member]) -> usize {
    members
        .iter()
        .map(|member| member.segments.len())
        .max()
        .unwrap_or(0)
}

fn all_unique(values: &[String]) -> bool {
    let mut seen = HashSet::with_capacity(values.len());
    values.iter().all(|value| seen.insert(value))
}

/// Segments of the directory above the named part of `path`, innermost first.
///
/// A name with `k` slash-separated parts covers the last `k` segments of the
/// path, so `/a/b/proj/main` named `proj/main` yields `["b", "a"]`.
fn parent_segments(path: &Path, name: &str) -> Vec<String> {
    let name_segments = name.split('/').count();
    let Some(parent) = path.ancestors().nth(name_segments) else {
        return Vec::new();
    };

    let mut segments: Vec<String> = parent
        .components()
        .filter_map(|component| match component {
            Component::Normal(segment) => Some(segment.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    segments.reverse();
    segments
}
