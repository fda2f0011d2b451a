//! Merging live sessions into the destination list.
//!
//! Directory entries whose session identifier is live are tagged, live
//! sessions with no configured directory are appended as standalone entries,
//! and the whole list is re-ranked on one timeline.

use crate::core::deps::{Deps, SessionActivity};
use crate::core::history::History;
use crate::core::ranking;
use crate::core::types::Destination;
use std::collections::HashSet;

/// Session identifier for a display name; `.` and `:` are not allowed in tmux
/// session names
pub fn sanitize_session_name(name: &str) -> String {
    name.replace(['.', ':'], "_")
}

pub fn unify(
    deps: &Deps,
    destinations: Vec<Destination>,
    history: &History,
    live_activity: &SessionActivity,
) -> Vec<Destination> {
    let configured: HashSet<String> = destinations
        .iter()
        .map(|destination| sanitize_session_name(&destination.name))
        .collect();

    let mut unified: Vec<Destination> = destinations
        .into_iter()
        .map(|mut destination| {
            destination.has_active_session =
                live_activity.contains_key(&sanitize_session_name(&destination.name));
            destination
        })
        .collect();

    let mut standalone: Vec<&String> = live_activity
        .keys()
        .filter(|session| !configured.contains(*session))
        .collect();
    standalone.sort();
    log::debug!(
        "{} live sessions, {} standalone",
        live_activity.len(),
        standalone.len()
    );
    unified.extend(
        standalone
            .into_iter()
            .map(|session| Destination::standalone_session(session)),
    );

    ranking::rank(deps, unified, history, live_activity)
}
