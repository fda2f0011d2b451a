//! Common assertion helpers for test output validation

#![allow(dead_code)]

use predicates::prelude::*;

/// Error output from the `✕ Error:` formatter
pub fn is_error(message: &str) -> impl Predicate<str> {
    predicates::str::contains("✕ Error:").and(predicates::str::contains(message.to_string()))
}

pub fn no_projects_found() -> impl Predicate<str> {
    predicates::str::contains("No projects found")
}

pub fn config_not_found() -> impl Predicate<str> {
    predicates::str::contains("Config file does not exist")
}

/// Names from `pop list --json` output, in list order
pub fn json_names(stdout: &[u8]) -> anyhow::Result<Vec<String>> {
    let records: Vec<serde_json::Value> = serde_json::from_slice(stdout)?;
    Ok(records
        .iter()
        .filter_map(|record| record["name"].as_str().map(str::to_string))
        .collect())
}
