//! Core functionality for pop.
//!
//! This module holds the resolution engine (pattern expansion, reduction,
//! worktree fan-out, naming and ranking) together with the config, cache,
//! history and error handling it relies on.

pub mod config;
pub mod deps;
pub mod dirs;
pub mod disambiguate;
pub mod error;
pub mod expander;
pub mod glob_cache;
pub mod history;
pub mod output;
pub mod pipeline;
pub mod ranking;
pub mod reducer;
pub mod sessions;
pub mod types;
pub mod worktrees;

// === Error handling ===
// Core error types and result type used throughout the application
pub use error::{PopError, Result};

// === Dependencies ===
// Filesystem, session feed and clock, threaded through every stage
pub use deps::{Clock, Deps, FileSystem, SessionActivity, SessionFeed};

// === Configuration ===
pub use config::{Config, DisambiguationStrategy, PatternEntry};
pub use dirs::AppPaths;

// === Persisted state ===
pub use glob_cache::{CacheEntry, GlobCache};
pub use history::{History, HistoryEntry};

// === Pipeline stages ===
pub use disambiguate::disambiguate;
pub use expander::PatternExpander;
pub use pipeline::Resolver;
pub use ranking::rank;
pub use reducer::reduce;
pub use sessions::{sanitize_session_name, unify};
pub use worktrees::expand_entries;

// === Data model ===
pub use types::{Destination, NamedEntry, ResolvedPath};

// === Output formatting ===
pub use output::{format_destination, print_error, print_info, print_success, print_warning};
