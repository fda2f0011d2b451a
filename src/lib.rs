//! pop - project resolution engine for a tmux project picker.
//!
//! Turns a list of configured path patterns into an ordered list of
//! uniquely named destinations: project directories, their git worktrees and
//! live tmux sessions, ranked by how recently each was used.
//!
//! # Public API
//! The main public interface is re-exported from the [`core`] module, which provides:
//! - The [`Resolver`] pipeline and its individual stages
//! - The persisted glob cache and access history
//! - Config loading and default file locations
//! - Error handling and result types

pub mod commands;
pub mod core;

// Re-export the core public API for external users
pub use crate::core::{
    AppPaths,
    Config,
    // Dependencies
    Deps,
    // Data model
    Destination,
    DisambiguationStrategy,
    // Persisted state
    GlobCache,
    History,
    NamedEntry,
    PatternEntry,
    // Error handling
    PopError,
    ResolvedPath,
    // Pipeline
    Resolver,
    Result,
};
