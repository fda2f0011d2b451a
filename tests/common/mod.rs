//! Consolidated test utilities for pop
//!
//! This module provides unified testing utilities for integration tests,
//! built around an isolated home directory so runs never touch real config.

pub mod assertions;
pub mod fixtures;
pub mod workspace;
