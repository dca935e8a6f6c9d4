//! Bookmark store module
//!
//! Tracks replication progress per stream and persists it between runs.
//!
//! # Overview
//!
//! The state module provides:
//! - `State` - Nested bookmark structure with offset and version tracking
//! - `StateManager` - File-based state persistence with atomic writes
//!
//! The engine owns the one mutable `State` for a run's duration; the
//! manager only loads the resume point and persists the final state.

mod manager;
mod types;

pub use manager::StateManager;
pub use types::{State, StreamBookmarks};

#[cfg(test)]
mod manager_tests;
