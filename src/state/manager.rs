//! State manager implementation
//!
//! Provides file-based state persistence with atomic writes. The engine
//! itself only mutates an in-memory `State`; the manager is the caller-side
//! component that loads the resume point before a run and persists progress
//! after it.

use super::types::State;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// State manager for persisting and loading state
#[derive(Debug, Clone)]
pub struct StateManager {
    /// Path to the state file (empty for in-memory mode)
    path: PathBuf,
}

impl StateManager {
    /// Create a state manager backed by the given path
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Create an in-memory state manager (no file persistence)
    pub fn in_memory() -> Self {
        Self {
            path: PathBuf::new(),
        }
    }

    /// Load state from the file, or an empty state if the file is absent
    pub async fn load(&self) -> Result<State> {
        if self.is_in_memory() || !self.path.exists() {
            return Ok(State::new());
        }

        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| Error::state(format!("Failed to read state file: {e}")))?;

        serde_json::from_str(&contents)
            .map_err(|e| Error::state(format!("Failed to parse state file: {e}")))
    }

    /// Parse state from an inline JSON string
    pub fn from_json(json: &str) -> Result<State> {
        serde_json::from_str(json)
            .map_err(|e| Error::state(format!("Failed to parse state JSON: {e}")))
    }

    /// Persist state to the file
    ///
    /// Writes to a temp file first, then renames for atomicity. A no-op in
    /// in-memory mode.
    pub async fn save(&self, state: &State) -> Result<()> {
        if self.is_in_memory() {
            return Ok(());
        }

        let contents = serde_json::to_string_pretty(state)
            .map_err(|e| Error::state(format!("Failed to serialize state: {e}")))?;

        let temp_path = self.path.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents)
            .await
            .map_err(|e| Error::state(format!("Failed to write state file: {e}")))?;

        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| Error::state(format!("Failed to rename state file: {e}")))?;

        Ok(())
    }

    /// Get the state file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if using in-memory mode
    pub fn is_in_memory(&self) -> bool {
        self.path.as_os_str().is_empty()
    }
}
