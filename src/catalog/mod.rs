//! Catalog model
//!
//! The catalog is the declared set of streams, their schemas, and selection
//! state for a source. Insertion order is preserved for output; lookup is by
//! stream id and absence is `None`, never an error.

mod types;

pub use types::{CatalogEntry, FieldSchema, StreamSchema};

use crate::error::{Error, Result};
use crate::metadata::get_standard_metadata;
use crate::source::StreamLoader;
use crate::state::State;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ============================================================================
// Catalog
// ============================================================================

/// The set of discoverable streams
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Stream entries, in discovery order
    pub streams: Vec<CatalogEntry>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from discovered schemas
    ///
    /// Iteration order of `schemas` becomes the catalog's stream order.
    /// Key properties, replication config, and valid replication keys come
    /// from the loader; standard metadata is computed for every stream.
    pub fn discover(
        schemas: impl IntoIterator<Item = (String, StreamSchema)>,
        loader: &dyn StreamLoader,
    ) -> Self {
        let mut catalog = Self::new();

        for (stream_id, schema) in schemas {
            let key_properties = loader.key_properties(&stream_id);
            let replication_method = loader.replication_method(&stream_id);
            let valid_replication_keys = loader.valid_replication_keys(&stream_id);

            let metadata = get_standard_metadata(
                &schema,
                &key_properties,
                Some(replication_method),
                &valid_replication_keys,
            );

            let mut entry = CatalogEntry::new(stream_id, schema);
            entry.replication_key = valid_replication_keys.first().cloned();
            entry.key_properties = key_properties;
            entry.replication_method = replication_method;
            entry.valid_replication_keys = valid_replication_keys;
            entry.metadata = metadata;

            catalog.streams.push(entry);
        }

        catalog
    }

    /// Look up a stream by id
    pub fn get_stream(&self, stream_id: &str) -> Option<&CatalogEntry> {
        self.streams.iter().find(|e| e.stream_id == stream_id)
    }

    /// Look up a stream by id, mutably
    pub fn get_stream_mut(&mut self, stream_id: &str) -> Option<&mut CatalogEntry> {
        self.streams.iter_mut().find(|e| e.stream_id == stream_id)
    }

    /// Add a stream entry, rejecting duplicate ids
    pub fn add_stream(&mut self, entry: CatalogEntry) -> Result<()> {
        if self.get_stream(&entry.stream_id).is_some() {
            return Err(Error::malformed_catalog(format!(
                "duplicate tap_stream_id '{}'",
                entry.stream_id
            )));
        }
        self.streams.push(entry);
        Ok(())
    }

    /// Streams whose stream-level metadata is selected
    ///
    /// If `currently_syncing` is set in state, that stream is moved to the
    /// front so an interrupted stream finishes before others start. The
    /// result is deterministic for a given catalog and state.
    pub fn get_selected_streams<'a>(&'a self, state: &State) -> Vec<&'a CatalogEntry> {
        let mut selected: Vec<&CatalogEntry> =
            self.streams.iter().filter(|e| e.is_selected()).collect();

        if let Some(current) = state.currently_syncing() {
            if let Some(pos) = selected.iter().position(|e| e.stream_id == current) {
                let entry = selected.remove(pos);
                selected.insert(0, entry);
            }
        }

        selected
    }

    // ============================================================================
    // Persistence
    // ============================================================================

    /// Parse a catalog from JSON, verifying structural invariants
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| Error::malformed_catalog(format!("invalid JSON: {e}")))?;
        Self::from_value(value)
    }

    /// Build a catalog from a parsed JSON value
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let streams = value
            .get("streams")
            .and_then(|s| s.as_array())
            .ok_or_else(|| Error::malformed_catalog("missing 'streams' array"))?;

        for (i, stream) in streams.iter().enumerate() {
            if stream.get("tap_stream_id").and_then(|v| v.as_str()).is_none() {
                return Err(Error::malformed_catalog(format!(
                    "stream at index {i} is missing 'tap_stream_id'"
                )));
            }
            if stream.get("schema").is_none() {
                return Err(Error::malformed_catalog(format!(
                    "stream at index {i} is missing 'schema'"
                )));
            }
        }

        let catalog: Catalog = serde_json::from_value(value)
            .map_err(|e| Error::malformed_catalog(e.to_string()))?;

        let mut seen = std::collections::HashSet::new();
        for entry in &catalog.streams {
            if !seen.insert(entry.stream_id.as_str()) {
                return Err(Error::malformed_catalog(format!(
                    "duplicate tap_stream_id '{}'",
                    entry.stream_id
                )));
            }
        }

        Ok(catalog)
    }

    /// Load a catalog from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Persist the catalog to a JSON file
    ///
    /// Writes to a temp file then renames, so a crashed write never leaves
    /// a truncated catalog behind.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let contents = serde_json::to_string_pretty(self)?;
        let temp_path = path.with_extension("tmp");
        std::fs::write(&temp_path, contents)?;
        std::fs::rename(&temp_path, path)?;
        Ok(())
    }
}
