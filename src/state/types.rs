//! Bookmark state types
//!
//! These types serialize to the persisted state format:
//! `{"bookmarks": {"<stream>": {"<key>": <value>, "offset": {...},
//! "version": <int>}}, "currently_syncing": "<stream>" | null}`.
//!
//! All accessors follow the "absence means start from scratch" contract:
//! missing streams or keys return `None`/empty, never an error.

use crate::types::{JsonObject, JsonValue};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Complete replication state across streams
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct State {
    /// Per-stream bookmarks
    #[serde(default)]
    pub bookmarks: HashMap<String, StreamBookmarks>,

    /// Stream interrupted mid-sync, if any
    #[serde(default)]
    pub currently_syncing: Option<String>,
}

impl State {
    /// Create a new empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a bookmark value for a stream
    pub fn get_bookmark(&self, stream: &str, key: &str) -> Option<&JsonValue> {
        self.bookmarks.get(stream)?.values.get(key)
    }

    /// Write a bookmark value for a stream
    pub fn write_bookmark(&mut self, stream: &str, key: &str, value: JsonValue) {
        self.stream_mut(stream).values.insert(key.to_string(), value);
    }

    /// Get the offset sub-map for a stream (empty if absent)
    pub fn get_offset(&self, stream: &str) -> JsonObject {
        self.bookmarks
            .get(stream)
            .map(|b| b.offset.clone())
            .unwrap_or_default()
    }

    /// Set one offset key for a stream
    pub fn set_offset(&mut self, stream: &str, key: &str, value: JsonValue) {
        self.stream_mut(stream).offset.insert(key.to_string(), value);
    }

    /// Clear the offset sub-map for a stream
    pub fn clear_offset(&mut self, stream: &str) {
        if let Some(bookmarks) = self.bookmarks.get_mut(stream) {
            bookmarks.offset.clear();
        }
    }

    /// Get the full-table version for a stream
    pub fn get_version(&self, stream: &str) -> Option<i64> {
        self.bookmarks.get(stream)?.version
    }

    /// Set the full-table version for a stream
    pub fn set_version(&mut self, stream: &str, version: i64) {
        self.stream_mut(stream).version = Some(version);
    }

    /// The stream interrupted mid-sync, if any
    pub fn currently_syncing(&self) -> Option<&str> {
        self.currently_syncing.as_deref()
    }

    /// Mark a stream as currently syncing (or clear with `None`)
    pub fn set_currently_syncing(&mut self, stream: Option<&str>) {
        self.currently_syncing = stream.map(String::from);
    }

    /// Get or create the bookmarks for a stream
    fn stream_mut(&mut self, stream: &str) -> &mut StreamBookmarks {
        self.bookmarks.entry(stream.to_string()).or_default()
    }
}

/// Bookmarks for a single stream
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamBookmarks {
    /// Mid-page resumption offsets for paginated sources
    #[serde(default, skip_serializing_if = "JsonObject::is_empty")]
    pub offset: JsonObject,

    /// Table version for full-table atomic cutover
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,

    /// Replication-key values, keyed by replication key name
    #[serde(flatten)]
    pub values: JsonObject,
}
