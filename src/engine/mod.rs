//! Replication engine
//!
//! Drives a sync run: for each selected stream, emit SCHEMA, pull records
//! from the loader, emit RECORD messages, and advance bookmarks. Sorted
//! streams checkpoint after every record (subject to the state interval);
//! unsorted streams track the maximum replication-key value in memory and
//! write it once at stream completion, so a mid-stream crash replays the
//! whole stream rather than skipping unseen records.
//!
//! The engine owns the run's single mutable `State`. Durability is the
//! caller's concern: every checkpoint is emitted as a STATE message and the
//! final state is available through [`ReplicationEngine::into_parts`].

mod types;

pub use types::{SyncConfig, SyncStats};

use crate::catalog::{Catalog, CatalogEntry};
use crate::error::{Error, Result};
use crate::messages::MessageWriter;
use crate::source::{LoadRequest, StreamLoader};
use crate::state::State;
use crate::types::{compare_bookmarks, InvalidRecordPolicy, JsonValue, ReplicationMethod};
use crate::validate::validate_record;
use chrono::Utc;
use futures::StreamExt;
use std::cmp::Ordering;

// ============================================================================
// Replication Engine
// ============================================================================

/// Incremental replication engine over a pluggable loader and writer
pub struct ReplicationEngine<W: MessageWriter> {
    writer: W,
    state: State,
    config: SyncConfig,
    stats: SyncStats,
}

impl<W: MessageWriter> ReplicationEngine<W> {
    /// Create an engine with the given writer and starting state
    pub fn new(writer: W, state: State) -> Self {
        Self {
            writer,
            state,
            config: SyncConfig::default(),
            stats: SyncStats::new(),
        }
    }

    /// Replace the default configuration
    #[must_use]
    pub fn with_config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }

    /// The current state
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Statistics accumulated so far
    pub fn stats(&self) -> &SyncStats {
        &self.stats
    }

    /// Consume the engine, returning the writer and final state
    pub fn into_parts(self) -> (W, State) {
        (self.writer, self.state)
    }

    /// Run a full sync over every selected stream
    ///
    /// An interrupted stream (recorded in `currently_syncing`) is resumed
    /// first. Stream configuration is checked up front so a misconfigured
    /// stream fails the run before any SCHEMA is emitted.
    pub async fn sync(&mut self, catalog: &Catalog, loader: &dyn StreamLoader) -> Result<()> {
        let started = std::time::Instant::now();
        let selected: Vec<CatalogEntry> = catalog
            .get_selected_streams(&self.state)
            .into_iter()
            .cloned()
            .collect();

        for entry in &selected {
            validate_stream_config(entry)?;
        }

        tracing::info!(streams = selected.len(), "starting sync run");

        for entry in &selected {
            self.sync_stream(entry, loader).await?;
        }

        self.state.set_currently_syncing(None);
        self.write_state()?;

        self.stats.set_duration(started.elapsed().as_millis() as u64);
        tracing::info!(
            records = self.stats.records_synced,
            skipped = self.stats.records_skipped,
            streams = self.stats.streams_synced,
            "sync run complete"
        );
        Ok(())
    }

    /// Sync a single stream from its bookmark to exhaustion
    async fn sync_stream(&mut self, entry: &CatalogEntry, loader: &dyn StreamLoader) -> Result<()> {
        let stream_id = entry.stream_id.as_str();
        let incremental = entry.replication_method == ReplicationMethod::Incremental;
        let is_sorted = loader.is_sorted(stream_id);

        tracing::info!(
            stream = stream_id,
            method = entry.replication_method.as_str(),
            sorted = is_sorted,
            "syncing stream"
        );

        self.state.set_currently_syncing(Some(stream_id));

        let bookmark_column = entry.replication_key.clone();
        let bookmark_properties: Option<Vec<String>> =
            bookmark_column.as_ref().map(|k| vec![k.clone()]);

        // Schema goes out exactly once, before any record
        self.writer.write_schema(
            stream_id,
            &entry.schema,
            &entry.key_properties,
            bookmark_properties.as_deref(),
            Some(entry.replication_method),
        )?;

        let request = LoadRequest {
            stream_id: stream_id.to_string(),
            bookmark: bookmark_column
                .as_deref()
                .and_then(|k| self.state.get_bookmark(stream_id, k).cloned()),
            bookmark_column: bookmark_column.clone(),
            offset: self.state.get_offset(stream_id),
        };

        let mut records = loader.load_data(&request).await?;
        let mut max_bookmark: Option<JsonValue> = None;
        let mut unflushed = 0usize;

        while let Some(record) = records.next().await {
            let record = record?;

            if let Err(violation) = validate_record(&entry.schema, &record) {
                match self.config.on_invalid_record {
                    InvalidRecordPolicy::Skip => {
                        tracing::warn!(stream = stream_id, %violation, "skipping invalid record");
                        self.stats.add_skipped();
                        continue;
                    }
                    InvalidRecordPolicy::Abort => {
                        return Err(Error::schema_validation(stream_id, violation.to_string()));
                    }
                }
            }

            let bookmark_value = bookmark_column
                .as_deref()
                .and_then(|k| record.get(k).cloned());

            self.writer
                .write_record(stream_id, project_record(entry, record), None)?;
            self.stats.add_record();

            if !incremental {
                continue;
            }
            let Some(value) = bookmark_value else {
                continue;
            };
            let column = bookmark_column.as_deref().unwrap_or_default();

            if is_sorted {
                self.state.write_bookmark(stream_id, column, value);
                unflushed += 1;
                if unflushed >= self.config.state_interval {
                    self.write_state()?;
                    unflushed = 0;
                }
            } else {
                let is_new_max = max_bookmark
                    .as_ref()
                    .is_none_or(|m| compare_bookmarks(&value, m) == Some(Ordering::Greater));
                if is_new_max {
                    max_bookmark = Some(value);
                }
            }
        }

        // Completion: single bookmark write for unsorted streams, version
        // activation for full table, and a final checkpoint
        if let (Some(column), Some(value)) = (bookmark_column.as_deref(), max_bookmark) {
            self.state.write_bookmark(stream_id, column, value);
            unflushed += 1;
        }

        if entry.replication_method == ReplicationMethod::FullTable {
            let version = self
                .state
                .get_version(stream_id)
                .unwrap_or_else(|| Utc::now().timestamp_millis());
            self.state.set_version(stream_id, version);
            self.writer.write_activate_version(stream_id, version)?;
            unflushed += 1;
        }

        if !self.state.get_offset(stream_id).is_empty() {
            self.state.clear_offset(stream_id);
            unflushed += 1;
        }

        if unflushed > 0 {
            self.write_state()?;
        }

        self.stats.add_stream();
        tracing::info!(stream = stream_id, "stream complete");
        Ok(())
    }

    fn write_state(&mut self) -> Result<()> {
        self.writer.write_state(&self.state)?;
        self.stats.add_state_write();
        Ok(())
    }
}

/// Drop fields the catalog does not select for replication
///
/// Key properties and the replication key are `automatic` and always
/// survive; fields without metadata pass through untouched.
fn project_record(entry: &CatalogEntry, record: JsonValue) -> JsonValue {
    match record {
        JsonValue::Object(map) => JsonValue::Object(
            map.into_iter()
                .filter(|(name, _)| entry.is_field_selected(name))
                .collect(),
        ),
        other => other,
    }
}

/// Reject stream configurations that cannot sync
///
/// Runs before any SCHEMA is emitted so a broken catalog never produces
/// partial output.
fn validate_stream_config(entry: &CatalogEntry) -> Result<()> {
    if entry.replication_method == ReplicationMethod::Incremental
        && entry.replication_key.is_none()
    {
        return Err(Error::config(format!(
            "stream '{}' uses INCREMENTAL replication but has no replication key",
            entry.stream_id
        )));
    }
    Ok(())
}
