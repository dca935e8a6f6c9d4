//! JSONL file source
//!
//! A concrete `StreamLoader` over newline-delimited JSON files, one file per
//! stream. Used by the CLI and as a reference implementation of the loader
//! contract: bookmark filtering happens here, not in the engine.

use super::{LoadRequest, RecordStream, StreamLoader};
use crate::catalog::StreamSchema;
use crate::error::{Error, Result};
use crate::source::infer_stream_schema;
use crate::types::{compare_bookmarks, JsonValue, ReplicationMethod};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::io::BufRead;
use std::path::{Path, PathBuf};

/// How many records to sample per stream during discovery
const DISCOVERY_SAMPLE: usize = 100;

// ============================================================================
// Source Definition
// ============================================================================

/// Definition of a JSONL-backed source, loaded from a JSON file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceDefinition {
    /// Stream definitions
    #[serde(default)]
    pub streams: Vec<JsonlStreamDef>,
}

impl SourceDefinition {
    /// Load a source definition from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

/// One stream backed by a JSONL file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonlStreamDef {
    /// Stream name
    pub name: String,

    /// Path to the newline-delimited JSON file
    pub path: PathBuf,

    /// Primary key fields
    #[serde(default)]
    pub key_properties: Vec<String>,

    /// Field used for incremental bookmarking
    #[serde(default)]
    pub replication_key: Option<String>,

    /// Whether records in the file are ordered by the replication key
    #[serde(default)]
    pub is_sorted: bool,
}

// ============================================================================
// JSONL Source
// ============================================================================

/// `StreamLoader` over a set of JSONL files
pub struct JsonlSource {
    definition: SourceDefinition,
}

impl JsonlSource {
    /// Create a source from a definition
    pub fn new(definition: SourceDefinition) -> Self {
        Self { definition }
    }

    /// Load a source from a definition file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(SourceDefinition::from_file(path)?))
    }

    fn stream_def(&self, stream_id: &str) -> Option<&JsonlStreamDef> {
        self.definition.streams.iter().find(|s| s.name == stream_id)
    }

    /// Discover stream schemas by sampling each file
    ///
    /// Returns `(stream_id, schema)` pairs in definition order, suitable
    /// for `Catalog::discover`.
    pub fn discover_schemas(&self) -> Result<Vec<(String, StreamSchema)>> {
        let mut schemas = Vec::new();

        for stream in &self.definition.streams {
            let file = std::fs::File::open(&stream.path).map_err(|e| {
                Error::connector(
                    &stream.name,
                    format!("cannot open {}: {e}", stream.path.display()),
                )
            })?;

            let mut sample = Vec::new();
            for line in std::io::BufReader::new(file).lines().take(DISCOVERY_SAMPLE) {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                sample.push(serde_json::from_str(&line)?);
            }

            schemas.push((stream.name.clone(), infer_stream_schema(&sample)));
        }

        Ok(schemas)
    }
}

#[async_trait]
impl StreamLoader for JsonlSource {
    async fn load_data(&self, request: &LoadRequest) -> Result<RecordStream> {
        let stream = self
            .stream_def(&request.stream_id)
            .ok_or_else(|| Error::stream_not_found(&request.stream_id))?;

        let file = std::fs::File::open(&stream.path).map_err(|e| {
            Error::connector(
                &request.stream_id,
                format!("cannot open {}: {e}", stream.path.display()),
            )
        })?;

        let stream_id = request.stream_id.clone();
        let bookmark = request.bookmark.clone();
        let bookmark_column = request.bookmark_column.clone();

        // Lazy line-by-line iteration; nothing is buffered whole
        let records = std::io::BufReader::new(file)
            .lines()
            .filter_map(move |line| {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => return Some(Err(Error::Io(e))),
                };
                if line.trim().is_empty() {
                    return None;
                }
                let record: JsonValue = match serde_json::from_str(&line) {
                    Ok(record) => record,
                    Err(e) => {
                        return Some(Err(Error::connector(
                            &stream_id,
                            format!("invalid JSON line: {e}"),
                        )))
                    }
                };

                // Contract: only records strictly greater than the bookmark
                if let (Some(bookmark), Some(column)) = (&bookmark, &bookmark_column) {
                    let keep = record
                        .get(column)
                        .and_then(|value| compare_bookmarks(value, bookmark))
                        == Some(Ordering::Greater);
                    if !keep {
                        return None;
                    }
                }

                Some(Ok(record))
            });

        Ok(Box::pin(futures::stream::iter(records)))
    }

    fn key_properties(&self, stream_id: &str) -> Vec<String> {
        self.stream_def(stream_id)
            .map(|s| s.key_properties.clone())
            .unwrap_or_default()
    }

    fn replication_method(&self, stream_id: &str) -> ReplicationMethod {
        match self.stream_def(stream_id).and_then(|s| s.replication_key.as_ref()) {
            Some(_) => ReplicationMethod::Incremental,
            None => ReplicationMethod::FullTable,
        }
    }

    fn valid_replication_keys(&self, stream_id: &str) -> Vec<String> {
        self.stream_def(stream_id)
            .and_then(|s| s.replication_key.clone())
            .into_iter()
            .collect()
    }

    fn is_sorted(&self, stream_id: &str) -> bool {
        self.stream_def(stream_id).is_some_and(|s| s.is_sorted)
    }
}
