//! Source connector interface
//!
//! A source plugs into the replication engine through the `StreamLoader`
//! trait: the engine depends only on this interface and never on a concrete
//! connector. Everything connector-specific (pagination, auth, backoff)
//! lives behind `load_data`.

mod infer;
mod jsonl;

pub use infer::infer_stream_schema;
pub use jsonl::{JsonlSource, JsonlStreamDef, SourceDefinition};

use crate::error::Result;
use crate::types::{JsonObject, JsonValue, ReplicationMethod};
use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

/// Lazy, consumed-once stream of records from a source
pub type RecordStream = Pin<Box<dyn Stream<Item = Result<JsonValue>> + Send>>;

// ============================================================================
// Load Request
// ============================================================================

/// Everything a loader needs to resume a stream
#[derive(Debug, Clone, Default)]
pub struct LoadRequest {
    /// Stream to load
    pub stream_id: String,

    /// Last known replication-key value, or `None` for a first run
    pub bookmark: Option<JsonValue>,

    /// Name of the field compared against the bookmark
    pub bookmark_column: Option<String>,

    /// Mid-page resumption offsets from the bookmark store
    pub offset: JsonObject,
}

impl LoadRequest {
    /// Create a request with no bookmark (first run)
    pub fn new(stream_id: impl Into<String>) -> Self {
        Self {
            stream_id: stream_id.into(),
            ..Self::default()
        }
    }
}

// ============================================================================
// Stream Loader
// ============================================================================

/// The per-connector data loading interface
///
/// # Contract
///
/// `load_data` must return only records whose replication-key value is
/// strictly greater than `request.bookmark`, in the key's native ordering.
/// Returning records at or below the bookmark produces duplicates
/// downstream. A loader that reports `is_sorted = true` must yield records
/// in non-decreasing replication-key order; violating that silently loses
/// data, because the engine marks progress past records it never saw.
#[async_trait]
pub trait StreamLoader: Send + Sync {
    /// Load records for a stream, resuming from the given bookmark
    async fn load_data(&self, request: &LoadRequest) -> Result<RecordStream>;

    /// Primary key fields for a stream
    fn key_properties(&self, _stream_id: &str) -> Vec<String> {
        Vec::new()
    }

    /// Replication method for a stream
    fn replication_method(&self, _stream_id: &str) -> ReplicationMethod {
        ReplicationMethod::default()
    }

    /// Fields eligible as replication key for a stream
    fn valid_replication_keys(&self, _stream_id: &str) -> Vec<String> {
        Vec::new()
    }

    /// Whether the stream yields records in replication-key order
    fn is_sorted(&self, _stream_id: &str) -> bool {
        false
    }
}
