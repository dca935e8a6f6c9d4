//! Replication messages
//!
//! The serialization boundary between the engine and a downstream consumer:
//! newline-delimited JSON, one message object per line, tagged by `type`.
//!
//! Ordering invariant: a `SCHEMA` message for a stream is emitted before any
//! `RECORD` for that stream in the same run; the engine enforces this, the
//! writer just flushes one complete line per call.

mod writer;

pub use writer::{CaptureWriter, JsonLinesWriter, MessageWriter};

use crate::catalog::StreamSchema;
use crate::state::State;
use crate::types::{JsonValue, ReplicationMethod};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A message on the replication channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Message {
    /// Announces a stream's schema; precedes all records for the stream
    #[serde(rename = "SCHEMA")]
    Schema {
        /// Stream name
        stream: String,
        /// The stream's schema
        schema: StreamSchema,
        /// Primary key fields
        key_properties: Vec<String>,
        /// Fields whose values form the bookmark
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bookmark_properties: Option<Vec<String>>,
        /// Replication method in effect
        #[serde(default, skip_serializing_if = "Option::is_none")]
        replication_method: Option<ReplicationMethod>,
    },

    /// One replicated record
    #[serde(rename = "RECORD")]
    Record {
        /// Stream name
        stream: String,
        /// The record data
        record: JsonValue,
        /// When the record was extracted from the source
        #[serde(default, skip_serializing_if = "Option::is_none")]
        time_extracted: Option<DateTime<Utc>>,
    },

    /// The complete bookmark state; the last one seen is the resume point
    #[serde(rename = "STATE")]
    State {
        /// The entire current state
        value: State,
    },

    /// Activates a full-table version for atomic cutover downstream
    #[serde(rename = "ACTIVATE_VERSION")]
    ActivateVersion {
        /// Stream name
        stream: String,
        /// The version being activated
        version: i64,
    },
}

impl Message {
    /// The stream a message belongs to (STATE messages carry none)
    pub fn stream(&self) -> Option<&str> {
        match self {
            Message::Schema { stream, .. }
            | Message::Record { stream, .. }
            | Message::ActivateVersion { stream, .. } => Some(stream),
            Message::State { .. } => None,
        }
    }

    /// Check if this is a record message
    pub fn is_record(&self) -> bool {
        matches!(self, Self::Record { .. })
    }

    /// Check if this is a state message
    pub fn is_state(&self) -> bool {
        matches!(self, Self::State { .. })
    }

    /// Check if this is a schema message
    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Schema { .. })
    }
}

#[cfg(test)]
mod tests;
