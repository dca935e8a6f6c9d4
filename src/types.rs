//! Common types used throughout replikit
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// Replication Method
// ============================================================================

/// How a stream is replicated between runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReplicationMethod {
    /// Re-replicate the entire dataset each run
    #[default]
    FullTable,
    /// Replicate only records newer than the last bookmark
    Incremental,
}

impl ReplicationMethod {
    /// Parse a replication method from its wire string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "FULL_TABLE" => Some(Self::FullTable),
            "INCREMENTAL" => Some(Self::Incremental),
            _ => None,
        }
    }

    /// Wire representation of the method
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FullTable => "FULL_TABLE",
            Self::Incremental => "INCREMENTAL",
        }
    }
}

// ============================================================================
// Inclusion
// ============================================================================

/// Per-field classification controlling whether a field can be (de)selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Inclusion {
    /// Always replicated; key properties and replication keys
    Automatic,
    /// User may select or deselect
    #[default]
    Available,
    /// Cannot be replicated; never selectable
    Unsupported,
}

// ============================================================================
// Invalid Record Policy
// ============================================================================

/// What to do when a record fails schema validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidRecordPolicy {
    /// Raise and terminate the stream's sync
    #[default]
    Abort,
    /// Log and continue with the next record
    Skip,
}

// ============================================================================
// Bookmark Ordering
// ============================================================================

/// Compare two bookmark values in their native ordering
///
/// Numbers compare numerically, strings lexicographically (which is correct
/// for ISO-8601 timestamps). Mixed or non-orderable kinds return `None` and
/// the caller decides; the engine treats `None` as "not greater".
pub fn compare_bookmarks(a: &JsonValue, b: &JsonValue) -> Option<Ordering> {
    match (a, b) {
        (JsonValue::Number(x), JsonValue::Number(y)) => {
            x.as_f64().and_then(|xf| y.as_f64().and_then(|yf| xf.partial_cmp(&yf)))
        }
        (JsonValue::String(x), JsonValue::String(y)) => Some(x.cmp(y)),
        (JsonValue::Bool(x), JsonValue::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}
