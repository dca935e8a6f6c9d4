//! Metadata types for catalog entries
//!
//! Each catalog entry carries a list of metadata entries addressed by
//! breadcrumb: the empty breadcrumb is the stream level, and
//! `("properties", field)` addresses a single field.

use crate::types::{Inclusion, JsonObject, ReplicationMethod};
use serde::{Deserialize, Serialize};

// ============================================================================
// Breadcrumb
// ============================================================================

/// Path into a stream schema addressed by a metadata entry
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Breadcrumb(pub Vec<String>);

impl Breadcrumb {
    /// The stream-level breadcrumb (empty path)
    pub fn stream() -> Self {
        Self(Vec::new())
    }

    /// Breadcrumb for a single field: `("properties", name)`
    pub fn field(name: impl Into<String>) -> Self {
        Self(vec!["properties".to_string(), name.into()])
    }

    /// Check if this is the stream-level breadcrumb
    pub fn is_stream(&self) -> bool {
        self.0.is_empty()
    }

    /// Field name, if this breadcrumb addresses a field
    pub fn field_name(&self) -> Option<&str> {
        match self.0.as_slice() {
            [first, name] if first == "properties" => Some(name),
            _ => None,
        }
    }
}

// ============================================================================
// Metadata Map
// ============================================================================

/// The metadata attached to one breadcrumb
///
/// Unknown keys round-trip through `extra` so merging user catalogs never
/// loses information the toolkit does not model.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MetadataMap {
    /// Field classification (stream-level entries leave this unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inclusion: Option<Inclusion>,

    /// Whether the stream or field is selected for replication
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<bool>,

    /// Primary key fields, stream level only
    #[serde(
        rename = "table-key-properties",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub table_key_properties: Option<Vec<String>>,

    /// Replication method forced by the source, stream level only
    #[serde(
        rename = "forced-replication-method",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub forced_replication_method: Option<ReplicationMethod>,

    /// Fields eligible as replication key, stream level only
    #[serde(
        rename = "valid-replication-keys",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub valid_replication_keys: Option<Vec<String>>,

    /// Anything else present in the source catalog
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl MetadataMap {
    /// Effective selection, defaulting unset to false
    pub fn is_selected(&self) -> bool {
        self.selected.unwrap_or(false)
    }

    /// Effective inclusion, defaulting unset to `available`
    pub fn effective_inclusion(&self) -> Inclusion {
        self.inclusion.unwrap_or_default()
    }
}

// ============================================================================
// Metadata Entry
// ============================================================================

/// One breadcrumb-addressed metadata record
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MetadataEntry {
    /// Path into the schema (empty = stream level)
    pub breadcrumb: Breadcrumb,

    /// The metadata at that path
    pub metadata: MetadataMap,
}

impl MetadataEntry {
    /// Create a stream-level entry
    pub fn stream(metadata: MetadataMap) -> Self {
        Self {
            breadcrumb: Breadcrumb::stream(),
            metadata,
        }
    }

    /// Create a field-level entry
    pub fn field(name: impl Into<String>, metadata: MetadataMap) -> Self {
        Self {
            breadcrumb: Breadcrumb::field(name),
            metadata,
        }
    }
}
