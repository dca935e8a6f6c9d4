//! Catalog and schema types
//!
//! These types serialize to the persisted catalog format:
//! `{"streams": [{"tap_stream_id": ..., "schema": ..., "metadata": [...]}]}`.

use crate::metadata::{Breadcrumb, MetadataEntry, MetadataMap};
use crate::types::ReplicationMethod;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Field Schema
// ============================================================================

/// Schema for a single field: a set of primitive type tags plus an
/// optional format hint
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FieldSchema {
    /// JSON-schema type tags ("string", "integer", "null", ...)
    #[serde(
        rename = "type",
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub types: Vec<String>,

    /// Format hint, e.g. "date-time"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl FieldSchema {
    /// Create a field schema with the given type tags
    pub fn new(types: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            types: types.into_iter().map(Into::into).collect(),
            format: None,
        }
    }

    /// A plain string field
    pub fn string() -> Self {
        Self::new(["string"])
    }

    /// An integer field
    pub fn integer() -> Self {
        Self::new(["integer"])
    }

    /// A date-time formatted string field
    pub fn date_time() -> Self {
        Self::new(["string"]).with_format("date-time")
    }

    /// Set the format hint
    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Add "null" to the allowed types
    pub fn make_nullable(&mut self) {
        if !self.is_nullable() {
            self.types.push("null".to_string());
        }
    }

    /// Check whether null values are allowed
    pub fn is_nullable(&self) -> bool {
        self.types.iter().any(|t| t == "null")
    }

    /// Check whether a type tag is allowed
    pub fn allows(&self, tag: &str) -> bool {
        self.types.iter().any(|t| t == tag)
    }
}

/// Accept both `"type": "string"` and `"type": ["string", "null"]`
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(tag) => vec![tag],
        OneOrMany::Many(tags) => tags,
    })
}

// ============================================================================
// Stream Schema
// ============================================================================

/// JSON-schema-like structure for a stream: field name to field schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamSchema {
    /// Always "object" for record streams
    #[serde(rename = "type", default = "default_schema_type")]
    pub schema_type: String,

    /// Field schemas, ordered by name
    #[serde(default)]
    pub properties: BTreeMap<String, FieldSchema>,
}

fn default_schema_type() -> String {
    "object".to_string()
}

impl Default for StreamSchema {
    fn default() -> Self {
        Self {
            schema_type: default_schema_type(),
            properties: BTreeMap::new(),
        }
    }
}

impl StreamSchema {
    /// Create an empty object schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field schema, returning self for chaining
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, field: FieldSchema) -> Self {
        self.properties.insert(name.into(), field);
        self
    }

    /// Get a field schema
    pub fn get_property(&self, name: &str) -> Option<&FieldSchema> {
        self.properties.get(name)
    }

    /// Check whether a field exists
    pub fn contains(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    /// Iterate over field names
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }
}

// ============================================================================
// Catalog Entry
// ============================================================================

/// One discoverable stream: schema, keys, replication config, metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Unique stream id within the catalog
    #[serde(rename = "tap_stream_id")]
    pub stream_id: String,

    /// Display name (defaults to the stream id)
    pub stream: String,

    /// The stream's schema
    pub schema: StreamSchema,

    /// Primary key fields, in order
    #[serde(default)]
    pub key_properties: Vec<String>,

    /// Field used for incremental bookmarking
    #[serde(default)]
    pub replication_key: Option<String>,

    /// How this stream is replicated
    #[serde(default)]
    pub replication_method: ReplicationMethod,

    /// Fields eligible as replication key
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub valid_replication_keys: Vec<String>,

    /// Breadcrumb-addressed metadata
    #[serde(default)]
    pub metadata: Vec<MetadataEntry>,

    /// Fields whose values form the bookmark, if different from the
    /// replication key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bookmark_properties: Option<Vec<String>>,

    /// Unique constraints declared by the source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_constraints: Option<Vec<String>>,
}

impl CatalogEntry {
    /// Create a minimal entry for a stream
    pub fn new(stream_id: impl Into<String>, schema: StreamSchema) -> Self {
        let stream_id = stream_id.into();
        Self {
            stream: stream_id.clone(),
            stream_id,
            schema,
            key_properties: Vec::new(),
            replication_key: None,
            replication_method: ReplicationMethod::default(),
            valid_replication_keys: Vec::new(),
            metadata: Vec::new(),
            bookmark_properties: None,
            unique_constraints: None,
        }
    }

    /// The stream-level metadata entry, if present
    pub fn stream_metadata(&self) -> Option<&MetadataMap> {
        self.metadata
            .iter()
            .find(|e| e.breadcrumb.is_stream())
            .map(|e| &e.metadata)
    }

    /// Mutable stream-level metadata, created if missing
    ///
    /// Keeps the invariant of exactly one stream-level entry per stream.
    pub fn stream_metadata_mut(&mut self) -> &mut MetadataMap {
        if let Some(pos) = self.metadata.iter().position(|e| e.breadcrumb.is_stream()) {
            return &mut self.metadata[pos].metadata;
        }
        self.metadata.insert(0, MetadataEntry::stream(MetadataMap::default()));
        &mut self.metadata[0].metadata
    }

    /// Metadata for a single field, if present
    pub fn field_metadata(&self, name: &str) -> Option<&MetadataMap> {
        self.metadata
            .iter()
            .find(|e| e.breadcrumb.field_name() == Some(name))
            .map(|e| &e.metadata)
    }

    /// Mutable metadata for a single field, created if missing
    pub fn field_metadata_mut(&mut self, name: &str) -> &mut MetadataMap {
        if let Some(pos) = self
            .metadata
            .iter()
            .position(|e| e.breadcrumb.field_name() == Some(name))
        {
            return &mut self.metadata[pos].metadata;
        }
        self.metadata
            .push(MetadataEntry::field(name, MetadataMap::default()));
        let last = self.metadata.len() - 1;
        &mut self.metadata[last].metadata
    }

    /// Whether the stream is selected for replication
    pub fn is_selected(&self) -> bool {
        self.stream_metadata().is_some_and(MetadataMap::is_selected)
    }

    /// Whether a field should be replicated: automatic fields always,
    /// unsupported fields never, otherwise the selected flag (defaulting
    /// to selected when no metadata says otherwise)
    pub fn is_field_selected(&self, name: &str) -> bool {
        use crate::types::Inclusion;
        match self.field_metadata(name) {
            Some(meta) => match meta.effective_inclusion() {
                Inclusion::Automatic => true,
                Inclusion::Unsupported => false,
                Inclusion::Available => meta.selected.unwrap_or(true),
            },
            None => true,
        }
    }

    /// Breadcrumbs present in metadata but absent from the schema
    pub fn orphaned_metadata(&self) -> Vec<&Breadcrumb> {
        self.metadata
            .iter()
            .filter(|e| {
                e.breadcrumb
                    .field_name()
                    .is_some_and(|name| !self.schema.contains(name))
            })
            .map(|e| &e.breadcrumb)
            .collect()
    }
}
