//! Metadata and selection resolver
//!
//! Computes standard metadata for discovered schemas and merges user
//! selections into a catalog without losing information already present.
//!
//! # Selection policy
//!
//! - `inclusion == automatic` fields are always selected
//! - `inclusion == unsupported` fields are never selected
//! - everything else is selected unless an explicit column list omits or
//!   deselects it

mod types;

pub use types::{Breadcrumb, MetadataEntry, MetadataMap};

use crate::catalog::{Catalog, CatalogEntry, StreamSchema};
use crate::error::Result;
use crate::types::{Inclusion, ReplicationMethod};
use std::collections::HashSet;
use std::path::Path;

// ============================================================================
// Standard Metadata
// ============================================================================

/// Compute standard metadata for a stream schema
///
/// Produces exactly one stream-level entry and one field-level entry per
/// schema field. Key properties and valid replication keys get
/// `inclusion = automatic`; every other field is `available`.
pub fn get_standard_metadata(
    schema: &StreamSchema,
    key_properties: &[String],
    replication_method: Option<ReplicationMethod>,
    valid_replication_keys: &[String],
) -> Vec<MetadataEntry> {
    let mut stream_meta = MetadataMap::default();
    if !key_properties.is_empty() {
        stream_meta.table_key_properties = Some(key_properties.to_vec());
    }
    if let Some(method) = replication_method {
        stream_meta.forced_replication_method = Some(method);
    }
    if !valid_replication_keys.is_empty() {
        stream_meta.valid_replication_keys = Some(valid_replication_keys.to_vec());
    }

    let mut entries = vec![MetadataEntry::stream(stream_meta)];

    for name in schema.field_names() {
        let inclusion = if key_properties.iter().any(|k| k == name)
            || valid_replication_keys.iter().any(|k| k == name)
        {
            Inclusion::Automatic
        } else {
            Inclusion::Available
        };

        entries.push(MetadataEntry::field(
            name,
            MetadataMap {
                inclusion: Some(inclusion),
                ..MetadataMap::default()
            },
        ));
    }

    entries
}

// ============================================================================
// Schema Merge
// ============================================================================

/// Merge newly discovered columns into an existing catalog entry
///
/// Additive only: columns already present in `existing` keep their schema
/// and metadata untouched. Columns only in `new` are copied in, along with
/// their field-level metadata, and default to `selected = true` so schema
/// evolution never silently drops newly appearing fields.
pub fn update_schema(existing: &CatalogEntry, new: &CatalogEntry) -> CatalogEntry {
    let mut merged = existing.clone();

    for (name, field) in &new.schema.properties {
        if merged.schema.contains(name) {
            continue;
        }
        merged.schema.properties.insert(name.clone(), field.clone());

        let mut meta = new.field_metadata(name).cloned().unwrap_or_default();
        if meta.effective_inclusion() != Inclusion::Unsupported {
            meta.selected = Some(true);
        }
        *merged.field_metadata_mut(name) = meta;
    }

    merged
}

// ============================================================================
// Catalog Selection Update
// ============================================================================

/// A user's selection request for one stream
#[derive(Debug, Clone, Default)]
pub struct SelectionUpdate {
    /// Stream to update
    pub stream_id: String,

    /// Override the primary key fields
    pub key_properties: Option<Vec<String>>,

    /// Override the replication method
    pub replication_method: Option<ReplicationMethod>,

    /// Override the replication key
    pub replication_key: Option<String>,

    /// Columns to select; `None` means "all selectable columns"
    pub selected_columns: Option<Vec<String>>,

    /// Columns to prune from `selected_columns`; ignored when no explicit
    /// column list is given
    pub deselected_columns: Vec<String>,
}

impl SelectionUpdate {
    /// Create an update for a stream
    pub fn new(stream_id: impl Into<String>) -> Self {
        Self {
            stream_id: stream_id.into(),
            ..Self::default()
        }
    }
}

/// Apply a selection update to a catalog in place
///
/// The named stream is marked selected at the stream level and each field's
/// selected flag is recomputed by the inclusion policy. Catalog stream
/// order is left untouched: nothing downstream depends on it.
pub fn update_catalog_selection(catalog: &mut Catalog, update: &SelectionUpdate) -> Result<()> {
    let entry = catalog
        .get_stream_mut(&update.stream_id)
        .ok_or_else(|| crate::error::Error::stream_not_found(&update.stream_id))?;

    if let Some(keys) = &update.key_properties {
        entry.key_properties = keys.clone();
        entry.stream_metadata_mut().table_key_properties = Some(keys.clone());
    }
    if let Some(method) = update.replication_method {
        entry.replication_method = method;
        entry.stream_metadata_mut().forced_replication_method = Some(method);
    }
    if let Some(key) = &update.replication_key {
        entry.replication_key = Some(key.clone());
    }

    // Key properties and the replication key are always automatic
    let automatic: HashSet<String> = entry
        .key_properties
        .iter()
        .chain(entry.replication_key.iter())
        .cloned()
        .collect();

    entry.stream_metadata_mut().selected = Some(true);

    let field_names: Vec<String> = entry.schema.field_names().map(String::from).collect();
    for name in field_names {
        let is_automatic = automatic.contains(&name);
        let meta = entry.field_metadata_mut(&name);
        if is_automatic {
            meta.inclusion = Some(Inclusion::Automatic);
        }

        let selected = match meta.effective_inclusion() {
            Inclusion::Automatic => true,
            Inclusion::Unsupported => false,
            Inclusion::Available => match &update.selected_columns {
                // No explicit list selects every available column; the
                // deselect list only prunes an explicit selection
                None => true,
                Some(cols) => {
                    cols.iter().any(|c| *c == name)
                        && !update.deselected_columns.iter().any(|c| *c == name)
                }
            },
        };
        meta.selected = Some(selected);
    }

    Ok(())
}

/// Apply a selection update to a persisted catalog file
pub fn update_catalog_file(path: impl AsRef<Path>, update: &SelectionUpdate) -> Result<()> {
    let path = path.as_ref();
    let mut catalog = Catalog::from_file(path)?;
    update_catalog_selection(&mut catalog, update)?;
    catalog.to_file(path)
}

#[cfg(test)]
mod tests;
