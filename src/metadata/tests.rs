use super::*;
use crate::catalog::{CatalogEntry, FieldSchema};
use crate::error::Error;
use pretty_assertions::assert_eq;

fn users_schema() -> StreamSchema {
    StreamSchema::new()
        .with_property("id", FieldSchema::integer())
        .with_property("name", FieldSchema::string())
        .with_property("updated_at", FieldSchema::date_time())
}

fn discovered_entry() -> CatalogEntry {
    let schema = users_schema();
    let keys = vec!["id".to_string()];
    let replication_keys = vec!["updated_at".to_string()];

    let mut entry = CatalogEntry::new("users", schema.clone());
    entry.key_properties = keys.clone();
    entry.replication_key = Some("updated_at".to_string());
    entry.valid_replication_keys = replication_keys.clone();
    entry.metadata = get_standard_metadata(
        &schema,
        &keys,
        Some(ReplicationMethod::Incremental),
        &replication_keys,
    );
    entry
}

#[test]
fn test_standard_metadata_has_one_stream_entry() {
    let metadata = get_standard_metadata(&users_schema(), &[], None, &[]);

    let stream_entries = metadata.iter().filter(|e| e.breadcrumb.is_stream()).count();
    assert_eq!(stream_entries, 1);
    assert_eq!(metadata.len(), 4); // stream + three fields
}

#[test]
fn test_standard_metadata_marks_keys_automatic() {
    let entry = discovered_entry();

    assert_eq!(
        entry.field_metadata("id").unwrap().effective_inclusion(),
        Inclusion::Automatic
    );
    assert_eq!(
        entry
            .field_metadata("updated_at")
            .unwrap()
            .effective_inclusion(),
        Inclusion::Automatic
    );
    assert_eq!(
        entry.field_metadata("name").unwrap().effective_inclusion(),
        Inclusion::Available
    );
}

#[test]
fn test_standard_metadata_records_stream_config() {
    let entry = discovered_entry();
    let stream_meta = entry.stream_metadata().unwrap();

    assert_eq!(
        stream_meta.table_key_properties,
        Some(vec!["id".to_string()])
    );
    assert_eq!(
        stream_meta.forced_replication_method,
        Some(ReplicationMethod::Incremental)
    );
    assert_eq!(
        stream_meta.valid_replication_keys,
        Some(vec!["updated_at".to_string()])
    );
}

// ============================================================================
// update_schema
// ============================================================================

#[test]
fn test_update_schema_adds_new_columns() {
    let existing = discovered_entry();
    let mut new = discovered_entry();
    new.schema = new.schema.with_property("email", FieldSchema::string());

    let merged = update_schema(&existing, &new);

    assert!(merged.schema.contains("email"));
    assert_eq!(merged.field_metadata("email").unwrap().selected, Some(true));
}

#[test]
fn test_update_schema_never_removes_columns() {
    let existing = discovered_entry();
    let mut new = discovered_entry();
    new.schema.properties.remove("name");

    let merged = update_schema(&existing, &new);
    assert!(merged.schema.contains("name"));
}

#[test]
fn test_update_schema_keeps_existing_column_untouched() {
    let mut existing = discovered_entry();
    existing.field_metadata_mut("name").selected = Some(false);

    let mut new = discovered_entry();
    new.schema
        .properties
        .insert("name".to_string(), FieldSchema::integer());
    new.field_metadata_mut("name").selected = Some(true);

    let merged = update_schema(&existing, &new);

    // Retyping and reselection of a known column are both ignored
    assert!(merged.schema.get_property("name").unwrap().allows("string"));
    assert_eq!(merged.field_metadata("name").unwrap().selected, Some(false));
}

#[test]
fn test_update_schema_unsupported_column_not_selected() {
    let existing = discovered_entry();
    let mut new = discovered_entry();
    new.schema = new.schema.with_property("blob", FieldSchema::string());
    new.field_metadata_mut("blob").inclusion = Some(Inclusion::Unsupported);

    let merged = update_schema(&existing, &new);
    assert_eq!(merged.field_metadata("blob").unwrap().selected, None);
    assert!(!merged.is_field_selected("blob"));
}

// ============================================================================
// update_catalog_selection
// ============================================================================

fn catalog_with_users() -> Catalog {
    Catalog {
        streams: vec![discovered_entry()],
    }
}

#[test]
fn test_selection_marks_stream_selected() {
    let mut catalog = catalog_with_users();
    update_catalog_selection(&mut catalog, &SelectionUpdate::new("users")).unwrap();

    assert!(catalog.get_stream("users").unwrap().is_selected());
}

#[test]
fn test_selection_defaults_to_all_columns() {
    let mut catalog = catalog_with_users();
    update_catalog_selection(&mut catalog, &SelectionUpdate::new("users")).unwrap();

    let entry = catalog.get_stream("users").unwrap();
    assert!(entry.is_field_selected("id"));
    assert!(entry.is_field_selected("name"));
    assert!(entry.is_field_selected("updated_at"));
}

#[test]
fn test_selection_respects_column_list() {
    let mut catalog = catalog_with_users();
    let update = SelectionUpdate {
        selected_columns: Some(vec!["name".to_string()]),
        ..SelectionUpdate::new("users")
    };
    update_catalog_selection(&mut catalog, &update).unwrap();

    let entry = catalog.get_stream("users").unwrap();
    assert!(entry.is_field_selected("name"));
    // Automatic fields stay selected even when omitted from the list
    assert!(entry.is_field_selected("id"));
    assert!(entry.is_field_selected("updated_at"));
}

#[test]
fn test_deselection_prunes_explicit_column_list() {
    let mut catalog = catalog_with_users();
    let update = SelectionUpdate {
        selected_columns: Some(vec!["name".to_string()]),
        deselected_columns: vec!["name".to_string()],
        ..SelectionUpdate::new("users")
    };
    update_catalog_selection(&mut catalog, &update).unwrap();

    assert!(!catalog.get_stream("users").unwrap().is_field_selected("name"));
}

#[test]
fn test_deselection_without_column_list_is_inert() {
    let mut catalog = catalog_with_users();
    let update = SelectionUpdate {
        deselected_columns: vec!["name".to_string()],
        ..SelectionUpdate::new("users")
    };
    update_catalog_selection(&mut catalog, &update).unwrap();

    // No explicit selection means every available column stays selected
    assert!(catalog.get_stream("users").unwrap().is_field_selected("name"));
}

#[test]
fn test_deselection_cannot_drop_automatic_fields() {
    let mut catalog = catalog_with_users();
    let update = SelectionUpdate {
        selected_columns: Some(vec!["id".to_string(), "name".to_string()]),
        deselected_columns: vec!["id".to_string(), "name".to_string()],
        ..SelectionUpdate::new("users")
    };
    update_catalog_selection(&mut catalog, &update).unwrap();

    let entry = catalog.get_stream("users").unwrap();
    assert!(entry.is_field_selected("id"));
    assert!(!entry.is_field_selected("name"));
}

#[test]
fn test_selection_overrides_replication_config() {
    let mut catalog = catalog_with_users();
    let update = SelectionUpdate {
        key_properties: Some(vec!["id".to_string()]),
        replication_method: Some(ReplicationMethod::FullTable),
        ..SelectionUpdate::new("users")
    };
    update_catalog_selection(&mut catalog, &update).unwrap();

    let entry = catalog.get_stream("users").unwrap();
    assert_eq!(entry.replication_method, ReplicationMethod::FullTable);
    assert_eq!(
        entry.stream_metadata().unwrap().forced_replication_method,
        Some(ReplicationMethod::FullTable)
    );
}

#[test]
fn test_selection_unknown_stream_is_error() {
    let mut catalog = catalog_with_users();
    let err = update_catalog_selection(&mut catalog, &SelectionUpdate::new("missing")).unwrap_err();
    assert!(matches!(err, Error::StreamNotFound { .. }));
}

#[test]
fn test_selection_preserves_stream_order() {
    let mut second = discovered_entry();
    second.stream_id = "orders".to_string();
    second.stream = "orders".to_string();

    let mut catalog = catalog_with_users();
    catalog.streams.push(second);

    update_catalog_selection(&mut catalog, &SelectionUpdate::new("orders")).unwrap();

    let order: Vec<&str> = catalog.streams.iter().map(|e| e.stream_id.as_str()).collect();
    assert_eq!(order, vec!["users", "orders"]);
}

#[test]
fn test_selection_selects_unsupported_never() {
    let mut catalog = catalog_with_users();
    catalog
        .get_stream_mut("users")
        .unwrap()
        .field_metadata_mut("name")
        .inclusion = Some(Inclusion::Unsupported);

    let update = SelectionUpdate {
        selected_columns: Some(vec!["name".to_string()]),
        ..SelectionUpdate::new("users")
    };
    update_catalog_selection(&mut catalog, &update).unwrap();

    let entry = catalog.get_stream("users").unwrap();
    assert_eq!(entry.field_metadata("name").unwrap().selected, Some(false));
    assert!(!entry.is_field_selected("name"));
}
