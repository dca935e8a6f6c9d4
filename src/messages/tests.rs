//! Tests for message serialization and writers

use super::*;
use crate::catalog::FieldSchema;
use crate::messages::writer::JsonLinesWriter;
use pretty_assertions::assert_eq;
use serde_json::json;

fn users_schema() -> StreamSchema {
    StreamSchema::new()
        .with_property("id", FieldSchema::integer())
        .with_property("updated_at", FieldSchema::date_time())
}

// ============================================================================
// Serialization Tests
// ============================================================================

#[test]
fn test_schema_message_format() {
    let message = Message::Schema {
        stream: "users".to_string(),
        schema: users_schema(),
        key_properties: vec!["id".to_string()],
        bookmark_properties: Some(vec!["updated_at".to_string()]),
        replication_method: Some(ReplicationMethod::Incremental),
    };

    let value = serde_json::to_value(&message).unwrap();
    assert_eq!(value["type"], "SCHEMA");
    assert_eq!(value["stream"], "users");
    assert_eq!(value["key_properties"], json!(["id"]));
    assert_eq!(value["bookmark_properties"], json!(["updated_at"]));
    assert_eq!(value["replication_method"], "INCREMENTAL");
}

#[test]
fn test_record_message_format() {
    let message = Message::Record {
        stream: "users".to_string(),
        record: json!({"id": 1, "updated_at": "2024-01-01"}),
        time_extracted: None,
    };

    let value = serde_json::to_value(&message).unwrap();
    assert_eq!(value["type"], "RECORD");
    assert_eq!(value["record"]["id"], 1);
    assert!(value.get("time_extracted").is_none());
}

#[test]
fn test_state_message_carries_value_only() {
    let mut state = State::new();
    state.write_bookmark("users", "updated_at", json!("2024-01-01"));

    let message = Message::State { value: state };
    let value = serde_json::to_value(&message).unwrap();

    assert_eq!(value["type"], "STATE");
    assert_eq!(value["value"]["bookmarks"]["users"]["updated_at"], "2024-01-01");
    assert!(value.get("stream").is_none());
}

#[test]
fn test_activate_version_round_trip() {
    let message = Message::ActivateVersion {
        stream: "items".to_string(),
        version: 1_700_000_000_000,
    };

    let json = serde_json::to_string(&message).unwrap();
    let restored: Message = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, message);
}

#[test]
fn test_message_stream_accessor() {
    assert_eq!(
        Message::Record {
            stream: "users".to_string(),
            record: json!({}),
            time_extracted: None,
        }
        .stream(),
        Some("users")
    );
    assert_eq!(Message::State { value: State::new() }.stream(), None);
}

// ============================================================================
// Writer Tests
// ============================================================================

#[test]
fn test_json_lines_writer_one_line_per_message() {
    let mut writer = JsonLinesWriter::new(Vec::new());

    writer
        .write_schema("users", &users_schema(), &["id".to_string()], None, None)
        .unwrap();
    writer.write_record("users", json!({"id": 1}), None).unwrap();
    writer.write_state(&State::new()).unwrap();

    let output = String::from_utf8(writer.into_inner()).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 3);

    // Every line parses on its own
    for line in &lines {
        let parsed: serde_json::Value = serde_json::from_str(line).unwrap();
        assert!(parsed.get("type").is_some());
    }

    let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(first["type"], "SCHEMA");
}

#[test]
fn test_write_record_passes_extraction_time_through() {
    use chrono::{TimeZone, Utc};

    let stamp = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();

    let mut writer = CaptureWriter::new();
    writer
        .write_record("users", json!({"id": 1}), Some(stamp))
        .unwrap();
    writer.write_record("users", json!({"id": 2}), None).unwrap();

    match &writer.messages()[0] {
        Message::Record { time_extracted, .. } => assert_eq!(*time_extracted, Some(stamp)),
        _ => unreachable!(),
    }
    // Without an explicit time the writer stamps the call time
    match &writer.messages()[1] {
        Message::Record { time_extracted, .. } => assert!(time_extracted.is_some()),
        _ => unreachable!(),
    }
}

#[test]
fn test_capture_writer_preserves_order() {
    let mut writer = CaptureWriter::new();
    writer
        .write_schema("users", &users_schema(), &[], None, None)
        .unwrap();
    writer.write_record("users", json!({"id": 1}), None).unwrap();

    let messages = writer.into_messages();
    assert!(messages[0].is_schema());
    assert!(messages[1].is_record());
}

#[test]
fn test_state_write_is_idempotent() {
    let mut state = State::new();
    state.write_bookmark("users", "id", json!(3));

    let mut writer = JsonLinesWriter::new(Vec::new());
    writer.write_state(&state).unwrap();
    writer.write_state(&state).unwrap();

    let output = String::from_utf8(writer.into_inner()).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 2);
    // Replaying the same state produces an identical line
    assert_eq!(lines[0], lines[1]);
}
