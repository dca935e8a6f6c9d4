//! Schema inference from sampled records
//!
//! Builds a stream schema by merging the type tags observed across a sample
//! of records. Fields absent from some records become nullable; strings
//! that consistently parse as RFC 3339 timestamps get a date-time format.

use crate::catalog::{FieldSchema, StreamSchema};
use crate::types::JsonValue;
use std::collections::BTreeMap;

/// Infer a stream schema from sampled records
pub fn infer_stream_schema(records: &[JsonValue]) -> StreamSchema {
    let mut fields: BTreeMap<String, FieldSchema> = BTreeMap::new();
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut seen = 0usize;

    for record in records {
        let Some(object) = record.as_object() else {
            continue;
        };
        seen += 1;

        for (name, value) in object {
            *counts.entry(name.clone()).or_insert(0) += 1;
            let observed = infer_field(value);
            match fields.get_mut(name) {
                Some(existing) => merge_field(existing, &observed),
                None => {
                    let mut field = observed;
                    if seen > 1 {
                        // Late-appearing field: earlier records lacked it
                        field.make_nullable();
                    }
                    fields.insert(name.clone(), field);
                }
            }
        }
    }

    // Fields missing from some records are nullable
    for (name, field) in &mut fields {
        if counts.get(name).copied().unwrap_or(0) < seen {
            field.make_nullable();
        }
    }

    let mut schema = StreamSchema::new();
    schema.properties = fields;
    schema
}

fn infer_field(value: &JsonValue) -> FieldSchema {
    match value {
        JsonValue::Null => FieldSchema::new(["null"]),
        JsonValue::Bool(_) => FieldSchema::new(["boolean"]),
        JsonValue::Number(n) => {
            if n.is_i64() || n.is_u64() {
                FieldSchema::integer()
            } else {
                FieldSchema::new(["number"])
            }
        }
        JsonValue::String(s) => {
            if is_datetime(s) {
                FieldSchema::date_time()
            } else {
                FieldSchema::string()
            }
        }
        JsonValue::Array(_) => FieldSchema::new(["array"]),
        JsonValue::Object(_) => FieldSchema::new(["object"]),
    }
}

fn merge_field(existing: &mut FieldSchema, observed: &FieldSchema) {
    for tag in &observed.types {
        if !existing.allows(tag) {
            existing.types.push(tag.clone());
        }
    }
    // A format survives only while every observation agrees
    if existing.format != observed.format {
        existing.format = None;
    }
}

fn is_datetime(s: &str) -> bool {
    chrono::DateTime::parse_from_rfc3339(s).is_ok()
        || chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_infer_basic_types() {
        let records = vec![json!({"id": 1, "name": "a", "active": true, "score": 1.5})];
        let schema = infer_stream_schema(&records);

        assert_eq!(schema.get_property("id").unwrap().types, vec!["integer"]);
        assert_eq!(schema.get_property("name").unwrap().types, vec!["string"]);
        assert_eq!(schema.get_property("active").unwrap().types, vec!["boolean"]);
        assert_eq!(schema.get_property("score").unwrap().types, vec!["number"]);
    }

    #[test]
    fn test_infer_datetime_format() {
        let records = vec![
            json!({"updated_at": "2024-01-01T10:30:00Z"}),
            json!({"updated_at": "2024-01-02T11:00:00Z"}),
        ];
        let schema = infer_stream_schema(&records);
        assert_eq!(
            schema.get_property("updated_at").unwrap().format.as_deref(),
            Some("date-time")
        );
    }

    #[test]
    fn test_conflicting_format_dropped() {
        let records = vec![
            json!({"value": "2024-01-01T10:30:00Z"}),
            json!({"value": "plain text"}),
        ];
        let schema = infer_stream_schema(&records);
        assert!(schema.get_property("value").unwrap().format.is_none());
    }

    #[test]
    fn test_missing_field_becomes_nullable() {
        let records = vec![json!({"id": 1, "email": "a@b.co"}), json!({"id": 2})];
        let schema = infer_stream_schema(&records);
        assert!(schema.get_property("email").unwrap().is_nullable());
        assert!(!schema.get_property("id").unwrap().is_nullable());
    }

    #[test]
    fn test_late_field_becomes_nullable() {
        let records = vec![json!({"id": 1}), json!({"id": 2, "email": "a@b.co"})];
        let schema = infer_stream_schema(&records);
        assert!(schema.get_property("email").unwrap().is_nullable());
    }

    #[test]
    fn test_mixed_types_union() {
        let records = vec![json!({"id": 1}), json!({"id": "one"})];
        let schema = infer_stream_schema(&records);
        let types = &schema.get_property("id").unwrap().types;
        assert!(types.contains(&"integer".to_string()));
        assert!(types.contains(&"string".to_string()));
    }
}
