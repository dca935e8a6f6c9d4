//! Record validation against stream schemas
//!
//! Validation is a plain `Result` per record; the engine decides what to do
//! with a violation based on the configured `InvalidRecordPolicy`.

use crate::catalog::{FieldSchema, StreamSchema};
use crate::types::JsonValue;
use std::fmt;

/// Why a record failed validation against its stream's schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaViolation {
    /// The record is not a JSON object
    NotAnObject,
    /// A field's value does not match any allowed type tag
    TypeMismatch {
        /// Field name
        field: String,
        /// Allowed type tags
        expected: Vec<String>,
        /// Actual JSON kind
        actual: &'static str,
    },
    /// A null value in a field that does not allow null
    UnexpectedNull {
        /// Field name
        field: String,
    },
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaViolation::NotAnObject => write!(f, "record is not a JSON object"),
            SchemaViolation::TypeMismatch {
                field,
                expected,
                actual,
            } => write!(
                f,
                "field '{field}' is {actual}, expected one of [{}]",
                expected.join(", ")
            ),
            SchemaViolation::UnexpectedNull { field } => {
                write!(f, "field '{field}' is null but the schema does not allow null")
            }
        }
    }
}

/// JSON kind of a value, as a schema type tag
fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "integer"
            } else {
                "number"
            }
        }
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

fn matches_schema(field: &FieldSchema, value: &JsonValue) -> bool {
    // An empty tag set constrains nothing
    if field.types.is_empty() {
        return true;
    }
    let kind = json_kind(value);
    // "number" admits integers as well
    field.allows(kind) || (kind == "integer" && field.allows("number"))
}

/// Validate a record against a stream schema
///
/// Checks every field present in the record that the schema declares.
/// Absent fields and undeclared fields pass; strictness about those
/// belongs to the destination, not the replication boundary.
pub fn validate_record(
    schema: &StreamSchema,
    record: &JsonValue,
) -> std::result::Result<(), SchemaViolation> {
    let Some(object) = record.as_object() else {
        return Err(SchemaViolation::NotAnObject);
    };

    for (name, value) in object {
        let Some(field) = schema.get_property(name) else {
            continue;
        };

        if value.is_null() {
            if !field.is_nullable() && !field.types.is_empty() {
                return Err(SchemaViolation::UnexpectedNull { field: name.clone() });
            }
            continue;
        }

        if !matches_schema(field, value) {
            return Err(SchemaViolation::TypeMismatch {
                field: name.clone(),
                expected: field.types.clone(),
                actual: json_kind(value),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::FieldSchema;
    use serde_json::json;
    use test_case::test_case;

    fn schema() -> StreamSchema {
        StreamSchema::new()
            .with_property("id", FieldSchema::integer())
            .with_property("name", FieldSchema::new(["string", "null"]))
            .with_property("score", FieldSchema::new(["number"]))
    }

    #[test]
    fn test_valid_record() {
        let record = json!({"id": 1, "name": "Alice", "score": 9.5});
        assert!(validate_record(&schema(), &record).is_ok());
    }

    #[test]
    fn test_nullable_field_accepts_null() {
        let record = json!({"id": 1, "name": null});
        assert!(validate_record(&schema(), &record).is_ok());
    }

    #[test]
    fn test_non_nullable_field_rejects_null() {
        let record = json!({"id": null});
        assert_eq!(
            validate_record(&schema(), &record),
            Err(SchemaViolation::UnexpectedNull {
                field: "id".to_string()
            })
        );
    }

    #[test]
    fn test_type_mismatch() {
        let record = json!({"id": "not-a-number"});
        let err = validate_record(&schema(), &record).unwrap_err();
        assert!(matches!(err, SchemaViolation::TypeMismatch { ref field, .. } if field == "id"));
    }

    #[test]
    fn test_integer_satisfies_number() {
        let record = json!({"score": 3});
        assert!(validate_record(&schema(), &record).is_ok());
    }

    #[test_case(json!([1, 2]); "array")]
    #[test_case(json!("plain"); "string")]
    #[test_case(json!(42); "number")]
    fn test_non_object_records_rejected(record: crate::types::JsonValue) {
        assert_eq!(
            validate_record(&schema(), &record),
            Err(SchemaViolation::NotAnObject)
        );
    }

    #[test]
    fn test_undeclared_and_absent_fields_pass() {
        let record = json!({"id": 1, "extra": {"nested": true}});
        assert!(validate_record(&schema(), &record).is_ok());
    }
}
