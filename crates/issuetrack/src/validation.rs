//! Issue record validation against a declarative field schema.
//!
//! Incoming records arrive as raw JSON objects and may carry arbitrary extra
//! fields. Validation restricts a record to the schema allow-list, checks
//! required fields for presence, and enforces the closed status set, before
//! any store operation runs.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::Status;

/// How a schema field is treated during validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Must be present and truthy
    Required,
    /// Kept when present
    Optional,
}

/// One entry in the issue field schema.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Wire name of the field
    pub name: &'static str,
    /// Required or optional
    pub kind: FieldKind,
}

/// Allow-list of fields an issue record may carry. Anything else is
/// stripped. The store-assigned id is deliberately absent: clients never
/// supply it.
pub const ISSUE_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "status",
        kind: FieldKind::Required,
    },
    FieldSpec {
        name: "owner",
        kind: FieldKind::Required,
    },
    FieldSpec {
        name: "effort",
        kind: FieldKind::Optional,
    },
    FieldSpec {
        name: "created",
        kind: FieldKind::Required,
    },
    FieldSpec {
        name: "completionDate",
        kind: FieldKind::Optional,
    },
    FieldSpec {
        name: "title",
        kind: FieldKind::Required,
    },
];

/// Why a candidate record was rejected.
///
/// The display strings are part of the wire contract: clients receive them
/// verbatim in `{ message }` bodies.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or falsy
    #[error("{0} is required.")]
    MissingField(&'static str),
    /// The status value is outside the valid set
    #[error("{0} is not a valid status.")]
    InvalidStatus(String),
}

/// JSON truthiness as the historical API applied it: `null`, `false`, `0`,
/// and `""` all count as absent for required-field checks.
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Validate a candidate issue record.
///
/// Returns the record restricted to the schema allow-list, or the first
/// failure encountered. The input is not mutated.
pub fn validate(record: &Map<String, Value>) -> Result<Map<String, Value>, ValidationError> {
    let mut sanitized = Map::new();

    for spec in ISSUE_FIELDS {
        match record.get(spec.name) {
            None => {
                if spec.kind == FieldKind::Required {
                    return Err(ValidationError::MissingField(spec.name));
                }
            }
            Some(value) => {
                if spec.kind == FieldKind::Required && is_falsy(value) {
                    return Err(ValidationError::MissingField(spec.name));
                }
                sanitized.insert(spec.name.to_string(), value.clone());
            }
        }
    }

    // status survived the required check above, so it is present here
    let status = match sanitized.get("status") {
        Some(value) => value,
        None => return Err(ValidationError::MissingField("status")),
    };
    let valid_status = status
        .as_str()
        .is_some_and(|s| Status::ALL.iter().any(|v| v.as_str() == s));
    if !valid_status {
        let shown = match status {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        return Err(ValidationError::InvalidStatus(shown));
    }

    Ok(sanitized)
}
