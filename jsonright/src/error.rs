//! Error types for columnar transposition and pivoting.
//!
//! - [`ColumnError`] - a single column could not be read
//! - [`TransposeError`] - columns to entities failed
//! - [`PivotError`] - entities to columns failed
//!
//! `ColumnError` converts into `TransposeError` once the failing column's
//! position is known, so cursors only report what went wrong.

use serde_json::Value;
use thiserror::Error;

// =============================================================================
// Column Errors
// =============================================================================

/// Errors raised while turning a column into a cursor or advancing it.
#[derive(Debug, Error)]
pub enum ColumnError {
    /// The column value cannot produce a sequence.
    #[error("Column is not a sequence (found {found})")]
    NotASequence { found: &'static str },

    /// The first value of the column cannot be used as a key.
    #[error("Field name must be a scalar (found {found})")]
    InvalidFieldName { found: &'static str },

    /// The upstream source of a fallible column failed.
    #[error("Column source failed: {0}")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),
}

// =============================================================================
// Transposition Errors
// =============================================================================

/// Errors returned by [`crate::to_entities`] and friends.
///
/// `E` is the entity factory's own error type. It is carried as-is in
/// [`TransposeError::Entity`].
#[derive(Debug, Error)]
pub enum TransposeError<E> {
    /// The payload is not an array of columns.
    #[error("Payload must be an array of columns (found {found})")]
    InvalidPayload { found: &'static str },

    /// A column could not be read.
    #[error("Column {index}: {source}")]
    Column {
        index: usize,
        #[source]
        source: ColumnError,
    },

    /// Columns ran out at different rows under the strict policy.
    #[error("Column '{field}' ran out of values at row {row}")]
    Ragged { row: usize, field: String },

    /// The entity factory rejected a row.
    #[error("Entity construction failed: {0}")]
    Entity(E),
}

impl<E> TransposeError<E> {
    /// Returns the factory error, if that is what failed.
    pub fn into_entity_error(self) -> Option<E> {
        match self {
            TransposeError::Entity(e) => Some(e),
            _ => None,
        }
    }
}

// =============================================================================
// Pivot Errors
// =============================================================================

/// Errors while pivoting entities into right-hand columns.
#[derive(Debug, Error)]
pub enum PivotError {
    /// An entity failed to serialize.
    #[error("Failed to serialize entity: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The value to pivot is not an array.
    #[error("Expected a sequence of entities (found {found})")]
    NotASequence { found: &'static str },

    /// An entity in an object sequence is not itself an object.
    #[error("Entity {row} is not an object (found {found})")]
    NotAnObject { row: usize, found: &'static str },

    /// An entity lacks a field the first entity declared.
    #[error("Entity {row} has no field '{field}'")]
    MissingField { row: usize, field: String },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for column cursors.
pub type ColumnResult<T> = Result<T, ColumnError>;

/// Result type for pivot operations.
pub type PivotResult<T> = Result<T, PivotError>;

/// Name of a JSON value's kind, for error messages.
pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_column_error_carries_index() {
        let err: TransposeError<std::convert::Infallible> = TransposeError::Column {
            index: 2,
            source: ColumnError::NotASequence { found: "number" },
        };
        let msg = err.to_string();
        assert!(msg.contains("Column 2"));
        assert!(msg.contains("number"));
    }

    #[test]
    fn test_entity_error_is_passed_through() {
        let err: TransposeError<String> = TransposeError::Entity("bad row".to_string());
        assert_eq!(err.to_string(), "Entity construction failed: bad row");
        assert_eq!(err.into_entity_error().as_deref(), Some("bad row"));
    }

    #[test]
    fn test_kind_of() {
        assert_eq!(kind_of(&json!(null)), "null");
        assert_eq!(kind_of(&json!([1])), "array");
        assert_eq!(kind_of(&json!({"a": 1})), "object");
        assert_eq!(kind_of(&json!("x")), "string");
    }
}
