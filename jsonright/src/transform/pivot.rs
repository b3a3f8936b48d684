//! Entities to right-hand columns.
//!
//! Sending a list of entities as plain JSON repeats every key once per
//! entity. Pivoting grows the table to the right instead, so each key is sent
//! once:
//!
//! ```text
//! [
//!     ["id", 1, 2],
//!     ["email", "ex@am.pl", "sagan@nasa.gov"],
//! ]
//! ```
//!
//! [`crate::to_entities`] reassembles the rows on the other side.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{kind_of, PivotError, PivotResult};
use crate::factory::Row;

/// Field names never exposed by [`entity_to_row`] when no keys are given.
const EXCLUDED_FIELDS: &[&str] = &["password"];

/// Prefixes of internal fields skipped by [`entity_to_row`].
const HIDDEN_PREFIXES: &[&str] = &["__", "_sa_"];

/// Pivot a sequence of entities into right-hand columns.
///
/// Keys and their order come from the first entity. If the first entity does
/// not serialize to an object the input is a list of plain values and is
/// returned serialized, unpivoted.
pub fn to_columns<T: Serialize>(entities: &[T]) -> PivotResult<Vec<Value>> {
    let values = entities
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()?;
    pivot_values(values)
}

/// Pivot an already serialized JSON array.
pub fn pivot_value(value: &Value) -> PivotResult<Value> {
    match value {
        Value::Array(items) => pivot_values(items.clone()).map(Value::Array),
        other => Err(PivotError::NotASequence {
            found: kind_of(other),
        }),
    }
}

fn pivot_values(values: Vec<Value>) -> PivotResult<Vec<Value>> {
    let keys: Vec<String> = match values.first() {
        None => return Ok(Vec::new()),
        Some(Value::Object(first)) => first.keys().cloned().collect(),
        Some(_) => return Ok(values),
    };

    let mut columns: Vec<Vec<Value>> = keys
        .iter()
        .map(|key| {
            let mut column = Vec::with_capacity(values.len() + 1);
            column.push(Value::String(key.clone()));
            column
        })
        .collect();

    for (row, value) in values.into_iter().enumerate() {
        let mut object = match value {
            Value::Object(object) => object,
            other => {
                return Err(PivotError::NotAnObject {
                    row,
                    found: kind_of(&other),
                })
            }
        };
        for (key, column) in keys.iter().zip(columns.iter_mut()) {
            let cell = object.remove(key).ok_or_else(|| PivotError::MissingField {
                row,
                field: key.clone(),
            })?;
            column.push(cell);
        }
    }

    debug!(
        columns = columns.len(),
        rows = columns.first().map_or(0, |c| c.len() - 1),
        "pivoted entities into columns"
    );
    Ok(columns.into_iter().map(Value::Array).collect())
}

/// Dump the fields of `entity` into a row.
///
/// With `keys`, exactly those fields are taken, in that order. Without, every
/// field is taken except `password` and internal fields starting with `__` or
/// `_sa_`.
pub fn entity_to_row<T: Serialize>(entity: &T, keys: &[&str]) -> PivotResult<Row> {
    let mut object = match serde_json::to_value(entity)? {
        Value::Object(object) => object,
        other => {
            return Err(PivotError::NotAnObject {
                row: 0,
                found: kind_of(&other),
            })
        }
    };

    if keys.is_empty() {
        object.retain(|key, _| is_exposed(key));
        return Ok(object);
    }

    keys.iter()
        .map(|&key| {
            object
                .remove(key)
                .map(|value| (key.to_string(), value))
                .ok_or_else(|| PivotError::MissingField {
                    row: 0,
                    field: key.to_string(),
                })
        })
        .collect()
}

fn is_exposed(key: &str) -> bool {
    !EXCLUDED_FIELDS.contains(&key) && !HIDDEN_PREFIXES.iter().any(|p| key.starts_with(p))
}
