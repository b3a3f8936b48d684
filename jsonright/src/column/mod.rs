//! Column sources.
//!
//! A column is anything that can hand out a lazy cursor over
//! `name, row 0, row 1, ...`. The transposer asks each column for exactly one
//! cursor per call, so whether a dataset can be transposed twice depends on
//! the column type:
//!
//! | Column type               | Reusable |
//! |---------------------------|----------|
//! | `&Vec<Value>`, `&[Value]` | yes      |
//! | `&Value` (array)          | yes      |
//! | `Vec<Value>`, `Value`     | consumed |
//! | `&mut Streamed<I>`        | no, second call sees it exhausted |
//! | `Fallible<I>`             | consumed |
//! | `NamedColumn<I>`          | consumed |

mod named;

use serde_json::Value;
use std::iter::{Cloned, Map};
use std::{slice, vec};

use crate::error::{kind_of, ColumnError, ColumnResult};

pub use named::NamedColumn;

/// A self-naming column of a right-hand payload.
///
/// The first value produced by the cursor is the field name, every following
/// value is the entry for the next row.
pub trait Column {
    /// Cursor over the column's values.
    type Cursor: Iterator<Item = ColumnResult<Value>>;

    /// Turns the column into an independent cursor.
    ///
    /// Fails if the column cannot produce a sequence at all.
    fn into_cursor(self) -> ColumnResult<Self::Cursor>;
}

type Lift<I> = Map<I, fn(Value) -> ColumnResult<Value>>;

fn lift<I: Iterator<Item = Value>>(iter: I) -> Lift<I> {
    iter.map(Ok as fn(Value) -> ColumnResult<Value>)
}

impl Column for Vec<Value> {
    type Cursor = Lift<vec::IntoIter<Value>>;

    fn into_cursor(self) -> ColumnResult<Self::Cursor> {
        Ok(lift(self.into_iter()))
    }
}

impl<'a> Column for &'a [Value] {
    type Cursor = Lift<Cloned<slice::Iter<'a, Value>>>;

    fn into_cursor(self) -> ColumnResult<Self::Cursor> {
        Ok(lift(self.iter().cloned()))
    }
}

impl<'a> Column for &'a Vec<Value> {
    type Cursor = Lift<Cloned<slice::Iter<'a, Value>>>;

    fn into_cursor(self) -> ColumnResult<Self::Cursor> {
        self.as_slice().into_cursor()
    }
}

impl Column for Value {
    type Cursor = Lift<vec::IntoIter<Value>>;

    fn into_cursor(self) -> ColumnResult<Self::Cursor> {
        match self {
            Value::Array(values) => values.into_cursor(),
            other => Err(ColumnError::NotASequence {
                found: kind_of(&other),
            }),
        }
    }
}

impl<'a> Column for &'a Value {
    type Cursor = Lift<Cloned<slice::Iter<'a, Value>>>;

    fn into_cursor(self) -> ColumnResult<Self::Cursor> {
        match self {
            Value::Array(values) => values.as_slice().into_cursor(),
            other => Err(ColumnError::NotASequence {
                found: kind_of(other),
            }),
        }
    }
}

// =============================================================================
// Single-pass columns
// =============================================================================

/// A column backed by a plain iterator, e.g. values decoded on the fly.
///
/// Transposing `&mut Streamed` advances the inner iterator, so the same
/// dataset transposed again yields no rows.
#[derive(Debug, Clone)]
pub struct Streamed<I> {
    inner: I,
}

impl<I> Streamed<I>
where
    I: Iterator<Item = Value>,
{
    pub fn new(values: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            inner: values.into_iter(),
        }
    }
}

impl<I> Column for Streamed<I>
where
    I: Iterator<Item = Value>,
{
    type Cursor = Lift<I>;

    fn into_cursor(self) -> ColumnResult<Self::Cursor> {
        Ok(lift(self.inner))
    }
}

impl<'a, I> Column for &'a mut Streamed<I>
where
    I: Iterator<Item = Value>,
{
    type Cursor = Lift<&'a mut I>;

    fn into_cursor(self) -> ColumnResult<Self::Cursor> {
        Ok(lift(&mut self.inner))
    }
}

/// A column whose source can fail while being read.
///
/// Errors are boxed into [`ColumnError::Source`] untouched.
#[derive(Debug, Clone)]
pub struct Fallible<I> {
    inner: I,
}

impl<I, E> Fallible<I>
where
    I: Iterator<Item = Result<Value, E>>,
{
    pub fn new(values: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            inner: values.into_iter(),
        }
    }
}

fn box_source<E>(item: Result<Value, E>) -> ColumnResult<Value>
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    item.map_err(|e| ColumnError::Source(e.into()))
}

impl<I, E> Column for Fallible<I>
where
    I: Iterator<Item = Result<Value, E>>,
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    type Cursor = Map<I, fn(Result<Value, E>) -> ColumnResult<Value>>;

    fn into_cursor(self) -> ColumnResult<Self::Cursor> {
        Ok(self
            .inner
            .map(box_source::<E> as fn(Result<Value, E>) -> ColumnResult<Value>))
    }
}

/// Converts a column's first value into the key used for every row.
///
/// Strings are used as-is. Other scalars are stringified the way a JavaScript
/// object key would be.
pub(crate) fn field_name(value: Value) -> ColumnResult<String> {
    match value {
        Value::String(s) => Ok(s),
        Value::Null => Ok("null".to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(number_key(&n)),
        other => Err(ColumnError::InvalidFieldName {
            found: kind_of(&other),
        }),
    }
}

/// Whole floats drop their fraction, so `1.0` keys as `"1"`.
fn number_key(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => {
            if f == 0.0 {
                "0".to_string()
            } else {
                format!("{f:.0}")
            }
        }
        _ => n.to_string(),
    }
}
