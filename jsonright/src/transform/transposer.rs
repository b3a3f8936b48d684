//! Right-hand payload to row entities.
//!
//! ```text
//! [                                    [
//!   ["id", 1, 2],              →         { "id": 1, "email": "ex@am.pl" },
//!   ["email", "ex@am.pl",      →         { "id": 2, "email": "sagan@nasa.gov" },
//!             "sagan@nasa.gov"],       ]
//! ]
//! ```
//!
//! Each column is read through its own cursor. The first value of every
//! cursor is the field name, then cursors are advanced together, one row per
//! pass, in column order.
//!
//! # Ragged columns
//!
//! Under [`RaggedPolicy::Tolerate`] the pass loop stops as soon as the *last*
//! column runs out; that pass produces no entity. A column that runs out
//! earlier just stops contributing its key, so with columns
//! `[["a", 1, 2], ["b", "x"]]` one entity `{a: 1, b: "x"}` is produced, while
//! `[["b", "x"], ["a", 1, 2]]` produces `{b: "x", a: 1}` and `{a: 2}`.
//! [`RaggedPolicy::Strict`] rejects both instead.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::iter::Fuse;
use tracing::{debug, trace, warn};

use crate::column::{field_name, Column};
use crate::error::{kind_of, TransposeError};
use crate::factory::{EntityFactory, Row};

/// What to do when columns hold different numbers of rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RaggedPolicy {
    /// Stop when the last column runs out; shorter columns leave gaps.
    #[default]
    Tolerate,
    /// Fail on the first row where any column has run out before the others.
    Strict,
}

/// Options for a transposition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransposeOptions {
    /// Build entities with [`EntityFactory::construct`] instead of
    /// [`EntityFactory::create`].
    pub use_constructor: bool,

    /// Handling of columns with unequal row counts.
    pub ragged: RaggedPolicy,
}

impl TransposeOptions {
    /// Options matching the default behavior: `create`, ragged tolerated.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick the constructor convention instead of the static creator.
    pub fn with_constructor(mut self, use_constructor: bool) -> Self {
        self.use_constructor = use_constructor;
        self
    }

    /// Set how unequal column lengths are handled.
    pub fn with_ragged(mut self, ragged: RaggedPolicy) -> Self {
        self.ragged = ragged;
        self
    }
}

/// One resolved calling convention, picked once per call.
type Construct<F> =
    fn(&F, Row) -> Result<<F as EntityFactory>::Entity, <F as EntityFactory>::Error>;

fn convention<F: EntityFactory>(use_constructor: bool) -> Construct<F> {
    if use_constructor {
        F::construct
    } else {
        F::create
    }
}

/// A primed cursor: the column's key plus the rest of its values.
struct Cursor<I> {
    name: Option<String>,
    values: Fuse<I>,
}

/// Transpose `columns` into entities built by `factory`.
///
/// `use_constructor` picks [`EntityFactory::construct`] over the default
/// [`EntityFactory::create`]. Ragged columns are tolerated; see
/// [`to_entities_with`] for the strict policy.
pub fn to_entities<I, C, F>(
    columns: I,
    factory: &F,
    use_constructor: bool,
) -> Result<Vec<F::Entity>, TransposeError<F::Error>>
where
    I: IntoIterator<Item = C>,
    C: Column,
    F: EntityFactory,
{
    let options = TransposeOptions::new().with_constructor(use_constructor);
    to_entities_with(columns, factory, &options)
}

/// Transpose `columns` into entities, as configured by `options`.
///
/// Nothing is returned on failure: either every row becomes an entity or the
/// first error is reported.
pub fn to_entities_with<I, C, F>(
    columns: I,
    factory: &F,
    options: &TransposeOptions,
) -> Result<Vec<F::Entity>, TransposeError<F::Error>>
where
    I: IntoIterator<Item = C>,
    C: Column,
    F: EntityFactory,
{
    let mut cursors = Vec::new();
    for (index, column) in columns.into_iter().enumerate() {
        let mut values = column
            .into_cursor()
            .map_err(|source| TransposeError::Column { index, source })?
            .fuse();
        let name = match values.next() {
            Some(first) => Some(
                first
                    .and_then(field_name)
                    .map_err(|source| TransposeError::Column { index, source })?,
            ),
            None => None,
        };
        cursors.push(Cursor { name, values });
    }

    if cursors.is_empty() {
        return Ok(Vec::new());
    }
    trace!(columns = cursors.len(), "primed column cursors");

    let construct = convention::<F>(options.use_constructor);
    let mut entities = Vec::new();
    let mut ragged_warned = false;

    loop {
        let mut row = Row::new();
        let mut last_exhausted = false;
        let mut exhausted = 0;
        let mut first_exhausted = 0;

        for (index, cursor) in cursors.iter_mut().enumerate() {
            match cursor.values.next() {
                Some(value) => {
                    let value =
                        value.map_err(|source| TransposeError::Column { index, source })?;
                    if let Some(name) = &cursor.name {
                        row.insert(name.clone(), value);
                    }
                    last_exhausted = false;
                }
                None => {
                    if exhausted == 0 {
                        first_exhausted = index;
                    }
                    exhausted += 1;
                    last_exhausted = true;
                }
            }
        }

        if exhausted > 0 && exhausted < cursors.len() {
            let field = cursors[first_exhausted]
                .name
                .clone()
                .unwrap_or_else(|| format!("#{first_exhausted}"));
            match options.ragged {
                RaggedPolicy::Strict => {
                    return Err(TransposeError::Ragged {
                        row: entities.len(),
                        field,
                    });
                }
                RaggedPolicy::Tolerate if !ragged_warned => {
                    warn!(row = entities.len(), field = %field, "columns have unequal lengths");
                    ragged_warned = true;
                }
                RaggedPolicy::Tolerate => {}
            }
        }

        if last_exhausted {
            break;
        }
        entities.push(construct(factory, row).map_err(TransposeError::Entity)?);
    }

    debug!(
        columns = cursors.len(),
        rows = entities.len(),
        "transposed right-hand columns"
    );
    Ok(entities)
}

/// Transpose a whole wire payload: a JSON array of columns.
pub fn from_json<F>(
    payload: &Value,
    factory: &F,
    options: &TransposeOptions,
) -> Result<Vec<F::Entity>, TransposeError<F::Error>>
where
    F: EntityFactory,
{
    match payload {
        Value::Array(columns) => to_entities_with(columns, factory, options),
        other => Err(TransposeError::InvalidPayload {
            found: kind_of(other),
        }),
    }
}
