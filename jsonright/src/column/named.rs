use serde_json::Value;
use std::iter::{Chain, Map, Once};

use super::Column;
use crate::error::ColumnResult;

/// A column whose field name is carried next to its values instead of as
/// their first element.
///
/// Its cursor still yields the name first, so it can be mixed freely with
/// plain array columns in one dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedColumn<I> {
    pub name: String,
    pub values: I,
}

impl<I> NamedColumn<I>
where
    I: IntoIterator<Item = Value>,
{
    pub fn new(name: impl Into<String>, values: I) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

impl<I> Column for NamedColumn<I>
where
    I: IntoIterator<Item = Value>,
{
    type Cursor = Chain<
        Once<ColumnResult<Value>>,
        Map<I::IntoIter, fn(Value) -> ColumnResult<Value>>,
    >;

    fn into_cursor(self) -> ColumnResult<Self::Cursor> {
        let name = std::iter::once(Ok(Value::String(self.name)));
        let values = self
            .values
            .into_iter()
            .map(Ok as fn(Value) -> ColumnResult<Value>);
        Ok(name.chain(values))
    }
}
