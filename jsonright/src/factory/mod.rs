//! Entity factories.
//!
//! A factory turns one [`Row`] into one entity. It offers two calling
//! conventions and the caller picks which one the transposer uses:
//!
//! - [`EntityFactory::construct`]: the constructor convention
//! - [`EntityFactory::create`]: the static creator convention (default)
//!
//! Ready-made factories:
//!
//! - [`RowEcho`] - hands the row back unchanged
//! - [`Entities`] - dispatches to a type's [`FromRow`] impl, see [`entity`]
//! - [`Deserialized`] - builds any `DeserializeOwned` type through serde
//! - [`FnFactory`] - one closure per convention

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::convert::Infallible;
use std::fmt;
use std::marker::PhantomData;

/// A transient record: field name to value, in column order.
pub type Row = Map<String, Value>;

/// Something that builds entities out of rows.
pub trait EntityFactory {
    type Entity;
    type Error;

    /// Constructor convention.
    fn construct(&self, row: Row) -> Result<Self::Entity, Self::Error>;

    /// Static creator convention.
    fn create(&self, row: Row) -> Result<Self::Entity, Self::Error>;
}

impl<F: EntityFactory + ?Sized> EntityFactory for &F {
    type Entity = F::Entity;
    type Error = F::Error;

    fn construct(&self, row: Row) -> Result<Self::Entity, Self::Error> {
        (**self).construct(row)
    }

    fn create(&self, row: Row) -> Result<Self::Entity, Self::Error> {
        (**self).create(row)
    }
}

// =============================================================================
// RowEcho
// =============================================================================

/// Returns every row as its own entity.
#[derive(Debug, Clone, Copy, Default)]
pub struct RowEcho;

impl EntityFactory for RowEcho {
    type Entity = Row;
    type Error = Infallible;

    fn construct(&self, row: Row) -> Result<Row, Infallible> {
        Ok(row)
    }

    fn create(&self, row: Row) -> Result<Row, Infallible> {
        Ok(row)
    }
}

// =============================================================================
// FromRow
// =============================================================================

/// Entity types that know how to build themselves from a row.
pub trait FromRow: Sized {
    type Error;

    /// Builds the entity; used when the caller asks for the constructor.
    fn from_row(row: Row) -> Result<Self, Self::Error>;

    /// Static creator. Defaults to [`FromRow::from_row`].
    fn create(row: Row) -> Result<Self, Self::Error> {
        Self::from_row(row)
    }
}

/// Factory for a [`FromRow`] type. Obtain one with [`entity`].
pub struct Entities<T> {
    _marker: PhantomData<fn() -> T>,
}

/// Returns the factory for entity type `T`.
pub fn entity<T: FromRow>() -> Entities<T> {
    Entities {
        _marker: PhantomData,
    }
}

impl<T> fmt::Debug for Entities<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entities")
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T> Clone for Entities<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Entities<T> {}

impl<T: FromRow> EntityFactory for Entities<T> {
    type Entity = T;
    type Error = T::Error;

    fn construct(&self, row: Row) -> Result<T, T::Error> {
        T::from_row(row)
    }

    fn create(&self, row: Row) -> Result<T, T::Error> {
        T::create(row)
    }
}

// =============================================================================
// Deserialized
// =============================================================================

/// Builds entities with serde, treating the row as a JSON object.
///
/// Both conventions deserialize the same way.
pub struct Deserialized<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> Deserialized<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for Deserialized<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Deserialized<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deserialized")
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T: DeserializeOwned> EntityFactory for Deserialized<T> {
    type Entity = T;
    type Error = serde_json::Error;

    fn construct(&self, row: Row) -> Result<T, serde_json::Error> {
        serde_json::from_value(Value::Object(row))
    }

    fn create(&self, row: Row) -> Result<T, serde_json::Error> {
        self.construct(row)
    }
}

// =============================================================================
// FnFactory
// =============================================================================

/// A factory made of two closures, one per calling convention.
#[derive(Debug, Clone)]
pub struct FnFactory<C, S> {
    constructor: C,
    creator: S,
}

impl<C, S, T, E> FnFactory<C, S>
where
    C: Fn(Row) -> Result<T, E>,
    S: Fn(Row) -> Result<T, E>,
{
    pub fn new(constructor: C, creator: S) -> Self {
        Self {
            constructor,
            creator,
        }
    }
}

impl<C, S, T, E> EntityFactory for FnFactory<C, S>
where
    C: Fn(Row) -> Result<T, E>,
    S: Fn(Row) -> Result<T, E>,
{
    type Entity = T;
    type Error = E;

    fn construct(&self, row: Row) -> Result<T, E> {
        (self.constructor)(row)
    }

    fn create(&self, row: Row) -> Result<T, E> {
        (self.creator)(row)
    }
}
