//! # jsonright - reassemble right-hand JSON into entities
//!
//! A list of entities sent as plain JSON repeats every key once per entity.
//! The right-hand format pivots the table so it grows to the right, one
//! column per field, each column starting with its field name:
//!
//! ```text
//! ┌──────────────────────────────┐     ┌───────────┐     ┌───────────────┐
//! │ [["id", 1, 2],               │────▶│ Transpose │────▶│ Vec<Entity>   │
//! │  ["email", "a@b", "c@d"]]    │     │ (per row) │     │ (via factory) │
//! └──────────────────────────────┘     └───────────┘     └───────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use jsonright::{to_entities, RowEcho};
//! use serde_json::{json, Value};
//!
//! let columns = vec![
//!     vec![json!("id"), json!(1), json!(2)],
//!     vec![json!("email"), json!("ex@am.pl"), json!("sagan@nasa.gov")],
//! ];
//! let rows = to_entities(&columns, &RowEcho, false).unwrap();
//! assert_eq!(rows.len(), 2);
//! assert_eq!(rows[1]["email"], Value::from("sagan@nasa.gov"));
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types
//! - [`column`] - Column sources and cursors
//! - [`factory`] - Entity factories
//! - [`transform`] - Transposer and pivot

pub mod column;
pub mod error;
pub mod factory;
pub mod transform;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{ColumnError, ColumnResult, PivotError, PivotResult, TransposeError};

// =============================================================================
// Re-exports - Columns
// =============================================================================

pub use column::{Column, Fallible, NamedColumn, Streamed};

// =============================================================================
// Re-exports - Factories
// =============================================================================

pub use factory::{
    entity,
    Deserialized,
    Entities,
    EntityFactory,
    FnFactory,
    FromRow,
    Row,
    RowEcho,
};

// =============================================================================
// Re-exports - Transformation
// =============================================================================

pub use transform::{
    entity_to_row,
    from_json,
    pivot_value,
    to_columns,
    to_entities,
    to_entities_with,
    RaggedPolicy,
    TransposeOptions,
};
