//! Transformation module.
//!
//! - Transposer: right-hand columns to row entities
//! - Pivot: entities to right-hand columns

pub mod pivot;
pub mod transposer;

pub use pivot::{entity_to_row, pivot_value, to_columns};
pub use transposer::{from_json, to_entities, to_entities_with, RaggedPolicy, TransposeOptions};
