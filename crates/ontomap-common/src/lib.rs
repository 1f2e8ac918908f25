//! Shared helpers used across the ontomap workspace.
//!
//! All tabular data in this workspace travels as Polars `DataFrame`s whose
//! columns are strings. This crate holds the `AnyValue` conversion and
//! row-extraction utilities every other crate leans on.

mod polars;

pub use polars::{
    any_to_string, any_to_string_non_empty, column_strings, format_numeric, frame_from_rows,
    frame_to_rows,
};
