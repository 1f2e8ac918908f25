//! Polars `AnyValue` and row-extraction utilities.
//!
//! Clinical and thesaurus tables are processed row-wise: columns are pulled
//! out as string vectors, transformed, and rebuilt into new frames. These
//! helpers keep that conversion in one place.

use polars::prelude::*;

/// Converts a Polars `AnyValue` to a `String` representation.
///
/// Returns an empty string for `Null` and formats numeric types without
/// unnecessary trailing zeros.
///
/// # Examples
///
/// ```
/// use polars::prelude::AnyValue;
/// use ontomap_common::any_to_string;
///
/// assert_eq!(any_to_string(AnyValue::Null), "");
/// assert_eq!(any_to_string(AnyValue::Int32(42)), "42");
/// assert_eq!(any_to_string(AnyValue::String("hello")), "hello");
/// ```
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => if b { "Y" } else { "N" }.to_string(),
        other => other.to_string(),
    }
}

/// Converts `AnyValue` to `String`, returning `None` if the result is empty
/// after trimming.
pub fn any_to_string_non_empty(value: AnyValue<'_>) -> Option<String> {
    let s = any_to_string(value);
    if s.trim().is_empty() { None } else { Some(s) }
}

/// Formats a floating-point number as a string without trailing zeros.
///
/// # Examples
///
/// ```
/// use ontomap_common::format_numeric;
///
/// assert_eq!(format_numeric(1.0), "1");
/// assert_eq!(format_numeric(1.5), "1.5");
/// assert_eq!(format_numeric(0.0), "0");
/// ```
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Extract all values of a column as trimmed strings.
///
/// Nulls become empty strings, so the returned vector always has one entry
/// per frame row.
pub fn column_strings(df: &DataFrame, name: &str) -> PolarsResult<Vec<String>> {
    let series = df.column(name)?;
    let mut values = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let value = any_to_string(series.get(idx).unwrap_or(AnyValue::Null));
        values.push(value.trim().to_string());
    }
    Ok(values)
}

/// Decompose a frame into its header names and a row-major string matrix.
///
/// Nulls become empty strings.
pub fn frame_to_rows(df: &DataFrame) -> PolarsResult<(Vec<String>, Vec<Vec<String>>)> {
    let headers: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.as_str().to_owned())
        .collect();

    let mut columns = Vec::with_capacity(headers.len());
    for name in &headers {
        columns.push(column_strings(df, name)?);
    }

    let mut rows = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let row: Vec<String> = columns.iter().map(|col| col[idx].clone()).collect();
        rows.push(row);
    }

    Ok((headers, rows))
}

/// Build a string frame from header names and a row-major string matrix.
///
/// Every row must have exactly one value per header.
pub fn frame_from_rows(headers: &[String], rows: &[Vec<String>]) -> PolarsResult<DataFrame> {
    let mut columns = Vec::with_capacity(headers.len());
    for (col_idx, name) in headers.iter().enumerate() {
        let values: Vec<String> = rows.iter().map(|row| row[col_idx].clone()).collect();
        columns.push(Column::new(name.as_str().into(), values));
    }
    DataFrame::new(columns)
}
