//! Reshape operations: splitting, stacking, and widening.

use std::collections::{BTreeMap, BTreeSet};

use polars::prelude::DataFrame;

use ontomap_common::{frame_from_rows, frame_to_rows};
use ontomap_model::columns;

use crate::error::{Result, TransformError};

fn column_index(headers: &[String], name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| TransformError::ColumnNotFound {
            column: name.to_string(),
        })
}

/// Split delimiter-packed cells of the named columns, one value per row.
///
/// For each named column, every cell is split on `delimiter` and each
/// resulting value gets its own row with all other columns replicated.
/// When several columns are named, each split multiplies the rows produced
/// by the previous one. Row count never decreases.
///
/// Empty-cell policy: an empty or null cell yields one row with an empty
/// value rather than dropping the row, so primary-key coverage stays
/// complete.
pub fn split_multivalued(df: &DataFrame, split_columns: &[String], delimiter: &str) -> Result<DataFrame> {
    let (headers, mut rows) = frame_to_rows(df)?;

    for name in split_columns {
        let idx = column_index(&headers, name)?;
        let mut expanded = Vec::with_capacity(rows.len());
        for row in rows {
            let cell = row[idx].trim();
            if cell.is_empty() {
                let mut out = row.clone();
                out[idx] = String::new();
                expanded.push(out);
                continue;
            }
            for value in cell.split(delimiter) {
                let mut out = row.clone();
                out[idx] = value.trim().to_string();
                expanded.push(out);
            }
        }
        rows = expanded;
    }

    tracing::debug!(
        input_rows = df.height(),
        output_rows = rows.len(),
        columns = ?split_columns,
        "split multi-valued columns"
    );
    Ok(frame_from_rows(&headers, &rows)?)
}

/// Stack a wide table into long format.
///
/// Produces one row per (key, value column, value) with the columns
/// (`key_column`, `CODE`, `CODE_COLUMN`). Rows whose value is null or empty
/// are dropped; key values are preserved verbatim, never deduplicated.
pub fn to_long_format(df: &DataFrame, key_column: &str, value_columns: &[String]) -> Result<DataFrame> {
    let (headers, rows) = frame_to_rows(df)?;
    let key_idx = column_index(&headers, key_column)?;
    let mut value_indices = Vec::with_capacity(value_columns.len());
    for name in value_columns {
        value_indices.push((name.clone(), column_index(&headers, name)?));
    }

    let mut long_rows = Vec::new();
    for row in &rows {
        for (name, idx) in &value_indices {
            let value = row[*idx].trim();
            if value.is_empty() {
                continue;
            }
            long_rows.push(vec![
                row[key_idx].clone(),
                value.to_string(),
                name.clone(),
            ]);
        }
    }

    let long_headers = vec![
        key_column.to_string(),
        columns::CODE.to_string(),
        columns::CODE_COLUMN.to_string(),
    ];
    Ok(frame_from_rows(&long_headers, &long_rows)?)
}

/// Collapse a long table back into wide format.
///
/// Produces one row per distinct key with one column per distinct observed
/// variable name (sorted), in key first-seen order. The first observed
/// value wins when a (key, variable) pair repeats; absent cells become
/// empty strings.
pub fn to_wide_format(
    df: &DataFrame,
    key_column: &str,
    variable_column: &str,
    value_column: &str,
) -> Result<DataFrame> {
    let (headers, rows) = frame_to_rows(df)?;
    let key_idx = column_index(&headers, key_column)?;
    let var_idx = column_index(&headers, variable_column)?;
    let val_idx = column_index(&headers, value_column)?;

    let mut key_order: Vec<String> = Vec::new();
    let mut cells: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
    let mut variables: BTreeSet<String> = BTreeSet::new();

    for row in &rows {
        let key = &row[key_idx];
        let variable = &row[var_idx];
        let value = &row[val_idx];

        variables.insert(variable.clone());
        let entry = cells.entry(key.clone()).or_insert_with(|| {
            key_order.push(key.clone());
            BTreeMap::new()
        });
        entry.entry(variable.clone()).or_insert_with(|| value.clone());
    }

    let mut wide_headers = Vec::with_capacity(variables.len() + 1);
    wide_headers.push(key_column.to_string());
    wide_headers.extend(variables.iter().cloned());

    let mut wide_rows = Vec::with_capacity(key_order.len());
    for key in &key_order {
        let row_cells = &cells[key];
        let mut row = Vec::with_capacity(wide_headers.len());
        row.push(key.clone());
        for variable in &variables {
            row.push(row_cells.get(variable).cloned().unwrap_or_default());
        }
        wide_rows.push(row);
    }

    Ok(frame_from_rows(&wide_headers, &wide_rows)?)
}
