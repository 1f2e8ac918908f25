//! Clinical concept table loading.
//!
//! Clinical domain files arrive as delimited text with a header row, either
//! comma- or tab-separated. The separator is sniffed from the header line
//! and the other separator is retried when parsing fails. Every cell is
//! loaded as a string; codes like `008.45` must never be re-typed as
//! numbers.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use polars::prelude::*;

use crate::error::{IngestError, Result};

/// Pick the more plausible separator from the header line.
fn detect_separator(header_line: &str) -> u8 {
    let tabs = header_line.matches('\t').count();
    let commas = header_line.matches(',').count();
    if tabs > commas { b'\t' } else { b',' }
}

fn read_first_line(path: &Path) -> Result<String> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    let mut line = String::new();
    BufReader::new(file)
        .read_line(&mut line)
        .map_err(|e| IngestError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
    // Strip BOM if present
    Ok(line.strip_prefix('\u{feff}').unwrap_or(&line).to_string())
}

fn read_with_separator(path: &Path, separator: u8) -> PolarsResult<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        // 0 disables schema inference so every column stays a string
        .with_infer_schema_length(Some(0))
        .with_parse_options(CsvParseOptions::default().with_separator(separator))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
}

/// Load a clinical concept table into an all-string DataFrame.
///
/// # Errors
///
/// - [`IngestError::FileNotFound`] when `path` does not exist.
/// - [`IngestError::EmptyInput`] for a 0-byte or header-only file.
/// - [`IngestError::SourceFormat`] when the file parses under neither the
///   comma nor the tab separator.
pub fn read_clinical_table(path: &Path) -> Result<DataFrame> {
    let metadata = std::fs::metadata(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    if metadata.len() == 0 {
        return Err(IngestError::EmptyInput {
            path: path.to_path_buf(),
        });
    }

    let header_line = read_first_line(path)?;
    let primary = detect_separator(&header_line);
    let secondary = if primary == b',' { b'\t' } else { b',' };

    let df = match read_with_separator(path, primary) {
        Ok(df) => df,
        Err(primary_err) => {
            tracing::debug!(
                path = %path.display(),
                error = %primary_err,
                "retrying clinical table with fallback separator"
            );
            read_with_separator(path, secondary).map_err(|fallback_err| {
                IngestError::SourceFormat {
                    path: path.to_path_buf(),
                    message: format!(
                        "not parseable as comma- or tab-delimited: {primary_err}; {fallback_err}"
                    ),
                }
            })?
        }
    };

    if df.height() == 0 {
        return Err(IngestError::EmptyInput {
            path: path.to_path_buf(),
        });
    }

    tracing::info!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "loaded clinical table"
    );
    Ok(df)
}
