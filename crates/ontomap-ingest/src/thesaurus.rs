//! UMLS thesaurus reference file loading.
//!
//! MRCONSO.RRF and MRSTY.RRF are pipe-delimited without headers. Only the
//! fields named by the positional schemas are kept; rows shorter than the
//! schema requires are a format error, not silently skipped.

use std::collections::BTreeSet;
use std::path::Path;

use polars::prelude::{Column, DataFrame};

use ontomap_model::{ConceptTableSchema, SemanticTypeSchema};

use crate::error::{IngestError, Result};

fn delimited_reader(path: &Path) -> Result<csv::Reader<std::fs::File>> {
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

    csv::ReaderBuilder::new()
        .delimiter(b'|')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_path(path)
        .map_err(|e| IngestError::SourceFormat {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

/// Load the thesaurus concept table (MRCONSO.RRF layout).
///
/// Keeps the (CUI, SAB, CODE) triple per row, drops rows whose code equals
/// the `NOCODE` sentinel, and deduplicates. The returned frame carries the
/// columns `UMLS_CUI`, `UMLS_SAB`, `UMLS_CODE`.
pub fn read_concept_table(path: &Path) -> Result<DataFrame> {
    let schema = ConceptTableSchema::MRCONSO;
    let mut reader = delimited_reader(path)?;

    let mut seen: BTreeSet<(String, String, String)> = BTreeSet::new();
    let mut row_count = 0usize;
    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(|e| IngestError::SourceFormat {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        row_count += 1;

        if record.len() < schema.min_fields() {
            return Err(IngestError::SourceFormat {
                path: path.to_path_buf(),
                message: format!(
                    "row {} has {} fields, expected at least {}",
                    idx + 1,
                    record.len(),
                    schema.min_fields()
                ),
            });
        }

        let code = record[schema.code.index].trim();
        if code == schema.no_code_sentinel {
            continue;
        }
        seen.insert((
            record[schema.concept_id.index].trim().to_string(),
            record[schema.vocabulary.index].trim().to_string(),
            code.to_string(),
        ));
    }

    if row_count == 0 {
        return Err(IngestError::EmptyInput {
            path: path.to_path_buf(),
        });
    }

    let mut cuis = Vec::with_capacity(seen.len());
    let mut sabs = Vec::with_capacity(seen.len());
    let mut codes = Vec::with_capacity(seen.len());
    for (cui, sab, code) in seen {
        cuis.push(cui);
        sabs.push(sab);
        codes.push(code);
    }

    let df = DataFrame::new(vec![
        Column::new(schema.concept_id.name.into(), cuis),
        Column::new(schema.vocabulary.name.into(), sabs),
        Column::new(schema.code.name.into(), codes),
    ])?;

    tracing::info!(
        path = %path.display(),
        rows = df.height(),
        "loaded thesaurus concept table"
    );
    Ok(df)
}

/// Load the thesaurus semantic-type table (MRSTY.RRF layout).
///
/// Keeps the (CUI, semantic type) pair per row and deduplicates. The
/// returned frame carries the columns `UMLS_CUI`, `UMLS_SEM_TYPE`.
pub fn read_semantic_type_table(path: &Path) -> Result<DataFrame> {
    let schema = SemanticTypeSchema::MRSTY;
    let mut reader = delimited_reader(path)?;

    let mut seen: BTreeSet<(String, String)> = BTreeSet::new();
    let mut row_count = 0usize;
    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(|e| IngestError::SourceFormat {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        row_count += 1;

        if record.len() < schema.min_fields() {
            return Err(IngestError::SourceFormat {
                path: path.to_path_buf(),
                message: format!(
                    "row {} has {} fields, expected at least {}",
                    idx + 1,
                    record.len(),
                    schema.min_fields()
                ),
            });
        }

        seen.insert((
            record[schema.concept_id.index].trim().to_string(),
            record[schema.semantic_type.index].trim().to_string(),
        ));
    }

    if row_count == 0 {
        return Err(IngestError::EmptyInput {
            path: path.to_path_buf(),
        });
    }

    let mut cuis = Vec::with_capacity(seen.len());
    let mut types = Vec::with_capacity(seen.len());
    for (cui, sty) in seen {
        cuis.push(cui);
        types.push(sty);
    }

    let df = DataFrame::new(vec![
        Column::new(schema.concept_id.name.into(), cuis),
        Column::new(schema.semantic_type.name.into(), types),
    ])?;

    tracing::info!(
        path = %path.display(),
        rows = df.height(),
        "loaded thesaurus semantic-type table"
    );
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ontomap_common::column_strings;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{content}").unwrap();
        file
    }

    fn mrconso_row(cui: &str, sab: &str, code: &str) -> String {
        // 18-field MRCONSO row with only the fields under test populated
        let mut fields = vec![""; 18];
        fields[0] = cui;
        fields[11] = sab;
        fields[13] = code;
        fields.join("|")
    }

    #[test]
    fn concept_table_keeps_selected_fields() {
        let content = format!(
            "{}\n{}\n",
            mrconso_row("C0011849", "ICD9CM", "250.00"),
            mrconso_row("C0011849", "SNOMEDCT_US", "73211009")
        );
        let file = create_temp_file(&content);
        let df = read_concept_table(file.path()).unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(
            column_strings(&df, "UMLS_CUI").unwrap(),
            vec!["C0011849", "C0011849"]
        );
        let codes = column_strings(&df, "UMLS_CODE").unwrap();
        assert!(codes.contains(&"250.00".to_string()));
        assert!(codes.contains(&"73211009".to_string()));
    }

    #[test]
    fn concept_table_drops_nocode_and_duplicates() {
        let content = format!(
            "{}\n{}\n{}\n",
            mrconso_row("C0000001", "ICD9CM", "123"),
            mrconso_row("C0000001", "ICD9CM", "123"),
            mrconso_row("C0000002", "MSH", "NOCODE")
        );
        let file = create_temp_file(&content);
        let df = read_concept_table(file.path()).unwrap();

        assert_eq!(df.height(), 1);
        assert_eq!(column_strings(&df, "UMLS_CODE").unwrap(), vec!["123"]);
    }

    #[test]
    fn concept_table_rejects_short_rows() {
        let file = create_temp_file("C0000001|ICD9CM|123\n");
        let result = read_concept_table(file.path());
        assert!(matches!(result, Err(IngestError::SourceFormat { .. })));
    }

    #[test]
    fn concept_table_rejects_empty_file() {
        let file = create_temp_file("");
        let result = read_concept_table(file.path());
        assert!(matches!(result, Err(IngestError::EmptyInput { .. })));
    }

    #[test]
    fn concept_table_rejects_missing_file() {
        let result = read_concept_table(Path::new("/nonexistent/MRCONSO.RRF"));
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }

    #[test]
    fn semantic_type_table_keeps_pairs() {
        let file = create_temp_file(
            "C0011849|T047|B2.2.1.2.1|Disease or Syndrome|AT17683839|256|\n\
             C0011849|T047|B2.2.1.2.1|Disease or Syndrome|AT17683839|256|\n",
        );
        let df = read_semantic_type_table(file.path()).unwrap();

        assert_eq!(df.height(), 1);
        assert_eq!(
            column_strings(&df, "UMLS_SEM_TYPE").unwrap(),
            vec!["Disease or Syndrome"]
        );
    }

    #[test]
    fn semantic_type_table_rejects_short_rows() {
        let file = create_temp_file("C0011849|T047\n");
        let result = read_semantic_type_table(file.path());
        assert!(matches!(result, Err(IngestError::SourceFormat { .. })));
    }
}
