//! Ontology dictionary loading.
//!
//! The dictionary is produced upstream by ontology ingestion and arrives
//! here as JSON: ontology identifier to annotation type to literal string
//! to the owning term URIs.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use ontomap_model::OntologyDictionary;

use crate::error::{IngestError, Result};

/// Load a serialized [`OntologyDictionary`] from a JSON file.
///
/// # Errors
///
/// - [`IngestError::FileNotFound`] when `path` does not exist.
/// - [`IngestError::EmptyInput`] for a 0-byte file or a dictionary with no
///   ontologies.
/// - [`IngestError::SourceFormat`] when the JSON does not match the
///   dictionary shape.
pub fn read_ontology_dictionary(path: &Path) -> Result<OntologyDictionary> {
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

    let file = File::open(path).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let dictionary: OntologyDictionary =
        serde_json::from_reader(BufReader::new(file)).map_err(|e| IngestError::SourceFormat {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    if dictionary.is_empty() {
        return Err(IngestError::EmptyInput {
            path: path.to_path_buf(),
        });
    }

    tracing::info!(
        path = %path.display(),
        ontologies = dictionary.len(),
        "loaded ontology dictionary"
    );
    Ok(dictionary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ontomap_model::AnnotationType;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{content}").unwrap();
        file
    }

    #[test]
    fn loads_nested_dictionary() {
        let file = create_temp_file(
            r#"{
                "hp": {
                    "dbxref": {"ICD9:123": ["http://purl.obolibrary.org/obo/HP_0000001"]},
                    "label": {"short stature": ["http://purl.obolibrary.org/obo/HP_0004322"]}
                }
            }"#,
        );
        let dictionary = read_ontology_dictionary(file.path()).unwrap();

        assert_eq!(dictionary.len(), 1);
        let flat = dictionary.flatten(AnnotationType::DbXref).unwrap();
        assert!(flat.contains_key("ICD9:123"));
    }

    #[test]
    fn rejects_empty_file() {
        let file = create_temp_file("");
        let result = read_ontology_dictionary(file.path());
        assert!(matches!(result, Err(IngestError::EmptyInput { .. })));
    }

    #[test]
    fn rejects_dictionary_with_no_ontologies() {
        let file = create_temp_file("{}");
        let result = read_ontology_dictionary(file.path());
        assert!(matches!(result, Err(IngestError::EmptyInput { .. })));
    }

    #[test]
    fn rejects_malformed_json() {
        let file = create_temp_file(r#"{"hp": ["not", "a", "record"]}"#);
        let result = read_ontology_dictionary(file.path());
        assert!(matches!(result, Err(IngestError::SourceFormat { .. })));
    }

    #[test]
    fn rejects_missing_file() {
        let result = read_ontology_dictionary(Path::new("/nonexistent/dictionary.json"));
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }
}
