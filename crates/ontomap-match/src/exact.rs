//! Exact string matching against ontology labels and synonyms.

use std::collections::{BTreeMap, BTreeSet};

use polars::prelude::DataFrame;

use ontomap_common::{frame_from_rows, frame_to_rows};
use ontomap_model::{
    AnnotationType, DictionaryError, Evidence, OntologyDictionary, columns, ontology_acronym,
};

use crate::error::{MatchError, Result};

/// Normalize a string for exact comparison.
///
/// Trims, lowercases, and collapses internal whitespace runs to single
/// spaces.
pub fn normalize_string(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Exact matching of clinical strings against dictionary strings.
pub trait ExactStringMatcher {
    /// Join the `CODE` column of a long-format table against the dictionary
    /// strings, appending `ONT_URI`, `ONT`, and `EVIDENCE` per match.
    fn match_strings(&self, long_df: &DataFrame) -> Result<DataFrame>;
}

/// Exact matcher over the flattened label and synonym maps of an
/// [`OntologyDictionary`].
///
/// Comparison is on [`normalize_string`] keys on both sides. A dictionary
/// missing one of the two annotation types still works; a dictionary with
/// neither is a configuration error.
#[derive(Debug, Clone)]
pub struct LabelSynonymMatcher {
    /// normalized string -> (annotation type, raw dictionary string, URI)
    entries: BTreeMap<String, Vec<(AnnotationType, String, String)>>,
}

impl LabelSynonymMatcher {
    pub fn from_dictionary(dictionary: &OntologyDictionary) -> Result<Self> {
        let mut entries: BTreeMap<String, Vec<(AnnotationType, String, String)>> = BTreeMap::new();

        for annotation in [AnnotationType::Label, AnnotationType::Synonym] {
            let flattened = match dictionary.flatten(annotation) {
                Ok(map) => map,
                Err(DictionaryError::AnnotationTypeMissing { .. }) => continue,
                Err(err) => return Err(err.into()),
            };
            for (value, uris) in &flattened {
                let entry = entries.entry(normalize_string(value)).or_default();
                for uri in uris {
                    entry.push((annotation, value.clone(), uri.clone()));
                }
            }
        }

        if entries.is_empty() {
            return Err(MatchError::NoStringAnnotations);
        }

        tracing::debug!(strings = entries.len(), "built label/synonym index");
        Ok(Self { entries })
    }

    /// All (raw dictionary string, URI) pairs, for downstream similarity
    /// matching.
    pub fn dictionary_strings(&self) -> Vec<(String, String)> {
        let mut seen: BTreeSet<(String, String)> = BTreeSet::new();
        for hits in self.entries.values() {
            for (_, raw, uri) in hits {
                seen.insert((raw.clone(), uri.clone()));
            }
        }
        seen.into_iter().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ExactStringMatcher for LabelSynonymMatcher {
    fn match_strings(&self, long_df: &DataFrame) -> Result<DataFrame> {
        let (headers, rows) = frame_to_rows(long_df)?;
        let code_idx = headers
            .iter()
            .position(|h| h == columns::CODE)
            .ok_or_else(|| MatchError::MissingColumn {
                column: columns::CODE.to_string(),
            })?;

        let mut out_headers = headers.clone();
        out_headers.push(columns::ONT_URI.to_string());
        out_headers.push(columns::ONT.to_string());
        out_headers.push(columns::EVIDENCE.to_string());

        let mut seen: BTreeSet<Vec<String>> = BTreeSet::new();
        let mut out_rows = Vec::new();
        for row in &rows {
            let normalized = normalize_string(&row[code_idx]);
            let Some(hits) = self.entries.get(&normalized) else {
                continue;
            };
            for (annotation, _, uri) in hits {
                let mut out = row.clone();
                out.push(uri.clone());
                out.push(ontology_acronym(uri));
                out.push(
                    Evidence::ExactString {
                        annotation: *annotation,
                    }
                    .to_string(),
                );
                if seen.insert(out.clone()) {
                    out_rows.push(out);
                }
            }
        }

        tracing::debug!(
            input_rows = rows.len(),
            matched_rows = out_rows.len(),
            "exact string matching"
        );
        Ok(frame_from_rows(&out_headers, &out_rows)?)
    }
}
