//! Cross-reference (dbxref) matching.

use std::collections::{BTreeMap, BTreeSet};

use polars::prelude::DataFrame;

use ontomap_common::{frame_from_rows, frame_to_rows};
use ontomap_model::{Evidence, OntologyDictionary, columns, ontology_acronym, xref_code};

use crate::error::{MatchError, Result};

/// Exact-code matcher over the flattened ontology cross-reference
/// dictionary.
///
/// Built once from an [`OntologyDictionary`]; lookups key on the code
/// portion of each cross-reference (`ICD9:123` is found by code `123`).
#[derive(Debug, Clone)]
pub struct DbXrefMatcher {
    /// code -> (full cross-reference, term URI) pairs
    by_code: BTreeMap<String, Vec<(String, String)>>,
}

impl DbXrefMatcher {
    /// Flatten the dictionary's dbxref annotations and index them by code.
    pub fn from_dictionary(dictionary: &OntologyDictionary) -> Result<Self> {
        let flattened = dictionary.flatten(ontomap_model::AnnotationType::DbXref)?;

        let mut by_code: BTreeMap<String, Vec<(String, String)>> = BTreeMap::new();
        for (dbxref, uris) in &flattened {
            let code = xref_code(dbxref).to_string();
            let entry = by_code.entry(code).or_default();
            for uri in uris {
                entry.push((dbxref.clone(), uri.clone()));
            }
        }

        tracing::debug!(codes = by_code.len(), "built cross-reference index");
        Ok(Self { by_code })
    }

    /// Number of distinct codes in the index.
    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }

    /// Inner-join a long-format table against the cross-reference index on
    /// its `CODE` column.
    ///
    /// Every match replicates the input row and appends `DBXREF`,
    /// `ONT_URI`, `ONT`, and `EVIDENCE`. Codes with no dictionary entry
    /// produce no output row; the result is deduplicated.
    pub fn match_codes(&self, long_df: &DataFrame) -> Result<DataFrame> {
        let (headers, rows) = frame_to_rows(long_df)?;
        let code_idx = headers
            .iter()
            .position(|h| h == columns::CODE)
            .ok_or_else(|| MatchError::MissingColumn {
                column: columns::CODE.to_string(),
            })?;

        let mut out_headers = headers.clone();
        out_headers.push(columns::DBXREF.to_string());
        out_headers.push(columns::ONT_URI.to_string());
        out_headers.push(columns::ONT.to_string());
        out_headers.push(columns::EVIDENCE.to_string());

        let mut seen: BTreeSet<Vec<String>> = BTreeSet::new();
        let mut out_rows = Vec::new();
        for row in &rows {
            let Some(hits) = self.by_code.get(&row[code_idx]) else {
                continue;
            };
            for (dbxref, uri) in hits {
                let mut out = row.clone();
                out.push(dbxref.clone());
                out.push(uri.clone());
                out.push(ontology_acronym(uri));
                out.push(Evidence::from_dbxref(dbxref).to_string());
                if seen.insert(out.clone()) {
                    out_rows.push(out);
                }
            }
        }

        tracing::debug!(
            input_rows = rows.len(),
            matched_rows = out_rows.len(),
            "cross-reference matching"
        );
        Ok(frame_from_rows(&out_headers, &out_rows)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ontomap_common::column_strings;
    use ontomap_model::{AnnotationType, OntologyRecord};
    use polars::prelude::Column;

    fn dictionary() -> OntologyDictionary {
        let mut hp = OntologyRecord::default();
        hp.insert(
            AnnotationType::DbXref,
            "ICD9:123",
            "http://purl.obolibrary.org/obo/HP_001",
        );
        let mut mondo = OntologyRecord::default();
        mondo.insert(
            AnnotationType::DbXref,
            "SNOMED:999",
            "http://purl.obolibrary.org/obo/MONDO_002",
        );
        let mut dictionary = OntologyDictionary::new();
        dictionary.insert_ontology("hp", hp);
        dictionary.insert_ontology("mondo", mondo);
        dictionary
    }

    fn long_frame(codes: Vec<&str>) -> DataFrame {
        let keys: Vec<String> = (1..=codes.len()).map(|i| i.to_string()).collect();
        DataFrame::new(vec![
            Column::new("CONCEPT_ID".into(), keys),
            Column::new("CODE".into(), codes),
            Column::new("CODE_COLUMN".into(), vec!["SOURCE_CODE"; 2]),
        ])
        .unwrap()
    }

    #[test]
    fn matches_code_and_derives_evidence() {
        let matcher = DbXrefMatcher::from_dictionary(&dictionary()).unwrap();
        let result = matcher.match_codes(&long_frame(vec!["123", "no-match"])).unwrap();

        assert_eq!(result.height(), 1);
        assert_eq!(column_strings(&result, "ONT").unwrap(), vec!["HP"]);
        assert_eq!(
            column_strings(&result, "EVIDENCE").unwrap(),
            vec!["DbXRef_ICD9"]
        );
        assert_eq!(
            column_strings(&result, "ONT_URI").unwrap(),
            vec!["http://purl.obolibrary.org/obo/HP_001"]
        );
    }

    #[test]
    fn unmatched_codes_produce_no_rows() {
        // pk 1 has code covered by the dictionary, pk 2 does not
        let matcher = DbXrefMatcher::from_dictionary(&dictionary()).unwrap();
        let result = matcher.match_codes(&long_frame(vec!["123", "B"])).unwrap();

        assert_eq!(result.height(), 1);
        assert_eq!(column_strings(&result, "CONCEPT_ID").unwrap(), vec!["1"]);
    }

    #[test]
    fn ambiguous_code_fans_out() {
        let mut dictionary = dictionary();
        let mut extra = OntologyRecord::default();
        extra.insert(
            AnnotationType::DbXref,
            "ICD10:123",
            "http://purl.obolibrary.org/obo/MONDO_003",
        );
        dictionary.insert_ontology("mondo2", extra);

        let matcher = DbXrefMatcher::from_dictionary(&dictionary).unwrap();
        let result = matcher.match_codes(&long_frame(vec!["123", "999"])).unwrap();

        // code 123 hits both ICD9:123 and ICD10:123; code 999 hits SNOMED:999
        assert_eq!(result.height(), 3);
        let evidence = column_strings(&result, "EVIDENCE").unwrap();
        assert!(evidence.contains(&"DbXRef_ICD9".to_string()));
        assert!(evidence.contains(&"DbXRef_ICD10".to_string()));
        assert!(evidence.contains(&"DbXRef_SNOMED".to_string()));
    }

    #[test]
    fn duplicate_input_rows_are_deduplicated() {
        let matcher = DbXrefMatcher::from_dictionary(&dictionary()).unwrap();
        let df = DataFrame::new(vec![
            Column::new("CONCEPT_ID".into(), vec!["1", "1"]),
            Column::new("CODE".into(), vec!["123", "123"]),
            Column::new("CODE_COLUMN".into(), vec!["SOURCE_CODE", "SOURCE_CODE"]),
        ])
        .unwrap();

        let result = matcher.match_codes(&df).unwrap();
        assert_eq!(result.height(), 1);
    }

    #[test]
    fn missing_code_column_fails() {
        let matcher = DbXrefMatcher::from_dictionary(&dictionary()).unwrap();
        let df = DataFrame::new(vec![Column::new("CONCEPT_ID".into(), vec!["1"])]).unwrap();

        let result = matcher.match_codes(&df);
        assert!(matches!(result, Err(MatchError::MissingColumn { .. })));
    }
}
