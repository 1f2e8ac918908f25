//! End-to-end tests for the staged annotation pipeline.

use polars::prelude::{Column, DataFrame};

use ontomap_common::column_strings;
use ontomap_core::{AnnotatorConfig, ConceptAnnotator};
use ontomap_model::{AnnotationType, OntologyDictionary, OntologyRecord};

fn dictionary() -> OntologyDictionary {
    let mut hp = OntologyRecord::default();
    hp.insert(
        AnnotationType::DbXref,
        "ICD9:428.0",
        "http://purl.obolibrary.org/obo/HP_0001635",
    );
    hp.insert(
        AnnotationType::Label,
        "Short stature",
        "http://purl.obolibrary.org/obo/HP_0004322",
    );
    hp.insert(
        AnnotationType::Synonym,
        "decreased body height",
        "http://purl.obolibrary.org/obo/HP_0004322",
    );
    let mut mondo = OntologyRecord::default();
    mondo.insert(
        AnnotationType::DbXref,
        "SNOMED:84114007",
        "http://purl.obolibrary.org/obo/MONDO_0005009",
    );
    let mut dictionary = OntologyDictionary::new();
    dictionary.insert_ontology("hp", hp);
    dictionary.insert_ontology("mondo", mondo);
    dictionary
}

fn clinical() -> DataFrame {
    DataFrame::new(vec![
        Column::new("CONCEPT_ID".into(), vec!["1", "2", "3"]),
        Column::new("CONCEPT_SOURCE_CODE".into(), vec!["428.0", "84114007", "999"]),
        Column::new(
            "CONCEPT_LABEL".into(),
            vec!["Short stature", "heart failure", "short statures"],
        ),
        Column::new("ANCESTOR_SOURCE_CODE".into(), vec!["428.0", "", ""]),
    ])
    .unwrap()
}

fn rows_with(df: &DataFrame, column: &str, value: &str) -> Vec<usize> {
    column_strings(df, column)
        .unwrap()
        .iter()
        .enumerate()
        .filter(|(_, v)| v.as_str() == value)
        .map(|(idx, _)| idx)
        .collect()
}

// ============================================================================
// Cross-reference matching
// ============================================================================

#[test]
fn codes_match_across_vocabularies() {
    let config = AnnotatorConfig::new("CONCEPT_ID", vec!["CONCEPT_SOURCE_CODE".to_string()]);
    let annotator = ConceptAnnotator::new(clinical(), &dictionary(), config).unwrap();

    let outcome = annotator.annotate().unwrap();
    let evidence = column_strings(&outcome.annotations, "EVIDENCE").unwrap();
    assert!(evidence.contains(&"DbXRef_ICD9".to_string()));
    assert!(evidence.contains(&"DbXRef_SNOMED".to_string()));

    let onts = column_strings(&outcome.annotations, "ONT").unwrap();
    assert!(onts.contains(&"HP".to_string()));
    assert!(onts.contains(&"MONDO".to_string()));
}

#[test]
fn code_rows_carry_empty_score_and_concept_level() {
    let config = AnnotatorConfig::new("CONCEPT_ID", vec!["CONCEPT_SOURCE_CODE".to_string()]);
    let annotator = ConceptAnnotator::new(clinical(), &dictionary(), config).unwrap();

    let outcome = annotator.annotate().unwrap();
    let scores = column_strings(&outcome.annotations, "SCORE").unwrap();
    let levels = column_strings(&outcome.annotations, "LEVEL").unwrap();
    for idx in rows_with(&outcome.annotations, "EVIDENCE", "DbXRef_ICD9") {
        assert_eq!(scores[idx], "");
        assert_eq!(levels[idx], "CONCEPT");
    }
}

#[test]
fn unmatched_codes_are_reported() {
    let config = AnnotatorConfig::new("CONCEPT_ID", vec!["CONCEPT_SOURCE_CODE".to_string()]);
    let annotator = ConceptAnnotator::new(clinical(), &dictionary(), config).unwrap();

    let outcome = annotator.annotate().unwrap();
    let codes = column_strings(&outcome.unmatched, "CODE").unwrap();
    assert!(codes.contains(&"999".to_string()));

    let columns = column_strings(&outcome.unmatched, "CODE_COLUMN").unwrap();
    let idx = codes.iter().position(|c| c == "999").unwrap();
    assert_eq!(columns[idx], "CONCEPT_SOURCE_CODE");
}

// ============================================================================
// String matching
// ============================================================================

#[test]
fn exact_label_match_produces_exact_string_evidence() {
    let config = AnnotatorConfig::new("CONCEPT_ID", vec!["CONCEPT_SOURCE_CODE".to_string()])
        .with_concept_strings(vec!["CONCEPT_LABEL".to_string()]);
    let annotator = ConceptAnnotator::new(clinical(), &dictionary(), config).unwrap();

    let outcome = annotator.annotate().unwrap();
    let matched = rows_with(&outcome.annotations, "EVIDENCE", "ExactString_Label");
    assert_eq!(matched.len(), 1);

    let uris = column_strings(&outcome.annotations, "ONT_URI").unwrap();
    assert_eq!(uris[matched[0]], "http://purl.obolibrary.org/obo/HP_0004322");
}

#[test]
fn multivalued_strings_are_split_before_matching() {
    let clinical = DataFrame::new(vec![
        Column::new("CONCEPT_ID".into(), vec!["1"]),
        Column::new("CONCEPT_SOURCE_CODE".into(), vec!["428.0"]),
        Column::new(
            "CONCEPT_SYNONYM".into(),
            vec!["short stature | decreased body height"],
        ),
    ])
    .unwrap();

    let config = AnnotatorConfig::new("CONCEPT_ID", vec!["CONCEPT_SOURCE_CODE".to_string()])
        .with_concept_strings(vec!["CONCEPT_SYNONYM".to_string()]);
    let annotator = ConceptAnnotator::new(clinical, &dictionary(), config).unwrap();

    let outcome = annotator.annotate().unwrap();
    let evidence = column_strings(&outcome.annotations, "EVIDENCE").unwrap();
    assert!(evidence.contains(&"ExactString_Label".to_string()));
    assert!(evidence.contains(&"ExactString_Synonym".to_string()));
}

#[test]
fn near_miss_strings_fall_through_to_similarity() {
    let config = AnnotatorConfig::new("CONCEPT_ID", vec!["CONCEPT_SOURCE_CODE".to_string()])
        .with_concept_strings(vec!["CONCEPT_LABEL".to_string()])
        .with_similarity_threshold(0.9);
    let annotator = ConceptAnnotator::new(clinical(), &dictionary(), config).unwrap();

    let outcome = annotator.annotate().unwrap();
    // "short statures" has no exact match but is close to "Short stature"
    let matched = rows_with(&outcome.annotations, "EVIDENCE", "Similarity_JaroWinkler");
    assert!(!matched.is_empty());

    let codes = column_strings(&outcome.annotations, "CODE").unwrap();
    let scores = column_strings(&outcome.annotations, "SCORE").unwrap();
    for idx in matched {
        assert_eq!(codes[idx], "short statures");
        let score: f64 = scores[idx].parse().unwrap();
        assert!(score >= 0.9 && score <= 1.0);
    }
}

#[test]
fn strings_missed_by_every_stage_land_in_unmatched() {
    let config = AnnotatorConfig::new("CONCEPT_ID", vec!["CONCEPT_SOURCE_CODE".to_string()])
        .with_concept_strings(vec!["CONCEPT_LABEL".to_string()])
        .with_similarity_threshold(0.99);
    let annotator = ConceptAnnotator::new(clinical(), &dictionary(), config).unwrap();

    let outcome = annotator.annotate().unwrap();
    let codes = column_strings(&outcome.unmatched, "CODE").unwrap();
    assert!(codes.contains(&"heart failure".to_string()));
    assert!(codes.contains(&"short statures".to_string()));
}

// ============================================================================
// Granularity levels
// ============================================================================

#[test]
fn ancestor_level_results_are_kept_alongside_concept_results() {
    let config = AnnotatorConfig::new("CONCEPT_ID", vec!["CONCEPT_SOURCE_CODE".to_string()])
        .with_ancestor_codes(vec!["ANCESTOR_SOURCE_CODE".to_string()]);
    let annotator = ConceptAnnotator::new(clinical(), &dictionary(), config).unwrap();

    let outcome = annotator.annotate().unwrap();
    let levels = column_strings(&outcome.annotations, "LEVEL").unwrap();
    assert!(levels.contains(&"CONCEPT".to_string()));
    assert!(levels.contains(&"ANCESTOR".to_string()));

    // concept "1" resolves at both levels; neither suppresses the other
    let keys = column_strings(&outcome.annotations, "CONCEPT_ID").unwrap();
    let concept_hit = keys
        .iter()
        .zip(&levels)
        .any(|(k, l)| k == "1" && l == "CONCEPT");
    let ancestor_hit = keys
        .iter()
        .zip(&levels)
        .any(|(k, l)| k == "1" && l == "ANCESTOR");
    assert!(concept_hit && ancestor_hit);
}

// ============================================================================
// Thesaurus enrichment
// ============================================================================

#[test]
fn thesaurus_aliases_feed_the_cross_reference_stage() {
    // The clinical code is unknown to the dictionary, but its UMLS CUI is a
    // cross-reference target.
    let mut record = OntologyRecord::default();
    record.insert(
        AnnotationType::DbXref,
        "UMLS:C0018801",
        "http://purl.obolibrary.org/obo/MONDO_0005009",
    );
    let mut dictionary = OntologyDictionary::new();
    dictionary.insert_ontology("mondo", record);

    let clinical = DataFrame::new(vec![
        Column::new("CONCEPT_ID".into(), vec!["1"]),
        Column::new("CONCEPT_SOURCE_CODE".into(), vec!["I50.9"]),
    ])
    .unwrap();
    let concepts = DataFrame::new(vec![
        Column::new("UMLS_CUI".into(), vec!["C0018801"]),
        Column::new("UMLS_SAB".into(), vec!["ICD10CM"]),
        Column::new("UMLS_CODE".into(), vec!["I50.9"]),
    ])
    .unwrap();

    let config = AnnotatorConfig::new("CONCEPT_ID", vec!["CONCEPT_SOURCE_CODE".to_string()]);
    let annotator = ConceptAnnotator::new(clinical, &dictionary, config)
        .unwrap()
        .with_thesaurus(concepts, None)
        .unwrap();

    let outcome = annotator.annotate().unwrap();
    let codes = column_strings(&outcome.annotations, "CODE").unwrap();
    assert!(codes.contains(&"C0018801".to_string()));
    assert!(outcome.unmatched.height() == 0);
}

#[test]
fn codes_without_thesaurus_coverage_are_still_reported_unmatched() {
    let clinical = DataFrame::new(vec![
        Column::new("CONCEPT_ID".into(), vec!["1"]),
        Column::new("CONCEPT_SOURCE_CODE".into(), vec!["no-such-code"]),
    ])
    .unwrap();
    let concepts = DataFrame::new(vec![
        Column::new("UMLS_CUI".into(), vec!["C0018801"]),
        Column::new("UMLS_SAB".into(), vec!["ICD10CM"]),
        Column::new("UMLS_CODE".into(), vec!["I50.9"]),
    ])
    .unwrap();

    let config = AnnotatorConfig::new("CONCEPT_ID", vec!["CONCEPT_SOURCE_CODE".to_string()]);
    let annotator = ConceptAnnotator::new(clinical, &dictionary(), config)
        .unwrap()
        .with_thesaurus(concepts, None)
        .unwrap();

    let outcome = annotator.annotate().unwrap();
    assert_eq!(outcome.annotations.height(), 0);
    let codes = column_strings(&outcome.unmatched, "CODE").unwrap();
    assert_eq!(codes, vec!["no-such-code"]);
}

// ============================================================================
// Output shape
// ============================================================================

#[test]
fn annotation_table_has_the_documented_columns() {
    let config = AnnotatorConfig::new("CONCEPT_ID", vec!["CONCEPT_SOURCE_CODE".to_string()]);
    let annotator = ConceptAnnotator::new(clinical(), &dictionary(), config).unwrap();

    let outcome = annotator.annotate().unwrap();
    let names: Vec<String> = outcome
        .annotations
        .get_column_names()
        .iter()
        .map(|n| n.as_str().to_owned())
        .collect();
    assert_eq!(
        names,
        vec![
            "CONCEPT_ID",
            "CODE",
            "CODE_COLUMN",
            "EVIDENCE",
            "ONT",
            "ONT_URI",
            "SCORE",
            "LEVEL"
        ]
    );
}

#[test]
fn repeated_runs_are_deterministic() {
    let config = AnnotatorConfig::new("CONCEPT_ID", vec!["CONCEPT_SOURCE_CODE".to_string()])
        .with_concept_strings(vec!["CONCEPT_LABEL".to_string()]);
    let annotator = ConceptAnnotator::new(clinical(), &dictionary(), config).unwrap();

    let first = annotator.annotate().unwrap();
    let second = annotator.annotate().unwrap();
    assert_eq!(first.annotations, second.annotations);
    assert_eq!(first.unmatched, second.unmatched);
}
