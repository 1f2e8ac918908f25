//! The multi-stage concept annotator.

use std::collections::{BTreeMap, BTreeSet};

use polars::prelude::DataFrame;

use ontomap_common::{column_strings, frame_from_rows};
use ontomap_match::{
    DbXrefMatcher, ExactStringMatcher, JaroWinklerScorer, LabelSynonymMatcher, SimilarityMatcher,
};
use ontomap_model::{OntologyDictionary, columns};
use ontomap_transform::{split_multivalued, to_long_format};

use crate::config::AnnotatorConfig;
use crate::error::{PipelineError, Result};

/// Thesaurus reference tables, loaded once and read-only thereafter.
#[derive(Debug, Clone)]
struct ThesaurusTables {
    concepts: DataFrame,
    semantic_types: Option<DataFrame>,
}

/// One reconciled annotation row, before assembly into the output frame.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct AnnotationRow {
    key: String,
    code: String,
    code_column: String,
    evidence: String,
    ont: String,
    uri: String,
    score: String,
}

/// Result of one pipeline run.
#[derive(Debug, Clone)]
pub struct AnnotationOutcome {
    /// Long-format annotation table: one row per (primary key, matched
    /// code/string, evidence, ontology acronym, URI, score, level).
    pub annotations: DataFrame,
    /// Inputs that matched in no stage: (primary key, value, source
    /// column, level). Reported separately, never silently lost.
    pub unmatched: DataFrame,
}

/// Maps clinical codes and strings to ontology terms.
///
/// Construction validates the configuration against the clinical table and
/// builds the matching indexes; [`ConceptAnnotator::annotate`] then runs
/// the staged pipeline. All inputs are immutable snapshots, so independent
/// annotator runs never interfere.
pub struct ConceptAnnotator {
    clinical: DataFrame,
    config: AnnotatorConfig,
    dbxref_matcher: DbXrefMatcher,
    string_matcher: Option<LabelSynonymMatcher>,
    thesaurus: Option<ThesaurusTables>,
}

impl ConceptAnnotator {
    /// Build an annotator over a clinical table and an ontology dictionary.
    ///
    /// Fails fast with a configuration error when a configured column is
    /// missing from the clinical table, when `concept_codes` is empty, or
    /// when ancestor strings are configured without ancestor codes. The
    /// exact-string index is only built when string columns are configured.
    pub fn new(
        clinical: DataFrame,
        dictionary: &OntologyDictionary,
        config: AnnotatorConfig,
    ) -> Result<Self> {
        if config.concept_codes.is_empty() {
            return Err(PipelineError::configuration(
                "concept_codes must name at least one column",
            ));
        }
        if config.ancestor_strings.is_some() && config.ancestor_codes.is_none() {
            return Err(PipelineError::configuration(
                "ancestor_strings configured without ancestor_codes",
            ));
        }

        let present: BTreeSet<String> = clinical
            .get_column_names()
            .iter()
            .map(|name| name.as_str().to_owned())
            .collect();
        for column in config.referenced_columns() {
            if !present.contains(column) {
                return Err(PipelineError::configuration(format!(
                    "column '{column}' not found in clinical table"
                )));
            }
        }

        let dbxref_matcher = DbXrefMatcher::from_dictionary(dictionary)?;

        let wants_strings =
            config.concept_strings.is_some() || config.ancestor_strings.is_some();
        let string_matcher = if wants_strings {
            Some(LabelSynonymMatcher::from_dictionary(dictionary)?)
        } else {
            None
        };

        Ok(Self {
            clinical,
            config,
            dbxref_matcher,
            string_matcher,
            thesaurus: None,
        })
    }

    /// Attach thesaurus reference tables.
    ///
    /// `concepts` must carry `UMLS_CUI`, `UMLS_SAB`, `UMLS_CODE`;
    /// `semantic_types`, when given, must carry `UMLS_CUI`,
    /// `UMLS_SEM_TYPE`.
    pub fn with_thesaurus(
        mut self,
        concepts: DataFrame,
        semantic_types: Option<DataFrame>,
    ) -> Result<Self> {
        require_columns(
            &concepts,
            &[columns::UMLS_CUI, columns::UMLS_SAB, columns::UMLS_CODE],
            "thesaurus concept table",
        )?;
        if let Some(semantic_types) = &semantic_types {
            require_columns(
                semantic_types,
                &[columns::UMLS_CUI, columns::UMLS_SEM_TYPE],
                "thesaurus semantic-type table",
            )?;
        }
        self.thesaurus = Some(ThesaurusTables {
            concepts,
            semantic_types,
        });
        Ok(self)
    }

    /// True when thesaurus reference data was supplied.
    pub fn has_thesaurus(&self) -> bool {
        self.thesaurus.is_some()
    }

    pub fn config(&self) -> &AnnotatorConfig {
        &self.config
    }

    /// Attach UMLS concept identifiers and semantic types to clinical
    /// codes.
    ///
    /// Projects the clinical table to distinct (primary key, code) pairs,
    /// inner-joins the thesaurus concept table on the code, then left-joins
    /// semantic types on the CUI. Codes without thesaurus coverage drop out
    /// of this stage's output; one code fanning out to several CUIs, or one
    /// CUI to several semantic types, keeps every combination.
    ///
    /// # Errors
    ///
    /// Configuration error when no thesaurus data was supplied.
    pub fn annotate_with_thesaurus(&self, code_column: &str) -> Result<DataFrame> {
        let thesaurus = self.thesaurus.as_ref().ok_or_else(|| {
            PipelineError::configuration("thesaurus annotation requested without thesaurus data")
        })?;

        let keys = column_strings(&self.clinical, &self.config.primary_key)?;
        let codes = column_strings(&self.clinical, code_column)?;

        let mut pairs: Vec<(String, String)> = Vec::new();
        let mut seen_pairs: BTreeSet<(String, String)> = BTreeSet::new();
        for (key, code) in keys.iter().zip(codes.iter()) {
            if code.is_empty() {
                continue;
            }
            let pair = (key.clone(), code.clone());
            if seen_pairs.insert(pair.clone()) {
                pairs.push(pair);
            }
        }

        // code -> (CUI, SAB, CODE) and CUI -> semantic types
        let concept_cuis = column_strings(&thesaurus.concepts, columns::UMLS_CUI)?;
        let concept_sabs = column_strings(&thesaurus.concepts, columns::UMLS_SAB)?;
        let concept_codes = column_strings(&thesaurus.concepts, columns::UMLS_CODE)?;
        let mut by_code: BTreeMap<&str, Vec<(&str, &str, &str)>> = BTreeMap::new();
        for idx in 0..concept_codes.len() {
            by_code.entry(&concept_codes[idx]).or_default().push((
                &concept_cuis[idx],
                &concept_sabs[idx],
                &concept_codes[idx],
            ));
        }

        let mut types_by_cui: BTreeMap<String, Vec<String>> = BTreeMap::new();
        if let Some(semantic_types) = &thesaurus.semantic_types {
            let type_cuis = column_strings(semantic_types, columns::UMLS_CUI)?;
            let type_names = column_strings(semantic_types, columns::UMLS_SEM_TYPE)?;
            for (cui, name) in type_cuis.into_iter().zip(type_names) {
                types_by_cui.entry(cui).or_default().push(name);
            }
        }

        let mut seen_rows: BTreeSet<Vec<String>> = BTreeSet::new();
        let mut rows = Vec::new();
        for (key, code) in &pairs {
            let Some(hits) = by_code.get(code.as_str()) else {
                continue;
            };
            for (cui, sab, umls_code) in hits {
                let semantic_types = types_by_cui
                    .get(*cui)
                    .map(Vec::as_slice)
                    .unwrap_or(&[]);
                let type_values: Vec<&str> = if semantic_types.is_empty() {
                    vec![""]
                } else {
                    semantic_types.iter().map(String::as_str).collect()
                };
                for semantic_type in type_values {
                    let row = vec![
                        key.clone(),
                        code.clone(),
                        (*cui).to_string(),
                        (*sab).to_string(),
                        (*umls_code).to_string(),
                        semantic_type.to_string(),
                    ];
                    if seen_rows.insert(row.clone()) {
                        rows.push(row);
                    }
                }
            }
        }

        let headers = vec![
            self.config.primary_key.clone(),
            code_column.to_string(),
            columns::UMLS_CUI.to_string(),
            columns::UMLS_SAB.to_string(),
            columns::UMLS_CODE.to_string(),
            columns::UMLS_SEM_TYPE.to_string(),
        ];
        tracing::info!(
            code_column,
            input_pairs = pairs.len(),
            enriched_rows = rows.len(),
            "thesaurus annotation"
        );
        Ok(frame_from_rows(&headers, &rows)?)
    }

    /// Run the full staged pipeline.
    ///
    /// Concept-level results are always produced; ancestor-level results
    /// are added when ancestor columns are configured. Both levels land in
    /// one table distinguished by the `LEVEL` column, with no cross-level
    /// suppression.
    pub fn annotate(&self) -> Result<AnnotationOutcome> {
        let mut annotations: Vec<TaggedAnnotationRow> = Vec::new();
        let mut unmatched: Vec<(String, String, String, String)> = Vec::new();
        let mut seen_annotations: BTreeSet<(String, AnnotationRow)> = BTreeSet::new();
        let mut seen_unmatched: BTreeSet<(String, String, String, String)> = BTreeSet::new();

        let mut levels: Vec<(&str, &[String], Option<&[String]>)> = vec![(
            columns::CONCEPT_LEVEL,
            &self.config.concept_codes,
            self.config.concept_strings.as_deref(),
        )];
        if let Some(ancestor_codes) = &self.config.ancestor_codes {
            levels.push((
                columns::ANCESTOR_LEVEL,
                ancestor_codes,
                self.config.ancestor_strings.as_deref(),
            ));
        }

        for (level, codes, strings) in levels {
            tracing::info!(level, "annotating granularity level");
            let (level_rows, level_unmatched) = self.annotate_level(codes, strings)?;
            for row in level_rows {
                let keyed = (level.to_string(), row.clone());
                if seen_annotations.insert(keyed) {
                    annotations.push(row.tagged(level));
                }
            }
            for (key, value, column) in level_unmatched {
                let entry = (key, value, column, level.to_string());
                if seen_unmatched.insert(entry.clone()) {
                    unmatched.push(entry);
                }
            }
        }

        let annotation_headers = vec![
            self.config.primary_key.clone(),
            columns::CODE.to_string(),
            columns::CODE_COLUMN.to_string(),
            columns::EVIDENCE.to_string(),
            columns::ONT.to_string(),
            columns::ONT_URI.to_string(),
            columns::SCORE.to_string(),
            columns::LEVEL.to_string(),
        ];
        let annotation_rows: Vec<Vec<String>> = annotations
            .into_iter()
            .map(|row| {
                vec![
                    row.key,
                    row.code,
                    row.code_column,
                    row.evidence,
                    row.ont,
                    row.uri,
                    row.score,
                    row.evidence_level,
                ]
            })
            .collect();

        let unmatched_headers = vec![
            self.config.primary_key.clone(),
            columns::CODE.to_string(),
            columns::CODE_COLUMN.to_string(),
            columns::LEVEL.to_string(),
        ];
        let unmatched_rows: Vec<Vec<String>> = unmatched
            .into_iter()
            .map(|(key, value, column, level)| vec![key, value, column, level])
            .collect();

        Ok(AnnotationOutcome {
            annotations: frame_from_rows(&annotation_headers, &annotation_rows)?,
            unmatched: frame_from_rows(&unmatched_headers, &unmatched_rows)?,
        })
    }

    /// Stages 1-4 for one granularity level.
    ///
    /// Returns the reconciled annotation rows plus the (key, value, source
    /// column) inputs no stage matched.
    fn annotate_level(
        &self,
        codes: &[String],
        strings: Option<&[String]>,
    ) -> Result<(Vec<AnnotationRow>, Vec<(String, String, String)>)> {
        let pk = &self.config.primary_key;
        let mut rows: Vec<AnnotationRow> = Vec::new();
        let mut unmatched: Vec<(String, String, String)> = Vec::new();

        // Stages 1 + 2: code enrichment and cross-reference matching
        for code_column in codes {
            let plain = to_long_format(&self.clinical, pk, std::slice::from_ref(code_column))?;

            // (key, clinical code) -> every value the code may match under,
            // including UMLS aliases added by enrichment
            let mut aliases: BTreeMap<(String, String), BTreeSet<String>> = BTreeMap::new();
            for (key, code, _) in input_triples(&plain, pk)? {
                aliases.entry((key, code.clone())).or_default().insert(code);
            }

            let long = if self.has_thesaurus() {
                let enriched = self.annotate_with_thesaurus(code_column)?;
                let enriched_keys = column_strings(&enriched, pk)?;
                let enriched_codes = column_strings(&enriched, code_column)?;
                let umls_codes = column_strings(&enriched, columns::UMLS_CODE)?;
                let umls_cuis = column_strings(&enriched, columns::UMLS_CUI)?;
                for idx in 0..enriched_keys.len() {
                    if let Some(known) = aliases
                        .get_mut(&(enriched_keys[idx].clone(), enriched_codes[idx].clone()))
                    {
                        known.insert(umls_codes[idx].clone());
                        known.insert(umls_cuis[idx].clone());
                    }
                }
                to_long_format(
                    &enriched,
                    pk,
                    &[
                        code_column.clone(),
                        columns::UMLS_CODE.to_string(),
                        columns::UMLS_CUI.to_string(),
                    ],
                )?
            } else {
                plain.clone()
            };

            let matched = self.dbxref_matcher.match_codes(&long)?;
            rows.extend(annotation_rows(&matched, pk, "")?);

            let matched_pairs: BTreeSet<(String, String)> = input_triples(&matched, pk)?
                .into_iter()
                .map(|(key, code, _)| (key, code))
                .collect();
            for (key, code, column) in input_triples(&plain, pk)? {
                let hit = aliases
                    .get(&(key.clone(), code.clone()))
                    .is_some_and(|known| {
                        known
                            .iter()
                            .any(|alias| matched_pairs.contains(&(key.clone(), alias.clone())))
                    });
                if !hit {
                    unmatched.push((key, code, column));
                }
            }
        }

        // Stages 3 + 4: exact string matching, then similarity fallback
        if let (Some(string_columns), Some(matcher)) = (strings, self.string_matcher.as_ref()) {
            let split = split_multivalued(
                &self.clinical,
                string_columns,
                &self.config.string_delimiter,
            )?;
            let long = to_long_format(&split, pk, string_columns)?;

            let exact = matcher.match_strings(&long)?;
            rows.extend(annotation_rows(&exact, pk, "")?);

            let matched_inputs = input_triples(&exact, pk)?;
            let mut missed: Vec<(String, String, String)> = Vec::new();
            for input in input_triples(&long, pk)? {
                if !matched_inputs.contains(&input) {
                    missed.push(input);
                }
            }

            let (similarity_rows, still_unmatched) = self.similarity_stage(matcher, &missed);
            rows.extend(similarity_rows);
            unmatched.extend(still_unmatched);
        }

        Ok((rows, unmatched))
    }

    /// Similarity matching over the string inputs exact matching missed.
    fn similarity_stage(
        &self,
        matcher: &LabelSynonymMatcher,
        missed: &[(String, String, String)],
    ) -> (Vec<AnnotationRow>, Vec<(String, String, String)>) {
        if missed.is_empty() {
            return (Vec::new(), Vec::new());
        }

        let similarity = SimilarityMatcher::new(JaroWinklerScorer, self.config.similarity_threshold)
            .with_max_candidates(self.config.max_similarity_candidates);
        let evidence = similarity.evidence().to_string();
        let dictionary_strings = matcher.dictionary_strings();

        // Deduplicate (key, string) pairs but remember every source column
        let mut source_columns: BTreeMap<(String, String), BTreeSet<String>> = BTreeMap::new();
        let mut pairs: Vec<(String, String)> = Vec::new();
        for (key, value, column) in missed {
            let pair = (key.clone(), value.clone());
            let entry = source_columns.entry(pair.clone()).or_default();
            if entry.is_empty() {
                pairs.push(pair);
            }
            entry.insert(column.clone());
        }

        let ranked = similarity.match_strings(&pairs, &dictionary_strings);

        let mut matched_pairs: BTreeSet<(String, String)> = BTreeSet::new();
        let mut rows = Vec::new();
        for candidate in ranked {
            let pair = (candidate.key.clone(), candidate.source.clone());
            matched_pairs.insert(pair.clone());
            if let Some(columns_for_pair) = source_columns.get(&pair) {
                for column in columns_for_pair {
                    rows.push(AnnotationRow {
                        key: candidate.key.clone(),
                        code: candidate.source.clone(),
                        code_column: column.clone(),
                        evidence: evidence.clone(),
                        ont: ontomap_model::ontology_acronym(&candidate.uri),
                        uri: candidate.uri.clone(),
                        score: format!("{:.4}", candidate.score),
                    });
                }
            }
        }

        let still_unmatched = missed
            .iter()
            .filter(|(key, value, _)| !matched_pairs.contains(&(key.clone(), value.clone())))
            .cloned()
            .collect();
        (rows, still_unmatched)
    }
}

impl AnnotationRow {
    fn tagged(self, level: &str) -> TaggedAnnotationRow {
        TaggedAnnotationRow {
            key: self.key,
            code: self.code,
            code_column: self.code_column,
            evidence: self.evidence,
            ont: self.ont,
            uri: self.uri,
            score: self.score,
            evidence_level: level.to_string(),
        }
    }
}

/// [`AnnotationRow`] with its granularity level attached.
#[derive(Debug, Clone)]
struct TaggedAnnotationRow {
    key: String,
    code: String,
    code_column: String,
    evidence: String,
    ont: String,
    uri: String,
    score: String,
    evidence_level: String,
}

fn require_columns(df: &DataFrame, required: &[&str], what: &str) -> Result<()> {
    let present: BTreeSet<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.as_str().to_owned())
        .collect();
    for column in required {
        if !present.contains(*column) {
            return Err(PipelineError::configuration(format!(
                "{what} is missing required column '{column}'"
            )));
        }
    }
    Ok(())
}

/// Extract (key, CODE, CODE_COLUMN) triples from a long-format frame.
fn input_triples(df: &DataFrame, pk: &str) -> Result<BTreeSet<(String, String, String)>> {
    if df.height() == 0 {
        return Ok(BTreeSet::new());
    }
    let keys = column_strings(df, pk)?;
    let values = column_strings(df, columns::CODE)?;
    let source_columns = column_strings(df, columns::CODE_COLUMN)?;

    let mut triples = BTreeSet::new();
    for idx in 0..keys.len() {
        triples.insert((
            keys[idx].clone(),
            values[idx].clone(),
            source_columns[idx].clone(),
        ));
    }
    Ok(triples)
}

/// Convert a matcher output frame into reconciled annotation rows.
fn annotation_rows(df: &DataFrame, pk: &str, score: &str) -> Result<Vec<AnnotationRow>> {
    if df.height() == 0 {
        return Ok(Vec::new());
    }
    let keys = column_strings(df, pk)?;
    let codes = column_strings(df, columns::CODE)?;
    let code_columns = column_strings(df, columns::CODE_COLUMN)?;
    let evidence = column_strings(df, columns::EVIDENCE)?;
    let onts = column_strings(df, columns::ONT)?;
    let uris = column_strings(df, columns::ONT_URI)?;

    let mut rows = Vec::with_capacity(keys.len());
    for idx in 0..keys.len() {
        rows.push(AnnotationRow {
            key: keys[idx].clone(),
            code: codes[idx].clone(),
            code_column: code_columns[idx].clone(),
            evidence: evidence[idx].clone(),
            ont: onts[idx].clone(),
            uri: uris[idx].clone(),
            score: score.to_string(),
        });
    }
    Ok(rows)
}
