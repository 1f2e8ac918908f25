use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::{info, info_span};

use ontomap_common::column_strings;
use ontomap_core::{AnnotatorConfig, ConceptAnnotator};
use ontomap_ingest::{
    read_clinical_table, read_concept_table, read_ontology_dictionary, read_semantic_type_table,
};
use ontomap_model::AnnotationType;

use crate::cli::{AnnotateArgs, DictionaryArgs};
use crate::output::write_frame_csv;
use crate::summary::apply_table_style;
use crate::types::AnnotateResult;

pub fn run_annotate(args: &AnnotateArgs) -> Result<AnnotateResult> {
    let span = info_span!("annotate", file = %args.clinical_file.display());
    let _guard = span.enter();

    let clinical =
        read_clinical_table(&args.clinical_file).context("read clinical concept table")?;
    let dictionary =
        read_ontology_dictionary(&args.dictionary).context("read ontology dictionary")?;
    let clinical_rows = clinical.height();

    let mut config = AnnotatorConfig::new(args.primary_key.clone(), args.concept_codes.clone())
        .with_string_delimiter(args.string_delimiter.clone())
        .with_similarity_threshold(args.similarity_threshold)
        .with_max_similarity_candidates(args.max_candidates);
    if !args.concept_strings.is_empty() {
        config = config.with_concept_strings(args.concept_strings.clone());
    }
    if !args.ancestor_codes.is_empty() {
        config = config.with_ancestor_codes(args.ancestor_codes.clone());
    }
    if !args.ancestor_strings.is_empty() {
        config = config.with_ancestor_strings(args.ancestor_strings.clone());
    }

    let mut annotator = ConceptAnnotator::new(clinical, &dictionary, config)?;
    if let Some(path) = &args.umls_concepts {
        let concepts = read_concept_table(path).context("read UMLS concept table")?;
        let semantic_types = match &args.umls_semantic_types {
            Some(path) => {
                Some(read_semantic_type_table(path).context("read UMLS semantic type table")?)
            }
            None => None,
        };
        annotator = annotator.with_thesaurus(concepts, semantic_types)?;
    }

    let outcome = annotator.annotate()?;
    let annotation_rows = outcome.annotations.height();
    let unmatched_rows = outcome.unmatched.height();
    info!(annotation_rows, unmatched_rows, "pipeline finished");

    let mut evidence_counts: BTreeMap<(String, String), usize> = BTreeMap::new();
    if annotation_rows > 0 {
        let levels = column_strings(&outcome.annotations, ontomap_model::columns::LEVEL)?;
        let evidence = column_strings(&outcome.annotations, ontomap_model::columns::EVIDENCE)?;
        for (level, evidence) in levels.into_iter().zip(evidence) {
            *evidence_counts.entry((level, evidence)).or_default() += 1;
        }
    }

    let (annotations_path, unmatched_path) = if args.dry_run {
        (None, None)
    } else {
        let output_dir = args.output_dir.clone().unwrap_or_else(|| {
            args.clinical_file
                .parent()
                .map_or_else(|| PathBuf::from("."), PathBuf::from)
                .join("output")
        });
        std::fs::create_dir_all(&output_dir)
            .with_context(|| format!("create output directory {}", output_dir.display()))?;

        let annotations_path = output_dir.join("annotations.csv");
        write_frame_csv(&outcome.annotations, &annotations_path)?;
        let unmatched_path = output_dir.join("unmatched.csv");
        write_frame_csv(&outcome.unmatched, &unmatched_path)?;
        (Some(annotations_path), Some(unmatched_path))
    };

    Ok(AnnotateResult {
        clinical_rows,
        annotation_rows,
        unmatched_rows,
        evidence_counts,
        annotations_path,
        unmatched_path,
    })
}

pub fn run_dictionary(args: &DictionaryArgs) -> Result<()> {
    let dictionary =
        read_ontology_dictionary(&args.dictionary).context("read ontology dictionary")?;

    let mut table = Table::new();
    table.set_header(vec![
        "Ontology",
        "Labels",
        "Definitions",
        "Cross-references",
        "Synonyms",
    ]);
    apply_table_style(&mut table);
    for id in dictionary.ontology_ids() {
        let Some(record) = dictionary.get(id) else {
            continue;
        };
        table.add_row(vec![
            id.to_string(),
            record.annotation_map(AnnotationType::Label).len().to_string(),
            record
                .annotation_map(AnnotationType::Definition)
                .len()
                .to_string(),
            record
                .annotation_map(AnnotationType::DbXref)
                .len()
                .to_string(),
            record
                .annotation_map(AnnotationType::Synonym)
                .len()
                .to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}
