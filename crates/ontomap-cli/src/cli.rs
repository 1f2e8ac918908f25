//! CLI argument definitions for the annotation pipeline.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "ontomap",
    version,
    about = "Map clinical terminology codes and strings to ontology terms",
    long_about = "Annotate a clinical concept table with ontology terms.\n\n\
                  Matching runs in stages: UMLS thesaurus enrichment, ontology\n\
                  cross-reference lookup, exact label/synonym matching, and\n\
                  similarity scoring for everything left over."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Annotate a clinical concept table against an ontology dictionary.
    Annotate(AnnotateArgs),

    /// Summarize the contents of an ontology dictionary file.
    Dictionary(DictionaryArgs),
}

#[derive(Parser)]
pub struct AnnotateArgs {
    /// Clinical concept table (CSV or TSV with a header row).
    #[arg(value_name = "CLINICAL_FILE")]
    pub clinical_file: PathBuf,

    /// Ontology annotation dictionary (JSON).
    #[arg(long = "dictionary", value_name = "PATH")]
    pub dictionary: PathBuf,

    /// Column holding the clinical concept identifier.
    #[arg(long = "primary-key", value_name = "COLUMN")]
    pub primary_key: String,

    /// Columns holding concept-level source codes.
    #[arg(
        long = "concept-codes",
        value_name = "COLUMNS",
        value_delimiter = ',',
        required = true
    )]
    pub concept_codes: Vec<String>,

    /// Columns holding concept-level labels or synonyms.
    #[arg(
        long = "concept-strings",
        value_name = "COLUMNS",
        value_delimiter = ','
    )]
    pub concept_strings: Vec<String>,

    /// Columns holding ancestor-level source codes.
    #[arg(
        long = "ancestor-codes",
        value_name = "COLUMNS",
        value_delimiter = ','
    )]
    pub ancestor_codes: Vec<String>,

    /// Columns holding ancestor-level labels or synonyms.
    #[arg(
        long = "ancestor-strings",
        value_name = "COLUMNS",
        value_delimiter = ',',
        requires = "ancestor_codes"
    )]
    pub ancestor_strings: Vec<String>,

    /// UMLS concept file (MRCONSO.RRF) for thesaurus enrichment.
    #[arg(long = "umls-concepts", value_name = "PATH")]
    pub umls_concepts: Option<PathBuf>,

    /// UMLS semantic type file (MRSTY.RRF); requires --umls-concepts.
    #[arg(
        long = "umls-semantic-types",
        value_name = "PATH",
        requires = "umls_concepts"
    )]
    pub umls_semantic_types: Option<PathBuf>,

    /// Delimiter packing multiple values into one string cell.
    #[arg(long = "string-delimiter", value_name = "DELIM", default_value = "|")]
    pub string_delimiter: String,

    /// Minimum similarity score kept by the similarity stage.
    #[arg(
        long = "similarity-threshold",
        value_name = "SCORE",
        default_value_t = 0.85
    )]
    pub similarity_threshold: f64,

    /// Ranked candidates kept per clinical string in the similarity stage.
    #[arg(long = "max-candidates", value_name = "N", default_value_t = 5)]
    pub max_candidates: usize,

    /// Output directory (default: <CLINICAL_FILE dir>/output).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Run the pipeline and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct DictionaryArgs {
    /// Ontology annotation dictionary (JSON).
    #[arg(value_name = "DICTIONARY")]
    pub dictionary: PathBuf,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
