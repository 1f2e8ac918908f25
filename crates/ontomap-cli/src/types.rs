//! Result types shared between command execution and summary printing.

use std::collections::BTreeMap;
use std::path::PathBuf;

/// Outcome of one `annotate` run, for the terminal summary.
pub struct AnnotateResult {
    /// Rows in the input clinical table.
    pub clinical_rows: usize,
    /// Rows in the annotation table.
    pub annotation_rows: usize,
    /// Inputs no stage matched.
    pub unmatched_rows: usize,
    /// Annotation rows per (level, evidence) pair.
    pub evidence_counts: BTreeMap<(String, String), usize>,
    /// Where the annotation table was written (None on dry runs).
    pub annotations_path: Option<PathBuf>,
    /// Where the unmatched report was written (None on dry runs).
    pub unmatched_path: Option<PathBuf>,
}
