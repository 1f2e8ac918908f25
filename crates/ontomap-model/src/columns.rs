//! Well-known column names shared across pipeline stages.
//!
//! The annotation pipeline communicates between stages through long-format
//! frames with a fixed vocabulary of column names; keeping them here avoids
//! scattering string literals across crates.

/// Value column of a long-format table (a source code or clinical string).
pub const CODE: &str = "CODE";
/// Name of the wide-format column a long-format value came from.
pub const CODE_COLUMN: &str = "CODE_COLUMN";
/// Full cross-reference string, e.g. `ICD9:123`.
pub const DBXREF: &str = "DBXREF";
/// Ontology acronym derived from the matched term URI, e.g. `HP`.
pub const ONT: &str = "ONT";
/// Matched ontology term URI.
pub const ONT_URI: &str = "ONT_URI";
/// Evidence tag recording which strategy produced the match.
pub const EVIDENCE: &str = "EVIDENCE";
/// Similarity confidence score; empty for exact evidence.
pub const SCORE: &str = "SCORE";
/// Concept granularity the match was produced at.
pub const LEVEL: &str = "LEVEL";

/// UMLS canonical concept identifier.
pub const UMLS_CUI: &str = "UMLS_CUI";
/// UMLS source vocabulary abbreviation.
pub const UMLS_SAB: &str = "UMLS_SAB";
/// UMLS source code.
pub const UMLS_CODE: &str = "UMLS_CODE";
/// UMLS semantic type.
pub const UMLS_SEM_TYPE: &str = "UMLS_SEM_TYPE";

/// `LEVEL` value for concept-granularity rows.
pub const CONCEPT_LEVEL: &str = "CONCEPT";
/// `LEVEL` value for ancestor-granularity rows.
pub const ANCESTOR_LEVEL: &str = "ANCESTOR";
