//! Pipeline configuration.

/// Column configuration and matching knobs for one clinical domain file.
#[derive(Debug, Clone)]
pub struct AnnotatorConfig {
    /// Column holding the clinical concept identifier.
    pub primary_key: String,
    /// Columns holding concept-level source codes.
    pub concept_codes: Vec<String>,
    /// Columns holding concept-level labels/synonyms (optional).
    pub concept_strings: Option<Vec<String>>,
    /// Columns holding ancestor-level source codes (optional).
    pub ancestor_codes: Option<Vec<String>>,
    /// Columns holding ancestor-level labels/synonyms (optional).
    pub ancestor_strings: Option<Vec<String>>,
    /// Delimiter packing multiple values into one string cell.
    pub string_delimiter: String,
    /// Minimum similarity score kept by the similarity stage.
    pub similarity_threshold: f64,
    /// Ranked candidates kept per clinical string in the similarity stage.
    pub max_similarity_candidates: usize,
}

impl AnnotatorConfig {
    pub fn new(primary_key: impl Into<String>, concept_codes: Vec<String>) -> Self {
        Self {
            primary_key: primary_key.into(),
            concept_codes,
            concept_strings: None,
            ancestor_codes: None,
            ancestor_strings: None,
            string_delimiter: "|".to_string(),
            similarity_threshold: 0.85,
            max_similarity_candidates: 5,
        }
    }

    #[must_use]
    pub fn with_concept_strings(mut self, columns: Vec<String>) -> Self {
        self.concept_strings = Some(columns);
        self
    }

    #[must_use]
    pub fn with_ancestor_codes(mut self, columns: Vec<String>) -> Self {
        self.ancestor_codes = Some(columns);
        self
    }

    #[must_use]
    pub fn with_ancestor_strings(mut self, columns: Vec<String>) -> Self {
        self.ancestor_strings = Some(columns);
        self
    }

    #[must_use]
    pub fn with_string_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.string_delimiter = delimiter.into();
        self
    }

    #[must_use]
    pub fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_max_similarity_candidates(mut self, max_candidates: usize) -> Self {
        self.max_similarity_candidates = max_candidates;
        self
    }

    /// All string columns referenced by this configuration.
    pub(crate) fn referenced_columns(&self) -> Vec<&str> {
        let mut columns = vec![self.primary_key.as_str()];
        columns.extend(self.concept_codes.iter().map(String::as_str));
        for optional in [
            &self.concept_strings,
            &self.ancestor_codes,
            &self.ancestor_strings,
        ] {
            if let Some(names) = optional {
                columns.extend(names.iter().map(String::as_str));
            }
        }
        columns
    }
}
