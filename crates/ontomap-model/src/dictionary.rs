//! The ontology annotation dictionary and its flattening logic.
//!
//! The dictionary is a three-level structure: ontology identifier (e.g.
//! `hp`, `mondo`) to annotation type (label, definition, dbxref, synonym)
//! to literal string, where each string owns the set of term URIs it points
//! at. The same literal string may legitimately map to several URIs within
//! one annotation type (an ambiguous cross-reference); the set is preserved,
//! never collapsed.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DictionaryError;

/// One flattened annotation map: literal string to owning term URIs,
/// unioned across every configured ontology.
pub type FlattenedDictionary = BTreeMap<String, BTreeSet<String>>;

/// The four annotation types an ontology record carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationType {
    Label,
    Definition,
    DbXref,
    Synonym,
}

impl AnnotationType {
    /// All annotation types, in dictionary order.
    pub const ALL: [Self; 4] = [Self::Label, Self::Definition, Self::DbXref, Self::Synonym];

    /// Lowercase key used in the serialized dictionary.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Label => "label",
            Self::Definition => "definition",
            Self::DbXref => "dbxref",
            Self::Synonym => "synonym",
        }
    }
}

impl fmt::Display for AnnotationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Annotation maps for a single ontology.
///
/// Each field maps a literal string (a label, a cross-reference code, a
/// synonym) to the set of term URIs carrying it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OntologyRecord {
    #[serde(default)]
    pub label: BTreeMap<String, BTreeSet<String>>,
    #[serde(default)]
    pub definition: BTreeMap<String, BTreeSet<String>>,
    #[serde(default)]
    pub dbxref: BTreeMap<String, BTreeSet<String>>,
    #[serde(default)]
    pub synonym: BTreeMap<String, BTreeSet<String>>,
}

impl OntologyRecord {
    /// Borrow the annotation map for one annotation type.
    pub fn annotation_map(&self, annotation: AnnotationType) -> &BTreeMap<String, BTreeSet<String>> {
        match annotation {
            AnnotationType::Label => &self.label,
            AnnotationType::Definition => &self.definition,
            AnnotationType::DbXref => &self.dbxref,
            AnnotationType::Synonym => &self.synonym,
        }
    }

    /// Record that `value` points at `uri` under the given annotation type.
    pub fn insert(&mut self, annotation: AnnotationType, value: impl Into<String>, uri: impl Into<String>) {
        let map = match annotation {
            AnnotationType::Label => &mut self.label,
            AnnotationType::Definition => &mut self.definition,
            AnnotationType::DbXref => &mut self.dbxref,
            AnnotationType::Synonym => &mut self.synonym,
        };
        map.entry(value.into()).or_default().insert(uri.into());
    }

    /// True when no annotation type carries any entry.
    pub fn is_empty(&self) -> bool {
        AnnotationType::ALL
            .iter()
            .all(|annotation| self.annotation_map(*annotation).is_empty())
    }
}

/// The per-ontology nested annotation dictionary.
///
/// Constructed by an external ontology-ingestion component and handed to the
/// pipeline read-only; nothing mutates it after construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OntologyDictionary {
    ontologies: BTreeMap<String, OntologyRecord>,
}

impl OntologyDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the record for one ontology identifier.
    pub fn insert_ontology(&mut self, id: impl Into<String>, record: OntologyRecord) {
        self.ontologies.insert(id.into(), record);
    }

    pub fn get(&self, id: &str) -> Option<&OntologyRecord> {
        self.ontologies.get(id)
    }

    /// Configured ontology identifiers, sorted.
    pub fn ontology_ids(&self) -> impl Iterator<Item = &str> {
        self.ontologies.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.ontologies.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ontologies.len()
    }

    /// Union every ontology's map for one annotation type into a single
    /// flat mapping.
    ///
    /// When the same literal string appears under two ontologies, both URI
    /// sets are retained. The result does not depend on ontology insertion
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`DictionaryError::EmptyDictionary`] when no ontology is
    /// configured, and [`DictionaryError::AnnotationTypeMissing`] when no
    /// configured ontology carries any entry for `annotation`.
    pub fn flatten(&self, annotation: AnnotationType) -> Result<FlattenedDictionary, DictionaryError> {
        if self.ontologies.is_empty() {
            return Err(DictionaryError::EmptyDictionary);
        }

        let mut combined: FlattenedDictionary = BTreeMap::new();
        for record in self.ontologies.values() {
            for (value, uris) in record.annotation_map(annotation) {
                combined
                    .entry(value.clone())
                    .or_default()
                    .extend(uris.iter().cloned());
            }
        }

        if combined.is_empty() {
            return Err(DictionaryError::AnnotationTypeMissing { annotation });
        }

        Ok(combined)
    }
}
