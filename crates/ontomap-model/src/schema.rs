//! Positional schema descriptors for the UMLS thesaurus reference files.
//!
//! The MRCONSO and MRSTY release files are pipe-delimited without headers;
//! the fields the pipeline needs sit at fixed positions. Naming those
//! positions here lets the loader validate row shape instead of assuming it.

use crate::columns;

/// One named field at a fixed position in a delimited row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionalField {
    /// Column name the field is loaded under.
    pub name: &'static str,
    /// Zero-based field index in the source row.
    pub index: usize,
}

/// Schema of the thesaurus concept table (MRCONSO.RRF).
#[derive(Debug, Clone, Copy)]
pub struct ConceptTableSchema {
    pub concept_id: PositionalField,
    pub vocabulary: PositionalField,
    pub code: PositionalField,
    /// Sentinel code marking "no code"; rows carrying it are excluded.
    pub no_code_sentinel: &'static str,
}

impl ConceptTableSchema {
    /// The MRCONSO.RRF layout: CUI at 0, SAB at 11, CODE at 13.
    pub const MRCONSO: Self = Self {
        concept_id: PositionalField {
            name: columns::UMLS_CUI,
            index: 0,
        },
        vocabulary: PositionalField {
            name: columns::UMLS_SAB,
            index: 11,
        },
        code: PositionalField {
            name: columns::UMLS_CODE,
            index: 13,
        },
        no_code_sentinel: "NOCODE",
    };

    /// Minimum number of fields a row must carry to satisfy this schema.
    pub fn min_fields(&self) -> usize {
        self.concept_id
            .index
            .max(self.vocabulary.index)
            .max(self.code.index)
            + 1
    }
}

/// Schema of the thesaurus semantic-type table (MRSTY.RRF).
#[derive(Debug, Clone, Copy)]
pub struct SemanticTypeSchema {
    pub concept_id: PositionalField,
    pub semantic_type: PositionalField,
}

impl SemanticTypeSchema {
    /// The MRSTY.RRF layout: CUI at 0, semantic type name at 3.
    pub const MRSTY: Self = Self {
        concept_id: PositionalField {
            name: columns::UMLS_CUI,
            index: 0,
        },
        semantic_type: PositionalField {
            name: columns::UMLS_SEM_TYPE,
            index: 3,
        },
    };

    /// Minimum number of fields a row must carry to satisfy this schema.
    pub fn min_fields(&self) -> usize {
        self.concept_id.index.max(self.semantic_type.index) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mrconso_schema_positions() {
        let schema = ConceptTableSchema::MRCONSO;
        assert_eq!(schema.concept_id.index, 0);
        assert_eq!(schema.vocabulary.index, 11);
        assert_eq!(schema.code.index, 13);
        assert_eq!(schema.min_fields(), 14);
    }

    #[test]
    fn mrsty_schema_positions() {
        let schema = SemanticTypeSchema::MRSTY;
        assert_eq!(schema.concept_id.index, 0);
        assert_eq!(schema.semantic_type.index, 3);
        assert_eq!(schema.min_fields(), 4);
    }
}
