//! Evidence tags recording which matching strategy produced a mapping.

use std::fmt;

use crate::dictionary::AnnotationType;
use crate::xref::vocabulary_prefix;

/// The matching strategy behind one annotation row.
///
/// Rendered into the `EVIDENCE` column of the output table, e.g.
/// `DbXRef_ICD9`, `ExactString_Label`, `Similarity_JaroWinkler`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evidence {
    /// Controlled-vocabulary cross-reference match.
    DbXref { vocabulary: String },
    /// Exact normalized string match against a label or synonym.
    ExactString { annotation: AnnotationType },
    /// Similarity-based match from a named scorer.
    Similarity { scorer: String },
}

impl Evidence {
    /// Evidence for a cross-reference match, deriving the vocabulary from
    /// the matched cross-reference string.
    pub fn from_dbxref(dbxref: &str) -> Self {
        Self::DbXref {
            vocabulary: vocabulary_prefix(dbxref).to_string(),
        }
    }
}

impl fmt::Display for Evidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DbXref { vocabulary } => write!(f, "DbXRef_{vocabulary}"),
            Self::ExactString { annotation } => {
                let label = match annotation {
                    AnnotationType::Label => "Label",
                    AnnotationType::Definition => "Definition",
                    AnnotationType::DbXref => "DbXref",
                    AnnotationType::Synonym => "Synonym",
                };
                write!(f, "ExactString_{label}")
            }
            Self::Similarity { scorer } => write!(f, "Similarity_{scorer}"),
        }
    }
}
