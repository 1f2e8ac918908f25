//! Evidence matchers for the annotation pipeline.
//!
//! Three matching strategies live here, one per evidence family:
//!
//! - [`DbXrefMatcher`] joins clinical codes against the flattened ontology
//!   cross-reference dictionary on exact code equality.
//! - [`LabelSynonymMatcher`] joins normalized clinical strings against
//!   ontology labels and synonyms.
//! - [`SimilarityMatcher`] scores the strings nothing matched exactly,
//!   returning ranked candidates above a confidence threshold.
//!
//! All matchers are pure: they never mutate their dictionaries and produce
//! fresh output tables per call.

mod dbxref;
mod error;
mod exact;
mod similarity;

pub use dbxref::DbXrefMatcher;
pub use error::{MatchError, Result};
pub use exact::{ExactStringMatcher, LabelSynonymMatcher, normalize_string};
pub use similarity::{JaroWinklerScorer, RankedMatch, SimilarityMatcher, SimilarityScorer};
