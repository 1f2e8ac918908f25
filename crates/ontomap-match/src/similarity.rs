//! Similarity-distance matching for strings with no exact match.
//!
//! The scorer is pluggable behind [`SimilarityScorer`]; the default is
//! Jaro-Winkler, which behaves well on short clinical phrases.

use std::cmp::Ordering;

use rapidfuzz::distance::jaro_winkler;

use ontomap_model::Evidence;

use crate::exact::normalize_string;

/// A pairwise string similarity in `[0.0, 1.0]`.
pub trait SimilarityScorer {
    /// Scorer name, recorded in the evidence tag.
    fn name(&self) -> &'static str;

    /// Similarity between two normalized strings; 1.0 is identical.
    fn score(&self, left: &str, right: &str) -> f64;
}

/// Jaro-Winkler similarity.
#[derive(Debug, Clone, Copy, Default)]
pub struct JaroWinklerScorer;

impl SimilarityScorer for JaroWinklerScorer {
    fn name(&self) -> &'static str {
        "JaroWinkler"
    }

    fn score(&self, left: &str, right: &str) -> f64 {
        jaro_winkler::similarity(left.chars(), right.chars())
    }
}

/// One ranked candidate match for a clinical string.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedMatch {
    /// Primary key of the clinical row the string came from.
    pub key: String,
    /// The clinical source string.
    pub source: String,
    /// The dictionary string it was scored against.
    pub candidate: String,
    /// URI of the ontology term owning the candidate string.
    pub uri: String,
    /// Similarity confidence in `[0.0, 1.0]`.
    pub score: f64,
}

/// Threshold-and-rank matcher over a pluggable scorer.
#[derive(Debug, Clone)]
pub struct SimilarityMatcher<S: SimilarityScorer> {
    scorer: S,
    threshold: f64,
    max_candidates: usize,
}

impl<S: SimilarityScorer> SimilarityMatcher<S> {
    /// Default cap on ranked candidates kept per clinical string.
    pub const DEFAULT_MAX_CANDIDATES: usize = 5;

    pub fn new(scorer: S, threshold: f64) -> Self {
        Self {
            scorer,
            threshold,
            max_candidates: Self::DEFAULT_MAX_CANDIDATES,
        }
    }

    /// Cap the number of ranked candidates kept per clinical string.
    #[must_use]
    pub fn with_max_candidates(mut self, max_candidates: usize) -> Self {
        self.max_candidates = max_candidates;
        self
    }

    /// Evidence tag this matcher writes.
    pub fn evidence(&self) -> Evidence {
        Evidence::Similarity {
            scorer: self.scorer.name().to_string(),
        }
    }

    /// Score every clinical (key, string) pair against every dictionary
    /// (string, URI) pair.
    ///
    /// Returns candidates at or above the threshold, ranked per clinical
    /// string by score descending (ties broken by candidate string for
    /// determinism) and capped at `max_candidates`. Work for one key never
    /// depends on results for another, so callers may partition by key.
    pub fn match_strings(
        &self,
        clinical: &[(String, String)],
        dictionary: &[(String, String)],
    ) -> Vec<RankedMatch> {
        let normalized_dictionary: Vec<(String, &str, &str)> = dictionary
            .iter()
            .map(|(candidate, uri)| {
                (
                    normalize_string(candidate),
                    candidate.as_str(),
                    uri.as_str(),
                )
            })
            .collect();

        let mut matches = Vec::new();
        for (key, source) in clinical {
            let normalized_source = normalize_string(source);
            if normalized_source.is_empty() {
                continue;
            }

            let mut candidates: Vec<RankedMatch> = normalized_dictionary
                .iter()
                .filter_map(|(normalized_candidate, candidate, uri)| {
                    let score = self.scorer.score(&normalized_source, normalized_candidate);
                    if score >= self.threshold {
                        Some(RankedMatch {
                            key: key.clone(),
                            source: source.clone(),
                            candidate: (*candidate).to_string(),
                            uri: (*uri).to_string(),
                            score,
                        })
                    } else {
                        None
                    }
                })
                .collect();

            candidates.sort_by(|a, b| {
                b.score
                    .partial_cmp(&a.score)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| a.candidate.cmp(&b.candidate))
            });
            candidates.truncate(self.max_candidates);
            matches.extend(candidates);
        }

        tracing::debug!(
            clinical = clinical.len(),
            dictionary = dictionary.len(),
            matches = matches.len(),
            "similarity matching"
        );
        matches
    }
}
