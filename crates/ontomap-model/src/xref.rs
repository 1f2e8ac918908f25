//! Cross-reference string and term-URI parsing.
//!
//! Cross-references look like `ICD9:123` (vocabulary prefix, colon, source
//! code); term URIs look like `http://purl.obolibrary.org/obo/HP_0000001`
//! (the ontology acronym is the last path segment up to the first
//! underscore).

/// Ontology acronym derived from a term URI: last path segment, text before
/// the first underscore, upper-cased.
///
/// # Examples
///
/// ```
/// use ontomap_model::ontology_acronym;
///
/// assert_eq!(
///     ontology_acronym("http://purl.obolibrary.org/obo/HP_0000001"),
///     "HP"
/// );
/// ```
pub fn ontology_acronym(uri: &str) -> String {
    let segment = uri.rsplit('/').next().unwrap_or(uri);
    let prefix = segment.split('_').next().unwrap_or(segment);
    prefix.to_uppercase()
}

/// Source-vocabulary prefix of a cross-reference: text before the first
/// colon, or the whole string when no colon is present.
pub fn vocabulary_prefix(dbxref: &str) -> &str {
    dbxref.split(':').next().unwrap_or(dbxref)
}

/// Code portion of a cross-reference: text after the last colon, or the
/// whole string when no colon is present.
pub fn xref_code(dbxref: &str) -> &str {
    dbxref.rsplit(':').next().unwrap_or(dbxref)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acronym_from_obo_uri() {
        assert_eq!(
            ontology_acronym("http://purl.obolibrary.org/obo/HP_0000118"),
            "HP"
        );
        assert_eq!(
            ontology_acronym("http://purl.obolibrary.org/obo/MONDO_0005148"),
            "MONDO"
        );
    }

    #[test]
    fn acronym_without_underscore_uses_whole_segment() {
        assert_eq!(ontology_acronym("http://x/hp"), "HP");
    }

    #[test]
    fn vocabulary_prefix_and_code() {
        assert_eq!(vocabulary_prefix("ICD9:123"), "ICD9");
        assert_eq!(xref_code("ICD9:123"), "123");
    }

    #[test]
    fn xref_without_colon() {
        assert_eq!(vocabulary_prefix("123"), "123");
        assert_eq!(xref_code("123"), "123");
    }

    #[test]
    fn xref_with_nested_colons_keeps_last_segment_as_code() {
        assert_eq!(vocabulary_prefix("UMLS:CUI:C0001"), "UMLS");
        assert_eq!(xref_code("UMLS:CUI:C0001"), "C0001");
    }
}
