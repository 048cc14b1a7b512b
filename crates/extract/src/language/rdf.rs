use crate::consts::RDF_LANGUAGE_REGEX;
use crate::models::LanguageTag;
use std::collections::BTreeSet;

/// Extracts every language code declared in an RDF metadata document.
///
/// Only the `<dcterms:language>…<rdf:value …>CODE</rdf:value>…</dcterms:language>`
/// fragment is recognized. Newlines are removed before matching so that the
/// fragment may span several lines of the source document.
pub fn rdf_languages(document: &str) -> BTreeSet<LanguageTag> {
    let flattened: String = document.chars().filter(|c| *c != '\n' && *c != '\r').collect();
    RDF_LANGUAGE_REGEX
        .captures_iter(&flattened)
        .filter_map(|captures| captures.get(1))
        .filter_map(|code| code.as_str().parse().ok())
        .collect()
}
