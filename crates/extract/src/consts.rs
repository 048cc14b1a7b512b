use regex::Regex;
use std::sync::LazyLock;

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

/// Marks the start of the listings section of the master index.
pub const LISTINGS_SENTINEL: &str = "<==LISTINGS==>";
/// Marks the end of the master index document.
pub const END_SENTINEL: &str = "<==End of GUTINDEX.ALL==>";
/// Prefix of the per-year banners that interrupt the listings.
pub const BANNER_PREFIX: &str = "GUTINDEX";
/// Column header that immediately precedes a run of entry lines.
pub const HEADER_MARKER: &str = "ETEXT NO.";
/// Language assumed for an index entry without a `[Language: …]` annotation.
pub const DEFAULT_INDEX_LANGUAGE: &str = "English";
/// Language tag assumed for a work when no metadata yields one.
pub const DEFAULT_LANGUAGE_TAG: &str = "en";
/// Identifier below which the index parser stops, unless configured otherwise.
pub const DEFAULT_INDEX_CUTOFF: u64 = 50_000;

// A title character, a run of column padding, then the identifier with an
// optional copyright flag at the very end of the line.
regex!(ENTRY_LINE_REGEX, r"[\w\p{P}]\s\s+\d+C?$");
regex!(LANGUAGE_ANNOTATION_REGEX, r"^\[Language:\s*([^\]]+?)\s*\]");
regex!(
    RDF_LANGUAGE_REGEX,
    r"<dcterms:language>.{1,100}<rdf:value.{1,100}>(\w{1,100})</rdf:value>.{1,100}</dcterms:language>"
);
// "and" and "with" only separate as whole words, so "Scandinavian" and
// "Mandarin" stay intact.
regex!(HEADER_LANGUAGE_SPLIT_REGEX, r",|&|\band\b|\bwith\b|\s|/");
regex!(NON_ALPHABETIC_REGEX, r"[^a-zA-Z]+");
