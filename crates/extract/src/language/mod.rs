//! Language tag extraction from per-work metadata documents.
//!
//! Each function here is pure; reading the files (and deciding which source
//! to consult first) is the caller's business.

mod header;
mod rdf;

pub use self::header::{header_languages, parse_language_line};
pub use self::rdf::rdf_languages;
