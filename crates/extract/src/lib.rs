//! Pure parsing for the Project Gutenberg corpus: the master index, per-work
//! language metadata, and the file naming conventions of the archive.
//!
//! Nothing in this crate touches the filesystem. Callers read documents and
//! hand over their contents.

mod consts;
pub mod error;
pub mod index;
pub mod language;
pub mod models;

pub use crate::consts::{
    BANNER_PREFIX, DEFAULT_INDEX_CUTOFF, DEFAULT_INDEX_LANGUAGE, DEFAULT_LANGUAGE_TAG, END_SENTINEL, HEADER_MARKER,
    LISTINGS_SENTINEL,
};
pub use crate::index::{IndexParser, parse_index};
pub use crate::language::{header_languages, parse_language_line, rdf_languages};
