//! Master index (`GUTINDEX.ALL`) parsing.
//!
//! The index is a legacy fixed-width text document. Listings run newest-first
//! in sections introduced by a `GUTINDEX` banner and an `ETEXT NO.` column
//! header; each entry is a line ending in the padded identifier, optionally
//! followed by bracketed attribute lines such as `[Language: Italian]`.
//!
//! Parsing is an explicit state machine ([`State`]) over the pre-tokenized
//! [`Line`]s of the document. Sentinels the machine never reaches are fatal:
//! a missing sentinel means the format changed, and a partial result would be
//! silently wrong.

mod line;
mod state;

pub use self::line::{Line, tokenize};
pub use self::state::{Cursor, State};
use self::state::Builder;
use crate::consts::DEFAULT_INDEX_CUTOFF;
use crate::error::Result;
use crate::models::IndexSnapshot;
use tracing::instrument;

/// Parses master index documents into an [`IndexSnapshot`].
///
/// Parsing stops early once an entry below the `cutoff` identifier has been
/// recorded. The older, well-covered part of the index rarely needs
/// cross-checking; pass `None` to read the whole document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexParser {
    cutoff: Option<u64>,
}
impl Default for IndexParser {
    fn default() -> Self {
        Self {
            cutoff: Some(DEFAULT_INDEX_CUTOFF),
        }
    }
}
impl IndexParser {
    pub fn new(cutoff: impl Into<Option<u64>>) -> Self {
        Self { cutoff: cutoff.into() }
    }

    pub fn cutoff(&self) -> Option<u64> {
        self.cutoff
    }

    #[instrument(skip(document), fields(document_size = document.len()))]
    pub fn parse(&self, document: &str) -> Result<IndexSnapshot> {
        let mut builder = Builder::new(self.cutoff);
        let mut state = State::SeekListings;
        for line in tokenize(document) {
            state = state.next(line, &mut builder)?;
            if state == State::Done {
                break;
            }
        }
        state.finish()?;
        let snapshot = builder.finish();
        tracing::info!(
            last_identifier = snapshot.last_identifier,
            declared = snapshot.declared.len(),
            unlisted = snapshot.unlisted.len(),
            "Parsed master index"
        );
        Ok(snapshot)
    }
}

/// Parses a master index document with the default cutoff.
pub fn parse_index(document: &str) -> Result<IndexSnapshot> {
    IndexParser::default().parse(document)
}
