use super::line::{Line, Shape, classify, is_boundary, language_annotation};
use crate::consts::{BANNER_PREFIX, DEFAULT_INDEX_LANGUAGE, END_SENTINEL, HEADER_MARKER, LISTINGS_SENTINEL};
use crate::error::{ErrorKind, Result};
use crate::models::{IndexEntry, IndexSnapshot};

/// Parser states, one per section of the master index being looked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum State {
    /// Skipping the preamble until the listings sentinel.
    SeekListings,
    /// Waiting for an `ETEXT NO.` column header. Carries the last parsed
    /// identifier when resuming after a mid-stream banner, `None` before the
    /// very first header.
    SeekHeader(Option<u64>),
    /// Reading entry lines.
    ReadEntry(Cursor),
    /// The end sentinel (or the cutoff) has been reached.
    Done,
}

/// Progress through the entry lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    /// Identifier of the most recent boundary line.
    expected: u64,
    /// The entry whose attribute lines are currently being read.
    pending: Option<Pending>,
    /// The first line after the first header is always an entry.
    first: bool,
}
impl Cursor {
    fn resume(expected: Option<u64>) -> Self {
        Self {
            expected: expected.unwrap_or_default(),
            pending: None,
            first: expected.is_none(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Pending {
    identifier: u64,
    title: String,
    language: Option<String>,
}

/// Accumulates the snapshot while the state machine runs.
#[derive(Debug, Default)]
pub(crate) struct Builder {
    snapshot: IndexSnapshot,
    cutoff: Option<u64>,
}
impl Builder {
    pub(crate) fn new(cutoff: Option<u64>) -> Self {
        Self {
            snapshot: IndexSnapshot::default(),
            cutoff,
        }
    }

    pub(crate) fn finish(self) -> IndexSnapshot {
        self.snapshot
    }

    /// Records the pending entry, returning `true` if it fell below the cutoff.
    fn flush(&mut self, pending: Option<Pending>) -> bool {
        let Some(pending) = pending else {
            return false;
        };
        let entry = IndexEntry {
            title: pending.title,
            language: pending.language.unwrap_or_else(|| DEFAULT_INDEX_LANGUAGE.to_string()),
        };
        self.snapshot.declared.insert(pending.identifier, entry);
        self.cutoff.is_some_and(|cutoff| pending.identifier < cutoff)
    }
}

impl State {
    /// Feeds one line to the machine and returns the next state.
    pub(crate) fn next(self, line: Line<'_>, builder: &mut Builder) -> Result<State> {
        match self {
            State::SeekListings => Ok(seek_listings(line)),
            State::SeekHeader(expected) => Ok(seek_header(line, expected)),
            State::ReadEntry(cursor) => read_entry(cursor, line, builder),
            State::Done => Ok(State::Done),
        }
    }

    /// Checks that input ended in a terminal state.
    pub(crate) fn finish(&self) -> Result<()> {
        match self {
            State::SeekListings => exn::bail!(ErrorKind::MissingSentinel(LISTINGS_SENTINEL)),
            State::SeekHeader(_) => exn::bail!(ErrorKind::MissingSentinel(HEADER_MARKER)),
            State::ReadEntry(_) => exn::bail!(ErrorKind::MissingSentinel(END_SENTINEL)),
            State::Done => Ok(()),
        }
    }
}

pub(crate) fn seek_listings(line: Line<'_>) -> State {
    match line.text.contains(LISTINGS_SENTINEL) {
        true => State::SeekHeader(None),
        false => State::SeekListings,
    }
}

pub(crate) fn seek_header(line: Line<'_>, expected: Option<u64>) -> State {
    match line.text.contains(HEADER_MARKER) {
        true => State::ReadEntry(Cursor::resume(expected)),
        false => State::SeekHeader(expected),
    }
}

pub(crate) fn read_entry(mut cursor: Cursor, line: Line<'_>, builder: &mut Builder) -> Result<State> {
    if line.text.starts_with(END_SENTINEL) {
        builder.flush(cursor.pending.take());
        return Ok(State::Done);
    }
    if line.text.starts_with(BANNER_PREFIX) {
        if builder.flush(cursor.pending.take()) {
            return Ok(State::Done);
        }
        return Ok(State::SeekHeader(Some(cursor.expected)));
    }
    if cursor.first || is_boundary(line.text, cursor.expected) {
        if builder.flush(cursor.pending.take()) {
            return Ok(State::Done);
        }
        let identifier = match classify(line)? {
            Shape::Entry { identifier, title } => {
                cursor.pending = Some(Pending {
                    identifier,
                    title,
                    language: None,
                });
                identifier
            },
            Shape::Unlisted(identifier) => {
                tracing::debug!(identifier, line = line.number, "Index marks identifier as unlisted");
                builder.snapshot.unlisted.insert(identifier);
                identifier
            },
        };
        if cursor.first {
            builder.snapshot.last_identifier = identifier;
            cursor.first = false;
        }
        cursor.expected = identifier;
        return Ok(State::ReadEntry(cursor));
    }
    if let Some(pending) = cursor.pending.as_mut()
        && let Some(language) = language_annotation(line.text)
    {
        pending.language = Some(language.to_string());
    }
    Ok(State::ReadEntry(cursor))
}
