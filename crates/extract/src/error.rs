//! Extraction Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// An extraction error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A section sentinel the master index must contain was never found. The
    /// document format has most likely changed.
    #[display("master index is missing sentinel: {_0}")]
    MissingSentinel(#[error(not(source))] &'static str),
    /// A line inside an active parse state matched none of the recognized shapes.
    #[display("malformed master index line {line}: {content}")]
    Malformed {
        /// 1-based line number in the source document.
        line: usize,
        /// The offending (trimmed) line.
        content: String,
    },
    /// A value was found but could not be parsed.
    #[display("failed to parse field '{field}', found value: {value}")]
    ParseError {
        /// The field that failed to parse.
        field: &'static str,
        /// Details about the parsing failure.
        value: String,
    },
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Parsing is deterministic: the document is either well-formed or it isn't.
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        assert_eq!(
            ErrorKind::MissingSentinel("<==LISTINGS==>").to_string(),
            "master index is missing sentinel: <==LISTINGS==>"
        );
        assert_eq!(
            ErrorKind::Malformed { line: 12, content: "???".to_string() }.to_string(),
            "malformed master index line 12: ???"
        );
    }

    #[test]
    fn nothing_is_retryable() {
        assert!(!ErrorKind::MissingSentinel("x").is_retryable());
        assert!(!ErrorKind::ParseError { field: "format", value: "doc".into() }.is_retryable());
    }
}
