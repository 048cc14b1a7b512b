//! Library Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. Submodules with their own failure
//! modes ([`scan`](crate::scan), [`organize`](crate::organize)) keep their own
//! kinds and are raised into these at the public entry points.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A library error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The master index could not be read or parsed.
    #[display("failed to load master index: {}", _0.display())]
    Index(#[error(not(source))] PathBuf),
    #[display("corpus scan failed")]
    Scan,
    #[display("failed to organize file")]
    Organize,
    /// A listing file line fits none of the expected shapes.
    #[display("invalid listing line {line}: {content}")]
    Listing { line: usize, content: String },
    #[display("failed to read listing: {}", _0.display())]
    ListingFile(#[error(not(source))] PathBuf),
    #[display("issue with path generation from template")]
    Template,
    /// One of the concurrent survey tasks did not complete.
    #[display("survey task failed")]
    Survey,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Scan | Self::Organize)
    }
}
