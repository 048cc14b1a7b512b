//! Error types for the [`scan`](super) module.
//!
//! Absences are not errors: a probe that finds nothing is a skip. Only I/O
//! failures on the directories themselves end a scan.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A scan error with automatic location tracking via [`exn::Exn`].
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for scan operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// A work directory exists but could not be listed.
    #[display("failed to list directory: {}", _0.display())]
    Io(#[error(not(source))] PathBuf),
    /// The blocking scan task panicked or was cancelled.
    #[display("scan task did not complete")]
    Join,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}
