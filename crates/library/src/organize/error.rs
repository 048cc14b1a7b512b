//! Error types for the [`organize`](super) module.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// An organize error with automatic location tracking via [`exn::Exn`].
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for organize operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Classifies the origin of an organize failure.
///
/// ### Operational Errors
/// - [`ErrorKind::Template`]
/// - [`ErrorKind::Conflict`]
///
/// ### Dependency Errors
/// - [`ErrorKind::Storage`]
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// A storage backend operation (stat, copy, move) failed, or the source
    /// could not be read.
    #[display("storage operation failed")]
    Storage,
    /// The [`PathGenerator`](crate::PathGenerator) could not render a path.
    #[display("could not render target path")]
    Template,
    /// Two different sources render to the same target path.
    #[display("target {} is already claimed by {}", target.display(), claimed_by.display())]
    Conflict {
        #[error(not(source))]
        target: PathBuf,
        #[error(not(source))]
        claimed_by: PathBuf,
    },
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage)
    }
}
