use crate::Context;
use crate::error::{ErrorKind as LibraryErrorKind, Result as LibraryResult};
use crate::listing::Placement;
use crate::organize::error::{ErrorKind as OrganizeErrorKind, Result as OrganizeResult};
use exn::ResultExt;
use gutcat_storage::{BackendHandle, Transfer};
use std::path::{Path, PathBuf};

/// The outcome of (successfully) organizing a single file.
///
/// Each variant carries the target path, relative to the backend root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// The target did not exist; the source was copied or moved there.
    Placed(PathBuf),
    /// A different file occupied the target and was replaced.
    Replaced(PathBuf),
    /// A file of the same size is already at the target; nothing was done.
    AlreadyPresent(PathBuf),
}
impl Action {
    pub fn path(&self) -> &Path {
        match self {
            Action::Placed(path) | Action::Replaced(path) | Action::AlreadyPresent(path) => path,
        }
    }
}

/// Copies or moves one placement to its template-derived location, according
/// to the [`Context`]'s template and transfer mode.
///
/// # Errors
/// Returns [`Exn<LibraryErrorKind::Organize>`](LibraryErrorKind::Organize)
/// raised from an inner [`Exn<OrganizeErrorKind>`](OrganizeErrorKind).
pub async fn organize_file(backend: &BackendHandle, ctx: &Context, placement: &Placement) -> LibraryResult<Action> {
    organize_file_inner(backend, ctx, placement).await.or_raise(|| LibraryErrorKind::Organize)
}

async fn organize_file_inner(backend: &BackendHandle, ctx: &Context, placement: &Placement) -> OrganizeResult<Action> {
    let target = ctx.template.generate(placement).or_raise(|| OrganizeErrorKind::Template)?;
    place_file(backend, &placement.source, PathBuf::from(target), ctx.transfer).await
}

/// Puts `source` at `target` unless a file of the same size is already there.
pub(crate) async fn place_file(
    backend: &BackendHandle,
    source: &Path,
    target: PathBuf,
    transfer: Transfer,
) -> OrganizeResult<Action> {
    let size = tokio::fs::metadata(source).await.or_raise(|| OrganizeErrorKind::Storage)?.len();
    let existing = match backend.exists(&target).await.or_raise(|| OrganizeErrorKind::Storage)? {
        true => Some(backend.stat(&target).await.or_raise(|| OrganizeErrorKind::Storage)?),
        false => None,
    };
    if existing.as_ref().is_some_and(|info| info.size == size) {
        tracing::debug!(source = %source.display(), target = %target.display(), "Already present");
        return Ok(Action::AlreadyPresent(target));
    }
    backend.place(source, &target, transfer).await.or_raise(|| OrganizeErrorKind::Storage)?;
    tracing::debug!(source = %source.display(), target = %target.display(), transfer = transfer.as_str(), "Placed file");
    Ok(match existing {
        Some(_) => Action::Replaced(target),
        None => Action::Placed(target),
    })
}
