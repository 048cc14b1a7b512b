use crate::Context;
use crate::error::{ErrorKind as LibraryErrorKind, Result as LibraryResult};
use crate::listing::Placement;
use crate::organize::error::{ErrorKind as OrganizeErrorKind, Result as OrganizeResult};
use crate::organize::file::{Action, place_file};
use async_stream::stream;
use exn::ResultExt;
use futures::stream::FuturesUnordered;
use futures::{Stream, StreamExt};
use gutcat_storage::{BackendHandle, Transfer};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::PathBuf;

/// Progress events emitted by [`organize`] as it works through the placements.
///
/// Events follow a strict ordering:
/// 1. [`Started`](Self::Started): exactly once.
/// 2. [`DiscoveryComplete`](Self::DiscoveryComplete): exactly once, with the
///    number of distinct targets.
/// 3. [`Placed`](Self::Placed): zero or more times, one per target.
/// 4. [`Complete`](Self::Complete): exactly once.
///
/// Errors for individual placements are interleaved as `Err` items and never
/// end the stream early.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrganizeEvent {
    Started,
    DiscoveryComplete(u64),
    Placed(Action),
    Complete,
}

/// All targets a single source file goes to.
struct Job {
    source: PathBuf,
    targets: Vec<PathBuf>,
}

/// Streams [`OrganizeEvent`]s while copying or moving every placement to its
/// template-derived path in `backend`.
///
/// Placements sharing a source (a work filed under several languages) are
/// handled together: the source is copied to every target but the last, and
/// only the last receives the configured transfer, so a move still leaves a
/// copy everywhere. Distinct sources run concurrently, at most
/// `ctx.concurrency` at a time.
pub fn organize<'a>(
    backend: &'a BackendHandle,
    ctx: &'a Context,
    placements: Vec<Placement>,
) -> impl Stream<Item = LibraryResult<OrganizeEvent>> + 'a {
    stream! {
        for await event in organize_inner(backend, ctx, placements) {
            yield event.or_raise(|| LibraryErrorKind::Organize);
        }
    }
}

fn organize_inner<'a>(
    backend: &'a BackendHandle,
    ctx: &'a Context,
    placements: Vec<Placement>,
) -> impl Stream<Item = OrganizeResult<OrganizeEvent>> + 'a {
    // `rustfmt` does not format macros that use braces. Wrap in parentheses!
    stream!({
        yield Ok(OrganizeEvent::Started);

        let mut jobs: Vec<Job> = Vec::new();
        let mut by_source: HashMap<PathBuf, usize> = HashMap::new();
        let mut claimed: HashMap<PathBuf, PathBuf> = HashMap::new();
        for placement in placements {
            let target = match ctx.template.generate(&placement).or_raise(|| OrganizeErrorKind::Template) {
                Ok(target) => PathBuf::from(target),
                Err(e) => {
                    yield Err(e);
                    continue;
                },
            };
            match claimed.entry(target.clone()) {
                Entry::Occupied(entry) if entry.get() == &placement.source => continue,
                Entry::Occupied(entry) => {
                    yield Err(exn::Exn::from(OrganizeErrorKind::Conflict {
                        target,
                        claimed_by: entry.get().clone(),
                    }));
                    continue;
                },
                Entry::Vacant(entry) => {
                    entry.insert(placement.source.clone());
                },
            }
            let index = *by_source.entry(placement.source.clone()).or_insert_with(|| {
                jobs.push(Job {
                    source: placement.source.clone(),
                    targets: Vec::new(),
                });
                jobs.len() - 1
            });
            jobs[index].targets.push(target);
        }
        let total: usize = jobs.iter().map(|job| job.targets.len()).sum();
        // Infallible: a usize (either 32- or 64-bit) will always fit in a u64.
        yield Ok(OrganizeEvent::DiscoveryComplete(u64::try_from(total).unwrap_or(0)));

        let mut futures: Vec<_> = jobs.into_iter().map(|job| run_job(backend, job, ctx.transfer)).collect();
        let mut processing = FuturesUnordered::new();
        processing.extend(futures.drain(..ctx.concurrency.max(1).min(futures.len())));
        while let Some(results) = processing.next().await {
            for result in results {
                yield result.map(OrganizeEvent::Placed);
            }
            // Pop-n-push, but FIFO instead of LIFO.
            if !futures.is_empty() {
                processing.push(futures.remove(0));
            }
        }

        yield Ok(OrganizeEvent::Complete);
    })
}

/// Places one source at each of its targets in turn.
async fn run_job(backend: &BackendHandle, job: Job, transfer: Transfer) -> Vec<OrganizeResult<Action>> {
    let last = job.targets.len().saturating_sub(1);
    let mut results = Vec::with_capacity(job.targets.len());
    for (index, target) in job.targets.into_iter().enumerate() {
        let transfer = match index == last {
            true => transfer,
            false => Transfer::Copy,
        };
        results.push(place_file(backend, &job.source, target, transfer).await);
    }
    results
}
