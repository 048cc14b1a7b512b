//! Open-ended corpus scanning.
//!
//! The corpus has no authoritative upper bound: the scanner walks identifiers
//! upwards from a starting point and gives up after a run of consecutive
//! misses. The result is an immutable [`Snapshot`] per root.

mod corpus;
pub mod error;

pub use self::corpus::scan_corpus;
use crate::detect::Detector;
use crate::error::{ErrorKind as LibraryErrorKind, Result as LibraryResult};
use crate::locate::{Layout, Locator};
use crate::record::BookRecord;
use crate::scan::error::{ErrorKind, Result as ScanResult};
use exn::ResultExt;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// Consecutive misses tolerated before a scan assumes the corpus has ended.
pub const DEFAULT_MISS_THRESHOLD: u64 = 100;

/// Where a scan starts and when it stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanPolicy {
    pub start: u64,
    pub miss_threshold: u64,
}
impl Default for ScanPolicy {
    fn default() -> Self {
        Self {
            start: 1,
            miss_threshold: DEFAULT_MISS_THRESHOLD,
        }
    }
}

/// Everything one scan learned about one root.
///
/// Every identifier in `[start, frontier)` is in exactly one of `records` or
/// `skipped`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub root: PathBuf,
    pub layout: Layout,
    pub records: BTreeMap<u64, BookRecord>,
    /// Probed and found absent, in probe order.
    pub skipped: Vec<u64>,
    /// Works whose canonical file is an epub.
    pub epub_only: BTreeSet<u64>,
    /// Works whose canonical file is a pdf.
    pub pdf_only: BTreeSet<u64>,
    /// Works whose languages defaulted because no metadata yielded any.
    pub no_language: BTreeSet<u64>,
    /// The probe whose miss exceeded the threshold.
    pub frontier: u64,
}
impl Snapshot {
    pub fn description(&self) -> String {
        let kind = match self.layout {
            Layout::Tree => "directory tree",
            Layout::Cache => "cache tree",
        };
        format!("{kind} {}", self.root.display())
    }

    pub fn contains(&self, identifier: u64) -> bool {
        self.records.contains_key(&identifier)
    }
}

/// Scans a root on the blocking thread pool with the default detector cascade.
pub async fn scan(locator: Locator, policy: ScanPolicy) -> LibraryResult<Snapshot> {
    scan_inner(locator, policy).await.or_raise(|| LibraryErrorKind::Scan)
}

async fn scan_inner(locator: Locator, policy: ScanPolicy) -> ScanResult<Snapshot> {
    tokio::task::spawn_blocking(move || scan_corpus(&locator, &Detector::default(), policy))
        .await
        .or_raise(|| ErrorKind::Join)?
}
