//! Cross-source reconciliation.
//!
//! The two scans and the master index each know part of the corpus. This
//! module compares them: which misses of one scan the other one found, which
//! identifiers nobody found, and where the index disagrees with the disk.

use crate::locate::Locator;
use crate::scan::Snapshot;
use crate::scan::error::Result;
use gutcat_extract::models::IndexSnapshot;
use std::collections::BTreeSet;
use tracing::instrument;

/// Where the misses of each scan ended up.
///
/// Every identifier in either snapshot's `skipped` sequence lands in exactly
/// one of `cache_only`, `directory_only` or `unresolved`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Missed in the directory tree, found in the cache tree.
    pub cache_only: BTreeSet<u64>,
    /// Missed in the cache tree, found in the directory tree.
    pub directory_only: BTreeSet<u64>,
    /// Found by neither scan.
    pub unresolved: BTreeSet<u64>,
    /// Directory records whose canonical file is an epub.
    pub epub_only: usize,
    /// Directory records whose canonical file is a pdf.
    pub pdf_only: usize,
}
impl Reconciliation {
    /// Number of identifiers accounted for across all buckets.
    pub fn len(&self) -> usize {
        self.cache_only.len() + self.directory_only.len() + self.unresolved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn log_summary(&self) {
        tracing::info!(
            cache_only = self.cache_only.len(),
            directory_only = self.directory_only.len(),
            unresolved = self.unresolved.len(),
            epub_only = self.epub_only,
            pdf_only = self.pdf_only,
            "Reconciled scan misses"
        );
        if !self.unresolved.is_empty() {
            tracing::debug!(identifiers = ?self.unresolved, "Identifiers found by neither scan");
        }
    }
}

/// Compares the misses of both scans against the other scan's records.
pub fn reconcile(directory: &Snapshot, cache: &Snapshot) -> Reconciliation {
    let mut report = Reconciliation {
        epub_only: directory.epub_only.len(),
        pdf_only: directory.pdf_only.len(),
        ..Reconciliation::default()
    };
    for &identifier in directory.skipped.iter().chain(cache.skipped.iter()) {
        let bucket = if directory.contains(identifier) {
            &mut report.directory_only
        } else if cache.contains(identifier) {
            &mut report.cache_only
        } else {
            &mut report.unresolved
        };
        bucket.insert(identifier);
    }
    report
}

/// Files left in the directories of an identifier neither scan could use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Residual {
    pub identifier: u64,
    pub tree_files: Vec<String>,
    pub cache_files: Vec<String>,
}
impl Residual {
    pub fn is_empty(&self) -> bool {
        self.tree_files.is_empty() && self.cache_files.is_empty()
    }
}

/// Lists what is actually on disk for every unresolved identifier.
#[instrument(skip_all, fields(unresolved = report.unresolved.len()))]
pub fn inspect(report: &Reconciliation, tree: &Locator, cache: &Locator) -> Result<Vec<Residual>> {
    let mut residuals = Vec::with_capacity(report.unresolved.len());
    for &identifier in &report.unresolved {
        let residual = Residual {
            identifier,
            tree_files: tree.residuals(identifier)?,
            cache_files: cache.residuals(identifier)?,
        };
        if !residual.is_empty() {
            tracing::debug!(identifier, tree = ?residual.tree_files, cache = ?residual.cache_files, "Residual files");
        }
        residuals.push(residual);
    }
    Ok(residuals)
}

/// Disagreements between the master index and what the scans found, limited
/// to the identifier range the index was parsed over.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexDiscrepancies {
    /// Declared by the index, found by neither scan.
    pub declared_missing: BTreeSet<u64>,
    /// Found on disk, never mentioned by the index.
    pub undeclared_present: BTreeSet<u64>,
    /// Marked as not available, yet found on disk.
    pub unlisted_present: BTreeSet<u64>,
}
impl IndexDiscrepancies {
    pub fn compute(index: &IndexSnapshot, directory: &Snapshot, cache: &Snapshot) -> Self {
        let Some(lowest) = index.lowest_identifier() else {
            return Self::default();
        };
        let range = lowest..=index.last_identifier;
        let present = |identifier: u64| directory.contains(identifier) || cache.contains(identifier);
        let on_disk = directory.records.range(range.clone()).chain(cache.records.range(range.clone())).map(|(&id, _)| id);
        Self {
            declared_missing: index.declared.range(range.clone()).map(|(&id, _)| id).filter(|&id| !present(id)).collect(),
            undeclared_present: on_disk.filter(|&id| !index.mentions(id)).collect(),
            unlisted_present: index.unlisted.range(range).copied().filter(|&id| present(id)).collect(),
        }
    }

    pub fn log_summary(&self) {
        tracing::info!(
            declared_missing = self.declared_missing.len(),
            undeclared_present = self.undeclared_present.len(),
            unlisted_present = self.unlisted_present.len(),
            "Checked master index against scans"
        );
    }
}
