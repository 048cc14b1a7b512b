use crate::detect::Detector;
use crate::locate::Locator;
use crate::record::{BookRecord, Shelf};
use crate::scan::error::Result;
use crate::scan::{ScanPolicy, Snapshot};
use std::collections::BTreeSet;
use tracing::instrument;

/// Probes identifiers upwards from `policy.start` until more than
/// `policy.miss_threshold` consecutive identifiers have no files.
///
/// A hit flushes the pending run of misses into `skipped`. At termination the
/// trailing run is flushed as well, and the probe that broke the threshold
/// becomes the snapshot's frontier.
#[instrument(skip_all, fields(root = %locator.root().display(), layout = ?locator.layout()))]
pub fn scan_corpus(locator: &Locator, detector: &Detector, policy: ScanPolicy) -> Result<Snapshot> {
    let mut shelf = Shelf::default();
    let mut skipped = Vec::new();
    let mut misses = Vec::new();
    let mut no_language = BTreeSet::new();
    let mut identifier = policy.start;
    let frontier = loop {
        let Some(candidates) = locator.locate(identifier)? else {
            if misses.len() as u64 >= policy.miss_threshold {
                break identifier;
            }
            misses.push(identifier);
            identifier += 1;
            continue;
        };
        skipped.append(&mut misses);
        let detection = detector.detect(identifier, &candidates);
        if detection.defaulted {
            no_language.insert(identifier);
        }
        if let Some(record) = BookRecord::build(identifier, &candidates, detection.languages) {
            tracing::debug!(identifier, format = %record.format, path = %record.path.display(), "Found work");
            shelf.admit(record);
        }
        identifier += 1;
    };
    skipped.append(&mut misses);

    let Shelf {
        records,
        epub_only,
        pdf_only,
    } = shelf;
    let snapshot = Snapshot {
        root: locator.root().to_path_buf(),
        layout: locator.layout(),
        records,
        skipped,
        epub_only,
        pdf_only,
        no_language,
        frontier,
    };
    tracing::info!(
        records = snapshot.records.len(),
        skipped = snapshot.skipped.len(),
        epub_only = snapshot.epub_only.len(),
        pdf_only = snapshot.pdf_only.len(),
        no_language = snapshot.no_language.len(),
        frontier,
        "Scanned {}",
        snapshot.description()
    );
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locate::{Layout, tree_path};
    use gutcat_extract::models::Format;
    use std::fs;
    use std::path::Path;

    fn work(root: &Path, identifier: u64, name: &str, contents: &str) {
        let dir = root.join(tree_path(identifier));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(name), contents).unwrap();
    }

    fn scan(root: &Path, policy: ScanPolicy) -> Snapshot {
        scan_corpus(&Locator::new(root, Layout::Tree), &Detector::default(), policy).unwrap()
    }

    #[test]
    fn terminates_after_threshold() {
        let root = tempfile::tempdir().unwrap();
        for id in 1..=3 {
            work(root.path(), id, &format!("{id}.txt"), "Language: English\n");
        }
        let snapshot = scan(root.path(), ScanPolicy::default());
        assert_eq!(snapshot.records.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(snapshot.skipped, (4..=103).collect::<Vec<_>>());
        assert_eq!(snapshot.frontier, 104);
    }

    #[test]
    fn every_probe_is_accounted_for() {
        let root = tempfile::tempdir().unwrap();
        for id in [2, 5, 6, 11] {
            work(root.path(), id, &format!("{id}.txt"), "");
        }
        let policy = ScanPolicy {
            start: 1,
            miss_threshold: 4,
        };
        let snapshot = scan(root.path(), policy);
        assert_eq!(snapshot.skipped, vec![1, 3, 4, 7, 8, 9, 10, 12, 13, 14, 15]);
        assert_eq!(snapshot.frontier, 16);
        for id in 1..snapshot.frontier {
            assert!(snapshot.records.contains_key(&id) ^ snapshot.skipped.contains(&id), "{id}");
        }
    }

    #[test]
    fn gap_longer_than_threshold_ends_scan() {
        let root = tempfile::tempdir().unwrap();
        work(root.path(), 1, "1.txt", "");
        work(root.path(), 5, "5.txt", "");
        let policy = ScanPolicy {
            start: 1,
            miss_threshold: 2,
        };
        let snapshot = scan(root.path(), policy);
        assert_eq!(snapshot.records.keys().copied().collect::<Vec<_>>(), vec![1]);
        assert_eq!(snapshot.skipped, vec![2, 3]);
        assert_eq!(snapshot.frontier, 4);
    }

    #[test]
    fn records_languages_and_registries() {
        let root = tempfile::tempdir().unwrap();
        work(root.path(), 1, "1.txt", "Title: A\n*** START ***\n");
        work(root.path(), 2, "pg2.epub", "");
        work(root.path(), 3, "3.pdf", "");
        work(root.path(), 4, "4.txt", "Language: French\n");
        work(root.path(), 4, "pg4.epub", "");
        let snapshot = scan(
            root.path(),
            ScanPolicy {
                start: 1,
                miss_threshold: 1,
            },
        );
        assert_eq!(snapshot.no_language, BTreeSet::from([1, 2, 3]));
        assert_eq!(snapshot.epub_only, BTreeSet::from([2]));
        assert_eq!(snapshot.pdf_only, BTreeSet::from([3]));
        assert_eq!(snapshot.records[&4].format, Format::Txt);
        assert_eq!(snapshot.records[&4].languages.iter().map(|l| l.as_str()).collect::<Vec<_>>(), vec!["french"]);
    }

    #[test]
    fn starts_at_configured_identifier() {
        let root = tempfile::tempdir().unwrap();
        work(root.path(), 1, "1.txt", "");
        work(root.path(), 10, "10.txt", "");
        let snapshot = scan(
            root.path(),
            ScanPolicy {
                start: 10,
                miss_threshold: 1,
            },
        );
        assert_eq!(snapshot.records.keys().copied().collect::<Vec<_>>(), vec![10]);
        assert_eq!(snapshot.skipped, vec![11]);
    }
}
