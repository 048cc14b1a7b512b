//! Canonical per-work records and the precedence rules that merge them.

use crate::locate::Candidates;
use gutcat_extract::models::{Format, LanguageTag};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// One work, resolved to a single canonical file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRecord {
    pub identifier: u64,
    /// The canonical file.
    pub path: PathBuf,
    pub format: Format,
    /// Only ever populated from the master index.
    pub title: Option<String>,
    pub languages: BTreeSet<LanguageTag>,
    /// Files of other formats found for the same work.
    pub secondary_paths: BTreeMap<Format, PathBuf>,
}
impl BookRecord {
    /// Builds the record for one work directory: the highest-precedence
    /// candidate becomes canonical, the rest become secondary paths.
    ///
    /// Returns `None` when there is no txt, epub or pdf candidate.
    pub fn build(identifier: u64, candidates: &Candidates, languages: BTreeSet<LanguageTag>) -> Option<Self> {
        let mut files = candidates.files();
        let (format, path) = files.next()?;
        Some(Self {
            identifier,
            path: path.to_path_buf(),
            format,
            title: None,
            languages,
            secondary_paths: files.map(|(format, path)| (format, path.to_path_buf())).collect(),
        })
    }
}

/// What [`Shelf::admit`] did with a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// First record for this identifier.
    Inserted,
    /// The incoming record outranked the existing one, whose format is given.
    Promoted(Format),
    /// The existing record kept precedence.
    Kept,
}

/// Accumulates canonical records, enforcing `txt > epub > pdf` precedence
/// across repeated admissions of the same identifier.
///
/// `epub_only` and `pdf_only` hold the identifiers whose canonical file is an
/// epub or a pdf; an identifier leaves them as soon as it gains a txt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Shelf {
    pub records: BTreeMap<u64, BookRecord>,
    pub epub_only: BTreeSet<u64>,
    pub pdf_only: BTreeSet<u64>,
}
impl Shelf {
    pub fn admit(&mut self, record: BookRecord) -> Admission {
        let identifier = record.identifier;
        let Some(existing) = self.records.get_mut(&identifier) else {
            self.register(identifier, record.format);
            self.records.insert(identifier, record);
            return Admission::Inserted;
        };
        if record.format > existing.format {
            let previous = std::mem::replace(existing, record);
            for (format, path) in previous.secondary_paths.into_iter().chain([(previous.format, previous.path)]) {
                if format != existing.format {
                    existing.secondary_paths.entry(format).or_insert(path);
                }
            }
            let format = existing.format;
            self.purge(identifier);
            self.register(identifier, format);
            return Admission::Promoted(previous.format);
        }
        let incoming = record.format;
        for (format, path) in record.secondary_paths.into_iter().chain([(incoming, record.path)]) {
            if format != existing.format {
                existing.secondary_paths.entry(format).or_insert(path);
            }
        }
        Admission::Kept
    }

    fn register(&mut self, identifier: u64, format: Format) {
        match format {
            Format::Txt => {},
            Format::Epub => {
                self.epub_only.insert(identifier);
            },
            Format::Pdf => {
                self.pdf_only.insert(identifier);
            },
        }
    }

    fn purge(&mut self, identifier: u64) {
        self.epub_only.remove(&identifier);
        self.pdf_only.remove(&identifier);
    }
}
