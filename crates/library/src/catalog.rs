//! The language catalog: every canonical record bucketed by language, then
//! by format.

use crate::listing::Placement;
use crate::record::{BookRecord, Shelf};
use crate::scan::Snapshot;
use gutcat_extract::models::{Format, IndexSnapshot, LanguageTag};
use std::collections::BTreeSet;

/// Which snapshots feed the catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CatalogScope {
    /// Directory tree records only.
    #[default]
    Directory,
    /// Directory tree records, then cache records under the same precedence
    /// rules.
    Merged,
}

/// A format bucket within one language.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FormatBucket {
    format: Format,
    records: Vec<BookRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct LanguageBucket {
    language: LanguageTag,
    formats: Vec<FormatBucket>,
}

/// Records keyed by language then format.
///
/// Buckets keep the order in which they were first filled, so the same
/// snapshots always render the same listing. A record with several languages
/// is held once per language.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageCatalog {
    languages: Vec<LanguageBucket>,
}
impl LanguageCatalog {
    pub fn build(directory: &Snapshot, cache: &Snapshot, index: Option<&IndexSnapshot>, scope: CatalogScope) -> Self {
        let mut catalog = Self::default();
        let titled = |record: &BookRecord| {
            let mut record = record.clone();
            record.title = index.and_then(|index| index.title(record.identifier)).map(str::to_string);
            record
        };
        match scope {
            CatalogScope::Directory => {
                for record in directory.records.values() {
                    catalog.insert(titled(record));
                }
            },
            CatalogScope::Merged => {
                let mut shelf = Shelf::default();
                for record in directory.records.values().chain(cache.records.values()) {
                    shelf.admit(titled(record));
                }
                for record in shelf.records.into_values() {
                    catalog.insert(record);
                }
            },
        }
        catalog
    }

    /// Adds a record under each of its languages.
    pub fn insert(&mut self, record: BookRecord) {
        for language in &record.languages {
            let position = match self.languages.iter().position(|bucket| &bucket.language == language) {
                Some(position) => position,
                None => {
                    self.languages.push(LanguageBucket {
                        language: language.clone(),
                        formats: Vec::new(),
                    });
                    self.languages.len() - 1
                },
            };
            let formats = &mut self.languages[position].formats;
            match formats.iter_mut().find(|bucket| bucket.format == record.format) {
                Some(bucket) => bucket.records.push(record.clone()),
                None => formats.push(FormatBucket {
                    format: record.format,
                    records: vec![record.clone()],
                }),
            }
        }
    }

    /// Every non-empty bucket in catalog order.
    pub fn buckets(&self) -> impl Iterator<Item = (&LanguageTag, Format, &[BookRecord])> {
        self.languages.iter().flat_map(|language| {
            language
                .formats
                .iter()
                .map(move |bucket| (&language.language, bucket.format, bucket.records.as_slice()))
        })
    }

    pub fn languages(&self) -> impl Iterator<Item = &LanguageTag> {
        self.languages.iter().map(|bucket| &bucket.language)
    }

    /// The records filed under one language and format.
    pub fn get(&self, language: &str, format: Format) -> &[BookRecord] {
        self.buckets()
            .find(|(tag, bucket_format, _)| tag.as_str() == language && *bucket_format == format)
            .map(|(_, _, records)| records)
            .unwrap_or_default()
    }

    /// One placement per catalog entry, in catalog order.
    pub fn placements(&self) -> Vec<Placement> {
        self.buckets()
            .flat_map(|(language, format, records)| {
                records.iter().map(move |record| Placement {
                    language: language.clone(),
                    format,
                    source: record.path.clone(),
                    identifier: Some(record.identifier),
                    title: record.title.clone(),
                })
            })
            .collect()
    }

    /// Number of entries, counting a multi-language record once per language.
    pub fn len(&self) -> usize {
        self.buckets().map(|(_, _, records)| records.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of distinct works in the catalog.
    pub fn works(&self) -> usize {
        self.buckets()
            .flat_map(|(_, _, records)| records.iter().map(|record| record.identifier))
            .collect::<BTreeSet<_>>()
            .len()
    }

    pub fn log_summary(&self) {
        tracing::info!(
            works = self.works(),
            entries = self.len(),
            languages = self.languages.len(),
            "Built language catalog"
        );
        for (language, format, records) in self.buckets() {
            tracing::info!(%language, %format, count = records.len(), "Catalog bucket");
        }
    }
}
