use std::collections::{BTreeMap, BTreeSet};

/// What the master index declares about a single work.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexEntry {
    pub title: String,
    /// Language name as written in the index (e.g. `"Italian"`), defaults to `"English"`.
    pub language: String,
}

/// Immutable result of parsing the master index document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexSnapshot {
    /// Identifier of the first (highest) listing; the index's idea of corpus size.
    pub last_identifier: u64,
    pub declared: BTreeMap<u64, IndexEntry>,
    /// Identifiers explicitly marked as not available.
    pub unlisted: BTreeSet<u64>,
}
impl IndexSnapshot {
    /// Lowest identifier the parse reached, declared or unlisted.
    pub fn lowest_identifier(&self) -> Option<u64> {
        let declared = self.declared.keys().next().copied();
        let unlisted = self.unlisted.first().copied();
        match (declared, unlisted) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// `true` if the index mentions the identifier at all.
    pub fn mentions(&self, identifier: u64) -> bool {
        self.declared.contains_key(&identifier) || self.unlisted.contains(&identifier)
    }

    pub fn title(&self, identifier: u64) -> Option<&str> {
        self.declared.get(&identifier).map(|e| e.title.as_str())
    }
}
