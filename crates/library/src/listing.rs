//! The flat text listing of a catalog, and reading it back.
//!
//! ```text
//!
//!  LANGUAGE en:
//!
//!  FILE FORMAT txt:
//! /corpus/1/0/0/1000/1000.txt
//! ```
//!
//! A listing written by `list` can be handed to `move` or `copy` later in
//! place of a corpus directory. Identifiers and titles do not survive the
//! round trip.

use crate::catalog::LanguageCatalog;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use gutcat_extract::models::{Format, LanguageTag};
use std::fmt::Write;
use std::path::{Path, PathBuf};

const LANGUAGE_KEYWORD: &str = "LANGUAGE";
const FORMAT_KEYWORDS: [&str; 2] = ["FILE", "FORMAT"];

/// One file to be filed under a language and format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub language: LanguageTag,
    pub format: Format,
    pub source: PathBuf,
    pub identifier: Option<u64>,
    pub title: Option<String>,
}
impl Placement {
    /// The source's file name, which is kept as-is in the target tree.
    pub fn basename(&self) -> Option<&str> {
        self.source.file_name().and_then(|name| name.to_str())
    }
}

/// Renders the catalog as a listing.
pub fn render(catalog: &LanguageCatalog) -> String {
    let mut listing = String::new();
    let mut current: Option<&LanguageTag> = None;
    for (language, format, records) in catalog.buckets() {
        if current != Some(language) {
            // Infallible: writing to a String.
            let _ = write!(listing, "\n {LANGUAGE_KEYWORD} {language}:\n");
            current = Some(language);
        }
        let _ = write!(listing, "\n {} {} {format}:\n", FORMAT_KEYWORDS[0], FORMAT_KEYWORDS[1]);
        for record in records {
            let _ = writeln!(listing, "{}", record.path.display());
        }
    }
    listing
}

/// A listing read back from text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    placements: Vec<Placement>,
}
impl Listing {
    /// Parses listing text. Blank lines are ignored; a path before both a
    /// language and a format header, or an unknown format, is an error.
    pub fn parse(text: &str) -> Result<Self> {
        let mut language: Option<LanguageTag> = None;
        let mut format: Option<Format> = None;
        let mut placements = Vec::new();
        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            let invalid = || ErrorKind::Listing {
                line: index + 1,
                content: line.to_string(),
            };
            let tokens: Vec<&str> = line.split_whitespace().collect();
            match tokens.as_slice() {
                [keyword, tag] if *keyword == LANGUAGE_KEYWORD && tag.ends_with(':') => {
                    language = Some(tag.trim_end_matches(':').parse::<LanguageTag>().or_raise(invalid)?);
                    format = None;
                },
                [file, keyword, name] if [*file, *keyword] == FORMAT_KEYWORDS && name.ends_with(':') => {
                    if language.is_none() {
                        exn::bail!(invalid());
                    }
                    format = Some(name.trim_end_matches(':').parse::<Format>().or_raise(invalid)?);
                },
                _ => {
                    let (Some(language), Some(format)) = (&language, format) else {
                        exn::bail!(invalid());
                    };
                    placements.push(Placement {
                        language: language.clone(),
                        format,
                        source: PathBuf::from(line),
                        identifier: None,
                        title: None,
                    });
                },
            }
        }
        Ok(Self { placements })
    }

    /// Reads and parses a listing file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).or_raise(|| ErrorKind::ListingFile(path.to_path_buf()))?;
        Self::parse(&text).or_raise(|| ErrorKind::ListingFile(path.to_path_buf()))
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn into_placements(self) -> Vec<Placement> {
        self.placements
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }
}
