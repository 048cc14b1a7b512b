//! Language detection cascade.
//!
//! Each [`LanguageSource`] reads one kind of metadata and either yields a
//! non-empty set of tags or nothing. The [`Detector`] asks its sources in
//! order and takes the first answer; when none answers, the work is assumed
//! to be English and the detection is flagged as defaulted.

use crate::locate::Candidates;
use gutcat_extract::models::LanguageTag;
use gutcat_extract::{header_languages, rdf_languages};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// One strategy of the detection cascade.
pub trait LanguageSource {
    /// Short name for logging.
    fn name(&self) -> &'static str;

    /// Returns the languages this source finds, or `None` if it has no
    /// usable answer. Never returns an empty set.
    fn detect(&self, identifier: u64, candidates: &Candidates) -> Option<BTreeSet<LanguageTag>>;
}

/// Reads `<dcterms:language>` codes from the RDF metadata file.
#[derive(Debug, Clone, Copy, Default)]
pub struct RdfSource;
impl LanguageSource for RdfSource {
    fn name(&self) -> &'static str {
        "rdf"
    }

    fn detect(&self, identifier: u64, candidates: &Candidates) -> Option<BTreeSet<LanguageTag>> {
        let path = candidates.rdf.as_deref()?;
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(error) => {
                tracing::warn!(identifier, path = %path.display(), %error, "Could not read RDF metadata");
                return None;
            },
        };
        let languages = rdf_languages(&String::from_utf8_lossy(&bytes));
        if languages.is_empty() {
            tracing::debug!(identifier, path = %path.display(), "Could not find language in RDF metadata");
            return None;
        }
        Some(languages)
    }
}

/// Reads the `Language:` line from the header of the plain-text file.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderSource;
impl LanguageSource for HeaderSource {
    fn name(&self) -> &'static str {
        "header"
    }

    fn detect(&self, identifier: u64, candidates: &Candidates) -> Option<BTreeSet<LanguageTag>> {
        let path = candidates.txt.as_deref()?;
        let languages = match File::open(path) {
            Ok(file) => header_languages(lines_lossy(identifier, path, BufReader::new(file))),
            Err(error) => {
                tracing::warn!(identifier, path = %path.display(), %error, "Could not read text header");
                return None;
            },
        };
        (!languages.is_empty()).then_some(languages)
    }
}

/// Lines of a text file with invalid UTF-8 replaced. A read error ends the
/// iteration early.
fn lines_lossy<'a>(identifier: u64, path: &'a Path, reader: impl BufRead + 'a) -> impl Iterator<Item = String> + 'a {
    reader.split(b'\n').map_while(move |line| match line {
        Ok(line) => Some(String::from_utf8_lossy(&line).into_owned()),
        Err(error) => {
            tracing::warn!(identifier, path = %path.display(), %error, "Text header read failed");
            None
        },
    })
}

/// Outcome of running the cascade for one work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    /// Never empty.
    pub languages: BTreeSet<LanguageTag>,
    /// No source answered and the fallback tag was used.
    pub defaulted: bool,
}

/// Ordered list of language sources; the first to answer wins.
pub struct Detector {
    sources: Vec<Box<dyn LanguageSource + Send + Sync>>,
}
impl Default for Detector {
    fn default() -> Self {
        Self::new(vec![Box::new(RdfSource), Box::new(HeaderSource)])
    }
}
impl Detector {
    pub fn new(sources: Vec<Box<dyn LanguageSource + Send + Sync>>) -> Self {
        Self { sources }
    }

    pub fn detect(&self, identifier: u64, candidates: &Candidates) -> Detection {
        for source in &self.sources {
            if let Some(languages) = source.detect(identifier, candidates) {
                tracing::trace!(identifier, source = source.name(), ?languages, "Detected languages");
                return Detection {
                    languages,
                    defaulted: false,
                };
            }
        }
        Detection {
            languages: BTreeSet::from([LanguageTag::fallback()]),
            defaulted: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    const RDF: &str = "<rdf:RDF>\n  <dcterms:language>\n    <rdf:Description>\n      <rdf:value rdf:datatype=\"http://purl.org/dc/terms/RFC4646\">it</rdf:value>\n    </rdf:Description>\n  </dcterms:language>\n</rdf:RDF>\n";

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn tags(detection: &Detection) -> Vec<&str> {
        detection.languages.iter().map(LanguageTag::as_str).collect()
    }

    #[test]
    fn rdf_wins_over_header() {
        let dir = tempfile::tempdir().unwrap();
        let candidates = Candidates {
            txt: Some(write(dir.path(), "1000.txt", "Language: English\n*** START ***\n")),
            rdf: Some(write(dir.path(), "pg1000.rdf", RDF)),
            ..Candidates::default()
        };
        let detection = Detector::default().detect(1000, &candidates);
        assert_eq!(tags(&detection), vec!["it"]);
        assert!(!detection.defaulted);
    }

    #[test]
    fn header_used_when_rdf_has_no_language() {
        let dir = tempfile::tempdir().unwrap();
        let candidates = Candidates {
            txt: Some(write(dir.path(), "1000.txt", "Title: Foo\nLanguage: English, French\n*** START ***\n")),
            rdf: Some(write(dir.path(), "pg1000.rdf", "<rdf:RDF></rdf:RDF>")),
            ..Candidates::default()
        };
        assert_eq!(tags(&Detector::default().detect(1000, &candidates)), vec!["english", "french"]);
    }

    #[test]
    fn unreadable_rdf_falls_through() {
        let dir = tempfile::tempdir().unwrap();
        let candidates = Candidates {
            txt: Some(write(dir.path(), "3.txt", "Language: German\n")),
            rdf: Some(dir.path().join("missing.rdf")),
            ..Candidates::default()
        };
        assert_eq!(tags(&Detector::default().detect(3, &candidates)), vec!["german"]);
    }

    #[test]
    fn defaults_to_english_code() {
        let dir = tempfile::tempdir().unwrap();
        let candidates = Candidates {
            txt: Some(write(dir.path(), "1.txt", "Title: Foo\n*** START ***\nLanguage: French\n")),
            ..Candidates::default()
        };
        let detection = Detector::default().detect(1, &candidates);
        assert_eq!(tags(&detection), vec!["en"]);
        assert!(detection.defaulted);
    }

    #[test]
    fn invalid_utf8_header_is_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("2.txt");
        fs::write(&path, b"Title: \xff\xfe\nLanguage: Latin\n").unwrap();
        let candidates = Candidates {
            txt: Some(path),
            ..Candidates::default()
        };
        assert_eq!(tags(&Detector::default().detect(2, &candidates)), vec!["latin"]);
    }

    #[test]
    fn sources_are_pluggable() {
        struct Fixed;
        impl LanguageSource for Fixed {
            fn name(&self) -> &'static str {
                "fixed"
            }
            fn detect(&self, _: u64, _: &Candidates) -> Option<BTreeSet<LanguageTag>> {
                Some(BTreeSet::from(["eo".parse().unwrap()]))
            }
        }
        let detector = Detector::new(vec![Box::new(Fixed)]);
        assert_eq!(tags(&detector.detect(9, &Candidates::default())), vec!["eo"]);
    }
}
