//! Mapping work identifiers to directories, and directories to candidate files.
//!
//! The main tree interleaves the identifier's digits as directories
//! (`1000` lives in `1/0/0/1000/`, `5` in `0/5/`), while the cache tree is
//! flat (`<cache>/1000/`). Both hold the same kinds of files, so one
//! [`Locator`] parameterized by [`Layout`] serves both scans.

use crate::scan::error::{ErrorKind, Result};
use exn::ResultExt;
use gutcat_extract::models::Format;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};

const README_MARKER: &str = "readme";
const RDF_EXTENSION: &str = ".rdf";

/// How work directories are arranged under a root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Digit-interleaved directories, as in the main archive tree.
    Tree,
    /// One flat directory per identifier.
    Cache,
}

/// Filter applied to the stems of plain-text candidates.
///
/// Auxiliary text files (alternate encodings such as `1000-8.txt` survive,
/// but `1000-readme.txt` or `1000x.txt` do not) are recognized by an
/// alphabetic character in the stem. This is an approximation: some genuine
/// texts carry letters in their names and are skipped with it enabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StemFilter {
    #[default]
    RejectAlphabetic,
    AllowAll,
}
impl StemFilter {
    fn accepts(&self, stem: &str) -> bool {
        match self {
            StemFilter::RejectAlphabetic => !stem.chars().any(char::is_alphabetic),
            StemFilter::AllowAll => true,
        }
    }
}

/// Candidate files found in a single work directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Candidates {
    pub txt: Option<PathBuf>,
    pub epub: Option<PathBuf>,
    pub pdf: Option<PathBuf>,
    /// RDF metadata, either beside the work or in the cache tree.
    pub rdf: Option<PathBuf>,
}
impl Candidates {
    pub fn get(&self, format: Format) -> Option<&Path> {
        match format {
            Format::Txt => self.txt.as_deref(),
            Format::Epub => self.epub.as_deref(),
            Format::Pdf => self.pdf.as_deref(),
        }
    }

    fn slot(&mut self, format: Format) -> &mut Option<PathBuf> {
        match format {
            Format::Txt => &mut self.txt,
            Format::Epub => &mut self.epub,
            Format::Pdf => &mut self.pdf,
        }
    }

    /// Content files present, highest precedence first.
    pub fn files(&self) -> impl Iterator<Item = (Format, &Path)> {
        Format::ALL.into_iter().filter_map(|format| self.get(format).map(|path| (format, path)))
    }

    /// `true` when no content file (txt, epub or pdf) was found.
    pub fn is_empty(&self) -> bool {
        self.files().next().is_none()
    }
}

/// Resolves identifiers to work directories and candidate files under one root.
#[derive(Debug, Clone)]
pub struct Locator {
    root: PathBuf,
    layout: Layout,
    stem_filter: StemFilter,
    metadata_root: Option<PathBuf>,
}
impl Locator {
    pub fn new(root: impl Into<PathBuf>, layout: Layout) -> Self {
        Self {
            root: root.into(),
            layout,
            stem_filter: StemFilter::default(),
            metadata_root: None,
        }
    }

    pub fn with_stem_filter(mut self, stem_filter: StemFilter) -> Self {
        self.stem_filter = stem_filter;
        self
    }

    /// Consult `<cache_root>/<id>/pg<id>.rdf` when a work directory holds no
    /// RDF file of its own.
    pub fn with_metadata_root(mut self, cache_root: impl Into<PathBuf>) -> Self {
        self.metadata_root = Some(cache_root.into());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// The directory a work with this identifier lives in.
    pub fn directory(&self, identifier: u64) -> PathBuf {
        match self.layout {
            Layout::Tree => self.root.join(tree_path(identifier)),
            Layout::Cache => self.root.join(identifier.to_string()),
        }
    }

    /// Lists the candidate files for an identifier.
    ///
    /// Returns `Ok(None)` when the directory does not exist or holds no txt,
    /// epub or pdf candidate. Entries are examined in name order and the
    /// first match per format is kept.
    pub fn locate(&self, identifier: u64) -> Result<Option<Candidates>> {
        let directory = self.directory(identifier);
        let Some(names) = read_names(&directory)? else {
            return Ok(None);
        };
        let id = identifier.to_string();
        let epub_suffix = format!("{id}.{}", Format::Epub.extension());
        let mut candidates = Candidates::default();
        for name in names {
            if name.to_lowercase().contains(README_MARKER) || !name.contains(&id) {
                continue;
            }
            if name.ends_with(RDF_EXTENSION) {
                candidates.rdf.get_or_insert_with(|| directory.join(&name));
                continue;
            }
            let Some(format) = Format::ALL.into_iter().find(|f| name.ends_with(&format!(".{}", f.extension()))) else {
                continue;
            };
            let accepted = match format {
                Format::Txt => self.stem_filter.accepts(Path::new(&name).file_stem().and_then(|s| s.to_str()).unwrap_or("")),
                Format::Epub => name.ends_with(&epub_suffix),
                Format::Pdf => true,
            };
            if accepted {
                candidates.slot(format).get_or_insert_with(|| directory.join(&name));
            }
        }
        if candidates.is_empty() {
            return Ok(None);
        }
        if candidates.rdf.is_none() {
            candidates.rdf = self.metadata_root.as_deref().and_then(|root| cache_rdf(root, identifier));
        }
        Ok(Some(candidates))
    }

    /// Every file name in the identifier's directory, sorted. Empty when the
    /// directory does not exist.
    pub fn residuals(&self, identifier: u64) -> Result<Vec<String>> {
        Ok(read_names(&self.directory(identifier))?.unwrap_or_default())
    }
}

/// Relative path of a work directory in the digit-interleaved tree.
///
/// ```
/// use gutcat_library::locate::tree_path;
/// use std::path::Path;
/// assert_eq!(tree_path(1000), Path::new("1/0/0/1000"));
/// assert_eq!(tree_path(12), Path::new("1/12"));
/// assert_eq!(tree_path(5), Path::new("0/5"));
/// ```
pub fn tree_path(identifier: u64) -> PathBuf {
    let digits = identifier.to_string();
    let mut path = PathBuf::new();
    if identifier < 10 {
        path.push("0");
    }
    for digit in digits[..digits.len() - 1].chars() {
        path.push(digit.to_string());
    }
    path.push(&digits);
    path
}

/// The cache tree's RDF file for an identifier, if it exists.
pub fn cache_rdf(cache_root: &Path, identifier: u64) -> Option<PathBuf> {
    let path = cache_root.join(identifier.to_string()).join(format!("pg{identifier}{RDF_EXTENSION}"));
    path.is_file().then_some(path)
}

/// Sorted UTF-8 file names in a directory; `None` if it is missing or not a directory.
fn read_names(directory: &Path) -> Result<Option<Vec<String>>> {
    let entries = match std::fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(e) if matches!(e.kind(), IoErrorKind::NotFound | IoErrorKind::NotADirectory) => return Ok(None),
        Err(e) => return Err(e).or_raise(|| ErrorKind::Io(directory.to_path_buf())),
    };
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.or_raise(|| ErrorKind::Io(directory.to_path_buf()))?;
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(name) => tracing::debug!(?name, directory = %directory.display(), "Skipping non UTF-8 file name"),
        }
    }
    names.sort();
    Ok(Some(names))
}
