use std::cmp::Ordering;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, ErrorKind};

/// A catalogued file format.
///
/// Formats are totally ordered by precedence: when several formats exist for
/// the same work, the greatest one is canonical (`Txt > Epub > Pdf`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Format {
    /// Plain text (`.txt`)
    Txt,
    /// EPUB e-book (`.epub`)
    Epub,
    /// Portable Document Format (`.pdf`)
    Pdf,
}
impl Format {
    /// Every format, highest precedence first.
    pub const ALL: [Format; 3] = [Format::Txt, Format::Epub, Format::Pdf];

    /// Returns the file extension (without the dot).
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Txt => "txt",
            Format::Epub => "epub",
            Format::Pdf => "pdf",
        }
    }

    /// Higher rank wins precedence.
    pub fn rank(&self) -> u8 {
        match self {
            Format::Txt => 3,
            Format::Epub => 2,
            Format::Pdf => 1,
        }
    }

    /// Detect the format from a file extension.
    ///
    /// ```
    /// use gutcat_extract::models::Format;
    /// assert_eq!(Format::from_path("1/0/1000/1000.txt"), Some(Format::Txt));
    /// assert_eq!(Format::from_path("pg1000.EPUB"), Some(Format::Epub));
    /// assert_eq!(Format::from_path("pg1000.rdf"), None);
    /// ```
    #[must_use]
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        path.as_ref().extension().and_then(|ext| ext.to_str()).and_then(|ext| ext.parse().ok())
    }
}
impl FromStr for Format {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().trim_start_matches('.').to_lowercase().as_str() {
            "txt" => Self::Txt,
            "epub" => Self::Epub,
            "pdf" => Self::Pdf,
            _ => exn::bail!(ErrorKind::ParseError {
                field: "format",
                value: s.to_string()
            }),
        })
    }
}
impl Ord for Format {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}
impl PartialOrd for Format {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Display for Format {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.extension())
    }
}
