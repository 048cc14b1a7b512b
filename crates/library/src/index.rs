//! Loading the master index from disk.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use gutcat_extract::IndexParser;
use gutcat_extract::models::IndexSnapshot;
use std::path::{Path, PathBuf};

/// File name of the master index at the corpus root.
pub const INDEX_FILE_NAME: &str = "GUTINDEX.ALL";

/// Reads and parses a master index document.
///
/// Invalid UTF-8 is replaced rather than rejected: the index is mostly ASCII
/// and stray bytes only ever show up inside titles.
pub fn load_index(path: &Path, parser: IndexParser) -> Result<IndexSnapshot> {
    let error = || ErrorKind::Index(path.to_path_buf());
    let bytes = std::fs::read(path).or_raise(error)?;
    parser.parse(&String::from_utf8_lossy(&bytes)).or_raise(error)
}

/// Loads the index on the blocking thread pool; `None` skips it entirely.
pub async fn load_index_async(path: Option<PathBuf>, parser: IndexParser) -> Result<Option<IndexSnapshot>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let snapshot = tokio::task::spawn_blocking(move || load_index(&path, parser)).await.or_raise(|| ErrorKind::Survey)??;
    Ok(Some(snapshot))
}

#[cfg(test)]
mod tests {
    use super::*;

    const INDEX: &[u8] = b"<==LISTINGS==>\nTITLE and AUTHOR     ETEXT NO.\nCaf\xe9 Stories, by Someone      60001\n [Language: French]\nOther Book      60000\n<==End of GUTINDEX.ALL==>\n";

    #[test]
    fn loads_lossy_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(INDEX_FILE_NAME);
        std::fs::write(&path, INDEX).unwrap();
        let snapshot = load_index(&path, IndexParser::new(None)).unwrap();
        assert_eq!(snapshot.last_identifier, 60_001);
        assert_eq!(snapshot.declared[&60_001].title, "Caf\u{fffd} Stories, by Someone");
        assert_eq!(snapshot.declared[&60_001].language, "French");
    }

    #[test]
    fn missing_file_is_index_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(INDEX_FILE_NAME);
        let err = load_index(&path, IndexParser::default()).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Index(p) if p == &path));
    }

    #[test]
    fn parse_failure_keeps_cause() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(INDEX_FILE_NAME);
        std::fs::write(&path, "no listings here\n").unwrap();
        let err = load_index(&path, IndexParser::default()).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Index(p) if p == &path));
    }

    #[test]
    fn cutoff_applies_when_loading() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(INDEX_FILE_NAME);
        std::fs::write(&path, INDEX).unwrap();
        let snapshot = load_index(&path, IndexParser::new(60_002)).unwrap();
        assert!(snapshot.declared.contains_key(&60_001));
        assert!(!snapshot.declared.contains_key(&60_000));
    }

    #[tokio::test]
    async fn disabled_index_is_none() {
        assert_eq!(load_index_async(None, IndexParser::default()).await.unwrap(), None);
    }
}
