use crate::error::{ErrorKind, Result};
use clap::{ArgAction, Parser, ValueEnum};
use gutcat_storage::Transfer;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Write a listing of the catalog; nothing is moved.
    List,
    /// Move every catalogued file into the target tree.
    Move,
    /// Copy every catalogued file into the target tree.
    Copy,
}
impl Mode {
    pub fn transfer(&self) -> Option<Transfer> {
        match self {
            Mode::List => None,
            Mode::Move => Some(Transfer::Move),
            Mode::Copy => Some(Transfer::Copy),
        }
    }
}

/// Catalog a numbered ebook corpus by language and format.
#[derive(Debug, Parser)]
#[command(name = "gutcat", version, about)]
pub struct Cli {
    #[arg(value_enum)]
    pub mode: Mode,

    /// Corpus root, or a listing written by `list` (move and copy only)
    pub corpus: PathBuf,

    /// Listing file to write (list), or directory to organize into (move, copy)
    pub target: PathBuf,

    /// Configuration file (.toml, .yaml, .yml or .json)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// More output; repeat for trace logging
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}
impl Cli {
    /// Checks the paths against the mode before any work starts.
    pub fn validate(&self) -> Result<()> {
        match self.mode {
            Mode::List => {
                if !self.corpus.is_dir() {
                    exn::bail!(ErrorKind::Usage("the corpus must be a directory when listing"));
                }
                if self.target.is_dir() {
                    exn::bail!(ErrorKind::Usage("the target must be a file path when listing"));
                }
            },
            Mode::Move | Mode::Copy => {
                if !self.corpus.exists() {
                    exn::bail!(ErrorKind::Usage("the corpus must be a directory or a listing file"));
                }
                if self.target.is_file() {
                    exn::bail!(ErrorKind::Usage("the target must be a directory"));
                }
            },
        }
        Ok(())
    }

    /// Default log directive, used when `RUST_LOG` is unset.
    pub fn log_directive(&self) -> &'static str {
        match (self.quiet, self.verbose) {
            (true, _) => "warn",
            (false, 0) => "info",
            (false, 1) => "debug",
            (false, _) => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::path::Path;

    fn cli(mode: Mode, corpus: &Path, target: &Path) -> Cli {
        Cli {
            mode,
            corpus: corpus.to_path_buf(),
            target: target.to_path_buf(),
            config: None,
            verbose: 0,
            quiet: false,
        }
    }

    #[test]
    fn parses_arguments() {
        let cli = Cli::try_parse_from(["gutcat", "copy", "/corpus", "/sorted", "-vv", "--config", "gutcat.toml"]).unwrap();
        assert_eq!(cli.mode, Mode::Copy);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("gutcat.toml")));
        assert_eq!(cli.log_directive(), "trace");
        assert!(Cli::try_parse_from(["gutcat", "rename", "/corpus", "/sorted"]).is_err());
        assert!(Cli::try_parse_from(["gutcat", "list", "/corpus", "/out.txt", "-v", "-q"]).is_err());
    }

    #[test]
    fn list_needs_corpus_directory_and_target_file() {
        let dir = tempfile::tempdir().unwrap();
        let listing = dir.path().join("listing.txt");
        assert!(cli(Mode::List, dir.path(), &listing).validate().is_ok());
        assert!(cli(Mode::List, dir.path(), dir.path()).validate().is_err());
        std::fs::write(&listing, "").unwrap();
        assert!(cli(Mode::List, &listing, &dir.path().join("out.txt")).validate().is_err());
    }

    #[rstest]
    #[case(Mode::Move)]
    #[case(Mode::Copy)]
    fn organize_accepts_listing_but_not_target_file(#[case] mode: Mode) {
        let dir = tempfile::tempdir().unwrap();
        let listing = dir.path().join("listing.txt");
        std::fs::write(&listing, "").unwrap();
        let sorted = dir.path().join("sorted");
        assert!(cli(mode, dir.path(), &sorted).validate().is_ok());
        assert!(cli(mode, &listing, &sorted).validate().is_ok());
        assert!(cli(mode, &listing, &listing).validate().is_err());
        assert!(cli(mode, &dir.path().join("missing"), &sorted).validate().is_err());
    }

    #[test]
    fn modes_map_to_transfers() {
        assert_eq!(Mode::List.transfer(), None);
        assert_eq!(Mode::Move.transfer(), Some(Transfer::Move));
        assert_eq!(Mode::Copy.transfer(), Some(Transfer::Copy));
    }
}
