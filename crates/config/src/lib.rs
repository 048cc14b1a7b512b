//! Layered configuration.
//!
//! Values are merged from, in increasing priority:
//!
//! 1. built-in defaults,
//! 2. a configuration file (`.toml`, `.yaml`/`.yml` or `.json`), either given
//!    explicitly or `config.toml` in the platform config directory,
//! 3. environment variables prefixed with `GUTCAT_`, using `__` to separate
//!    sections (`GUTCAT_SCAN__MISS_THRESHOLD=200`).

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use gutcat_extract::DEFAULT_INDEX_CUTOFF;
use gutcat_library::index::INDEX_FILE_NAME;
use gutcat_library::scan::DEFAULT_MISS_THRESHOLD;
use gutcat_library::survey::DEFAULT_CACHE_DIR;
use gutcat_library::{DEFAULT_TEMPLATE, MAX_PROCESS_CONCURRENCY};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Prefix of environment variables read into the configuration.
pub const ENV_PREFIX: &str = "GUTCAT_";
const ENV_SEPARATOR: &str = "__";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub corpus: CorpusConfig,
    pub scan: ScanConfig,
    pub index: IndexConfig,
    pub catalog: CatalogConfig,
    pub organize: OrganizeConfig,
}

/// Where things live inside a corpus root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    pub index_file: PathBuf,
    pub cache_dir: PathBuf,
}
impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            index_file: PathBuf::from(INDEX_FILE_NAME),
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub start: u64,
    pub miss_threshold: u64,
    /// Skip plain-text files with letters in their stem (`1000-readme.txt`).
    pub reject_alphabetic_stems: bool,
}
impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            start: 1,
            miss_threshold: DEFAULT_MISS_THRESHOLD,
            reject_alphabetic_stems: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    pub enabled: bool,
    /// Stop parsing below this identifier; `0` reads the whole index.
    pub cutoff: u64,
}
impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cutoff: DEFAULT_INDEX_CUTOFF,
        }
    }
}
impl IndexConfig {
    pub fn cutoff(&self) -> Option<u64> {
        (self.cutoff > 0).then_some(self.cutoff)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    #[default]
    Directory,
    Merged,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub scope: Scope,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizeConfig {
    pub template: String,
    pub concurrency: usize,
    /// Report what would be placed without touching the target.
    pub dry_run: bool,
}
impl Default for OrganizeConfig {
    fn default() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
            concurrency: MAX_PROCESS_CONCURRENCY,
            dry_run: false,
        }
    }
}

impl Config {
    /// Loads and validates the configuration.
    ///
    /// An explicit `file` must exist. Without one, the platform config file
    /// is used if present.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        match file {
            Some(path) => {
                if !path.is_file() {
                    exn::bail!(ErrorKind::Invalid {
                        field: "config",
                        reason: format!("{} is not a file", path.display()),
                    });
                }
                figment = merge_file(figment, path)?;
            },
            None => {
                if let Some(path) = default_path().filter(|path| path.is_file()) {
                    tracing::debug!(path = %path.display(), "Using configuration file");
                    figment = merge_file(figment, &path)?;
                }
            },
        }
        let config: Config = figment
            .merge(Env::prefixed(ENV_PREFIX).split(ENV_SEPARATOR))
            .extract()
            .or_raise(|| ErrorKind::Load)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values no run could work with.
    pub fn validate(&self) -> Result<()> {
        let invalid = |field: &'static str, reason: &str| {
            Err(exn::Exn::from(ErrorKind::Invalid {
                field,
                reason: reason.to_string(),
            }))
        };
        if self.scan.start == 0 {
            return invalid("scan.start", "identifiers start at 1");
        }
        if self.scan.miss_threshold == 0 {
            return invalid("scan.miss_threshold", "must be greater than zero");
        }
        if self.organize.concurrency == 0 {
            return invalid("organize.concurrency", "must be greater than zero");
        }
        if self.organize.template.trim().is_empty() {
            return invalid("organize.template", "must not be empty");
        }
        Ok(())
    }
}

/// `config.toml` in the platform configuration directory.
pub fn default_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "gutcat").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

fn merge_file(figment: Figment, path: &Path) -> Result<Figment> {
    let extension = path.extension().and_then(|ext| ext.to_str()).map(str::to_lowercase);
    Ok(match extension.as_deref() {
        Some("toml") => figment.merge(Toml::file(path)),
        Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
        Some("json") => figment.merge(Json::file(path)),
        _ => exn::bail!(ErrorKind::Invalid {
            field: "config",
            reason: format!("unsupported file type: {}", path.display()),
        }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use rstest::rstest;

    fn load(file: Option<&str>) -> std::result::Result<Config, String> {
        Config::load(file.map(Path::new)).map_err(|e| format!("{:?}", &*e))
    }

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.scan.miss_threshold, 100);
        assert_eq!(config.index.cutoff(), Some(50_000));
        assert_eq!(config.catalog.scope, Scope::Directory);
        assert_eq!(config.organize.template, "{{ language }}/{{ format }}/{{ basename }}");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_cutoff_disables() {
        let index = IndexConfig {
            enabled: true,
            cutoff: 0,
        };
        assert_eq!(index.cutoff(), None);
    }

    #[rstest]
    #[case("gutcat.toml", "[scan]\nmiss_threshold = 7\n[catalog]\nscope = \"merged\"\n")]
    #[case("gutcat.yaml", "scan:\n  miss_threshold: 7\ncatalog:\n  scope: merged\n")]
    #[case("gutcat.json", r#"{"scan": {"miss_threshold": 7}, "catalog": {"scope": "merged"}}"#)]
    fn reads_file_by_extension(#[case] name: &str, #[case] contents: &str) {
        Jail::expect_with(|jail| {
            jail.create_file(name, contents)?;
            let config = load(Some(name))?;
            assert_eq!(config.scan.miss_threshold, 7);
            assert_eq!(config.catalog.scope, Scope::Merged);
            assert_eq!(config.scan.start, 1);
            Ok(())
        });
    }

    #[test]
    fn environment_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("gutcat.toml", "[organize]\nconcurrency = 4\ndry_run = false\n")?;
            jail.set_env("GUTCAT_ORGANIZE__DRY_RUN", "true");
            jail.set_env("GUTCAT_INDEX__CUTOFF", "0");
            let config = load(Some("gutcat.toml"))?;
            assert_eq!(config.organize.concurrency, 4);
            assert!(config.organize.dry_run);
            assert_eq!(config.index.cutoff(), None);
            Ok(())
        });
    }

    #[test]
    fn missing_explicit_file_is_rejected() {
        Jail::expect_with(|_| {
            let err = Config::load(Some(Path::new("absent.toml"))).unwrap_err();
            assert!(matches!(&*err, ErrorKind::Invalid { field: "config", .. }));
            Ok(())
        });
    }

    #[test]
    fn unknown_extension_is_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("gutcat.ini", "")?;
            let err = Config::load(Some(Path::new("gutcat.ini"))).unwrap_err();
            assert!(matches!(&*err, ErrorKind::Invalid { field: "config", .. }));
            Ok(())
        });
    }

    #[test]
    fn bad_value_is_load_error() {
        Jail::expect_with(|jail| {
            jail.create_file("gutcat.toml", "[catalog]\nscope = \"everything\"\n")?;
            let err = Config::load(Some(Path::new("gutcat.toml"))).unwrap_err();
            assert!(matches!(&*err, ErrorKind::Load));
            Ok(())
        });
    }

    #[rstest]
    #[case("GUTCAT_SCAN__MISS_THRESHOLD", "0", "scan.miss_threshold")]
    #[case("GUTCAT_SCAN__START", "0", "scan.start")]
    #[case("GUTCAT_ORGANIZE__CONCURRENCY", "0", "organize.concurrency")]
    #[case("GUTCAT_ORGANIZE__TEMPLATE", " ", "organize.template")]
    fn validation_names_field(#[case] key: &str, #[case] value: &str, #[case] expected: &str) {
        Jail::expect_with(|jail| {
            jail.create_file("gutcat.toml", "")?;
            jail.set_env(key, value);
            let err = Config::load(Some(Path::new("gutcat.toml"))).unwrap_err();
            assert!(matches!(&*err, ErrorKind::Invalid { field, .. } if *field == expected));
            Ok(())
        });
    }
}
