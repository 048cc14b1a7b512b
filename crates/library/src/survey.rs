//! One full pass over a corpus: both scans, the master index, reconciliation
//! and the catalog.

use crate::catalog::{CatalogScope, LanguageCatalog};
use crate::error::{ErrorKind, Result};
use crate::index::{INDEX_FILE_NAME, load_index_async};
use crate::locate::{Layout, Locator, StemFilter};
use crate::reconcile::{IndexDiscrepancies, Reconciliation, Residual, inspect, reconcile};
use crate::scan::{ScanPolicy, Snapshot, scan};
use exn::ResultExt;
use gutcat_extract::IndexParser;
use gutcat_extract::models::IndexSnapshot;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Location of the cache tree relative to the corpus root.
pub const DEFAULT_CACHE_DIR: &str = "cache/generated";

/// What to survey and how.
#[derive(Debug, Clone)]
pub struct SurveyOptions {
    pub corpus: PathBuf,
    /// Cache tree, relative to `corpus` unless absolute.
    pub cache_dir: PathBuf,
    /// Master index, relative to `corpus` unless absolute; `None` skips it.
    pub index_file: Option<PathBuf>,
    pub parser: IndexParser,
    pub policy: ScanPolicy,
    pub stem_filter: StemFilter,
    pub scope: CatalogScope,
}
impl SurveyOptions {
    pub fn new(corpus: impl Into<PathBuf>) -> Self {
        Self {
            corpus: corpus.into(),
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            index_file: Some(PathBuf::from(INDEX_FILE_NAME)),
            parser: IndexParser::default(),
            policy: ScanPolicy::default(),
            stem_filter: StemFilter::default(),
            scope: CatalogScope::default(),
        }
    }

    pub fn cache_root(&self) -> PathBuf {
        self.corpus.join(&self.cache_dir)
    }

    pub fn index_path(&self) -> Option<PathBuf> {
        self.index_file.as_deref().map(|file| self.corpus.join(file))
    }

    fn locators(&self) -> (Locator, Locator) {
        let cache_root = self.cache_root();
        let tree = Locator::new(&self.corpus, Layout::Tree)
            .with_stem_filter(self.stem_filter)
            .with_metadata_root(&cache_root);
        let cache = Locator::new(cache_root, Layout::Cache).with_stem_filter(self.stem_filter);
        (tree, cache)
    }
}

/// Everything learned in one survey.
#[derive(Debug, Clone)]
pub struct Survey {
    pub directory: Snapshot,
    pub cache: Snapshot,
    pub index: Option<IndexSnapshot>,
    pub reconciliation: Reconciliation,
    /// Only computed when the index was loaded.
    pub discrepancies: Option<IndexDiscrepancies>,
    pub residuals: Vec<Residual>,
    pub catalog: LanguageCatalog,
}
impl Survey {
    pub fn log_summary(&self) {
        for snapshot in [&self.directory, &self.cache] {
            tracing::info!(
                records = snapshot.records.len(),
                skipped = snapshot.skipped.len(),
                frontier = snapshot.frontier,
                "Found works in {}",
                snapshot.description()
            );
        }
        if let Some(index) = &self.index {
            tracing::info!(
                last_identifier = index.last_identifier,
                declared = index.declared.len(),
                unlisted = index.unlisted.len(),
                "Master index"
            );
        }
        self.reconciliation.log_summary();
        if let Some(discrepancies) = &self.discrepancies {
            discrepancies.log_summary();
        }
        let leftovers = self.residuals.iter().filter(|residual| !residual.is_empty()).count();
        tracing::info!(unresolved = self.residuals.len(), with_files = leftovers, "Residual files");
        tracing::info!(
            count = self.directory.no_language.len(),
            "Works for which no language was found (defaulted to English)"
        );
        tracing::debug!(identifiers = ?self.directory.no_language, "Works without language metadata");
        self.catalog.log_summary();
    }
}

/// Surveys a corpus.
///
/// The two scans and the index parse are independent and run concurrently on
/// the blocking pool; reconciliation starts once all three are done.
#[instrument(skip_all, fields(corpus = %options.corpus.display()))]
pub async fn survey(options: SurveyOptions) -> Result<Survey> {
    let (tree, cache) = options.locators();
    let (directory, cache_snapshot, index) = tokio::try_join!(
        scan(tree.clone(), options.policy),
        scan(cache.clone(), options.policy),
        load_index_async(options.index_path(), options.parser),
    )?;

    let reconciliation = reconcile(&directory, &cache_snapshot);
    let discrepancies = index.as_ref().map(|index| IndexDiscrepancies::compute(index, &directory, &cache_snapshot));
    let residuals = inspect_async(reconciliation.clone(), tree, cache).await?;
    let catalog = LanguageCatalog::build(&directory, &cache_snapshot, index.as_ref(), options.scope);

    Ok(Survey {
        directory,
        cache: cache_snapshot,
        index,
        reconciliation,
        discrepancies,
        residuals,
        catalog,
    })
}

async fn inspect_async(report: Reconciliation, tree: Locator, cache: Locator) -> Result<Vec<Residual>> {
    tokio::task::spawn_blocking(move || inspect(&report, &tree, &cache))
        .await
        .or_raise(|| ErrorKind::Survey)?
        .or_raise(|| ErrorKind::Scan)
}

/// `true` if the path looks like a corpus root rather than a listing file.
pub fn is_corpus(path: &Path) -> bool {
    path.is_dir()
}
