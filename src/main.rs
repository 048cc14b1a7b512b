mod cli;
mod error;

use crate::cli::Cli;
use crate::error::{ErrorKind, Result};
use clap::Parser;
use exn::ResultExt;
use futures::StreamExt;
use gutcat_config::{Config, Scope};
use gutcat_extract::IndexParser;
use gutcat_library::locate::StemFilter;
use gutcat_library::organize::{Action, OrganizeEvent, organize};
use gutcat_library::scan::ScanPolicy;
use gutcat_library::survey::is_corpus;
use gutcat_library::{CatalogScope, Context, Listing, PathGenerator, Placement, SurveyOptions, render_listing, survey};
use gutcat_storage::backend::{LocalBackend, ReadOnlyBackend};
use gutcat_storage::{BackendHandle, StorageBackend, Transfer};
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);
    run(cli).await.map_err(|err| miette::miette!("{err:?}"))
}

fn init_tracing(cli: &Cli) {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_directive())))
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    cli.validate()?;
    let config = Config::load(cli.config.as_deref()).or_raise(|| ErrorKind::Config)?;
    match cli.mode.transfer() {
        None => list(&cli.corpus, &cli.target, &config).await,
        Some(transfer) => {
            let placements = match is_corpus(&cli.corpus) {
                true => catalog(&cli.corpus, &config).await?.catalog.placements(),
                false => Listing::load(&cli.corpus).or_raise(|| ErrorKind::ReadListing)?.into_placements(),
            };
            place(placements, &cli.target, transfer, &config).await
        },
    }
}

fn survey_options(corpus: &Path, config: &Config) -> SurveyOptions {
    let mut options = SurveyOptions::new(corpus);
    options.cache_dir = config.corpus.cache_dir.clone();
    options.index_file = config.index.enabled.then(|| config.corpus.index_file.clone());
    options.parser = IndexParser::new(config.index.cutoff());
    options.policy = ScanPolicy {
        start: config.scan.start,
        miss_threshold: config.scan.miss_threshold,
    };
    options.stem_filter = match config.scan.reject_alphabetic_stems {
        true => StemFilter::RejectAlphabetic,
        false => StemFilter::AllowAll,
    };
    options.scope = match config.catalog.scope {
        Scope::Directory => CatalogScope::Directory,
        Scope::Merged => CatalogScope::Merged,
    };
    options
}

async fn catalog(corpus: &Path, config: &Config) -> Result<gutcat_library::Survey> {
    let survey = survey(survey_options(corpus, config)).await.or_raise(|| ErrorKind::Survey)?;
    survey.log_summary();
    Ok(survey)
}

async fn list(corpus: &Path, target: &Path, config: &Config) -> Result<()> {
    let survey = catalog(corpus, config).await?;
    let target = std::path::absolute(target).or_raise(|| ErrorKind::Listing)?;
    let (Some(parent), Some(name)) = (target.parent(), target.file_name()) else {
        exn::bail!(ErrorKind::Usage("the target must be a file path when listing"));
    };
    let backend = LocalBackend::new("listing", parent).or_raise(|| ErrorKind::Listing)?;
    backend
        .write(Path::new(name), render_listing(&survey.catalog).as_bytes())
        .await
        .or_raise(|| ErrorKind::Listing)?;
    tracing::info!(path = %target.display(), entries = survey.catalog.len(), "Wrote listing");
    Ok(())
}

async fn place(placements: Vec<Placement>, target: &Path, transfer: Transfer, config: &Config) -> Result<()> {
    let root = std::path::absolute(target).or_raise(|| ErrorKind::Storage)?;
    let mut backend: BackendHandle = Arc::new(LocalBackend::new("target", &root).or_raise(|| ErrorKind::Storage)?);
    if config.organize.dry_run {
        backend = Arc::new(ReadOnlyBackend::new(backend));
    }
    let template = config.organize.template.parse::<PathGenerator>().or_raise(|| ErrorKind::Config)?;
    let ctx = Context::new(template, transfer).with_concurrency(config.organize.concurrency);

    let (mut placed, mut replaced, mut present, mut failed) = (0usize, 0usize, 0usize, 0usize);
    let mut events = std::pin::pin!(organize(&backend, &ctx, placements));
    while let Some(event) = events.next().await {
        match event {
            Ok(OrganizeEvent::Started) => tracing::info!(root = %root.display(), transfer = transfer.as_str(), "Organizing"),
            Ok(OrganizeEvent::DiscoveryComplete(total)) => tracing::info!(total, "Targets resolved"),
            Ok(OrganizeEvent::Placed(Action::Placed(_))) => placed += 1,
            Ok(OrganizeEvent::Placed(Action::Replaced(path))) => {
                tracing::debug!(path = %path.display(), "Replaced existing file");
                replaced += 1;
            },
            Ok(OrganizeEvent::Placed(Action::AlreadyPresent(_))) => present += 1,
            Ok(OrganizeEvent::Complete) => {},
            Err(err) => {
                tracing::warn!(error = ?err, "Could not organize file");
                failed += 1;
            },
        }
    }
    tracing::info!(placed, replaced, already_present = present, failed, "Organized {}", root.display());
    if failed > 0 {
        exn::bail!(ErrorKind::Incomplete(failed));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gutcat_library::locate::tree_path;

    #[test]
    fn options_follow_config() {
        let mut config = Config::default();
        config.index.enabled = false;
        config.scan.reject_alphabetic_stems = false;
        config.scan.miss_threshold = 5;
        config.catalog.scope = Scope::Merged;
        let options = survey_options(Path::new("/corpus"), &config);
        assert_eq!(options.index_path(), None);
        assert_eq!(options.stem_filter, StemFilter::AllowAll);
        assert_eq!(options.policy.miss_threshold, 5);
        assert_eq!(options.scope, CatalogScope::Merged);
        assert_eq!(options.cache_root(), Path::new("/corpus/cache/generated"));
    }

    #[tokio::test]
    async fn lists_then_copies_from_listing() {
        let corpus = tempfile::tempdir().unwrap();
        let book = corpus.path().join(tree_path(12));
        std::fs::create_dir_all(&book).unwrap();
        std::fs::write(book.join("12.txt"), "Language: French\n").unwrap();
        let out = tempfile::tempdir().unwrap();
        let listing = out.path().join("listing.txt");

        let mut config = Config::default();
        config.index.enabled = false;
        list(corpus.path(), &listing, &config).await.unwrap();
        let placements = Listing::load(&listing).unwrap().into_placements();
        assert_eq!(placements.len(), 1);

        let sorted = out.path().join("sorted");
        place(placements, &sorted, Transfer::Copy, &config).await.unwrap();
        assert!(sorted.join("french/txt/12.txt").is_file());
        assert!(book.join("12.txt").is_file());
    }
}
