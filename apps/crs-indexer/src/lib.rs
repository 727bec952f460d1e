use std::{
	fs,
	path::{Path, PathBuf},
};

use clap::Parser;
use color_eyre::eyre;

use crs_config::Config;
use crs_domain::CatalogItem;
use crs_service::{
	Providers,
	indexing::{self, Freshness},
};

#[derive(Debug, Parser)]
#[command(
	version = crs_cli::VERSION,
	rename_all = "kebab",
	styles = crs_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	/// Catalog JSON to index. Defaults to `index.catalog_path`.
	#[arg(long, value_name = "FILE")]
	pub catalog: Option<PathBuf>,
	/// Rebuild even when the artifacts match the catalog.
	#[arg(long)]
	pub force: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
	Skipped,
	Built { rows: usize, catalog_hash: String },
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = crs_config::load(&args.config)?;

	crs_cli::init_tracing(&config.service.log_level);

	let catalog_path = args
		.catalog
		.or_else(|| config.index.catalog_path.clone())
		.ok_or_else(|| eyre::eyre!("No catalog given. Pass --catalog or set index.catalog_path."))?;

	index_catalog(&config, &Providers::default(), &catalog_path, args.force).await?;

	Ok(())
}

/// Builds artifacts for the catalog at `catalog_path` unless the existing ones already match.
pub async fn index_catalog(
	config: &Config,
	providers: &Providers,
	catalog_path: &Path,
	force: bool,
) -> color_eyre::Result<Outcome> {
	let items = read_catalog(catalog_path)?;
	let artifacts_dir = &config.index.artifacts_dir;

	match indexing::check_freshness(artifacts_dir, &items, &config.providers.embedding.model) {
		Freshness::Current if !force => {
			tracing::info!(dir = %artifacts_dir.display(), "Index is up to date. Skipping rebuild.");

			return Ok(Outcome::Skipped);
		},
		Freshness::Current => tracing::info!("Rebuild forced."),
		Freshness::Stale { reason } => tracing::info!(reason = %reason, "Index is stale."),
	}

	let index = indexing::build_index(config, providers, items).await?;

	index.write(artifacts_dir)?;

	tracing::info!(
		dir = %artifacts_dir.display(),
		rows = index.len(),
		dimensions = index.dimensions(),
		abbreviations = index.abbreviations().len(),
		catalog_hash = %index.catalog_hash(),
		"Index written."
	);

	Ok(Outcome::Built { rows: index.len(), catalog_hash: index.catalog_hash().to_string() })
}

pub fn read_catalog(path: &Path) -> color_eyre::Result<Vec<CatalogItem>> {
	let raw = fs::read(path)
		.map_err(|err| eyre::eyre!("Failed to read catalog at {}: {err}.", path.display()))?;
	let items: Vec<CatalogItem> = serde_json::from_slice(&raw)
		.map_err(|err| eyre::eyre!("Failed to parse catalog at {}: {err}.", path.display()))?;

	tracing::info!(path = %path.display(), items = items.len(), "Catalog read.");

	Ok(items)
}
