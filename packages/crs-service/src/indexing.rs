use std::path::Path;

use crs_config::Config;
use crs_domain::{CatalogItem, abbreviation::mine_abbreviations};
use crs_index::{CatalogIndex, artifacts};

use crate::{Error, Providers, Result};

/// Whether the artifacts in `dir` were built from exactly these items with this model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Freshness {
	Current,
	Stale { reason: String },
}

pub fn check_freshness(dir: &Path, items: &[CatalogItem], embedding_model: &str) -> Freshness {
	let manifest = match artifacts::read_manifest(dir) {
		Ok(manifest) => manifest,
		Err(err) => return Freshness::Stale { reason: format!("No readable manifest: {err}") },
	};

	if manifest.schema_version != artifacts::SCHEMA_VERSION {
		return Freshness::Stale {
			reason: format!("Schema version {} is outdated.", manifest.schema_version),
		};
	}
	if manifest.embedding_model != embedding_model {
		return Freshness::Stale {
			reason: format!(
				"Built with model {} but {embedding_model} is configured.",
				manifest.embedding_model
			),
		};
	}

	match artifacts::catalog_hash(items) {
		Ok(hash) if hash == manifest.catalog_hash => Freshness::Current,
		Ok(_) => Freshness::Stale { reason: "Catalog content changed.".to_string() },
		Err(err) => Freshness::Stale { reason: err.to_string() },
	}
}

/// Embeds every item's combined text and assembles an index with the mined abbreviation map.
pub async fn build_index(
	cfg: &Config,
	providers: &Providers,
	items: Vec<CatalogItem>,
) -> Result<CatalogIndex> {
	if items.is_empty() {
		return Err(Error::Index { message: "Catalog has no items.".to_string() });
	}

	let embedding_cfg = &cfg.providers.embedding;
	let abbreviations = mine_abbreviations(&items);
	let texts = items.iter().map(CatalogItem::combined_text).collect::<Vec<_>>();
	let batch_size = (embedding_cfg.batch_size as usize).max(1);
	let mut embeddings = Vec::with_capacity(texts.len());

	tracing::info!(
		items = items.len(),
		abbreviations = abbreviations.len(),
		model = %embedding_cfg.model,
		"Building index."
	);

	for (batch_idx, batch) in texts.chunks(batch_size).enumerate() {
		let vectors = providers.embedding.embed(embedding_cfg, batch).await?;

		if vectors.len() != batch.len() {
			return Err(Error::Provider {
				message: format!(
					"Embedding batch {batch_idx} returned {} vectors for {} texts.",
					vectors.len(),
					batch.len()
				),
			});
		}

		embeddings.extend(vectors);

		tracing::debug!(batch = batch_idx, embedded = embeddings.len(), "Embedded batch.");
	}

	Ok(CatalogIndex::build(items, &embeddings, &embedding_cfg.model, abbreviations)?)
}
