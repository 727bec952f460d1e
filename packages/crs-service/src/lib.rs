pub mod explain;
pub mod filters;
pub mod indexing;
pub mod recommend;
pub mod rerank;
pub mod retrieval;
pub mod roles;

mod error;

pub use error::{Error, Result};
pub use filters::RecommendFilters;
pub use recommend::{DebugInfo, RecommendRequest, RecommendResponse, Recommendation, Scoring};
pub use roles::{AppliedFilters, RolePreset, RoleRequest, RoleResponse};

use std::{future::Future, pin::Pin, sync::Arc};

use reqwest::Client;
use tokio::sync::OnceCell;

use crs_config::{Config, EmbeddingProviderConfig, RerankProviderConfig};
use crs_domain::QueryNormalizer;
use crs_index::CatalogIndex;
use crs_providers::{embedding, rerank as rerank_api};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>>;
}

pub trait RerankProvider
where
	Self: Send + Sync,
{
	fn rerank<'a>(
		&'a self,
		cfg: &'a RerankProviderConfig,
		query: &'a str,
		docs: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<f32>>>;
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub rerank: Arc<dyn RerankProvider>,
}
impl Providers {
	pub fn new(embedding: Arc<dyn EmbeddingProvider>, rerank: Arc<dyn RerankProvider>) -> Self {
		Self { embedding, rerank }
	}
}

impl Default for Providers {
	fn default() -> Self {
		let http = Arc::new(HttpProviders::default());

		Self { embedding: http.clone(), rerank: http }
	}
}

/// Index plus the query normalizer built from its abbreviation map.
pub(crate) struct LoadedIndex {
	pub(crate) catalog: CatalogIndex,
	pub(crate) normalizer: QueryNormalizer,
}
impl LoadedIndex {
	fn new(catalog: CatalogIndex, short_query_max_tokens: u32) -> Self {
		let normalizer = QueryNormalizer::new(catalog.abbreviations())
			.with_short_query_max_tokens(short_query_max_tokens as usize);

		Self { catalog, normalizer }
	}
}

/// Recommendation pipeline over a lazily loaded, read-only index.
pub struct Recommender {
	pub cfg: Config,
	pub providers: Providers,
	index: OnceCell<Result<LoadedIndex, String>>,
}
impl Recommender {
	/// The index is read from `index.artifacts_dir` on first use.
	pub fn new(cfg: Config, providers: Providers) -> Self {
		Self { cfg, providers, index: OnceCell::new() }
	}

	pub fn with_index(cfg: Config, providers: Providers, catalog: CatalogIndex) -> Self {
		let loaded = LoadedIndex::new(catalog, cfg.gating.short_query_max_tokens);

		Self { cfg, providers, index: OnceCell::new_with(Some(Ok(loaded))) }
	}

	/// Loaded index, or why it is unavailable. Concurrent first callers share one load; a
	/// failed load is remembered.
	pub(crate) async fn loaded(&self) -> Result<&LoadedIndex, &str> {
		let state = self
			.index
			.get_or_init(|| async {
				let dir = self.cfg.index.artifacts_dir.clone();
				let short_query_max_tokens = self.cfg.gating.short_query_max_tokens;

				match tokio::task::spawn_blocking(move || CatalogIndex::load(&dir)).await {
					Ok(Ok(catalog)) => Ok(LoadedIndex::new(catalog, short_query_max_tokens)),
					Ok(Err(err)) => {
						tracing::error!(
							error = %err,
							dir = %self.cfg.index.artifacts_dir.display(),
							"Index unavailable."
						);

						Err(err.to_string())
					},
					Err(err) => {
						tracing::error!(error = %err, "Index load task failed.");

						Err(format!("Index load task failed: {err}"))
					},
				}
			})
			.await;

		state.as_ref().map_err(String::as_str)
	}

	/// The catalog index, loading it if needed.
	pub async fn catalog(&self) -> Result<&CatalogIndex> {
		self.loaded()
			.await
			.map(|loaded| &loaded.catalog)
			.map_err(|message| Error::Index { message: message.to_string() })
	}
}

/// OpenAI-compatible embeddings and Cohere-style rerank over HTTP. Each client is built on
/// first use with the provider's timeout.
#[derive(Default)]
pub struct HttpProviders {
	embedding_client: OnceCell<Client>,
	rerank_client: OnceCell<Client>,
}

impl EmbeddingProvider for HttpProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>> {
		Box::pin(async move {
			let client = self
				.embedding_client
				.get_or_try_init(|| async { crs_providers::http_client(cfg.timeout_ms) })
				.await?;

			Ok(embedding::embed(client, cfg, texts).await?)
		})
	}
}

impl RerankProvider for HttpProviders {
	fn rerank<'a>(
		&'a self,
		cfg: &'a RerankProviderConfig,
		query: &'a str,
		docs: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<f32>>> {
		Box::pin(async move {
			let client = self
				.rerank_client
				.get_or_try_init(|| async { crs_providers::http_client(cfg.timeout_ms) })
				.await?;

			Ok(rerank_api::rerank(client, cfg, query, docs).await?)
		})
	}
}
