use crs_domain::NormalizedQuery;
use crs_index::CatalogIndex;

use crate::{Recommender, recommend::Scoring};

/// Candidate rows in retrieval order, best first.
#[derive(Clone, Debug, PartialEq)]
pub struct Retrieved {
	pub hits: Vec<(usize, f32)>,
	pub scoring: Scoring,
}

impl Recommender {
	/// Nearest neighbours of the embedded query. Falls back to keyword scoring when the query
	/// cannot be embedded or searched.
	pub async fn retrieve(&self, catalog: &CatalogIndex, query: &NormalizedQuery) -> Retrieved {
		let k = self.cfg.retrieval.candidate_k as usize;

		match self.semantic_hits(catalog, query, k).await {
			Ok(hits) => Retrieved { hits, scoring: Scoring::Semantic },
			Err(reason) => {
				tracing::warn!(
					reason = %reason,
					query = %query.text,
					"Embedding unavailable; using keyword scoring."
				);

				let hits = catalog.keyword_search(&query.tokens, k).hits().collect();

				Retrieved { hits, scoring: Scoring::Keyword }
			},
		}
	}

	async fn semantic_hits(
		&self,
		catalog: &CatalogIndex,
		query: &NormalizedQuery,
		k: usize,
	) -> Result<Vec<(usize, f32)>, String> {
		let texts = [query.text.clone()];
		let mut vectors = self
			.providers
			.embedding
			.embed(&self.cfg.providers.embedding, &texts)
			.await
			.map_err(|err| err.to_string())?;
		let vector = match (vectors.pop(), vectors.is_empty()) {
			(Some(vector), true) => vector,
			_ => return Err("Embedding provider must return exactly one vector.".to_string()),
		};
		let hits = catalog.search(&vector, k).map_err(|err| err.to_string())?;

		Ok(hits.hits().collect())
	}
}
