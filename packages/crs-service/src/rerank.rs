use crs_index::CatalogIndex;

use crate::{Recommender, recommend::Candidate};

impl Recommender {
	/// Re-scores the leading window with the cross-encoder. Any provider problem leaves the
	/// candidates untouched. Returns whether scores were applied.
	pub(crate) async fn rerank_candidates(
		&self,
		catalog: &CatalogIndex,
		query: &str,
		candidates: &mut [Candidate],
	) -> bool {
		let cfg = &self.cfg.providers.rerank;

		if !cfg.enabled {
			tracing::debug!("Reranking requested but the rerank provider is disabled.");

			return false;
		}

		let window = candidates.len().min(self.cfg.retrieval.rerank_window as usize);
		let titles = candidates[..window]
			.iter()
			.map(|candidate| {
				catalog.row(candidate.row).map(|row| row.item.title.clone()).unwrap_or_default()
			})
			.collect::<Vec<_>>();
		let scores = match self.providers.rerank.rerank(cfg, query, &titles).await {
			Ok(scores) => scores,
			Err(err) => {
				tracing::warn!(error = %err, window, "Rerank failed; keeping retrieval order.");

				return false;
			},
		};

		if scores.len() != window || scores.iter().any(|score| !score.is_finite()) {
			tracing::warn!(
				expected = window,
				received = scores.len(),
				"Rerank returned unusable scores; keeping retrieval order."
			);

			return false;
		}

		apply_rerank_scores(candidates, &scores);

		true
	}
}

/// Overwrites the scores of the first `scores.len()` candidates and stably re-sorts only that
/// window, best first. Candidates past the window keep their order and scores.
pub(crate) fn apply_rerank_scores(candidates: &mut [Candidate], scores: &[f32]) {
	let window = scores.len().min(candidates.len());

	for (candidate, score) in candidates[..window].iter_mut().zip(scores) {
		candidate.score = *score;
		candidate.rerank_score = Some(*score);
	}

	candidates[..window].sort_by(|a, b| b.score.total_cmp(&a.score));
}
