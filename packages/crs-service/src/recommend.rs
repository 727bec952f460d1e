use std::time::Instant;

use serde::{Deserialize, Serialize};

use crs_domain::{
	GateQuery, GateReason, NormalizedQuery, RelevanceGate, catalog::snippet, rank::assign_ranks,
};
use crs_index::CatalogIndex;

use crate::{Error, LoadedIndex, Recommender, Result, explain, filters::RecommendFilters};

/// Keyword-mode scores count matched tokens, so one token is the floor.
pub const KEYWORD_THRESHOLD: f32 = 1.0;

const SNIPPET_GRAPHEMES: usize = 150;
const TOP_RAW_SCORES: usize = 5;

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct RecommendRequest {
	pub query: String,
	#[serde(default)]
	pub top_k: Option<u32>,
	#[serde(default)]
	pub filters: Option<RecommendFilters>,
	#[serde(default)]
	pub enable_reranking: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scoring {
	#[default]
	Semantic,
	/// Substring token counts, used when the query cannot be embedded.
	Keyword,
}
impl Scoring {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Semantic => "semantic",
			Self::Keyword => "keyword",
		}
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
	pub title: String,
	pub url: String,
	pub category: String,
	pub level: String,
	pub rank: u8,
	pub score: f32,
	pub matched_keywords: Vec<String>,
	pub why: Vec<String>,
	pub desc_snippet: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DebugInfo {
	pub original_query: String,
	pub normalized_query: String,
	pub is_arabic: bool,
	pub is_short_query: bool,
	/// Threshold of the returned set, after any relaxation.
	pub threshold_used: Option<f32>,
	pub relaxed: bool,
	pub scoring: Scoring,
	pub candidates_retrieved: usize,
	pub candidates_gated: usize,
	/// Seconds.
	pub time_taken: f64,
	pub top_raw_scores: Vec<f32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub blocked_reason: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}
impl DebugInfo {
	fn for_query(query: &NormalizedQuery) -> Self {
		Self {
			original_query: query.original.clone(),
			normalized_query: query.text.clone(),
			is_arabic: query.is_arabic,
			is_short_query: query.is_short,
			..Default::default()
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendResponse {
	pub results: Vec<Recommendation>,
	pub total_found: usize,
	pub debug_info: DebugInfo,
}
impl RecommendResponse {
	fn finish(results: Vec<Recommendation>, mut debug_info: DebugInfo, started: Instant) -> Self {
		debug_info.time_taken = started.elapsed().as_secs_f64();

		Self { total_found: results.len(), results, debug_info }
	}

	fn empty(debug_info: DebugInfo, started: Instant) -> Self {
		Self::finish(Vec::new(), debug_info, started)
	}

	pub fn is_blocked(&self) -> bool {
		self.debug_info.blocked_reason.is_some()
	}
}

/// A gated candidate on its way to becoming a recommendation.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
	pub row: usize,
	pub score: f32,
	pub matched_keywords: Vec<String>,
	pub reason: GateReason,
	pub rerank_score: Option<f32>,
}

impl Recommender {
	/// Checks a request against the configured limits and returns the effective `top_k`.
	pub fn validate(&self, req: &RecommendRequest) -> Result<usize> {
		if req.query.trim().is_empty() {
			return Err(Error::invalid("query", "query must be non-empty."));
		}

		let top_k = self.top_k(req.top_k, "top_k")?;

		if let Some(max) = req.filters.as_ref().and_then(|filters| filters.max_duration_hours)
			&& (!max.is_finite() || max < 0.0)
		{
			return Err(Error::invalid(
				"filters.max_duration_hours",
				"filters.max_duration_hours must be a non-negative number.",
			));
		}

		Ok(top_k)
	}

	pub(crate) fn top_k(&self, requested: Option<u32>, field: &str) -> Result<usize> {
		let retrieval = &self.cfg.retrieval;
		let top_k = requested.unwrap_or(retrieval.default_top_k);

		if top_k == 0 || top_k > retrieval.max_top_k {
			return Err(Error::invalid(
				field,
				format!("{field} must be between 1 and {}.", retrieval.max_top_k),
			));
		}

		Ok(top_k as usize)
	}

	/// Runs the full pipeline. An unavailable index, a blocked topic and an empty result set
	/// are all successful responses; only malformed requests are errors.
	pub async fn recommend(&self, req: RecommendRequest) -> Result<RecommendResponse> {
		let started = Instant::now();
		let top_k = self.validate(&req)?;
		let loaded = match self.loaded().await {
			Ok(loaded) => loaded,
			Err(message) => {
				let debug_info = DebugInfo {
					original_query: req.query.clone(),
					error: Some(format!("Index unavailable: {message}")),
					..Default::default()
				};

				return Ok(RecommendResponse::empty(debug_info, started));
			},
		};

		Ok(self.run(loaded, &req, top_k, started).await)
	}

	async fn run(
		&self,
		loaded: &LoadedIndex,
		req: &RecommendRequest,
		top_k: usize,
		started: Instant,
	) -> RecommendResponse {
		let catalog = &loaded.catalog;
		let query = loaded.normalizer.normalize(&req.query);
		let gate_query = GateQuery::from_normalized(&query);
		let mut debug_info = DebugInfo::for_query(&query);

		tracing::info!(
			query = %query.original,
			normalized = %query.text,
			is_arabic = query.is_arabic,
			is_short = query.is_short,
			"Recommendation requested."
		);

		if query.tokens.is_empty() {
			tracing::info!(query = %query.original, "Query has no searchable terms.");

			return RecommendResponse::empty(debug_info, started);
		}
		if let Some(missing) = missing_topic(catalog, &gate_query) {
			tracing::warn!(query = %query.original, topic = missing, "Topic absent from catalog.");

			debug_info.blocked_reason = Some(format!("Topic '{missing}' not found in catalog."));

			return RecommendResponse::empty(debug_info, started);
		}

		let retrieved = self.retrieve(catalog, &query).await;
		let gating = &self.cfg.gating;
		let primary = if query.is_arabic { gating.threshold_arabic } else { gating.threshold_general };
		let (relevance_gate, threshold) = match retrieved.scoring {
			Scoring::Semantic => (RelevanceGate::from_config(gating), primary),
			Scoring::Keyword => (RelevanceGate::new(None), KEYWORD_THRESHOLD),
		};
		let filters = req.filters.clone().unwrap_or_default();
		let mut candidates =
			gate_hits(catalog, &retrieved.hits, &relevance_gate, &gate_query, threshold, &filters);

		debug_info.scoring = retrieved.scoring;
		debug_info.candidates_retrieved = retrieved.hits.len();
		debug_info.top_raw_scores =
			retrieved.hits.iter().take(TOP_RAW_SCORES).map(|(_, score)| *score).collect();
		debug_info.threshold_used = Some(threshold);

		let relaxed = gating.threshold_relaxed;

		if retrieved.scoring == Scoring::Semantic
			&& candidates.len() < gating.min_results as usize
			&& !query.is_short
			&& relaxed < primary
		{
			tracing::info!(
				gated = candidates.len(),
				primary,
				relaxed,
				"Too few candidates; relaxing threshold."
			);

			candidates =
				gate_hits(catalog, &retrieved.hits, &relevance_gate, &gate_query, relaxed, &filters);
			debug_info.threshold_used = Some(relaxed);
			debug_info.relaxed = true;
		}

		debug_info.candidates_gated = candidates.len();

		if req.enable_reranking && candidates.len() > 1 {
			self.rerank_candidates(catalog, &query.text, &mut candidates).await;
		}

		candidates.truncate(top_k);

		let results = self.present(catalog, &candidates, &query, retrieved.scoring);
		let response = RecommendResponse::finish(results, debug_info, started);

		tracing::info!(
			query = %query.original,
			results = response.total_found,
			scoring = ?retrieved.scoring,
			"Recommendation completed."
		);

		response
	}

	fn present(
		&self,
		catalog: &CatalogIndex,
		candidates: &[Candidate],
		query: &NormalizedQuery,
		scoring: Scoring,
	) -> Vec<Recommendation> {
		let scores = candidates.iter().map(|candidate| candidate.score).collect::<Vec<_>>();
		let ranks = assign_ranks(&scores);

		candidates
			.iter()
			.zip(ranks)
			.filter_map(|(candidate, rank)| {
				let item = &catalog.row(candidate.row)?.item;

				Some(Recommendation {
					title: item.title.clone(),
					url: item.url_or(&self.cfg.index.course_base_url),
					category: item.category.clone(),
					level: item.level.to_string(),
					rank,
					score: candidate.score,
					matched_keywords: candidate.matched_keywords.clone(),
					why: explain::reasons(item, candidate, query, scoring),
					desc_snippet: snippet(&item.description, SNIPPET_GRAPHEMES),
				})
			})
			.collect()
	}
}

/// First typed must-exist keyword that appears nowhere in the catalog text.
fn missing_topic<'a>(catalog: &CatalogIndex, gate_query: &'a GateQuery) -> Option<&'a str> {
	gate_query.required.iter().map(String::as_str).find(|term| !catalog.corpus_contains(term))
}

/// Applies request filters and the relevance gate to retrieval hits, keeping their order.
fn gate_hits(
	catalog: &CatalogIndex,
	hits: &[(usize, f32)],
	relevance_gate: &RelevanceGate,
	gate_query: &GateQuery,
	threshold: f32,
	filters: &RecommendFilters,
) -> Vec<Candidate> {
	hits.iter()
		.filter_map(|(row, score)| {
			let item = &catalog.row(*row)?.item;

			if !filters.matches(item) {
				return None;
			}

			let decision = relevance_gate.decide(item, *score, gate_query, threshold);

			decision.accepted.then(|| Candidate {
				row: *row,
				score: *score,
				matched_keywords: decision.matched_keywords,
				reason: decision.reason,
				rerank_score: None,
			})
		})
		.collect()
}
