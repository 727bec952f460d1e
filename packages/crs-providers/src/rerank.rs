use reqwest::Client;
use serde_json::Value;

use crs_config::RerankProviderConfig;

use crate::{Error, Result};

/// Scores each document against `query` with a Cohere/Jina-style rerank endpoint. The output is
/// aligned with `docs`.
pub async fn rerank(
	client: &Client,
	cfg: &RerankProviderConfig,
	query: &str,
	docs: &[String],
) -> Result<Vec<f32>> {
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({ "model": cfg.model, "query": query, "documents": docs });
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_rerank_response(json, docs.len())
}

/// Every document must receive exactly one score; gaps and out-of-range indices are errors.
pub fn parse_rerank_response(json: Value, doc_count: usize) -> Result<Vec<f32>> {
	let results = json
		.get("results")
		.or_else(|| json.get("data"))
		.and_then(Value::as_array)
		.ok_or_else(|| Error::response("Rerank response is missing results array."))?;
	let mut scores: Vec<Option<f32>> = vec![None; doc_count];

	for item in results {
		let index = item
			.get("index")
			.and_then(Value::as_u64)
			.and_then(|value| usize::try_from(value).ok())
			.ok_or_else(|| Error::response("Rerank result is missing index."))?;
		let score = item
			.get("relevance_score")
			.or_else(|| item.get("score"))
			.and_then(Value::as_f64)
			.ok_or_else(|| Error::response("Rerank result is missing score."))? as f32;
		let Some(slot) = scores.get_mut(index) else {
			return Err(Error::response(format!(
				"Rerank index {index} is out of range for {doc_count} documents."
			)));
		};

		*slot = Some(score);
	}

	scores
		.into_iter()
		.enumerate()
		.map(|(index, score)| {
			score.ok_or_else(|| Error::response(format!("Rerank result {index} is missing.")))
		})
		.collect()
}
