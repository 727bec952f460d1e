use reqwest::Client;
use serde_json::Value;

use crs_config::EmbeddingProviderConfig;

use crate::{Error, Result};

/// Embeds `texts` through an OpenAI-compatible endpoint, `batch_size` texts per request. The
/// output has one vector per input, in input order.
pub async fn embed(
	client: &Client,
	cfg: &EmbeddingProviderConfig,
	texts: &[String],
) -> Result<Vec<Vec<f32>>> {
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let headers = crate::auth_headers(&cfg.api_key, &cfg.default_headers)?;
	let batch_size = usize::try_from(cfg.batch_size).unwrap_or(usize::MAX).max(1);
	let mut vectors = Vec::with_capacity(texts.len());

	for batch in texts.chunks(batch_size) {
		let body = serde_json::json!({
			"model": cfg.model,
			"input": batch,
			"dimensions": cfg.dimensions,
		});
		let res = client.post(&url).headers(headers.clone()).json(&body).send().await?;
		let json: Value = res.error_for_status()?.json().await?;
		let parsed = parse_embedding_response(json)?;

		if parsed.len() != batch.len() {
			return Err(Error::response(format!(
				"Embedding provider returned {} vectors for {} inputs.",
				parsed.len(),
				batch.len()
			)));
		}

		vectors.extend(parsed);
	}

	let expected = usize::try_from(cfg.dimensions).unwrap_or(usize::MAX);

	if let Some(vector) = vectors.iter().find(|vector| vector.len() != expected) {
		return Err(Error::response(format!(
			"Embedding has {} dimensions, expected {expected}.",
			vector.len()
		)));
	}

	Ok(vectors)
}

pub fn parse_embedding_response(json: Value) -> Result<Vec<Vec<f32>>> {
	let data = json
		.get("data")
		.and_then(Value::as_array)
		.ok_or_else(|| Error::response("Embedding response is missing data array."))?;
	let mut indexed = Vec::with_capacity(data.len());

	for (fallback_index, item) in data.iter().enumerate() {
		let index = item
			.get("index")
			.and_then(Value::as_u64)
			.and_then(|value| usize::try_from(value).ok())
			.unwrap_or(fallback_index);
		let embedding = item
			.get("embedding")
			.and_then(Value::as_array)
			.ok_or_else(|| Error::response("Embedding item is missing embedding array."))?;
		let vector = embedding
			.iter()
			.map(|value| {
				value
					.as_f64()
					.map(|number| number as f32)
					.ok_or_else(|| Error::response("Embedding values must be numeric."))
			})
			.collect::<Result<Vec<_>>>()?;

		indexed.push((index, vector));
	}

	indexed.sort_by_key(|(index, _)| *index);

	Ok(indexed.into_iter().map(|(_, vector)| vector).collect())
}
