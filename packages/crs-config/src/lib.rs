mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, EmbeddingProviderConfig, Gating, Index, Providers, RerankProviderConfig, Retrieval,
	Service,
};

use std::{
	fs,
	path::{Path, PathBuf},
};

const MAX_CANDIDATE_K: u32 = 10_000;

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	parse(&raw).map_err(|err| match err {
		ParseFailure::Toml(source) => Error::ParseConfig { path: path.to_path_buf(), source },
		ParseFailure::Invalid(err) => err,
	})
}

/// Parses and validates a config that is already in memory.
pub fn from_toml_str(raw: &str) -> Result<Config> {
	parse(raw).map_err(|err| match err {
		ParseFailure::Toml(source) =>
			Error::ParseConfig { path: PathBuf::from("<memory>"), source },
		ParseFailure::Invalid(err) => err,
	})
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::invalid("service.http_bind", "must be non-empty"));
	}
	if cfg.index.artifacts_dir.as_os_str().is_empty() {
		return Err(Error::invalid("index.artifacts_dir", "must be non-empty"));
	}
	if cfg.index.course_base_url.trim().is_empty() {
		return Err(Error::invalid("index.course_base_url", "must be non-empty"));
	}

	let embedding = &cfg.providers.embedding;

	for (field, value) in [
		("providers.embedding.provider_id", &embedding.provider_id),
		("providers.embedding.api_base", &embedding.api_base),
		("providers.embedding.path", &embedding.path),
		("providers.embedding.model", &embedding.model),
	] {
		if value.trim().is_empty() {
			return Err(Error::invalid(field, "must be non-empty"));
		}
	}

	if embedding.dimensions == 0 {
		return Err(Error::invalid("providers.embedding.dimensions", "must be greater than zero"));
	}
	if embedding.batch_size == 0 {
		return Err(Error::invalid("providers.embedding.batch_size", "must be greater than zero"));
	}
	if embedding.timeout_ms == 0 {
		return Err(Error::invalid("providers.embedding.timeout_ms", "must be greater than zero"));
	}

	let rerank = &cfg.providers.rerank;

	if rerank.enabled {
		for (field, value) in [
			("providers.rerank.provider_id", &rerank.provider_id),
			("providers.rerank.api_base", &rerank.api_base),
			("providers.rerank.path", &rerank.path),
			("providers.rerank.model", &rerank.model),
		] {
			if value.trim().is_empty() {
				return Err(Error::invalid(field, "must be non-empty when reranking is enabled"));
			}
		}

		if rerank.timeout_ms == 0 {
			return Err(Error::invalid("providers.rerank.timeout_ms", "must be greater than zero"));
		}
	}

	for (field, headers) in [
		("providers.embedding.default_headers", &embedding.default_headers),
		("providers.rerank.default_headers", &rerank.default_headers),
	] {
		if headers.values().any(|value| !value.is_string()) {
			return Err(Error::invalid(field, "values must be strings"));
		}
	}

	validate_retrieval(&cfg.retrieval)?;
	validate_gating(&cfg.gating)?;

	Ok(())
}

fn validate_retrieval(retrieval: &Retrieval) -> Result<()> {
	if retrieval.candidate_k == 0 || retrieval.candidate_k > MAX_CANDIDATE_K {
		return Err(Error::invalid(
			"retrieval.candidate_k",
			format!("must be in the range 1-{MAX_CANDIDATE_K}"),
		));
	}
	if retrieval.rerank_window == 0 {
		return Err(Error::invalid("retrieval.rerank_window", "must be greater than zero"));
	}
	if retrieval.default_top_k == 0 {
		return Err(Error::invalid("retrieval.default_top_k", "must be greater than zero"));
	}
	if retrieval.default_top_k > retrieval.max_top_k {
		return Err(Error::invalid(
			"retrieval.default_top_k",
			"must be less than or equal to retrieval.max_top_k",
		));
	}
	if retrieval.max_top_k > retrieval.candidate_k {
		return Err(Error::invalid(
			"retrieval.max_top_k",
			"must be less than or equal to retrieval.candidate_k",
		));
	}

	Ok(())
}

fn validate_gating(gating: &Gating) -> Result<()> {
	for (field, value) in [
		("gating.threshold_general", gating.threshold_general),
		("gating.threshold_arabic", gating.threshold_arabic),
		("gating.threshold_relaxed", gating.threshold_relaxed),
		("gating.semantic_ceiling", gating.semantic_ceiling),
	] {
		if !value.is_finite() {
			return Err(Error::invalid(field, "must be a finite number"));
		}
		if !(-1.0..=1.0).contains(&value) {
			return Err(Error::invalid(field, "must be in the range -1.0-1.0"));
		}
	}

	if gating.threshold_relaxed > gating.threshold_general {
		return Err(Error::invalid(
			"gating.threshold_relaxed",
			"must be less than or equal to gating.threshold_general",
		));
	}
	if gating.min_results == 0 {
		return Err(Error::invalid("gating.min_results", "must be greater than zero"));
	}
	if gating.short_query_max_tokens == 0 {
		return Err(Error::invalid("gating.short_query_max_tokens", "must be greater than zero"));
	}

	Ok(())
}

enum ParseFailure {
	Toml(toml::de::Error),
	Invalid(Error),
}

fn parse(raw: &str) -> Result<Config, ParseFailure> {
	let mut cfg: Config = toml::from_str(raw).map_err(ParseFailure::Toml)?;

	normalize(&mut cfg);
	validate(&cfg).map_err(ParseFailure::Invalid)?;

	Ok(cfg)
}

fn normalize(cfg: &mut Config) {
	cfg.service.http_bind = cfg.service.http_bind.trim().to_string();
	cfg.service.log_level = cfg.service.log_level.trim().to_string();
	cfg.index.course_base_url = cfg.index.course_base_url.trim().trim_end_matches('/').to_string();

	if cfg.index.catalog_path.as_ref().map(|path| path.as_os_str().is_empty()).unwrap_or(false) {
		cfg.index.catalog_path = None;
	}

	let embedding = &mut cfg.providers.embedding;

	embedding.api_base = embedding.api_base.trim().trim_end_matches('/').to_string();
	embedding.api_key = embedding.api_key.trim().to_string();

	let rerank = &mut cfg.providers.rerank;

	rerank.api_base = rerank.api_base.trim().trim_end_matches('/').to_string();
	rerank.api_key = rerank.api_key.trim().to_string();
}
