use std::path::PathBuf;

use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub index: Index,
	pub providers: Providers,
	#[serde(default)]
	pub retrieval: Retrieval,
	#[serde(default)]
	pub gating: Gating,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Index {
	/// Directory holding the manifest, catalog table, vectors and abbreviation map.
	pub artifacts_dir: PathBuf,
	/// Catalog JSON consumed by the indexer. Query-time code never reads it.
	pub catalog_path: Option<PathBuf>,
	/// Prefix for items that carry no URL of their own; the item id is appended.
	pub course_base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
	pub rerank: RerankProviderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	#[serde(default)]
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default = "default_batch_size")]
	pub batch_size: u32,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RerankProviderConfig {
	#[serde(default = "default_true")]
	pub enabled: bool,
	pub provider_id: String,
	pub api_base: String,
	#[serde(default)]
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Retrieval {
	/// Nearest neighbours fetched per query before gating.
	pub candidate_k: u32,
	/// Leading gated candidates sent to the cross-encoder.
	pub rerank_window: u32,
	pub default_top_k: u32,
	pub max_top_k: u32,
}
impl Default for Retrieval {
	fn default() -> Self {
		Self { candidate_k: 100, rerank_window: 20, default_top_k: 10, max_top_k: 50 }
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Gating {
	pub threshold_general: f32,
	/// Translated queries score lower against an English-heavy catalog.
	pub threshold_arabic: f32,
	pub threshold_relaxed: f32,
	/// Long queries without keyword evidence are still accepted above this score.
	pub semantic_ceiling: f32,
	/// Relaxation kicks in when fewer candidates than this survive the primary threshold.
	pub min_results: u32,
	pub short_query_max_tokens: u32,
}
impl Default for Gating {
	fn default() -> Self {
		Self {
			threshold_general: 0.30,
			threshold_arabic: 0.15,
			threshold_relaxed: 0.20,
			semantic_ceiling: 0.60,
			min_results: 3,
			short_query_max_tokens: 2,
		}
	}
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_batch_size() -> u32 {
	64
}

fn default_true() -> bool {
	true
}
