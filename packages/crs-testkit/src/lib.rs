mod error;

pub use error::{Error, Result};
pub use tempfile::TempDir;

use std::{collections::HashMap, sync::Arc};

use color_eyre::eyre;

use crs_config::{Config, EmbeddingProviderConfig, RerankProviderConfig};
use crs_domain::{CatalogItem, Level, abbreviation::mine_abbreviations};
use crs_index::CatalogIndex;
use crs_service::{BoxFuture, EmbeddingProvider, Providers, Recommender, RerankProvider};

pub const HASH_DIMENSIONS: usize = 256;
pub const HASH_MODEL: &str = "testkit-hash-256";

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

const TEST_CONFIG: &str = r#"
[service]
http_bind = "127.0.0.1:0"
log_level = "debug"

[index]
artifacts_dir   = "target/crs-testkit/missing-index"
course_base_url = "https://courses.test/course/"

[providers.embedding]
provider_id = "testkit"
api_base    = "http://127.0.0.1:9"
path        = "/v1/embeddings"
model       = "testkit-hash-256"
dimensions  = 256
timeout_ms  = 1000
batch_size  = 4

[providers.rerank]
enabled     = true
provider_id = "testkit"
api_base    = "http://127.0.0.1:9"
path        = "/v1/rerank"
model       = "testkit-rerank"
timeout_ms  = 1000

[retrieval]
candidate_k   = 20
rerank_window = 5
default_top_k = 10
max_top_k     = 20

[gating]
threshold_general      = 0.15
threshold_arabic       = 0.10
threshold_relaxed      = 0.05
semantic_ceiling       = 0.50
min_results            = 3
short_query_max_tokens = 2
"#;

/// A scratch directory under the system temp dir, removed when dropped.
pub fn temp_dir(prefix: &str) -> Result<TempDir> {
	Ok(tempfile::Builder::new().prefix(prefix).tempdir()?)
}

/// Deterministic bag-of-words embedder. Texts sharing tokens get a positive cosine score;
/// texts sharing none score near zero.
#[derive(Clone, Copy, Debug, Default)]
pub struct HashEmbedder;
impl HashEmbedder {
	pub fn vector(text: &str) -> Vec<f32> {
		let mut vector = vec![0.0; HASH_DIMENSIONS];
		let lowered = text.to_lowercase();
		let mut any = false;

		for token in lowered.split(|ch: char| !ch.is_alphanumeric()).filter(|token| !token.is_empty())
		{
			vector[bucket(token)] += 1.0;
			any = true;
		}

		if !any {
			vector[0] = 1.0;
		}

		vector
	}
}

impl EmbeddingProvider for HashEmbedder {
	fn embed<'a>(
		&'a self,
		_: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>> {
		Box::pin(async move { Ok(texts.iter().map(|text| Self::vector(text)).collect()) })
	}
}

#[derive(Clone, Copy, Debug, Default)]
pub struct FailingEmbedder;

impl EmbeddingProvider for FailingEmbedder {
	fn embed<'a>(
		&'a self,
		_: &'a EmbeddingProviderConfig,
		_: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>> {
		Box::pin(async move { Err(eyre::eyre!("Embedding provider is unreachable.")) })
	}
}

/// Scores each document by its exact text, falling back to `default_score`.
#[derive(Clone, Debug, Default)]
pub struct ScriptedReranker {
	pub scores: HashMap<String, f32>,
	pub default_score: f32,
}
impl ScriptedReranker {
	pub fn new<I, S>(scores: I) -> Self
	where
		I: IntoIterator<Item = (S, f32)>,
		S: Into<String>,
	{
		Self {
			scores: scores.into_iter().map(|(doc, score)| (doc.into(), score)).collect(),
			default_score: 0.0,
		}
	}
}

impl RerankProvider for ScriptedReranker {
	fn rerank<'a>(
		&'a self,
		_: &'a RerankProviderConfig,
		_: &'a str,
		docs: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<f32>>> {
		Box::pin(async move {
			Ok(docs
				.iter()
				.map(|doc| self.scores.get(doc).copied().unwrap_or(self.default_score))
				.collect())
		})
	}
}

#[derive(Clone, Copy, Debug, Default)]
pub struct FailingReranker;

impl RerankProvider for FailingReranker {
	fn rerank<'a>(
		&'a self,
		_: &'a RerankProviderConfig,
		_: &'a str,
		_: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<f32>>> {
		Box::pin(async move { Err(eyre::eyre!("Rerank provider timed out.")) })
	}
}

pub fn hash_providers() -> Providers {
	Providers::new(Arc::new(HashEmbedder), Arc::new(FailingReranker))
}

pub fn test_config() -> Result<Config> {
	Ok(crs_config::from_toml_str(TEST_CONFIG)?)
}

/// Eight courses across programming, data, language processing, business and games. No
/// course mentions C++ or Rust, and Java only appears inside "JavaScript".
pub fn sample_catalog() -> Vec<CatalogItem> {
	vec![
		course(
			"1",
			"Python for Beginners",
			"Programming",
			Level::Beginner,
			10.0,
			&["Python", "Programming Basics"],
			"Learn Python programming from scratch with hands-on exercises.",
		),
		course(
			"2",
			"Data Analysis with Python and Pandas",
			"Data Science",
			Level::Intermediate,
			20.0,
			&["Python", "Pandas", "Data Analysis"],
			"Clean, explore and visualize datasets using pandas and matplotlib.",
		),
		course(
			"3",
			"Advanced Python Patterns",
			"Programming",
			Level::Advanced,
			15.0,
			&["Python", "Decorators", "Concurrency"],
			"Master generators, decorators and async programming in Python.",
		),
		course(
			"4",
			"JavaScript Essentials",
			"Web Development",
			Level::Beginner,
			12.0,
			&["JavaScript", "DOM", "ES6"],
			"Build interactive web pages with modern JavaScript.",
		),
		course(
			"5",
			"Natural Language Processing (NLP) Fundamentals",
			"Machine Learning",
			Level::Intermediate,
			18.0,
			&["NLP", "Text Classification", "Tokenization"],
			"Process and classify text with classic and neural methods.",
		),
		course(
			"6",
			"SQL for Data Analysts",
			"Data",
			Level::Beginner,
			8.0,
			&["SQL", "Databases", "Queries"],
			"Write queries to answer business questions from relational databases.",
		),
		course(
			"7",
			"Leadership and Team Management",
			"Business",
			Level::Intermediate,
			6.0,
			&["Leadership", "Communication"],
			"Lead teams, run effective meetings and give feedback.",
		),
		course(
			"8",
			"Unity Game Development",
			"Game Development",
			Level::Beginner,
			25.0,
			&["Unity", "C#", "Game Design"],
			"Create 2D and 3D games with the Unity engine.",
		),
	]
}

/// Index over `items` embedded with [`HashEmbedder`].
pub fn hash_index(items: Vec<CatalogItem>) -> Result<CatalogIndex> {
	let embeddings =
		items.iter().map(|item| HashEmbedder::vector(&item.combined_text())).collect::<Vec<_>>();
	let abbreviations = mine_abbreviations(&items);

	Ok(CatalogIndex::build(items, &embeddings, HASH_MODEL, abbreviations)?)
}

/// Recommender over the sample catalog with an in-memory index.
pub fn sample_recommender(cfg: Config, providers: Providers) -> Result<Recommender> {
	let index = hash_index(sample_catalog())?;

	Ok(Recommender::with_index(cfg, providers, index))
}

fn course(
	id: &str,
	title: &str,
	category: &str,
	level: Level,
	duration_hours: f32,
	skills: &[&str],
	description: &str,
) -> CatalogItem {
	CatalogItem {
		id: id.to_string(),
		title: title.to_string(),
		category: category.to_string(),
		level,
		duration_hours,
		skills: skills.iter().map(|skill| skill.to_string()).collect(),
		description: description.to_string(),
		instructor: String::new(),
		url: None,
	}
}

fn bucket(token: &str) -> usize {
	let hash = token
		.bytes()
		.fold(FNV_OFFSET, |hash, byte| (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME));

	(hash % HASH_DIMENSIONS as u64) as usize
}
