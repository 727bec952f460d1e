pub mod artifacts;
pub mod vector;

mod error;

pub use artifacts::{CatalogRow, Manifest};
pub use error::{Error, Result};
pub use vector::{NO_HIT, SearchHits, VectorIndex, l2_normalize};

use std::{collections::BTreeMap, path::Path};

use crs_domain::CatalogItem;

/// Catalog table, vectors and abbreviation map, positionally aligned and read-only.
#[derive(Clone, Debug)]
pub struct CatalogIndex {
	manifest: Manifest,
	rows: Vec<CatalogRow>,
	vectors: VectorIndex,
	abbreviations: BTreeMap<String, String>,
	corpus: String,
}
impl CatalogIndex {
	/// Assembles an index from items and their raw embeddings, in the same order.
	pub fn build(
		items: Vec<CatalogItem>,
		embeddings: &[Vec<f32>],
		embedding_model: &str,
		abbreviations: BTreeMap<String, String>,
	) -> Result<Self> {
		if items.len() != embeddings.len() {
			return Err(Error::Misaligned(format!(
				"{} items but {} embeddings.",
				items.len(),
				embeddings.len()
			)));
		}
		if items.is_empty() {
			return Err(Error::Validation("Catalog has no items.".to_string()));
		}

		let dimensions = embeddings.first().map(Vec::len).unwrap_or_default();
		let vectors = VectorIndex::from_rows(embeddings, dimensions)?;
		let manifest = Manifest {
			schema_version: artifacts::SCHEMA_VERSION,
			catalog_hash: artifacts::catalog_hash(&items)?,
			embedding_model: embedding_model.to_string(),
			dimensions: vectors.dimensions(),
			rows: items.len(),
		};
		let rows = items.into_iter().map(CatalogRow::new).collect::<Vec<_>>();

		Ok(Self::assemble(manifest, rows, vectors, abbreviations))
	}

	/// Loads an artifacts directory and verifies that its parts line up.
	pub fn load(dir: &Path) -> Result<Self> {
		let raw = artifacts::read(dir)?;
		let manifest = raw.manifest;

		if raw.rows.len() != manifest.rows {
			return Err(Error::Misaligned(format!(
				"Manifest lists {} rows but the catalog table has {}.",
				manifest.rows,
				raw.rows.len()
			)));
		}
		if raw.vectors.len() != manifest.rows * manifest.dimensions {
			return Err(Error::Misaligned(format!(
				"Expected {} x {} floats but found {}.",
				manifest.rows,
				manifest.dimensions,
				raw.vectors.len()
			)));
		}

		let items = raw.rows.iter().map(|row| row.item.clone()).collect::<Vec<_>>();
		let hash = artifacts::catalog_hash(&items)?;

		if hash != manifest.catalog_hash {
			return Err(Error::Misaligned(format!(
				"Catalog hash {hash} does not match manifest hash {}.",
				manifest.catalog_hash
			)));
		}

		let vectors = VectorIndex::from_flat(raw.vectors, manifest.dimensions)?;

		tracing::info!(
			dir = %dir.display(),
			rows = manifest.rows,
			dimensions = manifest.dimensions,
			catalog_hash = %manifest.catalog_hash,
			"Index loaded."
		);

		Ok(Self::assemble(manifest, raw.rows, vectors, raw.abbreviations))
	}

	pub fn write(&self, dir: &Path) -> Result<()> {
		artifacts::write(dir, &self.manifest, &self.rows, self.vectors.as_flat(), &self.abbreviations)
	}

	fn assemble(
		manifest: Manifest,
		rows: Vec<CatalogRow>,
		vectors: VectorIndex,
		abbreviations: BTreeMap<String, String>,
	) -> Self {
		let corpus = corpus_blob(&rows);

		Self { manifest, rows, vectors, abbreviations, corpus }
	}

	pub fn manifest(&self) -> &Manifest {
		&self.manifest
	}

	pub fn catalog_hash(&self) -> &str {
		&self.manifest.catalog_hash
	}

	pub fn dimensions(&self) -> usize {
		self.vectors.dimensions()
	}

	pub fn len(&self) -> usize {
		self.rows.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}

	pub fn rows(&self) -> &[CatalogRow] {
		&self.rows
	}

	pub fn row(&self, idx: usize) -> Option<&CatalogRow> {
		self.rows.get(idx)
	}

	pub fn abbreviations(&self) -> &BTreeMap<String, String> {
		&self.abbreviations
	}

	pub fn search(&self, query_vector: &[f32], k: usize) -> Result<SearchHits> {
		self.vectors.search(query_vector, k)
	}

	/// Degraded scoring: each row scores the number of query tokens found as substrings of its
	/// combined text. Rows scoring zero are left out and no padding is added.
	pub fn keyword_search(&self, tokens: &[String], k: usize) -> SearchHits {
		let mut scored = self
			.rows
			.iter()
			.enumerate()
			.filter_map(|(row, catalog_row)| {
				let found = tokens
					.iter()
					.filter(|token| catalog_row.combined_text.contains(token.as_str()))
					.count();

				(found > 0).then_some((row, found as f32))
			})
			.collect::<Vec<_>>();

		scored.sort_by(|(row_a, score_a), (row_b, score_b)| {
			vector::compare_desc(*score_a, *score_b).then_with(|| row_a.cmp(row_b))
		});

		vector::ranked_hits(scored, k, false)
	}

	/// Plain substring containment in the lowercased titles, skills and descriptions.
	pub fn corpus_contains(&self, term: &str) -> bool {
		self.corpus.contains(&term.to_lowercase())
	}
}

fn corpus_blob(rows: &[CatalogRow]) -> String {
	let titles = rows.iter().map(|row| row.item.title.clone());
	let skills = rows.iter().map(|row| row.item.skills_text());
	let descriptions = rows.iter().map(|row| row.item.description.clone());

	titles.chain(skills).chain(descriptions).collect::<Vec<_>>().join(" ").to_lowercase()
}
