use std::cmp::Ordering;

use crate::{Error, Result};

/// Index value of a padded, unused result slot.
pub const NO_HIT: i64 = -1;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchHits {
	pub scores: Vec<f32>,
	pub indices: Vec<i64>,
}
impl SearchHits {
	/// `(row, score)` pairs with padded slots removed.
	pub fn hits(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
		self.indices.iter().zip(&self.scores).filter_map(|(idx, score)| {
			usize::try_from(*idx).ok().map(|row| (row, *score))
		})
	}

	pub fn len(&self) -> usize {
		self.indices.len()
	}

	pub fn is_empty(&self) -> bool {
		self.indices.is_empty()
	}
}

/// Dense row-major matrix of unit vectors searched by exact inner product.
#[derive(Clone, Debug, PartialEq)]
pub struct VectorIndex {
	dimensions: usize,
	data: Vec<f32>,
}
impl VectorIndex {
	/// Normalizes every row. Rows must all have `dimensions` entries and be non-zero.
	pub fn from_rows(rows: &[Vec<f32>], dimensions: usize) -> Result<Self> {
		if dimensions == 0 {
			return Err(Error::Validation("Vector dimensions must be greater than zero.".to_string()));
		}

		let mut data = Vec::with_capacity(rows.len() * dimensions);

		for (row, vector) in rows.iter().enumerate() {
			if vector.len() != dimensions {
				return Err(Error::Misaligned(format!(
					"Row {row} has {} dimensions, expected {dimensions}.",
					vector.len()
				)));
			}

			let normalized = l2_normalize(vector).ok_or_else(|| {
				Error::Validation(format!("Row {row} has a zero or non-finite vector."))
			})?;

			data.extend(normalized);
		}

		Ok(Self { dimensions, data })
	}

	/// Wraps vectors that were normalized when they were written.
	pub(crate) fn from_flat(data: Vec<f32>, dimensions: usize) -> Result<Self> {
		if dimensions == 0 || data.len() % dimensions != 0 {
			return Err(Error::Misaligned(format!(
				"{} floats do not split into rows of {dimensions}.",
				data.len()
			)));
		}

		Ok(Self { dimensions, data })
	}

	pub fn dimensions(&self) -> usize {
		self.dimensions
	}

	pub fn rows(&self) -> usize {
		self.data.len() / self.dimensions
	}

	pub(crate) fn as_flat(&self) -> &[f32] {
		&self.data
	}

	pub fn row(&self, idx: usize) -> Option<&[f32]> {
		self.data.chunks_exact(self.dimensions).nth(idx)
	}

	/// Top `k` rows by inner product with the normalized query, best first, ties by row. The
	/// result always has `k` slots; slots past the last row hold [`NO_HIT`] and `f32::MIN`.
	pub fn search(&self, query_vector: &[f32], k: usize) -> Result<SearchHits> {
		if query_vector.len() != self.dimensions {
			return Err(Error::Validation(format!(
				"Query vector has {} dimensions, expected {}.",
				query_vector.len(),
				self.dimensions
			)));
		}

		let query = l2_normalize(query_vector)
			.ok_or_else(|| Error::Validation("Query vector is zero or non-finite.".to_string()))?;
		let mut scored = self
			.data
			.chunks_exact(self.dimensions)
			.enumerate()
			.map(|(row, vector)| (row, dot(&query, vector)))
			.collect::<Vec<_>>();

		scored.sort_by(|(row_a, score_a), (row_b, score_b)| {
			score_b.total_cmp(score_a).then_with(|| row_a.cmp(row_b))
		});

		Ok(ranked_hits(scored, k, true))
	}
}

/// Builds hits from `(row, score)` pairs that are already sorted best first.
pub(crate) fn ranked_hits(scored: Vec<(usize, f32)>, k: usize, pad: bool) -> SearchHits {
	let mut hits = SearchHits { scores: Vec::with_capacity(k), indices: Vec::with_capacity(k) };

	for (row, score) in scored.into_iter().take(k) {
		hits.indices.push(i64::try_from(row).unwrap_or(NO_HIT));
		hits.scores.push(score);
	}

	if pad {
		while hits.indices.len() < k {
			hits.indices.push(NO_HIT);
			hits.scores.push(f32::MIN);
		}
	}

	hits
}

/// Unit-length copy of `vector`, or `None` when its norm is zero or not finite.
pub fn l2_normalize(vector: &[f32]) -> Option<Vec<f32>> {
	let norm = vector.iter().map(|value| value * value).sum::<f32>().sqrt();

	if !norm.is_finite() || norm <= f32::EPSILON {
		return None;
	}

	Some(vector.iter().map(|value| value / norm).collect())
}

pub(crate) fn compare_desc(a: f32, b: f32) -> Ordering {
	b.total_cmp(&a)
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
	a.iter().zip(b).map(|(x, y)| x * y).sum()
}
