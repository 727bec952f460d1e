pub const MIN_RANK: u8 = 1;
pub const MAX_RANK: u8 = 10;
pub const MIDPOINT_RANK: u8 = 5;

/// Maps scores onto 1..=10 relative to the min and max of this set.
///
/// Equal scores (including a single item) all get the midpoint. Non-finite scores count as the
/// minimum.
pub fn assign_ranks(scores: &[f32]) -> Vec<u8> {
	let finite = scores.iter().copied().filter(|score| score.is_finite());
	let (min, max) = finite.fold((f32::INFINITY, f32::NEG_INFINITY), |(min, max), score| {
		(min.min(score), max.max(score))
	});

	if !min.is_finite() || !max.is_finite() || max - min <= f32::EPSILON {
		return vec![MIDPOINT_RANK; scores.len()];
	}

	let span = max - min;

	scores
		.iter()
		.map(|score| {
			let score = if score.is_finite() { *score } else { min };
			let scaled = ((score - min) / span * f32::from(MAX_RANK - MIN_RANK)).floor();

			(scaled.clamp(0.0, f32::from(MAX_RANK - MIN_RANK)) as u8) + MIN_RANK
		})
		.collect()
}
