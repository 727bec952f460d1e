use serde::Serialize;

use crate::{catalog::CatalogItem, lexicon, matcher, normalize::NormalizedQuery};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateReason {
	BelowThreshold,
	/// Short query with keywords, none of which the item mentions.
	NoKeywordEvidence,
	KeywordMatch,
	/// The query has no strong keywords, so the score alone decided.
	ScoreOnly,
	SemanticCeiling,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GateDecision {
	pub accepted: bool,
	pub matched_keywords: Vec<String>,
	pub reason: GateReason,
}
impl GateDecision {
	fn reject(reason: GateReason) -> Self {
		Self { accepted: false, matched_keywords: Vec::new(), reason }
	}

	fn accept(reason: GateReason, matched_keywords: Vec<String>) -> Self {
		Self { accepted: true, matched_keywords, reason }
	}
}

/// Per-query gate input, computed once and reused for every candidate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GateQuery {
	pub keywords: Vec<String>,
	/// Terms the user typed that must appear somewhere in the catalog. Abbreviation expansions
	/// are never required.
	pub required: Vec<String>,
	pub is_short: bool,
}
impl GateQuery {
	pub fn from_normalized(query: &NormalizedQuery) -> Self {
		let typed = strong_keywords(&query.typed_tokens);
		let required = must_exist_terms(&typed).into_iter().map(str::to_string).collect();

		Self { keywords: strong_keywords(&query.tokens), required, is_short: query.is_short }
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RelevanceGate {
	semantic_ceiling: Option<f32>,
}
impl RelevanceGate {
	pub fn new(semantic_ceiling: Option<f32>) -> Self {
		Self { semantic_ceiling }
	}

	pub fn from_config(gating: &crs_config::Gating) -> Self {
		Self::new(Some(gating.semantic_ceiling))
	}

	pub fn semantic_ceiling(&self) -> Option<f32> {
		self.semantic_ceiling
	}

	pub fn decide(
		&self,
		item: &CatalogItem,
		raw_score: f32,
		query: &GateQuery,
		threshold: f32,
	) -> GateDecision {
		if raw_score.is_nan() || raw_score < threshold {
			return GateDecision::reject(GateReason::BelowThreshold);
		}
		if query.keywords.is_empty() {
			return GateDecision::accept(GateReason::ScoreOnly, Vec::new());
		}

		let matched = matched_keywords(item, &query.keywords);

		if !matched.is_empty() {
			return GateDecision::accept(GateReason::KeywordMatch, matched);
		}
		if query.is_short {
			return GateDecision::reject(GateReason::NoKeywordEvidence);
		}

		match self.semantic_ceiling {
			Some(ceiling) if raw_score > ceiling =>
				GateDecision::accept(GateReason::SemanticCeiling, Vec::new()),
			_ => GateDecision::reject(GateReason::NoKeywordEvidence),
		}
	}
}

/// Tokens that can serve as keyword evidence. Known technical and business terms are always
/// kept; other tokens must be at least two characters and not a generic intent word.
pub fn strong_keywords(tokens: &[String]) -> Vec<String> {
	let mut keywords: Vec<String> = Vec::new();

	for token in tokens {
		let retained = lexicon::is_tech_term(token) || lexicon::is_business_term(token);

		if !retained && (lexicon::is_gate_stopword(token) || token.chars().count() < 2) {
			continue;
		}
		if keywords.iter().any(|keyword| keyword == token) {
			continue;
		}

		keywords.push(token.clone());
	}

	keywords
}

/// Keywords whose absence from the whole catalog should block the query.
pub fn must_exist_terms(keywords: &[String]) -> Vec<&str> {
	keywords
		.iter()
		.map(String::as_str)
		.filter(|keyword| lexicon::is_tech_term(keyword))
		.collect()
}

/// Keywords found in the item, searching title, then skills, then description.
pub fn matched_keywords(item: &CatalogItem, keywords: &[String]) -> Vec<String> {
	let fields =
		[item.title.to_lowercase(), item.skills_text().to_lowercase(), item.description.to_lowercase()];

	keywords
		.iter()
		.filter(|keyword| {
			let keyword = keyword.to_lowercase();

			fields.iter().any(|field| matcher::matches_lowercased(field, &keyword))
		})
		.cloned()
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{catalog::Level, normalize::QueryNormalizer};

	fn item() -> CatalogItem {
		CatalogItem {
			id: "3".to_string(),
			title: "Web Development Bootcamp".to_string(),
			category: "Web Development".to_string(),
			level: Level::Intermediate,
			duration_hours: 40.0,
			skills: vec!["HTML".to_string(), "CSS".to_string(), "JavaScript".to_string()],
			description: "Complete guide to modern web development.".to_string(),
			instructor: String::new(),
			url: None,
		}
	}

	fn query(tokens: &[&str], is_short: bool) -> GateQuery {
		let tokens = tokens.iter().map(|token| token.to_string()).collect::<Vec<_>>();

		GateQuery { keywords: strong_keywords(&tokens), required: Vec::new(), is_short }
	}

	fn gate() -> RelevanceGate {
		RelevanceGate::new(Some(0.6))
	}

	#[test]
	fn rejects_below_threshold_before_anything_else() {
		let decision = gate().decide(&item(), 0.1, &query(&["css"], true), 0.3);

		assert!(!decision.accepted);
		assert_eq!(decision.reason, GateReason::BelowThreshold);
	}

	#[test]
	fn accepts_keyword_in_skills() {
		let decision = gate().decide(&item(), 0.35, &query(&["css"], true), 0.3);

		assert!(decision.accepted);
		assert_eq!(decision.matched_keywords, vec!["css"]);
		assert_eq!(decision.reason, GateReason::KeywordMatch);
	}

	#[test]
	fn short_query_without_match_is_rejected_even_with_high_score() {
		let decision = gate().decide(&item(), 0.95, &query(&["java"], true), 0.3);

		assert!(!decision.accepted);
		assert_eq!(decision.reason, GateReason::NoKeywordEvidence);
	}

	#[test]
	fn long_query_falls_back_to_semantic_ceiling() {
		let tokens = ["frontend", "styling", "layouts"];
		let below = gate().decide(&item(), 0.55, &query(&tokens, false), 0.3);
		let above = gate().decide(&item(), 0.65, &query(&tokens, false), 0.3);

		assert!(!below.accepted);
		assert!(above.accepted);
		assert_eq!(above.reason, GateReason::SemanticCeiling);
		assert!(above.matched_keywords.is_empty());
	}

	#[test]
	fn ceiling_can_be_disabled() {
		let decision = RelevanceGate::new(None).decide(
			&item(),
			5.0,
			&query(&["frontend", "styling", "layouts"], false),
			1.0,
		);

		assert!(!decision.accepted);
	}

	#[test]
	fn abstract_query_is_accepted_on_score() {
		let decision = gate().decide(&item(), 0.31, &query(&["grow", "career"], true), 0.3);

		assert!(decision.accepted);
		assert_eq!(decision.reason, GateReason::ScoreOnly);
	}

	#[test]
	fn strong_keywords_keep_short_tech_terms() {
		let tokens = ["r", "x", "advanced", "statistics", "r"]
			.iter()
			.map(|token| token.to_string())
			.collect::<Vec<_>>();

		assert_eq!(strong_keywords(&tokens), vec!["r", "statistics"]);
	}

	#[test]
	fn must_exist_terms_are_tech_terms_only() {
		let keywords = vec!["c++".to_string(), "leadership".to_string(), "games".to_string()];

		assert_eq!(must_exist_terms(&keywords), vec!["c++"]);
	}

	#[test]
	fn expansions_are_not_required_terms() {
		let query = GateQuery::from_normalized(&QueryNormalizer::default().normalize("js"));

		assert!(query.keywords.contains(&"javascript".to_string()));
		assert!(!query.required.contains(&"javascript".to_string()));
	}
}
