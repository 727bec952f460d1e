use crs_domain::{CatalogItem, GateReason, Level, NormalizedQuery, matcher};

use crate::recommend::{Candidate, Scoring};

const MAX_REASONS: usize = 4;
const MAX_SKILLS: usize = 2;

/// Human-readable reasons for one recommendation, most specific first.
pub fn reasons(
	item: &CatalogItem,
	candidate: &Candidate,
	query: &NormalizedQuery,
	scoring: Scoring,
) -> Vec<String> {
	let mut why = Vec::new();

	if let Some(score) = candidate.rerank_score {
		why.push(format!("Reranker: {score:.2}"));
	}
	if !candidate.matched_keywords.is_empty() {
		why.push(format!("Matched keywords: {}", candidate.matched_keywords.join(", ")));

		let skills = matching_skills(item, &candidate.matched_keywords);

		if !skills.is_empty() {
			why.push(format!("Matches skills: {}", skills.join(", ")));
		}
	}

	let wants = |word: &str| query.tokens.iter().any(|token| token == word);

	if item.level == Level::Beginner && (wants("beginner") || wants("beginners")) {
		why.push("Suitable for beginners".to_string());
	} else if item.level == Level::Advanced && wants("advanced") {
		why.push("Advanced level content".to_string());
	}

	if scoring == Scoring::Keyword {
		why.push("Keyword match".to_string());
	} else if candidate.reason == GateReason::SemanticCeiling {
		why.push("Semantic match".to_string());
	}

	if why.is_empty() && !item.category.trim().is_empty() {
		why.push(format!("Related to: {}", item.category.trim()));
	}

	why.truncate(MAX_REASONS);

	why
}

fn matching_skills<'a>(item: &'a CatalogItem, keywords: &[String]) -> Vec<&'a str> {
	item.skills
		.iter()
		.filter(|skill| keywords.iter().any(|keyword| matcher::keyword_matches(skill, keyword)))
		.map(String::as_str)
		.take(MAX_SKILLS)
		.collect()
}
