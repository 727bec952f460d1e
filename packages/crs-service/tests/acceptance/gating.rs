use std::sync::Arc;

use crs_domain::{CatalogItem, Level};
use crs_service::{RecommendFilters, Recommender};
use crs_testkit::{FailingReranker, hash_index, hash_providers};

use crate::acceptance::{
	config, default_recommender, filtered, recommend, recommender, request, titles,
};

#[tokio::test]
async fn short_query_only_returns_courses_that_mention_it() {
	let recommender = default_recommender();
	let response = recommend(&recommender, request("python")).await;
	let mut found = titles(&response);

	found.sort_unstable();

	assert_eq!(found, vec![
		"Advanced Python Patterns",
		"Data Analysis with Python and Pandas",
		"Python for Beginners",
	]);
	assert!(response.results.iter().all(|result| result.matched_keywords == vec!["python"]));
	assert_eq!(response.total_found, 3);
	assert!(response.debug_info.is_short_query);
	assert!(!response.debug_info.relaxed);
}

#[tokio::test]
async fn absent_technologies_are_blocked_before_retrieval() {
	let recommender = default_recommender();

	for (query, topic) in [("c++", "c++"), ("Learn Rust", "rust")] {
		let response = recommend(&recommender, request(query)).await;

		assert!(response.results.is_empty(), "{query} returned results.");
		assert!(response.is_blocked());
		assert_eq!(
			response.debug_info.blocked_reason.as_deref(),
			Some(format!("Topic '{topic}' not found in catalog.").as_str())
		);
		assert_eq!(response.debug_info.candidates_retrieved, 0);
	}
}

#[tokio::test]
async fn prefix_of_a_longer_word_is_not_evidence() {
	let recommender = default_recommender();
	let response = recommend(&recommender, request("java")).await;

	assert!(!response.is_blocked());
	assert!(response.results.is_empty());
	assert!(response.debug_info.candidates_retrieved > 0);
}

#[tokio::test]
async fn abbreviation_query_reaches_the_expanded_course() {
	let recommender = default_recommender();
	let response = recommend(&recommender, request("NLP")).await;

	assert_eq!(response.debug_info.normalized_query, "nlp natural language processing");
	assert!(!response.debug_info.is_short_query);
	assert_eq!(
		titles(&response).first().copied(),
		Some("Natural Language Processing (NLP) Fundamentals")
	);
	assert!(response.results[0].matched_keywords.iter().any(|keyword| keyword == "nlp"));
}

#[tokio::test]
async fn ranks_span_one_to_ten_and_follow_scores() {
	let recommender = default_recommender();
	let response = recommend(&recommender, request("python")).await;
	let results = &response.results;

	assert!(results.len() >= 2);
	assert!(results.iter().all(|result| (1..=10).contains(&result.rank)));
	assert!(results.windows(2).all(|pair| pair[0].score >= pair[1].score));
	assert!(results.windows(2).all(|pair| pair[0].rank >= pair[1].rank));
	assert_eq!(results.first().map(|result| result.rank), Some(10));
	assert_eq!(results.last().map(|result| result.rank), Some(1));
}

#[tokio::test]
async fn long_query_relaxes_threshold_when_too_few_pass() {
	let mut cfg = config();

	cfg.gating.threshold_general = 0.99;
	cfg.gating.threshold_relaxed = 0.0;

	let recommender = recommender(cfg, Arc::new(FailingReranker));
	let response = recommend(&recommender, request("python pandas data analysis")).await;

	assert!(response.debug_info.relaxed);
	assert_eq!(response.debug_info.threshold_used, Some(0.0));
	assert_eq!(titles(&response).first().copied(), Some("Data Analysis with Python and Pandas"));
	assert!(response.results.iter().all(|result| !result.matched_keywords.is_empty()));
}

#[tokio::test]
async fn relaxation_is_skipped_when_it_would_not_lower_the_threshold() {
	let mut cfg = config();

	cfg.gating.threshold_general = 0.99;
	cfg.gating.threshold_relaxed = 0.99;

	let recommender = recommender(cfg, Arc::new(FailingReranker));
	let response = recommend(&recommender, request("python pandas data analysis")).await;

	assert!(response.results.is_empty());
	assert!(!response.debug_info.relaxed);
	assert_eq!(response.debug_info.threshold_used, Some(0.99));
}

#[tokio::test]
async fn short_query_never_relaxes() {
	let mut cfg = config();

	cfg.gating.threshold_general = 0.99;
	cfg.gating.threshold_relaxed = 0.0;

	let recommender = recommender(cfg, Arc::new(FailingReranker));
	let response = recommend(&recommender, request("python")).await;

	assert!(response.results.is_empty());
	assert!(!response.debug_info.relaxed);
	assert_eq!(response.debug_info.threshold_used, Some(0.99));
}

#[tokio::test]
async fn filters_narrow_gated_candidates() {
	let recommender = default_recommender();
	let beginner = RecommendFilters { level: Some("beginner".to_string()), ..Default::default() };
	let quick = RecommendFilters { max_duration_hours: Some(12.0), ..Default::default() };
	let data = RecommendFilters { category: Some("DATA SCIENCE".to_string()), ..Default::default() };
	let any = RecommendFilters { category: Some("any".to_string()), ..Default::default() };

	assert_eq!(titles(&recommend(&recommender, filtered("python", beginner)).await), vec![
		"Python for Beginners"
	]);
	assert_eq!(titles(&recommend(&recommender, filtered("python", quick)).await), vec![
		"Python for Beginners"
	]);
	assert_eq!(titles(&recommend(&recommender, filtered("python", data)).await), vec![
		"Data Analysis with Python and Pandas"
	]);
	assert_eq!(recommend(&recommender, filtered("python", any)).await.total_found, 3);
}

#[tokio::test]
async fn top_k_truncates_results() {
	let recommender = default_recommender();
	let req = crs_service::RecommendRequest { top_k: Some(2), ..request("python") };
	let response = recommend(&recommender, req).await;

	assert_eq!(response.results.len(), 2);
	assert_eq!(response.total_found, 2);
	assert_eq!(response.debug_info.candidates_gated, 3);
}

#[tokio::test]
async fn stopword_only_query_is_an_empty_success() {
	let recommender = default_recommender();
	let response = recommend(&recommender, request("I want to learn")).await;

	assert!(response.results.is_empty());
	assert!(!response.is_blocked());
	assert!(response.debug_info.error.is_none());
	assert_eq!(response.debug_info.normalized_query, "");
}

#[tokio::test]
async fn results_carry_presentation_fields() {
	let recommender = default_recommender();
	let response = recommend(&recommender, request("python for beginners")).await;
	let beginner = response
		.results
		.iter()
		.find(|result| result.title == "Python for Beginners")
		.expect("Beginner course missing.");

	assert_eq!(beginner.url, "https://courses.test/course/1");
	assert_eq!(beginner.level, "Beginner");
	assert_eq!(beginner.category, "Programming");
	assert!(beginner.desc_snippet.starts_with("Learn Python programming"));
	assert!(beginner.why.iter().any(|reason| reason == "Matched keywords: python"));
	assert!(beginner.why.iter().any(|reason| reason == "Suitable for beginners"));
	assert!(beginner.why.len() <= 4);
}

#[tokio::test]
async fn abbreviation_expansion_does_not_block_a_topic_the_catalog_names() {
	let item = CatalogItem {
		id: "1".to_string(),
		title: "JS Fundamentals".to_string(),
		category: "Web Development".to_string(),
		level: Level::Beginner,
		duration_hours: 6.0,
		skills: vec!["JS".to_string()],
		description: "Variables, functions and events in JS.".to_string(),
		instructor: String::new(),
		url: None,
	};
	let index = hash_index(vec![item]).expect("Failed to build index.");
	let recommender = Recommender::with_index(config(), hash_providers(), index);
	let response = recommend(&recommender, request("js")).await;

	assert_eq!(response.debug_info.normalized_query, "js javascript");
	assert!(!response.is_blocked());
	assert_eq!(titles(&response), vec!["JS Fundamentals"]);
}
