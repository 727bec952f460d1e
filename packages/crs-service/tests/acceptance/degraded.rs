use std::sync::Arc;

use crs_service::{Providers, Recommender, Scoring};
use crs_testkit::{FailingEmbedder, FailingReranker};

use crate::acceptance::{config, recommend, request, titles};

#[tokio::test]
async fn embedding_outage_falls_back_to_keyword_scoring() {
	let providers = Providers::new(Arc::new(FailingEmbedder), Arc::new(FailingReranker));
	let recommender =
		crs_testkit::sample_recommender(config(), providers).expect("Failed to build sample index.");
	let response = recommend(&recommender, request("python")).await;
	let mut found = titles(&response);

	found.sort_unstable();

	assert_eq!(response.debug_info.scoring, Scoring::Keyword);
	assert_eq!(response.debug_info.threshold_used, Some(1.0));
	assert_eq!(found, vec![
		"Advanced Python Patterns",
		"Data Analysis with Python and Pandas",
		"Python for Beginners",
	]);
	assert!(response.results.iter().all(|result| result.rank == 5));
	assert!(
		response
			.results
			.iter()
			.all(|result| result.why.last().map(String::as_str) == Some("Keyword match"))
	);
}

#[tokio::test]
async fn keyword_scoring_still_blocks_absent_topics() {
	let providers = Providers::new(Arc::new(FailingEmbedder), Arc::new(FailingReranker));
	let recommender =
		crs_testkit::sample_recommender(config(), providers).expect("Failed to build sample index.");
	let response = recommend(&recommender, request("rust")).await;

	assert!(response.is_blocked());
}

#[tokio::test]
async fn missing_index_is_reported_not_raised() {
	let recommender = Recommender::new(config(), crs_testkit::hash_providers());
	let first = recommend(&recommender, request("python")).await;
	let second = recommend(&recommender, request("sql")).await;

	for response in [&first, &second] {
		assert!(response.results.is_empty());
		assert_eq!(response.total_found, 0);
		assert!(
			response
				.debug_info
				.error
				.as_deref()
				.is_some_and(|error| error.starts_with("Index unavailable: "))
		);
	}

	assert!(recommender.catalog().await.is_err());
}
