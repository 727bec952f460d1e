use crs_service::{Error, RecommendFilters, RecommendRequest};

use crate::acceptance::{default_recommender, filtered, request};

fn invalid_fields(result: crs_service::Result<crs_service::RecommendResponse>) -> Vec<String> {
	match result {
		Err(Error::InvalidRequest { fields, .. }) => fields,
		other => panic!("Expected an invalid request error, got {other:?}."),
	}
}

#[tokio::test]
async fn rejects_blank_queries() {
	let recommender = default_recommender();

	for query in ["", "   ", "\n\t"] {
		assert_eq!(invalid_fields(recommender.recommend(request(query)).await), vec!["query"]);
	}
}

#[tokio::test]
async fn rejects_top_k_outside_configured_bounds() {
	let recommender = default_recommender();
	let max = recommender.cfg.retrieval.max_top_k;

	for top_k in [0, max + 1] {
		let req = RecommendRequest { top_k: Some(top_k), ..request("python") };

		assert_eq!(invalid_fields(recommender.recommend(req).await), vec!["top_k"]);
	}

	let at_max = RecommendRequest { top_k: Some(max), ..request("python") };

	assert!(recommender.recommend(at_max).await.is_ok());
}

#[tokio::test]
async fn rejects_negative_or_non_finite_duration() {
	let recommender = default_recommender();

	for max_duration_hours in [-1.0, f32::NAN, f32::INFINITY] {
		let filters =
			RecommendFilters { max_duration_hours: Some(max_duration_hours), ..Default::default() };

		assert_eq!(invalid_fields(recommender.recommend(filtered("python", filters)).await), vec![
			"filters.max_duration_hours"
		]);
	}
}
