use std::sync::Arc;

use crs_service::{AppliedFilters, Error, RoleRequest, roles};
use crs_testkit::FailingReranker;

use crate::acceptance::{config, default_recommender, recommender};

fn role(name: &str) -> RoleRequest {
	RoleRequest { role: name.to_string(), ..Default::default() }
}

#[tokio::test]
async fn preset_role_keeps_courses_in_allowed_categories() {
	let recommender = default_recommender();
	let response =
		recommender.recommend_role(role("Data Analyst")).await.expect("Role request failed.");
	let mut found = response.results.iter().map(|result| result.title.as_str()).collect::<Vec<_>>();
	let preset = roles::preset("data analyst").expect("Preset missing.");

	found.sort_unstable();

	assert_eq!(found, vec!["Data Analysis with Python and Pandas", "SQL for Data Analysts"]);
	assert_eq!(response.top_k, 5);
	assert_eq!(response.filtered_out, 0);
	assert_eq!(response.applied_filters.allowed_categories.len(), preset.allowed_categories.len());
	assert_eq!(response.applied_filters.exclude_keywords, preset.exclude_keywords);
}

#[tokio::test]
async fn request_exclusions_override_the_preset() {
	let recommender = recommender(config(), Arc::new(FailingReranker));
	let req = RoleRequest { exclude_keywords: Some(vec!["SQL".to_string()]), ..role("Data Analyst") };
	let response = recommender.recommend_role(req).await.expect("Role request failed.");

	assert_eq!(
		response.results.iter().map(|result| result.title.as_str()).collect::<Vec<_>>(),
		vec!["Data Analysis with Python and Pandas"]
	);
	assert_eq!(response.filtered_out, 1);
	assert_eq!(response.applied_filters.exclude_keywords, vec!["SQL"]);
}

#[tokio::test]
async fn unknown_role_applies_no_filters() {
	let recommender = default_recommender();
	let response =
		recommender.recommend_role(role("Astronaut")).await.expect("Role request failed.");

	assert_eq!(response.applied_filters, AppliedFilters::default());
	assert!(response.results.is_empty());
	assert_eq!(response.filtered_out, 0);
}

#[tokio::test]
async fn role_requests_are_validated() {
	let recommender = default_recommender();
	let blank = recommender.recommend_role(role("  ")).await;
	let oversized =
		recommender.recommend_role(RoleRequest { top_k: Some(0), ..role("ML Engineer") }).await;

	assert!(matches!(blank, Err(Error::InvalidRequest { fields, .. }) if fields == vec!["role"]));
	assert!(matches!(oversized, Err(Error::InvalidRequest { fields, .. }) if fields == vec!["top_k"]));
}
