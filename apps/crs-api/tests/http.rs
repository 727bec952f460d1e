use axum::{
	Router,
	body::{self, Body},
	http::{Request, StatusCode},
};
use serde_json::{Value, json};
use tower::util::ServiceExt;

use crs_api::{routes, state::AppState};
use crs_service::Recommender;

fn sample_app() -> Router {
	let cfg = crs_testkit::test_config().expect("Failed to parse test config.");
	let recommender = crs_testkit::sample_recommender(cfg, crs_testkit::hash_providers())
		.expect("Failed to build sample index.");

	routes::router(AppState::from_recommender(recommender))
}

async fn post_json(app: Router, uri: &str, payload: Value) -> (StatusCode, Value) {
	let request = Request::builder()
		.method("POST")
		.uri(uri)
		.header("content-type", "application/json")
		.body(Body::from(payload.to_string()))
		.expect("Failed to build request.");
	let response = app.oneshot(request).await.expect("Failed to call router.");
	let status = response.status();
	let bytes =
		body::to_bytes(response.into_body(), usize::MAX).await.expect("Failed to read body.");
	let body = serde_json::from_slice(&bytes).expect("Response is not JSON.");

	(status, body)
}

#[tokio::test]
async fn health_ok() {
	let request =
		Request::builder().uri("/health").body(Body::empty()).expect("Failed to build request.");
	let response = sample_app().oneshot(request).await.expect("Failed to call router.");

	assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn recommend_returns_ranked_results() {
	let (status, body) =
		post_json(sample_app(), "/v1/recommend", json!({ "query": "python", "top_k": 2 })).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["total_found"], 2);
	assert_eq!(body["debug_info"]["scoring"], "semantic");
	assert_eq!(body["debug_info"]["normalized_query"], "python");
	assert_eq!(body["results"][0]["rank"], 10);
	assert!(body["debug_info"].get("blocked_reason").is_none());
}

#[tokio::test]
async fn blocked_topic_is_a_successful_empty_response() {
	let (status, body) = post_json(sample_app(), "/v1/recommend", json!({ "query": "c++" })).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["total_found"], 0);
	assert_eq!(body["debug_info"]["blocked_reason"], "Topic 'c++' not found in catalog.");
}

#[tokio::test]
async fn blank_query_is_a_bad_request() {
	let (status, body) = post_json(sample_app(), "/v1/recommend", json!({ "query": "  " })).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["error_code"], "invalid_request");
	assert_eq!(body["fields"], json!(["query"]));
}

#[tokio::test]
async fn oversized_top_k_is_a_bad_request() {
	let (status, body) =
		post_json(sample_app(), "/v1/recommend", json!({ "query": "python", "top_k": 500 })).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["fields"], json!(["top_k"]));
}

#[tokio::test]
async fn wrongly_typed_fields_use_the_error_body() {
	for (uri, payload) in [
		("/v1/recommend", json!({ "query": "python", "top_k": -1 })),
		("/v1/recommend/role", json!({ "role": 7 })),
	] {
		let (status, body) = post_json(sample_app(), uri, payload).await;

		assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
		assert_eq!(body["error_code"], "invalid_request");
		assert!(body["message"].as_str().is_some_and(|message| !message.is_empty()));
	}
}

#[tokio::test]
async fn role_endpoint_reports_applied_filters() {
	let (status, body) =
		post_json(sample_app(), "/v1/recommend/role", json!({ "role": "Data Analyst" })).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["role"], "Data Analyst");
	assert_eq!(body["top_k"], 5);
	assert_eq!(body["applied_filters"]["allowed_categories"][0], "Data");
	assert!(body["results"].as_array().is_some_and(|results| !results.is_empty()));
}

#[tokio::test]
async fn missing_index_surfaces_in_debug_info() {
	let cfg = crs_testkit::test_config().expect("Failed to parse test config.");
	let app = routes::router(AppState::from_recommender(Recommender::new(
		cfg,
		crs_testkit::hash_providers(),
	)));
	let (status, body) = post_json(app, "/v1/recommend", json!({ "query": "python" })).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["total_found"], 0);
	assert!(
		body["debug_info"]["error"]
			.as_str()
			.is_some_and(|error| error.contains("Index unavailable"))
	);
}
