use std::sync::Arc;

use crs_service::RecommendRequest;
use crs_testkit::{FailingReranker, ScriptedReranker};

use crate::acceptance::{config, recommend, recommender, request, titles};

fn scripted() -> Arc<ScriptedReranker> {
	Arc::new(ScriptedReranker::new([
		("Advanced Python Patterns", 0.9),
		("Data Analysis with Python and Pandas", 0.5),
		("Python for Beginners", 0.1),
	]))
}

fn reranked(query: &str) -> RecommendRequest {
	RecommendRequest { enable_reranking: true, ..request(query) }
}

#[tokio::test]
async fn reranker_scores_reorder_results() {
	let recommender = recommender(config(), scripted());
	let response = recommend(&recommender, reranked("python")).await;

	assert_eq!(titles(&response), vec![
		"Advanced Python Patterns",
		"Data Analysis with Python and Pandas",
		"Python for Beginners",
	]);
	assert_eq!(response.results.iter().map(|result| result.rank).collect::<Vec<_>>(), vec![
		10, 5, 1
	]);
	assert_eq!(response.results[0].why.first().map(String::as_str), Some("Reranker: 0.90"));
	assert_eq!(response.results[0].score, 0.9);
}

#[tokio::test]
async fn reranking_is_opt_in_per_request() {
	let plain = recommend(&recommender(config(), Arc::new(FailingReranker)), request("python")).await;
	let unrequested = recommend(&recommender(config(), scripted()), request("python")).await;

	assert_eq!(titles(&unrequested), titles(&plain));
	assert!(unrequested.results.iter().all(|result| !result.why[0].starts_with("Reranker")));
}

#[tokio::test]
async fn disabled_provider_keeps_retrieval_order() {
	let mut cfg = config();

	cfg.providers.rerank.enabled = false;

	let plain = recommend(&recommender(config(), scripted()), request("python")).await;
	let disabled = recommend(&recommender(cfg, scripted()), reranked("python")).await;

	assert_eq!(titles(&disabled), titles(&plain));
}

#[tokio::test]
async fn rerank_failure_keeps_retrieval_order_and_scores() {
	let plain = recommend(&recommender(config(), scripted()), request("python")).await;
	let failed =
		recommend(&recommender(config(), Arc::new(FailingReranker)), reranked("python")).await;

	assert_eq!(titles(&failed), titles(&plain));
	assert_eq!(
		failed.results.iter().map(|result| result.score).collect::<Vec<_>>(),
		plain.results.iter().map(|result| result.score).collect::<Vec<_>>()
	);
}
