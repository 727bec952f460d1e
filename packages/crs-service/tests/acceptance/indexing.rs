use std::{fs, sync::Arc};

use crs_index::artifacts;
use crs_service::{
	Error, Providers, Recommender,
	indexing::{self, Freshness},
};
use crs_testkit::{FailingEmbedder, FailingReranker, HASH_MODEL};

use crate::acceptance::{config, recommend, request, titles};

#[tokio::test]
async fn built_index_round_trips_through_disk() {
	let dir = crs_testkit::temp_dir("crs_service_index").expect("Failed to create temp dir.");
	let mut cfg = config();
	let items = crs_testkit::sample_catalog();
	let index = indexing::build_index(&cfg, &crs_testkit::hash_providers(), items.clone())
		.await
		.expect("Failed to build index.");

	assert_eq!(index.len(), items.len());
	assert_eq!(index.manifest().embedding_model, HASH_MODEL);
	assert_eq!(
		index.abbreviations().get("nlp").map(String::as_str),
		Some("natural language processing")
	);

	index.write(dir.path()).expect("Failed to write index.");

	cfg.index.artifacts_dir = dir.path().to_path_buf();

	let from_disk = Recommender::new(cfg, crs_testkit::hash_providers());
	let in_memory = crate::acceptance::default_recommender();
	let loaded = recommend(&from_disk, request("python")).await;
	let expected = recommend(&in_memory, request("python")).await;

	assert!(loaded.debug_info.error.is_none());
	assert_eq!(titles(&loaded), titles(&expected));
	assert_eq!(
		from_disk.catalog().await.expect("Index not loaded.").catalog_hash(),
		index.catalog_hash()
	);
}

#[tokio::test]
async fn freshness_tracks_catalog_and_model() {
	let dir = crs_testkit::temp_dir("crs_service_freshness").expect("Failed to create temp dir.");
	let cfg = config();
	let items = crs_testkit::sample_catalog();

	assert!(matches!(
		indexing::check_freshness(dir.path(), &items, HASH_MODEL),
		Freshness::Stale { .. }
	));

	indexing::build_index(&cfg, &crs_testkit::hash_providers(), items.clone())
		.await
		.expect("Failed to build index.")
		.write(dir.path())
		.expect("Failed to write index.");

	let mut edited = items.clone();

	edited[0].title = "Python for Absolute Beginners".to_string();

	assert_eq!(indexing::check_freshness(dir.path(), &items, HASH_MODEL), Freshness::Current);
	assert!(matches!(
		indexing::check_freshness(dir.path(), &edited, HASH_MODEL),
		Freshness::Stale { .. }
	));
	assert!(matches!(
		indexing::check_freshness(dir.path(), &items, "another-model"),
		Freshness::Stale { .. }
	));
}

#[tokio::test]
async fn embedding_failure_aborts_the_build() {
	let providers = Providers::new(Arc::new(FailingEmbedder), Arc::new(FailingReranker));
	let result = indexing::build_index(&config(), &providers, crs_testkit::sample_catalog()).await;

	assert!(matches!(result, Err(Error::Provider { .. })));
}

#[tokio::test]
async fn damaged_artifacts_make_the_index_unavailable() {
	let dir = crs_testkit::temp_dir("crs_service_damaged").expect("Failed to create temp dir.");
	let mut cfg = config();

	crs_testkit::hash_index(crs_testkit::sample_catalog())
		.expect("Failed to build index.")
		.write(dir.path())
		.expect("Failed to write index.");

	let vectors_path = dir.path().join(artifacts::VECTORS_FILE);
	let vectors = fs::read(&vectors_path).expect("Failed to read vectors.");

	fs::write(&vectors_path, &vectors[..vectors.len() - 4]).expect("Failed to truncate vectors.");

	cfg.index.artifacts_dir = dir.path().to_path_buf();

	let recommender = Recommender::new(cfg, crs_testkit::hash_providers());
	let response = recommend(&recommender, request("python")).await;

	assert!(response.results.is_empty());
	assert!(response.debug_info.error.is_some());
}
