use crate::acceptance::{default_recommender, recommend, request, titles};

#[tokio::test]
async fn arabic_query_matches_its_english_counterpart() {
	let recommender = default_recommender();
	let arabic = recommend(&recommender, request("عاوز كورس بايثون")).await;
	let english = recommend(&recommender, request("Python")).await;

	assert!(arabic.debug_info.is_arabic);
	assert!(!english.debug_info.is_arabic);
	assert_eq!(arabic.debug_info.normalized_query, "python");
	assert_eq!(arabic.debug_info.original_query, "عاوز كورس بايثون");
	assert!(!arabic.results.is_empty());
	assert_eq!(titles(&arabic).first(), titles(&english).first());
}

#[tokio::test]
async fn arabic_queries_use_the_arabic_threshold() {
	let recommender = default_recommender();
	let arabic = recommend(&recommender, request("بايثون")).await;
	let english = recommend(&recommender, request("python")).await;

	assert_eq!(arabic.debug_info.threshold_used, Some(recommender.cfg.gating.threshold_arabic));
	assert_eq!(english.debug_info.threshold_used, Some(recommender.cfg.gating.threshold_general));
}

#[tokio::test]
async fn diacritics_and_tatweel_do_not_change_the_query() {
	let recommender = default_recommender();
	let plain = recommend(&recommender, request("بايثون")).await;
	let decorated = recommend(&recommender, request("بايـــثُون")).await;

	assert_eq!(decorated.debug_info.normalized_query, plain.debug_info.normalized_query);
	assert_eq!(titles(&decorated), titles(&plain));
}
