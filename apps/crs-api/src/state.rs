use std::sync::Arc;

use crs_config::Config;
use crs_service::{Providers, Recommender};

#[derive(Clone)]
pub struct AppState {
	pub recommender: Arc<Recommender>,
}
impl AppState {
	/// HTTP providers from the config; the index loads on first use.
	pub fn new(config: Config) -> Self {
		Self::from_recommender(Recommender::new(config, Providers::default()))
	}

	pub fn from_recommender(recommender: Recommender) -> Self {
		Self { recommender: Arc::new(recommender) }
	}

	/// Loads the index before the first request. A failure is logged and later reported in
	/// every response.
	pub async fn warm_up(&self) {
		match self.recommender.catalog().await {
			Ok(catalog) => tracing::info!(
				rows = catalog.len(),
				catalog_hash = %catalog.catalog_hash(),
				"Index ready."
			),
			Err(err) => tracing::warn!(error = %err, "Serving without an index."),
		}
	}
}
