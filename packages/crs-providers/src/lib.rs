pub mod embedding;
pub mod rerank;

mod error;

pub use error::{Error, Result};

use std::time::Duration;

use reqwest::{
	Client,
	header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue},
};
use serde_json::{Map, Value};

/// Bearer auth plus configured default headers. An empty key sends no `Authorization`, which
/// local model servers expect.
pub fn auth_headers(api_key: &str, default_headers: &Map<String, Value>) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	if !api_key.is_empty() {
		headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {api_key}"))?);
	}

	for (key, value) in default_headers {
		let Some(raw) = value.as_str() else {
			return Err(Error::InvalidConfig {
				message: format!("Default header {key} must be a string."),
			});
		};

		headers.insert(HeaderName::from_bytes(key.as_bytes())?, HeaderValue::from_str(raw)?);
	}

	Ok(headers)
}

pub fn http_client(timeout_ms: u64) -> Result<Client> {
	Ok(Client::builder().timeout(Duration::from_millis(timeout_ms)).build()?)
}
