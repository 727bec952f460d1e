use serde::{Deserialize, Serialize};

use crate::{Error, RecommendRequest, Recommendation, Recommender, Result};

const DEFAULT_ROLE_TOP_K: u32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RolePreset {
	pub role: &'static str,
	pub allowed_categories: &'static [&'static str],
	pub exclude_keywords: &'static [&'static str],
}

pub const ROLE_PRESETS: &[RolePreset] = &[
	RolePreset {
		role: "Data Analyst",
		allowed_categories: &[
			"Data",
			"Analytics",
			"Business",
			"SQL",
			"Python",
			"Excel",
			"Power BI",
			"Visualization",
		],
		exclude_keywords: &[
			"php", "unity", "game", "laravel", "wordpress", "frontend", "react", "nodejs",
		],
	},
	RolePreset {
		role: "ML Engineer",
		allowed_categories: &[
			"Machine Learning",
			"Deep Learning",
			"AI",
			"Python",
			"Data",
			"MLOps",
			"NLP",
			"Computer Vision",
		],
		exclude_keywords: &["unity", "game", "php", "wordpress"],
	},
	RolePreset {
		role: "Software Engineer",
		allowed_categories: &[
			"Programming",
			"Backend",
			"Algorithms",
			"Databases",
			"System Design",
			"DevOps",
		],
		exclude_keywords: &["unity", "game design"],
	},
];

pub fn preset(role: &str) -> Option<&'static RolePreset> {
	ROLE_PRESETS.iter().find(|preset| preset.role.eq_ignore_ascii_case(role.trim()))
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct RoleRequest {
	pub role: String,
	#[serde(default)]
	pub top_k: Option<u32>,
	#[serde(default)]
	pub allowed_categories: Option<Vec<String>>,
	#[serde(default)]
	pub exclude_keywords: Option<Vec<String>>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AppliedFilters {
	pub allowed_categories: Vec<String>,
	pub exclude_keywords: Vec<String>,
}
impl AppliedFilters {
	/// Request values win; otherwise the role's preset, if any.
	fn resolve(req: &RoleRequest) -> Self {
		let preset = preset(&req.role);
		let from_preset = |values: &[&str]| values.iter().map(|value| value.to_string()).collect();

		Self {
			allowed_categories: req.allowed_categories.clone().unwrap_or_else(|| {
				preset.map(|preset| from_preset(preset.allowed_categories)).unwrap_or_default()
			}),
			exclude_keywords: req.exclude_keywords.clone().unwrap_or_else(|| {
				preset.map(|preset| from_preset(preset.exclude_keywords)).unwrap_or_default()
			}),
		}
	}

	/// Drops results whose title or category contains an excluded keyword, then, when allowed
	/// categories are set, keeps only results whose category contains one of them.
	pub fn apply(&self, results: Vec<Recommendation>) -> Vec<Recommendation> {
		let allowed = normalized(&self.allowed_categories);
		let excluded = normalized(&self.exclude_keywords);

		results
			.into_iter()
			.filter(|result| {
				let title = result.title.trim().to_lowercase();
				let category = result.category.trim().to_lowercase();

				if excluded.iter().any(|keyword| title.contains(keyword) || category.contains(keyword))
				{
					return false;
				}

				allowed.is_empty() || allowed.iter().any(|allowed| category.contains(allowed))
			})
			.collect()
	}
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RoleResponse {
	pub role: String,
	pub top_k: usize,
	pub results: Vec<Recommendation>,
	pub filtered_out: usize,
	pub applied_filters: AppliedFilters,
}

impl Recommender {
	/// Recommendations for a job role: the role name is the query, results are taken from a
	/// wide, reranked pass and then narrowed by category rules.
	pub async fn recommend_role(&self, req: RoleRequest) -> Result<RoleResponse> {
		if req.role.trim().is_empty() {
			return Err(Error::invalid("role", "role must be non-empty."));
		}

		let top_k = self.top_k(Some(req.top_k.unwrap_or(DEFAULT_ROLE_TOP_K)), "top_k")?;
		let applied_filters = AppliedFilters::resolve(&req);
		let response = self
			.recommend(RecommendRequest {
				query: req.role.clone(),
				top_k: Some(self.cfg.retrieval.max_top_k),
				filters: None,
				enable_reranking: true,
			})
			.await?;
		let retrieved = response.results.len();
		let mut results = applied_filters.apply(response.results);
		let filtered_out = retrieved - results.len();

		results.truncate(top_k);

		tracing::info!(
			role = %req.role,
			retrieved,
			filtered_out,
			returned = results.len(),
			"Role recommendation completed."
		);

		Ok(RoleResponse { role: req.role, top_k, results, filtered_out, applied_filters })
	}
}

fn normalized(values: &[String]) -> Vec<String> {
	values
		.iter()
		.map(|value| value.trim().to_lowercase())
		.filter(|value| !value.is_empty())
		.collect()
}
