use std::{fmt::Write, path::PathBuf};

use clap::Parser;

use crs_service::{Providers, RecommendFilters, RecommendRequest, RecommendResponse, Recommender};

#[derive(Debug, Parser)]
#[command(
	version = crs_cli::VERSION,
	rename_all = "kebab",
	styles = crs_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	/// English or Arabic free text.
	#[arg(value_name = "QUERY")]
	pub query: String,
	#[arg(long, value_name = "N")]
	pub top_k: Option<u32>,
	/// Re-score the leading candidates with the rerank provider.
	#[arg(long)]
	pub rerank: bool,
	#[arg(long, value_name = "CATEGORY")]
	pub category: Option<String>,
	#[arg(long, value_name = "LEVEL")]
	pub level: Option<String>,
	#[arg(long, value_name = "HOURS")]
	pub max_duration_hours: Option<f32>,
	/// Print the full response as JSON.
	#[arg(long)]
	pub json: bool,
}
impl Args {
	pub fn request(&self) -> RecommendRequest {
		let filters = RecommendFilters {
			category: self.category.clone(),
			level: self.level.clone(),
			max_duration_hours: self.max_duration_hours,
		};

		RecommendRequest {
			query: self.query.clone(),
			top_k: self.top_k,
			filters: (!filters.is_empty()).then_some(filters),
			enable_reranking: self.rerank,
		}
	}
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = crs_config::load(&args.config)?;

	crs_cli::init_tracing(&config.service.log_level);

	let recommender = Recommender::new(config, Providers::default());
	let response = recommender.recommend(args.request()).await?;

	if args.json {
		println!("{}", serde_json::to_string_pretty(&response)?);
	} else {
		print!("{}", render(&response));
	}

	Ok(())
}

/// Plain-text listing: one block per result, then a one-line summary.
pub fn render(response: &RecommendResponse) -> String {
	let debug = &response.debug_info;
	let mut out = String::new();

	if let Some(error) = &debug.error {
		let _ = writeln!(out, "{error}");
	}
	if let Some(reason) = &debug.blocked_reason {
		let _ = writeln!(out, "{reason}");
	}

	for (position, result) in response.results.iter().enumerate() {
		let _ = writeln!(
			out,
			"{}. [{}/10] {} ({}, {})",
			position + 1,
			result.rank,
			result.title,
			result.category,
			result.level
		);
		let _ = writeln!(out, "   {}", result.url);

		if !result.why.is_empty() {
			let _ = writeln!(out, "   {}", result.why.join("; "));
		}
	}

	let _ = writeln!(
		out,
		"{} result(s) for \"{}\" ({} scoring, {:.3}s)",
		response.total_found,
		debug.normalized_query,
		debug.scoring.as_str(),
		debug.time_taken
	);

	out
}
