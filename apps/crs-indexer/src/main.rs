use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = crs_indexer::Args::parse();

	crs_indexer::run(args).await
}
