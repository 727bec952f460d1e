use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = crs_query::Args::parse();

	crs_query::run(args).await
}
