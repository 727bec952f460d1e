use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = crs_api::Args::parse();

	crs_api::run(args).await
}
