use clap::builder::{
	Styles,
	styling::{AnsiColor, Effects},
};
use tracing_subscriber::EnvFilter;

pub const VERSION: &str = concat!(
	env!("CARGO_PKG_VERSION"),
	"-",
	env!("VERGEN_GIT_SHA"),
	"-",
	env!("VERGEN_CARGO_TARGET_TRIPLE"),
);

pub fn styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Cyan.on_default() | Effects::BOLD)
		.usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
		.literal(AnsiColor::Green.on_default() | Effects::BOLD)
		.placeholder(AnsiColor::Yellow.on_default())
}

/// Installs the global fmt subscriber. `RUST_LOG` wins over the configured level; an
/// unparsable level falls back to `info`.
pub fn init_tracing(log_level: &str) {
	let filter = EnvFilter::try_from_default_env()
		.or_else(|_| EnvFilter::try_new(log_level))
		.unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}
