use std::path::PathBuf;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Failed to access index artifact at {path:?}.")]
	Io { path: PathBuf, source: std::io::Error },
	#[error("Failed to encode or decode {what}.")]
	Json { what: String, source: serde_json::Error },
	#[error("Index artifacts are misaligned: {0}")]
	Misaligned(String),
	#[error("Invalid index input: {0}")]
	Validation(String),
}
impl Error {
	pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
		Self::Io { path: path.into(), source }
	}

	pub(crate) fn json(what: impl Into<String>, source: serde_json::Error) -> Self {
		Self::Json { what: what.into(), source }
	}
}
