pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String, fields: Vec<String> },
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Index error: {message}")]
	Index { message: String },
}
impl Error {
	pub(crate) fn invalid(field: &str, message: impl Into<String>) -> Self {
		Self::InvalidRequest { message: message.into(), fields: vec![field.to_string()] }
	}
}

impl From<crs_index::Error> for Error {
	fn from(err: crs_index::Error) -> Self {
		Self::Index { message: err.to_string() }
	}
}

impl From<color_eyre::Report> for Error {
	fn from(err: color_eyre::Report) -> Self {
		Self::Provider { message: err.to_string() }
	}
}
