use axum::{
	Json, Router,
	extract::{State, rejection::JsonRejection},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;

use crs_service::{Error, RecommendRequest, RecommendResponse, RoleRequest, RoleResponse};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/recommend", post(recommend))
		.route("/v1/recommend/role", post(recommend_role))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn recommend(
	State(state): State<AppState>,
	payload: Result<Json<RecommendRequest>, JsonRejection>,
) -> Result<Json<RecommendResponse>, ApiError> {
	let Json(payload) = payload?;
	let response = state.recommender.recommend(payload).await?;

	Ok(Json(response))
}

async fn recommend_role(
	State(state): State<AppState>,
	payload: Result<Json<RoleRequest>, JsonRejection>,
) -> Result<Json<RoleResponse>, ApiError> {
	let Json(payload) = payload?;
	let response = state.recommender.recommend_role(payload).await?;

	Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}
}

impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match err {
			Error::InvalidRequest { message, fields } =>
				json_error(StatusCode::BAD_REQUEST, "invalid_request", message, Some(fields)),
			Error::Provider { message } =>
				json_error(StatusCode::BAD_GATEWAY, "provider_error", message, None),
			Error::Index { message } =>
				json_error(StatusCode::SERVICE_UNAVAILABLE, "index_unavailable", message, None),
		}
	}
}

impl From<JsonRejection> for ApiError {
	fn from(err: JsonRejection) -> Self {
		json_error(StatusCode::BAD_REQUEST, "invalid_request", err.body_text(), None)
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}

pub fn json_error(
	status: StatusCode,
	code: &str,
	message: impl Into<String>,
	fields: Option<Vec<String>>,
) -> ApiError {
	ApiError::new(status, code, message, fields)
}
