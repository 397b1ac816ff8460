use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use sortable_common::error::Error;

/// Body of every failed position update.
pub const UPDATE_POSITION_ERROR_BODY: &str = "Error";

/// Failure of the move endpoint.
///
/// The admin UI only checks for a non-2xx status, so every cause
/// collapses into the same response. The cause is logged by the handler.
#[derive(Debug)]
pub struct UpdatePositionRejected;

impl IntoResponse for UpdatePositionRejected {
    fn into_response(self) -> Response {
        (StatusCode::UNPROCESSABLE_ENTITY, UPDATE_POSITION_ERROR_BODY).into_response()
    }
}

/// Failure of the JSON endpoints.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub Error);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::UNPROCESSABLE_ENTITY,
        };

        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
