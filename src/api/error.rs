//! JSON error responses for the REST API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{error, warn};

use wordsim_core::{AppError, ErrorKind, StatusCategory};

/// Wraps an [`AppError`] so handlers can return it with `?`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let category = self.0.status();
        let status = StatusCode::from_u16(category.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        match category {
            StatusCategory::ServerFault => error!(error = %self.0, "request failed"),
            _ => warn!(error = %self.0, "request rejected"),
        }
        let kind: ErrorKind = self.0.kind();
        let body = json!({
            "error": self.0.message(),
            "kind": kind.tag(),
        });
        (status, Json(body)).into_response()
    }
}
