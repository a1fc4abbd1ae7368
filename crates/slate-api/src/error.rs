//! HTTP error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use slate_ai::AiError;
use slate_core::CoreError;
use slate_report::ReportError;
use tracing::error;

/// Route-level failure, rendered as `{"success": false, "message": ...}`.
#[derive(Debug)]
pub enum ApiError {
    Core(CoreError),
    Ai(AiError),
    Report(ReportError),
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        ApiError::Core(err)
    }
}

impl From<AiError> for ApiError {
    fn from(err: AiError) -> Self {
        ApiError::Ai(err)
    }
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        ApiError::Report(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Core(err) => {
                let status = match &err {
                    CoreError::MissingField(_) => StatusCode::BAD_REQUEST,
                    CoreError::NotFound(_) => StatusCode::NOT_FOUND,
                    CoreError::Conflict { .. } => StatusCode::CONFLICT,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                if status == StatusCode::INTERNAL_SERVER_ERROR {
                    error!(error = %err, "request failed");
                }
                (
                    status,
                    Json(json!({ "success": false, "message": err.to_string() })),
                )
                    .into_response()
            }
            ApiError::Ai(err) => {
                error!(error = %err, "estimation failed");
                let mut body = json!({ "success": false, "message": err.to_string() });
                if let Some(raw) = err.raw_response() {
                    body["raw_response"] = json!(raw);
                }
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
            ApiError::Report(err) => {
                error!(error = %err, "report generation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "success": false, "message": err.to_string() })),
                )
                    .into_response()
            }
        }
    }
}
