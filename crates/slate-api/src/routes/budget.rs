//! Budget tracking routes.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::json;
use slate_core::{AggregationService, CoreError, IncurredService};
use slate_domain::IncurredSubmission;
use tracing::info;

use crate::{ApiError, AppState};

/// Standard success envelope. Serialized as a typed struct rather than a
/// `json!` value so map-backed payloads keep their iteration order (period
/// rollups are ordered numerically, `week_9` before `week_10`).
#[derive(Serialize)]
struct DataResponse<T> {
    success: bool,
    data: T,
}

impl<T> DataResponse<T> {
    fn new(data: T) -> Self {
        Self { success: true, data }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/ai-estimate", post(ai_estimate))
        .route("/incurred", post(record_incurred))
        .route("/daily", get(daily_budget))
        .route("/weekly", get(weekly_budget))
        .route("/monthly", get(monthly_budget))
        .route("/final-report", get(final_report))
}

/// POST /ai-estimate — plan shoot days from the schedule, run the model,
/// and overwrite the estimate store with its reply.
async fn ai_estimate(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let schedule = state
        .store
        .load_schedule()?
        .ok_or_else(|| CoreError::NotFound("Schedule data not found".to_string()))?;

    let estimates = state.estimator.estimate(&schedule).await?;

    let current = state.store.load_estimates()?;
    state.store.save_estimates(&estimates, current.version)?;
    info!(days = estimates.len(), "stored AI budget estimate");

    Ok(Json(DataResponse::new(estimates)))
}

/// POST /incurred — record one day's reported costs.
async fn record_incurred(
    State(state): State<AppState>,
    Json(submission): Json<IncurredSubmission>,
) -> Result<impl IntoResponse, ApiError> {
    IncurredService::record(state.store.as_ref(), submission, state.purchased_policy)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "message": "Incurred cost added successfully" })),
    ))
}

/// GET /daily — merged estimated + incurred view per date.
async fn daily_budget(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let estimates = state.store.load_estimates()?.data;
    let incurred = state.store.load_incurred()?.data;
    let merged = AggregationService::daily(&estimates, &incurred);
    Ok(Json(DataResponse::new(merged)))
}

/// GET /weekly — ISO-week rollup.
async fn weekly_budget(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let estimates = state.store.load_estimates()?.data;
    let incurred = state.store.load_incurred()?.data;
    let weekly = AggregationService::weekly(&estimates, &incurred, state.aggregation)?;
    Ok(Json(DataResponse::new(weekly)))
}

/// GET /monthly — calendar-month rollup.
async fn monthly_budget(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let estimates = state.store.load_estimates()?.data;
    let incurred = state.store.load_incurred()?.data;
    let monthly = AggregationService::monthly(&estimates, &incurred, state.aggregation)?;
    Ok(Json(DataResponse::new(monthly)))
}

/// GET /final-report — generate the PDF and stream it as an attachment.
async fn final_report(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let path = state
        .reports
        .generate(state.store.as_ref(), state.aggregation)?;
    let bytes = std::fs::read(&path).map_err(CoreError::from)?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"final_budget_report.pdf\"".to_string(),
            ),
        ],
        bytes,
    ))
}
