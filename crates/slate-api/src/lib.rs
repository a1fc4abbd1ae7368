//! slate-api
//!
//! Axum routes, application state, and configuration for the Slate budget
//! tracker's HTTP surface.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use slate_ai::{BudgetEstimator, GeminiModel};
use slate_core::{AggregationOptions, CoreResult, DatasetStore, PurchasedItemPolicy};
use slate_report::ReportGenerator;
use slate_storage_json::JsonDatasetStore;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod routes;

pub use config::AppConfig;
pub use error::ApiError;

/// Shared application state handed to every route.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DatasetStore>,
    pub estimator: Arc<BudgetEstimator>,
    pub reports: Arc<ReportGenerator>,
    pub purchased_policy: PurchasedItemPolicy,
    pub aggregation: AggregationOptions,
}

impl AppState {
    /// Wires the filesystem store, the Gemini-backed estimator, and the
    /// report generator from configuration.
    pub fn from_config(config: &AppConfig) -> CoreResult<Self> {
        let store = JsonDatasetStore::new(&config.data.dir)?;
        let reports = ReportGenerator::new(&config.data.dir);
        let model = GeminiModel::with_model(config.gemini_api_key(), &config.gemini.model);
        let estimator = BudgetEstimator::with_interval(
            Arc::new(model),
            Duration::from_secs(config.gemini.min_call_interval_secs),
        );
        Ok(Self {
            store: Arc::new(store),
            estimator: Arc::new(estimator),
            reports: Arc::new(reports),
            purchased_policy: config.purchased_policy(),
            aggregation: AggregationOptions::default(),
        })
    }
}

/// Creates the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/budget", routes::budget::routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
