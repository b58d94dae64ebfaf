//! HTTP surface: `GET /`, `POST /predict`, `GET /health`.

pub mod handlers;
pub mod schemas;

use crate::service::RiskService;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub use handlers::ApiError;
pub use schemas::{HealthResponse, RiskAssessmentRequest, RiskAssessmentResponse};

pub fn routes() -> Router<Arc<RiskService>> {
    Router::new()
        .route("/", get(handlers::root))
        .route("/predict", post(handlers::predict))
        .route("/health", get(handlers::health))
}

/// Routes with request tracing, bound to the shared service.
pub fn app(service: Arc<RiskService>) -> Router {
    routes()
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}
