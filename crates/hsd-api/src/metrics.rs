use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::header::CONTENT_TYPE,
    response::IntoResponse,
    routing::get,
};

use hsd_prometheus::PrometheusMetrics;

use crate::error::ApiError;

const TEXT_FORMAT: &str = "text/plain; version=0.0.4";

/// Exposition endpoint for the service's own metrics.
pub struct MetricsApi {
    metrics: Arc<PrometheusMetrics>,
}

impl MetricsApi {
    pub fn new(metrics: Arc<PrometheusMetrics>) -> Self {
        Self { metrics }
    }

    /// Build axum router.
    ///
    /// Routes:
    /// - GET /metrics - Prometheus text format
    pub fn router(self) -> Router {
        Router::new()
            .route("/metrics", get(render))
            .with_state(self.metrics)
    }
}

/// GET /metrics
async fn render(State(metrics): State<Arc<PrometheusMetrics>>) -> Result<impl IntoResponse, ApiError> {
    let body = metrics
        .encode_text()
        .map_err(|e| ApiError::Metrics(e.to_string()))?;
    Ok(([(CONTENT_TYPE, TEXT_FORMAT)], body))
}
