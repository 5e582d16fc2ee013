use std::{sync::Arc, time::Duration};

use axum::{
    Json, Router,
    extract::State,
    http::HeaderMap,
    response::IntoResponse,
    routing::get,
};
use tracing::debug;

use hsd_core::{DEFAULT_UPSTREAM_TIMEOUT, DiscoveryService, InventorySource, PollContext};

use crate::error::ApiError;

/// Refresh interval Prometheus sends with every HTTP service-discovery poll.
///
/// An answer arriving after the next poll is due is useless, so it bounds the
/// upstream read.
pub const REFRESH_INTERVAL_HEADER: &str = "x-prometheus-refresh-interval-seconds";

/// HTTP service-discovery endpoint builder.
pub struct DiscoveryApi<S> {
    service: Arc<DiscoveryService<S>>,
    upstream_timeout: Duration,
}

struct ApiState<S> {
    service: Arc<DiscoveryService<S>>,
    upstream_timeout: Duration,
}

impl<S> DiscoveryApi<S>
where
    S: InventorySource,
{
    /// Create the API over `service` with the default upstream ceiling.
    pub fn new(service: Arc<DiscoveryService<S>>) -> Self {
        Self {
            service,
            upstream_timeout: DEFAULT_UPSTREAM_TIMEOUT,
        }
    }

    /// Ceiling for the upstream read when the poll carries no tighter deadline.
    pub fn with_upstream_timeout(mut self, timeout: Duration) -> Self {
        self.upstream_timeout = timeout;
        self
    }

    /// Build axum router.
    ///
    /// Routes:
    /// - GET / and GET /{*path} - Discovery target list
    ///
    /// Other methods get 405.
    pub fn router(self) -> Router {
        let state = Arc::new(ApiState {
            service: self.service,
            upstream_timeout: self.upstream_timeout,
        });

        Router::new()
            .route("/", get(serve_targets::<S>))
            .route("/{*path}", get(serve_targets::<S>))
            .with_state(state)
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /*
async fn serve_targets<S>(
    State(state): State<Arc<ApiState<S>>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError>
where
    S: InventorySource,
{
    let mut ctx = PollContext::with_timeout(state.upstream_timeout);
    if let Some(inbound) = inbound_timeout(&headers) {
        debug!(?inbound, "poll carries its own deadline");
        ctx = ctx.tighten(inbound);
    }

    // Dropped with this future, so a client disconnect aborts the upstream call.
    let _cancel_on_drop = ctx.token().clone().drop_guard();

    let records = state.service.discover(&ctx).await?;
    Ok(Json(records))
}

/// Deadline announced by the poller, if any.
///
/// Values that are not positive or do not fit a `Duration` are ignored.
fn inbound_timeout(headers: &HeaderMap) -> Option<Duration> {
    let secs = headers
        .get(REFRESH_INTERVAL_HEADER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<f64>()
        .ok()?;
    if secs <= 0.0 {
        return None;
    }
    Duration::try_from_secs_f64(secs).ok()
}
