//! Metrics collection abstraction for the discovery pipeline.
//!
//! Backends (prometheus, statsd, etc) implement [`MetricsBackend`] and are handed
//! to [`crate::DiscoveryService`]. Nothing in the discovery contract depends on them.
mod backend;
pub use backend::{MetricsBackend, MetricsHandle, PollOutcome};

mod noop;
pub use noop::NoOpMetrics;

use std::sync::Arc;

/// Create a no-op metrics handle.
#[inline]
pub fn noop_metrics() -> MetricsHandle {
    Arc::new(NoOpMetrics)
}
