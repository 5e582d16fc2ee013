use crate::metrics::backend::{MetricsBackend, PollOutcome};

/// No-op metrics backend that compiles to nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpMetrics;

impl MetricsBackend for NoOpMetrics {
    #[inline(always)]
    fn record_poll(&self, _: PollOutcome, _: u64) {}

    #[inline(always)]
    fn record_targets(&self, _: usize) {}

    #[inline(always)]
    fn record_upstream_error(&self, _: &str) {}
}
