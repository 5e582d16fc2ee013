use std::sync::Arc;

/// Poll outcome for metrics classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Targets were served.
    Success,
    /// Upstream could not be read or decoded.
    Failure,
    /// Upstream did not answer before the deadline.
    Timeout,
    /// The poll went away before upstream answered.
    Canceled,
}

impl PollOutcome {
    /// Return label value for metrics.
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            PollOutcome::Success => "success",
            PollOutcome::Failure => "failure",
            PollOutcome::Timeout => "timeout",
            PollOutcome::Canceled => "canceled",
        }
    }
}

/// Backend metrics collection interface.
pub trait MetricsBackend: Send + Sync + 'static {
    /// Record a finished poll with its outcome and wall time.
    ///
    /// # Arguments
    /// - `outcome`: How the poll ended
    /// - `duration_ms`: Time spent fetching and extracting, in milliseconds
    fn record_poll(&self, outcome: PollOutcome, duration_ms: u64);
    /// Record the number of targets served by a successful poll.
    fn record_targets(&self, count: usize);
    /// Record an upstream failure.
    ///
    /// # Arguments
    /// - `kind`: Error category, see [`crate::FetchError::kind`]
    fn record_upstream_error(&self, kind: &str);
}

/// Shared handle to metrics backend.
pub type MetricsHandle = Arc<dyn MetricsBackend>;
