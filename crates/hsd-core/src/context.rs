use std::{future::Future, time::Duration};

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::FetchError;

/// Ceiling for a single upstream read when the poll carries no deadline.
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

/// Stand-in deadline for timeouts too large to add to the clock.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Deadline and cancellation token of one inbound poll.
///
/// Created by the inbound handler and passed down explicitly to the fetcher,
/// so the upstream call never outlives the poll that triggered it.
#[derive(Debug, Clone)]
pub struct PollContext {
    deadline: Instant,
    cancel: CancellationToken,
}

impl PollContext {
    /// Create a context that expires `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: deadline_after(timeout),
            cancel: CancellationToken::new(),
        }
    }

    /// Derive a context sharing the deadline, whose token is cancelled along with ours.
    pub fn child(&self) -> Self {
        Self {
            deadline: self.deadline,
            cancel: self.cancel.child_token(),
        }
    }

    /// Pull the deadline in to `now + timeout` if that is earlier.
    ///
    /// A timeout that overflows the clock keeps the current deadline.
    pub fn tighten(mut self, timeout: Duration) -> Self {
        if let Some(candidate) = Instant::now().checked_add(timeout) {
            self.deadline = self.deadline.min(candidate);
        }
        self
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Time left until the deadline (zero once it has passed).
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_canceled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Drive `fut` until it completes, the deadline passes, or the token fires.
    pub async fn run<F, T>(&self, fut: F) -> Result<T, FetchError>
    where
        F: Future<Output = Result<T, FetchError>>,
    {
        let after = self.remaining();

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(FetchError::Canceled),
            res = tokio::time::timeout_at(self.deadline, fut) => {
                res.unwrap_or(Err(FetchError::Timeout { after }))
            }
        }
    }
}

fn deadline_after(timeout: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(timeout).unwrap_or(now + FAR_FUTURE)
}

impl Default for PollContext {
    fn default() -> Self {
        Self::with_timeout(DEFAULT_UPSTREAM_TIMEOUT)
    }
}
