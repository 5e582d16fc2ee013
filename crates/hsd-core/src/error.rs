use std::time::Duration;

use thiserror::Error;

use crate::metrics::PollOutcome;

/// Failure of a single inventory read. None of these are retried.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("cant make http call: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("invalid response status code: {status}; body: {body}")]
    Status { status: u16, body: String },

    #[error("cant parse response: {source}; body: {body}")]
    Decode {
        #[source]
        source: serde_json::Error,
        body: String,
    },

    #[error("upstream did not answer within {after:?}")]
    Timeout { after: Duration },

    #[error("poll canceled before upstream answered")]
    Canceled,
}

impl FetchError {
    /// Return label value for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Transport(_) => "transport",
            FetchError::Status { .. } => "status",
            FetchError::Decode { .. } => "decode",
            FetchError::Timeout { .. } => "timeout",
            FetchError::Canceled => "canceled",
        }
    }

    /// How the poll that hit this error should be classified.
    pub fn outcome(&self) -> PollOutcome {
        match self {
            FetchError::Timeout { .. } => PollOutcome::Timeout,
            FetchError::Canceled => PollOutcome::Canceled,
            _ => PollOutcome::Failure,
        }
    }
}
