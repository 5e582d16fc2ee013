use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use hsd_core::FetchError;

/// Errors surfaced to HTTP clients as plain text.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Upstream(#[from] FetchError),

    #[error("cant encode metrics: {0}")]
    Metrics(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Upstream(FetchError::Timeout { .. }) => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn upstream_errors_map_to_5xx() {
        let err = ApiError::from(FetchError::Status {
            status: 500,
            body: "x".into(),
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let err = ApiError::from(FetchError::Timeout {
            after: Duration::from_secs(10),
        });
        assert_eq!(err.status_code(), StatusCode::GATEWAY_TIMEOUT);

        assert!(ApiError::from(FetchError::Canceled).status_code().is_server_error());
    }

    #[test]
    fn response_is_plain_text_with_error_message() {
        let resp = ApiError::from(FetchError::Status {
            status: 503,
            body: "maintenance".into(),
        })
        .into_response();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let ct = resp.headers()["content-type"].to_str().unwrap();
        assert!(ct.starts_with("text/plain"), "{ct}");
    }
}
