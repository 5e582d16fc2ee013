mod error;
pub use error::ApiError;

mod http;
pub use http::{DiscoveryApi, REFRESH_INTERVAL_HEADER};

mod metrics;
pub use metrics::MetricsApi;
