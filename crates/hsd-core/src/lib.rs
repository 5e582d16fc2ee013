pub mod context;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod metrics;
pub mod service;

pub use context::{DEFAULT_UPSTREAM_TIMEOUT, PollContext};
pub use error::FetchError;
pub use extract::extract_targets;
pub use fetch::{HeadscaleClient, InventorySource, LIST_NODES_PATH};
pub use metrics::{MetricsBackend, MetricsHandle, NoOpMetrics, PollOutcome, noop_metrics};
pub use service::DiscoveryService;

pub mod prelude {
    pub use crate::context::PollContext;
    pub use crate::error::FetchError;
    pub use crate::fetch::{HeadscaleClient, InventorySource};
    pub use crate::service::DiscoveryService;
}
