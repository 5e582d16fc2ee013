mod headscale;
pub use headscale::{HeadscaleClient, LIST_NODES_PATH};

use async_trait::async_trait;
use hsd_model::InventorySnapshot;

use crate::{context::PollContext, error::FetchError};

/// Source of inventory snapshots.
///
/// The production implementation is [`HeadscaleClient`]; tests plug in
/// canned snapshots or failures.
#[async_trait]
pub trait InventorySource: Send + Sync + 'static {
    /// Read the current inventory once, within the poll's deadline.
    async fn fetch(&self, ctx: &PollContext) -> Result<InventorySnapshot, FetchError>;
}
