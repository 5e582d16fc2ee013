mod domain;
pub use domain::{LABEL_APP, LABEL_NODE_NAME, SCRAPE_MARKER, TAG_NAMESPACE, TAG_SEPARATOR};
pub use domain::Labels;

mod inventory;
pub use inventory::{InventorySnapshot, Node};

mod tag;
pub use tag::{ScrapeTag, SkipReason, TagMatch};

mod record;
pub use record::{DiscoveryRecord, endpoint};
