mod constants;
pub use constants::{LABEL_APP, LABEL_NODE_NAME, SCRAPE_MARKER, TAG_NAMESPACE, TAG_SEPARATOR};

mod labels;
pub use labels::Labels;
