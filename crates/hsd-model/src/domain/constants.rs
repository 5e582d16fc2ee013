/// Namespace prefix the inventory puts in front of ACL tags.
pub const TAG_NAMESPACE: &str = "tag:";

/// Marker a tag must start with (after the namespace) to carry scrape intent.
pub const SCRAPE_MARKER: &str = "scrape_";

/// Separator between the port and the application name: `scrape_<port>_<app>`.
pub const TAG_SEPARATOR: char = '_';

/// Label carrying the node display name.
pub const LABEL_NODE_NAME: &str = "node_name";

/// Label carrying the application name decoded from the tag.
pub const LABEL_APP: &str = "app";
