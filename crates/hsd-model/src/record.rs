use std::net::Ipv6Addr;

use serde::{Deserialize, Serialize};

use crate::domain::{LABEL_APP, LABEL_NODE_NAME, Labels};

/// One entry of the HTTP service-discovery target list.
///
/// Serializes as `{"targets": ["host:port"], "labels": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryRecord {
    pub targets: Vec<String>,
    pub labels: Labels,
}

impl DiscoveryRecord {
    /// Build a record for a single endpoint with `node_name` and `app` labels.
    pub fn new(host: &str, port: u16, node_name: &str, app: &str) -> Self {
        let mut labels = Labels::new();
        labels.insert(LABEL_NODE_NAME, node_name).insert(LABEL_APP, app);

        Self {
            targets: vec![endpoint(host, port)],
            labels,
        }
    }
}

/// Renders `host:port`, bracketing IPv6 hosts.
pub fn endpoint(host: &str, port: u16) -> String {
    if host.parse::<Ipv6Addr>().is_ok() {
        format!("[{host}]:{port}")
    } else {
        format!("{host}:{port}")
    }
}
