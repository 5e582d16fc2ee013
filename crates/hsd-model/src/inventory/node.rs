use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::null_as_default;

/// A single node as reported by the inventory service.
///
/// Only the fields needed for target discovery are decoded; everything else
/// in the upstream payload is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Node {
    /// Upstream identifier.
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    /// Host-reported name.
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// Operator-facing display name; used as the `node_name` label.
    #[serde(deserialize_with = "null_as_default")]
    pub given_name: String,
    /// Addresses assigned on the mesh, in upstream order.
    #[serde(deserialize_with = "null_as_default")]
    pub ip_addresses: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub forced_tags: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub valid_tags: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub invalid_tags: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub online: bool,
}

impl Node {
    /// First assigned address, used as the host for every target of this node.
    pub fn primary_address(&self) -> Option<&str> {
        self.ip_addresses.first().map(String::as_str)
    }

    /// Union of forced, valid and invalid tags, deduplicated and sorted.
    pub fn tags(&self) -> BTreeSet<&str> {
        self.forced_tags
            .iter()
            .chain(&self.valid_tags)
            .chain(&self.invalid_tags)
            .map(String::as_str)
            .collect()
    }
}
