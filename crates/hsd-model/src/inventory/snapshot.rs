use serde::{Deserialize, Serialize};

use super::{Node, null_as_default};

/// The inventory service's view of all nodes at poll time.
///
/// Older inventory versions list nodes under `machines`, newer ones under
/// `nodes`; both decode into the same field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventorySnapshot {
    #[serde(alias = "nodes", deserialize_with = "null_as_default")]
    pub machines: Vec<Node>,
}

impl InventorySnapshot {
    pub fn new(machines: Vec<Node>) -> Self {
        Self { machines }
    }

    pub fn len(&self) -> usize {
        self.machines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.machines.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.machines.iter()
    }
}
