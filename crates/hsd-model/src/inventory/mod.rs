mod node;
pub use node::Node;

mod snapshot;
pub use snapshot::InventorySnapshot;

use serde::{Deserialize, Deserializer};

/// Treats an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
