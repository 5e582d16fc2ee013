use tracing::trace;

use hsd_model::{DiscoveryRecord, InventorySnapshot, ScrapeTag, TagMatch};

/// Turn an inventory snapshot into discovery records.
///
/// Nodes are visited in snapshot order. A node without addresses yields
/// nothing; otherwise its first address is the host of every record it
/// produces. Each node contributes one record per qualifying tag, in sorted
/// tag order. Malformed tags are skipped, never reported.
pub fn extract_targets(snapshot: &InventorySnapshot) -> Vec<DiscoveryRecord> {
    let mut records = Vec::new();

    for node in snapshot.iter() {
        let Some(host) = node.primary_address() else {
            trace!(node = %node.given_name, "node has no address, skipped");
            continue;
        };

        for raw in node.tags() {
            match ScrapeTag::parse(raw) {
                TagMatch::Scrape(tag) => {
                    records.push(DiscoveryRecord::new(host, tag.port, &node.given_name, tag.app));
                }
                TagMatch::Skip(reason) => {
                    trace!(node = %node.given_name, tag = raw, %reason, "tag skipped");
                }
            }
        }
    }

    records
}
