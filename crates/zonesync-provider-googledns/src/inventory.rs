// # Zone Inventory and Record Set Cache
//
// Two adapter-owned caches:
//
// - `ZoneInventory`: DNS zone name → remote zone id. Fetched in full on
//   first use and kept for the adapter's lifetime; only `clear()` drops it.
// - `RecordSetCache`: DNS zone name → last fetched record sets. Keyed by
//   name, not id, so the applier can invalidate without a lookup.
//
// Neither is synchronized; the adapter's `&mut self` methods are the only
// way in.

use std::collections::{HashMap, HashSet};
use zonesync_core::{Error, Result};

use crate::PROVIDER_NAME;
use crate::api::CloudDnsApi;
use crate::wire::ResourceRecordSet;

/// Lazily fetched zone name → zone id mapping
#[derive(Debug, Default)]
pub struct ZoneInventory {
    /// `None` until the first lookup
    zones: Option<HashMap<String, String>>,
}

impl ZoneInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_populated(&self) -> bool {
        self.zones.is_some()
    }

    /// Look up the remote id of `zone_name`
    ///
    /// Fetches every page of the zone listing on first call. `Ok(None)`
    /// means the zone does not exist; `Err` means the listing failed.
    pub async fn resolve(&mut self, api: &dyn CloudDnsApi, zone_name: &str) -> Result<Option<String>> {
        let zones = match self.zones.take() {
            Some(zones) => zones,
            None => fetch_zones(api).await?,
        };

        let zone_id = zones.get(zone_name).cloned();
        self.zones = Some(zones);
        Ok(zone_id)
    }

    /// Drop the mapping so the next lookup re-fetches it
    pub fn clear(&mut self) {
        self.zones = None;
    }
}

async fn fetch_zones(api: &dyn CloudDnsApi) -> Result<HashMap<String, String>> {
    let mut zones = HashMap::new();
    let mut page_token: Option<String> = None;
    let mut seen = HashSet::new();
    let mut pages = 0usize;

    loop {
        let page = api.list_managed_zones(page_token.as_deref()).await?;
        pages += 1;

        for zone in page.managed_zones {
            zones.insert(zone.dns_name, zone.id);
        }

        match advance(&mut seen, page.next_page_token)? {
            Some(next) => page_token = Some(next),
            None => break,
        }
    }

    tracing::debug!("Zone inventory: {} zones across {} pages", zones.len(), pages);
    Ok(zones)
}

/// Fetch every page of a zone's record sets
pub async fn fetch_record_sets(api: &dyn CloudDnsApi, zone_id: &str) -> Result<Vec<ResourceRecordSet>> {
    let mut rrsets = Vec::new();
    let mut page_token: Option<String> = None;
    let mut seen = HashSet::new();
    let mut pages = 0usize;

    loop {
        let page = api.list_record_sets(zone_id, page_token.as_deref()).await?;
        pages += 1;
        rrsets.extend(page.rrsets);

        match advance(&mut seen, page.next_page_token)? {
            Some(next) => page_token = Some(next),
            None => break,
        }
    }

    tracing::debug!(
        "Zone {}: {} record sets across {} pages",
        zone_id,
        rrsets.len(),
        pages
    );
    Ok(rrsets)
}

/// Next continuation token, if any
///
/// A token handed out twice in one listing would loop forever, so any
/// repeat, not just a consecutive one, is an error.
fn advance(seen: &mut HashSet<String>, next: Option<String>) -> Result<Option<String>> {
    match next {
        Some(next) if next.is_empty() => Ok(None),
        Some(next) => {
            if !seen.insert(next.clone()) {
                return Err(Error::provider(
                    PROVIDER_NAME,
                    format!("Pagination token {:?} returned twice", next),
                ));
            }
            Ok(Some(next))
        }
        None => Ok(None),
    }
}

/// Per-zone snapshot of record sets
#[derive(Debug, Default)]
pub struct RecordSetCache {
    entries: HashMap<String, Vec<ResourceRecordSet>>,
}

impl RecordSetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, zone_name: &str) -> Option<&[ResourceRecordSet]> {
        self.entries.get(zone_name).map(Vec::as_slice)
    }

    pub fn contains(&self, zone_name: &str) -> bool {
        self.entries.contains_key(zone_name)
    }

    pub fn insert(&mut self, zone_name: impl Into<String>, rrsets: Vec<ResourceRecordSet>) {
        self.entries.insert(zone_name.into(), rrsets);
    }

    /// Drop the snapshot for `zone_name`; returns whether one existed
    pub fn invalidate(&mut self, zone_name: &str) -> bool {
        self.entries.remove(zone_name).is_some()
    }
}
