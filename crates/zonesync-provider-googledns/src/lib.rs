// # Google Cloud DNS Provider
//
// This crate synchronizes neutral zones with Google Cloud DNS managed zones.
//
// ## Populate path
//
// Zone Inventory (zone name → zone id, fetched once) → Record Set Fetcher
// (every page, cached per zone name) → group by (name, type) → Inbound
// Translator → records added to the `Zone`.
//
// ## Apply path
//
// Plan changes, in order → Outbound Translator (one fragment per value) →
// one `changes.create` request per fragment, each declaring exactly one
// addition or deletion → record set cache for the zone dropped.
//
// Multi-value records are written one value at a time because the change
// API treats every write as an atomic single-entry changeset. A failure
// stops the apply and leaves a deterministic prefix applied.
//
// ## Constraints
//
// - ❌ NO retry or backoff: failures propagate to the caller
// - ❌ NO concurrent requests: every call is awaited before the next
// - ✅ Caches are owned by the provider instance and reached through `&mut self`
// - ✅ Access token never appears in logs or Debug output
//
// ## Security Requirements
//
// - Credential acquisition is out of scope; a bearer token is supplied
// - Provider MUST fail fast if the token is empty

pub mod api;
pub mod inventory;
pub mod translate;
pub mod wire;

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, warn};
use zonesync_core::config::ProviderConfig;
use zonesync_core::{
    ApplyReport, Error, Plan, ProviderRegistry, RecordType, Result, Step, StepKind, Zone,
    ZoneProvider, ZoneProviderFactory,
};

use crate::api::{CloudDnsApi, HttpCloudDnsClient};
use crate::inventory::{RecordSetCache, ZoneInventory};
use crate::wire::{ChangeRequest, ResourceRecordSet};

pub use crate::api::{DEFAULT_ENDPOINT, DEFAULT_HTTP_TIMEOUT};

/// Name this provider registers under
pub const PROVIDER_NAME: &str = "googledns";

/// Record types this provider manages
pub const SUPPORTS: [RecordType; 11] = RecordType::ALL;

/// Lowest TTL Cloud DNS accepts; enforced by the caller's validation
pub const MIN_TTL: u32 = 60;

/// Google Cloud DNS zone provider
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the provider will:
/// - Perform all list requests (zone inventory, record sets)
/// - Log each intended change body
/// - **NOT** send any change
pub struct GoogleDnsProvider {
    project_id: String,

    /// Transport; `HttpCloudDnsClient` outside of tests
    api: Box<dyn CloudDnsApi>,

    zones: ZoneInventory,

    records: RecordSetCache,

    dry_run: bool,
}

impl std::fmt::Debug for GoogleDnsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleDnsProvider")
            .field("project_id", &self.project_id)
            .field("zones", &self.zones)
            .field("dry_run", &self.dry_run)
            .finish_non_exhaustive()
    }
}

impl GoogleDnsProvider {
    /// Create a provider talking to the Cloud DNS HTTP API
    ///
    /// # Parameters
    ///
    /// - `project_id`: Cloud project owning the managed zones
    /// - `access_token`: OAuth2 bearer token
    /// - `endpoint`: Optional API base URL override
    /// - `timeout`: Per-request timeout
    /// - `dry_run`: If true, perform reads but skip writes
    pub fn new(
        project_id: impl Into<String>,
        access_token: impl Into<String>,
        endpoint: Option<String>,
        timeout: Duration,
        dry_run: bool,
    ) -> Result<Self> {
        let project_id = project_id.into();
        let client = HttpCloudDnsClient::new(project_id.clone(), access_token, endpoint, timeout)?;
        Ok(Self::with_api(project_id, Box::new(client), dry_run))
    }

    /// Create a provider over any transport
    pub fn with_api(project_id: impl Into<String>, api: Box<dyn CloudDnsApi>, dry_run: bool) -> Self {
        Self {
            project_id: project_id.into(),
            api,
            zones: ZoneInventory::new(),
            records: RecordSetCache::new(),
            dry_run,
        }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Remote id of `zone_name`, or `None` if the project has no such zone
    pub async fn zone_id(&mut self, zone_name: &str) -> Result<Option<String>> {
        self.zones.resolve(self.api.as_ref(), zone_name).await
    }

    /// Forget the zone inventory so the next lookup re-lists zones
    pub fn clear_zones(&mut self) {
        self.zones.clear();
    }

    /// Every record set of `zone_name`, served from cache when possible
    ///
    /// A zone unknown to the inventory yields no record sets.
    pub async fn zone_records(&mut self, zone_name: &str) -> Result<&[ResourceRecordSet]> {
        if !self.records.contains(zone_name) {
            let Some(zone_id) = self.zones.resolve(self.api.as_ref(), zone_name).await? else {
                debug!("zone_records: {} not found, no records", zone_name);
                return Ok(&[]);
            };

            let rrsets = inventory::fetch_record_sets(self.api.as_ref(), &zone_id).await?;
            self.records.insert(zone_name, rrsets);
        }

        Ok(self.records.get(zone_name).unwrap_or(&[]))
    }

    /// Drop the cached record sets of `zone_name`
    pub fn invalidate_zone_records(&mut self, zone_name: &str) {
        if self.records.invalidate(zone_name) {
            debug!("Dropped cached record sets for {}", zone_name);
        }
    }

    /// Zone id for an apply
    ///
    /// A zone missing from an inventory fetched earlier may have been
    /// created since, so the inventory is re-listed once before giving up.
    async fn zone_id_for_apply(&mut self, zone_name: &str) -> Result<String> {
        let was_populated = self.zones.is_populated();
        if let Some(zone_id) = self.zone_id(zone_name).await? {
            return Ok(zone_id);
        }

        if was_populated {
            debug!("apply: no matching zone {}, refreshing zone inventory", zone_name);
            self.clear_zones();
            if let Some(zone_id) = self.zone_id(zone_name).await? {
                return Ok(zone_id);
            }
        }

        Err(Error::zone_not_found(zone_name))
    }

    async fn apply_changes(&mut self, plan: &Plan) -> Result<ApplyReport> {
        let mut report = ApplyReport::default();
        if plan.is_empty() {
            return Ok(report);
        }

        let zone_id = self.zone_id_for_apply(&plan.zone).await?;

        for change in &plan.changes {
            for step in change.steps() {
                report.writes += self.apply_step(&zone_id, &plan.zone, step).await?;
            }
            report.changes += 1;
        }

        Ok(report)
    }

    /// Issue one change request per fragment of `step.record`
    async fn apply_step(&self, zone_id: &str, zone_name: &str, step: Step<'_>) -> Result<usize> {
        let record = step.record;
        let record_type = record.record_type();
        let fqdn = record.fqdn(zone_name);
        let mut writes = 0;

        for fragment in translate::fragments(record) {
            let rrset = fragment.into_rrset(&fqdn, record_type, record.ttl);
            let change = match step.kind {
                StepKind::Create => ChangeRequest::addition(rrset),
                StepKind::Delete => ChangeRequest::deletion(rrset),
            };

            self.send_change(zone_id, &change).await?;
            writes += 1;
        }

        debug!(
            "apply: {:?} {} {} ({} writes)",
            step.kind, fqdn, record_type, writes
        );
        Ok(writes)
    }

    async fn send_change(&self, zone_id: &str, change: &ChangeRequest) -> Result<()> {
        if self.dry_run {
            info!(
                "[DRY-RUN] Would create change in zone {}: {}",
                zone_id,
                serde_json::to_string(change)?
            );
            return Ok(());
        }

        let response = self.api.create_change(zone_id, change).await?;
        debug!(
            "Change {} in zone {}: status={:?}, started={:?}",
            response.id.as_deref().unwrap_or("<none>"),
            zone_id,
            response.status,
            response.start_time
        );
        Ok(())
    }
}

/// Group wire entries by (name, type) in first-seen order, skipping
/// types this provider does not manage
fn group_record_sets(
    zone: &Zone,
    rrsets: &[ResourceRecordSet],
) -> Vec<(String, RecordType, Vec<ResourceRecordSet>)> {
    let mut groups: Vec<(String, RecordType, Vec<ResourceRecordSet>)> = Vec::new();
    let mut index: HashMap<(String, RecordType), usize> = HashMap::new();

    for rrset in rrsets {
        let Ok(record_type) = rrset.record_type.parse::<RecordType>() else {
            debug!("populate: skipping unsupported {} {}", rrset.record_type, rrset.name);
            continue;
        };

        let name = zone.hostname_from_fqdn(&rrset.name);
        let key = (name.clone(), record_type);
        match index.get(&key) {
            Some(&i) => groups[i].2.push(rrset.clone()),
            None => {
                index.insert(key, groups.len());
                groups.push((name, record_type, vec![rrset.clone()]));
            }
        }
    }

    groups
}

#[async_trait]
impl ZoneProvider for GoogleDnsProvider {
    async fn populate(&mut self, zone: &mut Zone) -> Result<usize> {
        debug!("populate: name={}, project={}", zone.name(), self.project_id);

        let zone_name = zone.name().to_string();
        let rrsets = self.zone_records(&zone_name).await?;
        let groups = group_record_sets(zone, rrsets);

        let before = zone.len();
        for (name, record_type, group) in groups {
            let record = translate::record_from_rrsets(&name, record_type, &group)?;
            zone.add_record(record)?;
        }

        let found = zone.len() - before;
        info!("populate: found {} records in {}", found, zone_name);
        Ok(found)
    }

    async fn apply(&mut self, plan: &Plan) -> Result<ApplyReport> {
        debug!(
            "apply: zone={}, changes={} [mode: {}]",
            plan.zone,
            plan.changes.len(),
            if self.dry_run { "DRY-RUN" } else { "LIVE" }
        );

        let result = self.apply_changes(plan).await;

        // Dropped on failure too: a prefix of the writes may have landed
        self.invalidate_zone_records(&plan.zone);

        match &result {
            Ok(report) => info!(
                "apply: {} changes, {} writes in {}",
                report.changes, report.writes, plan.zone
            ),
            Err(e) => warn!("apply: {} aborted: {}", plan.zone, e),
        }
        result
    }

    fn supports(&self, record_type: RecordType) -> bool {
        SUPPORTS.contains(&record_type)
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

/// Factory for creating Google Cloud DNS providers
pub struct GoogleDnsFactory;

impl ZoneProviderFactory for GoogleDnsFactory {
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn ZoneProvider>> {
        match config {
            ProviderConfig::GoogleDns {
                project_id,
                access_token,
                endpoint,
                timeout_secs,
                dry_run,
            } => {
                if access_token.is_empty() {
                    return Err(Error::config("Google Cloud DNS access token is required"));
                }

                if *dry_run {
                    warn!("Google Cloud DNS provider running in DRY-RUN mode - no changes will be made");
                }

                Ok(Box::new(GoogleDnsProvider::new(
                    project_id.clone(),
                    access_token.clone(),
                    endpoint.clone(),
                    Duration::from_secs(*timeout_secs),
                    *dry_run,
                )?))
            }
            _ => Err(Error::config("Invalid config for Google Cloud DNS provider")),
        }
    }
}

/// Register the Google Cloud DNS provider with a registry
///
/// # Example
///
/// ```rust
/// use zonesync_core::ProviderRegistry;
///
/// let registry = ProviderRegistry::new();
/// zonesync_provider_googledns::register(&registry);
/// assert!(registry.has_provider("googledns"));
/// ```
pub fn register(registry: &ProviderRegistry) {
    registry.register_provider(PROVIDER_NAME, Box::new(GoogleDnsFactory));
}
