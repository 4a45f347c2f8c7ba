// # Zone Provider Trait
//
// Defines the interface between the provider-neutral zone model and a
// remote authoritative DNS service.
//
// ## Implementations
//
// - Google Cloud DNS: `zonesync-provider-googledns` crate
//
// ## Usage
//
// ```rust,ignore
// use zonesync_core::{Plan, Zone, ZoneProvider};
//
// async fn sync(provider: &mut dyn ZoneProvider, plan: Plan) -> zonesync_core::Result<()> {
//     let mut zone = Zone::new("example.com.")?;
//     provider.populate(&mut zone).await?;
//
//     provider.apply(&plan).await?;
//     Ok(())
// }
// ```

use async_trait::async_trait;

use crate::plan::Plan;
use crate::record::RecordType;
use crate::zone::Zone;

/// Outcome of a successful apply
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Changes processed
    pub changes: usize,
    /// Wire-level write requests issued (or logged, in dry-run mode)
    pub writes: usize,
}

/// Trait for zone provider implementations
///
/// A provider reads the current state of a zone from its remote service and
/// executes already-decided changes against it. It never decides *what*
/// should change.
///
/// # Concurrency
///
/// Both operations take `&mut self`: providers keep private caches (zone
/// ids, record snapshots) that are populated and invalidated without
/// synchronization. Sharing one provider across tasks requires external
/// serialization.
///
/// # Errors
///
/// Transport failures are propagated unchanged; providers do not retry.
/// A zone that does not exist remotely is not an error for `populate`.
#[async_trait]
pub trait ZoneProvider: Send + Sync {
    /// Add the zone's remote records to `zone`
    ///
    /// Returns the number of records added. Remote record types this
    /// provider does not manage are skipped.
    async fn populate(&mut self, zone: &mut Zone) -> Result<usize, crate::Error>;

    /// Execute `plan.changes` in order
    ///
    /// A failure aborts the remaining writes; everything before it stays
    /// applied. Cached state for the zone is dropped either way.
    ///
    /// # Unknown zones
    ///
    /// Providers do not create zones. A zone missing from a previously
    /// fetched zone listing is looked up again once, since it may have been
    /// created after the listing. If it is still missing, `apply` returns
    /// [`Error::ZoneNotFound`](crate::Error::ZoneNotFound) before issuing
    /// any write. An empty plan succeeds without contacting the service.
    async fn apply(&mut self, plan: &Plan) -> Result<ApplyReport, crate::Error>;

    /// Whether this provider manages records of `record_type`
    fn supports(&self, record_type: RecordType) -> bool;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}

/// Helper trait for constructing zone providers from configuration
pub trait ZoneProviderFactory: Send + Sync {
    /// Create a ZoneProvider instance from configuration
    fn create(
        &self,
        config: &crate::config::ProviderConfig,
    ) -> Result<Box<dyn ZoneProvider>, crate::Error>;
}
