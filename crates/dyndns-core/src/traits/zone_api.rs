// # Zone API Trait
//
// Defines the interface to the remote DNS-zone service.
//
// ## Implementations
//
// - Route 53: `dyndns-aws` crate
// - In-memory: `dyndns_core::store::MemoryZoneApi`
//
// ## Usage
//
// ```rust,ignore
// use dyndns_core::traits::ZoneApi;
// use dyndns_core::record::ChangeAction;
//
// let records = zone_api.list_records("Z123", "home.example.com.").await?;
// for record in &records {
//     zone_api.apply_change("Z123", ChangeAction::Upsert, record).await?;
// }
// ```

use async_trait::async_trait;

use crate::record::{ChangeAction, ResourceRecord};

/// Trait for DNS-zone API implementations
///
/// # Thread Safety
///
/// One handle is shared by every request the process serves, so
/// implementations must be `Send + Sync` and keep no per-request state.
///
/// # Contract
///
/// - `list_records` is a prefix scan: it returns one page of records whose
///   name sorts at or after `start_name`, not only exact matches.
/// - `apply_change` applies exactly one change. No batching, no retry;
///   the reconciler decides what a failure means.
/// - Upsert replaces by (name, type), which makes re-running a whole
///   reconciliation safe.
#[async_trait]
pub trait ZoneApi: Send + Sync {
    /// List records in `zone_id` starting at `start_name`
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<ResourceRecord>)`: One page of records in zone order
    /// - `Err(Error)`: If the zone could not be queried
    async fn list_records(
        &self,
        zone_id: &str,
        start_name: &str,
    ) -> Result<Vec<ResourceRecord>, crate::Error>;

    /// Apply one change to `zone_id`
    ///
    /// # Parameters
    ///
    /// - `zone_id`: Hosted zone identifier
    /// - `action`: Delete or upsert
    /// - `record`: The full record; deletes must match the stored record
    async fn apply_change(
        &self,
        zone_id: &str,
        action: ChangeAction,
        record: &ResourceRecord,
    ) -> Result<(), crate::Error>;

    /// Get the zone API name (for logging/debugging)
    fn api_name(&self) -> &'static str;
}
