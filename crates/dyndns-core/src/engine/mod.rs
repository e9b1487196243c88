//! Record reconciliation
//!
//! The [`Reconciler`] is responsible for:
//! - Authenticating the caller against the hostname's shared secret
//! - Listing the zone records starting at the hostname
//! - Deleting PTR records and upserting the IP-substituted record set
//!
//! ## Flow
//!
//! ```text
//! ┌────────────────┐   resolve    ┌──────────────┐
//! │ ConfigResolver │◄─────────────│  Reconciler  │
//! └────────────────┘              └──────────────┘
//!                                        │
//!                 list / DELETE / UPSERT │
//!                                        ▼
//!                                 ┌──────────────┐
//!                                 │   ZoneApi    │
//!                                 └──────────────┘
//! ```
//!
//! ## Set Mode Steps
//!
//! 1. Query the records (same path as get mode)
//! 2. Find the current IP on the exact-match A record; more than one value
//!    aborts before any change is made
//! 3. DELETE every PTR record in the listing
//! 4. Substitute old → new IP (forward and octet-reversed) over the listing
//! 5. UPSERT every patched record except NS and SOA, one call each
//!
//! Change calls are independent. A failure part-way through leaves the zone
//! partially reconciled; running the whole operation again converges.

pub mod substitute;

use std::net::Ipv4Addr;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::{ReconcileOptions, RecordErrorPolicy};
use crate::error::{Error, Result};
use crate::record::{ChangeAction, RecordSet, RecordType, ResourceRecord};
use crate::resolver::ConfigResolver;
use crate::response::ReconciliationResult;
use crate::traits::ZoneApi;

pub use substitute::{IpSubstitution, reverse_octets};

/// What a set-mode run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Zone the changes were sent to
    pub zone_id: String,
    /// Value of the dynamic A record before the run, if there was one
    pub previous_ip: Option<String>,
    /// Address that was applied
    pub new_ip: String,
    /// Successful DELETE calls
    pub deleted: usize,
    /// Successful UPSERT calls
    pub upserted: usize,
    /// Records skipped because their type is protected
    pub skipped: usize,
    /// Changes that failed and were passed over
    pub failed: Vec<String>,
}

impl ReconcileReport {
    fn record_applied(&mut self, action: ChangeAction) {
        match action {
            ChangeAction::Delete => self.deleted += 1,
            ChangeAction::Upsert => self.upserted += 1,
        }
    }
}

/// Reconciles a hostname's zone records with a new address
pub struct Reconciler {
    resolver: ConfigResolver,
    zone_api: Arc<dyn ZoneApi>,
    options: ReconcileOptions,
}

impl Reconciler {
    /// Create a reconciler
    ///
    /// # Parameters
    ///
    /// - `resolver`: Source of per-hostname zone configuration
    /// - `zone_api`: Hosted zone client, shared across requests
    /// - `options`: Reconciliation policy
    pub fn new(
        resolver: ConfigResolver,
        zone_api: Arc<dyn ZoneApi>,
        options: ReconcileOptions,
    ) -> Self {
        Self {
            resolver,
            zone_api,
            options,
        }
    }

    /// Active reconciliation options
    pub fn options(&self) -> &ReconcileOptions {
        &self.options
    }

    /// List the records starting at `hostname` after checking `key`
    ///
    /// # Returns
    ///
    /// - `Ok(RecordSet)`: The zone listing, tagged with its zone id
    /// - `Err(Error::Authentication)`: `key` does not match; the zone is not queried
    /// - `Err(Error)`: Config or zone API failure
    pub async fn query_records(&self, key: &str, hostname: &str) -> Result<RecordSet> {
        let config = self.resolver.resolve(hostname).await?;

        if !config.authorizes(key) {
            warn!(hostname, "Rejected request with invalid key");
            return Err(Error::auth("Invalid key."));
        }

        debug!(
            "Listing records in zone {} starting at {}",
            config.zone_id, hostname
        );
        let records = self.zone_api.list_records(&config.zone_id, hostname).await?;

        Ok(RecordSet::new(config.zone_id, records))
    }

    /// Point `hostname` at `new_ip`, reporting the outcome as data
    pub async fn reconcile(&self, key: &str, hostname: &str, new_ip: &str) -> ReconciliationResult {
        match self.try_reconcile(key, hostname, new_ip).await {
            Ok(report) => ReconciliationResult::applied(report.new_ip),
            Err(e) => ReconciliationResult::from(e),
        }
    }

    /// Point `hostname` at `new_ip`
    ///
    /// # Returns
    ///
    /// - `Ok(ReconcileReport)`: All changes were issued (some may have
    ///   failed under [`RecordErrorPolicy::Continue`])
    /// - `Err(Error)`: Invalid input, config/auth failure, multi-valued A
    ///   record, or a failed change under [`RecordErrorPolicy::Abort`]
    pub async fn try_reconcile(
        &self,
        key: &str,
        hostname: &str,
        new_ip: &str,
    ) -> Result<ReconcileReport> {
        let new_ip: Ipv4Addr = new_ip
            .parse()
            .map_err(|_| Error::invalid_input(format!("'{}' is not an IPv4 address", new_ip)))?;
        let new_ip = new_ip.to_string();

        let record_set = self.query_records(key, hostname).await?;
        let previous_ip = current_ip(&record_set.records, hostname)?;

        info!(
            "Reconciling {} in zone {}: {} -> {} ({} record(s) listed)",
            hostname,
            record_set.zone_id,
            previous_ip.as_deref().unwrap_or("<none>"),
            new_ip,
            record_set.len()
        );

        let mut report = ReconcileReport {
            zone_id: record_set.zone_id.clone(),
            previous_ip: previous_ip.clone(),
            new_ip: new_ip.clone(),
            ..ReconcileReport::default()
        };

        // Reverse records are recreated out of band once the forward record is live.
        for record in record_set
            .records
            .iter()
            .filter(|r| r.record_type == RecordType::Ptr)
        {
            self.apply(&record_set.zone_id, ChangeAction::Delete, record, &mut report)
                .await?;
        }

        let substitution =
            IpSubstitution::new(previous_ip.as_deref().unwrap_or_default(), new_ip.as_str());
        let patched = if substitution.is_noop() {
            debug!("No address to substitute, upserting records as listed");
            record_set.records.clone()
        } else {
            substitution.apply_all(&record_set.records)
        };

        for record in &patched {
            if record.record_type.is_protected() {
                debug!("Skipping protected {} record {}", record.record_type, record.name);
                report.skipped += 1;
                continue;
            }
            self.apply(&record_set.zone_id, ChangeAction::Upsert, record, &mut report)
                .await?;
        }

        info!(
            "Reconciled {}: {} deleted, {} upserted, {} skipped, {} failed",
            hostname,
            report.deleted,
            report.upserted,
            report.skipped,
            report.failed.len()
        );

        Ok(report)
    }

    async fn apply(
        &self,
        zone_id: &str,
        action: ChangeAction,
        record: &ResourceRecord,
        report: &mut ReconcileReport,
    ) -> Result<()> {
        debug!("{} {} {}", action, record.record_type, record.name);

        match self.zone_api.apply_change(zone_id, action, record).await {
            Ok(()) => {
                report.record_applied(action);
                Ok(())
            }
            Err(e) => {
                let description = format!("{} {} {}", action, record.record_type, record.name);
                match self.options.on_record_error {
                    RecordErrorPolicy::Continue => {
                        warn!("{} failed, continuing: {}", description, e);
                        report.failed.push(description);
                        Ok(())
                    }
                    RecordErrorPolicy::Abort => {
                        Err(Error::zone_api(format!("{} failed: {}", description, e)))
                    }
                }
            }
        }
    }
}

/// Find the single value of the dynamic A record for `hostname`
///
/// A record with no values leaves the current IP unset. Every matching
/// record is checked, so a multi-valued one fails even if another matching
/// record was single-valued.
fn current_ip(records: &[ResourceRecord], hostname: &str) -> Result<Option<String>> {
    let mut current = None;

    for record in records.iter().filter(|r| r.is_dynamic_a(hostname)) {
        match record.values.as_slice() {
            [] => {}
            [value] => current = Some(value.clone()),
            values => return Err(Error::multiple_values(&record.name, values.len())),
        }
    }

    Ok(current)
}
