//! Test doubles and common utilities for contract tests
//!
//! The doubles record every call they receive so tests can assert on what
//! the handler sent to its collaborators, not just on the result it
//! returned.

#![allow(dead_code)]

use dyndns_core::engine::reverse_octets;
use dyndns_core::error::{Error, Result};
use dyndns_core::traits::{ObjectStore, ZoneApi};
use dyndns_core::{
    ChangeAction, ReconcileOptions, RecordType, RequestHandler, ResolverSettings, ResourceRecord,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const BUCKET: &str = "dyndns-config";
pub const HOST: &str = "home.example.com.";
pub const ZONE_ID: &str = "Z0EXAMPLE";
pub const SECRET: &str = "s3cret";

/// An ObjectStore serving one fixed body and counting fetches
pub struct CountingObjectStore {
    body: Option<Vec<u8>>,
    get_count: Arc<AtomicUsize>,
}

impl CountingObjectStore {
    /// Serve `body` for every bucket/key
    pub fn new(body: Vec<u8>) -> Self {
        Self {
            body: Some(body),
            get_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Fail every fetch
    pub fn unavailable() -> Self {
        Self {
            body: None,
            get_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the number of times get_object() was called
    pub fn get_count(&self) -> usize {
        self.get_count.load(Ordering::SeqCst)
    }

    /// Create a store that shares counters with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            body: other.body.clone(),
            get_count: Arc::clone(&other.get_count),
        }
    }
}

#[async_trait::async_trait]
impl ObjectStore for CountingObjectStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        self.get_count.fetch_add(1, Ordering::SeqCst);
        self.body
            .clone()
            .ok_or_else(|| Error::Other(format!("NoSuchKey: {}/{}", bucket, key)))
    }

    fn store_name(&self) -> &'static str {
        "counting"
    }
}

/// A ZoneApi returning a fixed listing and recording change calls
///
/// The listing never changes; it is what the zone looked like before the
/// request. Changes are only recorded, not applied.
pub struct RecordingZoneApi {
    listing: Vec<ResourceRecord>,
    list_count: Arc<AtomicUsize>,
    changes: Arc<Mutex<Vec<(ChangeAction, ResourceRecord)>>>,
    fail_on: Option<(ChangeAction, String)>,
}

impl RecordingZoneApi {
    pub fn new(listing: Vec<ResourceRecord>) -> Self {
        Self {
            listing,
            list_count: Arc::new(AtomicUsize::new(0)),
            changes: Arc::new(Mutex::new(Vec::new())),
            fail_on: None,
        }
    }

    /// Fail the change call for `action` on the record named `name`
    pub fn failing_on(mut self, action: ChangeAction, name: impl Into<String>) -> Self {
        self.fail_on = Some((action, name.into()));
        self
    }

    /// Get the number of times list_records() was called
    pub fn list_count(&self) -> usize {
        self.list_count.load(Ordering::SeqCst)
    }

    /// Every change call received, including failed ones, in order
    pub fn changes(&self) -> Vec<(ChangeAction, ResourceRecord)> {
        self.changes.lock().unwrap().clone()
    }

    /// Records passed to change calls with `action`
    pub fn changes_for(&self, action: ChangeAction) -> Vec<ResourceRecord> {
        self.changes()
            .into_iter()
            .filter(|(a, _)| *a == action)
            .map(|(_, r)| r)
            .collect()
    }

    /// Create an API that shares counters with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            listing: other.listing.clone(),
            list_count: Arc::clone(&other.list_count),
            changes: Arc::clone(&other.changes),
            fail_on: other.fail_on.clone(),
        }
    }
}

#[async_trait::async_trait]
impl ZoneApi for RecordingZoneApi {
    async fn list_records(&self, _zone_id: &str, _start_name: &str) -> Result<Vec<ResourceRecord>> {
        self.list_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.listing.clone())
    }

    async fn apply_change(
        &self,
        _zone_id: &str,
        action: ChangeAction,
        record: &ResourceRecord,
    ) -> Result<()> {
        self.changes.lock().unwrap().push((action, record.clone()));

        match &self.fail_on {
            Some((fail_action, name)) if *fail_action == action && *name == record.name => {
                Err(Error::zone_api("InvalidChangeBatch: injected failure"))
            }
            _ => Ok(()),
        }
    }

    fn api_name(&self) -> &'static str {
        "recording"
    }
}

/// Configuration document body mapping HOST to ZONE_ID with SECRET
pub fn config_body() -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({
        HOST: {"route_53_zone_id": ZONE_ID, "shared_secret": SECRET}
    }))
    .unwrap()
}

/// A typical listing for HOST: dynamic A, a reverse PTR, a TXT and the zone's NS/SOA
pub fn typical_listing(ip: &str) -> Vec<ResourceRecord> {
    vec![
        ResourceRecord::new(HOST, RecordType::A, [ip]).with_ttl(60),
        ResourceRecord::new(HOST, RecordType::Txt, [format!("\"v=spf1 ip4:{} -all\"", ip)])
            .with_ttl(300),
        ResourceRecord::new(
            format!("{}.in-addr.arpa.", reverse_octets(ip)),
            RecordType::Ptr,
            [HOST],
        )
        .with_ttl(300),
        ResourceRecord::new(HOST, RecordType::Ns, ["ns-1.awsdns-00.org."]).with_ttl(172800),
        ResourceRecord::new(
            HOST,
            RecordType::Soa,
            ["ns-1.awsdns-00.org. hostmaster.example.com. 1 7200 900 1209600 86400"],
        )
        .with_ttl(900),
    ]
}

/// Build a handler over the given doubles, sharing their counters
pub fn handler(
    store: &CountingObjectStore,
    zone: &RecordingZoneApi,
    options: ReconcileOptions,
) -> RequestHandler {
    RequestHandler::new(
        Arc::new(CountingObjectStore::sharing_counters_with(store)),
        Arc::new(RecordingZoneApi::sharing_counters_with(zone)),
        ResolverSettings::new(BUCKET),
        options,
    )
}
