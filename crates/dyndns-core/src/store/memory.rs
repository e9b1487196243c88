// # Memory Collaborators
//
// In-memory implementations of ObjectStore and ZoneApi.
//
// ## Purpose
//
// Provide a working config store and hosted zone without any network
// access. Useful for tests, local runs of the daemon, and embedding the
// handler in another program.
//
// ## Zone Semantics
//
// MemoryZoneApi mirrors the parts of a hosted zone the reconciler relies on:
// - listing is a prefix scan in name order, capped at one page
// - upsert replaces by (name, type, set identifier)
// - delete fails unless an identical record exists

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::Error;
use crate::record::{ChangeAction, ResourceRecord};
use crate::traits::{ObjectStore, ZoneApi};

/// Default number of records returned by one listing
pub const DEFAULT_PAGE_SIZE: usize = 300;

/// In-memory object store
///
/// # Example
///
/// ```rust
/// use dyndns_core::store::MemoryObjectStore;
/// use dyndns_core::traits::ObjectStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = MemoryObjectStore::new();
///     store.put_object("bucket", "DynDNSConf.txt", b"{}".to_vec());
///
///     let body = store.get_object("bucket", "DynDNSConf.txt").await?;
///     assert_eq!(body, b"{}");
///     Ok(())
/// }
/// ```
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: RwLock<HashMap<(String, String), Vec<u8>>>,
    get_count: AtomicUsize,
}

impl MemoryObjectStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store (or replace) an object
    pub fn put_object(&self, bucket: impl Into<String>, key: impl Into<String>, body: Vec<u8>) {
        let mut guard = self.objects.write().unwrap_or_else(|e| e.into_inner());
        guard.insert((bucket.into(), key.into()), body);
    }

    /// Number of `get_object` calls served so far
    pub fn get_count(&self) -> usize {
        self.get_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, Error> {
        self.get_count.fetch_add(1, Ordering::SeqCst);

        let guard = self.objects.read().unwrap_or_else(|e| e.into_inner());
        guard
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| Error::Other(format!("No such object: {}/{}", bucket, key)))
    }

    fn store_name(&self) -> &'static str {
        "memory"
    }
}

/// In-memory hosted zones
#[derive(Debug)]
pub struct MemoryZoneApi {
    zones: RwLock<HashMap<String, Vec<ResourceRecord>>>,
    changes: RwLock<Vec<(ChangeAction, ResourceRecord)>>,
    page_size: usize,
}

impl Default for MemoryZoneApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryZoneApi {
    /// Create an API with no zones
    pub fn new() -> Self {
        Self {
            zones: RwLock::new(HashMap::new()),
            changes: RwLock::new(Vec::new()),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Limit the number of records a single listing returns
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Create (or replace) a zone with the given records
    pub fn insert_zone(&self, zone_id: impl Into<String>, records: Vec<ResourceRecord>) {
        let mut guard = self.zones.write().unwrap_or_else(|e| e.into_inner());
        guard.insert(zone_id.into(), records);
    }

    /// All records currently in a zone, in name order
    pub fn records(&self, zone_id: &str) -> Vec<ResourceRecord> {
        let guard = self.zones.read().unwrap_or_else(|e| e.into_inner());
        let mut records = guard.get(zone_id).cloned().unwrap_or_default();
        records.sort_by(|a, b| record_order(a).cmp(&record_order(b)));
        records
    }

    /// Find a record by name and type
    pub fn find(&self, zone_id: &str, name: &str, record_type: &str) -> Option<ResourceRecord> {
        self.records(zone_id)
            .into_iter()
            .find(|r| r.name == name && r.record_type.as_str() == record_type)
    }

    /// Every change applied so far, in order
    pub fn changes(&self) -> Vec<(ChangeAction, ResourceRecord)> {
        self.changes
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

fn record_order(record: &ResourceRecord) -> (&str, &str, &str) {
    (
        record.name.as_str(),
        record.record_type.as_str(),
        record.set_identifier.as_deref().unwrap_or(""),
    )
}

fn same_identity(a: &ResourceRecord, b: &ResourceRecord) -> bool {
    a.name == b.name && a.record_type == b.record_type && a.set_identifier == b.set_identifier
}

#[async_trait]
impl ZoneApi for MemoryZoneApi {
    async fn list_records(
        &self,
        zone_id: &str,
        start_name: &str,
    ) -> Result<Vec<ResourceRecord>, Error> {
        let guard = self.zones.read().unwrap_or_else(|e| e.into_inner());
        let records = guard
            .get(zone_id)
            .ok_or_else(|| Error::zone_api(format!("No such hosted zone: {}", zone_id)))?;

        let mut page: Vec<ResourceRecord> = records
            .iter()
            .filter(|r| r.name.as_str() >= start_name)
            .cloned()
            .collect();
        page.sort_by(|a, b| record_order(a).cmp(&record_order(b)));
        page.truncate(self.page_size);

        Ok(page)
    }

    async fn apply_change(
        &self,
        zone_id: &str,
        action: ChangeAction,
        record: &ResourceRecord,
    ) -> Result<(), Error> {
        let mut guard = self.zones.write().unwrap_or_else(|e| e.into_inner());
        let records = guard
            .get_mut(zone_id)
            .ok_or_else(|| Error::zone_api(format!("No such hosted zone: {}", zone_id)))?;

        match action {
            ChangeAction::Upsert => {
                match records.iter_mut().find(|r| same_identity(r, record)) {
                    Some(existing) => *existing = record.clone(),
                    None => records.push(record.clone()),
                }
            }
            ChangeAction::Delete => {
                let position = records.iter().position(|r| r == record).ok_or_else(|| {
                    Error::zone_api(format!(
                        "Tried to delete resource record set {} type {} but it was not found",
                        record.name, record.record_type
                    ))
                })?;
                records.remove(position);
            }
        }
        drop(guard);

        self.changes
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push((action, record.clone()));

        Ok(())
    }

    fn api_name(&self) -> &'static str {
        "memory"
    }
}
