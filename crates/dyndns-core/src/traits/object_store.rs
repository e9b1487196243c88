// # Object Store Trait
//
// Defines the interface for fetching the configuration document.
//
// ## Implementations
//
// - S3: `dyndns-aws` crate
// - Local files: `dyndns_core::store::FileObjectStore`
// - In-memory: `dyndns_core::store::MemoryObjectStore`

use async_trait::async_trait;

/// Trait for blob stores that hold the configuration document
///
/// Implementations fetch raw bytes only. Parsing and hostname lookup
/// belong to [`crate::resolver::ConfigResolver`].
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch the object stored under `bucket`/`key`
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<u8>)`: The object body
    /// - `Err(Error)`: If the object is missing or the store is unreachable
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, crate::Error>;

    /// Get the store name (for logging/debugging)
    fn store_name(&self) -> &'static str;
}
