//! Config resolver
//!
//! Fetches the configuration document from an [`ObjectStore`] and picks out
//! the entry for one hostname. The document is fetched on every call; there
//! is no cache and no retry.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::{ConfigDocument, ResolverSettings, ZoneConfig};
use crate::error::{Error, Result};
use crate::traits::ObjectStore;

/// Resolves hostnames to their [`ZoneConfig`]
pub struct ConfigResolver {
    store: Arc<dyn ObjectStore>,
    settings: ResolverSettings,
}

impl ConfigResolver {
    /// Create a resolver reading from `store` at the configured location
    pub fn new(store: Arc<dyn ObjectStore>, settings: ResolverSettings) -> Self {
        Self { store, settings }
    }

    /// Location of the configuration document
    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    /// Fetch and parse the whole document
    ///
    /// Any fetch or parse failure is reported as
    /// [`Error::ConfigUnavailable`]; the underlying cause is only logged.
    pub async fn load(&self) -> Result<ConfigDocument> {
        let bytes = self
            .store
            .get_object(&self.settings.bucket, &self.settings.key)
            .await
            .map_err(|e| {
                warn!(
                    store = self.store.store_name(),
                    error = %e,
                    "Failed to fetch configuration document"
                );
                Error::ConfigUnavailable
            })?;

        let document = ConfigDocument::from_slice(&bytes).map_err(|e| {
            warn!(
                store = self.store.store_name(),
                error = %e,
                "Failed to parse configuration document"
            );
            Error::ConfigUnavailable
        })?;

        debug!("Loaded configuration for {} hostname(s)", document.len());
        Ok(document)
    }

    /// Resolve the configuration for `hostname`
    ///
    /// # Returns
    ///
    /// - `Ok(ZoneConfig)`: The hostname's zone and secret
    /// - `Err(Error::ConfigUnavailable)`: Document missing or malformed
    /// - `Err(Error::UnknownHostname)`: Document has no entry for `hostname`
    pub async fn resolve(&self, hostname: &str) -> Result<ZoneConfig> {
        let document = self.load().await?;

        document.get(hostname).cloned().ok_or_else(|| {
            debug!("No configuration entry for {}", hostname);
            Error::unknown_hostname(hostname)
        })
    }
}
