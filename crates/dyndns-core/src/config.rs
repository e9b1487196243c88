//! Configuration types for the dyndns system
//!
//! Two kinds of configuration live here:
//!
//! - the per-hostname [`ZoneConfig`] entries stored in the remote config
//!   document, fetched fresh on every request
//! - deployment settings ([`ResolverSettings`], [`ReconcileOptions`]) fixed
//!   when the handler is built

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default object key of the configuration document
pub const DEFAULT_CONFIG_KEY: &str = "DynDNSConf.txt";

/// Per-hostname zone configuration
///
/// The `Debug` implementation does not expose the shared secret.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneConfig {
    /// Hosted zone that owns the hostname
    #[serde(rename = "route_53_zone_id")]
    pub zone_id: String,

    /// Secret the caller must present as `key`
    pub shared_secret: String,
}

impl ZoneConfig {
    /// Create a new zone configuration
    pub fn new(zone_id: impl Into<String>, shared_secret: impl Into<String>) -> Self {
        Self {
            zone_id: zone_id.into(),
            shared_secret: shared_secret.into(),
        }
    }

    /// Check a caller-supplied key against the shared secret
    pub fn authorizes(&self, key: &str) -> bool {
        self.shared_secret == key
    }
}

impl std::fmt::Debug for ZoneConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZoneConfig")
            .field("zone_id", &self.zone_id)
            .field("shared_secret", &"<REDACTED>")
            .finish()
    }
}

/// The whole configuration document: hostname → zone configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigDocument {
    entries: HashMap<String, ZoneConfig>,
}

impl ConfigDocument {
    /// Parse a document from raw bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self, crate::Error> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Look up the entry for a hostname
    pub fn get(&self, hostname: &str) -> Option<&ZoneConfig> {
        self.entries.get(hostname)
    }

    /// Number of managed hostnames
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the document has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Where the configuration document lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverSettings {
    /// Bucket holding the document
    pub bucket: String,

    /// Object key of the document
    #[serde(default = "default_config_key")]
    pub key: String,
}

impl ResolverSettings {
    /// Create settings for a bucket using the default key
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: default_config_key(),
        }
    }

    /// Use a different object key
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.bucket.is_empty() {
            return Err(crate::Error::config("Config bucket cannot be empty"));
        }
        if self.key.is_empty() {
            return Err(crate::Error::config("Config key cannot be empty"));
        }
        Ok(())
    }
}

fn default_config_key() -> String {
    DEFAULT_CONFIG_KEY.to_string()
}

/// What the reconciler does when a single delete/upsert call fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordErrorPolicy {
    /// Log the failure and keep going; the request still reports success
    #[default]
    Continue,
    /// Stop at the first failed change and report failure
    Abort,
}

impl std::str::FromStr for RecordErrorPolicy {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "continue" => Ok(RecordErrorPolicy::Continue),
            "abort" => Ok(RecordErrorPolicy::Abort),
            other => Err(crate::Error::config(format!(
                "Unknown record error policy '{}'. Valid: continue, abort",
                other
            ))),
        }
    }
}

/// Reconciler settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileOptions {
    /// Policy for failed per-record change calls
    #[serde(default)]
    pub on_record_error: RecordErrorPolicy,
}

impl ReconcileOptions {
    /// Set the record error policy
    pub fn with_record_error_policy(mut self, policy: RecordErrorPolicy) -> Self {
        self.on_record_error = policy;
        self
    }
}
