//! Daemon configuration from environment variables

use anyhow::Result;
use dyndns_aws::{Credentials, DEFAULT_ROUTE53_REGION, DEFAULT_S3_REGION};
use dyndns_core::config::DEFAULT_CONFIG_KEY;
use dyndns_core::{RecordErrorPolicy, ReconcileOptions, ResolverSettings};
use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

/// Where the configuration document is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// S3 bucket in the configured region
    S3,
    /// `<root>/<bucket>/<key>` on local disk
    File(PathBuf),
}

/// Application configuration
pub struct Config {
    pub config_source: ConfigSource,
    pub config_bucket: String,
    pub config_key: String,
    pub config_region: String,
    pub zone_region: String,
    pub credentials: Credentials,
    pub listen_addr: String,
    pub on_record_error: String,
    pub dry_run: bool,
    pub log_level: String,
}

// Custom Debug implementation that hides the credentials
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("config_source", &self.config_source)
            .field("config_bucket", &self.config_bucket)
            .field("config_key", &self.config_key)
            .field("config_region", &self.config_region)
            .field("zone_region", &self.zone_region)
            .field("credentials", &self.credentials)
            .field("listen_addr", &self.listen_addr)
            .field("on_record_error", &self.on_record_error)
            .field("dry_run", &self.dry_run)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        let config_source = match var("DYNDNS_CONFIG_SOURCE", "s3").to_lowercase().as_str() {
            "s3" => ConfigSource::S3,
            "file" => ConfigSource::File(PathBuf::from(var("DYNDNS_CONFIG_ROOT", ""))),
            other => anyhow::bail!(
                "DYNDNS_CONFIG_SOURCE '{}' is not supported. Supported sources: s3, file",
                other
            ),
        };

        let config_bucket = lookup("DYNDNS_CONFIG_BUCKET").ok_or_else(|| {
            anyhow::anyhow!(
                "DYNDNS_CONFIG_BUCKET is required. \
                Set it via: export DYNDNS_CONFIG_BUCKET=your-bucket"
            )
        })?;

        Ok(Self {
            config_source,
            config_bucket,
            config_key: var("DYNDNS_CONFIG_KEY", DEFAULT_CONFIG_KEY),
            config_region: var("DYNDNS_CONFIG_REGION", DEFAULT_S3_REGION),
            zone_region: var("DYNDNS_ZONE_REGION", DEFAULT_ROUTE53_REGION),
            credentials: Credentials::from_lookup(&lookup)?,
            listen_addr: var("DYNDNS_LISTEN_ADDR", DEFAULT_LISTEN_ADDR),
            on_record_error: var("DYNDNS_ON_RECORD_ERROR", "continue"),
            dry_run: var("DYNDNS_MODE", "").to_lowercase() == "dry-run",
            log_level: var("DYNDNS_LOG_LEVEL", "info"),
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.resolver_settings().validate()?;

        if let ConfigSource::File(ref root) = self.config_source {
            if root.as_os_str().is_empty() {
                anyhow::bail!(
                    "DYNDNS_CONFIG_ROOT is required when DYNDNS_CONFIG_SOURCE=file. \
                    Set it via: export DYNDNS_CONFIG_ROOT=/etc/dyndns"
                );
            }
            if !root.is_dir() {
                anyhow::bail!(
                    "DYNDNS_CONFIG_ROOT does not exist or is not a directory: {}",
                    root.display()
                );
            }
        }

        for (name, region) in [
            ("DYNDNS_CONFIG_REGION", &self.config_region),
            ("DYNDNS_ZONE_REGION", &self.zone_region),
        ] {
            if region.is_empty()
                || !region
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
            {
                anyhow::bail!("{} '{}' is not a valid AWS region", name, region);
            }
        }

        self.listen_addr()?;
        self.reconcile_options()?;

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "DYNDNS_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }

    /// Parsed listen address
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen_addr.parse().map_err(|e| {
            anyhow::anyhow!(
                "DYNDNS_LISTEN_ADDR '{}' is not a socket address: {}",
                self.listen_addr,
                e
            )
        })
    }

    /// Location of the configuration document
    pub fn resolver_settings(&self) -> ResolverSettings {
        ResolverSettings::new(self.config_bucket.clone()).with_key(self.config_key.clone())
    }

    /// Reconciliation policy
    pub fn reconcile_options(&self) -> Result<ReconcileOptions> {
        let policy: RecordErrorPolicy = self.on_record_error.parse()?;
        Ok(ReconcileOptions::default().with_record_error_policy(policy))
    }
}
