//! Request dispatcher
//!
//! Turns one inbound gateway event into one [`ReconciliationResult`]. The
//! handler never fails: every error, expected or not, comes back as a
//! `fail` result.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::{ReconcileOptions, ResolverSettings};
use crate::engine::Reconciler;
use crate::error::{Error, Result};
use crate::resolver::ConfigResolver;
use crate::response::ReconciliationResult;
use crate::traits::{ObjectStore, ZoneApi};

/// Operation selector carried in `execution_mode`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Return the zone listing for the hostname
    Get,
    /// Point the hostname at the caller's IP
    Set,
}

impl FromStr for ExecutionMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "get" => Ok(ExecutionMode::Get),
            "set" => Ok(ExecutionMode::Set),
            other => Err(Error::bad_mode(other)),
        }
    }
}

/// Inbound event as delivered by the gateway
///
/// Fields are optional at the type level so that an absent field becomes a
/// [`Error::MissingField`] result instead of a parse failure.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundEvent {
    #[serde(default)]
    pub execution_mode: Option<String>,
    #[serde(default)]
    pub source_ip: Option<String>,
    #[serde(default)]
    pub set_hostname: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
}

impl std::fmt::Debug for InboundEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InboundEvent")
            .field("execution_mode", &self.execution_mode)
            .field("source_ip", &self.source_ip)
            .field("set_hostname", &self.set_hostname)
            .field("key", &self.key.as_ref().map(|_| "<REDACTED>"))
            .finish()
    }
}

impl InboundEvent {
    /// Build a complete event
    pub fn new(
        execution_mode: impl Into<String>,
        source_ip: impl Into<String>,
        set_hostname: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            execution_mode: Some(execution_mode.into()),
            source_ip: Some(source_ip.into()),
            set_hostname: Some(set_hostname.into()),
            key: Some(key.into()),
        }
    }

    /// Check that all four fields are present
    ///
    /// Fields are checked in a fixed order and the first absent one is
    /// reported.
    pub fn validate(&self) -> Result<ValidatedEvent<'_>> {
        let execution_mode = required(&self.execution_mode, "execution_mode")?;
        let source_ip = required(&self.source_ip, "source_ip")?;
        let set_hostname = required(&self.set_hostname, "set_hostname")?;
        let key = required(&self.key, "key")?;

        Ok(ValidatedEvent {
            execution_mode,
            source_ip,
            set_hostname,
            key,
        })
    }
}

fn required<'a>(field: &'a Option<String>, name: &'static str) -> Result<&'a str> {
    field.as_deref().ok_or(Error::MissingField(name))
}

/// An event with every required field present
#[derive(Clone, Copy)]
pub struct ValidatedEvent<'a> {
    pub execution_mode: &'a str,
    pub source_ip: &'a str,
    pub set_hostname: &'a str,
    pub key: &'a str,
}

/// Dispatches events to the query and reconcile operations
pub struct RequestHandler {
    reconciler: Reconciler,
}

impl RequestHandler {
    /// Build a handler from its collaborators
    ///
    /// # Parameters
    ///
    /// - `object_store`: Store holding the configuration document
    /// - `zone_api`: Hosted zone client
    /// - `settings`: Location of the configuration document
    /// - `options`: Reconciliation policy
    pub fn new(
        object_store: Arc<dyn ObjectStore>,
        zone_api: Arc<dyn ZoneApi>,
        settings: ResolverSettings,
        options: ReconcileOptions,
    ) -> Self {
        let resolver = ConfigResolver::new(object_store, settings);
        Self {
            reconciler: Reconciler::new(resolver, zone_api, options),
        }
    }

    /// The reconciler this handler dispatches to
    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    /// Handle one event
    pub async fn handle(&self, event: &InboundEvent) -> ReconciliationResult {
        let event = match event.validate() {
            Ok(event) => event,
            Err(e) => {
                warn!("Rejected malformed event: {}", e);
                return e.into();
            }
        };

        let mode = match event.execution_mode.parse::<ExecutionMode>() {
            Ok(mode) => mode,
            Err(e) => {
                warn!("Rejected event with mode '{}'", event.execution_mode);
                return e.into();
            }
        };

        info!(
            "Handling {:?} request for {} from {}",
            mode, event.set_hostname, event.source_ip
        );

        let result = match mode {
            ExecutionMode::Get => match self
                .reconciler
                .query_records(event.key, event.set_hostname)
                .await
            {
                Ok(record_set) => ReconciliationResult::records(event.set_hostname, record_set),
                Err(e) => e.into(),
            },
            ExecutionMode::Set => {
                self.reconciler
                    .reconcile(event.key, event.set_hostname, event.source_ip)
                    .await
            }
        };

        if !result.is_success() {
            warn!(
                "{:?} request for {} failed: {}",
                mode, event.set_hostname, result.return_message
            );
        }

        result
    }

    /// Handle an event given as raw JSON
    ///
    /// A body that is not a JSON object of string fields becomes a `fail`
    /// result like any other error.
    pub async fn handle_value(&self, value: serde_json::Value) -> ReconciliationResult {
        match serde_json::from_value::<InboundEvent>(value) {
            Ok(event) => self.handle(&event).await,
            Err(e) => {
                warn!("Rejected unparseable event: {}", e);
                Error::invalid_input(format!("Malformed event: {}", e)).into()
            }
        }
    }
}
