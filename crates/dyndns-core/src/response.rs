//! Structured results returned to the caller
//!
//! Every outcome, success or failure, is a [`ReconciliationResult`]. The
//! JSON shape is what the gateway hands back to the client:
//!
//! ```json
//! { "return_status": "success", "return_message": "set new ip: 5.6.7.8",
//!   "applied_ip": "5.6.7.8" }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::record::{RecordSet, ResourceRecord};

/// Outcome status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnStatus {
    Success,
    Fail,
}

/// Result of one handled request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationResult {
    /// `success` or `fail`
    pub return_status: ReturnStatus,

    /// Human-readable outcome
    pub return_message: String,

    /// Address written to the zone (set mode)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applied_ip: Option<String>,

    /// Zone the records belong to (get mode)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<String>,

    /// Records returned by the zone listing (get mode)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_record_sets: Option<Vec<ResourceRecord>>,
}

impl ReconciliationResult {
    /// A successful result with a message
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            return_status: ReturnStatus::Success,
            return_message: message.into(),
            applied_ip: None,
            zone_id: None,
            resource_record_sets: None,
        }
    }

    /// A failed result with a message
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            return_status: ReturnStatus::Fail,
            return_message: message.into(),
            applied_ip: None,
            zone_id: None,
            resource_record_sets: None,
        }
    }

    /// Success result for set mode
    pub fn applied(new_ip: impl Into<String>) -> Self {
        let new_ip = new_ip.into();
        Self {
            applied_ip: Some(new_ip.clone()),
            ..Self::success(format!("set new ip: {}", new_ip))
        }
    }

    /// Success result for get mode, carrying the listing
    pub fn records(hostname: &str, record_set: RecordSet) -> Self {
        let RecordSet { zone_id, records } = record_set;
        Self {
            zone_id: Some(zone_id),
            ..Self::success(format!(
                "found {} record(s) starting at {}",
                records.len(),
                hostname
            ))
        }
        .with_records(records)
    }

    fn with_records(mut self, records: Vec<ResourceRecord>) -> Self {
        self.resource_record_sets = Some(records);
        self
    }

    /// Whether the request succeeded
    pub fn is_success(&self) -> bool {
        self.return_status == ReturnStatus::Success
    }
}

impl From<Error> for ReconciliationResult {
    fn from(err: Error) -> Self {
        Self::fail(err.to_string())
    }
}

impl From<&Error> for ReconciliationResult {
    fn from(err: &Error) -> Self {
        Self::fail(err.to_string())
    }
}
