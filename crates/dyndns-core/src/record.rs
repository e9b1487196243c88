//! Resource record model
//!
//! Typed view of what the zone API returns from a prefix listing and what
//! it accepts back in a change request.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// DNS record type
///
/// Types this crate reasons about get their own variant; everything else
/// round-trips through [`RecordType::Other`] untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordType {
    A,
    Aaaa,
    Cname,
    Mx,
    Ns,
    Ptr,
    Soa,
    Srv,
    Txt,
    Other(String),
}

impl RecordType {
    /// Wire name of the type (e.g. `"A"`, `"PTR"`)
    pub fn as_str(&self) -> &str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Cname => "CNAME",
            RecordType::Mx => "MX",
            RecordType::Ns => "NS",
            RecordType::Ptr => "PTR",
            RecordType::Soa => "SOA",
            RecordType::Srv => "SRV",
            RecordType::Txt => "TXT",
            RecordType::Other(name) => name,
        }
    }

    /// Zone-infrastructure types that the update path must never touch
    pub fn is_protected(&self) -> bool {
        matches!(self, RecordType::Ns | RecordType::Soa)
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "A" => RecordType::A,
            "AAAA" => RecordType::Aaaa,
            "CNAME" => RecordType::Cname,
            "MX" => RecordType::Mx,
            "NS" => RecordType::Ns,
            "PTR" => RecordType::Ptr,
            "SOA" => RecordType::Soa,
            "SRV" => RecordType::Srv,
            "TXT" => RecordType::Txt,
            other => RecordType::Other(other.to_string()),
        })
    }
}

impl From<String> for RecordType {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(record_type) => record_type,
            Err(never) => match never {},
        }
    }
}

impl From<RecordType> for String {
    fn from(record_type: RecordType) -> Self {
        record_type.as_str().to_string()
    }
}

/// A single resource record set as the zone API sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecord {
    /// Fully-qualified name, exactly as the zone API reports it
    pub name: String,

    /// Record type
    #[serde(rename = "type")]
    pub record_type: RecordType,

    /// Time-to-live in seconds (absent for alias-style records)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,

    /// Routing-policy set identifier, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_identifier: Option<String>,

    /// Record values, in zone order (empty for alias records)
    #[serde(default)]
    pub values: Vec<String>,

    /// Target of an alias record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias_target: Option<AliasTarget>,

    /// Weighted, latency, failover, geolocation and health-check attributes
    #[serde(default, skip_serializing_if = "RoutingPolicy::is_empty")]
    pub routing: RoutingPolicy,
}

/// Where an alias record points
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasTarget {
    /// Hosted zone of the target
    pub hosted_zone_id: String,
    /// DNS name of the target
    pub dns_name: String,
    #[serde(default)]
    pub evaluate_target_health: bool,
}

impl AliasTarget {
    pub fn new(hosted_zone_id: impl Into<String>, dns_name: impl Into<String>) -> Self {
        Self {
            hosted_zone_id: hosted_zone_id.into(),
            dns_name: dns_name.into(),
            evaluate_target_health: false,
        }
    }
}

/// Geolocation routing key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoLocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continent_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subdivision_code: Option<String>,
}

/// Routing-policy attributes a record set must be written back with
///
/// A record set that carries a set identifier is rejected on upsert unless
/// its policy attribute (weight, region, ...) is sent along with it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingPolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo_location: Option<GeoLocation>,
    /// `PRIMARY` or `SECONDARY`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failover: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_value_answer: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_check_id: Option<String>,
}

impl RoutingPolicy {
    /// Whether no routing attribute is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl ResourceRecord {
    /// Create a record with the given name, type and values
    pub fn new(
        name: impl Into<String>,
        record_type: RecordType,
        values: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            record_type,
            ttl: None,
            set_identifier: None,
            values: values.into_iter().map(Into::into).collect(),
            alias_target: None,
            routing: RoutingPolicy::default(),
        }
    }

    /// Create an alias record with no values
    pub fn alias(name: impl Into<String>, record_type: RecordType, target: AliasTarget) -> Self {
        Self {
            alias_target: Some(target),
            ..Self::new(name, record_type, Vec::<String>::new())
        }
    }

    /// Set the TTL
    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Set the routing-policy set identifier
    pub fn with_set_identifier(mut self, set_identifier: impl Into<String>) -> Self {
        self.set_identifier = Some(set_identifier.into());
        self
    }

    /// Set the routing-policy attributes
    pub fn with_routing(mut self, routing: RoutingPolicy) -> Self {
        self.routing = routing;
        self
    }

    /// Whether this record is the dynamic A record for `hostname`
    pub fn is_dynamic_a(&self, hostname: &str) -> bool {
        self.name == hostname && self.record_type == RecordType::A
    }
}

/// Records returned by one prefix listing, together with their zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSet {
    /// Owning hosted zone
    pub zone_id: String,

    /// Records whose name sorts at or after the requested start name
    #[serde(rename = "resource_record_sets")]
    pub records: Vec<ResourceRecord>,
}

impl RecordSet {
    /// Create a record set for a zone
    pub fn new(zone_id: impl Into<String>, records: Vec<ResourceRecord>) -> Self {
        Self {
            zone_id: zone_id.into(),
            records,
        }
    }

    /// Number of records in the set
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the listing came back empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Kind of change sent to the zone API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeAction {
    /// Remove the record identified by (name, type)
    Delete,
    /// Insert or replace the record identified by (name, type)
    Upsert,
}

impl ChangeAction {
    /// Wire name of the action
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeAction::Delete => "DELETE",
            ChangeAction::Upsert => "UPSERT",
        }
    }
}

impl fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_type_parse() {
        assert_eq!("A".parse::<RecordType>().unwrap(), RecordType::A);
        assert_eq!("PTR".parse::<RecordType>().unwrap(), RecordType::Ptr);
        assert_eq!(
            "CAA".parse::<RecordType>().unwrap(),
            RecordType::Other("CAA".to_string())
        );
    }

    #[test]
    fn test_protected_types() {
        assert!(RecordType::Ns.is_protected());
        assert!(RecordType::Soa.is_protected());
        assert!(!RecordType::A.is_protected());
        assert!(!RecordType::Ptr.is_protected());
    }

    #[test]
    fn test_record_json_shape() {
        let record = ResourceRecord::new("home.example.com.", RecordType::A, ["1.2.3.4"])
            .with_ttl(300);
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["type"], "A");
        assert_eq!(json["ttl"], 300);
        assert_eq!(json["values"][0], "1.2.3.4");
        assert!(json.get("set_identifier").is_none());
    }

    #[test]
    fn test_unknown_type_survives_serde() {
        let json = r#"{"name":"example.com.","type":"CAA","values":["0 issue \"ca\""]}"#;
        let record: ResourceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.record_type, RecordType::Other("CAA".to_string()));

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["type"], "CAA");
    }

    #[test]
    fn test_alias_and_routing_json_shape() {
        let plain = serde_json::to_value(ResourceRecord::new("a.", RecordType::A, ["1.2.3.4"]))
            .unwrap();
        assert!(plain.get("alias_target").is_none());
        assert!(plain.get("routing").is_none());

        let record = ResourceRecord::alias(
            "www.example.com.",
            RecordType::A,
            AliasTarget::new("Z2", "lb.example.net."),
        )
        .with_set_identifier("one")
        .with_routing(RoutingPolicy {
            weight: Some(10),
            ..RoutingPolicy::default()
        });
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["alias_target"]["dns_name"], "lb.example.net.");
        assert_eq!(json["routing"]["weight"], 10);
        assert!(json["routing"].get("region").is_none());

        let back: ResourceRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_is_dynamic_a_requires_exact_name() {
        let record = ResourceRecord::new("home.example.com.", RecordType::A, ["1.2.3.4"]);
        assert!(record.is_dynamic_a("home.example.com."));
        assert!(!record.is_dynamic_a("home.example.com"));
        assert!(!record.is_dynamic_a("www.home.example.com."));
    }

    #[test]
    fn test_change_action_wire_names() {
        assert_eq!(ChangeAction::Delete.to_string(), "DELETE");
        assert_eq!(ChangeAction::Upsert.as_str(), "UPSERT");
    }
}
