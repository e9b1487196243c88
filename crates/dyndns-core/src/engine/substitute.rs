//! IP substitution across a record set
//!
//! Every textual field of every record is rewritten with two plain
//! substring replacements, applied in order:
//!
//! 1. `old` → `new` (dotted quad as written)
//! 2. `reverse(old)` → `reverse(new)` (octets reversed, as found in
//!    `in-addr.arpa` names)
//!
//! The replacement is blind: a value that merely contains the
//! old address as a substring is rewritten too.

use crate::record::{AliasTarget, GeoLocation, ResourceRecord, RoutingPolicy};

/// Reverse the dot-separated octets of an address (`1.2.3.4` → `4.3.2.1`)
pub fn reverse_octets(ip: &str) -> String {
    ip.split('.').rev().collect::<Vec<_>>().join(".")
}

/// A forward and reverse replacement pair for one address change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpSubstitution {
    old: String,
    new: String,
    old_reversed: String,
    new_reversed: String,
}

impl IpSubstitution {
    /// Build the substitution replacing `old` with `new`
    pub fn new(old: impl Into<String>, new: impl Into<String>) -> Self {
        let old = old.into();
        let new = new.into();
        Self {
            old_reversed: reverse_octets(&old),
            new_reversed: reverse_octets(&new),
            old,
            new,
        }
    }

    /// Whether applying this substitution can change anything
    pub fn is_noop(&self) -> bool {
        self.old.is_empty() || (self.old == self.new && self.old_reversed == self.new_reversed)
    }

    /// Apply both replacements to one string
    pub fn apply_str(&self, text: &str) -> String {
        // An empty pattern would match between every character.
        if self.old.is_empty() {
            return text.to_string();
        }
        text.replace(&self.old, &self.new)
            .replace(&self.old_reversed, &self.new_reversed)
    }

    fn apply_opt(&self, text: &Option<String>) -> Option<String> {
        text.as_deref().map(|s| self.apply_str(s))
    }

    /// Apply both replacements to every textual field of a record
    pub fn apply(&self, record: &ResourceRecord) -> ResourceRecord {
        ResourceRecord {
            name: self.apply_str(&record.name),
            record_type: record.record_type.clone(),
            ttl: record.ttl,
            set_identifier: self.apply_opt(&record.set_identifier),
            values: record.values.iter().map(|v| self.apply_str(v)).collect(),
            alias_target: record.alias_target.as_ref().map(|target| AliasTarget {
                hosted_zone_id: self.apply_str(&target.hosted_zone_id),
                dns_name: self.apply_str(&target.dns_name),
                evaluate_target_health: target.evaluate_target_health,
            }),
            routing: self.apply_routing(&record.routing),
        }
    }

    fn apply_routing(&self, routing: &RoutingPolicy) -> RoutingPolicy {
        RoutingPolicy {
            weight: routing.weight,
            region: self.apply_opt(&routing.region),
            geo_location: routing.geo_location.as_ref().map(|geo| GeoLocation {
                continent_code: self.apply_opt(&geo.continent_code),
                country_code: self.apply_opt(&geo.country_code),
                subdivision_code: self.apply_opt(&geo.subdivision_code),
            }),
            failover: self.apply_opt(&routing.failover),
            multi_value_answer: routing.multi_value_answer,
            health_check_id: self.apply_opt(&routing.health_check_id),
        }
    }

    /// Apply the substitution to a whole set of records
    pub fn apply_all(&self, records: &[ResourceRecord]) -> Vec<ResourceRecord> {
        records.iter().map(|r| self.apply(r)).collect()
    }
}
