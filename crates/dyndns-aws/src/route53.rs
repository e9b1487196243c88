//! Route 53 hosted zone client
//!
//! ## API Reference
//!
//! - Route 53 API 2013-04-01: https://docs.aws.amazon.com/Route53/latest/APIReference/
//! - List record sets: GET `/2013-04-01/hostedzone/:id/rrset?name=...`
//! - Change record sets: POST `/2013-04-01/hostedzone/:id/rrset`
//!
//! Listing returns a single page starting at the requested name. Every
//! change is sent as its own one-change batch.

use async_trait::async_trait;
use dyndns_core::traits::ZoneApi;
use dyndns_core::{
    AliasTarget, ChangeAction, Error, GeoLocation, RecordType, ResourceRecord, Result,
    RoutingPolicy,
};
use tracing::{debug, info};

use crate::http::{SignedRequest, build_client, endpoint_host, status_error};
use crate::sigv4::{Credentials, SignableRequest, SigV4Signer};
use crate::xml;

/// Route 53 is a global service signed in us-east-1
pub const DEFAULT_ROUTE53_REGION: &str = "us-east-1";

const ROUTE53_ENDPOINT: &str = "https://route53.amazonaws.com";
const API_VERSION: &str = "2013-04-01";
const XMLNS: &str = "https://route53.amazonaws.com/doc/2013-04-01/";

/// Route 53 zone client
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the client will:
/// - Perform list requests normally
/// - Log the change batch it would have sent
/// - **NOT** modify any record
pub struct Route53Client {
    endpoint: String,
    host: String,
    signer: SigV4Signer,
    client: reqwest::Client,
    dry_run: bool,
}

// Custom Debug implementation that hides the credentials
impl std::fmt::Debug for Route53Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route53Client")
            .field("endpoint", &self.endpoint)
            .field("region", &self.signer.region())
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl Route53Client {
    /// Create a client for the public Route 53 endpoint
    ///
    /// # Parameters
    ///
    /// - `credentials`: AWS credentials with `route53:ListResourceRecordSets`
    ///   and `route53:ChangeResourceRecordSets`
    /// - `region`: Signing region, normally `us-east-1`
    /// - `dry_run`: If true, list records but only log changes
    pub fn new(credentials: Credentials, region: impl Into<String>, dry_run: bool) -> Result<Self> {
        Self::with_endpoint(credentials, region, ROUTE53_ENDPOINT, dry_run)
    }

    /// Create a client for an explicit endpoint (tests, proxies)
    pub fn with_endpoint(
        credentials: Credentials,
        region: impl Into<String>,
        endpoint: impl Into<String>,
        dry_run: bool,
    ) -> Result<Self> {
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        Ok(Self {
            host: endpoint_host(&endpoint)?,
            signer: SigV4Signer::new(credentials, region, "route53"),
            client: build_client()?,
            endpoint,
            dry_run,
        })
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    fn rrset_path(zone_id: &str) -> String {
        format!("/{}/hostedzone/{}/rrset", API_VERSION, normalize_zone_id(zone_id))
    }
}

#[async_trait]
impl ZoneApi for Route53Client {
    /// List one page of record sets starting at `start_name`
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /2013-04-01/hostedzone/Z1/rrset?name=home.example.com.
    /// ```
    async fn list_records(&self, zone_id: &str, start_name: &str) -> Result<Vec<ResourceRecord>> {
        let path = Self::rrset_path(zone_id);
        debug!("Listing record sets in {} starting at {}", zone_id, start_name);

        let response = SignedRequest {
            endpoint: &self.endpoint,
            request: SignableRequest {
                method: "GET",
                host: &self.host,
                path: &path,
                query: &[("name", start_name)],
                headers: &[],
                payload: b"",
            },
        }
        .send(&self.client, &self.signer, "route53")
        .await?;

        if !response.status().is_success() {
            return Err(status_error("route53", "ListResourceRecordSets", response).await);
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::provider("route53", format!("Failed to read response: {}", e)))?;

        let records = parse_record_sets(&body)?;
        if xml::element(&body, "IsTruncated") == Some("true") {
            debug!(
                "Listing for {} truncated after {} record set(s)",
                zone_id,
                records.len()
            );
        }
        Ok(records)
    }

    /// Send a single DELETE or UPSERT change
    ///
    /// # API Call
    ///
    /// ```http
    /// POST /2013-04-01/hostedzone/Z1/rrset
    /// Content-Type: application/xml
    ///
    /// <ChangeResourceRecordSetsRequest>...one <Change>...</ChangeResourceRecordSetsRequest>
    /// ```
    async fn apply_change(
        &self,
        zone_id: &str,
        action: ChangeAction,
        record: &ResourceRecord,
    ) -> Result<()> {
        let path = Self::rrset_path(zone_id);
        let payload = change_batch_xml(action, record);

        if self.dry_run {
            info!(
                "[DRY-RUN] Would send POST to {}{} with payload: {}",
                self.endpoint, path, payload
            );
            return Ok(());
        }

        let context = format!("{} {} {}", action, record.record_type, record.name);
        let response = SignedRequest {
            endpoint: &self.endpoint,
            request: SignableRequest {
                method: "POST",
                host: &self.host,
                path: &path,
                query: &[],
                headers: &[("content-type", "application/xml")],
                payload: payload.as_bytes(),
            },
        }
        .send(&self.client, &self.signer, "route53")
        .await?;

        if !response.status().is_success() {
            return Err(status_error("route53", &context, response).await);
        }

        let body = response.text().await.unwrap_or_default();
        debug!(
            "{} accepted: change {} {}",
            context,
            xml::element(&body, "Id").unwrap_or("<unknown>"),
            xml::element(&body, "Status").unwrap_or("<unknown>")
        );
        Ok(())
    }

    fn api_name(&self) -> &'static str {
        "route53"
    }
}

/// Strip the `/hostedzone/` prefix Route 53 uses in some responses
pub fn normalize_zone_id(zone_id: &str) -> &str {
    zone_id
        .trim_start_matches('/')
        .trim_start_matches("hostedzone/")
}

/// Parse a `ListResourceRecordSetsResponse` body
///
/// Alias targets and routing-policy attributes are kept so a listed record
/// set can be sent back in an UPSERT unchanged.
pub fn parse_record_sets(body: &str) -> Result<Vec<ResourceRecord>> {
    xml::elements(body, "ResourceRecordSet")
        .into_iter()
        .map(parse_record_set)
        .collect()
}

fn parse_record_set(set: &str) -> Result<ResourceRecord> {
    let name = xml::text(set, "Name").ok_or_else(|| {
        Error::provider("route53", "Invalid response format: record set without Name")
    })?;
    let record_type: RecordType = xml::text(set, "Type")
        .ok_or_else(|| {
            Error::provider("route53", "Invalid response format: record set without Type")
        })?
        .into();

    let values = xml::elements(set, "Value")
        .into_iter()
        .map(xml::unescape)
        .collect::<Vec<_>>();
    let mut record = ResourceRecord::new(name, record_type, values);

    if let Some(ttl) = parse_field::<u32>(set, "TTL")? {
        record = record.with_ttl(ttl);
    }
    if let Some(id) = xml::text(set, "SetIdentifier") {
        record = record.with_set_identifier(id);
    }

    if let Some(alias) = xml::element(set, "AliasTarget") {
        record.alias_target = Some(AliasTarget {
            hosted_zone_id: xml::text(alias, "HostedZoneId").unwrap_or_default(),
            dns_name: xml::text(alias, "DNSName").ok_or_else(|| {
                Error::provider("route53", "Invalid response format: alias target without DNSName")
            })?,
            evaluate_target_health: parse_field(alias, "EvaluateTargetHealth")?.unwrap_or(false),
        });
    }

    record.routing = RoutingPolicy {
        weight: parse_field(set, "Weight")?,
        region: xml::text(set, "Region"),
        geo_location: xml::element(set, "GeoLocation").map(|geo| GeoLocation {
            continent_code: xml::text(geo, "ContinentCode"),
            country_code: xml::text(geo, "CountryCode"),
            subdivision_code: xml::text(geo, "SubdivisionCode"),
        }),
        failover: xml::text(set, "Failover"),
        multi_value_answer: parse_field(set, "MultiValueAnswer")?,
        health_check_id: xml::text(set, "HealthCheckId"),
    };

    Ok(record)
}

/// Parse an optional scalar element
fn parse_field<T>(doc: &str, tag: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    xml::element(doc, tag)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|e| {
                Error::provider("route53", format!("Invalid {} '{}': {}", tag, raw, e))
            })
        })
        .transpose()
}

fn push_element(out: &mut String, tag: &str, text: &str) {
    out.push_str(&format!("<{tag}>{}</{tag}>", xml::escape(text)));
}

/// Render a one-change `ChangeResourceRecordSetsRequest`
///
/// Elements follow the order of the Route 53 `ResourceRecordSet` schema.
pub fn change_batch_xml(action: ChangeAction, record: &ResourceRecord) -> String {
    let routing = &record.routing;
    let mut set = String::new();

    push_element(&mut set, "Name", &record.name);
    push_element(&mut set, "Type", record.record_type.as_str());
    if let Some(ref id) = record.set_identifier {
        push_element(&mut set, "SetIdentifier", id);
    }
    if let Some(weight) = routing.weight {
        push_element(&mut set, "Weight", &weight.to_string());
    }
    if let Some(ref region) = routing.region {
        push_element(&mut set, "Region", region);
    }
    if let Some(ref geo) = routing.geo_location {
        set.push_str("<GeoLocation>");
        for (tag, code) in [
            ("ContinentCode", &geo.continent_code),
            ("CountryCode", &geo.country_code),
            ("SubdivisionCode", &geo.subdivision_code),
        ] {
            if let Some(code) = code {
                push_element(&mut set, tag, code);
            }
        }
        set.push_str("</GeoLocation>");
    }
    if let Some(ref failover) = routing.failover {
        push_element(&mut set, "Failover", failover);
    }
    if let Some(multi_value) = routing.multi_value_answer {
        push_element(&mut set, "MultiValueAnswer", &multi_value.to_string());
    }
    if let Some(ttl) = record.ttl {
        push_element(&mut set, "TTL", &ttl.to_string());
    }
    if !record.values.is_empty() {
        set.push_str("<ResourceRecords>");
        for value in &record.values {
            set.push_str("<ResourceRecord>");
            push_element(&mut set, "Value", value);
            set.push_str("</ResourceRecord>");
        }
        set.push_str("</ResourceRecords>");
    }
    if let Some(ref alias) = record.alias_target {
        set.push_str("<AliasTarget>");
        push_element(&mut set, "HostedZoneId", &alias.hosted_zone_id);
        push_element(&mut set, "DNSName", &alias.dns_name);
        push_element(
            &mut set,
            "EvaluateTargetHealth",
            &alias.evaluate_target_health.to_string(),
        );
        set.push_str("</AliasTarget>");
    }
    if let Some(ref health_check) = routing.health_check_id {
        push_element(&mut set, "HealthCheckId", health_check);
    }

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
         <ChangeResourceRecordSetsRequest xmlns=\"{}\">\
         <ChangeBatch><Changes><Change>\
         <Action>{}</Action><ResourceRecordSet>{}</ResourceRecordSet>\
         </Change></Changes></ChangeBatch>\
         </ChangeResourceRecordSetsRequest>",
        XMLNS,
        action.as_str(),
        set
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"<?xml version="1.0"?>
<ListResourceRecordSetsResponse xmlns="https://route53.amazonaws.com/doc/2013-04-01/">
  <ResourceRecordSets>
    <ResourceRecordSet>
      <Name>home.example.com.</Name>
      <Type>A</Type>
      <TTL>60</TTL>
      <ResourceRecords><ResourceRecord><Value>1.2.3.4</Value></ResourceRecord></ResourceRecords>
    </ResourceRecordSet>
    <ResourceRecordSet>
      <Name>home.example.com.</Name>
      <Type>TXT</Type>
      <SetIdentifier>primary</SetIdentifier>
      <TTL>300</TTL>
      <ResourceRecords>
        <ResourceRecord><Value>&quot;v=spf1 ip4:1.2.3.4 -all&quot;</Value></ResourceRecord>
        <ResourceRecord><Value>&quot;other&quot;</Value></ResourceRecord>
      </ResourceRecords>
    </ResourceRecordSet>
    <ResourceRecordSet>
      <Name>www.example.com.</Name>
      <Type>A</Type>
      <AliasTarget><HostedZoneId>Z2</HostedZoneId><DNSName>lb.example.net.</DNSName><EvaluateTargetHealth>false</EvaluateTargetHealth></AliasTarget>
    </ResourceRecordSet>
  </ResourceRecordSets>
  <IsTruncated>false</IsTruncated>
  <MaxItems>300</MaxItems>
</ListResourceRecordSetsResponse>"#;

    #[test]
    fn test_parse_record_sets() {
        let records = parse_record_sets(LISTING).unwrap();
        assert_eq!(records.len(), 3);

        assert_eq!(
            records[0],
            ResourceRecord::new("home.example.com.", RecordType::A, ["1.2.3.4"]).with_ttl(60)
        );
        assert_eq!(records[1].record_type, RecordType::Txt);
        assert_eq!(records[1].set_identifier.as_deref(), Some("primary"));
        assert_eq!(
            records[1].values,
            vec![
                "\"v=spf1 ip4:1.2.3.4 -all\"".to_string(),
                "\"other\"".to_string()
            ]
        );
        assert!(records[2].values.is_empty());
        assert_eq!(records[2].ttl, None);
        assert_eq!(
            records[2].alias_target,
            Some(AliasTarget::new("Z2", "lb.example.net."))
        );
        assert!(records[0].alias_target.is_none());
        assert!(records[0].routing.is_empty());
    }

    const ROUTED: &str = r#"<ListResourceRecordSetsResponse>
  <ResourceRecordSets>
    <ResourceRecordSet>
      <Name>www.example.com.</Name>
      <Type>A</Type>
      <AliasTarget><HostedZoneId>Z2</HostedZoneId><DNSName>lb.example.net.</DNSName><EvaluateTargetHealth>true</EvaluateTargetHealth></AliasTarget>
    </ResourceRecordSet>
    <ResourceRecordSet>
      <Name>www.example.com.</Name>
      <Type>A</Type>
      <SetIdentifier>one</SetIdentifier>
      <Weight>10</Weight>
      <TTL>60</TTL>
      <ResourceRecords><ResourceRecord><Value>1.2.3.4</Value></ResourceRecord></ResourceRecords>
      <HealthCheckId>abc-123</HealthCheckId>
    </ResourceRecordSet>
    <ResourceRecordSet>
      <Name>geo.example.com.</Name>
      <Type>A</Type>
      <SetIdentifier>eu</SetIdentifier>
      <GeoLocation><ContinentCode>EU</ContinentCode></GeoLocation>
      <Failover>PRIMARY</Failover>
      <TTL>60</TTL>
      <ResourceRecords><ResourceRecord><Value>1.2.3.4</Value></ResourceRecord></ResourceRecords>
    </ResourceRecordSet>
  </ResourceRecordSets>
</ListResourceRecordSetsResponse>"#;

    #[test]
    fn test_alias_and_weighted_sets_round_trip() {
        let records = parse_record_sets(ROUTED).unwrap();
        assert_eq!(records.len(), 3);

        let alias = &records[0];
        let target = alias.alias_target.as_ref().unwrap();
        assert_eq!(target.dns_name, "lb.example.net.");
        assert!(target.evaluate_target_health);

        let weighted = &records[1];
        assert_eq!(weighted.routing.weight, Some(10));
        assert_eq!(weighted.routing.health_check_id.as_deref(), Some("abc-123"));

        let geo = &records[2];
        assert_eq!(
            geo.routing.geo_location.as_ref().and_then(|g| g.continent_code.as_deref()),
            Some("EU")
        );
        assert_eq!(geo.routing.failover.as_deref(), Some("PRIMARY"));

        for record in &records {
            let body = change_batch_xml(ChangeAction::Upsert, record);
            assert_eq!(&parse_record_sets(&body).unwrap(), std::slice::from_ref(record));
        }

        let body = change_batch_xml(ChangeAction::Upsert, alias);
        assert_eq!(
            xml::element(&body, "AliasTarget"),
            Some(
                "<HostedZoneId>Z2</HostedZoneId><DNSName>lb.example.net.</DNSName>\
                 <EvaluateTargetHealth>true</EvaluateTargetHealth>"
            )
        );
        assert!(xml::element(&body, "TTL").is_none());
        assert!(xml::element(&body, "ResourceRecords").is_none());

        let body = change_batch_xml(ChangeAction::Upsert, weighted);
        assert_eq!(xml::element(&body, "Weight"), Some("10"));
        let set = xml::element(&body, "ResourceRecordSet").unwrap();
        let order: Vec<usize> = [
            "<SetIdentifier>",
            "<Weight>",
            "<TTL>",
            "<ResourceRecords>",
            "<HealthCheckId>",
        ]
        .iter()
        .map(|tag| set.find(tag).unwrap())
        .collect();
        assert!(order.windows(2).all(|w| w[0] < w[1]), "schema order broken: {}", set);
    }

    #[test]
    fn test_parse_rejects_bad_weight() {
        let body = "<ResourceRecordSet><Name>a.</Name><Type>A</Type><Weight>heavy</Weight></ResourceRecordSet>";
        assert!(parse_record_sets(body).is_err());
    }

    #[test]
    fn test_parse_rejects_bad_ttl() {
        let body = "<ResourceRecordSet><Name>a.</Name><Type>A</Type><TTL>soon</TTL></ResourceRecordSet>";
        assert!(parse_record_sets(body).is_err());
    }

    #[test]
    fn test_change_batch_xml() {
        let record = ResourceRecord::new("home.example.com.", RecordType::Txt, ["\"a&b\""])
            .with_ttl(300)
            .with_set_identifier("primary");
        let body = change_batch_xml(ChangeAction::Upsert, &record);

        assert!(body.starts_with("<?xml"));
        assert_eq!(xml::element(&body, "Action"), Some("UPSERT"));
        assert_eq!(xml::element(&body, "Name"), Some("home.example.com."));
        assert_eq!(xml::element(&body, "Type"), Some("TXT"));
        assert_eq!(xml::element(&body, "SetIdentifier"), Some("primary"));
        assert_eq!(xml::element(&body, "TTL"), Some("300"));
        assert_eq!(xml::element(&body, "Value"), Some("&quot;a&amp;b&quot;"));
        assert_eq!(xml::elements(&body, "Change").len(), 1);

        // The batch parses back through the listing parser.
        assert_eq!(parse_record_sets(&body).unwrap(), vec![record]);
    }

    #[test]
    fn test_normalize_zone_id() {
        assert_eq!(normalize_zone_id("/hostedzone/Z1"), "Z1");
        assert_eq!(normalize_zone_id("hostedzone/Z1"), "Z1");
        assert_eq!(normalize_zone_id("Z1"), "Z1");
    }

    #[test]
    fn test_endpoint_must_be_bare_origin() {
        let creds = || Credentials::new("AKID", "secret-key");
        assert!(
            Route53Client::with_endpoint(creds(), "us-east-1", "http://127.0.0.1:9000/", false)
                .is_ok()
        );
        assert!(
            Route53Client::with_endpoint(creds(), "us-east-1", "http://127.0.0.1:9000/base", false)
                .is_err()
        );
    }

    #[test]
    fn test_debug_hides_credentials() {
        let client =
            Route53Client::new(Credentials::new("AKID", "secret-key"), "us-east-1", true).unwrap();
        let debug = format!("{:?}", client);
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("dry_run: true"));
    }
}
