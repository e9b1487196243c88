//! Shared fixtures for the mock-AWS contract tests

#![allow(dead_code)]

use dyndns_aws::Credentials;

pub const ZONE_ID: &str = "Z0EXAMPLE";
pub const HOST: &str = "home.example.com.";
pub const RRSET_PATH: &str = "/2013-04-01/hostedzone/Z0EXAMPLE/rrset";

pub fn credentials() -> Credentials {
    Credentials::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY")
}

/// A ListResourceRecordSetsResponse for HOST at `ip`, with its PTR and NS
pub fn listing_xml(ip: &str) -> String {
    let reversed: Vec<&str> = ip.split('.').rev().collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<ListResourceRecordSetsResponse xmlns="https://route53.amazonaws.com/doc/2013-04-01/">
  <ResourceRecordSets>
    <ResourceRecordSet>
      <Name>{host}</Name><Type>A</Type><TTL>60</TTL>
      <ResourceRecords><ResourceRecord><Value>{ip}</Value></ResourceRecord></ResourceRecords>
    </ResourceRecordSet>
    <ResourceRecordSet>
      <Name>{host}</Name><Type>NS</Type><TTL>172800</TTL>
      <ResourceRecords><ResourceRecord><Value>ns-1.awsdns-00.org.</Value></ResourceRecord></ResourceRecords>
    </ResourceRecordSet>
    <ResourceRecordSet>
      <Name>{rev}.in-addr.arpa.</Name><Type>PTR</Type><TTL>300</TTL>
      <ResourceRecords><ResourceRecord><Value>{host}</Value></ResourceRecord></ResourceRecords>
    </ResourceRecordSet>
  </ResourceRecordSets>
  <IsTruncated>false</IsTruncated>
  <MaxItems>300</MaxItems>
</ListResourceRecordSetsResponse>"#,
        host = HOST,
        ip = ip,
        rev = reversed.join(".")
    )
}

pub fn change_info_xml() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<ChangeResourceRecordSetsResponse xmlns="https://route53.amazonaws.com/doc/2013-04-01/">
  <ChangeInfo><Id>/change/C2682N5HXP0BZ4</Id><Status>PENDING</Status><SubmittedAt>2024-01-15T12:00:00.000Z</SubmittedAt></ChangeInfo>
</ChangeResourceRecordSetsResponse>"#
}

pub fn error_xml(code: &str, message: &str) -> String {
    format!(
        r#"<?xml version="1.0"?>
<ErrorResponse xmlns="https://route53.amazonaws.com/doc/2013-04-01/"><Error><Type>Sender</Type><Code>{}</Code><Message>{}</Message></Error><RequestId>0000</RequestId></ErrorResponse>"#,
        code, message
    )
}
