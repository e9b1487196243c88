//! Contract Test: Authenticated Zone Queries
//!
//! Constraints verified:
//! - A matching key returns the zone listing unmodified, tagged with the zone id
//! - A mismatching key never reaches the zone API
//! - Configuration is fetched on every request
//! - Config and hostname failures come back as structured `fail` results
//!
//! If this test fails, callers can read or change zones they do not own.

mod common;

use common::*;
use dyndns_core::{Error, InboundEvent, ReconcileOptions};
use tokio_test::{assert_err, assert_ok};

#[tokio::test]
async fn matching_key_returns_listing_unmodified() {
    let listing = typical_listing("1.2.3.4");
    let store = CountingObjectStore::new(config_body());
    let zone = RecordingZoneApi::new(listing.clone());
    let handler = handler(&store, &zone, ReconcileOptions::default());

    let record_set = assert_ok!(handler.reconciler().query_records(SECRET, HOST).await);

    assert_eq!(record_set.zone_id, ZONE_ID);
    assert_eq!(record_set.records, listing);
    assert_eq!(zone.list_count(), 1);
    assert!(zone.changes().is_empty(), "Query must not change the zone");
}

#[tokio::test]
async fn get_mode_result_carries_zone_and_records() {
    let listing = typical_listing("1.2.3.4");
    let store = CountingObjectStore::new(config_body());
    let zone = RecordingZoneApi::new(listing.clone());
    let handler = handler(&store, &zone, ReconcileOptions::default());

    let result = handler
        .handle(&InboundEvent::new("get", "9.9.9.9", HOST, SECRET))
        .await;

    assert!(result.is_success(), "get failed: {}", result.return_message);
    assert_eq!(result.zone_id.as_deref(), Some(ZONE_ID));
    assert_eq!(result.resource_record_sets, Some(listing));
    assert!(result.applied_ip.is_none());
}

#[tokio::test]
async fn mismatching_key_never_reaches_zone_api() {
    let store = CountingObjectStore::new(config_body());
    let zone = RecordingZoneApi::new(typical_listing("1.2.3.4"));
    let handler = handler(&store, &zone, ReconcileOptions::default());

    let err = assert_err!(handler.reconciler().query_records("wrong", HOST).await);
    assert!(matches!(err, Error::Authentication(_)));

    for mode in ["get", "set"] {
        let result = handler
            .handle(&InboundEvent::new(mode, "5.6.7.8", HOST, "wrong"))
            .await;
        assert!(!result.is_success());
        assert_eq!(result.return_message, "Invalid key.");
    }

    assert_eq!(zone.list_count(), 0, "Zone was listed with a bad key");
    assert!(zone.changes().is_empty(), "Zone was changed with a bad key");
}

#[tokio::test]
async fn config_is_fetched_on_every_request() {
    let store = CountingObjectStore::new(config_body());
    let zone = RecordingZoneApi::new(typical_listing("1.2.3.4"));
    let handler = handler(&store, &zone, ReconcileOptions::default());

    for _ in 0..3 {
        let result = handler
            .handle(&InboundEvent::new("get", "1.2.3.4", HOST, SECRET))
            .await;
        assert!(result.is_success());
    }

    assert_eq!(store.get_count(), 3);
}

#[tokio::test]
async fn unknown_hostname_is_reported() {
    let store = CountingObjectStore::new(config_body());
    let zone = RecordingZoneApi::new(typical_listing("1.2.3.4"));
    let handler = handler(&store, &zone, ReconcileOptions::default());

    let result = handler
        .handle(&InboundEvent::new("get", "1.2.3.4", "other.example.com.", SECRET))
        .await;

    assert!(!result.is_success());
    assert!(result.return_message.contains("other.example.com."));
    assert_eq!(zone.list_count(), 0);
}

#[tokio::test]
async fn unavailable_config_is_reported() {
    let store = CountingObjectStore::unavailable();
    let zone = RecordingZoneApi::new(typical_listing("1.2.3.4"));
    let handler = handler(&store, &zone, ReconcileOptions::default());

    let result = handler
        .handle(&InboundEvent::new("set", "5.6.7.8", HOST, SECRET))
        .await;

    assert!(!result.is_success());
    assert_eq!(
        result.return_message,
        "There was an issue finding or reading the config file."
    );
    assert_eq!(store.get_count(), 1);
    assert_eq!(zone.list_count(), 0);
}

#[tokio::test]
async fn malformed_config_is_reported_as_unavailable() {
    let store = CountingObjectStore::new(b"{ not json".to_vec());
    let zone = RecordingZoneApi::new(vec![]);
    let handler = handler(&store, &zone, ReconcileOptions::default());

    let err = assert_err!(handler.reconciler().query_records(SECRET, HOST).await);
    assert!(matches!(err, Error::ConfigUnavailable));
}
