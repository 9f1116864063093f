use super::*;
use std::error::Error;
use std::io;

#[test]
fn test_missing_authority_error() {
    let err = ParcelError::missing_authority("myimage");

    assert!(matches!(err, ParcelError::MissingAuthority { .. }));
    assert!(err.to_string().contains("no authority"));
    assert!(err.to_string().contains("myimage"));
    assert_eq!(err.stage(), Some(Stage::Resolve));
}

#[test]
fn test_cycle_detected_lists_chain() {
    let err = ParcelError::CycleDetected {
        stage: Stage::Resolve,
        chain: vec!["a.test".to_string(), "b.test".to_string(), "a.test".to_string()],
    };

    assert_eq!(
        err.to_string(),
        "resolve: alias cycle detected: a.test -> b.test -> a.test"
    );
}

#[test]
fn test_alias_limit_error() {
    let err = ParcelError::AliasLimitExceeded {
        stage: Stage::Resolve,
        limit: 2,
        chain: vec!["a".to_string(), "b".to_string(), "c".to_string()],
    };

    assert!(err.to_string().contains("longer than 2"));
}

#[test]
fn test_transport_error_carries_stage() {
    let err = ParcelError::transport(Stage::FetchDistribution, "connection reset");

    assert_eq!(err.to_string(), "fetch distribution: connection reset");
    assert_eq!(err.stage(), Some(Stage::FetchDistribution));
}

#[test]
fn test_transport_error_with_source() {
    let io_err = io::Error::new(io::ErrorKind::ConnectionRefused, "refused");
    let err = ParcelError::transport_with_source(Stage::FetchDiscovery, "failed to connect", io_err);

    assert!(err.source().is_some());
    assert_eq!(err.source().unwrap().to_string(), "refused");
}

#[test]
fn test_status_error_display() {
    let err = ParcelError::Status {
        stage: Stage::FetchDiscovery,
        url: "https://example.com/.well-known/x.json".to_string(),
        status_code: 404,
    };

    assert_eq!(
        err.to_string(),
        "fetch discovery: HTTP 404 from https://example.com/.well-known/x.json"
    );
}

#[test]
fn test_decode_error_with_source() {
    let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err = ParcelError::decode_with_source(Stage::FetchDiscovery, "bad body", json_err);

    assert!(matches!(err, ParcelError::Decode { .. }));
    assert!(err.source().is_some());
}

#[test]
fn test_version_mismatch_names_both_versions() {
    let err = ParcelError::version_mismatch(Stage::FetchDiscovery, "v9");

    match &err {
        ParcelError::VersionMismatch {
            found, expected, ..
        } => {
            assert_eq!(found, "v9");
            assert_eq!(expected, "v0");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().starts_with("fetch discovery:"));
}

#[test]
fn test_dns_error_has_no_stage() {
    let io_err = io::Error::other("no records");
    let err = ParcelError::dns_with_source("example.com", io_err);

    assert_eq!(err.stage(), None);
    assert!(err.to_string().contains("example.com"));
}

#[test]
fn test_config_error_with_path() {
    let err = ParcelError::config("invalid nameserver", Some("/etc/parcel.yaml"));

    match err {
        ParcelError::Config { path, .. } => assert_eq!(path.as_deref(), Some("/etc/parcel.yaml")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_stage_display() {
    assert_eq!(Stage::Resolve.to_string(), "resolve");
    assert_eq!(Stage::FetchDiscovery.to_string(), "fetch discovery");
    assert_eq!(Stage::Compose.to_string(), "compose");
    assert_eq!(Stage::FetchDistribution.to_string(), "fetch distribution");
}
