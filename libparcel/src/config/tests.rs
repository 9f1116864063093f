use super::*;
use std::io::Write;

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.network.timeout, 30);
    assert!(!config.network.insecure);
    assert!(config.dns.nameservers.is_empty());
    assert_eq!(config.dns.max_aliases, 16);
}

#[test]
fn test_from_str_empty_yaml() {
    let config = Config::from_yaml_str("").unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_from_str_partial_yaml() {
    let yaml = r#"
network:
  insecure: true
dns:
  max_aliases: 4
"#;
    let config = Config::from_yaml_str(yaml).unwrap();

    assert!(config.network.insecure);
    assert_eq!(config.dns.max_aliases, 4);

    // Untouched values keep their defaults
    assert_eq!(config.network.timeout, 30);
    assert!(config.dns.nameservers.is_empty());
}

#[test]
fn test_from_str_invalid_type_fails() {
    let yaml = "network:\n  timeout: soon\n";
    let err = Config::from_yaml_str(yaml).unwrap_err();
    assert!(matches!(err, ParcelError::Config { .. }));
}

#[test]
fn test_load_without_path_is_default() {
    let config = Config::load(None).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(file, "dns:\n  nameservers:\n    - \"127.0.0.1:5353\"").unwrap();

    let config = Config::load(Some(file.path())).unwrap();
    assert_eq!(config.dns.nameservers, vec!["127.0.0.1:5353".to_string()]);
}

#[test]
fn test_load_missing_file_fails_with_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.yaml");

    match Config::load(Some(&path)).unwrap_err() {
        ParcelError::Config { path: Some(p), .. } => assert!(p.ends_with("missing.yaml")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_nameserver_addrs() {
    let dns = Dns {
        nameservers: vec!["127.0.0.1:53".to_string(), "[::1]:5353".to_string()],
        ..Dns::default()
    };
    let addrs = dns.nameserver_addrs().unwrap();
    assert_eq!(addrs.len(), 2);
    assert_eq!(addrs[1].port(), 5353);
}

#[test]
fn test_invalid_nameserver_fails() {
    let dns = Dns {
        nameservers: vec!["not-an-address".to_string()],
        ..Dns::default()
    };
    assert!(matches!(
        dns.nameserver_addrs().unwrap_err(),
        ParcelError::Config { .. }
    ));
}
