use super::*;
use std::str::FromStr;

fn vars(pairs: &[(&str, &str)]) -> Variables {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), Value::from(*v)))
        .collect()
}

fn base() -> Url {
    Url::parse("https://mirror.example.org").unwrap()
}

#[test]
fn test_expand_simple_variable() {
    let expanded = expand("/v0/{parcel.version}/dist.json", &vars(&[("parcel.version", "v0")]));
    assert_eq!(expanded.unwrap(), "/v0/v0/dist.json");
}

#[test]
fn test_expand_undefined_variable_is_empty() {
    let expanded = expand("/dist/{missing}.json", &Variables::new()).unwrap();
    assert_eq!(expanded, "/dist/.json");
}

#[test]
fn test_expand_percent_encodes_values() {
    let expanded = expand("/images/{image}", &vars(&[("image", "my image")])).unwrap();
    assert_eq!(expanded, "/images/my%20image");
}

#[test]
fn test_expand_query_expression() {
    let expanded = expand("/dist{?parcel.version}", &vars(&[("parcel.version", "v0")])).unwrap();
    assert_eq!(expanded, "/dist?parcel.version=v0");
}

#[test]
fn test_expand_list_value() {
    let mut variables = Variables::new();
    variables.insert(
        "segments".to_string(),
        Value::from(vec!["org".to_string(), "image".to_string()]),
    );
    let expanded = expand("/repo{/segments*}", &variables).unwrap();
    assert_eq!(expanded, "/repo/org/image");
}

#[test]
fn test_expand_malformed_template_fails() {
    let err = expand("/v0/{parcel.version", &Variables::new()).unwrap_err();
    match err {
        ParcelError::Template {
            stage, template, ..
        } => {
            assert_eq!(stage, Stage::Compose);
            assert_eq!(template, "/v0/{parcel.version");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_compose_absolute_path() {
    let url = compose(
        "/v0/{parcel.version}/dist.json",
        &vars(&[("parcel.version", "v0")]),
        &base(),
    )
    .unwrap();
    assert_eq!(url.as_str(), "https://mirror.example.org/v0/v0/dist.json");
}

#[test]
fn test_compose_relative_path_merges_with_empty_base_path() {
    let url = compose("dist/{parcel.version}.json", &vars(&[("parcel.version", "v0")]), &base())
        .unwrap();
    assert_eq!(url.as_str(), "https://mirror.example.org/dist/v0.json");
}

#[test]
fn test_compose_absolute_uri_replaces_base() {
    let url = compose(
        "http://cdn.example.net/{parcel.version}/dist.json",
        &vars(&[("parcel.version", "v0")]),
        &base(),
    )
    .unwrap();
    assert_eq!(url.as_str(), "http://cdn.example.net/v0/dist.json");
}

#[test]
fn test_compose_network_path_keeps_base_scheme() {
    let url = compose("//cdn.example.net/dist.json", &Variables::new(), &base()).unwrap();
    assert_eq!(url.as_str(), "https://cdn.example.net/dist.json");
}

#[test]
fn test_compose_dot_segments_are_removed() {
    let url = compose("/a/../b/./dist.json", &Variables::new(), &base()).unwrap();
    assert_eq!(url.as_str(), "https://mirror.example.org/b/dist.json");
}

#[test]
fn test_compose_keeps_base_port() {
    let base = Url::parse("http://127.0.0.1:8080").unwrap();
    let url = compose("/dist.json", &Variables::new(), &base).unwrap();
    assert_eq!(url.as_str(), "http://127.0.0.1:8080/dist.json");
}

#[test]
fn test_resolve_reference_invalid_fails() {
    let err = resolve_reference(&base(), "http://[not-an-ip/").unwrap_err();
    assert!(matches!(err, ParcelError::UriParse { .. }));
}

#[test]
fn test_resolve_rfc3986_absolute_uri_without_authority() {
    assert_eq!(resolve_rfc3986(&base(), "http:dist.json").unwrap(), "http:dist.json");
}

#[test]
fn test_compose_absolute_uri_without_authority_fails() {
    let err = compose("http:dist.json", &Variables::new(), &base()).unwrap_err();
    assert!(matches!(err, ParcelError::UriParse { stage: Stage::Compose, .. }));
}

#[test]
fn test_exploration_variables() {
    let name = Name::from_str("example.com/myimage").unwrap();
    let variables = exploration_variables(&name);

    assert_eq!(variables.len(), 2);
    assert_eq!(variables[VAR_VERSION], Value::from("v0"));
    assert_eq!(variables[VAR_NAME], Value::from("/myimage"));
    assert!(!variables.contains_key(VAR_AUTHORITY));
    assert!(!variables.contains_key(VAR_USER_AUTHORITY));
}

#[test]
fn test_augment_overwrites_reserved_keys() {
    let user = Name::from_str("example.com:5000/myimage").unwrap();
    let canonical = Name::from_str("mirror.example.org:5000/myimage").unwrap();
    let caller = vars(&[
        (VAR_VERSION, "v99"),
        (VAR_AUTHORITY, "evil.test"),
        (VAR_USER_AUTHORITY, "evil.test"),
        (VAR_NAME, "/evil"),
        ("arch", "amd64"),
    ]);

    let augmented = augment(Some(&caller), &user, &canonical);

    assert_eq!(augmented[VAR_VERSION], Value::from("v0"));
    assert_eq!(augmented[VAR_AUTHORITY], Value::from("mirror.example.org:5000"));
    assert_eq!(augmented[VAR_USER_AUTHORITY], Value::from("example.com:5000"));
    assert_eq!(augmented[VAR_NAME], Value::from("/myimage"));
    assert_eq!(augmented["arch"], Value::from("amd64"));

    // The caller's mapping is not touched.
    assert_eq!(caller[VAR_VERSION], Value::from("v99"));
    assert_eq!(caller.len(), 5);
}

#[test]
fn test_augment_without_caller_variables() {
    let user = Name::from_str("example.com/myimage").unwrap();
    let augmented = augment(None, &user, &user);

    assert_eq!(augmented.len(), RESERVED_VARIABLES.len());
    for key in RESERVED_VARIABLES {
        assert!(augmented.contains_key(key), "missing {key}");
    }
}

#[test]
fn test_value_serializes_untagged() {
    let value = serde_json::to_value(Value::from("v0")).unwrap();
    assert_eq!(value, serde_json::json!("v0"));

    let list: Value = serde_json::from_str(r#"["a","b"]"#).unwrap();
    assert_eq!(list, Value::List(vec!["a".to_string(), "b".to_string()]));
}
