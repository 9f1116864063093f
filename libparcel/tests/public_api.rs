use libparcel::client::DISCOVERY_PATH;
use libparcel::resolve::StaticTxtLookup;
use libparcel::{Parcel, ParcelBuilder, ParcelError, Stage, Value, Variables};

fn alias(target: &str) -> String {
    format!("cyphar.opencontainers.parcel.v0={target};")
}

fn parcel(dns: StaticTxtLookup) -> Parcel<StaticTxtLookup> {
    ParcelBuilder::new()
        .insecure(true)
        .build_with_lookup(dns)
        .unwrap()
}

#[test]
fn test_version_is_set() {
    assert!(!libparcel::version().is_empty());
}

#[test]
fn test_builder_chaining() {
    let parcel = Parcel::builder()
        .insecure(true)
        .timeout(1)
        .max_aliases(2)
        .build_with_lookup(StaticTxtLookup::new())
        .unwrap();
    assert_eq!(parcel.client().scheme(), "http");
}

#[tokio::test]
async fn test_full_discovery_over_two_aliases() {
    let mut server = mockito::Server::new_async().await;
    let host_port = server.host_with_port();

    let discovery = server
        .mock("GET", DISCOVERY_PATH)
        .with_status(200)
        .with_body(
            r#"{"parcelVersion":"v0","disturi":{"template":"/v0{+parcel.discovery.name}{?os}"}}"#,
        )
        .create_async()
        .await;
    let distribution = server
        .mock("GET", "/v0/library/busybox")
        .match_query(mockito::Matcher::UrlEncoded(
            "os".to_string(),
            "linux".to_string(),
        ))
        .with_status(200)
        .with_body(
            r#"{"parcelVersion":"v0","indexuris":[{"template":"/i"}],"bloburis":[{"template":"/b"}]}"#,
        )
        .create_async()
        .await;

    let dns = StaticTxtLookup::new()
        .with_records("images.example.com", [alias("cdn.example.net")])
        .with_records("cdn.example.net", [alias(&host_port)]);
    let parcel = parcel(dns);

    assert_eq!(
        parcel.resolve("images.example.com/library/busybox").await.unwrap(),
        format!("{host_port}/library/busybox")
    );

    let variables = Variables::from([("os".to_string(), Value::from("linux"))]);
    let discovered = parcel
        .discover("images.example.com/library/busybox", Some(&variables))
        .await
        .unwrap();

    assert_eq!(discovered.distribution.index_uris[0].as_str(), "/i");
    assert_eq!(
        discovered.variables["parcel.discovery.userAuthority"],
        Value::from("images.example.com")
    );

    discovery.assert_async().await;
    distribution.assert_async().await;
}

#[tokio::test]
async fn test_cycle_is_an_error() {
    let dns = StaticTxtLookup::new()
        .with_records("a.example", [alias("b.example")])
        .with_records("b.example", [alias("a.example")]);
    let parcel = parcel(dns);

    let err = parcel.explore("a.example/image").await.unwrap_err();
    assert!(matches!(err, ParcelError::CycleDetected { .. }));
    assert_eq!(err.stage(), Some(Stage::Resolve));
    assert_eq!(
        err.to_string(),
        "resolve: alias cycle detected: a.example -> b.example -> a.example"
    );
}

#[tokio::test]
async fn test_unreachable_host_is_transport_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let parcel = parcel(StaticTxtLookup::new());

    let err = parcel
        .fetch(&format!("127.0.0.1:{port}/image"))
        .await
        .unwrap_err();
    assert!(matches!(err, ParcelError::Transport { .. }));
    assert_eq!(err.stage(), Some(Stage::FetchDiscovery));
}
