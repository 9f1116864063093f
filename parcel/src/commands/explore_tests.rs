use super::*;
use libparcel::ParcelBuilder;
use libparcel::client::DISCOVERY_PATH;
use libparcel::resolve::StaticTxtLookup;

#[tokio::test]
async fn test_explore_composes_url() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", DISCOVERY_PATH)
        .with_status(200)
        .with_body(
            r#"{"parcelVersion":"v0","disturi":{"template":"/{parcel.version}/dist{+parcel.discovery.name}.json"}}"#,
        )
        .create_async()
        .await;
    let parcel = ParcelBuilder::new()
        .insecure(true)
        .build_with_lookup(StaticTxtLookup::new())
        .unwrap();

    let name = format!("{}/org/image", server.host_with_port());
    let explored = explore(&parcel, &name).await.unwrap();

    assert_eq!(explored.name, name);
    assert_eq!(
        explored.url,
        format!("http://{}/v0/dist/org/image.json", server.host_with_port())
    );
}

#[test]
fn test_explored_pretty() {
    let explored = Explored {
        name: "example.com/myimage".to_string(),
        url: "https://example.com/v0/dist.json".to_string(),
    };
    assert_eq!(
        explored.format_pretty(),
        "example.com/myimage -> https://example.com/v0/dist.json"
    );
}
