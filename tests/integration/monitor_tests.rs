//! Integration tests for the monitor
//!
//! These tests use wiremock to stand in for storefronts and a temporary
//! directory for the store file, and run full cycles end-to-end.

use std::time::Duration;
use storefront_watch::config::HttpConfig;
use storefront_watch::monitor::{build_http_client, HttpFetcher, Monitor, Scheduler};
use storefront_watch::storage::{
    open_or_create, open_storage, JsonFileStorage, Storage, StoreStatus,
};
use storefront_watch::store::{OpaqueValue, TargetStore};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SAMPLE: &str = r#"{"products":[{"id":1,"handle":"x","variants":[{"id":10,"title":"S","available":true,"price":"9.99"}]}]}"#;

/// `host:port` of the mock server, as a target host
fn mock_host(server: &MockServer) -> String {
    let url = url::Url::parse(&server.uri()).expect("Failed to parse mock server URI");
    format!(
        "{}:{}",
        url.host_str().expect("Mock server URI has no host"),
        url.port().expect("Mock server URI has no port")
    )
}

fn plain_http_fetcher() -> HttpFetcher {
    let client = build_http_client(&HttpConfig::default()).unwrap();
    HttpFetcher::new(client).with_scheme("http")
}

fn file_monitor(
    store: TargetStore,
    dir: &TempDir,
    interval_ms: u64,
) -> Monitor<HttpFetcher, JsonFileStorage> {
    Monitor::new(
        store,
        plain_http_fetcher(),
        JsonFileStorage::new(dir.path().join("sites.json")),
        Scheduler::new(Duration::from_millis(interval_ms)),
    )
}

#[tokio::test]
async fn test_cycle_updates_store_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products.json"))
        .and(header("user-agent", "request"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SAMPLE))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let store_path = dir.path().join("sites.json");
    std::fs::write(
        &store_path,
        format!(
            r#"{{"a":{{"loc":"{}","path":"/products.json","products":[]}}}}"#,
            mock_host(&server)
        ),
    )
    .unwrap();

    let (storage, status) = open_storage(&store_path);
    let StoreStatus::Loaded(store) = status else {
        panic!("store file should load");
    };
    let mut monitor = Monitor::new(
        store,
        plain_http_fetcher(),
        storage,
        Scheduler::new(Duration::from_millis(10)),
    );

    let report = monitor.run_cycle().await;
    assert!(report.saved);
    assert_eq!(report.updated, 1);

    // Read back what was written to disk
    let on_disk = JsonFileStorage::new(&store_path).load().unwrap().unwrap();
    let target = on_disk.get("a").unwrap();
    assert_eq!(target.products.len(), 1);
    assert_eq!(target.products[0].id, OpaqueValue::from(1));
    assert_eq!(target.products[0].handle, "x");

    let variant = &target.products[0].variants[0];
    assert_eq!(variant.id, OpaqueValue::from(10));
    assert_eq!(variant.title, "S");
    assert!(variant.available);
    assert_eq!(variant.price, OpaqueValue::from("9.99"));
}

#[tokio::test]
async fn test_failures_do_not_stop_other_targets() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/good.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SAMPLE))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/broken.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gone.json"))
        .respond_with(
            ResponseTemplate::new(404).set_body_string(r#"{"errors":"Not Found"}"#),
        )
        .mount(&server)
        .await;

    // A port with nothing listening
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let dead_host = listener.local_addr().unwrap().to_string();
    drop(listener);

    let host = mock_host(&server);
    let mut store = TargetStore::new();
    store.add("a-dead", &dead_host, "/products.json").unwrap();
    store.add("b-gone", &host, "/gone.json").unwrap();
    store.add("c-broken", &host, "/broken.json").unwrap();
    store.add("d-good", &host, "/good.json").unwrap();

    let dir = TempDir::new().unwrap();
    let mut monitor = file_monitor(store, &dir, 10);

    let report = monitor.run_cycle().await;

    assert_eq!(report.targets, 4);
    assert_eq!(report.fetch_failures, 1);
    assert_eq!(report.http_errors, 1);
    assert_eq!(report.updated, 3);
    assert_eq!(report.empty_payloads, 2);
    assert!(report.saved);

    let store = monitor.store();
    assert!(store.get("a-dead").unwrap().checked_at.is_none());
    assert!(store.get("b-gone").unwrap().products.is_empty());
    assert!(store.get("b-gone").unwrap().checked_at.is_some());
    assert!(store.get("c-broken").unwrap().products.is_empty());
    assert!(store.get("c-broken").unwrap().checked_at.is_some());
    assert_eq!(store.get("d-good").unwrap().products.len(), 1);
}

#[tokio::test]
async fn test_register_persists_and_reloads() {
    let dir = TempDir::new().unwrap();
    let store_path = dir.path().join("sites.json");

    let (storage, store) = open_or_create(&store_path, |status| {
        assert!(matches!(status, StoreStatus::Missing));
        Ok(true)
    })
    .unwrap()
    .unwrap();

    let mut monitor = Monitor::new(
        store,
        plain_http_fetcher(),
        storage,
        Scheduler::new(Duration::from_millis(10)),
    );
    monitor
        .register_target("", "https://shop1.com", "/products.json")
        .unwrap();
    monitor
        .register_target("sale", "shop2.com", "collections/sale/products.json")
        .unwrap();
    assert!(monitor.unregister_target("missing").is_err());

    let (_, status) = open_storage(&store_path);
    let StoreStatus::Loaded(reloaded) = status else {
        panic!("store file should exist");
    };
    let listed: Vec<_> = reloaded.list().unwrap().collect();
    assert_eq!(
        listed,
        vec![
            ("1", "shop1.com/products.json".to_string()),
            ("sale", "shop2.com/collections/sale/products.json".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_corrupt_store_is_replaced_only_when_confirmed() {
    let dir = TempDir::new().unwrap();
    let store_path = dir.path().join("sites.json");
    std::fs::write(&store_path, r#"{"a":{"loc":"shop1.com""#).unwrap();

    let declined = open_or_create(&store_path, |_| Ok(false)).unwrap();
    assert!(declined.is_none());
    assert_eq!(
        std::fs::read_to_string(&store_path).unwrap(),
        r#"{"a":{"loc":"shop1.com""#
    );

    let (storage, store) = open_or_create(&store_path, |status| {
        assert!(matches!(status, StoreStatus::Unusable(_)));
        Ok(true)
    })
    .unwrap()
    .unwrap();

    let mut monitor = Monitor::new(
        store,
        plain_http_fetcher(),
        storage,
        Scheduler::new(Duration::from_millis(10)),
    );
    monitor
        .register_target("a", "shop1.com", "/products.json")
        .unwrap();

    let (_, status) = open_storage(&store_path);
    let StoreStatus::Loaded(reloaded) = status else {
        panic!("replaced store should load");
    };
    assert_eq!(reloaded.len(), 1);
}

#[tokio::test]
async fn test_run_polls_until_cancelled() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SAMPLE))
        .mount(&server)
        .await;

    let mut store = TargetStore::new();
    store
        .add("a", &mock_host(&server), "/products.json")
        .unwrap();

    let dir = TempDir::new().unwrap();
    let mut monitor = file_monitor(store, &dir, 20);

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(300)).await;
        trigger.cancel();
    });

    let completed = monitor.run(&cancel).await;
    assert!(completed >= 2, "expected several cycles, got {}", completed);

    let requests = server.received_requests().await.unwrap();
    assert!(requests.len() as u64 >= completed);

    let on_disk = JsonFileStorage::new(dir.path().join("sites.json"))
        .load()
        .unwrap()
        .unwrap();
    assert_eq!(on_disk.get("a").unwrap().products.len(), 1);
}
