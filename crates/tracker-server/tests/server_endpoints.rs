use std::sync::Arc;

use serde_json::{Value, json};
use tokio::task::JoinHandle;
use tracker_server::{AppConfig, build_app, build_lifecycle};

const API_KEY: &str = "endpoint-test-key";

const FIXTURES: &str = r#"{
  "carriers": [
    {
      "id": "dev.fixture",
      "name": "Fixture Express",
      "displayName": "Fixture Express Ltd.",
      "shipments": {
        "FX-100": [
          {"time": "2026-01-02T09:00:00Z", "status": "IN_TRANSIT", "location": "Hub"},
          {"time": "2026-01-03T15:30:00Z", "status": "DELIVERED", "description": "Left at door"}
        ]
      }
    }
  ]
}"#;

async fn start_server(
    cfg: AppConfig,
) -> (String, tokio::sync::oneshot::Sender<()>, JoinHandle<()>) {
    let lifecycle = Arc::new(build_lifecycle(&cfg));
    let app = build_app(&cfg, lifecycle);

    // Bind to an ephemeral port
    let listener = tokio::net::TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0))
        .await
        .expect("bind");
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();

    let server = tokio::spawn(async move {
        let _ = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = rx.await;
            })
            .await;
    });

    (format!("http://{addr}"), tx, server)
}

fn config_with_fixtures(dir: &tempfile::TempDir) -> AppConfig {
    let fixtures = dir.path().join("carriers.json");
    std::fs::write(&fixtures, FIXTURES).expect("write fixtures");

    let mut cfg = AppConfig::default();
    cfg.auth.api_key = API_KEY.to_string();
    cfg.registry.fixtures = Some(fixtures);
    cfg
}

#[tokio::test]
async fn server_endpoints_work() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let (base, shutdown_tx, handle) = start_server(config_with_fixtures(&dir)).await;
    let client = reqwest::Client::new();

    // GET /
    let resp = client.get(format!("{base}/")).send().await.unwrap();
    assert!(resp.status().is_success());
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");

    // GET /healthz
    let resp = client.get(format!("{base}/healthz")).send().await.unwrap();
    assert!(resp.status().is_success());
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");

    // GET /readyz before the first GraphQL request
    let resp = client.get(format!("{base}/readyz")).send().await.unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "uninitialized");

    // POST /graphql without a key
    let resp = client
        .post(format!("{base}/graphql"))
        .json(&json!({"query": "{ carriers { id } }"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);
    assert!(resp.headers().contains_key("x-request-id"));
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["errors"][0]["extensions"]["code"], "UNAUTHENTICATED");

    // POST /graphql with the key
    let resp = client
        .post(format!("{base}/graphql"))
        .header("x-api-key", API_KEY)
        .header("x-request-id", "req-endpoint-1")
        .json(&json!({
            "query": r#"query Track($n: String!) {
                shipment(carrierId: "dev.fixture", trackingNumber: $n) {
                    carrierId
                    lastEvent { time status description }
                    events { status location }
                }
            }"#,
            "variables": {"n": "FX-100"}
        }))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
    assert_eq!(resp.headers().get("x-request-id").unwrap(), "req-endpoint-1");
    let body: Value = resp.json().await.unwrap();
    assert!(body.get("errors").is_none());
    let shipment = &body["data"]["shipment"];
    assert_eq!(shipment["carrierId"], "dev.fixture");
    assert_eq!(shipment["lastEvent"]["status"], "DELIVERED");
    assert_eq!(shipment["lastEvent"]["time"], "2026-01-03T15:30:00Z");
    assert_eq!(shipment["lastEvent"]["description"], "Left at door");
    assert_eq!(
        shipment["events"],
        json!([
            {"status": "IN_TRANSIT", "location": "Hub"},
            {"status": "DELIVERED", "location": null}
        ])
    );

    // Unknown shipment is NOT_FOUND
    let resp = client
        .post(format!("{base}/graphql"))
        .header("x-api-key", API_KEY)
        .json(&json!({"query": r#"{ shipment(carrierId: "dev.fixture", trackingNumber: "FX-999") { carrierId } }"#}))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["shipment"], Value::Null);
    assert_eq!(body["errors"][0]["extensions"]["code"], "NOT_FOUND");

    // GET /graphql
    let resp = client
        .get(format!("{base}/graphql"))
        .header("x-api-key", API_KEY)
        .query(&[("query", "{ carriers { id displayName } }")])
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body["data"]["carriers"],
        json!([{"id": "dev.fixture", "displayName": "Fixture Express Ltd."}])
    );

    // GET /readyz after initialization
    let resp = client.get(format!("{base}/readyz")).send().await.unwrap();
    assert!(resp.status().is_success());
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ready");

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let mut cfg = config_with_fixtures(&dir);
    cfg.server.body_limit_bytes = 64;
    let (base, shutdown_tx, handle) = start_server(cfg).await;

    let padding = "x".repeat(256);
    let resp = reqwest::Client::new()
        .post(format!("{base}/graphql"))
        .header("x-api-key", API_KEY)
        .json(&json!({"query": format!("{{ carriers {{ id }} }} # {padding}")}))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_client_error());

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}
