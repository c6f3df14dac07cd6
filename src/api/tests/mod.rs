use super::*;
use crate::test_helpers::{ScriptedRunner, create_test_client};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use std::time::Duration;
use tower::ServiceExt;

mod system;

/// Router over a scripted client, plus the temp dir backing it
async fn test_router(
    runner: Arc<ScriptedRunner>,
    exe_present: bool,
) -> (Router, Arc<TorrentClient>, tempfile::TempDir) {
    let (client, temp_dir) = create_test_client(runner, exe_present).await;
    let client = Arc::new(client);
    let config = client.get_config();
    (create_router(client.clone(), config), client, temp_dir)
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_api_server_spawns() {
    let runner = ScriptedRunner::new(0, true);
    let (client, _temp_dir) = create_test_client(runner, true).await;

    let mut config = (*client.get_config()).clone();
    config.server.bind_address = "127.0.0.1:0".parse().unwrap(); // Port 0 = OS assigns a free port
    let config = Arc::new(config);
    let client = Arc::new(client);

    let api_handle = tokio::spawn(async move { start_api_server(client, config).await });

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!api_handle.is_finished(), "server should still be running");
    api_handle.abort();
}

#[tokio::test]
async fn test_serve_with_shutdown_stops() {
    let runner = ScriptedRunner::new(0, true);
    let (client, _temp_dir) = create_test_client(runner, true).await;

    let mut config = (*client.get_config()).clone();
    config.server.bind_address = "127.0.0.1:0".parse().unwrap();
    let config = Arc::new(config);

    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    let handle = tokio::spawn(serve_with_shutdown(Arc::new(client), config, async {
        rx.await.ok();
    }));

    tokio::time::sleep(Duration::from_millis(50)).await;
    tx.send(()).unwrap();

    let result = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server should stop after the shutdown signal")
        .unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_cors_enabled() {
    let (app, _client, _temp_dir) = test_router(ScriptedRunner::new(0, true), true).await;

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .contains_key("access-control-allow-origin"),
        "CORS header should be present when CORS is enabled"
    );
}

#[tokio::test]
async fn test_cors_disabled() {
    let runner = ScriptedRunner::new(0, true);
    let (client, _temp_dir) = create_test_client(runner, true).await;

    let mut config = (*client.get_config()).clone();
    config.server.cors_enabled = false;
    let app = create_router(Arc::new(client), Arc::new(config));

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert!(
        !response
            .headers()
            .contains_key("access-control-allow-origin")
    );
}

#[test]
fn test_build_cors_layer_with_specific_origins() {
    // must not panic on a mix of valid and invalid origins
    let _layer = build_cors_layer(&[
        "http://localhost:3000".to_string(),
        "not a header\u{7f}".to_string(),
    ]);
}
