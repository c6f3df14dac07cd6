use super::*;
use crate::types::Event;

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _client, _temp_dir) = test_router(ScriptedRunner::new(0, true), true).await;

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["executable_available"], true);
}

#[tokio::test]
async fn test_health_reports_missing_executable() {
    let (app, _client, _temp_dir) = test_router(ScriptedRunner::new(0, true), false).await;

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(body_json(response).await["executable_available"], false);
}

#[tokio::test]
async fn test_presets_endpoint() {
    let (app, client, temp_dir) = test_router(ScriptedRunner::new(0, true), true).await;

    let response = app
        .clone()
        .oneshot(Request::get("/presets").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["magnets"][0]["name"], "sample");
    assert_eq!(body["magnets"][0]["link"], "magnet:?xt=urn:btih:PRESET");
    assert_eq!(body["torrents"], serde_json::json!(["sample.torrent"]));

    std::fs::write(temp_dir.path().join("another.torrent"), b"d4:infoe").unwrap();
    let response = app
        .oneshot(
            Request::post("/presets/reload")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(
        body["torrents"],
        serde_json::json!(["another.torrent", "sample.torrent"])
    );
    assert_eq!(client.presets().await.torrents.len(), 2);
}

#[tokio::test]
async fn test_openapi_endpoint() {
    let (app, _client, _temp_dir) = test_router(ScriptedRunner::new(0, true), true).await;

    let response = app
        .oneshot(Request::get("/openapi.json").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["paths"]["/downloads/magnet"].is_object());
}

#[tokio::test]
async fn test_sse_event_stream() {
    let (app, client, _temp_dir) = test_router(ScriptedRunner::new(0, true), true).await;

    let response = app
        .oneshot(
            Request::get("/events")
                .header("Accept", "text/event-stream")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    assert!(content_type.contains("text/event-stream"));

    // the stream is backed by the same broadcast channel
    let mut receiver = client.subscribe();
    client.emit_event(Event::InfoQueried { ok: true });
    let received = tokio::time::timeout(Duration::from_millis(100), receiver.recv()).await;
    assert!(matches!(received, Ok(Ok(Event::InfoQueried { ok: true }))));
}
