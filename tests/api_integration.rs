//! Integration tests for the HTTP API
//!
//! Tests session lifecycle endpoints against an in-process router

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use blinkgate::core::{create_router, router_with_state, AppState};
use blinkgate::types::EyeBlink;
use blinkgate::BlinkError;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::broadcast::error::TryRecvError;
use tower::ServiceExt;

async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn new_session(app: &Router, body: &str) -> String {
    let (status, json) = send(app, "POST", "/session/new", Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    json["session_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_router();
    let (status, json) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], blinkgate::VERSION);
    assert_eq!(json["sessions_active"], 0);
}

#[tokio::test]
async fn test_create_session_defaults() {
    let app = create_router();
    let (status, json) = send(&app, "POST", "/session/new", Some(r#"{"detect_both_eyes": false}"#)).await;

    assert_eq!(status, StatusCode::OK);
    let session_id = json["session_id"].as_str().unwrap();
    assert_eq!(json["websocket_url"], format!("/ws/{}", session_id));
    assert_eq!(json["config"]["cool_down_secs"], 1.0);
    assert_eq!(json["config"]["detect_both_eyes"], false);
}

#[tokio::test]
async fn test_create_session_invalid_config() {
    let app = create_router();
    let (status, json) = send(
        &app,
        "POST",
        "/session/new",
        Some(r#"{"detect_both_eyes": true, "sensitivity": 1.5}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("sensitivity"));
}

#[tokio::test]
async fn test_session_not_found() {
    let app = create_router();

    let (status, _) = send(&app, "GET", "/session/nonexistent", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "POST",
        "/session/nonexistent/sample",
        Some(r#"{"left": 0.9, "right": 0.0, "timestamp_s": 0.0}"#),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", "/session/nonexistent", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_full_session_flow() {
    let app = create_router();
    let id = new_session(&app, r#"{"detect_both_eyes": false, "cool_down_secs": 1.0}"#).await;
    let sample_uri = format!("/session/{}/sample", id);

    // Left wink fires
    let (status, json) = send(
        &app,
        "POST",
        &sample_uri,
        Some(r#"{"left": 0.9, "right": 0.1, "timestamp_s": 0.0}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["blink"], "left");
    assert_eq!(json["reason"], "R100_BLINK_LEFT");
    assert_eq!(json["phase"], "SUPPRESSED");

    // Right wink inside the cooldown is dropped
    let (_, json) = send(
        &app,
        "POST",
        &sample_uri,
        Some(r#"{"left": 0.1, "right": 0.9, "timestamp_s": 0.5}"#),
    )
    .await;
    assert_eq!(json["blink"], Value::Null);
    assert_eq!(json["reason"], "R200_COOLDOWN_ACTIVE");

    // Face frame without a face never reaches the detector
    let (_, json) = send(&app, "POST", &sample_uri, Some(r#"{"timestamp_s": 0.8, "faces": []}"#)).await;
    assert_eq!(json["reason"], "R203_NO_FACE");

    // Mirrored face frame: sensor-left is the user's right eye
    let (_, json) = send(
        &app,
        "POST",
        &sample_uri,
        Some(r#"{"timestamp_s": 1.5, "faces": [{"eye_blink_left": 0.95, "eye_blink_right": 0.05}]}"#),
    )
    .await;
    assert_eq!(json["blink"], "right");

    let (status, json) = send(&app, "GET", &format!("/session/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["blink_count"], 2);
    assert_eq!(json["blinks"]["left"], 1);
    assert_eq!(json["blinks"]["right"], 1);
    assert_eq!(json["update_count"], 3);
    assert_eq!(json["last_blink_secs"], 1.5);
    assert_eq!(json["phase"], "SUPPRESSED");

    let (_, json) = send(&app, "GET", "/health", None).await;
    assert_eq!(json["sessions_active"], 1);

    // Stop
    let (status, _) = send(&app, "DELETE", &format!("/session/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "GET", &format!("/session/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_sessions_are_independent() {
    let app = create_router();
    let a = new_session(&app, r#"{"detect_both_eyes": true}"#).await;
    let b = new_session(&app, r#"{"detect_both_eyes": false}"#).await;
    assert_ne!(a, b);

    let both_closed = r#"{"left": 0.9, "right": 0.9, "timestamp_s": 0.0}"#;
    let (_, json) = send(&app, "POST", &format!("/session/{}/sample", a), Some(both_closed)).await;
    assert_eq!(json["blink"], "both");

    let (_, json) = send(&app, "POST", &format!("/session/{}/sample", b), Some(both_closed)).await;
    assert_eq!(json["blink"], Value::Null);
    assert_eq!(json["reason"], "R201_BOTH_SUPPRESSED");
    assert_eq!(json["phase"], "ARMED");
}

#[tokio::test]
async fn test_malformed_sample_is_bad_request() {
    let app = create_router();
    let id = new_session(&app, r#"{"detect_both_eyes": false}"#).await;

    let (status, json) = send(&app, "POST", &format!("/session/{}/sample", id), Some(r#"{"left": "closed"}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().starts_with("Malformed input on line 1"));

    // Session is still usable
    let (status, json) = send(
        &app,
        "POST",
        &format!("/session/{}/sample", id),
        Some(r#"{"left": 0.9, "right": 0.1, "timestamp_s": 0.0}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["blink"], "left");
}

#[tokio::test]
async fn test_blinks_are_broadcast() {
    let state = Arc::new(AppState::new());
    let app = router_with_state(state.clone());
    let id = new_session(&app, r#"{"detect_both_eyes": true}"#).await;
    let mut rx = state.subscribe(&id).await.unwrap();
    let sample_uri = format!("/session/{}/sample", id);

    send(&app, "POST", &sample_uri, Some(r#"{"left": 0.1, "right": 0.1, "timestamp_s": 0.0}"#)).await;
    send(&app, "POST", &sample_uri, Some(r#"{"left": 0.9, "right": 0.9, "timestamp_s": 0.25}"#)).await;
    send(&app, "POST", &sample_uri, Some(r#"{"left": 0.9, "right": 0.1, "timestamp_s": 0.5}"#)).await;

    // Only the emitted blink is sent; open eyes and the cooled-down wink are not
    let notice = rx.try_recv().unwrap();
    assert_eq!(notice.session_id, id);
    assert_eq!(notice.blink, EyeBlink::Both);
    assert_eq!(notice.timestamp_s, 0.25);
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));

    let json = serde_json::to_value(&notice).unwrap();
    assert_eq!(json["blink"], "both");
}

#[tokio::test]
async fn test_subscribe_unknown_session() {
    let state = AppState::new();
    let result = state.subscribe("nonexistent").await;
    assert!(matches!(result, Err(BlinkError::SessionNotFound(_))));
}
