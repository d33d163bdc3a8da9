//! Integration tests for the pdc-notify HTTP surface

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::Value;
use tower::util::ServiceExt; // for `oneshot` method

use pdc_common::db::init_database;
use pdc_notify::{build_router, AppState, LogMailer};

async fn setup_app() -> (tempfile::TempDir, axum::Router) {
    let dir = tempfile::tempdir().unwrap();
    let pool = init_database(&dir.path().join("pdc.db")).await.unwrap();
    let state = AppState::new(pool, Arc::new(LogMailer));
    (dir, build_router(state))
}

async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let (_dir, app) = setup_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = extract_json(response.into_body()).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["module"], "pdc-notify");
}

#[tokio::test]
async fn trigger_run_on_empty_catalog_returns_zero_count() {
    let (_dir, app) = setup_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/notifications")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = extract_json(response.into_body()).await;
    assert_eq!(json["message"], "Notifications sent successfully.");
    assert_eq!(json["count"], 0);

    // The run shows up in the audit log endpoint
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/notifications/log?limit=5")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = extract_json(response.into_body()).await;
    let entries = json.as_array().expect("log response is an array");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["user_count"], 0);
}
