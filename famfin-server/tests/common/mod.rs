//! Shared helpers for in-process API tests

#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use famfin_server::{build_router, AppState, ServerConfig};
use serde_json::Value;
use tower::ServiceExt;

/// Router over a fresh in-memory store
pub fn app() -> Router {
    build_router(AppState::in_memory(), &ServerConfig::default())
}

pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let resp = app
        .clone()
        .oneshot(builder.body(body).expect("failed to build request"))
        .await
        .expect("request failed");

    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    let json = serde_json::from_slice(&bytes).expect("response body was not JSON");
    (status, json)
}

pub async fn send_raw(app: &Router, method: &str, uri: &str, raw: &str) -> (StatusCode, Value) {
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(raw.to_owned()))
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");

    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    (status, serde_json::from_slice(&bytes).expect("response body was not JSON"))
}

/// POST and return the created record, asserting 200
pub async fn create(app: &Router, collection: &str, body: Value) -> Value {
    let (status, json) = send(app, "POST", &format!("/{}/", collection), Some(body)).await;
    assert_eq!(status, StatusCode::OK, "create failed: {}", json);
    json
}

/// `loc` of every 422 detail entry
pub fn error_locs(body: &Value) -> Vec<Value> {
    body["detail"]
        .as_array()
        .expect("detail should be a list")
        .iter()
        .map(|d| d["loc"].clone())
        .collect()
}
