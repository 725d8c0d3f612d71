mod common;

use axum::http::StatusCode;
use common::{app, create, error_locs, send, send_raw};
use serde_json::json;

#[tokio::test]
async fn account_lifecycle() {
    let app = app();

    let created = create(&app, "accounts", json!({"email": "a@b.com", "google_id": null})).await;
    assert_eq!(created["email"], "a@b.com");
    assert_eq!(created["status"], "pending");
    assert_eq!(created["google_id"], json!(null));
    let id = created["id"].as_i64().expect("id should be an integer");
    let uri = format!("/accounts/{}", id);

    let (status, patched) = send(&app, "PATCH", &uri, Some(json!({"status": "verified"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["status"], "verified");
    assert_eq!(patched["email"], "a@b.com");

    let (status, fetched) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, patched);

    let (status, body) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"ok": true}));

    let (status, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"detail": "Account not found"}));

    let (status, body) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"detail": "Account not found"}));
}

#[tokio::test]
async fn client_supplied_status_is_ignored_on_create() {
    let app = app();
    let created = create(
        &app,
        "accounts",
        json!({"email": "x@y.org", "status": "verified", "id": 77}),
    )
    .await;

    assert_eq!(created["status"], "pending");
    assert_ne!(created["id"], 77);
}

#[tokio::test]
async fn ids_are_distinct() {
    let app = app();
    let a = create(&app, "accounts", json!({"email": "a@b.com"})).await;
    let b = create(&app, "accounts", json!({"email": "a@b.com"})).await;
    assert_ne!(a["id"], b["id"]);
}

#[tokio::test]
async fn invalid_email_is_422() {
    let app = app();
    let (status, body) = send(&app, "POST", "/accounts/", Some(json!({"email": "not-an-email"}))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_locs(&body), vec![json!(["body", "email"])]);
    assert_eq!(body["detail"][0]["type"], "value_error");
}

#[tokio::test]
async fn missing_email_is_422() {
    let app = app();
    let (status, body) = send(&app, "POST", "/accounts/", Some(json!({"google_id": "g-1"}))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"][0]["type"], "missing");
}

#[tokio::test]
async fn unknown_status_rejected_without_mutation() {
    let app = app();
    let created = create(&app, "accounts", json!({"email": "a@b.com"})).await;
    let uri = format!("/accounts/{}", created["id"]);

    let (status, body) = send(&app, "PATCH", &uri, Some(json!({"status": "Verified"}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"][0]["type"], "enum");

    // One bad field rejects the whole patch
    let (status, _) = send(
        &app,
        "PATCH",
        &uri,
        Some(json!({"email": "new@b.com", "status": "archived"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, fetched) = send(&app, "GET", &uri, None).await;
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn empty_patch_returns_record_unchanged() {
    let app = app();
    let created = create(&app, "accounts", json!({"email": "a@b.com", "google_id": "g-1"})).await;
    let uri = format!("/accounts/{}", created["id"]);

    let (status, patched) = send(&app, "PATCH", &uri, Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched, created);
}

#[tokio::test]
async fn unknown_keys_only_patch_returns_record_unchanged() {
    let app = app();
    let created = create(&app, "accounts", json!({"email": "a@b.com", "google_id": "g-1"})).await;
    let uri = format!("/accounts/{}", created["id"]);

    let (status, patched) = send(&app, "PATCH", &uri, Some(json!({"nickname": "x"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched, created);

    let (_, fetched) = send(&app, "GET", &uri, None).await;
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn google_id_can_be_cleared() {
    let app = app();
    let created = create(&app, "accounts", json!({"email": "a@b.com", "google_id": "g-1"})).await;
    let uri = format!("/accounts/{}", created["id"]);

    let (status, patched) = send(&app, "PATCH", &uri, Some(json!({"google_id": null}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["google_id"], json!(null));
}

#[tokio::test]
async fn null_email_patch_is_422() {
    let app = app();
    let created = create(&app, "accounts", json!({"email": "a@b.com"})).await;
    let uri = format!("/accounts/{}", created["id"]);

    let (status, body) = send(&app, "PATCH", &uri, Some(json!({"email": null}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"][0]["type"], "null_not_allowed");
}

#[tokio::test]
async fn patch_missing_account_is_404() {
    let app = app();
    let (status, body) = send(&app, "PATCH", "/accounts/999999", Some(json!({"status": "verified"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Account not found");
}

#[tokio::test]
async fn non_integer_id_is_422() {
    let app = app();
    let (status, body) = send(&app, "GET", "/accounts/abc", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_locs(&body), vec![json!(["path", "id"])]);
}

#[tokio::test]
async fn unsupported_verbs_are_405() {
    let app = app();
    for (method, uri) in [("GET", "/accounts/"), ("PUT", "/accounts/1"), ("POST", "/accounts/1")] {
        let (status, body) = send(&app, method, uri, None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{} {}", method, uri);
        assert_eq!(body["detail"], "Method Not Allowed");
    }
}

#[tokio::test]
async fn malformed_json_is_422() {
    let app = app();
    let (status, body) = send_raw(&app, "POST", "/accounts/", r#"{"email": "#).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"][0]["type"], "json_invalid");
}
