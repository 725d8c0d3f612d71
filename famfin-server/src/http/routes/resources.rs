//! Generic CRUD routes, mounted once per entity kind
//!
//! - POST   /{collection}/      create, 200 with the stored record
//! - GET    /{collection}/{id}  fetch one
//! - PATCH  /{collection}/{id}  partial update
//! - DELETE /{collection}/{id}  `{"ok": true}`
//!
//! Any other verb on these paths is a 405. There is no list endpoint.

use axum::extract::{FromRef, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;

use crate::http::error::ApiError;
use crate::http::extractors::{EntityId, Payload};
use crate::models::Entity;
use crate::state::{AppState, Repo};

/// DELETE response body
#[derive(Debug, Serialize)]
pub struct Deleted {
    pub ok: bool,
}

/// POST /{collection}/
async fn create<E: Entity>(
    State(repo): State<Repo<E>>,
    Payload(new): Payload<E::New>,
) -> Result<Json<E>, ApiError> {
    let entity = repo.create(new).await?;
    tracing::info!(kind = E::KIND, id = entity.id(), "created");
    Ok(Json(entity))
}

/// GET /{collection}/{id}
async fn get_one<E: Entity>(
    State(repo): State<Repo<E>>,
    EntityId(id): EntityId,
) -> Result<Json<E>, ApiError> {
    Ok(Json(repo.get(id).await?))
}

/// PATCH /{collection}/{id}
async fn patch_one<E: Entity>(
    State(repo): State<Repo<E>>,
    EntityId(id): EntityId,
    Payload(patch): Payload<E::Patch>,
) -> Result<Json<E>, ApiError> {
    let entity = repo.patch(id, patch).await?;
    tracing::info!(kind = E::KIND, id, "patched");
    Ok(Json(entity))
}

/// DELETE /{collection}/{id}
async fn delete_one<E: Entity>(
    State(repo): State<Repo<E>>,
    EntityId(id): EntityId,
) -> Result<Json<Deleted>, ApiError> {
    repo.delete(id).await?;
    tracing::info!(kind = E::KIND, id, "deleted");
    Ok(Json(Deleted { ok: true }))
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Routes for one entity kind. The collection path accepts POST with and
/// without the trailing slash.
pub fn router<E>() -> Router<AppState>
where
    E: Entity,
    Repo<E>: FromRef<AppState>,
{
    let collection = format!("/{}", E::COLLECTION);
    let item = format!("/{}/{{id}}", E::COLLECTION);

    Router::new()
        .route(
            &format!("{}/", collection),
            post(create::<E>).fallback(method_not_allowed),
        )
        .route(
            &collection,
            post(create::<E>).fallback(method_not_allowed),
        )
        .route(
            &item,
            get(get_one::<E>)
                .patch(patch_one::<E>)
                .delete(delete_one::<E>)
                .fallback(method_not_allowed),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Account, Category, User};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .merge(router::<Account>())
            .merge(router::<User>())
            .merge(router::<Category>())
            .with_state(AppState::in_memory())
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                builder = builder.header("content-type", "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    #[tokio::test]
    async fn post_without_trailing_slash() {
        let app = app();
        let (status, body) = send(&app, "POST", "/accounts", Some(json!({"email": "a@b.com"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "pending");
    }

    #[tokio::test]
    async fn get_on_collection_is_405() {
        let app = app();
        let (status, body) = send(&app, "GET", "/categories/", None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body, json!({"detail": "Method Not Allowed"}));
    }

    #[tokio::test]
    async fn put_on_item_is_405() {
        let app = app();
        let (status, _) = send(&app, "PUT", "/users/1", Some(json!({}))).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn non_integer_id_is_422() {
        let app = app();
        let (status, body) = send(&app, "GET", "/accounts/abc", None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["detail"][0]["loc"], json!(["path", "id"]));
        assert_eq!(body["detail"][0]["type"], "int_parsing");
    }
}
