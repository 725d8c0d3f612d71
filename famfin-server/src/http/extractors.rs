//! Custom Axum extractors

use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::ApiError;
use crate::models::{decode, ValidationError};

/// Extract and validate an integer id from path
pub struct EntityId(pub i64);

impl<S> FromRequestParts<S> for EntityId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let invalid = || ApiError::from(ValidationError::InvalidPathParam { field: "id" });

        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| invalid())?;

        raw.parse::<i64>().map(Self).map_err(|_| invalid())
    }
}

/// JSON object body decoded into a typed create or patch payload.
///
/// Unknown members are ignored. Every bad field value is reported in one 422.
pub struct Payload<T>(pub T);

impl<S, T> FromRequest<S> for Payload<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| ValidationError::MalformedJson {
                reason: rejection.body_text(),
            })?;

        let Value::Object(map) = value else {
            return Err(ValidationError::NotAnObject.into());
        };

        decode(&map).map(Self).map_err(ApiError::from)
    }
}
