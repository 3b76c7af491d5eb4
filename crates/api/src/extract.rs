//! Extractors whose rejections go through [`AppError`], so malformed bodies
//! and non-numeric path ids produce the same envelope as domain errors.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::Json;
use holocron_core::types::DbId;

use crate::error::AppError;

/// Message for a path id that is not an integer.
pub const NUMERIC_EXPECTED: &str = "Validation failed (numeric string is expected)";

/// JSON body whose rejection is a 400 with the deserializer's message.
#[derive(Debug, Clone)]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl<S, T> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

fn parse_id(raw: &str) -> Result<DbId, AppError> {
    raw.trim()
        .parse::<DbId>()
        .map_err(|_| AppError::BadRequest(NUMERIC_EXPECTED.to_string()))
}

/// The `{id}` segment of `/characters/{id}` or `/movies/{id}`.
#[derive(Debug, Clone, Copy)]
pub struct EntityId(pub DbId);

impl<S: Send + Sync> FromRequestParts<S> for EntityId {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::BadRequest(NUMERIC_EXPECTED.to_string()))?;
        Ok(Self(parse_id(&raw)?))
    }
}

/// The two segments of `/characters/{id}/movies/{movie_id}` and its mirror:
/// the owning entity first, the related one second.
#[derive(Debug, Clone, Copy)]
pub struct EdgeIds {
    pub owner: DbId,
    pub related: DbId,
}

impl<S: Send + Sync> FromRequestParts<S> for EdgeIds {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path((owner, related)) = Path::<(String, String)>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::BadRequest(NUMERIC_EXPECTED.to_string()))?;
        Ok(Self {
            owner: parse_id(&owner)?,
            related: parse_id(&related)?,
        })
    }
}
