//! HTTP error boundary.
//!
//! [`AppError`] turns domain failures into a status and a message. The
//! [`error_envelope`] middleware then rewrites every error response, including
//! ones produced outside handlers (unknown routes, timeouts, panics), into
//! the uniform envelope:
//!
//! ```json
//! {"statusCode": 404, "timestamp": "...", "path": "/api/v1/characters/9",
//!  "method": "GET", "error": "Not Found", "message": "Character with ID 9 not found"}
//! ```

use axum::extract::{OriginalUri, Request};
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::{Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use chrono::{SecondsFormat, Utc};
use holocron_core::error::CoreError;
use holocron_db::store::StoreError;
use serde_json::json;

/// Message returned in place of any internal failure detail.
pub const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `holocron_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Core(err.into())
    }
}

/// The user-facing message of an error response, picked up by
/// [`error_envelope`].
#[derive(Debug, Clone)]
pub struct ErrorMessage(pub String);

impl AppError {
    /// HTTP status and user-facing message. Internal details are logged and
    /// replaced by [`INTERNAL_MESSAGE`].
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::Core(core) => match core {
                CoreError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                CoreError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string())
                }
            },
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        let body = json!({
            "statusCode": status.as_u16(),
            "error": reason(status),
            "message": message,
        });

        let mut response = (status, axum::Json(body)).into_response();
        response.extensions_mut().insert(ErrorMessage(message));
        response
    }
}

/// Canonical reason phrase, e.g. `Not Found`.
fn reason(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("Error")
}

/// Current time as RFC 3339 UTC with millisecond precision.
fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Rewrite every 4xx/5xx response into the error envelope.
///
/// Responses from [`AppError`] keep their message. Others (timeouts, caught
/// panics, method mismatches) get the canonical reason phrase, except 500
/// which is always sanitized.
pub async fn error_envelope(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = match request.extensions().get::<OriginalUri>() {
        Some(OriginalUri(uri)) => uri,
        None => request.uri(),
    };
    let path = uri
        .path_and_query()
        .map_or_else(|| uri.path().to_string(), ToString::to_string);

    let response = next.run(request).await;
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let (mut parts, _body) = response.into_parts();
    let message = match parts.extensions.remove::<ErrorMessage>() {
        Some(ErrorMessage(message)) => message,
        None if status == StatusCode::INTERNAL_SERVER_ERROR => INTERNAL_MESSAGE.to_string(),
        None => reason(status).to_string(),
    };

    if status.is_server_error() {
        tracing::warn!(%method, %path, status = status.as_u16(), "Request failed");
    }

    let envelope = json!({
        "statusCode": status.as_u16(),
        "timestamp": timestamp(),
        "path": path,
        "method": method.as_str(),
        "error": reason(status),
        "message": message,
    });

    let mut rebuilt = (status, axum::Json(envelope)).into_response();
    parts.headers.remove(CONTENT_LENGTH);
    parts.headers.remove(CONTENT_TYPE);
    for (name, value) in parts.headers.iter() {
        rebuilt.headers_mut().insert(name.clone(), value.clone());
    }
    rebuilt
}

/// Handler for unmatched routes: `Cannot GET /nowhere`.
pub async fn fallback(method: Method, OriginalUri(uri): OriginalUri) -> AppError {
    AppError::Core(CoreError::NotFound(format!(
        "Cannot {method} {}",
        uri.path()
    )))
}
