//! The single translation point from failures to the uniform error body.
//!
//! Handlers return [`ApiError`]; [`fill_error_path`] runs as a router layer
//! and stamps the request path into the body on the way out.

use std::collections::BTreeMap;

use axum::{
    async_trait,
    body::{Body, Bytes},
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::{header, request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use service::errors::{ErrorKind, ServiceError};
use tracing::{error, warn};

use crate::messages;

/// Wire shape of every error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub timestamp: String,
    pub status: u16,
    pub error: String,
    pub message: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<BTreeMap<String, String>>,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<BTreeMap<String, String>>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into(), details: None }
    }

    pub fn bad_request(message: impl Into<String>) -> Self { Self::new(StatusCode::BAD_REQUEST, message) }

    pub fn not_found(message: impl Into<String>) -> Self { Self::new(StatusCode::NOT_FOUND, message) }
}

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::InvalidArgument | ErrorKind::Conflict | ErrorKind::ValidationFailed => StatusCode::BAD_REQUEST,
        ErrorKind::Unexpected => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        let kind = e.kind();
        match kind {
            // cause stays in the log
            ErrorKind::Unexpected => error!(error = %e, "unexpected service error"),
            _ => warn!(kind = kind.as_str(), error = %e, "request rejected"),
        }
        let details = match &e {
            ServiceError::Validation(v) => Some(
                v.iter()
                    .map(|(field, violation)| (field.to_string(), messages::violation(field, violation)))
                    .collect(),
            ),
            _ => None,
        };
        Self { status: status_for(kind), message: messages::for_error(&e), details }
    }
}

/// Carries the rendered body so the path layer can finish it.
#[derive(Clone)]
struct PendingError(ErrorBody);

fn now_timestamp() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.3f").to_string()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            timestamp: now_timestamp(),
            status: self.status.as_u16(),
            error: self.status.canonical_reason().unwrap_or("Error").to_string(),
            message: self.message,
            path: String::new(),
            details: self.details,
        };
        let mut resp = (self.status, Json(&body)).into_response();
        resp.extensions_mut().insert(PendingError(body));
        resp
    }
}

/// Router layer: fill `path` into error bodies produced by handlers and extractors.
pub async fn fill_error_path(req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    let resp = next.run(req).await;
    let Some(PendingError(mut body)) = resp.extensions().get::<PendingError>().cloned() else {
        return resp;
    };
    body.path = path;
    let (mut parts, _) = resp.into_parts();
    parts.extensions.remove::<PendingError>();
    parts.headers.remove(header::CONTENT_LENGTH);
    match serde_json::to_vec(&body) {
        Ok(bytes) => Response::from_parts(parts, Body::from(bytes)),
        Err(e) => {
            error!(error = %e, "error body encode failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// `Json` extractor whose rejections use the uniform error body.
/// An empty body is reported as a missing request.
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(messages::resolve(messages::REQUEST_MALFORMED, &[&e.body_text()])))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(ServiceError::MissingRequest.into());
        }
        serde_json::from_slice(&bytes)
            .map(ApiJson)
            .map_err(|e| ApiError::bad_request(messages::resolve(messages::REQUEST_MALFORMED, &[&e])))
    }
}

/// `Path` extractor whose rejections use the uniform error body.
pub struct ApiPath<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<T>::from_request_parts(parts, state)
            .await
            .map(|Path(v)| ApiPath(v))
            .map_err(|e| ApiError::bad_request(messages::resolve(messages::PATH_INVALID, &[&e.body_text()])))
    }
}

/// `Query` extractor whose rejections use the uniform error body.
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Query::<T>::from_request_parts(parts, state)
            .await
            .map(|Query(v)| ApiQuery(v))
            .map_err(|e| ApiError::bad_request(messages::resolve(messages::QUERY_INVALID, &[&e.body_text()])))
    }
}
