use axum::{
    extract::State,
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use service::notification::{domain::SendNotificationRequest, Remote};

use crate::errors::{ApiError, ApiJson, ApiPath, ApiQuery};
use crate::state::AppState;

/// Set on responses built from a fallback payload.
pub const FALLBACK_HEADER: HeaderName = HeaderName::from_static("x-notification-fallback");

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CountQuery {
    /// Count unread notifications only
    #[serde(default)]
    pub unread_only: bool,
}

fn respond<T: Serialize>(status: StatusCode, remote: Remote<T>) -> Response {
    let fallback = remote.is_fallback();
    let mut resp = (status, Json(remote.into_inner())).into_response();
    if fallback {
        resp.headers_mut().insert(FALLBACK_HEADER, HeaderValue::from_static("true"));
    }
    resp
}

#[utoipa::path(
    get, path = "/api/v1/customers/{customerId}/notifications", tag = "notifications",
    params(("customerId" = i64, Path, description = "Customer id")),
    responses((status = 200, description = "Notifications of the customer (empty when the service is unavailable)", body = [crate::openapi::NotificationResponseDoc]))
)]
pub async fn list(State(state): State<AppState>, ApiPath(customer_id): ApiPath<i64>) -> Response {
    respond(StatusCode::OK, state.notifications.list(customer_id).await)
}

#[utoipa::path(
    get, path = "/api/v1/customers/{customerId}/notifications/unread", tag = "notifications",
    params(("customerId" = i64, Path, description = "Customer id")),
    responses((status = 200, description = "Unread notifications of the customer", body = [crate::openapi::NotificationResponseDoc]))
)]
pub async fn unread(State(state): State<AppState>, ApiPath(customer_id): ApiPath<i64>) -> Response {
    respond(StatusCode::OK, state.notifications.unread(customer_id).await)
}

#[utoipa::path(
    get, path = "/api/v1/customers/{customerId}/notifications/count", tag = "notifications",
    params(("customerId" = i64, Path, description = "Customer id"), CountQuery),
    responses((status = 200, description = "Number of notifications (0 when the service is unavailable)", body = u64))
)]
pub async fn count(
    State(state): State<AppState>,
    ApiPath(customer_id): ApiPath<i64>,
    ApiQuery(q): ApiQuery<CountQuery>,
) -> Response {
    respond(StatusCode::OK, state.notifications.count(customer_id, q.unread_only).await)
}

#[utoipa::path(
    post, path = "/api/v1/customers/{customerId}/notifications", tag = "notifications",
    params(("customerId" = i64, Path, description = "Customer id")),
    request_body = crate::openapi::SendNotificationRequestDoc,
    responses(
        (status = 201, description = "Notification sent, or a placeholder when the service is unavailable", body = crate::openapi::NotificationResponseDoc),
        (status = 400, description = "Validation failed", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn send(
    State(state): State<AppState>,
    ApiPath(customer_id): ApiPath<i64>,
    ApiJson(request): ApiJson<SendNotificationRequest>,
) -> Result<Response, ApiError> {
    let sent = state.notifications.send(customer_id, request).await?;
    Ok(respond(StatusCode::CREATED, sent))
}

#[utoipa::path(
    put, path = "/api/v1/customers/{customerId}/notifications/{notificationId}/read", tag = "notifications",
    params(
        ("customerId" = i64, Path, description = "Customer id"),
        ("notificationId" = i64, Path, description = "Notification id")
    ),
    responses((status = 200, description = "Notification marked as read", body = crate::openapi::NotificationResponseDoc))
)]
pub async fn mark_as_read(State(state): State<AppState>, ApiPath((_customer_id, notification_id)): ApiPath<(i64, i64)>) -> Response {
    respond(StatusCode::OK, state.notifications.mark_as_read(notification_id).await)
}

#[utoipa::path(
    delete, path = "/api/v1/customers/{customerId}/notifications/{notificationId}", tag = "notifications",
    params(
        ("customerId" = i64, Path, description = "Customer id"),
        ("notificationId" = i64, Path, description = "Notification id")
    ),
    responses((status = 204, description = "Notification deleted (no-op when the service is unavailable)"))
)]
pub async fn delete(State(state): State<AppState>, ApiPath((_customer_id, notification_id)): ApiPath<(i64, i64)>) -> Response {
    let deleted = state.notifications.delete(notification_id).await;
    let mut resp = StatusCode::NO_CONTENT.into_response();
    if deleted.is_fallback() {
        resp.headers_mut().insert(FALLBACK_HEADER, HeaderValue::from_static("true"));
    }
    resp
}
