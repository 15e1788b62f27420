//! Fixed payloads returned when the notification service cannot answer.

use std::fmt::Display;

use async_trait::async_trait;
use common::metrics::record_notification_fallback;
use tracing::warn;

use super::client::{NotificationClient, Remote};
use super::domain::{NotificationRequest, NotificationResponse};

pub const CREATE_UNAVAILABLE: &str =
    "Notification service is currently unavailable. Your notification will be processed when the service is back online.";
pub const GET_UNAVAILABLE: &str = "Could not retrieve notification: Service unavailable";
pub const MARK_READ_UNAVAILABLE: &str = "Could not mark notification as read: Service unavailable";

/// Wrap `payload` as a fallback after logging and counting the degraded call.
pub fn degrade<T>(operation: &'static str, cause: &dyn Display, payload: T) -> Remote<T> {
    warn!(operation, cause = %cause, "notification_fallback");
    record_notification_fallback(operation);
    Remote::Fallback(payload)
}

pub fn created() -> NotificationResponse { NotificationResponse::placeholder(None, CREATE_UNAVAILABLE) }

pub fn fetched(id: i64) -> NotificationResponse { NotificationResponse::placeholder(Some(id), GET_UNAVAILABLE) }

pub fn marked_read(id: i64) -> NotificationResponse { NotificationResponse::placeholder(Some(id), MARK_READ_UNAVAILABLE) }

/// Client that always answers with the fallback; used when no notification
/// service is configured.
#[derive(Debug, Default, Clone)]
pub struct FallbackNotificationClient;

const DISABLED: &str = "notification service not configured";

#[async_trait]
impl NotificationClient for FallbackNotificationClient {
    async fn create_notification(&self, _request: NotificationRequest) -> Remote<NotificationResponse> {
        degrade("create", &DISABLED, created())
    }

    async fn get_notification(&self, id: i64) -> Remote<NotificationResponse> {
        degrade("get", &DISABLED, fetched(id))
    }

    async fn get_notifications(&self, _recipient_id: i64, _unread: bool) -> Remote<Vec<NotificationResponse>> {
        degrade("list", &DISABLED, Vec::new())
    }

    async fn get_notification_count(&self, _recipient_id: i64, _unread: bool) -> Remote<u64> {
        degrade("count", &DISABLED, 0)
    }

    async fn mark_as_read(&self, id: i64) -> Remote<NotificationResponse> {
        degrade("mark_as_read", &DISABLED, marked_read(id))
    }

    async fn delete_notification(&self, _id: i64) -> Remote<()> {
        degrade("delete", &DISABLED, ())
    }
}
