use std::sync::Arc;

use tracing::{info, instrument};

use super::client::{NotificationClient, Remote};
use super::domain::{NotificationResponse, SendNotificationRequest};
use crate::errors::ServiceError;

/// Customer-facing notification operations on top of a [`NotificationClient`].
///
/// Only request validation can fail; remote trouble comes back as `Remote::Fallback`.
pub struct CustomerNotificationService<C: NotificationClient + ?Sized> {
    client: Arc<C>,
}

impl<C: NotificationClient + ?Sized> CustomerNotificationService<C> {
    pub fn new(client: Arc<C>) -> Self { Self { client } }

    /// Send a notification to `customer_id`.
    ///
    /// # Examples
    /// ```
    /// use service::notification::{CustomerNotificationService, FallbackNotificationClient};
    /// use service::notification::domain::SendNotificationRequest;
    /// use std::sync::Arc;
    /// let svc = CustomerNotificationService::new(Arc::new(FallbackNotificationClient));
    /// let req = SendNotificationRequest { title: Some("Hi".into()), message: Some("Welcome".into()), kind: Some("INFO".into()), action_url: None };
    /// let sent = tokio_test::block_on(svc.send(1, req)).unwrap();
    /// assert!(sent.is_fallback());
    /// ```
    #[instrument(skip(self, request))]
    pub async fn send(&self, customer_id: i64, request: SendNotificationRequest) -> Result<Remote<NotificationResponse>, ServiceError> {
        let request = request.into_request(customer_id)?;
        let sent = self.client.create_notification(request).await;
        if !sent.is_fallback() {
            info!(customer_id, "notification_sent");
        }
        Ok(sent)
    }

    pub async fn list(&self, customer_id: i64) -> Remote<Vec<NotificationResponse>> {
        self.client.get_notifications(customer_id, false).await
    }

    pub async fn unread(&self, customer_id: i64) -> Remote<Vec<NotificationResponse>> {
        self.client.get_notifications(customer_id, true).await
    }

    pub async fn count(&self, customer_id: i64, unread_only: bool) -> Remote<u64> {
        self.client.get_notification_count(customer_id, unread_only).await
    }

    pub async fn get(&self, notification_id: i64) -> Remote<NotificationResponse> {
        self.client.get_notification(notification_id).await
    }

    pub async fn mark_as_read(&self, notification_id: i64) -> Remote<NotificationResponse> {
        self.client.mark_as_read(notification_id).await
    }

    pub async fn delete(&self, notification_id: i64) -> Remote<()> {
        self.client.delete_notification(notification_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::notification::domain::NotificationRequest;
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    /// Records what it was asked and answers live.
    #[derive(Default)]
    struct RecordingClient {
        sent: Mutex<Vec<NotificationRequest>>,
        unread_flags: Mutex<Vec<bool>>,
    }

    #[async_trait]
    impl NotificationClient for RecordingClient {
        async fn create_notification(&self, request: NotificationRequest) -> Remote<NotificationResponse> {
            let resp = NotificationResponse {
                id: Some(1),
                recipient_id: Some(request.recipient_id),
                title: Some(request.title.clone()),
                ..Default::default()
            };
            self.sent.lock().await.push(request);
            Remote::Live(resp)
        }
        async fn get_notification(&self, id: i64) -> Remote<NotificationResponse> {
            Remote::Live(NotificationResponse { id: Some(id), ..Default::default() })
        }
        async fn get_notifications(&self, _recipient_id: i64, unread: bool) -> Remote<Vec<NotificationResponse>> {
            self.unread_flags.lock().await.push(unread);
            Remote::Live(vec![])
        }
        async fn get_notification_count(&self, _recipient_id: i64, unread: bool) -> Remote<u64> {
            Remote::Live(if unread { 1 } else { 4 })
        }
        async fn mark_as_read(&self, id: i64) -> Remote<NotificationResponse> {
            Remote::Live(NotificationResponse { id: Some(id), read: Some(true), ..Default::default() })
        }
        async fn delete_notification(&self, _id: i64) -> Remote<()> {
            Remote::Live(())
        }
    }

    fn valid() -> SendNotificationRequest {
        SendNotificationRequest {
            title: Some("Welcome".into()),
            message: Some("Hello".into()),
            kind: Some("INFO".into()),
            action_url: Some("https://example.com/x".into()),
        }
    }

    #[tokio::test]
    async fn send_addresses_the_customer() {
        let client = Arc::new(RecordingClient::default());
        let svc = CustomerNotificationService::new(client.clone());
        let sent = svc.send(42, valid()).await.unwrap();
        assert_eq!(sent.into_inner().recipient_id, Some(42));
        let recorded = client.sent.lock().await;
        assert_eq!(recorded[0].recipient_id, 42);
        assert_eq!(recorded[0].action_url.as_deref(), Some("https://example.com/x"));
    }

    #[tokio::test]
    async fn invalid_send_never_reaches_the_client() {
        let client = Arc::new(RecordingClient::default());
        let svc = CustomerNotificationService::new(client.clone());
        let err = svc.send(42, SendNotificationRequest::default()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
        assert!(client.sent.lock().await.is_empty());
    }

    #[tokio::test]
    async fn list_and_unread_pass_the_right_flag() {
        let client = Arc::new(RecordingClient::default());
        let svc = CustomerNotificationService::new(client.clone());
        svc.list(1).await;
        svc.unread(1).await;
        assert_eq!(*client.unread_flags.lock().await, vec![false, true]);
        assert_eq!(svc.count(1, true).await, Remote::Live(1));
        assert_eq!(svc.count(1, false).await, Remote::Live(4));
    }

    #[tokio::test]
    async fn works_behind_a_trait_object() {
        let client: Arc<dyn NotificationClient> = Arc::new(RecordingClient::default());
        let svc = CustomerNotificationService::new(client);
        assert_eq!(svc.mark_as_read(3).await.into_inner().read, Some(true));
        assert_eq!(svc.get(3).await.into_inner().id, Some(3));
        assert_eq!(svc.delete(3).await, Remote::Live(()));
    }
}
