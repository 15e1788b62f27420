use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};

use super::circuit_breaker::CircuitBreaker;
use super::domain::{NotificationRequest, NotificationResponse};
use super::fallback;

/// Outcome of a notification call: the remote's answer or a degraded stand-in.
#[derive(Debug, Clone, PartialEq)]
pub enum Remote<T> {
    Live(T),
    Fallback(T),
}

impl<T> Remote<T> {
    pub fn is_fallback(&self) -> bool { matches!(self, Remote::Fallback(_)) }

    pub fn into_inner(self) -> T {
        match self {
            Remote::Live(v) | Remote::Fallback(v) => v,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Remote<U> {
        match self {
            Remote::Live(v) => Remote::Live(f(v)),
            Remote::Fallback(v) => Remote::Fallback(f(v)),
        }
    }
}

/// Why a remote call did not produce a live answer.
#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("circuit open")]
    CircuitOpen,
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(StatusCode),
    #[error("undecodable response: {0}")]
    Decode(String),
}

/// Capabilities of the external notification service.
///
/// Calls never fail: an unavailable remote yields `Remote::Fallback`.
#[async_trait]
pub trait NotificationClient: Send + Sync {
    async fn create_notification(&self, request: NotificationRequest) -> Remote<NotificationResponse>;
    async fn get_notification(&self, id: i64) -> Remote<NotificationResponse>;
    async fn get_notifications(&self, recipient_id: i64, unread: bool) -> Remote<Vec<NotificationResponse>>;
    async fn get_notification_count(&self, recipient_id: i64, unread: bool) -> Remote<u64>;
    async fn mark_as_read(&self, id: i64) -> Remote<NotificationResponse>;
    async fn delete_notification(&self, id: i64) -> Remote<()>;
}

/// reqwest client for `{base_url}`, `{base_url}/{id}`, `{base_url}/count`, `{base_url}/{id}/read`.
pub struct HttpNotificationClient {
    http: Client,
    base_url: String,
    breaker: CircuitBreaker,
}

impl HttpNotificationClient {
    pub fn new(base_url: &str, timeout: Duration, breaker: CircuitBreaker) -> Result<Self, NotificationError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_string(), breaker })
    }

    pub fn from_config(cfg: &configs::NotificationConfig) -> Result<Self, NotificationError> {
        Self::new(
            &cfg.base_url,
            Duration::from_millis(cfg.timeout_ms),
            CircuitBreaker::from_config(&cfg.circuit_breaker),
        )
    }

    pub fn circuit_breaker(&self) -> &CircuitBreaker { &self.breaker }

    fn url(&self, suffix: &str) -> String { format!("{}{}", self.base_url, suffix) }

    /// One guarded exchange. The breaker hears the outcome only after the body is decoded.
    async fn call<T>(
        &self,
        req: RequestBuilder,
        decode: impl FnOnce(&[u8]) -> Result<T, NotificationError>,
    ) -> Result<T, NotificationError> {
        let Some(permit) = self.breaker.try_acquire().await else {
            return Err(NotificationError::CircuitOpen);
        };
        let res = exchange(req, decode).await;
        match &res {
            Ok(_) => permit.success().await,
            Err(_) => permit.failure().await,
        }
        res
    }

    async fn fetch<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, NotificationError> {
        self.call(req, |bytes| serde_json::from_slice(bytes).map_err(|e| NotificationError::Decode(e.to_string())))
            .await
    }
}

async fn exchange<T>(
    req: RequestBuilder,
    decode: impl FnOnce(&[u8]) -> Result<T, NotificationError>,
) -> Result<T, NotificationError> {
    let resp = req.send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(NotificationError::Status(status));
    }
    let bytes = resp.bytes().await?;
    decode(&bytes)
}

fn settle<T>(operation: &'static str, res: Result<T, NotificationError>, fallback: impl FnOnce() -> T) -> Remote<T> {
    match res {
        Ok(v) => {
            debug!(operation, "notification_call_ok");
            Remote::Live(v)
        }
        Err(e) => fallback::degrade(operation, &e, fallback()),
    }
}

#[async_trait]
impl NotificationClient for HttpNotificationClient {
    #[instrument(skip(self, request), fields(recipient_id = request.recipient_id))]
    async fn create_notification(&self, request: NotificationRequest) -> Remote<NotificationResponse> {
        let res = self.fetch(self.http.post(self.url("")).json(&request)).await;
        settle("create", res, fallback::created)
    }

    #[instrument(skip(self))]
    async fn get_notification(&self, id: i64) -> Remote<NotificationResponse> {
        let res = self.fetch(self.http.get(self.url(&format!("/{id}")))).await;
        settle("get", res, || fallback::fetched(id))
    }

    #[instrument(skip(self))]
    async fn get_notifications(&self, recipient_id: i64, unread: bool) -> Remote<Vec<NotificationResponse>> {
        let req = self
            .http
            .get(self.url(""))
            .query(&[("recipientId", recipient_id.to_string()), ("unread", unread.to_string())]);
        settle("list", self.fetch(req).await, Vec::new)
    }

    #[instrument(skip(self))]
    async fn get_notification_count(&self, recipient_id: i64, unread: bool) -> Remote<u64> {
        let req = self
            .http
            .get(self.url("/count"))
            .query(&[("recipientId", recipient_id.to_string()), ("unread", unread.to_string())]);
        settle("count", self.fetch(req).await, || 0)
    }

    #[instrument(skip(self))]
    async fn mark_as_read(&self, id: i64) -> Remote<NotificationResponse> {
        let res = self.fetch(self.http.put(self.url(&format!("/{id}/read")))).await;
        settle("mark_as_read", res, || fallback::marked_read(id))
    }

    #[instrument(skip(self))]
    async fn delete_notification(&self, id: i64) -> Remote<()> {
        let res = self.call(self.http.delete(self.url(&format!("/{id}"))), |_| Ok(())).await;
        settle("delete", res, || ())
    }
}
