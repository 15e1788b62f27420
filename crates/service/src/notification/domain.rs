use serde::{Deserialize, Serialize};

use crate::validation::{check_required, ValidationErrors};

/// Payload sent to the notification service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRequest {
    pub recipient_id: i64,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
}

/// Body of `POST /api/v1/customers/{customerId}/notifications`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SendNotificationRequest {
    pub title: Option<String>,
    pub message: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
}

impl SendNotificationRequest {
    /// `title`, `message` and `type` are required and must not be blank.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        check_required(&mut errors, "title", self.title.as_deref(), None);
        check_required(&mut errors, "message", self.message.as_deref(), None);
        check_required(&mut errors, "type", self.kind.as_deref(), None);
        errors.into_result()
    }

    /// Address the request to `recipient_id` once it has been validated.
    pub fn into_request(self, recipient_id: i64) -> Result<NotificationRequest, ValidationErrors> {
        self.validate()?;
        Ok(NotificationRequest {
            recipient_id,
            title: self.title.unwrap_or_default(),
            message: self.message.unwrap_or_default(),
            kind: self.kind.unwrap_or_default(),
            action_url: self.action_url,
        })
    }
}

/// Notification as returned by the notification service, passed through as-is.
///
/// Every field is optional because fallback placeholders only carry a message
/// (and the id when it is known). Timestamps are forwarded in whatever shape
/// the remote produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<serde_json::Value>,
}

impl NotificationResponse {
    pub fn placeholder(id: Option<i64>, message: &str) -> Self {
        Self { id, message: Some(message.to_string()), ..Default::default() }
    }
}
