use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::subscriptionmodels::ExpiryMarker;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    ExpiringSoon,
    Expired,
}

impl NotificationKind {
    pub fn to_str(&self) -> &str {
        match self {
            NotificationKind::ExpiringSoon => "expiring_soon",
            NotificationKind::Expired => "expired",
        }
    }
}

/// A decision that a member should hear about their membership expiry.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationIntent {
    pub subscription_id: Uuid,
    pub user_id: Uuid,
    pub kind: NotificationKind,
    pub days_remaining: u32,
}

impl NotificationIntent {
    /// Marker to persist once this intent has been delivered.
    pub fn marker(&self) -> ExpiryMarker {
        match self.kind {
            NotificationKind::Expired => ExpiryMarker::Expired,
            NotificationKind::ExpiringSoon => ExpiryMarker::DaysRemaining(self.days_remaining),
        }
    }
}

/// Payload handed to the push transport.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PushMessage {
    pub token: String,
    pub title: String,
    pub body: String,
    pub data: serde_json::Value,
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct UserNotification {
    pub id: Uuid,
    pub user_id: Uuid,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub notification_type: String,
    pub subscription_id: Option<Uuid>,
    pub metadata: Option<serde_json::Value>,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}
