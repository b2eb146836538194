// service/notification_service.rs
use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    db::{memberdb::MemberExt, notificationdb::NotificationExt},
    models::notificationmodels::{NotificationIntent, NotificationKind, PushMessage},
    service::error::ServiceError,
};

/// Push transport. Delivery itself lives outside this crate.
#[async_trait]
pub trait NotificationSender: Send + Sync + std::fmt::Debug {
    async fn send(&self, message: &PushMessage) -> Result<(), ServiceError>;
}

/// Transport that only logs; used when no push provider is configured.
#[derive(Debug, Clone, Default)]
pub struct LogSender;

#[async_trait]
impl NotificationSender for LogSender {
    async fn send(&self, message: &PushMessage) -> Result<(), ServiceError> {
        tracing::info!(
            "Push notification to {}: {} - {}",
            message.token,
            message.title,
            message.body
        );
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Pushed,
    /// Member has no registered device; only the in-app record was written.
    InAppOnly,
}

#[derive(Debug, Clone)]
pub struct NotificationService<S> {
    store: Arc<S>,
    sender: Arc<dyn NotificationSender>,
}

impl<S> NotificationService<S>
where
    S: MemberExt + NotificationExt + Send + Sync,
{
    pub fn new(store: Arc<S>, sender: Arc<dyn NotificationSender>) -> Self {
        Self { store, sender }
    }

    pub fn title_and_body(intent: &NotificationIntent) -> (String, String) {
        match intent.kind {
            NotificationKind::ExpiringSoon => {
                let unit = if intent.days_remaining == 1 { "day" } else { "days" };
                (
                    "Membership expiring soon".to_string(),
                    format!(
                        "Your gym membership expires in {} {}. Renew now to keep training without interruption.",
                        intent.days_remaining, unit
                    ),
                )
            }
            NotificationKind::Expired => (
                "Membership expired".to_string(),
                "Your gym membership has expired. Renew at the front desk or in the app to regain access."
                    .to_string(),
            ),
        }
    }

    pub fn build_message(intent: &NotificationIntent, token: String) -> PushMessage {
        let (title, body) = Self::title_and_body(intent);
        PushMessage {
            token,
            title,
            body,
            data: serde_json::json!({
                "subscriptionId": intent.subscription_id,
                "kind": intent.kind.to_str(),
                "daysRemaining": intent.days_remaining,
            }),
        }
    }

    /// Sends the push (when the member has a device) and stores the in-app copy.
    ///
    /// The in-app row is written only after a successful push, so a failed
    /// send leaves nothing behind for the next poll to duplicate.
    pub async fn dispatch(
        &self,
        intent: &NotificationIntent,
    ) -> Result<DispatchOutcome, ServiceError> {
        let token = self.store.get_push_token(intent.user_id).await?;

        let outcome = match token {
            Some(token) => {
                let message = Self::build_message(intent, token);
                self.sender.send(&message).await?;
                DispatchOutcome::Pushed
            }
            None => {
                tracing::debug!(
                    "User {} has no push token; storing in-app notification only",
                    intent.user_id
                );
                DispatchOutcome::InAppOnly
            }
        };

        let (_, body) = Self::title_and_body(intent);
        self.store
            .store_notification(
                intent.user_id,
                intent.kind.to_str(),
                Some(intent.subscription_id),
                Some(serde_json::json!({ "days_remaining": intent.days_remaining })),
                body,
            )
            .await?;

        Ok(outcome)
    }
}
