use async_trait::async_trait;
use uuid::Uuid;

use crate::models::notificationmodels::UserNotification;

#[async_trait]
pub trait NotificationExt {
    async fn store_notification(
        &self,
        user_id: Uuid,
        notification_type: &str,
        subscription_id: Option<Uuid>,
        metadata: Option<serde_json::Value>,
        message: String,
    ) -> Result<UserNotification, sqlx::Error>;
}

#[async_trait]
impl NotificationExt for super::db::DBClient {
    async fn store_notification(
        &self,
        user_id: Uuid,
        notification_type: &str,
        subscription_id: Option<Uuid>,
        metadata: Option<serde_json::Value>,
        message: String,
    ) -> Result<UserNotification, sqlx::Error> {
        sqlx::query_as::<_, UserNotification>(
            r#"
            INSERT INTO notifications
            (user_id, type, subscription_id, metadata, message)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#
        )
        .bind(user_id)
        .bind(notification_type)
        .bind(subscription_id)
        .bind(metadata)
        .bind(message)
        .fetch_one(&self.pool)
        .await
    }
}
