use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::subscriptionmodels::AttendanceRecord;

#[async_trait]
pub trait MemberExt {
    /// Device token registered by the member's app, if any.
    async fn get_push_token(&self, user_id: Uuid) -> Result<Option<String>, sqlx::Error>;
}

#[async_trait]
pub trait AttendanceExt {
    async fn count_check_ins(&self, subscription_id: Uuid) -> Result<i64, sqlx::Error>;

    async fn record_check_in(
        &self,
        user_id: Uuid,
        subscription_id: Uuid,
        checked_in_at: DateTime<Utc>,
    ) -> Result<AttendanceRecord, sqlx::Error>;
}

#[async_trait]
impl MemberExt for super::db::DBClient {
    async fn get_push_token(&self, user_id: Uuid) -> Result<Option<String>, sqlx::Error> {
        let token = sqlx::query_scalar::<_, Option<String>>(
            "SELECT push_token FROM members WHERE id = $1"
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(token.flatten().filter(|t| !t.trim().is_empty()))
    }
}

#[async_trait]
impl AttendanceExt for super::db::DBClient {
    async fn count_check_ins(&self, subscription_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM attendance WHERE subscription_id = $1"
        )
        .bind(subscription_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn record_check_in(
        &self,
        user_id: Uuid,
        subscription_id: Uuid,
        checked_in_at: DateTime<Utc>,
    ) -> Result<AttendanceRecord, sqlx::Error> {
        sqlx::query_as::<_, AttendanceRecord>(
            r#"
            INSERT INTO attendance (user_id, subscription_id, checked_in_at)
            VALUES ($1, $2, $3)
            RETURNING *
            "#
        )
        .bind(user_id)
        .bind(subscription_id)
        .bind(checked_in_at)
        .fetch_one(&self.pool)
        .await
    }
}
