use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::subscriptionmodels::{
    ExpiryMarker, NewSubscription, Subscription, SubscriptionStatus,
};

#[async_trait]
pub trait SubscriptionExt {
    async fn create_subscription(
        &self,
        new: NewSubscription,
    ) -> Result<Subscription, sqlx::Error>;

    async fn get_subscription(
        &self,
        subscription_id: Uuid,
    ) -> Result<Option<Subscription>, sqlx::Error>;

    /// Rows whose stored flag is still `active`, newest first.
    async fn get_active_subscriptions_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Subscription>, sqlx::Error>;

    /// Most recently created row of any status.
    async fn get_latest_subscription_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<Subscription>, sqlx::Error>;

    async fn update_subscription_status(
        &self,
        subscription_id: Uuid,
        status: SubscriptionStatus,
    ) -> Result<(), sqlx::Error>;

    /// Moves the end date; always clears `last_expiry_notification`.
    async fn update_subscription_end_date(
        &self,
        subscription_id: Uuid,
        end_date: DateTime<Utc>,
        status: SubscriptionStatus,
    ) -> Result<Subscription, sqlx::Error>;

    async fn set_last_expiry_notification(
        &self,
        subscription_id: Uuid,
        marker: ExpiryMarker,
    ) -> Result<(), sqlx::Error>;

    /// Active rows ending before `horizon` that have not had their expired notice.
    async fn get_notifiable_subscriptions(
        &self,
        horizon: DateTime<Utc>,
    ) -> Result<Vec<Subscription>, sqlx::Error>;
}

#[async_trait]
impl SubscriptionExt for super::db::DBClient {
    async fn create_subscription(
        &self,
        new: NewSubscription,
    ) -> Result<Subscription, sqlx::Error> {
        sqlx::query_as::<_, Subscription>(
            r#"
            INSERT INTO subscriptions
            (user_id, plan_id, status, start_date, end_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#
        )
        .bind(new.user_id)
        .bind(new.plan_id)
        .bind(new.status)
        .bind(new.start_date)
        .bind(new.end_date)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_subscription(
        &self,
        subscription_id: Uuid,
    ) -> Result<Option<Subscription>, sqlx::Error> {
        sqlx::query_as::<_, Subscription>("SELECT * FROM subscriptions WHERE id = $1")
            .bind(subscription_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_active_subscriptions_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Subscription>, sqlx::Error> {
        sqlx::query_as::<_, Subscription>(
            r#"
            SELECT * FROM subscriptions
            WHERE user_id = $1 AND status = 'active'
            ORDER BY created_at DESC
            "#
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_latest_subscription_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<Subscription>, sqlx::Error> {
        sqlx::query_as::<_, Subscription>(
            r#"
            SELECT * FROM subscriptions
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT 1
            "#
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn update_subscription_status(
        &self,
        subscription_id: Uuid,
        status: SubscriptionStatus,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE subscriptions
            SET status = $1, updated_at = NOW()
            WHERE id = $2
            "#
        )
        .bind(status)
        .bind(subscription_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_subscription_end_date(
        &self,
        subscription_id: Uuid,
        end_date: DateTime<Utc>,
        status: SubscriptionStatus,
    ) -> Result<Subscription, sqlx::Error> {
        sqlx::query_as::<_, Subscription>(
            r#"
            UPDATE subscriptions
            SET end_date = $1,
                status = $2,
                last_expiry_notification = NULL,
                updated_at = NOW()
            WHERE id = $3
            RETURNING *
            "#
        )
        .bind(end_date)
        .bind(status)
        .bind(subscription_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn set_last_expiry_notification(
        &self,
        subscription_id: Uuid,
        marker: ExpiryMarker,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE subscriptions
            SET last_expiry_notification = $1, updated_at = NOW()
            WHERE id = $2
            "#
        )
        .bind(marker)
        .bind(subscription_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_notifiable_subscriptions(
        &self,
        horizon: DateTime<Utc>,
    ) -> Result<Vec<Subscription>, sqlx::Error> {
        sqlx::query_as::<_, Subscription>(
            r#"
            SELECT * FROM subscriptions
            WHERE status = 'active'
            AND end_date IS NOT NULL
            AND end_date < $1
            AND last_expiry_notification IS DISTINCT FROM 'expired'
            ORDER BY end_date ASC
            "#
        )
        .bind(horizon)
        .fetch_all(&self.pool)
        .await
    }
}
