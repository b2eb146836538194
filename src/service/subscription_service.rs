use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    db::{memberdb::AttendanceExt, plandb::PlanExt, subscriptiondb::SubscriptionExt},
    dtos::subscriptiondtos::{AccessDecision, DenialReason, SubscriptionSummary},
    models::{
        planmodels::Plan,
        subscriptionmodels::{AttendanceRecord, NewSubscription, Subscription, SubscriptionStatus},
    },
    service::{error::ServiceError, lifecycle::effective_status},
    utils::dates::days_remaining,
};

#[derive(Debug, Clone)]
pub struct SubscriptionService<S> {
    store: Arc<S>,
}

impl<S> SubscriptionService<S>
where
    S: SubscriptionExt + PlanExt + AttendanceExt + Send + Sync,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    async fn plan(&self, plan_id: Uuid) -> Result<Plan, ServiceError> {
        self.store
            .get_plan(plan_id)
            .await?
            .ok_or_else(|| ServiceError::PlanNotFound(plan_id.to_string()))
    }

    async fn subscription(&self, subscription_id: Uuid) -> Result<Subscription, ServiceError> {
        self.store
            .get_subscription(subscription_id)
            .await?
            .ok_or(ServiceError::SubscriptionNotFound(subscription_id))
    }

    /// Cancels every other stored-active membership of the member so only
    /// `keep` stays eligible for access and expiry warnings.
    async fn supersede_others(&self, keep: &Subscription) -> Result<(), ServiceError> {
        let active = self
            .store
            .get_active_subscriptions_for_user(keep.user_id)
            .await?;

        for old in active.iter().filter(|s| s.id != keep.id) {
            self.store
                .update_subscription_status(old.id, SubscriptionStatus::Cancelled)
                .await?;
            tracing::info!(
                "Subscription {} for user {} superseded by {} ({} -> {})",
                old.id,
                keep.user_id,
                keep.id,
                old.status.to_str(),
                SubscriptionStatus::Cancelled.to_str()
            );
        }

        Ok(())
    }

    /// Starts a new membership at `now` and demotes any other active one.
    pub async fn purchase(
        &self,
        user_id: Uuid,
        plan_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Subscription, ServiceError> {
        let plan = self.plan(plan_id).await?;

        let subscription = self
            .store
            .create_subscription(NewSubscription {
                user_id,
                plan_id,
                status: SubscriptionStatus::Active,
                start_date: now,
                end_date: plan.duration_policy().end_from(now),
            })
            .await?;

        self.supersede_others(&subscription).await?;

        tracing::info!(
            "User {} purchased plan {} until {:?}",
            user_id,
            plan.code,
            subscription.end_date
        );

        Ok(subscription)
    }

    /// Extends a membership by one plan period.
    ///
    /// An unexpired membership is extended from its current end, a lapsed one
    /// from `now`. The expiry notification cycle starts over either way, and
    /// any other active membership of the member is cancelled.
    pub async fn renew(
        &self,
        subscription_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Subscription, ServiceError> {
        let subscription = self.subscription(subscription_id).await?;

        if subscription.status == SubscriptionStatus::Cancelled {
            return Err(ServiceError::Validation(format!(
                "Subscription {} was cancelled and cannot be renewed",
                subscription_id
            )));
        }

        let plan = self.plan(subscription.plan_id).await?;
        let base = match subscription.end_date {
            Some(end) if end > now => end,
            _ => now,
        };
        let new_end = plan.duration_policy().end_from(base);

        let renewed = self
            .store
            .update_subscription_end_date(subscription_id, new_end, SubscriptionStatus::Active)
            .await?;

        self.supersede_others(&renewed).await?;

        tracing::info!(
            "Subscription {} renewed on plan {} until {}",
            subscription_id,
            plan.code,
            new_end
        );

        Ok(renewed)
    }

    pub async fn summary(
        &self,
        subscription_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<SubscriptionSummary, ServiceError> {
        let subscription = self.subscription(subscription_id).await?;
        let plan = self.plan(subscription.plan_id).await?;
        let sessions_used = self.store.count_check_ins(subscription_id).await?;

        Ok(SubscriptionSummary {
            subscription_id,
            user_id: subscription.user_id,
            plan_code: plan.code,
            stored_status: subscription.status,
            effective_status: effective_status(&subscription, now),
            start_date: subscription.start_date,
            end_date: subscription.end_date,
            days_remaining: subscription.end_date.map(|end| days_remaining(end, now)),
            sessions_used,
            max_sessions: plan.max_sessions,
        })
    }

    /// Whether the member may enter the gym at `now`.
    pub async fn check_access(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<AccessDecision, ServiceError> {
        let subscriptions = self.store.get_active_subscriptions_for_user(user_id).await?;

        let current = subscriptions
            .iter()
            .find(|s| effective_status(s, now) == SubscriptionStatus::Active);

        let Some(current) = current else {
            // Rows the expiry job or a cancellation demoted are not in the
            // active set but still explain the refusal.
            let newest = match subscriptions.first() {
                Some(sub) => Some(sub.clone()),
                None => self.store.get_latest_subscription_for_user(user_id).await?,
            };
            let reason = match newest {
                Some(sub) => denial_reason(&sub, now),
                None => DenialReason::NoSubscription,
            };
            return Ok(AccessDecision::Denied { reason });
        };

        let plan = self.plan(current.plan_id).await?;
        let sessions_left = match plan.session_quota() {
            Some(quota) => {
                let used = self.store.count_check_ins(current.id).await?;
                if used >= quota {
                    return Ok(AccessDecision::Denied {
                        reason: DenialReason::QuotaExhausted,
                    });
                }
                Some(quota - used)
            }
            None => None,
        };

        Ok(AccessDecision::Granted {
            subscription_id: current.id,
            sessions_left,
        })
    }

    /// Records an attendance entry if access is granted.
    pub async fn check_in(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<AttendanceRecord, ServiceError> {
        match self.check_access(user_id, now).await? {
            AccessDecision::Granted { subscription_id, .. } => {
                let record = self
                    .store
                    .record_check_in(user_id, subscription_id, now)
                    .await?;
                tracing::info!("User {} checked in on subscription {}", user_id, subscription_id);
                Ok(record)
            }
            AccessDecision::Denied { reason } => {
                tracing::warn!("Check-in refused for user {}: {}", user_id, reason);
                Err(ServiceError::AccessDenied { user_id, reason })
            }
        }
    }
}

fn denial_reason(sub: &Subscription, now: DateTime<Utc>) -> DenialReason {
    if sub.status == SubscriptionStatus::Cancelled {
        return DenialReason::Cancelled;
    }

    match effective_status(sub, now) {
        SubscriptionStatus::Pending => DenialReason::Pending,
        _ => DenialReason::Expired,
    }
}
