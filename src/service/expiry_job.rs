// service/expiry_job.rs
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use tokio::time::{interval, Duration};

use crate::{
    db::{memberdb::MemberExt, notificationdb::NotificationExt, subscriptiondb::SubscriptionExt},
    models::{
        notificationmodels::{NotificationIntent, NotificationKind},
        subscriptionmodels::SubscriptionStatus,
    },
    service::{
        error::ServiceError,
        lifecycle::{evaluate_batch, EXPIRY_WARNING_HORIZON_DAYS},
        notification_service::NotificationService,
    },
    utils::dates::{add_days, start_of_day},
    AppState,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpiryRunReport {
    pub scanned: usize,
    pub notified: usize,
    pub failed: usize,
    pub demoted: usize,
}

#[derive(Debug, Clone)]
pub struct ExpiryNotificationJob<S> {
    store: Arc<S>,
    notifications: NotificationService<S>,
    concurrency: usize,
}

impl<S> ExpiryNotificationJob<S>
where
    S: SubscriptionExt + MemberExt + NotificationExt + Send + Sync,
{
    pub fn new(store: Arc<S>, notifications: NotificationService<S>, concurrency: usize) -> Self {
        Self {
            store,
            notifications,
            concurrency: concurrency.max(1),
        }
    }

    /// One poll: evaluate every candidate at `now`, notify, persist markers.
    ///
    /// A record whose send or marker write fails keeps its old marker and is
    /// picked up again by the next poll.
    pub async fn run_once(&self, now: DateTime<Utc>) -> Result<ExpiryRunReport, ServiceError> {
        // Anything ending before midnight after the widest threshold day.
        let horizon = add_days(start_of_day(now), EXPIRY_WARNING_HORIZON_DAYS + 1);
        let candidates = self.store.get_notifiable_subscriptions(horizon).await?;
        let intents = evaluate_batch(&candidates, now);

        let mut report = ExpiryRunReport {
            scanned: candidates.len(),
            ..Default::default()
        };

        let results: Vec<(NotificationIntent, Result<(), ServiceError>)> = stream::iter(intents)
            .map(|intent| async move {
                let result = self.deliver(&intent).await;
                (intent, result)
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        for (intent, result) in results {
            match result {
                Ok(()) => {
                    report.notified += 1;
                    if intent.kind == NotificationKind::Expired {
                        report.demoted += 1;
                    }
                }
                Err(e) => {
                    report.failed += 1;
                    if e.is_transient() {
                        tracing::warn!(
                            "Expiry notification for subscription {} will be retried: {}",
                            intent.subscription_id,
                            e
                        );
                    } else {
                        tracing::error!(
                            "Expiry notification for subscription {} failed: {}",
                            intent.subscription_id,
                            e
                        );
                    }
                }
            }
        }

        Ok(report)
    }

    async fn deliver(&self, intent: &NotificationIntent) -> Result<(), ServiceError> {
        let outcome = self.notifications.dispatch(intent).await?;
        self.store
            .set_last_expiry_notification(intent.subscription_id, intent.marker())
            .await?;

        if intent.kind == NotificationKind::Expired {
            self.store
                .update_subscription_status(intent.subscription_id, SubscriptionStatus::Expired)
                .await?;
        }

        tracing::info!(
            "Sent {} notice for subscription {} ({} days left, {:?})",
            intent.kind.to_str(),
            intent.subscription_id,
            intent.days_remaining,
            outcome
        );

        Ok(())
    }
}

/// Start background job for membership expiry notifications
pub async fn start_expiry_notification_job(app_state: Arc<AppState>) {
    let mut interval = interval(Duration::from_secs(app_state.env.expiry_check_interval_secs));

    loop {
        interval.tick().await;

        let now = Utc::now();
        tracing::info!("Running expiry notification job at {}", now);

        match app_state.expiry_job.run_once(now).await {
            Ok(report) => tracing::info!(
                "Expiry notification job completed: scanned {}, notified {}, failed {}, expired {}",
                report.scanned,
                report.notified,
                report.failed,
                report.demoted
            ),
            Err(e) => tracing::error!("Expiry notification job failed: {}", e),
        }
    }
}
