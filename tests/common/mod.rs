//! In-memory store and recording push sender for testing

#![allow(dead_code)]

use std::{
    collections::HashMap,
    str::FromStr,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    },
};

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{DateTime, TimeZone, Utc};
use gymdesk::{
    db::{
        memberdb::{AttendanceExt, MemberExt},
        notificationdb::NotificationExt,
        plandb::PlanExt,
        subscriptiondb::SubscriptionExt,
    },
    dtos::plandtos::UpsertPlanDto,
    models::{
        notificationmodels::{PushMessage, UserNotification},
        planmodels::{Plan, PlanDurationKind},
        subscriptionmodels::{
            AttendanceRecord, ExpiryMarker, NewSubscription, Subscription, SubscriptionStatus,
        },
    },
    service::{error::ServiceError, notification_service::NotificationSender},
};
use uuid::Uuid;

pub fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 9, 0, 0).unwrap()
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    pub subscriptions: Mutex<HashMap<Uuid, Subscription>>,
    pub plans: Mutex<HashMap<Uuid, Plan>>,
    pub push_tokens: Mutex<HashMap<Uuid, String>>,
    pub attendance: Mutex<Vec<AttendanceRecord>>,
    pub notifications: Mutex<Vec<UserNotification>>,
    pub fail_marker_writes: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_plan(&self, code: &str, kind: PlanDurationKind, value: i32, max_sessions: Option<i32>) -> Plan {
        let now = Utc::now();
        let plan = Plan {
            id: Uuid::new_v4(),
            code: code.to_string(),
            name: code.to_string(),
            description: None,
            price: BigDecimal::from_str("1500.00").unwrap(),
            duration_kind: kind,
            duration_value: value,
            max_sessions,
            created_at: now,
            updated_at: now,
        };
        self.plans.lock().unwrap().insert(plan.id, plan.clone());
        plan
    }

    pub fn insert_subscription(
        &self,
        user_id: Uuid,
        plan_id: Uuid,
        start: DateTime<Utc>,
        end: Option<DateTime<Utc>>,
    ) -> Subscription {
        let sub = Subscription {
            id: Uuid::new_v4(),
            user_id,
            plan_id,
            status: SubscriptionStatus::Active,
            start_date: start,
            end_date: end,
            last_expiry_notification: None,
            created_at: start,
            updated_at: start,
        };
        self.subscriptions.lock().unwrap().insert(sub.id, sub.clone());
        sub
    }

    pub fn set_push_token(&self, user_id: Uuid, token: &str) {
        self.push_tokens.lock().unwrap().insert(user_id, token.to_string());
    }

    pub fn subscription(&self, id: Uuid) -> Subscription {
        self.subscriptions.lock().unwrap().get(&id).cloned().unwrap()
    }

    pub fn set_status(&self, id: Uuid, status: SubscriptionStatus) {
        if let Some(sub) = self.subscriptions.lock().unwrap().get_mut(&id) {
            sub.status = status;
        }
    }

    pub fn notification_count(&self) -> usize {
        self.notifications.lock().unwrap().len()
    }
}

#[async_trait]
impl SubscriptionExt for InMemoryStore {
    async fn create_subscription(&self, new: NewSubscription) -> Result<Subscription, sqlx::Error> {
        let sub = Subscription {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            plan_id: new.plan_id,
            status: new.status,
            start_date: new.start_date,
            end_date: Some(new.end_date),
            last_expiry_notification: None,
            created_at: new.start_date,
            updated_at: new.start_date,
        };
        self.subscriptions.lock().unwrap().insert(sub.id, sub.clone());
        Ok(sub)
    }

    async fn get_subscription(&self, subscription_id: Uuid) -> Result<Option<Subscription>, sqlx::Error> {
        Ok(self.subscriptions.lock().unwrap().get(&subscription_id).cloned())
    }

    async fn get_active_subscriptions_for_user(&self, user_id: Uuid) -> Result<Vec<Subscription>, sqlx::Error> {
        let mut subs: Vec<Subscription> = self
            .subscriptions
            .lock()
            .unwrap()
            .values()
            .filter(|s| s.user_id == user_id && s.status == SubscriptionStatus::Active)
            .cloned()
            .collect();
        subs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(subs)
    }

    async fn get_latest_subscription_for_user(&self, user_id: Uuid) -> Result<Option<Subscription>, sqlx::Error> {
        Ok(self
            .subscriptions
            .lock()
            .unwrap()
            .values()
            .filter(|s| s.user_id == user_id)
            .max_by_key(|s| s.created_at)
            .cloned())
    }

    async fn update_subscription_status(
        &self,
        subscription_id: Uuid,
        status: SubscriptionStatus,
    ) -> Result<(), sqlx::Error> {
        let mut subs = self.subscriptions.lock().unwrap();
        let sub = subs.get_mut(&subscription_id).ok_or(sqlx::Error::RowNotFound)?;
        sub.status = status;
        Ok(())
    }

    async fn update_subscription_end_date(
        &self,
        subscription_id: Uuid,
        end_date: DateTime<Utc>,
        status: SubscriptionStatus,
    ) -> Result<Subscription, sqlx::Error> {
        let mut subs = self.subscriptions.lock().unwrap();
        let sub = subs.get_mut(&subscription_id).ok_or(sqlx::Error::RowNotFound)?;
        sub.end_date = Some(end_date);
        sub.status = status;
        sub.last_expiry_notification = None;
        Ok(sub.clone())
    }

    async fn set_last_expiry_notification(
        &self,
        subscription_id: Uuid,
        marker: ExpiryMarker,
    ) -> Result<(), sqlx::Error> {
        if self.fail_marker_writes.load(Ordering::SeqCst) {
            return Err(sqlx::Error::PoolTimedOut);
        }
        let mut subs = self.subscriptions.lock().unwrap();
        let sub = subs.get_mut(&subscription_id).ok_or(sqlx::Error::RowNotFound)?;
        sub.last_expiry_notification = Some(marker);
        Ok(())
    }

    async fn get_notifiable_subscriptions(&self, horizon: DateTime<Utc>) -> Result<Vec<Subscription>, sqlx::Error> {
        let mut subs: Vec<Subscription> = self
            .subscriptions
            .lock()
            .unwrap()
            .values()
            .filter(|s| s.status == SubscriptionStatus::Active)
            .filter(|s| matches!(s.end_date, Some(end) if end < horizon))
            .filter(|s| s.last_expiry_notification != Some(ExpiryMarker::Expired))
            .cloned()
            .collect();
        subs.sort_by_key(|s| s.end_date);
        Ok(subs)
    }
}

#[async_trait]
impl PlanExt for InMemoryStore {
    async fn get_plan(&self, plan_id: Uuid) -> Result<Option<Plan>, sqlx::Error> {
        Ok(self.plans.lock().unwrap().get(&plan_id).cloned())
    }

    async fn get_plan_by_code(&self, code: &str) -> Result<Option<Plan>, sqlx::Error> {
        Ok(self.plans.lock().unwrap().values().find(|p| p.code == code).cloned())
    }

    async fn list_plans(&self) -> Result<Vec<Plan>, sqlx::Error> {
        let mut plans: Vec<Plan> = self.plans.lock().unwrap().values().cloned().collect();
        plans.sort_by(|a, b| a.price.cmp(&b.price));
        Ok(plans)
    }

    async fn upsert_plan(&self, dto: &UpsertPlanDto) -> Result<Plan, sqlx::Error> {
        let mut plans = self.plans.lock().unwrap();
        let now = Utc::now();
        let existing = plans.values().find(|p| p.code == dto.code).map(|p| (p.id, p.created_at));
        let (id, created_at) = existing.unwrap_or((Uuid::new_v4(), now));

        let plan = Plan {
            id,
            code: dto.code.clone(),
            name: dto.name.clone(),
            description: dto.description.clone(),
            price: dto.price.clone(),
            duration_kind: dto.duration_kind,
            duration_value: dto.duration_value,
            max_sessions: dto.max_sessions,
            created_at,
            updated_at: now,
        };
        plans.insert(id, plan.clone());
        Ok(plan)
    }
}

#[async_trait]
impl MemberExt for InMemoryStore {
    async fn get_push_token(&self, user_id: Uuid) -> Result<Option<String>, sqlx::Error> {
        Ok(self.push_tokens.lock().unwrap().get(&user_id).cloned())
    }
}

#[async_trait]
impl AttendanceExt for InMemoryStore {
    async fn count_check_ins(&self, subscription_id: Uuid) -> Result<i64, sqlx::Error> {
        let count = self
            .attendance
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.subscription_id == subscription_id)
            .count();
        Ok(count as i64)
    }

    async fn record_check_in(
        &self,
        user_id: Uuid,
        subscription_id: Uuid,
        checked_in_at: DateTime<Utc>,
    ) -> Result<AttendanceRecord, sqlx::Error> {
        let record = AttendanceRecord {
            id: Uuid::new_v4(),
            user_id,
            subscription_id,
            checked_in_at,
        };
        self.attendance.lock().unwrap().push(record.clone());
        Ok(record)
    }
}

#[async_trait]
impl NotificationExt for InMemoryStore {
    async fn store_notification(
        &self,
        user_id: Uuid,
        notification_type: &str,
        subscription_id: Option<Uuid>,
        metadata: Option<serde_json::Value>,
        message: String,
    ) -> Result<UserNotification, sqlx::Error> {
        let notification = UserNotification {
            id: Uuid::new_v4(),
            user_id,
            notification_type: notification_type.to_string(),
            subscription_id,
            metadata,
            message,
            is_read: false,
            created_at: Utc::now(),
        };
        self.notifications.lock().unwrap().push(notification.clone());
        Ok(notification)
    }
}

/// Push sender that keeps every message and can be told to fail
#[derive(Debug, Default)]
pub struct RecordingSender {
    pub sent: Mutex<Vec<PushMessage>>,
    pub fail: AtomicBool,
}

impl RecordingSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<PushMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl NotificationSender for RecordingSender {
    async fn send(&self, message: &PushMessage) -> Result<(), ServiceError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ServiceError::Notification("push gateway unavailable".to_string()));
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}
