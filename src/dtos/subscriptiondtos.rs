use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::subscriptionmodels::SubscriptionStatus;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SubscriptionSummary {
    pub subscription_id: Uuid,
    pub user_id: Uuid,
    pub plan_code: String,
    pub stored_status: SubscriptionStatus,
    pub effective_status: SubscriptionStatus,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub days_remaining: Option<u32>,
    pub sessions_used: i64,
    pub max_sessions: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    NoSubscription,
    Expired,
    Pending,
    Cancelled,
    QuotaExhausted,
}

impl DenialReason {
    pub fn to_str(&self) -> &str {
        match self {
            DenialReason::NoSubscription => "no_subscription",
            DenialReason::Expired => "expired",
            DenialReason::Pending => "pending",
            DenialReason::Cancelled => "cancelled",
            DenialReason::QuotaExhausted => "quota_exhausted",
        }
    }
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum AccessDecision {
    Granted {
        subscription_id: Uuid,
        // None = unlimited
        sessions_left: Option<i64>,
    },
    Denied {
        reason: DenialReason,
    },
}
