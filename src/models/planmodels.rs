use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::dates::{add_calendar_months, add_days};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "plan_duration_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PlanDurationKind {
    FixedDays,
    CalendarMonths,
}

/// How long a plan grants access for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationPolicy {
    /// Walk-in style passes, counted in 24h days.
    FixedDays(u32),
    /// Month-based memberships, day-of-month clamped to the target month.
    CalendarMonths(u32),
}

impl DurationPolicy {
    pub fn end_from(&self, start: DateTime<Utc>) -> DateTime<Utc> {
        match *self {
            DurationPolicy::FixedDays(days) => add_days(start, days),
            DurationPolicy::CalendarMonths(months) => add_calendar_months(start, months),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct Plan {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub price: BigDecimal,
    pub duration_kind: PlanDurationKind,
    pub duration_value: i32,
    pub max_sessions: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Plan {
    pub fn duration_policy(&self) -> DurationPolicy {
        // duration_value is CHECKed > 0 in the schema
        let value = u32::try_from(self.duration_value).unwrap_or(1).max(1);
        match self.duration_kind {
            PlanDurationKind::FixedDays => DurationPolicy::FixedDays(value),
            PlanDurationKind::CalendarMonths => DurationPolicy::CalendarMonths(value),
        }
    }

    /// `None` means unlimited sessions.
    pub fn session_quota(&self) -> Option<i64> {
        self.max_sessions.map(i64::from)
    }
}
