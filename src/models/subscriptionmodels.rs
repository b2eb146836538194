use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{
    encode::IsNull,
    error::BoxDynError,
    postgres::{PgArgumentBuffer, PgTypeInfo, PgValueRef},
    Decode, Encode, Postgres, Type,
};
use uuid::Uuid;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq, Eq, Default)]
#[sqlx(type_name = "subscription_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    #[default]
    Active,
    Expired,
    Cancelled,
    Pending,
}

impl SubscriptionStatus {
    pub fn to_str(&self) -> &str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Expired => "expired",
            SubscriptionStatus::Cancelled => "cancelled",
            SubscriptionStatus::Pending => "pending",
        }
    }
}

/// Last expiry threshold a member was notified about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ExpiryMarker {
    DaysRemaining(u32),
    Expired,
}

#[derive(Debug, thiserror::Error)]
#[error("invalid expiry marker: {0:?}")]
pub struct InvalidExpiryMarker(pub String);

impl fmt::Display for ExpiryMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpiryMarker::DaysRemaining(days) => write!(f, "{}", days),
            ExpiryMarker::Expired => f.write_str("expired"),
        }
    }
}

impl FromStr for ExpiryMarker {
    type Err = InvalidExpiryMarker;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "expired" => Ok(ExpiryMarker::Expired),
            other => other
                .parse::<u32>()
                .map(ExpiryMarker::DaysRemaining)
                .map_err(|_| InvalidExpiryMarker(s.to_string())),
        }
    }
}

impl TryFrom<String> for ExpiryMarker {
    type Error = InvalidExpiryMarker;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ExpiryMarker> for String {
    fn from(marker: ExpiryMarker) -> Self {
        marker.to_string()
    }
}

// Stored as TEXT so the column stays readable from psql.
impl Type<Postgres> for ExpiryMarker {
    fn type_info() -> PgTypeInfo {
        <String as Type<Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <String as Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for ExpiryMarker {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let raw = <&str as Decode<'r, Postgres>>::decode(value)?;
        Ok(raw.parse()?)
    }
}

impl Encode<'_, Postgres> for ExpiryMarker {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> Result<IsNull, BoxDynError> {
        <String as Encode<'_, Postgres>>::encode(self.to_string(), buf)
    }
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone, PartialEq)]
pub struct Subscription {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_id: Uuid,
    #[serde(default)]
    pub status: SubscriptionStatus,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub last_expiry_notification: Option<ExpiryMarker>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields needed to insert a subscription row.
#[derive(Debug, Clone)]
pub struct NewSubscription {
    pub user_id: Uuid,
    pub plan_id: Uuid,
    pub status: SubscriptionStatus,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct AttendanceRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub subscription_id: Uuid,
    pub checked_in_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_text_form() {
        assert_eq!(ExpiryMarker::DaysRemaining(3).to_string(), "3");
        assert_eq!(ExpiryMarker::Expired.to_string(), "expired");
        assert_eq!("2".parse::<ExpiryMarker>().unwrap(), ExpiryMarker::DaysRemaining(2));
        assert_eq!("expired".parse::<ExpiryMarker>().unwrap(), ExpiryMarker::Expired);
        assert!("soon".parse::<ExpiryMarker>().is_err());
    }

    #[test]
    fn missing_status_defaults_to_active() {
        let json = serde_json::json!({
            "id": Uuid::nil(),
            "user_id": Uuid::nil(),
            "plan_id": Uuid::nil(),
            "start_date": "2025-01-01T00:00:00Z",
            "end_date": "2025-02-01T00:00:00Z",
            "last_expiry_notification": "3",
            "created_at": "2025-01-01T00:00:00Z",
            "updated_at": "2025-01-01T00:00:00Z"
        });

        let sub: Subscription = serde_json::from_value(json).unwrap();
        assert_eq!(sub.status, SubscriptionStatus::Active);
        assert_eq!(sub.last_expiry_notification, Some(ExpiryMarker::DaysRemaining(3)));
    }
}
