use thiserror::Error;
use uuid::Uuid;

use crate::dtos::subscriptiondtos::DenialReason;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Subscription {0} not found")]
    SubscriptionNotFound(Uuid),

    #[error("Plan {0} not found")]
    PlanNotFound(String),

    #[error("Access denied for user {user_id}: {reason}")]
    AccessDenied { user_id: Uuid, reason: DenialReason },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::Validation(err.to_string())
    }
}

impl ServiceError {
    /// Whether a later retry of the same operation could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, ServiceError::Database(_) | ServiceError::Notification(_))
    }
}
