use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::planmodels::PlanDurationKind;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpsertPlanDto {
    #[validate(length(min = 2, max = 32, message = "Plan code must be 2-32 characters"))]
    pub code: String,

    #[validate(length(min = 1, max = 80, message = "Plan name is required"))]
    pub name: String,

    pub description: Option<String>,

    #[validate(custom = "validate_price")]
    pub price: BigDecimal,

    pub duration_kind: PlanDurationKind,

    #[validate(range(min = 1, max = 3650, message = "Duration must be between 1 and 3650"))]
    pub duration_value: i32,

    // None = unlimited
    #[validate(range(min = 1, message = "Session quota must be positive"))]
    pub max_sessions: Option<i32>,
}

fn validate_price(price: &BigDecimal) -> Result<(), ValidationError> {
    if *price < BigDecimal::zero() {
        return Err(ValidationError::new("negative_price"));
    }
    Ok(())
}
