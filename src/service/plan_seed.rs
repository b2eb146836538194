use std::str::FromStr;

use bigdecimal::BigDecimal;
use validator::Validate;

use crate::{
    db::plandb::PlanExt,
    dtos::plandtos::UpsertPlanDto,
    models::planmodels::{Plan, PlanDurationKind},
    service::error::ServiceError,
};

/// Catalog every deployment starts with.
pub fn default_plans() -> Result<Vec<UpsertPlanDto>, ServiceError> {
    let price = |raw: &str| {
        BigDecimal::from_str(raw).map_err(|e| ServiceError::Validation(e.to_string()))
    };

    Ok(vec![
        UpsertPlanDto {
            code: "walk_in".to_string(),
            name: "Walk-in".to_string(),
            description: Some("Single day pass".to_string()),
            price: price("100.00")?,
            duration_kind: PlanDurationKind::FixedDays,
            duration_value: 1,
            max_sessions: Some(1),
        },
        UpsertPlanDto {
            code: "monthly".to_string(),
            name: "Monthly".to_string(),
            description: Some("Unlimited gym access for one calendar month".to_string()),
            price: price("1500.00")?,
            duration_kind: PlanDurationKind::CalendarMonths,
            duration_value: 1,
            max_sessions: None,
        },
        UpsertPlanDto {
            code: "coaching".to_string(),
            name: "Coaching".to_string(),
            description: Some("One calendar month with 12 coached sessions".to_string()),
            price: price("3500.00")?,
            duration_kind: PlanDurationKind::CalendarMonths,
            duration_value: 1,
            max_sessions: Some(12),
        },
    ])
}

/// Upserts `plans` by code. Safe to run on every start.
pub async fn seed_plans<S>(store: &S, plans: &[UpsertPlanDto]) -> Result<Vec<Plan>, ServiceError>
where
    S: PlanExt + Send + Sync,
{
    let mut seeded = Vec::with_capacity(plans.len());

    for plan in plans {
        plan.validate()?;
        let existed = store.get_plan_by_code(&plan.code).await?.is_some();
        let stored = store.upsert_plan(plan).await?;
        tracing::debug!(
            "{} plan {} ({})",
            if existed { "Updated" } else { "Created" },
            stored.code,
            stored.id
        );
        seeded.push(stored);
    }

    let catalog = store.list_plans().await?;
    tracing::info!(
        "Seeded {} plans, catalog now holds {}: {}",
        seeded.len(),
        catalog.len(),
        catalog
            .iter()
            .map(|p| p.code.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(seeded)
}

pub async fn seed_default_plans<S>(store: &S) -> Result<Vec<Plan>, ServiceError>
where
    S: PlanExt + Send + Sync,
{
    let plans = default_plans()?;
    seed_plans(store, &plans).await
}
