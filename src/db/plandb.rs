use async_trait::async_trait;
use uuid::Uuid;

use crate::{dtos::plandtos::UpsertPlanDto, models::planmodels::Plan};

#[async_trait]
pub trait PlanExt {
    async fn get_plan(&self, plan_id: Uuid) -> Result<Option<Plan>, sqlx::Error>;

    async fn get_plan_by_code(&self, code: &str) -> Result<Option<Plan>, sqlx::Error>;

    async fn list_plans(&self) -> Result<Vec<Plan>, sqlx::Error>;

    /// Inserts the plan or updates the row with the same `code`.
    async fn upsert_plan(&self, plan: &UpsertPlanDto) -> Result<Plan, sqlx::Error>;
}

#[async_trait]
impl PlanExt for super::db::DBClient {
    async fn get_plan(&self, plan_id: Uuid) -> Result<Option<Plan>, sqlx::Error> {
        sqlx::query_as::<_, Plan>("SELECT * FROM plans WHERE id = $1")
            .bind(plan_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_plan_by_code(&self, code: &str) -> Result<Option<Plan>, sqlx::Error> {
        sqlx::query_as::<_, Plan>("SELECT * FROM plans WHERE code = $1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await
    }

    async fn list_plans(&self) -> Result<Vec<Plan>, sqlx::Error> {
        sqlx::query_as::<_, Plan>("SELECT * FROM plans ORDER BY price ASC")
            .fetch_all(&self.pool)
            .await
    }

    async fn upsert_plan(&self, plan: &UpsertPlanDto) -> Result<Plan, sqlx::Error> {
        sqlx::query_as::<_, Plan>(
            r#"
            INSERT INTO plans
            (code, name, description, price, duration_kind, duration_value, max_sessions)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (code) DO UPDATE
            SET name = EXCLUDED.name,
                description = EXCLUDED.description,
                price = EXCLUDED.price,
                duration_kind = EXCLUDED.duration_kind,
                duration_value = EXCLUDED.duration_value,
                max_sessions = EXCLUDED.max_sessions,
                updated_at = NOW()
            RETURNING *
            "#
        )
        .bind(&plan.code)
        .bind(&plan.name)
        .bind(&plan.description)
        .bind(&plan.price)
        .bind(plan.duration_kind)
        .bind(plan.duration_value)
        .bind(plan.max_sessions)
        .fetch_one(&self.pool)
        .await
    }
}
