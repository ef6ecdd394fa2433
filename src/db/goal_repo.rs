// src/db/goal_repo.rs

use sqlx::{types::Json, Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{db_utils::map_constraint_error, error::AppError},
    models::goal::{Goal, GoalChanges, GoalPlan, GoalStatus, NewGoal},
};

#[derive(Clone)]
pub struct GoalRepository {
    pool: PgPool,
}

impl GoalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Goal>, AppError> {
        let goals = sqlx::query_as::<_, Goal>("SELECT * FROM goals ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(goals)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Goal>, AppError> {
        let goal = sqlx::query_as::<_, Goal>("SELECT * FROM goals WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(goal)
    }

    /// Primeira meta ativa (a mais antiga), usada no card de progresso.
    pub async fn first_active(&self) -> Result<Option<Goal>, AppError> {
        let goal = sqlx::query_as::<_, Goal>(
            "SELECT * FROM goals WHERE status = $1 ORDER BY created_at ASC LIMIT 1",
        )
        .bind(GoalStatus::Active)
        .fetch_optional(&self.pool)
        .await?;
        Ok(goal)
    }

    pub async fn create<'e, E>(&self, executor: E, data: &NewGoal) -> Result<Goal, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Goal>(
            r#"
            INSERT INTO goals (
                title, description, kind, target_value, current_value,
                start_date, end_date, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(data.title.trim())
        .bind(&data.description)
        .bind(data.kind)
        .bind(data.target_value)
        .bind(data.current_value)
        .bind(data.start_date)
        .bind(data.end_date)
        .bind(data.status)
        .fetch_one(executor)
        .await
        .map_err(|e| map_constraint_error(e, "Meta"))
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        changes: &GoalChanges,
    ) -> Result<Option<Goal>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Goal>(
            r#"
            UPDATE goals SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                kind = COALESCE($4, kind),
                target_value = COALESCE($5, target_value),
                current_value = COALESCE($6, current_value),
                start_date = COALESCE($7, start_date),
                end_date = COALESCE($8, end_date),
                status = COALESCE($9, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.title.as_deref().map(str::trim))
        .bind(changes.description.as_deref())
        .bind(changes.kind)
        .bind(changes.target_value)
        .bind(changes.current_value)
        .bind(changes.start_date)
        .bind(changes.end_date)
        .bind(changes.status)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_constraint_error(e, "Meta"))
    }

    pub async fn save_plan<'e, E>(&self, executor: E, id: Uuid, plan: &GoalPlan) -> Result<Option<Goal>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let goal = sqlx::query_as::<_, Goal>(
            r#"
            UPDATE goals SET ai_plan = $2, created_by_ai = TRUE, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(Json(plan))
        .fetch_optional(executor)
        .await?;
        Ok(goal)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM goals WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
