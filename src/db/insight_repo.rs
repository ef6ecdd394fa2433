// src/db/insight_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::insight::{Insight, InsightDraft},
};

#[derive(Clone)]
pub struct InsightRepository {
    pool: PgPool,
}

impl InsightRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, active_only: bool) -> Result<Vec<Insight>, AppError> {
        let insights = sqlx::query_as::<_, Insight>(
            "SELECT * FROM insights WHERE ($1 = FALSE OR active) ORDER BY created_at DESC",
        )
        .bind(active_only)
        .fetch_all(&self.pool)
        .await?;
        Ok(insights)
    }

    /// Desativa todos os insights ativos (nunca apaga). Retorna quantos mudaram.
    pub async fn deactivate_all<'e, E>(&self, executor: E) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE insights SET active = FALSE, updated_at = NOW() WHERE active",
        )
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn insert<'e, E>(&self, executor: E, draft: &InsightDraft) -> Result<Insight, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let insight = sqlx::query_as::<_, Insight>(
            r#"
            INSERT INTO insights (title, description, category, priority, action, active)
            VALUES ($1, $2, $3, $4, $5, TRUE)
            RETURNING *
            "#,
        )
        .bind(draft.title.trim())
        .bind(draft.description.trim())
        .bind(draft.category)
        .bind(draft.priority)
        .bind(draft.action.trim())
        .fetch_one(executor)
        .await?;
        Ok(insight)
    }

    pub async fn set_active<'e, E>(&self, executor: E, id: Uuid, active: bool) -> Result<Option<Insight>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let insight = sqlx::query_as::<_, Insight>(
            "UPDATE insights SET active = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(active)
        .fetch_optional(executor)
        .await?;
        Ok(insight)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM insights WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
