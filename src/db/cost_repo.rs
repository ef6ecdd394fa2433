// src/db/cost_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{db_utils::map_constraint_error, error::AppError},
    models::cost::{Cost, CostChanges, NewCost},
};

const SELECT_COST: &str = r#"
    SELECT c.*, s.name AS supplier_name
    FROM costs c
    LEFT JOIN suppliers s ON s.id = c.supplier_id
"#;

#[derive(Clone)]
pub struct CostRepository {
    pool: PgPool,
}

impl CostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Cost>, AppError> {
        let sql = format!("{} ORDER BY c.date DESC, c.created_at DESC", SELECT_COST);
        let costs = sqlx::query_as::<_, Cost>(&sql).fetch_all(&self.pool).await?;
        Ok(costs)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Cost>, AppError> {
        let sql = format!("{} WHERE c.id = $1", SELECT_COST);
        let cost = sqlx::query_as::<_, Cost>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(cost)
    }

    pub async fn create<'e, E>(&self, executor: E, data: &NewCost) -> Result<Cost, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Cost>(
            r#"
            WITH ins AS (
                INSERT INTO costs (
                    description, category, amount, date, due_date, payment_date,
                    supplier_id, payment_method, notes, status, recurring
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                RETURNING *
            )
            SELECT ins.*, s.name AS supplier_name
            FROM ins LEFT JOIN suppliers s ON s.id = ins.supplier_id
            "#,
        )
        .bind(data.description.trim())
        .bind(data.category)
        .bind(data.amount)
        .bind(data.date)
        .bind(data.due_date)
        .bind(data.payment_date)
        .bind(data.supplier_id)
        .bind(data.payment_method)
        .bind(data.notes.as_deref())
        .bind(data.status)
        .bind(data.recurring)
        .fetch_one(executor)
        .await
        .map_err(|e| map_constraint_error(e, "Custo"))
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        changes: &CostChanges,
    ) -> Result<Option<Cost>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Cost>(
            r#"
            WITH upd AS (
                UPDATE costs SET
                    description = COALESCE($2, description),
                    category = COALESCE($3, category),
                    amount = COALESCE($4, amount),
                    date = COALESCE($5, date),
                    due_date = COALESCE($6, due_date),
                    payment_date = COALESCE($7, payment_date),
                    supplier_id = COALESCE($8, supplier_id),
                    payment_method = COALESCE($9, payment_method),
                    notes = COALESCE($10, notes),
                    status = COALESCE($11, status),
                    recurring = COALESCE($12, recurring),
                    updated_at = NOW()
                WHERE id = $1
                RETURNING *
            )
            SELECT upd.*, s.name AS supplier_name
            FROM upd LEFT JOIN suppliers s ON s.id = upd.supplier_id
            "#,
        )
        .bind(id)
        .bind(changes.description.as_deref().map(str::trim))
        .bind(changes.category)
        .bind(changes.amount)
        .bind(changes.date)
        .bind(changes.due_date)
        .bind(changes.payment_date)
        .bind(changes.supplier_id)
        .bind(changes.payment_method)
        .bind(changes.notes.as_deref())
        .bind(changes.status)
        .bind(changes.recurring)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_constraint_error(e, "Custo"))
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM costs WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
