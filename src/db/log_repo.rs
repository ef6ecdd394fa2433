// src/db/log_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{common::error::AppError, models::audit::LogEntry};

// Trilha de auditoria: só inserção e leitura
#[derive(Clone)]
pub struct LogRepository {
    pool: PgPool,
}

impl LogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, limit: i64) -> Result<Vec<LogEntry>, AppError> {
        let logs = sqlx::query_as::<_, LogEntry>(
            "SELECT * FROM logs ORDER BY timestamp DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(logs)
    }

    pub async fn append<'e, E>(
        &self,
        executor: E,
        user_email: &str,
        action: &str,
        details: &str,
    ) -> Result<LogEntry, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entry = sqlx::query_as::<_, LogEntry>(
            r#"
            INSERT INTO logs (user_email, action, details)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(user_email)
        .bind(action)
        .bind(details)
        .fetch_one(executor)
        .await?;
        Ok(entry)
    }
}
