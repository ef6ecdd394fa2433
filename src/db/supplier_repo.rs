// src/db/supplier_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{db_utils::map_constraint_error, error::AppError},
    models::supplier::{NewSupplier, Supplier, SupplierChanges},
};

// product_count é sempre calculado na leitura
const SELECT_SUPPLIER: &str = r#"
    SELECT s.*,
           (SELECT COUNT(*) FROM products p WHERE p.supplier_id = s.id) AS product_count
    FROM suppliers s
"#;

#[derive(Clone)]
pub struct SupplierRepository {
    pool: PgPool,
}

impl SupplierRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Supplier>, AppError> {
        let sql = format!("{} ORDER BY s.name ASC", SELECT_SUPPLIER);
        let suppliers = sqlx::query_as::<_, Supplier>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(suppliers)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Supplier>, AppError> {
        let sql = format!("{} WHERE s.id = $1", SELECT_SUPPLIER);
        let supplier = sqlx::query_as::<_, Supplier>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(supplier)
    }

    pub async fn count(&self) -> Result<i64, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM suppliers")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    pub async fn create<'e, E>(&self, executor: E, data: &NewSupplier) -> Result<Supplier, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Supplier>(
            r#"
            WITH ins AS (
                INSERT INTO suppliers (name, contact, phone, email, address, main_products, status)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING *
            )
            SELECT ins.*, 0::BIGINT AS product_count FROM ins
            "#,
        )
        .bind(data.name.trim())
        .bind(data.contact.trim())
        .bind(&data.phone)
        .bind(data.email.as_deref().unwrap_or_default())
        .bind(&data.address)
        .bind(&data.main_products)
        .bind(data.status)
        .fetch_one(executor)
        .await
        .map_err(|e| map_constraint_error(e, "Fornecedor"))
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        changes: &SupplierChanges,
    ) -> Result<Option<Supplier>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Supplier>(
            r#"
            WITH upd AS (
                UPDATE suppliers SET
                    name = COALESCE($2, name),
                    contact = COALESCE($3, contact),
                    phone = COALESCE($4, phone),
                    email = COALESCE($5, email),
                    address = COALESCE($6, address),
                    main_products = COALESCE($7, main_products),
                    status = COALESCE($8, status),
                    updated_at = NOW()
                WHERE id = $1
                RETURNING *
            )
            SELECT upd.*,
                   (SELECT COUNT(*) FROM products p WHERE p.supplier_id = upd.id) AS product_count
            FROM upd
            "#,
        )
        .bind(id)
        .bind(changes.name.as_deref().map(str::trim))
        .bind(changes.contact.as_deref().map(str::trim))
        .bind(changes.phone.as_deref())
        .bind(changes.email.as_deref())
        .bind(changes.address.as_deref())
        .bind(changes.main_products.as_ref())
        .bind(changes.status)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_constraint_error(e, "Fornecedor"))
    }

    /// Retorna `false` se o fornecedor não existia.
    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM suppliers WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await
            .map_err(|e| map_constraint_error(e, "Fornecedor"))?;
        Ok(result.rows_affected() > 0)
    }
}
