// src/db/product_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{db_utils::map_constraint_error, error::AppError},
    models::product::{LockedProduct, NewProduct, Product, ProductChanges},
};

// O nome do fornecedor vem sempre do JOIN (valor atual)
const SELECT_PRODUCT: &str = r#"
    SELECT p.*, s.name AS supplier_name
    FROM products p
    JOIN suppliers s ON s.id = p.supplier_id
"#;

#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Leitura
    // ---

    pub async fn list(&self, supplier_id: Option<Uuid>) -> Result<Vec<Product>, AppError> {
        let sql = format!(
            "{} WHERE ($1::UUID IS NULL OR p.supplier_id = $1) ORDER BY p.name ASC",
            SELECT_PRODUCT
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(supplier_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("{} WHERE p.id = $1", SELECT_PRODUCT);
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(product)
    }

    // ---
    // Escrita (aceitam transação)
    // ---

    pub async fn create<'e, E>(&self, executor: E, data: &NewProduct) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Product>(
            r#"
            WITH ins AS (
                INSERT INTO products (
                    name, supplier_id, purchase_price, sale_price,
                    color, sizing, stock, photo_url, status
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                RETURNING *
            )
            SELECT ins.*, s.name AS supplier_name
            FROM ins JOIN suppliers s ON s.id = ins.supplier_id
            "#,
        )
        .bind(data.name.trim())
        .bind(data.supplier_id)
        .bind(data.purchase_price)
        .bind(data.sale_price)
        .bind(&data.color)
        .bind(&data.sizing)
        .bind(data.stock)
        .bind(data.photo_url.as_deref())
        .bind(data.status)
        .fetch_one(executor)
        .await
        .map_err(|e| map_constraint_error(e, "Produto"))
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        changes: &ProductChanges,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Product>(
            r#"
            WITH upd AS (
                UPDATE products SET
                    name = COALESCE($2, name),
                    supplier_id = COALESCE($3, supplier_id),
                    purchase_price = COALESCE($4, purchase_price),
                    sale_price = COALESCE($5, sale_price),
                    color = COALESCE($6, color),
                    sizing = COALESCE($7, sizing),
                    photo_url = COALESCE($8, photo_url),
                    status = COALESCE($9, status),
                    updated_at = NOW()
                WHERE id = $1
                RETURNING *
            )
            SELECT upd.*, s.name AS supplier_name
            FROM upd JOIN suppliers s ON s.id = upd.supplier_id
            "#,
        )
        .bind(id)
        .bind(changes.name.as_deref().map(str::trim))
        .bind(changes.supplier_id)
        .bind(changes.purchase_price)
        .bind(changes.sale_price)
        .bind(changes.color.as_deref())
        .bind(changes.sizing.as_deref())
        .bind(changes.photo_url.as_deref())
        .bind(changes.status)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_constraint_error(e, "Produto"))
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await
            .map_err(|e| map_constraint_error(e, "Produto"))?;
        Ok(result.rows_affected() > 0)
    }

    /// Trava as linhas dos produtos (em ordem de id) até o fim da transação.
    pub async fn lock_for_update<'e, E>(
        &self,
        executor: E,
        ids: &[Uuid],
    ) -> Result<Vec<LockedProduct>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let locked = sqlx::query_as::<_, LockedProduct>(
            r#"
            SELECT p.id, p.name, p.supplier_id, s.name AS supplier_name,
                   p.purchase_price, p.sale_price, p.stock
            FROM products p
            JOIN suppliers s ON s.id = p.supplier_id
            WHERE p.id = ANY($1)
            ORDER BY p.id
            FOR UPDATE OF p
            "#,
        )
        .bind(ids)
        .fetch_all(executor)
        .await?;
        Ok(locked)
    }

    /// Grava o valor absoluto do estoque.
    pub async fn set_stock<'e, E>(&self, executor: E, id: Uuid, stock: i32) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE products SET stock = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(stock)
            .execute(executor)
            .await
            .map_err(|e| map_constraint_error(e, "Produto"))?;
        Ok(())
    }

    /// Devolve unidades ao estoque (estorno). `false` se o produto já não existe.
    pub async fn restock<'e, E>(&self, executor: E, id: Uuid, quantity: i32) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE products SET stock = stock + $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(quantity)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
