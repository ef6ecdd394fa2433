// src/db/sale_repo.rs

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{db_utils::map_constraint_error, error::AppError},
    models::sale::{
        PaymentMethod, PaymentStatus, Reversal, Sale, SaleChanges, SaleDetail, SaleItem,
        SaleStatus,
    },
    services::pricing::{PricedLine, SaleTotals},
};

/// Cabeçalho de venda pronto para gravar (já precificado).
#[derive(Debug, Clone)]
pub struct SaleRecordInput<'a> {
    pub client: &'a str,
    pub sale_date: DateTime<Utc>,
    pub payment_date: Option<DateTime<Utc>>,
    pub due_date: Option<NaiveDate>,
    pub payment_method: PaymentMethod,
    pub notes: Option<&'a str>,
    pub discount_percent: Decimal,
    pub totals: SaleTotals,
    pub status: SaleStatus,
    pub payment_status: PaymentStatus,
}

#[derive(Clone)]
pub struct SaleRepository {
    pool: PgPool,
}

impl SaleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Leitura
    // ---

    pub async fn list(&self) -> Result<Vec<Sale>, AppError> {
        let sales = sqlx::query_as::<_, Sale>("SELECT * FROM sales ORDER BY sale_date DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(sales)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Sale>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sale = sqlx::query_as::<_, Sale>("SELECT * FROM sales WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(sale)
    }

    pub async fn items_of<'e, E>(&self, executor: E, sale_ids: &[Uuid]) -> Result<Vec<SaleItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let items = sqlx::query_as::<_, SaleItem>(
            "SELECT * FROM sale_items WHERE sale_id = ANY($1) ORDER BY sale_id, position",
        )
        .bind(sale_ids)
        .fetch_all(executor)
        .await?;
        Ok(items)
    }

    /// Todas as vendas com seus itens, mais recentes primeiro.
    pub async fn list_detailed(&self) -> Result<Vec<SaleDetail>, AppError> {
        let sales = self.list().await?;
        let ids: Vec<Uuid> = sales.iter().map(|s| s.id).collect();
        let items = self.items_of(&self.pool, &ids).await?;
        Ok(attach_items(sales, items))
    }

    pub async fn find_detailed(&self, id: Uuid) -> Result<Option<SaleDetail>, AppError> {
        let Some(sale) = self.find_by_id(&self.pool, id).await? else {
            return Ok(None);
        };
        let items = self.items_of(&self.pool, &[id]).await?;
        Ok(Some(SaleDetail { header: sale, items }))
    }

    /// Trava a venda até o fim da transação.
    pub async fn lock_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Sale>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sale = sqlx::query_as::<_, Sale>("SELECT * FROM sales WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(sale)
    }

    // ---
    // Escrita
    // ---

    pub async fn insert<'e, E>(&self, executor: E, sale: &SaleRecordInput<'_>) -> Result<Sale, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Sale>(
            r#"
            INSERT INTO sales (
                client, sale_date, payment_date, due_date, payment_method, notes,
                discount_percent, total_price, total_cost, profit, status, payment_status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(sale.client.trim())
        .bind(sale.sale_date)
        .bind(sale.payment_date)
        .bind(sale.due_date)
        .bind(sale.payment_method)
        .bind(sale.notes)
        .bind(sale.discount_percent)
        .bind(sale.totals.total_price)
        .bind(sale.totals.total_cost)
        .bind(sale.totals.profit)
        .bind(sale.status)
        .bind(sale.payment_status)
        .fetch_one(executor)
        .await
        .map_err(|e| map_constraint_error(e, "Venda"))
    }

    pub async fn insert_item<'e, E>(
        &self,
        executor: E,
        sale_id: Uuid,
        position: i32,
        line: &PricedLine,
    ) -> Result<SaleItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, SaleItem>(
            r#"
            INSERT INTO sale_items (
                sale_id, position, product_id, product_name, supplier_id, supplier_name,
                quantity, unit_price, discount, total_price, unit_cost, total_cost, profit
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(sale_id)
        .bind(position)
        .bind(line.product_id)
        .bind(&line.product_name)
        .bind(line.supplier_id)
        .bind(&line.supplier_name)
        .bind(line.quantity)
        .bind(line.unit_price)
        .bind(line.discount)
        .bind(line.total_price)
        .bind(line.unit_cost)
        .bind(line.total_cost)
        .bind(line.profit)
        .fetch_one(executor)
        .await
        .map_err(|e| map_constraint_error(e, "Item da venda"))
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        changes: &SaleChanges,
    ) -> Result<Option<Sale>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            UPDATE sales SET
                client = COALESCE($2, client),
                notes = COALESCE($3, notes),
                due_date = COALESCE($4, due_date),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.client.as_deref().map(str::trim))
        .bind(changes.notes.as_deref())
        .bind(changes.due_date)
        .fetch_optional(executor)
        .await?;
        Ok(sale)
    }

    pub async fn mark_paid<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        paid_at: DateTime<Utc>,
    ) -> Result<Sale, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            UPDATE sales SET
                payment_status = 'paid',
                payment_date = $2,
                status = CASE WHEN status = 'pending' THEN 'paid'::sale_status ELSE status END,
                updated_at = NOW()
            WHERE id = $1 AND payment_status <> 'paid'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(paid_at)
        .fetch_optional(executor)
        .await?;

        sale.ok_or_else(|| AppError::Conflict("Pagamento já confirmado para esta venda.".into()))
    }

    pub async fn set_status<'e, E>(&self, executor: E, id: Uuid, status: SaleStatus) -> Result<Sale, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sale = sqlx::query_as::<_, Sale>(
            "UPDATE sales SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_one(executor)
        .await?;
        Ok(sale)
    }

    // ---
    // Estornos
    // ---

    pub async fn insert_reversal<'e, E>(
        &self,
        executor: E,
        sale_id: Uuid,
        reason: &str,
        amount: Decimal,
        notes: Option<&str>,
    ) -> Result<Reversal, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Reversal>(
            r#"
            INSERT INTO reversals (sale_id, reason, amount, notes)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(sale_id)
        .bind(reason.trim())
        .bind(amount)
        .bind(notes)
        .fetch_one(executor)
        .await
        .map_err(|e| map_constraint_error(e, "Estorno"))
    }

    pub async fn list_reversals(&self) -> Result<Vec<Reversal>, AppError> {
        let reversals =
            sqlx::query_as::<_, Reversal>("SELECT * FROM reversals ORDER BY reversal_date DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(reversals)
    }
}

/// Distribui os itens pelas vendas, mantendo a ordem das vendas.
fn attach_items(sales: Vec<Sale>, items: Vec<SaleItem>) -> Vec<SaleDetail> {
    let mut by_sale: HashMap<Uuid, Vec<SaleItem>> = HashMap::new();
    for item in items {
        by_sale.entry(item.sale_id).or_default().push(item);
    }

    sales
        .into_iter()
        .map(|header| {
            let items = by_sale.remove(&header.id).unwrap_or_default();
            SaleDetail { header, items }
        })
        .collect()
}
