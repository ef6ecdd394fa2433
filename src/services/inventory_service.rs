// src/services/inventory_service.rs
//
// Ajuste manual e compra de estoque. Cada operação grava o estoque absoluto,
// uma linha de log e (na compra) o custo, tudo na mesma transação.

use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    common::{clock::BusinessClock, db_utils::found, error::AppError},
    db::{CostRepository, LogRepository, ProductRepository},
    models::{
        audit::{ACTION_STOCK_ADJUSTMENT, ACTION_STOCK_PURCHASE},
        auth::User,
        cost::{CostCategory, CostStatus, NewCost},
        product::{LockedProduct, StockAdjustment, StockMovement, StockPurchase},
        sale::PaymentMethod,
    },
};

#[derive(Clone)]
pub struct InventoryService {
    product_repo: ProductRepository,
    log_repo: LogRepository,
    cost_repo: CostRepository,
    clock: BusinessClock,
    pool: PgPool,
}

/// Novo estoque após somar `delta`. Nunca fica negativo.
pub fn apply_delta(product: &LockedProduct, delta: i32) -> Result<i32, AppError> {
    if delta == 0 {
        return Err(AppError::InvalidInput("A quantidade do ajuste não pode ser zero.".into()));
    }

    let new_stock = product
        .stock
        .checked_add(delta)
        .ok_or_else(|| AppError::InvalidInput("Quantidade fora do limite.".into()))?;

    if new_stock < 0 {
        return Err(AppError::InsufficientStock {
            product: product.name.clone(),
            available: product.stock,
            requested: -delta,
        });
    }
    Ok(new_stock)
}

fn require_reason(reason: &str) -> Result<&str, AppError> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(AppError::InvalidInput("Informe o motivo da movimentação.".into()));
    }
    Ok(reason)
}

fn adjustment_details(product: &LockedProduct, new_stock: i32, delta: i32, reason: &str) -> String {
    format!(
        "Produto '{}': estoque ajustado de {} para {} ({:+}). Motivo: {}",
        product.name, product.stock, new_stock, delta, reason
    )
}

fn purchase_details(
    product: &LockedProduct,
    new_stock: i32,
    quantity: i32,
    total_cost: Decimal,
    reason: &str,
) -> String {
    format!(
        "Produto '{}': compra de {} unidades por R$ {:.2}, estoque de {} para {}. Motivo: {}",
        product.name, quantity, total_cost, product.stock, new_stock, reason
    )
}

impl InventoryService {
    pub fn new(
        product_repo: ProductRepository,
        log_repo: LogRepository,
        cost_repo: CostRepository,
        clock: BusinessClock,
        pool: PgPool,
    ) -> Self {
        Self { product_repo, log_repo, cost_repo, clock, pool }
    }

    // --- AJUSTE ---
    pub async fn adjust_stock(
        &self,
        user: &User,
        product_id: Uuid,
        adjustment: &StockAdjustment,
    ) -> Result<StockMovement, AppError> {
        // Regras simples antes de abrir a transação
        let reason = require_reason(&adjustment.reason)?;
        if adjustment.delta == 0 {
            return Err(AppError::InvalidInput("A quantidade do ajuste não pode ser zero.".into()));
        }

        let mut tx = self.pool.begin().await?;

        let locked = self.lock_one(&mut tx, product_id).await?;
        let new_stock = apply_delta(&locked, adjustment.delta).inspect_err(|_| {
            tracing::warn!(
                "Ajuste recusado em '{}': estoque {} e ajuste {}",
                locked.name, locked.stock, adjustment.delta
            );
        })?;

        self.product_repo.set_stock(&mut *tx, product_id, new_stock).await?;
        self.log_repo
            .append(
                &mut *tx,
                &user.email,
                ACTION_STOCK_ADJUSTMENT,
                &adjustment_details(&locked, new_stock, adjustment.delta, reason),
            )
            .await?;

        let product = found(self.product_repo.find_by_id(&mut *tx, product_id).await?, "Produto")?;
        tx.commit().await?;

        tracing::info!("📦 Estoque de '{}' ajustado: {} -> {}", locked.name, locked.stock, new_stock);
        Ok(StockMovement { product, previous_stock: locked.stock, new_stock })
    }

    // --- COMPRA ---
    pub async fn purchase_stock(
        &self,
        user: &User,
        product_id: Uuid,
        purchase: &StockPurchase,
    ) -> Result<StockMovement, AppError> {
        let reason = require_reason(&purchase.reason)?;
        if purchase.quantity <= 0 || purchase.total_cost <= Decimal::ZERO {
            return Err(AppError::InvalidInput(
                "Quantidade e valor da compra devem ser maiores que zero.".into(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        let locked = self.lock_one(&mut tx, product_id).await?;
        let new_stock = apply_delta(&locked, purchase.quantity)?;

        self.product_repo.set_stock(&mut *tx, product_id, new_stock).await?;
        self.log_repo
            .append(
                &mut *tx,
                &user.email,
                ACTION_STOCK_PURCHASE,
                &purchase_details(&locked, new_stock, purchase.quantity, purchase.total_cost, reason),
            )
            .await?;

        let today = self.clock.today();
        let cost = NewCost {
            description: format!("Compra de estoque - {}", reason),
            category: CostCategory::Operational,
            amount: purchase.total_cost,
            date: today,
            due_date: None,
            payment_date: Some(today),
            supplier_id: Some(locked.supplier_id),
            payment_method: PaymentMethod::Cash,
            notes: Some(format!("Compra de {} unidades", purchase.quantity)),
            status: CostStatus::Paid,
            recurring: false,
        };
        self.cost_repo.create(&mut *tx, &cost).await?;

        let product = found(self.product_repo.find_by_id(&mut *tx, product_id).await?, "Produto")?;
        tx.commit().await?;

        tracing::info!(
            "📦 Compra registrada para '{}': +{} unidades (R$ {})",
            locked.name, purchase.quantity, purchase.total_cost
        );
        Ok(StockMovement { product, previous_stock: locked.stock, new_stock })
    }

    async fn lock_one(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product_id: Uuid,
    ) -> Result<LockedProduct, AppError> {
        let locked = self.product_repo.lock_for_update(&mut **tx, &[product_id]).await?;
        found(locked.into_iter().next(), "Produto")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(stock: i32) -> LockedProduct {
        LockedProduct {
            id: Uuid::new_v4(),
            name: "Bota Chelsea".into(),
            supplier_id: Uuid::new_v4(),
            supplier_name: "Franca".into(),
            purchase_price: Decimal::new(150, 0),
            sale_price: Decimal::new(320, 0),
            stock,
        }
    }

    #[test]
    fn negative_adjustment_lowers_stock() {
        assert_eq!(apply_delta(&product(10), -3).unwrap(), 7);
        assert_eq!(apply_delta(&product(0), 12).unwrap(), 12);
    }

    #[test]
    fn adjustment_below_zero_is_refused() {
        let err = apply_delta(&product(2), -3).unwrap_err();
        assert!(matches!(err, AppError::InsufficientStock { available: 2, requested: 3, .. }));
    }

    #[test]
    fn zero_delta_and_blank_reason_are_refused() {
        assert!(matches!(apply_delta(&product(2), 0), Err(AppError::InvalidInput(_))));
        assert!(require_reason("   ").is_err());
        assert_eq!(require_reason(" avaria ").unwrap(), "avaria");
    }

    #[test]
    fn log_details_show_before_and_after() {
        let details = adjustment_details(&product(10), 7, -3, "avaria");
        assert!(details.contains("de 10 para 7 (-3)"));
        assert!(details.ends_with("Motivo: avaria"));
    }
}
