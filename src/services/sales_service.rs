// src/services/sales_service.rs
//
// Venda com vários itens, confirmação de pagamento e estorno.

use std::collections::HashMap;

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{db_utils::found, error::AppError},
    db::{sale_repo::SaleRecordInput, ProductRepository, SaleRepository},
    models::sale::{
        NewReversal, NewSale, PaymentStatus, Reversal, Sale, SaleChanges, SaleDetail, SaleStatus,
    },
    services::pricing::{self, LineRequest},
};

#[derive(Clone)]
pub struct SalesService {
    sale_repo: SaleRepository,
    product_repo: ProductRepository,
    pool: PgPool,
}

impl SalesService {
    pub fn new(sale_repo: SaleRepository, product_repo: ProductRepository, pool: PgPool) -> Self {
        Self { sale_repo, product_repo, pool }
    }

    pub async fn list_sales(&self) -> Result<Vec<SaleDetail>, AppError> {
        self.sale_repo.list_detailed().await
    }

    pub async fn get_sale(&self, id: Uuid) -> Result<SaleDetail, AppError> {
        found(self.sale_repo.find_detailed(id).await?, "Venda")
    }

    /// Registra a venda inteira numa transação:
    /// trava os produtos, confere TODO o estoque, precifica e só então grava.
    pub async fn submit_sale(&self, payload: &NewSale) -> Result<SaleDetail, AppError> {
        let lines: Vec<LineRequest> = payload.items.iter().map(LineRequest::from).collect();

        let mut product_ids: Vec<Uuid> = lines.iter().map(|l| l.product_id).collect();
        product_ids.sort();
        product_ids.dedup();

        let mut tx = self.pool.begin().await?;

        let products: HashMap<Uuid, _> = self
            .product_repo
            .lock_for_update(&mut *tx, &product_ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        // 1. Estoque de todos os itens (nada é gravado se faltar algum)
        let stock_changes = pricing::plan_stock_decrements(&products, &lines).inspect_err(|e| {
            tracing::warn!("Venda recusada: {}", e);
        })?;

        // 2. Valores recalculados no servidor
        let (priced, totals) = pricing::price_sale(&products, &lines, payload.discount_percent)?;
        if let Some(claimed) = &payload.totals {
            pricing::verify_client_totals(&totals, claimed)?;
        }

        // 3. Condição de pagamento
        let now = Utc::now();
        let terms = pricing::payment_terms(payload.payment_method, now);

        // 4. Gravação
        for change in &stock_changes {
            self.product_repo
                .set_stock(&mut *tx, change.product_id, change.new_stock)
                .await?;
        }

        let header = self
            .sale_repo
            .insert(
                &mut *tx,
                &SaleRecordInput {
                    client: &payload.client,
                    sale_date: now,
                    payment_date: terms.payment_date,
                    due_date: payload.due_date,
                    payment_method: payload.payment_method,
                    notes: payload.notes.as_deref(),
                    discount_percent: payload.discount_percent,
                    totals,
                    status: terms.status,
                    payment_status: terms.payment_status,
                },
            )
            .await?;

        let mut items = Vec::with_capacity(priced.len());
        for (position, line) in priced.iter().enumerate() {
            let item = self
                .sale_repo
                .insert_item(&mut *tx, header.id, position as i32, line)
                .await?;
            items.push(item);
        }

        tx.commit().await?;

        tracing::info!(
            "✅ Venda {} registrada: {} itens, total R$ {}, lucro R$ {}",
            header.id,
            items.len(),
            header.total_price,
            header.profit
        );
        Ok(SaleDetail { header, items })
    }

    /// Edita cliente, observações e vencimento. Valores não mudam.
    pub async fn update_sale(&self, id: Uuid, changes: &SaleChanges) -> Result<SaleDetail, AppError> {
        found(self.sale_repo.update(&self.pool, id, changes).await?, "Venda")?;
        self.get_sale(id).await
    }

    pub async fn confirm_payment(&self, id: Uuid) -> Result<SaleDetail, AppError> {
        let mut tx = self.pool.begin().await?;

        let sale = found(self.sale_repo.lock_by_id(&mut *tx, id).await?, "Venda")?;
        ensure_payable(&sale)?;

        self.sale_repo.mark_paid(&mut *tx, id, Utc::now()).await?;
        tx.commit().await?;

        tracing::info!("💰 Pagamento confirmado para a venda {}", id);
        self.get_sale(id).await
    }

    // --- ESTORNO ---

    /// Cancela a venda, devolve os itens ao estoque e registra o estorno.
    pub async fn create_reversal(&self, sale_id: Uuid, payload: &NewReversal) -> Result<Reversal, AppError> {
        let mut tx = self.pool.begin().await?;

        let sale = found(self.sale_repo.lock_by_id(&mut *tx, sale_id).await?, "Venda")?;
        if sale.status == SaleStatus::Cancelled {
            return Err(AppError::Conflict("Esta venda já foi estornada.".into()));
        }

        let amount = payload.amount.unwrap_or(sale.total_price);
        if amount > sale.total_price {
            return Err(AppError::InvalidInput(
                "O valor do estorno não pode ser maior que o total da venda.".into(),
            ));
        }

        let items = self.sale_repo.items_of(&mut *tx, &[sale_id]).await?;

        // Mesma ordem de locks da venda
        let mut returns: Vec<(Uuid, i32)> = items
            .iter()
            .filter_map(|item| item.product_id.map(|id| (id, item.quantity)))
            .collect();
        returns.sort_by_key(|(id, _)| *id);

        for (product_id, quantity) in returns {
            if !self.product_repo.restock(&mut *tx, product_id, quantity).await? {
                tracing::warn!("Produto {} não existe mais; estoque não devolvido", product_id);
            }
        }

        self.sale_repo.set_status(&mut *tx, sale_id, SaleStatus::Cancelled).await?;

        let reversal = self
            .sale_repo
            .insert_reversal(&mut *tx, sale_id, &payload.reason, amount, payload.notes.as_deref())
            .await?;

        tx.commit().await?;

        tracing::info!("↩️ Venda {} estornada (R$ {})", sale_id, amount);
        Ok(reversal)
    }

    pub async fn list_reversals(&self) -> Result<Vec<Reversal>, AppError> {
        self.sale_repo.list_reversals().await
    }
}

/// Só vendas ativas e ainda não pagas aceitam confirmação.
/// A data de pagamento original nunca é sobrescrita.
pub fn ensure_payable(sale: &Sale) -> Result<(), AppError> {
    if sale.status == SaleStatus::Cancelled {
        return Err(AppError::Conflict("Venda estornada não pode ser confirmada.".into()));
    }
    if sale.payment_status == PaymentStatus::Paid {
        return Err(AppError::Conflict("Pagamento já confirmado para esta venda.".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use crate::models::sale::PaymentMethod;

    fn credit_sale() -> Sale {
        let at = Utc::now();
        Sale {
            id: Uuid::new_v4(),
            client: "João".into(),
            sale_date: at,
            payment_date: None,
            due_date: NaiveDate::from_ymd_opt(2025, 2, 10),
            payment_method: PaymentMethod::OnCredit,
            notes: None,
            discount_percent: Decimal::ZERO,
            total_price: Decimal::new(30000, 2),
            total_cost: Decimal::new(18000, 2),
            profit: Decimal::new(12000, 2),
            status: SaleStatus::Pending,
            payment_status: PaymentStatus::Pending,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn pending_credit_sale_can_be_paid() {
        assert!(ensure_payable(&credit_sale()).is_ok());
    }

    #[test]
    fn second_confirmation_is_a_conflict() {
        let mut sale = credit_sale();
        sale.status = SaleStatus::Paid;
        sale.payment_status = PaymentStatus::Paid;
        sale.payment_date = Some(Utc::now());

        let err = ensure_payable(&sale).unwrap_err();
        assert!(matches!(err, AppError::Conflict(msg) if msg.contains("já confirmado")));
    }

    #[test]
    fn cancelled_sale_cannot_be_paid() {
        let mut sale = credit_sale();
        sale.status = SaleStatus::Cancelled;
        assert!(matches!(ensure_payable(&sale), Err(AppError::Conflict(_))));
    }
}
