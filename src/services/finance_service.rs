// src/services/finance_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{db_utils::found, error::AppError},
    db::{CostRepository, SupplierRepository},
    models::cost::{Cost, CostChanges, NewCost},
};

#[derive(Clone)]
pub struct FinanceService {
    cost_repo: CostRepository,
    supplier_repo: SupplierRepository,
    pool: PgPool,
}

impl FinanceService {
    pub fn new(cost_repo: CostRepository, supplier_repo: SupplierRepository, pool: PgPool) -> Self {
        Self { cost_repo, supplier_repo, pool }
    }

    pub async fn list_costs(&self) -> Result<Vec<Cost>, AppError> {
        self.cost_repo.list().await
    }

    pub async fn get_cost(&self, id: Uuid) -> Result<Cost, AppError> {
        found(self.cost_repo.find_by_id(id).await?, "Custo")
    }

    pub async fn create_cost(&self, data: &NewCost) -> Result<Cost, AppError> {
        if let Some(supplier_id) = data.supplier_id {
            self.ensure_supplier(supplier_id).await?;
        }

        let cost = self.cost_repo.create(&self.pool, data).await?;
        tracing::info!("✅ Custo lançado: {} (R$ {})", cost.description, cost.amount);
        Ok(cost)
    }

    pub async fn update_cost(&self, id: Uuid, changes: &CostChanges) -> Result<Cost, AppError> {
        if let Some(supplier_id) = changes.supplier_id {
            self.ensure_supplier(supplier_id).await?;
        }
        found(self.cost_repo.update(&self.pool, id, changes).await?, "Custo")
    }

    pub async fn delete_cost(&self, id: Uuid) -> Result<(), AppError> {
        if !self.cost_repo.delete(&self.pool, id).await? {
            return Err(AppError::ResourceNotFound("Custo".into()));
        }
        Ok(())
    }

    async fn ensure_supplier(&self, supplier_id: Uuid) -> Result<(), AppError> {
        found(self.supplier_repo.find_by_id(supplier_id).await?, "Fornecedor").map(|_| ())
    }
}
