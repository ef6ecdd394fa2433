// src/services/catalog_service.rs
//
// Cadastro de fornecedores e produtos.

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{db_utils::found, error::AppError},
    db::{ProductRepository, SupplierRepository},
    models::{
        product::{NewProduct, Product, ProductChanges},
        supplier::{NewSupplier, Supplier, SupplierChanges},
    },
};

#[derive(Clone)]
pub struct CatalogService {
    supplier_repo: SupplierRepository,
    product_repo: ProductRepository,
    pool: PgPool,
}

impl CatalogService {
    pub fn new(supplier_repo: SupplierRepository, product_repo: ProductRepository, pool: PgPool) -> Self {
        Self { supplier_repo, product_repo, pool }
    }

    // --- FORNECEDORES ---

    pub async fn list_suppliers(&self) -> Result<Vec<Supplier>, AppError> {
        self.supplier_repo.list().await
    }

    pub async fn get_supplier(&self, id: Uuid) -> Result<Supplier, AppError> {
        found(self.supplier_repo.find_by_id(id).await?, "Fornecedor")
    }

    pub async fn create_supplier(&self, data: &NewSupplier) -> Result<Supplier, AppError> {
        let supplier = self.supplier_repo.create(&self.pool, data).await?;
        tracing::info!("✅ Fornecedor criado: {} ({})", supplier.name, supplier.id);
        Ok(supplier)
    }

    pub async fn update_supplier(&self, id: Uuid, changes: &SupplierChanges) -> Result<Supplier, AppError> {
        found(self.supplier_repo.update(&self.pool, id, changes).await?, "Fornecedor")
    }

    pub async fn delete_supplier(&self, id: Uuid) -> Result<(), AppError> {
        if !self.supplier_repo.delete(&self.pool, id).await? {
            return Err(AppError::ResourceNotFound("Fornecedor".into()));
        }
        tracing::info!("Fornecedor {} removido", id);
        Ok(())
    }

    // --- PRODUTOS ---

    pub async fn list_products(&self, supplier_id: Option<Uuid>) -> Result<Vec<Product>, AppError> {
        self.product_repo.list(supplier_id).await
    }

    pub async fn get_product(&self, id: Uuid) -> Result<Product, AppError> {
        found(self.product_repo.find_by_id(&self.pool, id).await?, "Produto")
    }

    pub async fn create_product(&self, data: &NewProduct) -> Result<Product, AppError> {
        // Fornecedor inexistente é 404, não violação de FK
        self.get_supplier(data.supplier_id).await?;

        let product = self.product_repo.create(&self.pool, data).await?;
        tracing::info!("✅ Produto criado: {} (estoque {})", product.name, product.stock);
        Ok(product)
    }

    pub async fn update_product(&self, id: Uuid, changes: &ProductChanges) -> Result<Product, AppError> {
        if let Some(supplier_id) = changes.supplier_id {
            self.get_supplier(supplier_id).await?;
        }
        found(self.product_repo.update(&self.pool, id, changes).await?, "Produto")
    }

    /// Itens de vendas antigas mantêm o retrato do produto (FK vira NULL).
    pub async fn delete_product(&self, id: Uuid) -> Result<(), AppError> {
        if !self.product_repo.delete(&self.pool, id).await? {
            return Err(AppError::ResourceNotFound("Produto".into()));
        }
        tracing::info!("Produto {} removido", id);
        Ok(())
    }
}
