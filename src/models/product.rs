// src/models/product.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::validation::{non_negative, non_zero, not_blank, positive},
    models::supplier::RecordStatus,
};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    #[schema(example = "Tênis Air Street")]
    pub name: String,
    pub supplier_id: Uuid,

    // Vem de JOIN com suppliers na leitura: sempre o nome atual
    #[schema(example = "Calçados Franca Ltda")]
    pub supplier_name: String,

    #[schema(example = "120.00")]
    pub purchase_price: Decimal,
    #[schema(example = "249.90")]
    pub sale_price: Decimal,
    #[schema(example = "Preto")]
    pub color: String,
    #[schema(example = "38-44")]
    pub sizing: String,
    #[schema(example = 10)]
    pub stock: i32,
    pub photo_url: Option<String>,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Linha de produto travada (`FOR UPDATE`) dentro de uma transação de estoque.
#[derive(Debug, Clone, FromRow)]
pub struct LockedProduct {
    pub id: Uuid,
    pub name: String,
    pub supplier_id: Uuid,
    pub supplier_name: String,
    pub purchase_price: Decimal,
    pub sale_price: Decimal,
    pub stock: i32,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    #[validate(custom(function = "not_blank", message = "O nome é obrigatório."))]
    #[schema(example = "Tênis Air Street")]
    pub name: String,
    pub supplier_id: Uuid,
    #[serde(default)]
    #[validate(custom(function = "non_negative"))]
    pub purchase_price: Decimal,
    #[serde(default)]
    #[validate(custom(function = "non_negative"))]
    pub sale_price: Decimal,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub sizing: String,
    // Estoque inicial; depois disso só muda por venda, ajuste ou compra
    #[serde(default)]
    #[validate(range(min = 0, message = "O estoque não pode ser negativo."))]
    pub stock: i32,
    #[validate(url(message = "URL da foto inválida."))]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub status: RecordStatus,
}

/// Edição parcial de produto. O estoque não entra aqui.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductChanges {
    #[validate(custom(function = "not_blank", message = "O nome não pode ficar vazio."))]
    pub name: Option<String>,
    pub supplier_id: Option<Uuid>,
    #[validate(custom(function = "non_negative"))]
    pub purchase_price: Option<Decimal>,
    #[validate(custom(function = "non_negative"))]
    pub sale_price: Option<Decimal>,
    pub color: Option<String>,
    pub sizing: Option<String>,
    #[validate(url(message = "URL da foto inválida."))]
    pub photo_url: Option<String>,
    pub status: Option<RecordStatus>,
}

// --- Movimentação de estoque ---

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockAdjustment {
    /// Positivo entra, negativo sai.
    #[validate(custom(function = "non_zero"))]
    #[schema(example = -3)]
    pub delta: i32,
    #[validate(custom(function = "not_blank", message = "Informe o motivo do ajuste."))]
    #[schema(example = "Avaria na vitrine")]
    pub reason: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockPurchase {
    #[validate(range(min = 1, message = "A quantidade deve ser maior que zero."))]
    #[schema(example = 12)]
    pub quantity: i32,
    #[validate(custom(function = "positive"))]
    #[schema(example = "1440.00")]
    pub total_cost: Decimal,
    #[validate(custom(function = "not_blank", message = "Informe o motivo da compra."))]
    #[schema(example = "Reposição coleção inverno")]
    pub reason: String,
}

/// Resultado de um ajuste ou compra: produto atualizado e o antes/depois.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
    pub product: Product,
    pub previous_stock: i32,
    pub new_stock: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjustment_needs_delta_and_reason() {
        let zero = StockAdjustment { delta: 0, reason: "Avaria".into() };
        assert!(zero.validate().unwrap_err().field_errors().contains_key("delta"));

        let blank = StockAdjustment { delta: -2, reason: "  ".into() };
        assert!(blank.validate().unwrap_err().field_errors().contains_key("reason"));

        assert!(StockAdjustment { delta: -2, reason: "Avaria".into() }.validate().is_ok());
    }
}
