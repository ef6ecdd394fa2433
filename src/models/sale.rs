// src/models/sale.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::validation::{non_negative, not_blank, percentage, positive};

// --- Enums (mapeando os tipos do Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_method", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,     // dinheiro
    Card,     // cartão
    Pix,
    Transfer, // transferência
    BankSlip, // boleto
    OnCredit, // fiado
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "sale_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    Completed,
    Pending,
    Paid,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Overdue,
}

// --- Venda ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: Uuid,
    #[schema(example = "Maria Oliveira")]
    pub client: String,
    pub sale_date: DateTime<Utc>,
    pub payment_date: Option<DateTime<Utc>>,
    #[schema(value_type = Option<String>, format = Date, example = "2025-02-10")]
    pub due_date: Option<NaiveDate>,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
    #[schema(example = "10.00")]
    pub discount_percent: Decimal,
    #[schema(example = "449.82")]
    pub total_price: Decimal,
    #[schema(example = "240.00")]
    pub total_cost: Decimal,
    #[schema(example = "209.82")]
    pub profit: Decimal,
    pub status: SaleStatus,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Item de venda: nomes são um retrato do momento da venda, as FKs ficam ao lado.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub id: Uuid,
    pub sale_id: Uuid,
    #[schema(example = 0)]
    pub position: i32,
    pub product_id: Option<Uuid>,
    pub product_name: String,
    pub supplier_id: Option<Uuid>,
    pub supplier_name: String,
    #[schema(example = 2)]
    pub quantity: i32,
    pub unit_price: Decimal,
    pub discount: Decimal,
    pub total_price: Decimal,
    pub unit_cost: Decimal,
    pub total_cost: Decimal,
    pub profit: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleDetail {
    #[serde(flatten)]
    pub header: Sale,
    pub items: Vec<SaleItem>,
}

// --- Estorno ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Reversal {
    pub id: Uuid,
    pub sale_id: Uuid,
    #[schema(example = "Cliente desistiu da compra")]
    pub reason: String,
    #[schema(example = "249.90")]
    pub amount: Decimal,
    pub reversal_date: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

// --- Payloads ---

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewSaleItem {
    pub product_id: Uuid,
    #[validate(range(min = 1, message = "A quantidade deve ser maior que zero."))]
    #[schema(example = 2)]
    pub quantity: i32,
    /// Omitido = preço de venda atual do produto.
    #[validate(custom(function = "non_negative"))]
    pub unit_price: Option<Decimal>,
    /// Desconto em reais sobre a linha.
    #[serde(default)]
    #[validate(custom(function = "non_negative"))]
    pub discount: Decimal,
}

/// Totais calculados no cliente; conferidos contra o recálculo do servidor.
#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClaimedTotals {
    pub total_price: Decimal,
    pub total_cost: Decimal,
    pub profit: Decimal,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewSale {
    #[validate(custom(function = "not_blank", message = "Informe o cliente."))]
    #[schema(example = "Maria Oliveira")]
    pub client: String,
    pub payment_method: PaymentMethod,
    #[schema(value_type = Option<String>, format = Date)]
    pub due_date: Option<NaiveDate>,
    pub notes: Option<String>,
    /// Desconto geral da venda, em %.
    #[serde(default)]
    #[validate(custom(function = "percentage"))]
    pub discount_percent: Decimal,
    #[validate(length(min = 1, message = "A venda precisa de ao menos um item."))]
    #[validate(nested)]
    pub items: Vec<NewSaleItem>,
    pub totals: Option<ClaimedTotals>,
}

/// Só os campos não monetários são editáveis.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleChanges {
    #[validate(custom(function = "not_blank", message = "O cliente não pode ficar vazio."))]
    pub client: Option<String>,
    pub notes: Option<String>,
    #[schema(value_type = Option<String>, format = Date)]
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewReversal {
    #[validate(custom(function = "not_blank", message = "Informe o motivo do estorno."))]
    pub reason: String,
    /// Omitido = valor total da venda.
    #[validate(custom(function = "positive"))]
    pub amount: Option<Decimal>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(quantity: i32) -> NewSaleItem {
        NewSaleItem { product_id: Uuid::nil(), quantity, unit_price: None, discount: Decimal::ZERO }
    }

    fn sale(items: Vec<NewSaleItem>) -> NewSale {
        NewSale {
            client: "Maria".into(),
            payment_method: PaymentMethod::Cash,
            due_date: None,
            notes: None,
            discount_percent: Decimal::ZERO,
            items,
            totals: None,
        }
    }

    #[test]
    fn sale_without_items_is_invalid() {
        let errors = sale(vec![]).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("items"));
    }

    #[test]
    fn item_quantity_is_checked_inside_the_list() {
        assert!(sale(vec![item(2)]).validate().is_ok());
        assert!(sale(vec![item(2), item(0)]).validate().is_err());
    }
}
