// src/models/cost.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::validation::{not_blank, positive},
    models::sale::PaymentMethod,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "cost_category", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CostCategory {
    Operational,
    Marketing,
    Administrative,
    Logistics,
    Other,
}

impl CostCategory {
    /// Rótulo em português, usado nos prompts e relatórios.
    pub fn label(self) -> &'static str {
        match self {
            CostCategory::Operational => "operacional",
            CostCategory::Marketing => "marketing",
            CostCategory::Administrative => "administrativo",
            CostCategory::Logistics => "logistica",
            CostCategory::Other => "outros",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema, Default)]
#[sqlx(type_name = "cost_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CostStatus {
    Paid,
    #[default]
    Pending,
    Overdue,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Cost {
    pub id: Uuid,
    #[schema(example = "Aluguel do galpão")]
    pub description: String,
    pub category: CostCategory,
    #[schema(example = "1800.00")]
    pub amount: Decimal,
    #[schema(value_type = String, format = Date, example = "2025-01-07")]
    pub date: NaiveDate,
    #[schema(value_type = Option<String>, format = Date)]
    pub due_date: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = Date)]
    pub payment_date: Option<NaiveDate>,
    pub supplier_id: Option<Uuid>,
    pub supplier_name: Option<String>,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
    pub status: CostStatus,
    pub recurring: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewCost {
    #[validate(custom(function = "not_blank", message = "A descrição é obrigatória."))]
    pub description: String,
    pub category: CostCategory,
    #[validate(custom(function = "positive"))]
    pub amount: Decimal,
    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,
    #[schema(value_type = Option<String>, format = Date)]
    pub due_date: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = Date)]
    pub payment_date: Option<NaiveDate>,
    pub supplier_id: Option<Uuid>,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
    #[serde(default)]
    pub status: CostStatus,
    #[serde(default)]
    pub recurring: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CostChanges {
    #[validate(custom(function = "not_blank", message = "A descrição não pode ficar vazia."))]
    pub description: Option<String>,
    pub category: Option<CostCategory>,
    #[validate(custom(function = "positive"))]
    pub amount: Option<Decimal>,
    #[schema(value_type = Option<String>, format = Date)]
    pub date: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = Date)]
    pub due_date: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = Date)]
    pub payment_date: Option<NaiveDate>,
    pub supplier_id: Option<Uuid>,
    pub payment_method: Option<PaymentMethod>,
    pub notes: Option<String>,
    pub status: Option<CostStatus>,
    pub recurring: Option<bool>,
}
