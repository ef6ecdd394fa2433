// src/models/supplier.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::validation::not_blank;

/// Situação cadastral, compartilhada por fornecedores e produtos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema, Default)]
#[sqlx(type_name = "record_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    #[default]
    Active,
    Inactive,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: Uuid,
    #[schema(example = "Calçados Franca Ltda")]
    pub name: String,
    #[schema(example = "Marcos")]
    pub contact: String,
    #[schema(example = "(16) 99999-0000")]
    pub phone: String,
    pub email: String,
    pub address: String,
    pub main_products: Vec<String>,
    pub status: RecordStatus,

    // Contagem viva (subquery), não um contador gravado
    #[schema(example = 12)]
    pub product_count: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewSupplier {
    #[validate(custom(function = "not_blank", message = "O nome é obrigatório."))]
    #[schema(example = "Calçados Franca Ltda")]
    pub name: String,
    #[validate(custom(function = "not_blank", message = "O contato é obrigatório."))]
    pub contact: String,
    #[serde(default)]
    pub phone: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub main_products: Vec<String>,
    #[serde(default)]
    pub status: RecordStatus,
}

/// Edição parcial: só os campos presentes são alterados.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupplierChanges {
    #[validate(custom(function = "not_blank", message = "O nome não pode ficar vazio."))]
    pub name: Option<String>,
    #[validate(custom(function = "not_blank", message = "O contato não pode ficar vazio."))]
    pub contact: Option<String>,
    pub phone: Option<String>,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,
    pub address: Option<String>,
    pub main_products: Option<Vec<String>>,
    pub status: Option<RecordStatus>,
}
