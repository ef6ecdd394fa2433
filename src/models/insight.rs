// src/models/insight.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Os aliases em português aceitam a resposta "crua" da IA.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "priority_level", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    #[serde(alias = "alta")]
    High,
    #[serde(alias = "media", alias = "média")]
    Medium,
    #[serde(alias = "baixa")]
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "insight_category", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InsightCategory {
    #[serde(alias = "vendas")]
    Sales,
    #[serde(alias = "custos")]
    Costs,
    #[serde(alias = "produtos")]
    Products,
    #[serde(alias = "fornecedores")]
    Suppliers,
    #[serde(alias = "geral")]
    General,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub id: Uuid,
    #[schema(example = "Aumentar Margem de Lucro")]
    pub title: String,
    pub description: String,
    pub category: InsightCategory,
    pub priority: Priority,
    #[schema(example = "Negociar descontos por volume com fornecedores")]
    pub action: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insight como a IA devolve, antes de ir para o banco.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct InsightDraft {
    #[serde(alias = "titulo")]
    #[validate(length(min = 1, message = "título vazio"))]
    pub title: String,
    #[serde(alias = "descricao")]
    #[validate(length(min = 1, message = "descrição vazia"))]
    pub description: String,
    #[serde(alias = "categoria")]
    pub category: InsightCategory,
    #[serde(alias = "prioridade")]
    pub priority: Priority,
    #[serde(alias = "acao")]
    #[validate(length(min = 1, message = "ação vazia"))]
    pub action: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InsightBatch {
    #[validate(length(min = 1, message = "nenhum insight retornado"))]
    #[validate(nested)]
    pub insights: Vec<InsightDraft>,
}
