// src/models/goal.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    common::validation::{non_negative, not_blank, positive},
    models::insight::Priority,
};

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "goal_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum GoalKind {
    Revenue,
    Sales,
    Profit,
    Costs,
}

impl GoalKind {
    pub fn label(self) -> &'static str {
        match self {
            GoalKind::Revenue => "receita",
            GoalKind::Sales => "vendas",
            GoalKind::Profit => "lucro",
            GoalKind::Costs => "custos",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema, Default)]
#[sqlx(type_name = "goal_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    #[default]
    Active,
    Completed,
    Paused,
    Expired,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: Uuid,
    #[schema(example = "Faturar R$ 30 mil em março")]
    pub title: String,
    pub description: String,
    pub kind: GoalKind,
    #[schema(example = "30000.00")]
    pub target_value: Decimal,
    #[schema(example = "12500.00")]
    pub current_value: Decimal,
    #[schema(value_type = String, format = Date)]
    pub start_date: NaiveDate,
    #[schema(value_type = String, format = Date)]
    pub end_date: NaiveDate,
    pub status: GoalStatus,
    pub created_by_ai: bool,
    #[schema(value_type = Option<GoalPlan>)]
    pub ai_plan: Option<Json<GoalPlan>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn validate_period(goal: &NewGoal) -> Result<(), ValidationError> {
    if goal.end_date < goal.start_date {
        let mut err = ValidationError::new("period");
        err.message = Some("A data final deve ser igual ou posterior à inicial.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_period"))]
pub struct NewGoal {
    #[validate(custom(function = "not_blank", message = "O título é obrigatório."))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub kind: GoalKind,
    #[validate(custom(function = "positive"))]
    pub target_value: Decimal,
    #[serde(default)]
    #[validate(custom(function = "non_negative"))]
    pub current_value: Decimal,
    #[schema(value_type = String, format = Date)]
    pub start_date: NaiveDate,
    #[schema(value_type = String, format = Date)]
    pub end_date: NaiveDate,
    #[serde(default)]
    pub status: GoalStatus,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GoalChanges {
    #[validate(custom(function = "not_blank", message = "O título não pode ficar vazio."))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub kind: Option<GoalKind>,
    #[validate(custom(function = "positive"))]
    pub target_value: Option<Decimal>,
    #[validate(custom(function = "non_negative"))]
    pub current_value: Option<Decimal>,
    #[schema(value_type = Option<String>, format = Date)]
    pub start_date: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = Date)]
    pub end_date: Option<NaiveDate>,
    pub status: Option<GoalStatus>,
}

// --- Plano gerado pela IA ---
// Serializa em inglês; os aliases aceitam as chaves em português da resposta da IA.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StrategyCategory {
    Marketing,
    #[serde(alias = "vendas")]
    Sales,
    #[serde(alias = "produtos")]
    Products,
    #[serde(alias = "fornecedores")]
    Suppliers,
    #[serde(alias = "custos")]
    Costs,
    #[serde(alias = "operacional")]
    Operational,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    #[serde(alias = "alto")]
    High,
    #[serde(alias = "medio", alias = "médio")]
    Medium,
    #[serde(alias = "baixo")]
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    #[serde(alias = "diaria", alias = "diária")]
    Daily,
    #[serde(alias = "semanal")]
    Weekly,
    #[serde(alias = "mensal")]
    Monthly,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Strategy {
    #[serde(alias = "categoria")]
    pub category: StrategyCategory,
    #[serde(alias = "titulo")]
    #[validate(length(min = 1))]
    pub title: String,
    #[serde(alias = "descricao")]
    #[validate(length(min = 1))]
    pub description: String,
    #[serde(alias = "prioridade")]
    pub priority: Priority,
    #[serde(alias = "prazo")]
    pub deadline: String,
    #[serde(alias = "impacto")]
    pub impact: Impact,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeekPlan {
    #[serde(alias = "semana")]
    #[validate(range(min = 1, max = 4))]
    pub week: u8,
    #[serde(alias = "atividades")]
    #[validate(length(min = 1))]
    pub activities: Vec<String>,
    #[serde(alias = "metas")]
    pub targets: Vec<String>,
    #[serde(alias = "observacoes")]
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanMetric {
    #[serde(alias = "nome")]
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(alias = "valorAtual")]
    pub current_value: f64,
    #[serde(alias = "valorMeta")]
    pub target_value: f64,
    #[serde(alias = "unidade")]
    pub unit: String,
    #[serde(alias = "frequencia")]
    pub frequency: Frequency,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GoalPlan {
    pub strategies: Vec<Strategy>,
    pub schedule: Vec<WeekPlan>,
    pub metrics: Vec<PlanMetric>,
    pub notes: String,
    pub generated_at: DateTime<Utc>,
}

/// Plano como vem da IA (sem data de geração), validado antes de ser gravado.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GoalPlanDraft {
    #[serde(alias = "estrategias")]
    #[validate(length(min = 1, max = 8))]
    #[validate(nested)]
    pub strategies: Vec<Strategy>,
    #[serde(alias = "cronograma")]
    #[validate(length(min = 1, max = 4))]
    #[validate(nested)]
    pub schedule: Vec<WeekPlan>,
    #[serde(alias = "metricas")]
    #[validate(length(min = 1, max = 5))]
    #[validate(nested)]
    pub metrics: Vec<PlanMetric>,
    #[serde(alias = "observacoes")]
    pub notes: String,
}

impl GoalPlanDraft {
    pub fn into_plan(self, generated_at: DateTime<Utc>) -> GoalPlan {
        GoalPlan {
            strategies: self.strategies,
            schedule: self.schedule,
            metrics: self.metrics,
            notes: self.notes,
            generated_at,
        }
    }
}
