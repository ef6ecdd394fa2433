// src/models/audit.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Ações registradas na trilha de auditoria
pub const ACTION_STOCK_ADJUSTMENT: &str = "ajuste_estoque";
pub const ACTION_STOCK_PURCHASE: &str = "compra_estoque";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: Uuid,
    #[schema(example = "gerente@lazavii.com")]
    pub user_email: String,
    #[schema(example = "ajuste_estoque")]
    pub action: String,
    pub details: String,
    pub timestamp: DateTime<Utc>,
}
