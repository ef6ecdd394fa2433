// src/handlers/logs.rs

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AdminUser,
    models::audit::LogEntry,
};

const DEFAULT_LIMIT: i64 = 200;
const MAX_LIMIT: i64 = 1000;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LogQuery {
    /// Máximo de registros (padrão 200, teto 1000)
    pub limit: Option<i64>,
}

// GET /api/logs
#[utoipa::path(
    get,
    path = "/api/logs",
    tag = "Logs",
    params(LogQuery),
    responses(
        (status = 200, description = "Trilha de auditoria, mais recentes primeiro", body = Vec<LogEntry>),
        (status = 403, description = "Apenas administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_logs(
    State(app_state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Query(query): Query<LogQuery>,
) -> Result<impl IntoResponse, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let entries = app_state.log_repo.list(limit).await?;
    Ok(Json(entries))
}
