// src/handlers/insights.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AdminUser,
    models::insight::Insight,
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct InsightFilter {
    /// Só os insights ativos
    #[serde(default)]
    pub active_only: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct InsightToggle {
    pub active: bool,
}

#[utoipa::path(
    get,
    path = "/api/insights",
    tag = "Insights",
    params(InsightFilter),
    responses((status = 200, description = "Insights, mais recentes primeiro", body = Vec<Insight>)),
    security(("api_jwt" = []))
)]
pub async fn list_insights(
    State(app_state): State<AppState>,
    Query(filter): Query<InsightFilter>,
) -> Result<impl IntoResponse, AppError> {
    let insights = app_state.advisory_service.list_insights(filter.active_only).await?;
    Ok(Json(insights))
}

// POST /api/insights/generate
// 🤖 Desativa o lote anterior e grava o novo
#[utoipa::path(
    post,
    path = "/api/insights/generate",
    tag = "Insights",
    responses(
        (status = 201, description = "Novo lote de insights", body = Vec<Insight>),
        (status = 502, description = "Resposta da IA fora do formato"),
        (status = 503, description = "IA indisponível ou sem chave configurada")
    ),
    security(("api_jwt" = []))
)]
pub async fn generate_insights(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let insights = app_state.advisory_service.generate_insights().await?;
    Ok((StatusCode::CREATED, Json(insights)))
}

#[utoipa::path(
    patch,
    path = "/api/insights/{id}",
    tag = "Insights",
    params(("id" = Uuid, Path, description = "ID do insight")),
    request_body = InsightToggle,
    responses(
        (status = 200, description = "Insight atualizado", body = Insight),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn set_insight_active(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<InsightToggle>,
) -> Result<impl IntoResponse, AppError> {
    let insight = app_state.advisory_service.set_insight_active(id, payload.active).await?;
    Ok(Json(insight))
}

#[utoipa::path(
    delete,
    path = "/api/insights/{id}",
    tag = "Insights",
    params(("id" = Uuid, Path, description = "ID do insight")),
    responses(
        (status = 204, description = "Removido"), (status = 404, description = "Não encontrado"),
        (status = 403, description = "Apenas administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_insight(
    State(app_state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.advisory_service.delete_insight(id).await?;
    tracing::info!("🗑️ Insight {} removido por {}", id, admin.email);
    Ok(StatusCode::NO_CONTENT)
}
