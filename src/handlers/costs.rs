// src/handlers/costs.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AdminUser,
    models::cost::{Cost, CostChanges, NewCost},
};

#[utoipa::path(
    get,
    path = "/api/costs",
    tag = "Costs",
    responses((status = 200, description = "Custos", body = Vec<Cost>)),
    security(("api_jwt" = []))
)]
pub async fn list_costs(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let costs = app_state.finance_service.list_costs().await?;
    Ok(Json(costs))
}

#[utoipa::path(
    get,
    path = "/api/costs/{id}",
    tag = "Costs",
    params(("id" = Uuid, Path, description = "ID do custo")),
    responses(
        (status = 200, description = "Custo", body = Cost),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_cost(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let cost = app_state.finance_service.get_cost(id).await?;
    Ok(Json(cost))
}

#[utoipa::path(
    post,
    path = "/api/costs",
    tag = "Costs",
    request_body = NewCost,
    responses(
        (status = 201, description = "Custo criado", body = Cost),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Fornecedor não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_cost(
    State(app_state): State<AppState>,
    Json(payload): Json<NewCost>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let cost = app_state.finance_service.create_cost(&payload).await?;
    Ok((StatusCode::CREATED, Json(cost)))
}

#[utoipa::path(
    put,
    path = "/api/costs/{id}",
    tag = "Costs",
    params(("id" = Uuid, Path, description = "ID do custo")),
    request_body = CostChanges,
    responses(
        (status = 200, description = "Custo atualizado", body = Cost),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_cost(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CostChanges>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let cost = app_state.finance_service.update_cost(id, &payload).await?;
    Ok(Json(cost))
}

#[utoipa::path(
    delete,
    path = "/api/costs/{id}",
    tag = "Costs",
    params(("id" = Uuid, Path, description = "ID do custo")),
    responses(
        (status = 204, description = "Removido"), (status = 404, description = "Não encontrado"),
        (status = 403, description = "Apenas administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_cost(
    State(app_state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.finance_service.delete_cost(id).await?;
    tracing::info!("🗑️ Custo {} removido por {}", id, admin.email);
    Ok(StatusCode::NO_CONTENT)
}
