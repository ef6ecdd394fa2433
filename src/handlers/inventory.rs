// src/handlers/inventory.rs

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
    middleware::auth::AuthenticatedUser,
    models::product::{StockAdjustment, StockMovement, StockPurchase},
};

// POST /api/products/{id}/adjust
#[utoipa::path(
    post,
    path = "/api/products/{id}/adjust",
    tag = "Inventory",
    params(("id" = Uuid, Path, description = "ID do produto")),
    request_body = StockAdjustment,
    responses(
        (status = 200, description = "Estoque ajustado", body = StockMovement),
        (status = 400, description = "Motivo vazio ou quantidade zero"),
        (status = 409, description = "Estoque ficaria negativo")
    ),
    security(("api_jwt" = []))
)]
pub async fn adjust_stock(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<StockAdjustment>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let movement = app_state.inventory_service.adjust_stock(&user, id, &payload).await?;
    Ok(Json(movement))
}

// POST /api/products/{id}/purchase
#[utoipa::path(
    post,
    path = "/api/products/{id}/purchase",
    tag = "Inventory",
    params(("id" = Uuid, Path, description = "ID do produto")),
    request_body = StockPurchase,
    responses(
        (status = 201, description = "Compra registrada (estoque, log e custo)", body = StockMovement),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn purchase_stock(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<StockPurchase>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let movement = app_state.inventory_service.purchase_stock(&user, id, &payload).await?;
    Ok((StatusCode::CREATED, Json(movement)))
}
