// src/handlers/sales.rs

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
    models::sale::{NewReversal, NewSale, Reversal, SaleChanges, SaleDetail},
};

// GET /api/sales
#[utoipa::path(
    get,
    path = "/api/sales",
    tag = "Sales",
    responses((status = 200, description = "Vendas com itens, mais recentes primeiro", body = Vec<SaleDetail>)),
    security(("api_jwt" = []))
)]
pub async fn list_sales(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let sales = app_state.sales_service.list_sales().await?;
    Ok(Json(sales))
}

// GET /api/sales/{id}
#[utoipa::path(
    get,
    path = "/api/sales/{id}",
    tag = "Sales",
    params(("id" = Uuid, Path, description = "ID da venda")),
    responses(
        (status = 200, description = "Venda", body = SaleDetail),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_sale(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let sale = app_state.sales_service.get_sale(id).await?;
    Ok(Json(sale))
}

// POST /api/sales
// Estoque, totais e itens são gravados numa única transação.
#[utoipa::path(
    post,
    path = "/api/sales",
    tag = "Sales",
    request_body = NewSale,
    responses(
        (status = 201, description = "Venda registrada", body = SaleDetail),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Produto não encontrado"),
        (status = 409, description = "Estoque insuficiente"),
        (status = 422, description = "Totais informados não conferem")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_sale(
    State(app_state): State<AppState>,
    Json(payload): Json<NewSale>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let sale = app_state.sales_service.submit_sale(&payload).await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

// PUT /api/sales/{id}
#[utoipa::path(
    put,
    path = "/api/sales/{id}",
    tag = "Sales",
    params(("id" = Uuid, Path, description = "ID da venda")),
    request_body = SaleChanges,
    responses(
        (status = 200, description = "Venda atualizada", body = SaleDetail),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_sale(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SaleChanges>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let sale = app_state.sales_service.update_sale(id, &payload).await?;
    Ok(Json(sale))
}

// POST /api/sales/{id}/confirm-payment
#[utoipa::path(
    post,
    path = "/api/sales/{id}/confirm-payment",
    tag = "Sales",
    params(("id" = Uuid, Path, description = "ID da venda")),
    responses(
        (status = 200, description = "Pagamento confirmado", body = SaleDetail),
        (status = 404, description = "Não encontrada"),
        (status = 409, description = "Venda cancelada ou já paga")
    ),
    security(("api_jwt" = []))
)]
pub async fn confirm_payment(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let sale = app_state.sales_service.confirm_payment(id).await?;
    Ok(Json(sale))
}

// POST /api/sales/{id}/reversal
#[utoipa::path(
    post,
    path = "/api/sales/{id}/reversal",
    tag = "Reversals",
    params(("id" = Uuid, Path, description = "ID da venda")),
    request_body = NewReversal,
    responses(
        (status = 201, description = "Estorno registrado e estoque devolvido", body = Reversal),
        (status = 400, description = "Motivo vazio ou valor acima do total"),
        (status = 404, description = "Venda não encontrada"),
        (status = 409, description = "Venda já cancelada")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_reversal(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<NewReversal>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let reversal = app_state.sales_service.create_reversal(id, &payload).await?;
    Ok((StatusCode::CREATED, Json(reversal)))
}

// GET /api/reversals
#[utoipa::path(
    get,
    path = "/api/reversals",
    tag = "Reversals",
    responses((status = 200, description = "Estornos", body = Vec<Reversal>)),
    security(("api_jwt" = []))
)]
pub async fn list_reversals(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let reversals = app_state.sales_service.list_reversals().await?;
    Ok(Json(reversals))
}
