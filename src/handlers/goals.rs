// src/handlers/goals.rs

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
    models::goal::{Goal, GoalChanges, NewGoal},
};

#[utoipa::path(
    get,
    path = "/api/goals",
    tag = "Goals",
    responses((status = 200, description = "Metas", body = Vec<Goal>)),
    security(("api_jwt" = []))
)]
pub async fn list_goals(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let goals = app_state.goal_service.list_goals().await?;
    Ok(Json(goals))
}

#[utoipa::path(
    get,
    path = "/api/goals/{id}",
    tag = "Goals",
    params(("id" = Uuid, Path, description = "ID da meta")),
    responses(
        (status = 200, description = "Meta", body = Goal),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_goal(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let goal = app_state.goal_service.get_goal(id).await?;
    Ok(Json(goal))
}

#[utoipa::path(
    post,
    path = "/api/goals",
    tag = "Goals",
    request_body = NewGoal,
    responses(
        (status = 201, description = "Meta criada", body = Goal),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_goal(
    State(app_state): State<AppState>,
    Json(payload): Json<NewGoal>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let goal = app_state.goal_service.create_goal(&payload).await?;
    Ok((StatusCode::CREATED, Json(goal)))
}

#[utoipa::path(
    put,
    path = "/api/goals/{id}",
    tag = "Goals",
    params(("id" = Uuid, Path, description = "ID da meta")),
    request_body = GoalChanges,
    responses(
        (status = 200, description = "Meta atualizada", body = Goal),
        (status = 400, description = "Período inválido"),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_goal(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<GoalChanges>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let goal = app_state.goal_service.update_goal(id, &payload).await?;
    Ok(Json(goal))
}

#[utoipa::path(
    delete,
    path = "/api/goals/{id}",
    tag = "Goals",
    params(("id" = Uuid, Path, description = "ID da meta")),
    responses(
        (status = 204, description = "Removida"), (status = 404, description = "Não encontrada"),
        (status = 403, description = "Apenas administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_goal(
    State(app_state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.goal_service.delete_goal(id).await?;
    tracing::info!("🗑️ Meta {} removida por {}", id, admin.email);
    Ok(StatusCode::NO_CONTENT)
}

// POST /api/goals/{id}/plan
// 🤖 Gera (ou substitui) o plano da meta com a IA
#[utoipa::path(
    post,
    path = "/api/goals/{id}/plan",
    tag = "Goals",
    params(("id" = Uuid, Path, description = "ID da meta")),
    responses(
        (status = 200, description = "Meta com o plano gerado", body = Goal),
        (status = 404, description = "Não encontrada"),
        (status = 502, description = "Resposta da IA fora do formato"),
        (status = 503, description = "IA indisponível ou sem chave configurada")
    ),
    security(("api_jwt" = []))
)]
pub async fn generate_goal_plan(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let goal = app_state.advisory_service.generate_goal_plan(id).await?;
    Ok(Json(goal))
}
