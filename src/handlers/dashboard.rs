// src/handlers/dashboard.rs

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    common::error::AppError,
    config::AppState,
    models::dashboard::{DashboardMetrics, ReportSummary},
    services::metrics::DateRange,
};

/// Período opcional; ambos os limites são inclusivos.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PeriodQuery {
    #[param(value_type = Option<String>, format = Date)]
    pub from: Option<NaiveDate>,
    #[param(value_type = Option<String>, format = Date)]
    pub to: Option<NaiveDate>,
}

impl PeriodQuery {
    fn range(&self) -> Result<DateRange, AppError> {
        DateRange::new(self.from, self.to)
    }
}

// GET /api/dashboard
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "Dashboard",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Cards, série diária e fornecedores", body = DashboardMetrics),
        (status = 400, description = "Período inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_dashboard(
    State(app_state): State<AppState>,
    Query(period): Query<PeriodQuery>,
) -> Result<impl IntoResponse, AppError> {
    let metrics = app_state.dashboard_service.dashboard(&period.range()?).await?;
    Ok(Json(metrics))
}

// GET /api/reports
#[utoipa::path(
    get,
    path = "/api/reports",
    tag = "Dashboard",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Relatório consolidado", body = ReportSummary),
        (status = 400, description = "Período inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_report(
    State(app_state): State<AppState>,
    Query(period): Query<PeriodQuery>,
) -> Result<impl IntoResponse, AppError> {
    let report = app_state.dashboard_service.report(&period.range()?).await?;
    Ok(Json(report))
}
