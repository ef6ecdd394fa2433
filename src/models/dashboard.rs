// src/models/dashboard.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::cost::CostCategory;

// 1. Cards do topo
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSummary {
    #[schema(example = "150.00")]
    pub gross_revenue: Decimal,
    #[schema(example = "30.00")]
    pub operating_costs: Decimal,
    #[schema(example = "120.00")]
    pub net_profit: Decimal,
    pub sales_count: usize,
    pub cost_count: usize,
}

// 2. Gráfico diário
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyPoint {
    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,
    #[schema(example = "05/01")]
    pub label: String,
    pub revenue: Decimal,
    pub cost_of_goods: Decimal,
    pub operating_costs: Decimal,
}

// 3. Desempenho por fornecedor
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupplierPerformance {
    #[schema(example = "Calçados Franca Ltda")]
    pub supplier: String,
    pub units_sold: i64,
    pub total_cost: Decimal,
    pub total_revenue: Decimal,
    pub gross_profit: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub summary: MetricsSummary,
    #[schema(example = "41.67")]
    pub goal_progress: Decimal,
    pub daily_series: Vec<DailyPoint>,
    pub supplier_performance: Vec<SupplierPerformance>,
}

// --- Relatórios ---

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRevenue {
    #[schema(example = "2025-01")]
    pub month: String,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductUnits {
    pub product: String,
    pub units: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryShare {
    pub category: CostCategory,
    pub amount: Decimal,
    // Percentual inteiro do total, como no gráfico de pizza
    pub percentage: u32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub summary: MetricsSummary,
    pub revenue_by_month: Vec<MonthlyRevenue>,
    pub top_products: Vec<ProductUnits>,
    pub supplier_performance: Vec<SupplierPerformance>,
    pub costs_by_category: Vec<CategoryShare>,
}
