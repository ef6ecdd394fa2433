// src/services/dashboard_service.rs
//
// Carrega vendas, custos e metas e monta os números do dashboard e dos
// relatórios. Tudo é recalculado a cada chamada.

use chrono::NaiveDate;

use crate::{
    common::{clock::BusinessClock, error::AppError},
    db::{CostRepository, GoalRepository, SaleRepository},
    models::{
        dashboard::{DashboardMetrics, ReportSummary},
        goal::Goal,
    },
    services::metrics::{self, CostRecord, DateRange, SaleRecord},
};

const TOP_PRODUCTS: usize = 10;

#[derive(Clone)]
pub struct DashboardService {
    sale_repo: SaleRepository,
    cost_repo: CostRepository,
    goal_repo: GoalRepository,
    clock: BusinessClock,
}

/// Vendas e custos já no formato das agregações.
pub struct Ledger {
    pub sales: Vec<SaleRecord>,
    pub costs: Vec<CostRecord>,
}

pub fn build_dashboard(
    ledger: &Ledger,
    goal: Option<&Goal>,
    range: &DateRange,
    today: NaiveDate,
) -> DashboardMetrics {
    let mut daily_series = metrics::daily_series(&ledger.sales, &ledger.costs, range);
    if daily_series.is_empty() {
        daily_series = metrics::empty_week(today);
    }

    DashboardMetrics {
        summary: metrics::summarize(&ledger.sales, &ledger.costs, range),
        goal_progress: goal
            .map(|g| metrics::goal_progress(g.target_value, g.current_value))
            .unwrap_or_default(),
        daily_series,
        supplier_performance: metrics::supplier_performance(&ledger.sales, range),
    }
}

pub fn build_report(ledger: &Ledger, range: &DateRange) -> ReportSummary {
    let mut top_products = metrics::units_by_product(&ledger.sales, range);
    top_products.truncate(TOP_PRODUCTS);

    ReportSummary {
        summary: metrics::summarize(&ledger.sales, &ledger.costs, range),
        revenue_by_month: metrics::revenue_by_month(&ledger.sales, range),
        top_products,
        supplier_performance: metrics::supplier_performance(&ledger.sales, range),
        costs_by_category: metrics::costs_by_category(&ledger.costs, range),
    }
}

impl DashboardService {
    pub fn new(
        sale_repo: SaleRepository,
        cost_repo: CostRepository,
        goal_repo: GoalRepository,
        clock: BusinessClock,
    ) -> Self {
        Self { sale_repo, cost_repo, goal_repo, clock }
    }

    pub fn clock(&self) -> BusinessClock {
        self.clock
    }

    pub async fn load_ledger(&self) -> Result<Ledger, AppError> {
        let sales = self.sale_repo.list_detailed().await?;
        let costs = self.cost_repo.list().await?;

        Ok(Ledger {
            sales: sales.iter().map(|s| SaleRecord::from_detail(s, &self.clock)).collect(),
            costs: costs.iter().map(CostRecord::from).collect(),
        })
    }

    pub async fn dashboard(&self, range: &DateRange) -> Result<DashboardMetrics, AppError> {
        let ledger = self.load_ledger().await?;
        let goal = self.goal_repo.first_active().await?;
        Ok(build_dashboard(&ledger, goal.as_ref(), range, self.clock.today()))
    }

    pub async fn report(&self, range: &DateRange) -> Result<ReportSummary, AppError> {
        let ledger = self.load_ledger().await?;
        Ok(build_report(&ledger, range))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::goal::{GoalKind, GoalStatus};
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn goal(target: i64, current: i64) -> Goal {
        Goal {
            id: uuid::Uuid::new_v4(),
            title: "Faturar".into(),
            description: String::new(),
            kind: GoalKind::Revenue,
            target_value: Decimal::from(target),
            current_value: Decimal::from(current),
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
            status: GoalStatus::Active,
            created_by_ai: false,
            ai_plan: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn empty_ledger_falls_back_to_a_zero_week() {
        let ledger = Ledger { sales: vec![], costs: vec![] };
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();

        let dashboard = build_dashboard(&ledger, None, &DateRange::default(), today);
        assert_eq!(dashboard.daily_series.len(), 7);
        assert_eq!(dashboard.goal_progress, Decimal::ZERO);
        assert_eq!(dashboard.summary.sales_count, 0);
    }

    #[test]
    fn goal_progress_comes_from_the_active_goal() {
        let ledger = Ledger { sales: vec![], costs: vec![] };
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();

        let dashboard = build_dashboard(&ledger, Some(&goal(200, 50)), &DateRange::default(), today);
        assert_eq!(dashboard.goal_progress, Decimal::from(25));
    }
}
