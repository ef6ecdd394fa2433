// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(title = "Lazavii Financials API", description = "Back-office de revenda de calçados"),
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Catálogo ---
        handlers::suppliers::list_suppliers,
        handlers::suppliers::get_supplier,
        handlers::suppliers::create_supplier,
        handlers::suppliers::update_supplier,
        handlers::suppliers::delete_supplier,
        handlers::products::list_products,
        handlers::products::get_product,
        handlers::products::create_product,
        handlers::products::update_product,
        handlers::products::delete_product,

        // --- Estoque ---
        handlers::inventory::adjust_stock,
        handlers::inventory::purchase_stock,

        // --- Vendas ---
        handlers::sales::list_sales,
        handlers::sales::get_sale,
        handlers::sales::create_sale,
        handlers::sales::update_sale,
        handlers::sales::confirm_payment,
        handlers::sales::create_reversal,
        handlers::sales::list_reversals,

        // --- Custos ---
        handlers::costs::list_costs,
        handlers::costs::get_cost,
        handlers::costs::create_cost,
        handlers::costs::update_cost,
        handlers::costs::delete_cost,

        // --- Metas ---
        handlers::goals::list_goals,
        handlers::goals::get_goal,
        handlers::goals::create_goal,
        handlers::goals::update_goal,
        handlers::goals::delete_goal,
        handlers::goals::generate_goal_plan,

        // --- IA ---
        handlers::insights::list_insights,
        handlers::insights::generate_insights,
        handlers::insights::set_insight_active,
        handlers::insights::delete_insight,

        // --- Dashboard ---
        handlers::dashboard::get_dashboard,
        handlers::dashboard::get_report,

        // --- Logs ---
        handlers::logs::list_logs,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::UserRole,
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Catálogo ---
            models::supplier::RecordStatus,
            models::supplier::Supplier,
            models::supplier::NewSupplier,
            models::supplier::SupplierChanges,
            models::product::Product,
            models::product::NewProduct,
            models::product::ProductChanges,
            models::product::StockAdjustment,
            models::product::StockPurchase,
            models::product::StockMovement,

            // --- Vendas ---
            models::sale::PaymentMethod,
            models::sale::SaleStatus,
            models::sale::PaymentStatus,
            models::sale::Sale,
            models::sale::SaleItem,
            models::sale::SaleDetail,
            models::sale::NewSaleItem,
            models::sale::ClaimedTotals,
            models::sale::NewSale,
            models::sale::SaleChanges,
            models::sale::Reversal,
            models::sale::NewReversal,

            // --- Custos ---
            models::cost::CostCategory,
            models::cost::CostStatus,
            models::cost::Cost,
            models::cost::NewCost,
            models::cost::CostChanges,

            // --- Metas ---
            models::goal::GoalKind,
            models::goal::GoalStatus,
            models::goal::Goal,
            models::goal::NewGoal,
            models::goal::GoalChanges,
            models::goal::GoalPlan,
            models::goal::Strategy,
            models::goal::StrategyCategory,
            models::goal::Impact,
            models::goal::Frequency,
            models::goal::WeekPlan,
            models::goal::PlanMetric,

            // --- IA ---
            models::insight::Priority,
            models::insight::InsightCategory,
            models::insight::Insight,
            handlers::insights::InsightToggle,

            // --- Dashboard ---
            models::dashboard::MetricsSummary,
            models::dashboard::DailyPoint,
            models::dashboard::SupplierPerformance,
            models::dashboard::DashboardMetrics,
            models::dashboard::MonthlyRevenue,
            models::dashboard::ProductUnits,
            models::dashboard::CategoryShare,
            models::dashboard::ReportSummary,

            // --- Logs ---
            models::audit::LogEntry,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Suppliers", description = "Fornecedores"),
        (name = "Products", description = "Catálogo de Produtos"),
        (name = "Inventory", description = "Ajustes e Compras de Estoque"),
        (name = "Sales", description = "Vendas e Recebimentos"),
        (name = "Reversals", description = "Estornos de Vendas"),
        (name = "Costs", description = "Custos Operacionais"),
        (name = "Goals", description = "Metas e Planos de Ação"),
        (name = "Insights", description = "Recomendações Geradas por IA"),
        (name = "Dashboard", description = "Indicadores e Relatórios Gerenciais"),
        (name = "Logs", description = "Trilha de Auditoria")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme("api_jwt", SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_every_route_group() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/auth/login",
            "/api/products/{id}/purchase",
            "/api/sales/{id}/reversal",
            "/api/goals/{id}/plan",
            "/api/insights/generate",
            "/api/dashboard",
            "/api/logs",
        ] {
            assert!(doc.paths.paths.contains_key(path), "rota ausente: {}", path);
        }
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("api_jwt"));
    }
}
