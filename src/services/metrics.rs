// src/services/metrics.rs
//
// Agregações do dashboard e dos relatórios. Funções puras: recebem as vendas
// e custos já carregados e não dependem da ordem das entradas.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate};
use rust_decimal::{prelude::ToPrimitive, Decimal};

use crate::{
    common::{clock::BusinessClock, error::AppError},
    models::{
        cost::{Cost, CostCategory},
        dashboard::{
            CategoryShare, DailyPoint, MetricsSummary, MonthlyRevenue, ProductUnits,
            SupplierPerformance,
        },
        sale::{SaleDetail, SaleStatus},
    },
    services::pricing::round_money,
};

const UNKNOWN_SUPPLIER: &str = "Desconhecido";

// --- Entradas ---

#[derive(Debug, Clone)]
pub struct ItemRecord {
    pub product_name: String,
    pub supplier_name: String,
    pub quantity: i32,
    pub total_price: Decimal,
    pub total_cost: Decimal,
}

#[derive(Debug, Clone)]
pub struct SaleRecord {
    /// Data da venda já no fuso da loja.
    pub sale_date: DateTime<FixedOffset>,
    pub total_price: Decimal,
    pub total_cost: Decimal,
    pub cancelled: bool,
    pub items: Vec<ItemRecord>,
}

#[derive(Debug, Clone)]
pub struct CostRecord {
    pub date: NaiveDate,
    pub amount: Decimal,
    pub category: CostCategory,
}

impl SaleRecord {
    pub fn from_detail(sale: &SaleDetail, clock: &BusinessClock) -> Self {
        Self {
            sale_date: clock.local(sale.header.sale_date),
            total_price: sale.header.total_price,
            total_cost: sale.header.total_cost,
            cancelled: sale.header.status == SaleStatus::Cancelled,
            items: sale
                .items
                .iter()
                .map(|item| ItemRecord {
                    product_name: item.product_name.clone(),
                    supplier_name: item.supplier_name.clone(),
                    quantity: item.quantity,
                    total_price: item.total_price,
                    total_cost: item.total_cost,
                })
                .collect(),
        }
    }
}

impl From<&Cost> for CostRecord {
    fn from(cost: &Cost) -> Self {
        Self { date: cost.date, amount: cost.amount, category: cost.category }
    }
}

// --- Período ---

/// Filtro de datas, inclusivo nas duas pontas. Sem limites = tudo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Self, AppError> {
        if let (Some(f), Some(t)) = (from, to) {
            if f > t {
                return Err(AppError::InvalidInput(
                    "A data inicial não pode ser posterior à data final.".into(),
                ));
            }
        }
        Ok(Self { from, to })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|f| date >= f) && self.to.is_none_or(|t| date <= t)
    }
}

fn counted<'a>(sales: &'a [SaleRecord], range: &'a DateRange) -> impl Iterator<Item = &'a SaleRecord> {
    sales
        .iter()
        .filter(move |s| !s.cancelled && range.contains(s.sale_date.date_naive()))
}

fn costs_in<'a>(costs: &'a [CostRecord], range: &'a DateRange) -> impl Iterator<Item = &'a CostRecord> {
    costs.iter().filter(move |c| range.contains(c.date))
}

// --- Agregações ---

pub fn summarize(sales: &[SaleRecord], costs: &[CostRecord], range: &DateRange) -> MetricsSummary {
    let (gross_revenue, sales_count) = counted(sales, range)
        .fold((Decimal::ZERO, 0usize), |(sum, n), s| (sum + s.total_price, n + 1));
    let (operating_costs, cost_count) = costs_in(costs, range)
        .fold((Decimal::ZERO, 0usize), |(sum, n), c| (sum + c.amount, n + 1));

    MetricsSummary {
        gross_revenue,
        operating_costs,
        net_profit: gross_revenue - operating_costs,
        sales_count,
        cost_count,
    }
}

fn day_label(date: NaiveDate) -> String {
    date.format("%d/%m").to_string()
}

/// Série diária em ordem cronológica. Só aparecem dias com movimento.
pub fn daily_series(sales: &[SaleRecord], costs: &[CostRecord], range: &DateRange) -> Vec<DailyPoint> {
    let mut days: BTreeMap<NaiveDate, (Decimal, Decimal, Decimal)> = BTreeMap::new();

    for sale in counted(sales, range) {
        let day = days.entry(sale.sale_date.date_naive()).or_default();
        day.0 += sale.total_price;
        day.1 += sale.total_cost;
    }
    for cost in costs_in(costs, range) {
        days.entry(cost.date).or_default().2 += cost.amount;
    }

    days.into_iter()
        .map(|(date, (revenue, cost_of_goods, operating_costs))| DailyPoint {
            date,
            label: day_label(date),
            revenue,
            cost_of_goods,
            operating_costs,
        })
        .collect()
}

/// Sete dias zerados terminando em `today`, para o gráfico não ficar vazio.
pub fn empty_week(today: NaiveDate) -> Vec<DailyPoint> {
    (0..7)
        .rev()
        .map(|back| {
            let date = today - Duration::days(back);
            DailyPoint {
                date,
                label: day_label(date),
                revenue: Decimal::ZERO,
                cost_of_goods: Decimal::ZERO,
                operating_costs: Decimal::ZERO,
            }
        })
        .collect()
}

fn supplier_key(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() { UNKNOWN_SUPPLIER.to_string() } else { trimmed.to_string() }
}

/// Agrupa pelos itens vendidos, usando o nome do fornecedor gravado na venda.
pub fn supplier_performance(sales: &[SaleRecord], range: &DateRange) -> Vec<SupplierPerformance> {
    let mut by_supplier: HashMap<String, (i64, Decimal, Decimal)> = HashMap::new();

    for item in counted(sales, range).flat_map(|s| s.items.iter()) {
        let entry = by_supplier.entry(supplier_key(&item.supplier_name)).or_default();
        entry.0 += i64::from(item.quantity);
        entry.1 += item.total_cost;
        entry.2 += item.total_price;
    }

    let mut rows: Vec<SupplierPerformance> = by_supplier
        .into_iter()
        .map(|(supplier, (units_sold, total_cost, total_revenue))| SupplierPerformance {
            supplier,
            units_sold,
            total_cost,
            total_revenue,
            gross_profit: total_revenue - total_cost,
        })
        .collect();

    rows.sort_by(|a, b| {
        b.total_revenue
            .cmp(&a.total_revenue)
            .then_with(|| a.supplier.cmp(&b.supplier))
    });
    rows
}

/// Receita por mês ("AAAA-MM"), em ordem cronológica.
pub fn revenue_by_month(sales: &[SaleRecord], range: &DateRange) -> Vec<MonthlyRevenue> {
    let mut months: BTreeMap<(i32, u32), Decimal> = BTreeMap::new();
    for sale in counted(sales, range) {
        let date = sale.sale_date.date_naive();
        *months.entry((date.year(), date.month())).or_default() += sale.total_price;
    }

    months
        .into_iter()
        .map(|((year, month), revenue)| MonthlyRevenue {
            month: format!("{:04}-{:02}", year, month),
            revenue,
        })
        .collect()
}

/// Unidades vendidas por produto, mais vendidos primeiro.
pub fn units_by_product(sales: &[SaleRecord], range: &DateRange) -> Vec<ProductUnits> {
    let mut units: HashMap<&str, i64> = HashMap::new();
    for item in counted(sales, range).flat_map(|s| s.items.iter()) {
        *units.entry(item.product_name.as_str()).or_default() += i64::from(item.quantity);
    }

    let mut rows: Vec<ProductUnits> = units
        .into_iter()
        .map(|(product, units)| ProductUnits { product: product.to_string(), units })
        .collect();
    rows.sort_by(|a, b| b.units.cmp(&a.units).then_with(|| a.product.cmp(&b.product)));
    rows
}

pub fn revenue_by_supplier(sales: &[SaleRecord], range: &DateRange) -> BTreeMap<String, Decimal> {
    let mut revenue = BTreeMap::new();
    for item in counted(sales, range).flat_map(|s| s.items.iter()) {
        *revenue.entry(supplier_key(&item.supplier_name)).or_insert(Decimal::ZERO) += item.total_price;
    }
    revenue
}

/// Custos por categoria com o percentual (inteiro) sobre o total do período.
pub fn costs_by_category(costs: &[CostRecord], range: &DateRange) -> Vec<CategoryShare> {
    let mut by_category: BTreeMap<CostCategory, Decimal> = BTreeMap::new();
    for cost in costs_in(costs, range) {
        *by_category.entry(cost.category).or_default() += cost.amount;
    }

    let total: Decimal = by_category.values().copied().sum();
    by_category
        .into_iter()
        .map(|(category, amount)| {
            let percentage = if total.is_zero() {
                0
            } else {
                (amount * Decimal::ONE_HUNDRED / total).round().to_u32().unwrap_or(0)
            };
            CategoryShare { category, amount, percentage }
        })
        .collect()
}

/// Progresso da meta em %, com duas casas. Meta zero = 0%.
pub fn goal_progress(target: Decimal, current: Decimal) -> Decimal {
    if target.is_zero() {
        return Decimal::ZERO;
    }
    round_money(current / target * Decimal::ONE_HUNDRED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    fn sale(d: u32, price: &str, cost: &str, supplier: &str) -> SaleRecord {
        SaleRecord {
            sale_date: Utc.with_ymd_and_hms(2025, 1, d, 15, 0, 0).unwrap().fixed_offset(),
            total_price: dec(price),
            total_cost: dec(cost),
            cancelled: false,
            items: vec![ItemRecord {
                product_name: "Tênis".into(),
                supplier_name: supplier.into(),
                quantity: 1,
                total_price: dec(price),
                total_cost: dec(cost),
            }],
        }
    }

    #[test]
    fn reversed_sales_do_not_count() {
        let mut cancelled = sale(3, "500", "200", "A");
        cancelled.cancelled = true;
        let sales = vec![sale(3, "100", "40", "A"), cancelled];

        let summary = summarize(&sales, &[], &DateRange::default());
        assert_eq!(summary.gross_revenue, dec("100"));
        assert_eq!(summary.sales_count, 1);
    }

    #[test]
    fn range_with_from_after_to_is_rejected() {
        assert!(DateRange::new(Some(day(10)), Some(day(1))).is_err());
        assert!(DateRange::new(Some(day(1)), Some(day(1))).is_ok());
    }

    #[test]
    fn daily_series_is_chronological_and_labelled() {
        let sales = vec![sale(9, "50", "20", "A"), sale(2, "80", "30", "A")];
        let costs = vec![CostRecord { date: day(5), amount: dec("12"), category: CostCategory::Marketing }];

        let series = daily_series(&sales, &costs, &DateRange::default());
        let labels: Vec<&str> = series.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, ["02/01", "05/01", "09/01"]);
        assert_eq!(series[1].operating_costs, dec("12"));
        assert_eq!(series[0].cost_of_goods, dec("30"));
    }

    #[test]
    fn empty_week_ends_today() {
        let week = empty_week(day(10));
        assert_eq!(week.len(), 7);
        assert_eq!(week.first().map(|p| p.date), Some(day(4)));
        assert_eq!(week.last().map(|p| p.date), Some(day(10)));
        assert!(week.iter().all(|p| p.revenue.is_zero()));
    }

    #[test]
    fn blank_supplier_is_grouped_as_unknown() {
        let sales = vec![sale(1, "100", "60", "  "), sale(2, "300", "100", "Franca")];
        let rows = supplier_performance(&sales, &DateRange::default());

        assert_eq!(rows[0].supplier, "Franca");
        assert_eq!(rows[1].supplier, "Desconhecido");
        assert_eq!(rows[1].gross_profit, dec("40"));
    }

    #[test]
    fn months_are_keyed_year_month() {
        let mut feb = sale(1, "10", "1", "A");
        feb.sale_date = Utc.with_ymd_and_hms(2025, 2, 1, 12, 0, 0).unwrap().fixed_offset();
        let rows = revenue_by_month(&[feb, sale(1, "5", "1", "A")], &DateRange::default());
        assert_eq!(rows[0].month, "2025-01");
        assert_eq!(rows[1].month, "2025-02");
    }

    #[test]
    fn category_percentages_round_to_whole_numbers() {
        let costs = vec![
            CostRecord { date: day(1), amount: dec("1"), category: CostCategory::Marketing },
            CostRecord { date: day(1), amount: dec("2"), category: CostCategory::Operational },
        ];
        let shares = costs_by_category(&costs, &DateRange::default());
        let marketing = shares.iter().find(|s| s.category == CostCategory::Marketing).unwrap();
        assert_eq!(marketing.percentage, 33);
    }

    #[test]
    fn evening_sale_is_counted_on_the_store_day() {
        use crate::models::sale::{PaymentMethod, PaymentStatus, Sale};
        use uuid::Uuid;

        // 22:30 em Brasília do dia 10 = 01:30 UTC do dia 11
        let at = Utc.with_ymd_and_hms(2025, 1, 11, 1, 30, 0).unwrap();
        let detail = SaleDetail {
            header: Sale {
                id: Uuid::new_v4(),
                client: "Maria".into(),
                sale_date: at,
                payment_date: Some(at),
                due_date: None,
                payment_method: PaymentMethod::Pix,
                notes: None,
                discount_percent: Decimal::ZERO,
                total_price: dec("50"),
                total_cost: dec("20"),
                profit: dec("30"),
                status: SaleStatus::Completed,
                payment_status: PaymentStatus::Paid,
                created_at: at,
                updated_at: at,
            },
            items: vec![],
        };

        let record = SaleRecord::from_detail(&detail, &BusinessClock::default());
        let range = DateRange::new(Some(day(1)), Some(day(10))).unwrap();

        assert_eq!(summarize(&[record.clone()], &[], &range).gross_revenue, dec("50"));
        assert_eq!(daily_series(&[record], &[], &range)[0].label, "10/01");
    }

    #[test]
    fn progress_handles_zero_target() {
        assert_eq!(goal_progress(Decimal::ZERO, dec("10")), Decimal::ZERO);
        assert_eq!(goal_progress(dec("30000"), dec("12500")), dec("41.67"));
    }
}
