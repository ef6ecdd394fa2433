// Propriedades das agregações do dashboard.

use std::str::FromStr;

use chrono::{FixedOffset, NaiveDate, TimeZone};
use lazavii_financials::{
    models::cost::CostCategory,
    services::metrics::{
        costs_by_category, daily_series, goal_progress, summarize, supplier_performance,
        CostRecord, DateRange, ItemRecord, SaleRecord,
    },
};
use proptest::prelude::*;
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn store_tz() -> FixedOffset {
    FixedOffset::west_opt(3 * 3600).unwrap()
}

fn sale_at(day: u32, hour: u32, price: Decimal, cost: Decimal, supplier: &str, cancelled: bool) -> SaleRecord {
    SaleRecord {
        sale_date: store_tz().with_ymd_and_hms(2025, 1, day, hour, 30, 0).unwrap(),
        total_price: price,
        total_cost: cost,
        cancelled,
        items: vec![ItemRecord {
            product_name: format!("Produto {}", day),
            supplier_name: supplier.to_string(),
            quantity: 1,
            total_price: price,
            total_cost: cost,
        }],
    }
}

fn sale_on(day: u32, price: Decimal, cost: Decimal, supplier: &str, cancelled: bool) -> SaleRecord {
    sale_at(day, 14, price, cost, supplier, cancelled)
}

fn day(d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(2025, 1, d)
}

fn cost_on(day: u32, amount: Decimal) -> CostRecord {
    CostRecord {
        date: NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
        amount,
        category: CostCategory::Operational,
    }
}

#[test]
fn one_sale_and_one_cost_give_the_expected_cards() {
    let sales = vec![sale_on(5, dec("150.00"), dec("80.00"), "Franca", false)];
    let costs = vec![cost_on(6, dec("30.00"))];

    let summary = summarize(&sales, &costs, &DateRange::default());

    assert_eq!(summary.gross_revenue, dec("150.00"));
    assert_eq!(summary.operating_costs, dec("30.00"));
    assert_eq!(summary.net_profit, dec("120.00"));
    assert_eq!(summary.sales_count, 1);
    assert_eq!(summary.cost_count, 1);
}

#[test]
fn worked_example_with_range_gives_150_30_120() {
    let sales = vec![
        sale_on(5, dec("100"), dec("60"), "Franca", false),
        sale_on(10, dec("50"), dec("25"), "Birigui", false),
    ];
    let costs = vec![cost_on(7, dec("30"))];
    let range = DateRange::new(day(1), day(10)).unwrap();

    let summary = summarize(&sales, &costs, &range);

    assert_eq!(summary.gross_revenue, dec("150"));
    assert_eq!(summary.operating_costs, dec("30"));
    assert_eq!(summary.net_profit, dec("120"));
    assert_eq!(summary.sales_count, 2);
}

#[test]
fn range_bounds_are_inclusive() {
    let sales = vec![
        sale_on(1, dec("10"), dec("5"), "A", false),
        sale_on(10, dec("20"), dec("5"), "A", false),
        sale_on(11, dec("40"), dec("5"), "A", false),
    ];
    let range = DateRange::new(day(1), day(10)).unwrap();

    assert_eq!(summarize(&sales, &[], &range).gross_revenue, dec("30"));
}

#[test]
fn costs_on_both_bounds_are_counted() {
    let costs = vec![
        cost_on(1, dec("5")),
        cost_on(10, dec("7")),
        cost_on(11, dec("100")),
    ];
    let range = DateRange::new(day(1), day(10)).unwrap();

    let summary = summarize(&[], &costs, &range);
    assert_eq!(summary.operating_costs, dec("12"));
    assert_eq!(summary.cost_count, 2);

    let shares = costs_by_category(&costs, &range);
    assert_eq!(shares.len(), 1);
    assert_eq!(shares[0].amount, dec("12"));
}

#[test]
fn late_evening_sale_stays_on_its_local_day() {
    let sales = vec![sale_at(10, 22, dec("80"), dec("30"), "Franca", false)];
    let range = DateRange::new(day(1), day(10)).unwrap();

    assert_eq!(summarize(&sales, &[], &range).gross_revenue, dec("80"));
    assert_eq!(daily_series(&sales, &[], &range)[0].label, "10/01");
}

#[test]
fn inverted_range_is_rejected() {
    assert!(DateRange::new(NaiveDate::from_ymd_opt(2025, 2, 1), day(1)).is_err());
}

#[test]
fn cancelled_sales_are_left_out_everywhere() {
    let sales = vec![
        sale_on(3, dec("100"), dec("60"), "Franca", false),
        sale_on(3, dec("999"), dec("1"), "Franca", true),
    ];
    let range = DateRange::default();

    assert_eq!(summarize(&sales, &[], &range).gross_revenue, dec("100"));
    assert_eq!(daily_series(&sales, &[], &range)[0].revenue, dec("100"));
    assert_eq!(supplier_performance(&sales, &range)[0].units_sold, 1);
}

#[test]
fn blank_supplier_is_reported_as_unknown() {
    let sales = vec![sale_on(2, dec("50"), dec("20"), "  ", false)];
    let rows = supplier_performance(&sales, &DateRange::default());
    assert_eq!(rows[0].supplier, "Desconhecido");
    assert_eq!(rows[0].gross_profit, dec("30"));
}

#[test]
fn zero_target_means_zero_progress() {
    assert_eq!(goal_progress(Decimal::ZERO, dec("500")), Decimal::ZERO);
    assert_eq!(goal_progress(dec("300"), dec("125")), dec("41.67"));
}

#[test]
fn category_shares_round_to_whole_percent() {
    let costs = vec![
        CostRecord { category: CostCategory::Marketing, ..cost_on(1, dec("1")) },
        cost_on(2, dec("2")),
    ];
    let shares = costs_by_category(&costs, &DateRange::default());
    let total: u32 = shares.iter().map(|s| s.percentage).sum();
    assert_eq!(total, 100);
}

fn arb_sale() -> impl Strategy<Value = SaleRecord> {
    (1u32..=28, 0i64..100_000, 0i64..100_000, 0usize..3, any::<bool>()).prop_map(
        |(day, price, cost, supplier, cancelled)| {
            let name = ["Franca", "Birigui", ""][supplier];
            sale_on(day, Decimal::new(price, 2), Decimal::new(cost, 2), name, cancelled)
        },
    )
}

fn arb_cost() -> impl Strategy<Value = CostRecord> {
    (1u32..=28, 1i64..50_000).prop_map(|(day, amount)| cost_on(day, Decimal::new(amount, 2)))
}

// Período aleatório: aberto, só início, só fim ou fechado (inclusivo)
fn arb_range() -> impl Strategy<Value = DateRange> {
    (prop::option::of(1u32..=28), prop::option::of(1u32..=28)).prop_map(|(a, b)| {
        let (from, to) = match (a, b) {
            (Some(a), Some(b)) => (Some(a.min(b)), Some(a.max(b))),
            other => other,
        };
        DateRange::new(from.and_then(day), to.and_then(day)).unwrap()
    })
}

proptest! {
    #[test]
    fn aggregations_ignore_input_order(
        sales in prop::collection::vec(arb_sale(), 0..20),
        costs in prop::collection::vec(arb_cost(), 0..20),
        range in arb_range(),
    ) {
        let mut rev_sales = sales.clone();
        rev_sales.reverse();
        let mut rev_costs = costs.clone();
        rev_costs.reverse();

        prop_assert_eq!(summarize(&sales, &costs, &range), summarize(&rev_sales, &rev_costs, &range));
        prop_assert_eq!(daily_series(&sales, &costs, &range), daily_series(&rev_sales, &rev_costs, &range));
        prop_assert_eq!(supplier_performance(&sales, &range), supplier_performance(&rev_sales, &range));
    }

    #[test]
    fn recomputing_gives_the_same_result(
        sales in prop::collection::vec(arb_sale(), 0..20),
        costs in prop::collection::vec(arb_cost(), 0..20),
        range in arb_range(),
    ) {
        prop_assert_eq!(summarize(&sales, &costs, &range), summarize(&sales, &costs, &range));
        prop_assert_eq!(costs_by_category(&costs, &range), costs_by_category(&costs, &range));
    }

    #[test]
    fn daily_series_adds_up_to_the_summary(
        sales in prop::collection::vec(arb_sale(), 0..20),
        costs in prop::collection::vec(arb_cost(), 0..20),
        range in arb_range(),
    ) {
        let summary = summarize(&sales, &costs, &range);
        let series = daily_series(&sales, &costs, &range);

        let revenue: Decimal = series.iter().map(|p| p.revenue).sum();
        let operating: Decimal = series.iter().map(|p| p.operating_costs).sum();
        prop_assert_eq!(revenue, summary.gross_revenue);
        prop_assert_eq!(operating, summary.operating_costs);
        prop_assert!(series.windows(2).all(|w| w[0].date < w[1].date));
    }
}
