// Fluxo de venda sem banco: travas simuladas com um HashMap de produtos.

use std::{collections::HashMap, str::FromStr};

use chrono::{TimeZone, Utc};
use lazavii_financials::{
    common::error::AppError,
    models::{
        product::LockedProduct,
        sale::{ClaimedTotals, PaymentMethod, PaymentStatus, SaleStatus},
    },
    services::{
        inventory_service::apply_delta,
        pricing::{
            payment_terms, plan_stock_decrements, price_sale, verify_client_totals, LineRequest,
        },
    },
};
use rust_decimal::Decimal;
use uuid::Uuid;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn product(name: &str, stock: i32, cost: &str, price: &str) -> LockedProduct {
    LockedProduct {
        id: Uuid::new_v4(),
        name: name.to_string(),
        supplier_id: Uuid::new_v4(),
        supplier_name: "Calçados Franca".to_string(),
        purchase_price: dec(cost),
        sale_price: dec(price),
        stock,
    }
}

fn line(product_id: Uuid, quantity: i32) -> LineRequest {
    LineRequest { product_id, quantity, unit_price: None, discount: Decimal::ZERO }
}

fn catalog(products: &[LockedProduct]) -> HashMap<Uuid, LockedProduct> {
    products.iter().map(|p| (p.id, p.clone())).collect()
}

// Aplica o plano como o serviço faz dentro da transação
fn commit(stock: &mut HashMap<Uuid, LockedProduct>, lines: &[LineRequest]) -> Result<(), AppError> {
    let changes = plan_stock_decrements(stock, lines)?;
    for change in changes {
        if let Some(p) = stock.get_mut(&change.product_id) {
            p.stock = change.new_stock;
        }
    }
    Ok(())
}

#[test]
fn selling_the_last_units_then_one_more_fails_and_keeps_zero() {
    let tenis = product("Tênis Runner", 5, "100.00", "180.00");
    let mut stock = catalog(&[tenis.clone()]);

    commit(&mut stock, &[line(tenis.id, 5)]).unwrap();
    assert_eq!(stock[&tenis.id].stock, 0);

    let err = commit(&mut stock, &[line(tenis.id, 1)]).unwrap_err();
    assert!(matches!(err, AppError::InsufficientStock { available: 0, requested: 1, .. }));
    assert_eq!(stock[&tenis.id].stock, 0);
}

#[test]
fn one_short_item_leaves_every_product_untouched() {
    let bota = product("Bota Couro", 3, "150.00", "299.90");
    let chinelo = product("Chinelo", 1, "10.00", "29.90");
    let mut stock = catalog(&[bota.clone(), chinelo.clone()]);

    let result = commit(&mut stock, &[line(bota.id, 2), line(chinelo.id, 2)]);

    assert!(result.is_err());
    assert_eq!(stock[&bota.id].stock, 3);
    assert_eq!(stock[&chinelo.id].stock, 1);
}

#[test]
fn repeated_lines_of_the_same_product_are_summed() {
    let sandalia = product("Sandália", 3, "40.00", "89.90");
    let stock = catalog(&[sandalia.clone()]);

    let err = plan_stock_decrements(&stock, &[line(sandalia.id, 2), line(sandalia.id, 2)]).unwrap_err();
    assert!(matches!(err, AppError::InsufficientStock { available: 3, requested: 4, .. }));
}

#[test]
fn totals_are_the_sum_of_priced_lines() {
    let bota = product("Bota Couro", 10, "150.00", "299.90");
    let tenis = product("Tênis Runner", 10, "100.00", "180.00");
    let stock = catalog(&[bota.clone(), tenis.clone()]);

    let lines = [
        line(bota.id, 1),
        LineRequest { product_id: tenis.id, quantity: 2, unit_price: Some(dec("170.00")), discount: dec("10.00") },
    ];
    let (priced, totals) = price_sale(&stock, &lines, Decimal::ZERO).unwrap();

    let line_sum: Decimal = priced.iter().map(|l| l.total_price).sum();
    let cost_sum: Decimal = priced.iter().map(|l| l.total_cost).sum();
    assert_eq!(totals.total_price, line_sum);
    assert_eq!(totals.total_price, dec("629.90"));
    assert_eq!(totals.total_cost, cost_sum);
    assert_eq!(totals.total_cost, dec("350.00"));
    assert_eq!(totals.profit, dec("279.90"));
}

#[test]
fn general_discount_is_applied_over_the_subtotal() {
    let tenis = product("Tênis Runner", 10, "100.00", "200.00");
    let stock = catalog(&[tenis.clone()]);

    let (_, totals) = price_sale(&stock, &[line(tenis.id, 1)], dec("10")).unwrap();

    assert_eq!(totals.subtotal, dec("200.00"));
    assert_eq!(totals.discount_value, dec("20.00"));
    assert_eq!(totals.total_price, dec("180.00"));
    assert_eq!(totals.profit, dec("80.00"));
}

#[test]
fn client_totals_must_match_to_the_cent() {
    let tenis = product("Tênis Runner", 10, "100.00", "180.00");
    let stock = catalog(&[tenis.clone()]);
    let (_, totals) = price_sale(&stock, &[line(tenis.id, 1)], Decimal::ZERO).unwrap();

    let honest = ClaimedTotals { total_price: dec("180.00"), total_cost: dec("100.00"), profit: dec("80.00") };
    assert!(verify_client_totals(&totals, &honest).is_ok());

    let tampered = ClaimedTotals { total_price: dec("150.00"), ..honest };
    assert!(matches!(verify_client_totals(&totals, &tampered), Err(AppError::TotalsMismatch(_))));
}

#[test]
fn credit_sales_stay_pending_until_confirmed() {
    let now = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();

    let fiado = payment_terms(PaymentMethod::OnCredit, now);
    assert_eq!(fiado.status, SaleStatus::Pending);
    assert_eq!(fiado.payment_status, PaymentStatus::Pending);
    assert_eq!(fiado.payment_date, None);

    let pix = payment_terms(PaymentMethod::Pix, now);
    assert_eq!(pix.status, SaleStatus::Completed);
    assert_eq!(pix.payment_status, PaymentStatus::Paid);
    assert_eq!(pix.payment_date, Some(now));
}

#[test]
fn manual_adjustment_cannot_push_stock_below_zero() {
    let bota = product("Bota Couro", 2, "150.00", "299.90");

    assert_eq!(apply_delta(&bota, -2).unwrap(), 0);
    assert_eq!(apply_delta(&bota, 5).unwrap(), 7);
    assert!(matches!(apply_delta(&bota, -3), Err(AppError::InsufficientStock { .. })));
    assert!(matches!(apply_delta(&bota, 0), Err(AppError::InvalidInput(_))));
}
