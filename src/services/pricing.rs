// src/services/pricing.rs
//
// Regras puras da venda: reserva de estoque, cálculo dos totais e
// condição de pagamento. Nada aqui toca o banco.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        product::LockedProduct,
        sale::{ClaimedTotals, NewSaleItem, PaymentMethod, PaymentStatus, SaleStatus},
    },
};

/// Item pedido pelo cliente, antes de precificar.
#[derive(Debug, Clone)]
pub struct LineRequest {
    pub product_id: Uuid,
    pub quantity: i32,
    // None = usa o preço de venda atual do produto
    pub unit_price: Option<Decimal>,
    pub discount: Decimal,
}

impl From<&NewSaleItem> for LineRequest {
    fn from(item: &NewSaleItem) -> Self {
        Self {
            product_id: item.product_id,
            quantity: item.quantity,
            unit_price: item.unit_price,
            discount: item.discount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockChange {
    pub product_id: Uuid,
    pub product_name: String,
    pub previous: i32,
    pub requested: i32,
    pub new_stock: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PricedLine {
    pub product_id: Uuid,
    pub product_name: String,
    pub supplier_id: Uuid,
    pub supplier_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub discount: Decimal,
    pub total_price: Decimal,
    pub unit_cost: Decimal,
    pub total_cost: Decimal,
    pub profit: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaleTotals {
    pub subtotal: Decimal,
    pub discount_value: Decimal,
    pub total_price: Decimal,
    pub total_cost: Decimal,
    pub profit: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentTerms {
    pub status: SaleStatus,
    pub payment_status: PaymentStatus,
    pub payment_date: Option<DateTime<Utc>>,
}

pub(crate) fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Verifica o estoque de TODOS os itens antes de qualquer escrita.
/// Quantidades do mesmo produto em linhas diferentes são somadas.
pub fn plan_stock_decrements(
    products: &HashMap<Uuid, LockedProduct>,
    lines: &[LineRequest],
) -> Result<Vec<StockChange>, AppError> {
    if lines.is_empty() {
        return Err(AppError::InvalidInput("A venda precisa de ao menos um item.".into()));
    }

    // BTreeMap: ordem estável por id (mesma ordem dos locks)
    let mut requested: BTreeMap<Uuid, i32> = BTreeMap::new();
    for line in lines {
        if line.quantity <= 0 {
            return Err(AppError::InvalidInput(format!(
                "Quantidade inválida para o produto {}.",
                line.product_id
            )));
        }
        let total = requested.entry(line.product_id).or_insert(0);
        *total = total
            .checked_add(line.quantity)
            .ok_or_else(|| AppError::InvalidInput("Quantidade total excessiva.".into()))?;
    }

    let mut changes = Vec::with_capacity(requested.len());
    for (product_id, quantity) in requested {
        let product = products
            .get(&product_id)
            .ok_or_else(|| AppError::ResourceNotFound(format!("Produto {}", product_id)))?;

        if product.stock < quantity {
            return Err(AppError::InsufficientStock {
                product: product.name.clone(),
                available: product.stock,
                requested: quantity,
            });
        }

        changes.push(StockChange {
            product_id,
            product_name: product.name.clone(),
            previous: product.stock,
            requested: quantity,
            new_stock: product.stock - quantity,
        });
    }

    Ok(changes)
}

/// Precifica uma linha com o custo atual do produto.
pub fn price_line(product: &LockedProduct, line: &LineRequest) -> Result<PricedLine, AppError> {
    let unit_price = line.unit_price.unwrap_or(product.sale_price);
    if unit_price.is_sign_negative() || line.discount.is_sign_negative() {
        return Err(AppError::InvalidInput(format!(
            "Preço ou desconto negativo no item '{}'.",
            product.name
        )));
    }

    let quantity = Decimal::from(line.quantity);
    let gross = quantity * unit_price;
    if line.discount > gross {
        return Err(AppError::InvalidInput(format!(
            "Desconto maior que o valor do item '{}'.",
            product.name
        )));
    }

    let total_price = round_money(gross - line.discount);
    let unit_cost = product.purchase_price;
    let total_cost = round_money(quantity * unit_cost);

    Ok(PricedLine {
        product_id: product.id,
        product_name: product.name.clone(),
        supplier_id: product.supplier_id,
        supplier_name: product.supplier_name.clone(),
        quantity: line.quantity,
        unit_price,
        discount: line.discount,
        total_price,
        unit_cost,
        total_cost,
        profit: total_price - total_cost,
    })
}

/// Totais da venda a partir das linhas e do desconto geral (%).
pub fn sale_totals(lines: &[PricedLine], discount_percent: Decimal) -> Result<SaleTotals, AppError> {
    if discount_percent.is_sign_negative() || discount_percent > Decimal::ONE_HUNDRED {
        return Err(AppError::InvalidInput(
            "O desconto geral deve estar entre 0 e 100%.".into(),
        ));
    }

    let subtotal: Decimal = lines.iter().map(|l| l.total_price).sum();
    let total_cost: Decimal = lines.iter().map(|l| l.total_cost).sum();
    let discount_value = round_money(subtotal * discount_percent / Decimal::ONE_HUNDRED);
    let total_price = subtotal - discount_value;

    Ok(SaleTotals {
        subtotal,
        discount_value,
        total_price,
        total_cost,
        profit: total_price - total_cost,
    })
}

/// Precifica todas as linhas, na ordem recebida.
pub fn price_sale(
    products: &HashMap<Uuid, LockedProduct>,
    lines: &[LineRequest],
    discount_percent: Decimal,
) -> Result<(Vec<PricedLine>, SaleTotals), AppError> {
    let priced = lines
        .iter()
        .map(|line| {
            let product = products
                .get(&line.product_id)
                .ok_or_else(|| AppError::ResourceNotFound(format!("Produto {}", line.product_id)))?;
            price_line(product, line)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let totals = sale_totals(&priced, discount_percent)?;
    Ok((priced, totals))
}

/// Os totais do cliente só são aceitos se baterem com o recálculo (ao centavo).
pub fn verify_client_totals(computed: &SaleTotals, claimed: &ClaimedTotals) -> Result<(), AppError> {
    let checks = [
        ("total", computed.total_price, claimed.total_price),
        ("custo", computed.total_cost, claimed.total_cost),
        ("lucro", computed.profit, claimed.profit),
    ];

    for (field, ours, theirs) in checks {
        if round_money(ours) != round_money(theirs) {
            return Err(AppError::TotalsMismatch(format!(
                "{} informado ({}) difere do calculado ({}).",
                field, theirs, ours
            )));
        }
    }
    Ok(())
}

/// Fiado fica pendente e sem data de pagamento; o resto é pago na hora.
pub fn payment_terms(method: PaymentMethod, now: DateTime<Utc>) -> PaymentTerms {
    match method {
        PaymentMethod::OnCredit => PaymentTerms {
            status: SaleStatus::Pending,
            payment_status: PaymentStatus::Pending,
            payment_date: None,
        },
        _ => PaymentTerms {
            status: SaleStatus::Completed,
            payment_status: PaymentStatus::Paid,
            payment_date: Some(now),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn product(name: &str, stock: i32, cost: &str, price: &str) -> LockedProduct {
        LockedProduct {
            id: Uuid::new_v4(),
            name: name.into(),
            supplier_id: Uuid::new_v4(),
            supplier_name: "Franca Calçados".into(),
            purchase_price: dec(cost),
            sale_price: dec(price),
            stock,
        }
    }

    fn line(product_id: Uuid, quantity: i32) -> LineRequest {
        LineRequest { product_id, quantity, unit_price: None, discount: Decimal::ZERO }
    }

    #[test]
    fn repeated_products_are_summed_before_checking() {
        let p = product("Bota Couro", 3, "100", "200");
        let id = p.id;
        let products = HashMap::from([(id, p)]);

        let err = plan_stock_decrements(&products, &[line(id, 2), line(id, 2)]).unwrap_err();
        assert!(matches!(err, AppError::InsufficientStock { available: 3, requested: 4, .. }));
    }

    #[test]
    fn unknown_product_is_not_found() {
        let products = HashMap::new();
        let err = plan_stock_decrements(&products, &[line(Uuid::new_v4(), 1)]).unwrap_err();
        assert!(matches!(err, AppError::ResourceNotFound(_)));
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let p = product("Chinelo", 3, "10", "20");
        let id = p.id;
        let products = HashMap::from([(id, p)]);
        assert!(matches!(
            plan_stock_decrements(&products, &[line(id, 0)]),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn line_uses_product_sale_price_when_omitted() {
        let p = product("Sandália", 5, "40.00", "89.90");
        let priced = price_line(&p, &line(p.id, 2)).unwrap();
        assert_eq!(priced.unit_price, dec("89.90"));
        assert_eq!(priced.total_price, dec("179.80"));
        assert_eq!(priced.total_cost, dec("80.00"));
        assert_eq!(priced.profit, dec("99.80"));
    }

    #[test]
    fn discount_larger_than_line_is_rejected() {
        let p = product("Sandália", 5, "40", "50");
        let mut req = line(p.id, 1);
        req.discount = dec("60");
        assert!(matches!(price_line(&p, &req), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn sale_discount_percent_applies_to_subtotal() {
        let a = product("Tênis", 5, "100", "200");
        let b = product("Meia", 5, "5", "25");
        let lines = [line(a.id, 1), line(b.id, 2)];
        let products = HashMap::from([(a.id, a), (b.id, b)]);

        let (_, totals) = price_sale(&products, &lines, dec("10")).unwrap();
        assert_eq!(totals.subtotal, dec("250"));
        assert_eq!(totals.discount_value, dec("25.00"));
        assert_eq!(totals.total_price, dec("225.00"));
        assert_eq!(totals.total_cost, dec("110"));
        assert_eq!(totals.profit, dec("115.00"));
    }

    #[test]
    fn discount_percent_out_of_range_is_rejected() {
        assert!(sale_totals(&[], dec("101")).is_err());
        assert!(sale_totals(&[], dec("-1")).is_err());
    }

    #[test]
    fn mismatching_client_totals_are_rejected() {
        let computed = SaleTotals {
            subtotal: dec("100"),
            discount_value: Decimal::ZERO,
            total_price: dec("100"),
            total_cost: dec("60"),
            profit: dec("40"),
        };
        let honest = ClaimedTotals { total_price: dec("100.00"), total_cost: dec("60"), profit: dec("40") };
        assert!(verify_client_totals(&computed, &honest).is_ok());

        let inflated = ClaimedTotals { profit: dec("55"), ..honest };
        assert!(matches!(
            verify_client_totals(&computed, &inflated),
            Err(AppError::TotalsMismatch(_))
        ));
    }

    #[test]
    fn on_credit_sales_stay_pending_without_payment_date() {
        let now = Utc::now();
        let terms = payment_terms(PaymentMethod::OnCredit, now);
        assert_eq!(terms.payment_status, PaymentStatus::Pending);
        assert_eq!(terms.status, SaleStatus::Pending);
        assert!(terms.payment_date.is_none());

        let terms = payment_terms(PaymentMethod::Pix, now);
        assert_eq!(terms.payment_status, PaymentStatus::Paid);
        assert_eq!(terms.payment_date, Some(now));
    }
}
