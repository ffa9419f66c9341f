//! Same-day stock reconciliation
//!
//! Stock definitions and sales are correlated by product name and type,
//! compared case-insensitively. There is no identifier join: a sale may be
//! entered before (or without) a matching stock definition, and a typo in
//! either record simply keeps the sale out of every bucket.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{SaleRecord, StockItem};

/// A stock item with today's sales applied. Derived on every fetch, never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockWithRemaining {
    #[serde(flatten)]
    pub item: StockItem,
    pub today_sold_quantity: i64,
    pub today_sold_weight: Decimal,
    /// Never negative; overselling clamps to zero
    pub remaining_quantity: i64,
    /// Never negative; overselling clamps to zero
    pub remaining_weight: Decimal,
}

impl StockWithRemaining {
    /// Whether today's sales exceeded the defined quantity
    pub fn is_oversold(&self) -> bool {
        self.today_sold_quantity > i64::from(self.item.quantity_available)
    }
}

/// Matching key for stock and sales
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProductKey {
    name: String,
    kind: String,
}

impl ProductKey {
    pub fn new(product_name: &str, product_type: &str) -> Self {
        Self {
            name: product_name.to_lowercase(),
            kind: product_type.to_lowercase(),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct SoldTally {
    quantity: i64,
    weight: Decimal,
}

/// Apply a day's sales to the stock definitions.
///
/// Sums saturate instead of overflowing, so absurd imported weights still
/// produce a report.
///
/// `todays_sales` must already be restricted to the target day. The output has
/// one entry per stock item, in input order. Sold weight uses each sale's own
/// recorded per-unit weight.
pub fn reconcile(stock_items: &[StockItem], todays_sales: &[SaleRecord]) -> Vec<StockWithRemaining> {
    let mut tallies: HashMap<ProductKey, SoldTally> = HashMap::new();
    for sale in todays_sales {
        let tally = tallies
            .entry(ProductKey::new(&sale.product_name, &sale.product_type))
            .or_default();
        tally.quantity = tally.quantity.saturating_add(i64::from(sale.quantity));
        tally.weight = tally.weight.saturating_add(sale.weight_sold_grams());
    }

    stock_items
        .iter()
        .map(|item| {
            let tally = tallies
                .get(&ProductKey::new(&item.product_name, &item.product_type))
                .copied()
                .unwrap_or_default();

            let remaining_quantity = i64::from(item.quantity_available)
                .saturating_sub(tally.quantity)
                .max(0);
            let remaining_weight = item
                .total_weight_grams()
                .saturating_sub(tally.weight)
                .max(Decimal::ZERO);

            StockWithRemaining {
                item: item.clone(),
                today_sold_quantity: tally.quantity,
                today_sold_weight: tally.weight,
                remaining_quantity,
                remaining_weight,
            }
        })
        .collect()
}

/// Dashboard totals over a reconciled stock list
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StockTotals {
    pub item_count: usize,
    pub total_quantity: i64,
    pub total_weight: Decimal,
    pub sold_quantity: i64,
    pub sold_weight: Decimal,
    pub remaining_quantity: i64,
    pub remaining_weight: Decimal,
    pub oversold_items: usize,
}

impl StockTotals {
    pub fn from_reconciled(rows: &[StockWithRemaining]) -> Self {
        rows.iter().fold(Self::default(), |mut acc, row| {
            acc.item_count += 1;
            acc.total_quantity = acc
                .total_quantity
                .saturating_add(i64::from(row.item.quantity_available));
            acc.total_weight = acc.total_weight.saturating_add(row.item.total_weight_grams());
            acc.sold_quantity = acc.sold_quantity.saturating_add(row.today_sold_quantity);
            acc.sold_weight = acc.sold_weight.saturating_add(row.today_sold_weight);
            acc.remaining_quantity = acc.remaining_quantity.saturating_add(row.remaining_quantity);
            acc.remaining_weight = acc.remaining_weight.saturating_add(row.remaining_weight);
            if row.is_oversold() {
                acc.oversold_items += 1;
            }
            acc
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn stock(name: &str, kind: &str, weight: i64, qty: i32) -> StockItem {
        StockItem {
            id: Uuid::new_v4(),
            product_name: name.to_string(),
            product_type: kind.to_string(),
            product_weight_grams: Decimal::from(weight),
            quantity_available: qty,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn sale(name: &str, kind: &str, weight: i64, qty: i32) -> SaleRecord {
        SaleRecord {
            id: Uuid::new_v4(),
            product_name: name.to_string(),
            product_type: kind.to_string(),
            product_weight_grams: Decimal::from(weight),
            quantity: qty,
            buyer_name: "Walk-in".to_string(),
            amount: Decimal::from(1000),
            given_amount: Decimal::from(1000),
            balance_amount: Decimal::ZERO,
            sale_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_no_sales_leaves_stock_untouched() {
        let items = vec![stock("Gold Ring", "Ring", 4, 7)];
        let rows = reconcile(&items, &[]);
        assert_eq!(rows[0].today_sold_quantity, 0);
        assert_eq!(rows[0].today_sold_weight, Decimal::ZERO);
        assert_eq!(rows[0].remaining_quantity, 7);
        assert_eq!(rows[0].remaining_weight, Decimal::from(28));
    }

    #[test]
    fn test_case_insensitive_match() {
        let items = vec![stock("Gold Ring", "RING", 5, 10)];
        let sales = vec![sale("gold ring", "ring", 5, 2)];
        let rows = reconcile(&items, &sales);
        assert_eq!(rows[0].today_sold_quantity, 2);
        assert_eq!(rows[0].remaining_quantity, 8);
    }

    #[test]
    fn test_sold_weight_uses_sale_weight() {
        let items = vec![stock("Bangle", "Bangle", 20, 5)];
        let sales = vec![sale("Bangle", "Bangle", 22, 2)];
        let rows = reconcile(&items, &sales);
        assert_eq!(rows[0].today_sold_weight, Decimal::from(44));
        assert_eq!(rows[0].remaining_weight, Decimal::from(56));
    }

    #[test]
    fn test_oversold_clamps_to_zero() {
        let items = vec![stock("Pendant", "Pendant", 3, 5)];
        let sales = vec![sale("Pendant", "Pendant", 3, 8)];
        let rows = reconcile(&items, &sales);
        assert_eq!(rows[0].today_sold_quantity, 8);
        assert_eq!(rows[0].remaining_quantity, 0);
        assert_eq!(rows[0].remaining_weight, Decimal::ZERO);
        assert!(rows[0].is_oversold());
    }

    #[test]
    fn test_name_must_match_exactly_apart_from_case() {
        let items = vec![stock("Gold Chain", "Chain", 10, 3)];
        let sales = vec![sale("Gold Chain ", "Chain", 10, 1), sale("Gold Chain", "Necklace", 10, 1)];
        let rows = reconcile(&items, &sales);
        assert_eq!(rows[0].today_sold_quantity, 0);
    }

    #[test]
    fn test_stock_totals() {
        let items = vec![stock("Gold", "Chain", 10, 20), stock("Silver", "Anklet", 5, 2)];
        let sales = vec![sale("gold", "chain", 10, 5), sale("Silver", "Anklet", 5, 4)];
        let totals = StockTotals::from_reconciled(&reconcile(&items, &sales));
        assert_eq!(totals.item_count, 2);
        assert_eq!(totals.total_quantity, 22);
        assert_eq!(totals.total_weight, Decimal::from(210));
        assert_eq!(totals.sold_quantity, 9);
        assert_eq!(totals.remaining_quantity, 15);
        assert_eq!(totals.remaining_weight, Decimal::from(150));
        assert_eq!(totals.oversold_items, 1);
    }

    #[test]
    fn test_huge_imported_weight_saturates() {
        let item: StockItem = serde_json::from_value(serde_json::json!({
            "id": Uuid::new_v4(),
            "product_name": "Gold",
            "product_type": "Bar",
            "product_weight_grams": "79228162514264337593543950335",
            "quantity_available": 2,
            "created_at": "2024-05-01T09:00:00Z",
            "updated_at": "2024-05-01T09:00:00Z"
        }))
        .unwrap();
        let mut big_sale = sale("gold", "bar", 1, 1);
        big_sale.product_weight_grams = Decimal::MAX;
        let sales = vec![big_sale.clone(), big_sale];

        let rows = reconcile(&[item.clone(), item], &sales);

        assert_eq!(rows[0].today_sold_weight, Decimal::MAX);
        assert_eq!(rows[0].remaining_weight, Decimal::ZERO);
        let totals = StockTotals::from_reconciled(&rows);
        assert_eq!(totals.total_weight, Decimal::MAX);
        assert_eq!(totals.sold_weight, Decimal::MAX);
    }

    #[test]
    fn test_reconciled_row_serializes_flat() {
        let rows = reconcile(&[stock("Gold", "Chain", 10, 1)], &[]);
        let json = serde_json::to_value(&rows[0]).unwrap();
        assert_eq!(json["product_name"], "Gold");
        assert_eq!(json["remaining_quantity"], 1);
    }
}
