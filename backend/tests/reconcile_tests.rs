//! Stock reconciliation tests
//!
//! Tests for applying a day's sales to stock definitions:
//! - Matching by product name and type, ignoring case
//! - Remaining quantity and weight never going negative
//! - Output order following the stock snapshot

use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{reconcile, SaleRecord, StockItem, StockTotals};
use std::str::FromStr;
use uuid::Uuid;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn stock(name: &str, kind: &str, weight: &str, quantity: i32) -> StockItem {
    StockItem {
        id: Uuid::new_v4(),
        product_name: name.to_string(),
        product_type: kind.to_string(),
        product_weight_grams: dec(weight),
        quantity_available: quantity,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn sale(name: &str, kind: &str, weight: &str, quantity: i32) -> SaleRecord {
    let amount = dec("1000");
    SaleRecord {
        id: Uuid::new_v4(),
        product_name: name.to_string(),
        product_type: kind.to_string(),
        product_weight_grams: dec(weight),
        quantity,
        buyer_name: "Lakshmi".to_string(),
        amount,
        given_amount: amount,
        balance_amount: Decimal::ZERO,
        sale_date: NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
        notes: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_gold_chain_day() {
        let items = vec![stock("Gold", "Chain", "10", 20)];
        let sales = vec![sale("Gold", "Chain", "10", 3), sale("Gold", "Chain", "10", 2)];

        let rows = reconcile(&items, &sales);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].today_sold_quantity, 5);
        assert_eq!(rows[0].today_sold_weight, dec("50"));
        assert_eq!(rows[0].remaining_quantity, 15);
        assert_eq!(rows[0].remaining_weight, dec("150"));
    }

    #[test]
    fn test_no_sales_leaves_stock_untouched() {
        let items = vec![stock("Silver", "Anklet", "25.5", 4)];
        let rows = reconcile(&items, &[]);

        assert_eq!(rows[0].today_sold_quantity, 0);
        assert_eq!(rows[0].today_sold_weight, Decimal::ZERO);
        assert_eq!(rows[0].remaining_quantity, 4);
        assert_eq!(rows[0].remaining_weight, dec("102.0"));
    }

    #[test]
    fn test_oversold_clamps_to_zero() {
        let items = vec![stock("Gold", "Ring", "5", 5)];
        let sales = vec![sale("Gold", "Ring", "5", 8)];

        let rows = reconcile(&items, &sales);

        assert_eq!(rows[0].today_sold_quantity, 8);
        assert_eq!(rows[0].remaining_quantity, 0);
        assert_eq!(rows[0].remaining_weight, Decimal::ZERO);
        assert!(rows[0].is_oversold());
    }

    #[test]
    fn test_matching_ignores_case() {
        let items = vec![stock("gold ring", "ring", "4", 10)];
        let sales = vec![sale("Gold Ring", "RING", "4", 2)];

        let rows = reconcile(&items, &sales);

        assert_eq!(rows[0].today_sold_quantity, 2);
        assert_eq!(rows[0].remaining_quantity, 8);
    }

    #[test]
    fn test_unmatched_sale_is_ignored() {
        let items = vec![stock("Gold", "Chain", "10", 20)];
        let sales = vec![sale("Platinum", "Chain", "10", 3)];

        let rows = reconcile(&items, &sales);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].today_sold_quantity, 0);
        assert_eq!(rows[0].remaining_quantity, 20);
    }

    #[test]
    fn test_same_name_different_type_is_separate() {
        let items = vec![stock("Gold", "Chain", "10", 20), stock("Gold", "Ring", "3", 6)];
        let sales = vec![sale("Gold", "Ring", "3", 1)];

        let rows = reconcile(&items, &sales);

        assert_eq!(rows[0].today_sold_quantity, 0);
        assert_eq!(rows[1].today_sold_quantity, 1);
        assert_eq!(rows[1].remaining_weight, dec("15"));
    }

    #[test]
    fn test_sold_weight_uses_sale_weight() {
        let items = vec![stock("Gold", "Bangle", "20", 10)];
        let sales = vec![sale("Gold", "Bangle", "22.5", 2)];

        let rows = reconcile(&items, &sales);

        assert_eq!(rows[0].today_sold_weight, dec("45.0"));
        assert_eq!(rows[0].remaining_weight, dec("155.0"));
    }

    #[test]
    fn test_totals_over_reconciled_rows() {
        let items = vec![stock("Gold", "Chain", "10", 20), stock("Gold", "Ring", "5", 5)];
        let sales = vec![sale("Gold", "Chain", "10", 5), sale("Gold", "Ring", "5", 8)];

        let totals = StockTotals::from_reconciled(&reconcile(&items, &sales));

        assert_eq!(totals.item_count, 2);
        assert_eq!(totals.total_quantity, 25);
        assert_eq!(totals.sold_quantity, 13);
        assert_eq!(totals.remaining_quantity, 15);
        assert_eq!(totals.remaining_weight, dec("150"));
        assert_eq!(totals.oversold_items, 1);
    }

    #[test]
    fn test_reconciled_row_serializes_flat() {
        let rows = reconcile(&[stock("Gold", "Chain", "10", 20)], &[]);
        let json = serde_json::to_value(&rows[0]).unwrap();

        assert_eq!(json["product_name"], "Gold");
        assert_eq!(json["quantity_available"], 20);
        assert_eq!(json["remaining_quantity"], 20);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

fn product_strategy() -> impl Strategy<Value = (String, String)> {
    (
        prop::sample::select(vec!["Gold", "Silver", "Platinum"]),
        prop::sample::select(vec!["Chain", "Ring", "Bangle"]),
    )
        .prop_map(|(n, t)| (n.to_string(), t.to_string()))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Remaining quantity and weight are never negative
    #[test]
    fn prop_remaining_never_negative(
        stock_defs in prop::collection::vec((product_strategy(), 0i32..50, 1u32..100), 0..8),
        sale_defs in prop::collection::vec((product_strategy(), 0i32..30, 1u32..100), 0..20),
    ) {
        let items: Vec<StockItem> = stock_defs
            .iter()
            .map(|((n, t), q, w)| stock(n, t, &w.to_string(), *q))
            .collect();
        let sales: Vec<SaleRecord> = sale_defs
            .iter()
            .map(|((n, t), q, w)| sale(n, t, &w.to_string(), *q))
            .collect();

        for row in reconcile(&items, &sales) {
            prop_assert!(row.remaining_quantity >= 0);
            prop_assert!(row.remaining_weight >= Decimal::ZERO);
        }
    }

    /// One output row per stock item, in input order
    #[test]
    fn prop_output_follows_stock_order(
        stock_defs in prop::collection::vec((product_strategy(), 0i32..50), 0..10),
        sale_defs in prop::collection::vec((product_strategy(), 0i32..30), 0..10),
    ) {
        let items: Vec<StockItem> = stock_defs
            .iter()
            .map(|((n, t), q)| stock(n, t, "1", *q))
            .collect();
        let sales: Vec<SaleRecord> = sale_defs
            .iter()
            .map(|((n, t), q)| sale(n, t, "1", *q))
            .collect();

        let rows = reconcile(&items, &sales);
        prop_assert_eq!(rows.len(), items.len());
        for (row, item) in rows.iter().zip(items.iter()) {
            prop_assert_eq!(row.item.id, item.id);
        }
    }

    /// Without overselling, sold plus remaining equals what was defined
    #[test]
    fn prop_quantity_is_conserved(available in 0i32..100, sold in 0i32..100) {
        prop_assume!(sold <= available);
        let rows = reconcile(&[stock("Gold", "Ring", "2", available)], &[sale("gold", "ring", "2", sold)]);
        prop_assert_eq!(rows[0].today_sold_quantity + rows[0].remaining_quantity, i64::from(available));
    }
}
