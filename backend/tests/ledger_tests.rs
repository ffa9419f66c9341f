//! Ledger aggregation tests
//!
//! Tests for grouping sales, purchases and leave amounts:
//! - Month and day buckets spanning years
//! - Product type shares rounded per bucket
//! - Range and year filters

use chrono::{NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::ledger::{by_day, by_month, by_product_type, by_year, filter_by_range, filter_by_year, totals};
use shared::{DateField, DateRange, LeaveAmountRecord, MonthKey, PurchaseRecord, SaleRecord};
use uuid::Uuid;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn sale(on: &str, kind: &str, buyer: &str, amount: i64, given: i64) -> SaleRecord {
    SaleRecord {
        id: Uuid::new_v4(),
        product_name: "Gold".to_string(),
        product_type: kind.to_string(),
        product_weight_grams: Decimal::from(10),
        quantity: 1,
        buyer_name: buyer.to_string(),
        amount: Decimal::from(amount),
        given_amount: Decimal::from(given),
        balance_amount: Decimal::from(amount - given),
        sale_date: date(on),
        notes: None,
        created_at: Utc.with_ymd_and_hms(2024, 12, 31, 9, 30, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2024, 12, 31, 9, 30, 0).unwrap(),
    }
}

fn purchase(on: &str, kind: &str, amount: i64) -> PurchaseRecord {
    PurchaseRecord {
        id: Uuid::new_v4(),
        product_name: "Silver".to_string(),
        product_type: kind.to_string(),
        product_weight_grams: Decimal::from(50),
        quantity: 2,
        buyer_name: "Wholesaler".to_string(),
        amount: Decimal::from(amount),
        purchase_date: date(on),
        notes: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn leave(on: &str, buyer: &str, amount: i64) -> LeaveAmountRecord {
    LeaveAmountRecord {
        id: Uuid::new_v4(),
        product_name: "Gold".to_string(),
        product_type: "Necklace".to_string(),
        product_weight_grams: Decimal::from(30),
        quantity: 1,
        buyer_name: buyer.to_string(),
        amount: Decimal::from(amount),
        notes: Some("approval".to_string()),
        leave_date: date(on),
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
    fn test_by_month_empty() {
        assert!(by_month::<SaleRecord>(&[], DateField::Transaction).is_empty());
    }

    #[test]
    fn test_by_month_merges_years() {
        let sales = vec![
            sale("2023-01-05", "Ring", "Asha", 100, 100),
            sale("2024-01-20", "Ring", "Ravi", 200, 50),
            sale("2024-03-02", "Chain", "Asha", 300, 0),
        ];

        let months = by_month(&sales, DateField::Transaction);
        let jan = &months[&MonthKey::new(1).unwrap()];

        assert_eq!(months.len(), 2);
        assert_eq!(jan.revenue, Decimal::from(300));
        assert_eq!(jan.given, Decimal::from(150));
        assert_eq!(jan.balance, Decimal::from(150));
        assert_eq!(jan.count, 2);
        assert_eq!(jan.unique_customers, 2);
    }

    #[test]
    fn test_by_month_by_created_date() {
        let sales = vec![sale("2024-01-05", "Ring", "Asha", 100, 100)];
        let months = by_month(&sales, DateField::Created);
        assert!(months.contains_key(&MonthKey::new(12).unwrap()));
    }

    #[test]
    fn test_by_day_collapses_months() {
        let sales = vec![
            sale("2024-01-15", "Ring", "Asha", 100, 0),
            sale("2024-02-15", "Ring", "Asha", 250, 0),
        ];

        let days = by_day(&sales, DateField::Transaction);

        assert_eq!(days.len(), 1);
        assert_eq!(days[&15].revenue, Decimal::from(350));
        assert_eq!(days[&15].count, 2);
    }

    #[test]
    fn test_by_year() {
        let sales = vec![
            sale("2023-06-01", "Ring", "Asha", 100, 0),
            sale("2024-06-01", "Ring", "Asha", 200, 0),
            sale("2024-07-01", "Ring", "Ravi", 300, 0),
        ];

        let years = by_year(&sales, DateField::Transaction);

        assert_eq!(years[&2023].revenue, Decimal::from(100));
        assert_eq!(years[&2024].revenue, Decimal::from(500));
        assert_eq!(years[&2024].unique_customers, 2);
    }

    #[test]
    fn test_product_type_shares() {
        let sales = vec![
            sale("2024-01-01", "Ring", "A", 1, 0),
            sale("2024-01-01", "Ring", "B", 1, 0),
            sale("2024-01-01", "Chain", "C", 1, 0),
            sale("2024-01-01", "Bangle", "D", 1, 0),
        ];

        let shares = by_product_type(&sales);

        assert_eq!(shares["Ring"], 50);
        assert_eq!(shares["Chain"], 25);
        assert_eq!(shares["Bangle"], 25);
    }

    #[test]
    fn test_product_type_shares_round_each_bucket() {
        let sales = vec![
            sale("2024-01-01", "Ring", "A", 1, 0),
            sale("2024-01-01", "Chain", "B", 1, 0),
            sale("2024-01-01", "Bangle", "C", 1, 0),
        ];

        let shares = by_product_type(&sales);

        assert!(shares.values().all(|p| *p == 33));
        assert_eq!(shares.values().sum::<u32>(), 99);
    }

    #[test]
    fn test_product_type_shares_empty() {
        assert!(by_product_type::<SaleRecord>(&[]).is_empty());
    }

    #[test]
    fn test_purchases_have_no_balance() {
        let purchases = vec![purchase("2024-04-01", "Bar", 5000), purchase("2024-04-09", "Bar", 2500)];

        let t = totals(&purchases);

        assert_eq!(t.revenue, Decimal::from(7500));
        assert_eq!(t.given, Decimal::ZERO);
        assert_eq!(t.balance, Decimal::ZERO);
        assert_eq!(t.count, 2);
    }

    #[test]
    fn test_leave_amounts_by_month() {
        let records = vec![
            leave("2024-08-01", "Kavya", 12000),
            leave("2024-08-20", "Kavya", 8000),
        ];

        let months = by_month(&records, DateField::Transaction);
        let aug = &months[&MonthKey::new(8).unwrap()];

        assert_eq!(aug.revenue, Decimal::from(20000));
        assert_eq!(aug.unique_customers, 1);
    }

    #[test]
    fn test_filter_by_range_inclusive() {
        let sales = vec![
            sale("2024-01-01", "Ring", "A", 1, 0),
            sale("2024-01-31", "Ring", "A", 1, 0),
            sale("2024-02-01", "Ring", "A", 1, 0),
        ];

        let range = DateRange::new(date("2024-01-01"), date("2024-01-31"));
        let january = filter_by_range(&sales, &range, DateField::Transaction);

        assert_eq!(january.len(), 2);
    }

    #[test]
    fn test_filter_by_year() {
        let sales = vec![
            sale("2023-12-31", "Ring", "A", 1, 0),
            sale("2024-01-01", "Ring", "A", 1, 0),
        ];

        assert_eq!(filter_by_year(&sales, 2024, DateField::Transaction).len(), 1);
        assert_eq!(filter_by_year(&sales, 2022, DateField::Transaction).len(), 0);
    }

    #[test]
    fn test_month_key_serializes_as_name() {
        let months = by_month(&[sale("2024-03-10", "Ring", "A", 10, 0)], DateField::Transaction);
        let json = serde_json::to_value(&months).unwrap();
        assert_eq!(json["Mar"]["count"], 1);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every share is a whole percentage between 0 and 100
    #[test]
    fn prop_product_type_shares_in_bounds(
        kinds in prop::collection::vec(prop::sample::select(vec!["Ring", "Chain", "Bangle", "Anklet"]), 1..40)
    ) {
        let sales: Vec<SaleRecord> = kinds
            .iter()
            .map(|k| sale("2024-01-01", k, "A", 1, 0))
            .collect();

        let shares = by_product_type(&sales);
        for share in shares.values() {
            prop_assert!(*share <= 100);
        }
        let sum: u32 = shares.values().sum();
        prop_assert!(sum >= 100 - shares.len() as u32 && sum <= 100 + shares.len() as u32);
    }

    /// Month buckets account for every record exactly once
    #[test]
    fn prop_month_counts_sum_to_total(
        days in prop::collection::vec((2020i32..2026, 1u32..13, 1u32..29), 0..50)
    ) {
        let sales: Vec<SaleRecord> = days
            .iter()
            .map(|(y, m, d)| sale(&format!("{:04}-{:02}-{:02}", y, m, d), "Ring", "A", 10, 5))
            .collect();

        let months = by_month(&sales, DateField::Transaction);
        let counted: u64 = months.values().map(|m| m.count).sum();
        prop_assert_eq!(counted, sales.len() as u64);

        let revenue: Decimal = months.values().map(|m| m.revenue).sum();
        prop_assert_eq!(revenue, totals(&sales).revenue);
    }
}
