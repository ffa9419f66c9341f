//! WebAssembly module for the Jewelry Ledger dashboard
//!
//! Runs the same reconciliation and ledger aggregation as the server, so the
//! dashboard can recompute from the snapshots it already holds whenever a
//! change notification arrives:
//! - Today's stock with sales applied
//! - Monthly, daily, yearly and product-type reports
//! - Sale balances and rupee formatting

use serde::{de::DeserializeOwned, Serialize};
use shared::coerce;
use shared::format;
use shared::ledger::{self, Grouping};
use shared::{
    reconcile, Collection, DateField, DateRange, LeaveAmountRecord, PurchaseRecord, SaleRecord,
    StockItem, StockTotals, StockWithRemaining,
};
use wasm_bindgen::prelude::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::debug_1(&JsValue::from_str(concat!(
        "jewelry-ledger-wasm ",
        env!("CARGO_PKG_VERSION")
    )));
}

fn parse<T: DeserializeOwned>(json: &str, what: &str) -> Result<T, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid {} JSON: {}", what, e))
}

fn encode<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Failed to encode result: {}", e))
}

fn date_field(name: &str) -> DateField {
    match name {
        "created" | "created_at" => DateField::Created,
        _ => DateField::Transaction,
    }
}

/// Ledger records of one collection, as sent by the dashboard
enum LedgerRecords {
    Sales(Vec<SaleRecord>),
    Purchases(Vec<PurchaseRecord>),
    LeaveAmounts(Vec<LeaveAmountRecord>),
}

impl LedgerRecords {
    fn parse(collection: &str, records_json: &str) -> Result<Self, String> {
        match collection.parse::<Collection>()? {
            Collection::Sales => Ok(Self::Sales(parse(records_json, "sales")?)),
            Collection::Purchases => Ok(Self::Purchases(parse(records_json, "purchases")?)),
            Collection::LeaveAmounts => {
                Ok(Self::LeaveAmounts(parse(records_json, "leave amounts")?))
            }
            other => Err(format!("{} has no ledger reports", other)),
        }
    }

    fn summarize(&self, grouping: Grouping, field: DateField) -> Result<String, String> {
        match self {
            Self::Sales(records) => encode(&ledger::summarize(records, grouping, field)),
            Self::Purchases(records) => encode(&ledger::summarize(records, grouping, field)),
            Self::LeaveAmounts(records) => encode(&ledger::summarize(records, grouping, field)),
        }
    }
}

#[derive(Serialize)]
struct StockToday {
    items: Vec<StockWithRemaining>,
    totals: StockTotals,
}

fn reconcile_json(stock_json: &str, sales_json: &str, on: &str) -> Result<String, String> {
    let stock: Vec<StockItem> = parse(stock_json, "stock")?;
    let mut sales: Vec<SaleRecord> = parse(sales_json, "sales")?;

    if !on.is_empty() {
        let day = format::parse_date(on).ok_or_else(|| format!("Invalid date: {}", on))?;
        sales = ledger::filter_by_range(&sales, &DateRange::day(day), DateField::Transaction);
    }

    let items = reconcile(&stock, &sales);
    let totals = StockTotals::from_reconciled(&items);
    encode(&StockToday { items, totals })
}

fn ledger_report_json(
    collection: &str,
    records_json: &str,
    grouping: &str,
    field: &str,
) -> Result<String, String> {
    let grouping = grouping.parse::<Grouping>()?;
    LedgerRecords::parse(collection, records_json)?.summarize(grouping, date_field(field))
}

/// Apply sales to stock definitions. Pass `on` as `YYYY-MM-DD` to keep only
/// sales of that day, or an empty string when the sales are already filtered.
#[wasm_bindgen]
pub fn reconcile_stock(stock_json: &str, sales_json: &str, on: &str) -> Result<String, JsValue> {
    reconcile_json(stock_json, sales_json, on).map_err(|e| JsValue::from_str(&e))
}

/// Aggregate `sales`, `purchases` or `leave_amounts` records. `grouping` is
/// one of monthly, daily, yearly, product-types or totals; `date_field` is
/// `transaction` or `created`.
#[wasm_bindgen]
pub fn ledger_report(
    collection: &str,
    records_json: &str,
    grouping: &str,
    date_field: &str,
) -> Result<String, JsValue> {
    ledger_report_json(collection, records_json, grouping, date_field)
        .map_err(|e| JsValue::from_str(&e))
}

/// Unpaid portion of a sale, for live display while the form is edited.
/// Unparseable input counts as zero.
#[wasm_bindgen]
pub fn compute_balance(amount: &str, given_amount: &str) -> String {
    SaleRecord::balance_for(
        coerce::decimal_from_str(amount),
        coerce::decimal_from_str(given_amount),
    )
    .to_string()
}

#[wasm_bindgen]
pub fn format_rupees(amount: &str) -> String {
    format::format_rupees(coerce::decimal_from_str(amount))
}

#[wasm_bindgen]
pub fn format_grams(grams: &str) -> String {
    format::format_grams(coerce::decimal_from_str(grams))
}

/// Today's date in the browser's local time zone, as `YYYY-MM-DD`
#[wasm_bindgen]
pub fn local_today() -> String {
    let now = js_sys::Date::new_0();
    format!(
        "{:04}-{:02}-{:02}",
        now.get_full_year(),
        now.get_month() + 1,
        now.get_date()
    )
}

/// Whether a stored balance still matches amount minus given
#[wasm_bindgen]
pub fn is_balance_consistent(amount: &str, given_amount: &str, balance_amount: &str) -> bool {
    let expected = SaleRecord::balance_for(
        coerce::decimal_from_str(amount),
        coerce::decimal_from_str(given_amount),
    );
    coerce::decimal_from_str(balance_amount) == expected
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_reconcile_error_reaches_js() {
        assert!(reconcile_stock("not json", "[]", "").is_err());
    }

    #[wasm_bindgen_test]
    fn test_local_today_shape() {
        assert_eq!(local_today().len(), 10);
    }
}
