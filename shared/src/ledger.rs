//! Ledger aggregation for sales, purchases and leave amounts
//!
//! Groupings mirror what the dashboard charts expect. Month and day buckets
//! are deliberately not year-scoped: January of every year lands in "Jan",
//! and the 15th of every month lands in day 15.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

use crate::coerce;
use crate::format::short_month_name;
use crate::models::{LeaveAmountRecord, PurchaseRecord, SaleRecord};
use crate::types::DateRange;

/// Which date of a record drives calendar grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DateField {
    /// `sale_date`, `purchase_date` or `leave_date`
    #[default]
    Transaction,
    /// Calendar date of `created_at`
    Created,
}

/// A transaction-like record that can be aggregated
pub trait LedgerEntry {
    fn date(&self, field: DateField) -> Option<NaiveDate>;
    fn amount(&self) -> Option<Decimal>;
    /// Paid portion, for record types that track it
    fn given_amount(&self) -> Option<Decimal> {
        None
    }
    /// Unpaid portion, for record types that track it
    fn balance_amount(&self) -> Option<Decimal> {
        None
    }
    fn buyer_name(&self) -> &str;
    fn product_type(&self) -> &str;
}

impl LedgerEntry for SaleRecord {
    fn date(&self, field: DateField) -> Option<NaiveDate> {
        match field {
            DateField::Transaction => Some(self.sale_date),
            DateField::Created => Some(self.created_at.date_naive()),
        }
    }

    fn amount(&self) -> Option<Decimal> {
        Some(self.amount)
    }

    fn given_amount(&self) -> Option<Decimal> {
        Some(self.given_amount)
    }

    fn balance_amount(&self) -> Option<Decimal> {
        Some(self.balance_amount)
    }

    fn buyer_name(&self) -> &str {
        &self.buyer_name
    }

    fn product_type(&self) -> &str {
        &self.product_type
    }
}

impl LedgerEntry for PurchaseRecord {
    fn date(&self, field: DateField) -> Option<NaiveDate> {
        match field {
            DateField::Transaction => Some(self.purchase_date),
            DateField::Created => Some(self.created_at.date_naive()),
        }
    }

    fn amount(&self) -> Option<Decimal> {
        Some(self.amount)
    }

    fn buyer_name(&self) -> &str {
        &self.buyer_name
    }

    fn product_type(&self) -> &str {
        &self.product_type
    }
}

impl LedgerEntry for LeaveAmountRecord {
    fn date(&self, field: DateField) -> Option<NaiveDate> {
        match field {
            DateField::Transaction => Some(self.leave_date),
            DateField::Created => Some(self.created_at.date_naive()),
        }
    }

    fn amount(&self) -> Option<Decimal> {
        Some(self.amount)
    }

    fn buyer_name(&self) -> &str {
        &self.buyer_name
    }

    fn product_type(&self) -> &str {
        &self.product_type
    }
}

/// Calendar month bucket, rendered as its short English name
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey(u32);

impl MonthKey {
    /// `month` is 1-based; out-of-range values yield `None`
    pub fn new(month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self(month))
    }

    pub fn of(date: NaiveDate) -> Self {
        Self(date.month())
    }

    pub fn short_name(&self) -> &'static str {
        short_month_name(self.0)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.short_name())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MonthSummary {
    pub revenue: Decimal,
    pub given: Decimal,
    pub balance: Decimal,
    pub count: u64,
    pub unique_customers: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DaySummary {
    pub revenue: Decimal,
    pub given: Decimal,
    pub balance: Decimal,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct YearSummary {
    pub revenue: Decimal,
    pub count: u64,
    pub unique_customers: usize,
}

/// Flat totals for a snapshot, e.g. today's sales card
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LedgerTotals {
    pub revenue: Decimal,
    pub given: Decimal,
    pub balance: Decimal,
    pub count: u64,
}

#[derive(Default)]
struct Bucket<'a> {
    revenue: Decimal,
    given: Decimal,
    balance: Decimal,
    count: u64,
    customers: HashSet<&'a str>,
}

impl<'a> Bucket<'a> {
    fn add<R: LedgerEntry>(&mut self, record: &'a R) {
        self.revenue = self.revenue.saturating_add(coerce::or_zero(record.amount()));
        self.given = self.given.saturating_add(coerce::or_zero(record.given_amount()));
        self.balance = self.balance.saturating_add(coerce::or_zero(record.balance_amount()));
        self.count += 1;
        self.customers.insert(record.buyer_name());
    }
}

fn bucket_by<'a, R, K, F>(records: &'a [R], field: DateField, key: F) -> BTreeMap<K, Bucket<'a>>
where
    R: LedgerEntry,
    K: Ord,
    F: Fn(NaiveDate) -> K,
{
    let mut buckets: BTreeMap<K, Bucket<'a>> = BTreeMap::new();
    for record in records {
        if let Some(date) = record.date(field) {
            buckets.entry(key(date)).or_default().add(record);
        }
    }
    buckets
}

/// Group by short month name, across all years
pub fn by_month<R: LedgerEntry>(records: &[R], field: DateField) -> BTreeMap<MonthKey, MonthSummary> {
    bucket_by(records, field, MonthKey::of)
        .into_iter()
        .map(|(month, b)| {
            (
                month,
                MonthSummary {
                    revenue: b.revenue,
                    given: b.given,
                    balance: b.balance,
                    count: b.count,
                    unique_customers: b.customers.len(),
                },
            )
        })
        .collect()
}

/// Group by day-of-month (1-31), across all months and years
pub fn by_day<R: LedgerEntry>(records: &[R], field: DateField) -> BTreeMap<u32, DaySummary> {
    bucket_by(records, field, |date| date.day())
        .into_iter()
        .map(|(day, b)| {
            (
                day,
                DaySummary {
                    revenue: b.revenue,
                    given: b.given,
                    balance: b.balance,
                    count: b.count,
                },
            )
        })
        .collect()
}

/// Group by calendar year
pub fn by_year<R: LedgerEntry>(records: &[R], field: DateField) -> BTreeMap<i32, YearSummary> {
    bucket_by(records, field, |date| date.year())
        .into_iter()
        .map(|(year, b)| {
            (
                year,
                YearSummary {
                    revenue: b.revenue,
                    count: b.count,
                    unique_customers: b.customers.len(),
                },
            )
        })
        .collect()
}

/// Share of records per product type, as a whole percentage of the record
/// count. Each bucket is rounded on its own, so the values need not sum to 100.
pub fn by_product_type<R: LedgerEntry>(records: &[R]) -> BTreeMap<String, u32> {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for record in records {
        *counts.entry(record.product_type().to_string()).or_default() += 1;
    }

    let total = records.len() as u64;
    counts
        .into_iter()
        .map(|(kind, count)| (kind, rounded_percent(count, total)))
        .collect()
}

/// `round(part / total * 100)` with halves rounded up
fn rounded_percent(part: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    ((part * 200 + total) / (2 * total)) as u32
}

/// Sum every record into one total
pub fn totals<R: LedgerEntry>(records: &[R]) -> LedgerTotals {
    records.iter().fold(LedgerTotals::default(), |mut acc, r| {
        acc.revenue = acc.revenue.saturating_add(coerce::or_zero(r.amount()));
        acc.given = acc.given.saturating_add(coerce::or_zero(r.given_amount()));
        acc.balance = acc.balance.saturating_add(coerce::or_zero(r.balance_amount()));
        acc.count += 1;
        acc
    })
}

/// Records whose date falls inside the inclusive range
pub fn filter_by_range<R: LedgerEntry + Clone>(
    records: &[R],
    range: &DateRange,
    field: DateField,
) -> Vec<R> {
    records
        .iter()
        .filter(|r| r.date(field).is_some_and(|d| range.contains(d)))
        .cloned()
        .collect()
}

/// Records dated in the given calendar year
pub fn filter_by_year<R: LedgerEntry + Clone>(records: &[R], year: i32, field: DateField) -> Vec<R> {
    records
        .iter()
        .filter(|r| r.date(field).is_some_and(|d| d.year() == year))
        .cloned()
        .collect()
}

/// Which aggregation a ledger report runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Grouping {
    Monthly,
    Daily,
    Yearly,
    ProductTypes,
    Totals,
}

impl FromStr for Grouping {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "monthly" => Ok(Grouping::Monthly),
            "daily" => Ok(Grouping::Daily),
            "yearly" => Ok(Grouping::Yearly),
            "product-types" => Ok(Grouping::ProductTypes),
            "totals" => Ok(Grouping::Totals),
            other => Err(format!("Unknown grouping: {}", other)),
        }
    }
}

/// Result of a ledger report; the shape depends on the grouping
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LedgerReport {
    Monthly(BTreeMap<MonthKey, MonthSummary>),
    Daily(BTreeMap<u32, DaySummary>),
    Yearly(BTreeMap<i32, YearSummary>),
    ProductTypes(BTreeMap<String, u32>),
    Totals(LedgerTotals),
}

/// Run one grouping over an already filtered snapshot
pub fn summarize<R: LedgerEntry>(records: &[R], grouping: Grouping, field: DateField) -> LedgerReport {
    match grouping {
        Grouping::Monthly => LedgerReport::Monthly(by_month(records, field)),
        Grouping::Daily => LedgerReport::Daily(by_day(records, field)),
        Grouping::Yearly => LedgerReport::Yearly(by_year(records, field)),
        Grouping::ProductTypes => LedgerReport::ProductTypes(by_product_type(records)),
        Grouping::Totals => LedgerReport::Totals(totals(records)),
    }
}
