//! Common types used across the ledger

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Date range for queries, inclusive on both ends
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// A range covering a single calendar day
    pub fn day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Record collections held by the gateway
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Sales,
    Purchases,
    Stock,
    LeaveAmounts,
    StockMaintenance,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::Sales,
        Collection::Purchases,
        Collection::Stock,
        Collection::LeaveAmounts,
        Collection::StockMaintenance,
    ];

    /// Table name in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Sales => "sales",
            Collection::Purchases => "purchases",
            Collection::Stock => "stock",
            Collection::LeaveAmounts => "leave_amounts",
            Collection::StockMaintenance => "stock_maintenance",
        }
    }

    /// Calendar-date column used for `on`/`from`/`to` filters
    pub fn date_column(&self) -> &'static str {
        match self {
            Collection::Sales => "sale_date",
            Collection::Purchases => "purchase_date",
            Collection::Stock => "created_at",
            Collection::LeaveAmounts => "leave_date",
            Collection::StockMaintenance => "start_date",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Collection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Collection::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("Unknown collection: {}", s))
    }
}

/// Kind of change published on the change feed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// Notification that a collection changed. Carries no row data: subscribers
/// re-fetch the full snapshot and recompute.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChangeEvent {
    pub collection: Collection,
    pub kind: ChangeKind,
    pub id: Uuid,
    pub at: DateTime<Utc>,
}

impl ChangeEvent {
    pub fn new(collection: Collection, kind: ChangeKind, id: Uuid) -> Self {
        Self {
            collection,
            kind,
            id,
            at: Utc::now(),
        }
    }
}

/// Sort direction for snapshot queries
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Collection date column, newest first
    #[default]
    DateDesc,
    DateAsc,
    CreatedDesc,
    CreatedAsc,
}

/// Filters accepted by a collection snapshot query
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordQuery {
    /// Exact match on the collection's date column
    pub on: Option<NaiveDate>,
    /// Inclusive lower bound on the date column
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound on the date column
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub order: SortOrder,
}

impl RecordQuery {
    pub fn on(date: NaiveDate) -> Self {
        Self {
            on: Some(date),
            ..Self::default()
        }
    }
}
