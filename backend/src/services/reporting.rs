//! Reporting service
//!
//! Every report fetches fresh snapshots through the record services and runs
//! the pure aggregations from `shared` over them. Nothing is cached.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shared::ledger::{self, summarize, Grouping, LedgerReport};
use shared::{
    reconcile, DateField, DateRange, LedgerEntry, RecordQuery, SortOrder, StockTotals,
    StockWithRemaining,
};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::services::changes::ChangeFeed;
use crate::services::{LeaveAmountService, PurchaseService, SaleService, StockService};

/// Query-string filters for ledger reports
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportFilter {
    pub on: Option<NaiveDate>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub year: Option<i32>,
    #[serde(default)]
    pub date_field: DateField,
}

impl ReportFilter {
    /// The part of the filter the database can apply. Only transaction
    /// dates live in the indexed date column.
    pub fn snapshot_query(&self) -> RecordQuery {
        match self.date_field {
            DateField::Transaction => RecordQuery {
                on: self.on,
                from: self.from,
                to: self.to,
                order: SortOrder::DateAsc,
            },
            DateField::Created => RecordQuery {
                order: SortOrder::CreatedAsc,
                ..RecordQuery::default()
            },
        }
    }

    /// Apply every filter in memory. Repeating what the database already
    /// narrowed is harmless.
    pub fn apply<R: LedgerEntry + Clone>(&self, records: Vec<R>) -> AppResult<Vec<R>> {
        let field = self.date_field;
        let mut records = records;

        if let Some(day) = self.on {
            records = ledger::filter_by_range(&records, &DateRange::day(day), field);
        }

        match (self.from, self.to) {
            (Some(from), Some(to)) if from > to => {
                return Err(AppError::validation("from", "Start date must not be after end date"));
            }
            (None, None) => {}
            (from, to) => {
                let range = DateRange::new(
                    from.unwrap_or(NaiveDate::MIN),
                    to.unwrap_or(NaiveDate::MAX),
                );
                records = ledger::filter_by_range(&records, &range, field);
            }
        }

        if let Some(year) = self.year {
            records = ledger::filter_by_year(&records, year, field);
        }

        Ok(records)
    }
}

/// Today's stock view: every stock item with the day's sales applied
#[derive(Debug, Clone, Serialize)]
pub struct StockTodayReport {
    pub date: NaiveDate,
    pub items: Vec<StockWithRemaining>,
    pub totals: StockTotals,
}

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    stock: StockService,
    sales: SaleService,
    purchases: PurchaseService,
    leave_amounts: LeaveAmountService,
}

impl ReportingService {
    pub fn new(db: PgPool, changes: ChangeFeed) -> Self {
        Self {
            stock: StockService::new(db.clone(), changes.clone()),
            sales: SaleService::new(db.clone(), changes.clone()),
            purchases: PurchaseService::new(db.clone(), changes.clone()),
            leave_amounts: LeaveAmountService::new(db, changes),
        }
    }

    /// Reconcile the stock snapshot against sales dated `date` (default today)
    pub async fn stock_today(&self, date: Option<NaiveDate>) -> AppResult<StockTodayReport> {
        let date = date.unwrap_or_else(|| Utc::now().date_naive());

        let stock = self
            .stock
            .list(&RecordQuery {
                order: SortOrder::CreatedDesc,
                ..RecordQuery::default()
            })
            .await?;
        let todays_sales = self.sales.list_for_day(date).await?;

        let items = reconcile(&stock, &todays_sales);
        let totals = StockTotals::from_reconciled(&items);

        tracing::debug!(
            %date,
            stock_items = stock.len(),
            sales = todays_sales.len(),
            oversold = totals.oversold_items,
            "Reconciled stock"
        );

        Ok(StockTodayReport { date, items, totals })
    }

    pub async fn sales_report(&self, grouping: Grouping, filter: &ReportFilter) -> AppResult<LedgerReport> {
        let records = self.sales.list(&filter.snapshot_query()).await?;
        let records = filter.apply(records)?;
        Ok(summarize(&records, grouping, filter.date_field))
    }

    pub async fn purchases_report(
        &self,
        grouping: Grouping,
        filter: &ReportFilter,
    ) -> AppResult<LedgerReport> {
        let records = self.purchases.list(&filter.snapshot_query()).await?;
        let records = filter.apply(records)?;
        Ok(summarize(&records, grouping, filter.date_field))
    }

    pub async fn leave_amounts_report(
        &self,
        grouping: Grouping,
        filter: &ReportFilter,
    ) -> AppResult<LedgerReport> {
        let records = self.leave_amounts.list(&filter.snapshot_query()).await?;
        let records = filter.apply(records)?;
        Ok(summarize(&records, grouping, filter.date_field))
    }
}
