//! Reporting handlers: reconciled stock and ledger aggregations

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use shared::ledger::{Grouping, LedgerReport};

use crate::error::AppResult;
use crate::services::reporting::{ReportFilter, ReportingService, StockTodayReport};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct StockTodayQuery {
    pub date: Option<NaiveDate>,
}

fn service(state: &AppState) -> ReportingService {
    ReportingService::new(state.db.clone(), state.changes.clone())
}

/// Stock with the day's sales applied
pub async fn get_stock_today(
    State(state): State<AppState>,
    Query(query): Query<StockTodayQuery>,
) -> AppResult<Json<StockTodayReport>> {
    let report = service(&state).stock_today(query.date).await?;
    Ok(Json(report))
}

/// Sales grouped by month, day, year or product type, or totalled
pub async fn get_sales_report(
    State(state): State<AppState>,
    Path(grouping): Path<Grouping>,
    Query(filter): Query<ReportFilter>,
) -> AppResult<Json<LedgerReport>> {
    let report = service(&state).sales_report(grouping, &filter).await?;
    Ok(Json(report))
}

pub async fn get_purchases_report(
    State(state): State<AppState>,
    Path(grouping): Path<Grouping>,
    Query(filter): Query<ReportFilter>,
) -> AppResult<Json<LedgerReport>> {
    let report = service(&state).purchases_report(grouping, &filter).await?;
    Ok(Json(report))
}

pub async fn get_leave_amounts_report(
    State(state): State<AppState>,
    Path(grouping): Path<Grouping>,
    Query(filter): Query<ReportFilter>,
) -> AppResult<Json<LedgerReport>> {
    let report = service(&state).leave_amounts_report(grouping, &filter).await?;
    Ok(Json(report))
}
