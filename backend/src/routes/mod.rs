//! Route definitions for the Jewelry Ledger API

use axum::{routing::get, Router};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Change notifications (WebSocket)
        .route("/changes", get(handlers::subscribe_changes))
        .nest("/stock", stock_routes())
        .nest("/sales", sales_routes())
        .nest("/purchases", purchase_routes())
        .nest("/leave-amounts", leave_amount_routes())
        .nest("/maintenance", maintenance_routes())
        .nest("/reports", report_routes())
}

/// Stock definition routes
fn stock_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_stock).post(handlers::create_stock))
        .route(
            "/:stock_id",
            get(handlers::get_stock)
                .put(handlers::update_stock)
                .delete(handlers::delete_stock),
        )
}

/// Sales routes
fn sales_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_sales).post(handlers::create_sale))
        .route(
            "/:sale_id",
            get(handlers::get_sale)
                .put(handlers::update_sale)
                .delete(handlers::delete_sale),
        )
}

/// Purchase routes
fn purchase_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_purchases).post(handlers::create_purchase))
        .route(
            "/:purchase_id",
            get(handlers::get_purchase)
                .put(handlers::update_purchase)
                .delete(handlers::delete_purchase),
        )
}

/// Leave-amount routes
fn leave_amount_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_leave_amounts).post(handlers::create_leave_amount),
        )
        .route(
            "/:leave_id",
            get(handlers::get_leave_amount)
                .put(handlers::update_leave_amount)
                .delete(handlers::delete_leave_amount),
        )
}

/// Stock maintenance routes
fn maintenance_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_maintenance).post(handlers::create_maintenance),
        )
        .route(
            "/:maintenance_id",
            get(handlers::get_maintenance)
                .put(handlers::update_maintenance)
                .delete(handlers::delete_maintenance),
        )
}

/// Report routes. `:grouping` is one of monthly, daily, yearly,
/// product-types or totals.
fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/stock/today", get(handlers::get_stock_today))
        .route("/sales/:grouping", get(handlers::get_sales_report))
        .route("/purchases/:grouping", get(handlers::get_purchases_report))
        .route(
            "/leave-amounts/:grouping",
            get(handlers::get_leave_amounts_report),
        )
}
