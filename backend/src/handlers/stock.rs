//! Stock definition HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use shared::{CreateStockInput, RecordQuery, UpdateStockInput};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::StockService;
use crate::AppState;

fn service(state: &AppState) -> StockService {
    StockService::new(state.db.clone(), state.changes.clone())
}

/// List stock definitions
pub async fn list_stock(
    State(state): State<AppState>,
    Query(query): Query<RecordQuery>,
) -> AppResult<impl IntoResponse> {
    let stock = service(&state).list(&query).await?;
    Ok(Json(serde_json::json!({ "stock": stock })))
}

/// Get a single stock item
pub async fn get_stock(
    State(state): State<AppState>,
    Path(stock_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let item = service(&state).get(stock_id).await?;
    Ok(Json(item))
}

/// Define a new stock item
pub async fn create_stock(
    State(state): State<AppState>,
    Json(input): Json<CreateStockInput>,
) -> AppResult<impl IntoResponse> {
    let item = service(&state).create(input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Update a stock item
pub async fn update_stock(
    State(state): State<AppState>,
    Path(stock_id): Path<Uuid>,
    Json(input): Json<UpdateStockInput>,
) -> AppResult<impl IntoResponse> {
    let item = service(&state).update(stock_id, input).await?;
    Ok(Json(item))
}

/// Delete a stock item
pub async fn delete_stock(
    State(state): State<AppState>,
    Path(stock_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    service(&state).delete(stock_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
