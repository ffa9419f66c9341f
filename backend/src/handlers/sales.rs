//! Sales HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use shared::{CreateSaleInput, RecordQuery, UpdateSaleInput};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::SaleService;
use crate::AppState;

fn service(state: &AppState) -> SaleService {
    SaleService::new(state.db.clone(), state.changes.clone())
}

/// List sales, filtered by sale date
pub async fn list_sales(
    State(state): State<AppState>,
    Query(query): Query<RecordQuery>,
) -> AppResult<impl IntoResponse> {
    let sales = service(&state).list(&query).await?;
    Ok(Json(serde_json::json!({ "sales": sales })))
}

pub async fn get_sale(
    State(state): State<AppState>,
    Path(sale_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let sale = service(&state).get(sale_id).await?;
    Ok(Json(sale))
}

/// Record a sale; `balance_amount` in the response is computed server-side
pub async fn create_sale(
    State(state): State<AppState>,
    Json(input): Json<CreateSaleInput>,
) -> AppResult<impl IntoResponse> {
    let sale = service(&state).create(input).await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

pub async fn update_sale(
    State(state): State<AppState>,
    Path(sale_id): Path<Uuid>,
    Json(input): Json<UpdateSaleInput>,
) -> AppResult<impl IntoResponse> {
    let sale = service(&state).update(sale_id, input).await?;
    Ok(Json(sale))
}

pub async fn delete_sale(
    State(state): State<AppState>,
    Path(sale_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    service(&state).delete(sale_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
