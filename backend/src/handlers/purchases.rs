//! Purchase HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use shared::{CreatePurchaseInput, RecordQuery, UpdatePurchaseInput};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::PurchaseService;
use crate::AppState;

fn service(state: &AppState) -> PurchaseService {
    PurchaseService::new(state.db.clone(), state.changes.clone())
}

pub async fn list_purchases(
    State(state): State<AppState>,
    Query(query): Query<RecordQuery>,
) -> AppResult<impl IntoResponse> {
    let purchases = service(&state).list(&query).await?;
    Ok(Json(serde_json::json!({ "purchases": purchases })))
}

pub async fn get_purchase(
    State(state): State<AppState>,
    Path(purchase_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let purchase = service(&state).get(purchase_id).await?;
    Ok(Json(purchase))
}

pub async fn create_purchase(
    State(state): State<AppState>,
    Json(input): Json<CreatePurchaseInput>,
) -> AppResult<impl IntoResponse> {
    let purchase = service(&state).create(input).await?;
    Ok((StatusCode::CREATED, Json(purchase)))
}

pub async fn update_purchase(
    State(state): State<AppState>,
    Path(purchase_id): Path<Uuid>,
    Json(input): Json<UpdatePurchaseInput>,
) -> AppResult<impl IntoResponse> {
    let purchase = service(&state).update(purchase_id, input).await?;
    Ok(Json(purchase))
}

pub async fn delete_purchase(
    State(state): State<AppState>,
    Path(purchase_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    service(&state).delete(purchase_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
