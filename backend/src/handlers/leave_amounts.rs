//! Leave-amount HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use shared::{CreateLeaveAmountInput, RecordQuery, UpdateLeaveAmountInput};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::LeaveAmountService;
use crate::AppState;

fn service(state: &AppState) -> LeaveAmountService {
    LeaveAmountService::new(state.db.clone(), state.changes.clone())
}

pub async fn list_leave_amounts(
    State(state): State<AppState>,
    Query(query): Query<RecordQuery>,
) -> AppResult<impl IntoResponse> {
    let leave_amounts = service(&state).list(&query).await?;
    Ok(Json(serde_json::json!({ "leave_amounts": leave_amounts })))
}

pub async fn get_leave_amount(
    State(state): State<AppState>,
    Path(leave_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let record = service(&state).get(leave_id).await?;
    Ok(Json(record))
}

pub async fn create_leave_amount(
    State(state): State<AppState>,
    Json(input): Json<CreateLeaveAmountInput>,
) -> AppResult<impl IntoResponse> {
    let record = service(&state).create(input).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update_leave_amount(
    State(state): State<AppState>,
    Path(leave_id): Path<Uuid>,
    Json(input): Json<UpdateLeaveAmountInput>,
) -> AppResult<impl IntoResponse> {
    let record = service(&state).update(leave_id, input).await?;
    Ok(Json(record))
}

pub async fn delete_leave_amount(
    State(state): State<AppState>,
    Path(leave_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    service(&state).delete(leave_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
