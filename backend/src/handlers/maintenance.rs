//! Stock maintenance HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use shared::{CreateMaintenanceInput, RecordQuery, UpdateMaintenanceInput};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::MaintenanceService;
use crate::AppState;

fn service(state: &AppState) -> MaintenanceService {
    MaintenanceService::new(state.db.clone(), state.changes.clone())
}

/// List maintenance windows, filtered by start date
pub async fn list_maintenance(
    State(state): State<AppState>,
    Query(query): Query<RecordQuery>,
) -> AppResult<impl IntoResponse> {
    let maintenance = service(&state).list(&query).await?;
    Ok(Json(serde_json::json!({ "maintenance": maintenance })))
}

pub async fn get_maintenance(
    State(state): State<AppState>,
    Path(maintenance_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let record = service(&state).get(maintenance_id).await?;
    Ok(Json(record))
}

pub async fn create_maintenance(
    State(state): State<AppState>,
    Json(input): Json<CreateMaintenanceInput>,
) -> AppResult<impl IntoResponse> {
    let record = service(&state).create(input).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update_maintenance(
    State(state): State<AppState>,
    Path(maintenance_id): Path<Uuid>,
    Json(input): Json<UpdateMaintenanceInput>,
) -> AppResult<impl IntoResponse> {
    let record = service(&state).update(maintenance_id, input).await?;
    Ok(Json(record))
}

pub async fn delete_maintenance(
    State(state): State<AppState>,
    Path(maintenance_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    service(&state).delete(maintenance_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
