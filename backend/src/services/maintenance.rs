//! Stock maintenance scheduling service

use chrono::{DateTime, NaiveDate, Utc};
use shared::{
    validate_maintenance_window, ChangeKind, Collection, CreateMaintenanceInput,
    MaintenanceStatus, RecordQuery, StockMaintenanceRecord, UpdateMaintenanceInput,
};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::services::changes::ChangeFeed;
use crate::services::snapshot;

const MAINTENANCE_COLUMNS: &str =
    "id, start_date, end_date, description, status, created_at, updated_at";

#[derive(Clone)]
pub struct MaintenanceService {
    db: PgPool,
    changes: ChangeFeed,
}

#[derive(Debug, FromRow)]
struct MaintenanceRow {
    id: Uuid,
    start_date: NaiveDate,
    end_date: NaiveDate,
    description: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<MaintenanceRow> for StockMaintenanceRecord {
    type Error = AppError;

    fn try_from(row: MaintenanceRow) -> Result<Self, Self::Error> {
        let status = row.status.parse::<MaintenanceStatus>().map_err(AppError::Internal)?;
        Ok(StockMaintenanceRecord {
            id: row.id,
            start_date: row.start_date,
            end_date: row.end_date,
            description: row.description,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn validate_window(input: &CreateMaintenanceInput) -> AppResult<()> {
    input.validate()?;
    validate_maintenance_window(input.start_date, input.end_date, &input.description)
        .map_err(|m| AppError::validation("end_date", m))
}

impl MaintenanceService {
    pub fn new(db: PgPool, changes: ChangeFeed) -> Self {
        Self { db, changes }
    }

    /// Schedule a maintenance window
    pub async fn create(&self, input: CreateMaintenanceInput) -> AppResult<StockMaintenanceRecord> {
        validate_window(&input)?;

        let row = sqlx::query_as::<_, MaintenanceRow>(&format!(
            r#"
            INSERT INTO stock_maintenance (start_date, end_date, description, status)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            MAINTENANCE_COLUMNS
        ))
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(&input.description)
        .bind(input.status.as_str())
        .fetch_one(&self.db)
        .await?;

        tracing::info!(maintenance_id = %row.id, start = %row.start_date, end = %row.end_date, "Scheduled maintenance");
        self.changes.publish(Collection::StockMaintenance, ChangeKind::Insert, row.id);
        row.try_into()
    }

    pub async fn get(&self, maintenance_id: Uuid) -> AppResult<StockMaintenanceRecord> {
        sqlx::query_as::<_, MaintenanceRow>(&format!(
            "SELECT {} FROM stock_maintenance WHERE id = $1",
            MAINTENANCE_COLUMNS
        ))
        .bind(maintenance_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Maintenance record".to_string()))?
        .try_into()
    }

    /// Reschedule or change the status of a window
    pub async fn update(
        &self,
        maintenance_id: Uuid,
        input: UpdateMaintenanceInput,
    ) -> AppResult<StockMaintenanceRecord> {
        let existing = self.get(maintenance_id).await?;
        let merged = input.apply(&existing);
        validate_window(&merged)?;

        let row = sqlx::query_as::<_, MaintenanceRow>(&format!(
            r#"
            UPDATE stock_maintenance
            SET start_date = $1, end_date = $2, description = $3, status = $4, updated_at = now()
            WHERE id = $5
            RETURNING {}
            "#,
            MAINTENANCE_COLUMNS
        ))
        .bind(merged.start_date)
        .bind(merged.end_date)
        .bind(&merged.description)
        .bind(merged.status.as_str())
        .bind(maintenance_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Maintenance record".to_string()))?;

        tracing::info!(%maintenance_id, status = %row.status, "Updated maintenance");
        self.changes
            .publish(Collection::StockMaintenance, ChangeKind::Update, maintenance_id);
        row.try_into()
    }

    pub async fn delete(&self, maintenance_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM stock_maintenance WHERE id = $1")
            .bind(maintenance_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Maintenance record".to_string()));
        }

        tracing::info!(%maintenance_id, "Deleted maintenance");
        self.changes
            .publish(Collection::StockMaintenance, ChangeKind::Delete, maintenance_id);
        Ok(())
    }

    pub async fn list(&self, query: &RecordQuery) -> AppResult<Vec<StockMaintenanceRecord>> {
        snapshot::validate_query(query)?;

        let rows = snapshot::select(MAINTENANCE_COLUMNS, Collection::StockMaintenance, query)
            .build_query_as::<MaintenanceRow>()
            .fetch_all(&self.db)
            .await?;

        rows.into_iter().map(StockMaintenanceRecord::try_from).collect()
    }
}
