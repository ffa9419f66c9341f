//! Leave-amount service for goods left with customers

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use shared::{
    validate_amount, validate_buyer_name, validate_product_identity, validate_quantity,
    validate_weight, ChangeKind, Collection, CreateLeaveAmountInput, LeaveAmountRecord,
    RecordQuery, UpdateLeaveAmountInput,
};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::services::changes::ChangeFeed;
use crate::services::snapshot;

const LEAVE_COLUMNS: &str = "id, product_name, product_type, product_weight_grams, quantity, \
     buyer_name, amount, notes, leave_date, created_at, updated_at";

#[derive(Clone)]
pub struct LeaveAmountService {
    db: PgPool,
    changes: ChangeFeed,
}

#[derive(Debug, FromRow)]
struct LeaveAmountRow {
    id: Uuid,
    product_name: String,
    product_type: String,
    product_weight_grams: Decimal,
    quantity: i32,
    buyer_name: String,
    amount: Decimal,
    notes: Option<String>,
    leave_date: NaiveDate,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<LeaveAmountRow> for LeaveAmountRecord {
    fn from(row: LeaveAmountRow) -> Self {
        LeaveAmountRecord {
            id: row.id,
            product_name: row.product_name,
            product_type: row.product_type,
            product_weight_grams: row.product_weight_grams,
            quantity: row.quantity,
            buyer_name: row.buyer_name,
            amount: row.amount,
            notes: row.notes,
            leave_date: row.leave_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn validate_leave_amount(input: &CreateLeaveAmountInput) -> AppResult<()> {
    input.validate()?;
    validate_product_identity(&input.product_name, &input.product_type)
        .map_err(|m| AppError::validation("product_name", m))?;
    validate_buyer_name(&input.buyer_name).map_err(|m| AppError::validation("buyer_name", m))?;
    validate_amount(input.amount).map_err(|m| AppError::validation("amount", m))?;
    validate_quantity(input.quantity).map_err(|m| AppError::validation("quantity", m))?;
    validate_weight(input.product_weight_grams)
        .map_err(|m| AppError::validation("product_weight_grams", m))?;
    Ok(())
}

impl LeaveAmountService {
    pub fn new(db: PgPool, changes: ChangeFeed) -> Self {
        Self { db, changes }
    }

    /// Record a leave amount; text fields are trimmed before saving
    pub async fn create(&self, input: CreateLeaveAmountInput) -> AppResult<LeaveAmountRecord> {
        let input = input.trimmed();
        validate_leave_amount(&input)?;

        let leave_date = input.leave_date.unwrap_or_else(|| Utc::now().date_naive());

        let row = sqlx::query_as::<_, LeaveAmountRow>(&format!(
            r#"
            INSERT INTO leave_amounts (
                product_name, product_type, product_weight_grams, quantity, buyer_name,
                amount, notes, leave_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            LEAVE_COLUMNS
        ))
        .bind(&input.product_name)
        .bind(&input.product_type)
        .bind(input.product_weight_grams)
        .bind(input.quantity)
        .bind(&input.buyer_name)
        .bind(input.amount)
        .bind(&input.notes)
        .bind(leave_date)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(leave_id = %row.id, buyer = %row.buyer_name, "Recorded leave amount");
        self.changes.publish(Collection::LeaveAmounts, ChangeKind::Insert, row.id);
        Ok(row.into())
    }

    pub async fn get(&self, leave_id: Uuid) -> AppResult<LeaveAmountRecord> {
        let row = sqlx::query_as::<_, LeaveAmountRow>(&format!(
            "SELECT {} FROM leave_amounts WHERE id = $1",
            LEAVE_COLUMNS
        ))
        .bind(leave_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Leave amount".to_string()))?;

        Ok(row.into())
    }

    pub async fn update(
        &self,
        leave_id: Uuid,
        input: UpdateLeaveAmountInput,
    ) -> AppResult<LeaveAmountRecord> {
        let existing = self.get(leave_id).await?;
        let merged = input.apply(&existing).trimmed();
        validate_leave_amount(&merged)?;

        let row = sqlx::query_as::<_, LeaveAmountRow>(&format!(
            r#"
            UPDATE leave_amounts
            SET product_name = $1, product_type = $2, product_weight_grams = $3, quantity = $4,
                buyer_name = $5, amount = $6, notes = $7, leave_date = $8, updated_at = now()
            WHERE id = $9
            RETURNING {}
            "#,
            LEAVE_COLUMNS
        ))
        .bind(&merged.product_name)
        .bind(&merged.product_type)
        .bind(merged.product_weight_grams)
        .bind(merged.quantity)
        .bind(&merged.buyer_name)
        .bind(merged.amount)
        .bind(&merged.notes)
        .bind(merged.leave_date.unwrap_or(existing.leave_date))
        .bind(leave_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Leave amount".to_string()))?;

        tracing::info!(%leave_id, "Updated leave amount");
        self.changes.publish(Collection::LeaveAmounts, ChangeKind::Update, leave_id);
        Ok(row.into())
    }

    pub async fn delete(&self, leave_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM leave_amounts WHERE id = $1")
            .bind(leave_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Leave amount".to_string()));
        }

        tracing::info!(%leave_id, "Deleted leave amount");
        self.changes.publish(Collection::LeaveAmounts, ChangeKind::Delete, leave_id);
        Ok(())
    }

    pub async fn list(&self, query: &RecordQuery) -> AppResult<Vec<LeaveAmountRecord>> {
        snapshot::validate_query(query)?;

        let rows = snapshot::select(LEAVE_COLUMNS, Collection::LeaveAmounts, query)
            .build_query_as::<LeaveAmountRow>()
            .fetch_all(&self.db)
            .await?;

        Ok(rows.into_iter().map(LeaveAmountRecord::from).collect())
    }
}
