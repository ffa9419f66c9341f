//! Purchase service
//!
//! Purchases are reported on but never adjust stock quantities; restocking
//! is a manual edit of the stock definition.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use shared::{
    validate_amount, validate_buyer_name, validate_product_identity, validate_quantity,
    validate_weight, ChangeKind, Collection, CreatePurchaseInput, PurchaseRecord, RecordQuery,
    UpdatePurchaseInput,
};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::services::changes::ChangeFeed;
use crate::services::snapshot;

const PURCHASE_COLUMNS: &str = "id, product_name, product_type, product_weight_grams, quantity, \
     buyer_name, amount, purchase_date, notes, created_at, updated_at";

#[derive(Clone)]
pub struct PurchaseService {
    db: PgPool,
    changes: ChangeFeed,
}

#[derive(Debug, FromRow)]
struct PurchaseRow {
    id: Uuid,
    product_name: String,
    product_type: String,
    product_weight_grams: Decimal,
    quantity: i32,
    buyer_name: String,
    amount: Decimal,
    purchase_date: NaiveDate,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PurchaseRow> for PurchaseRecord {
    fn from(row: PurchaseRow) -> Self {
        PurchaseRecord {
            id: row.id,
            product_name: row.product_name,
            product_type: row.product_type,
            product_weight_grams: row.product_weight_grams,
            quantity: row.quantity,
            buyer_name: row.buyer_name,
            amount: row.amount,
            purchase_date: row.purchase_date,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn validate_purchase(input: &CreatePurchaseInput) -> AppResult<()> {
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

impl PurchaseService {
    pub fn new(db: PgPool, changes: ChangeFeed) -> Self {
        Self { db, changes }
    }

    /// Record a purchase
    pub async fn create(&self, input: CreatePurchaseInput) -> AppResult<PurchaseRecord> {
        validate_purchase(&input)?;

        let purchase_date = input.purchase_date.unwrap_or_else(|| Utc::now().date_naive());

        let row = sqlx::query_as::<_, PurchaseRow>(&format!(
            r#"
            INSERT INTO purchases (
                product_name, product_type, product_weight_grams, quantity, buyer_name,
                amount, purchase_date, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            PURCHASE_COLUMNS
        ))
        .bind(&input.product_name)
        .bind(&input.product_type)
        .bind(input.product_weight_grams)
        .bind(input.quantity)
        .bind(&input.buyer_name)
        .bind(input.amount)
        .bind(purchase_date)
        .bind(&input.notes)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(purchase_id = %row.id, amount = %row.amount, "Recorded purchase");
        self.changes.publish(Collection::Purchases, ChangeKind::Insert, row.id);
        Ok(row.into())
    }

    pub async fn get(&self, purchase_id: Uuid) -> AppResult<PurchaseRecord> {
        let row = sqlx::query_as::<_, PurchaseRow>(&format!(
            "SELECT {} FROM purchases WHERE id = $1",
            PURCHASE_COLUMNS
        ))
        .bind(purchase_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Purchase".to_string()))?;

        Ok(row.into())
    }

    pub async fn update(
        &self,
        purchase_id: Uuid,
        input: UpdatePurchaseInput,
    ) -> AppResult<PurchaseRecord> {
        let existing = self.get(purchase_id).await?;
        let merged = input.apply(&existing);
        validate_purchase(&merged)?;

        let row = sqlx::query_as::<_, PurchaseRow>(&format!(
            r#"
            UPDATE purchases
            SET product_name = $1, product_type = $2, product_weight_grams = $3, quantity = $4,
                buyer_name = $5, amount = $6, purchase_date = $7, notes = $8, updated_at = now()
            WHERE id = $9
            RETURNING {}
            "#,
            PURCHASE_COLUMNS
        ))
        .bind(&merged.product_name)
        .bind(&merged.product_type)
        .bind(merged.product_weight_grams)
        .bind(merged.quantity)
        .bind(&merged.buyer_name)
        .bind(merged.amount)
        .bind(merged.purchase_date.unwrap_or(existing.purchase_date))
        .bind(&merged.notes)
        .bind(purchase_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Purchase".to_string()))?;

        tracing::info!(%purchase_id, "Updated purchase");
        self.changes.publish(Collection::Purchases, ChangeKind::Update, purchase_id);
        Ok(row.into())
    }

    pub async fn delete(&self, purchase_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM purchases WHERE id = $1")
            .bind(purchase_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Purchase".to_string()));
        }

        tracing::info!(%purchase_id, "Deleted purchase");
        self.changes.publish(Collection::Purchases, ChangeKind::Delete, purchase_id);
        Ok(())
    }

    pub async fn list(&self, query: &RecordQuery) -> AppResult<Vec<PurchaseRecord>> {
        snapshot::validate_query(query)?;

        let rows = snapshot::select(PURCHASE_COLUMNS, Collection::Purchases, query)
            .build_query_as::<PurchaseRow>()
            .fetch_all(&self.db)
            .await?;

        Ok(rows.into_iter().map(PurchaseRecord::from).collect())
    }
}
