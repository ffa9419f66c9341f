//! Sales service: the write path that keeps `balance_amount` in step with
//! `amount - given_amount`

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use shared::{
    validate_amount, validate_buyer_name, validate_given_amount, validate_product_identity,
    validate_quantity, validate_weight, ChangeKind, Collection, CreateSaleInput, RecordQuery,
    SaleRecord, UpdateSaleInput,
};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::services::changes::ChangeFeed;
use crate::services::snapshot;

const SALE_COLUMNS: &str = "id, product_name, product_type, product_weight_grams, quantity, \
     buyer_name, amount, given_amount, balance_amount, sale_date, notes, created_at, updated_at";

/// Sales service for recording and querying sales
#[derive(Clone)]
pub struct SaleService {
    db: PgPool,
    changes: ChangeFeed,
}

#[derive(Debug, FromRow)]
struct SaleRow {
    id: Uuid,
    product_name: String,
    product_type: String,
    product_weight_grams: Decimal,
    quantity: i32,
    buyer_name: String,
    amount: Decimal,
    given_amount: Decimal,
    balance_amount: Decimal,
    sale_date: NaiveDate,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SaleRow> for SaleRecord {
    fn from(row: SaleRow) -> Self {
        SaleRecord {
            id: row.id,
            product_name: row.product_name,
            product_type: row.product_type,
            product_weight_grams: row.product_weight_grams,
            quantity: row.quantity,
            buyer_name: row.buyer_name,
            amount: row.amount,
            given_amount: row.given_amount,
            balance_amount: row.balance_amount,
            sale_date: row.sale_date,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Checks shared by insert and update
pub fn validate_sale(input: &CreateSaleInput) -> AppResult<()> {
    input.validate()?;
    validate_product_identity(&input.product_name, &input.product_type)
        .map_err(|m| AppError::validation("product_name", m))?;
    validate_buyer_name(&input.buyer_name).map_err(|m| AppError::validation("buyer_name", m))?;
    validate_amount(input.amount).map_err(|m| AppError::validation("amount", m))?;
    validate_given_amount(input.given_amount)
        .map_err(|m| AppError::validation("given_amount", m))?;
    validate_quantity(input.quantity).map_err(|m| AppError::validation("quantity", m))?;
    validate_weight(input.product_weight_grams)
        .map_err(|m| AppError::validation("product_weight_grams", m))?;
    Ok(())
}

impl SaleService {
    /// Create a new SaleService instance
    pub fn new(db: PgPool, changes: ChangeFeed) -> Self {
        Self { db, changes }
    }

    /// Record a sale. The balance is computed here, not taken from the client.
    pub async fn create(&self, input: CreateSaleInput) -> AppResult<SaleRecord> {
        let input = input.normalized();
        validate_sale(&input)?;

        let balance_amount = input.balance_amount();
        let sale_date = input.sale_date.unwrap_or_else(|| Utc::now().date_naive());

        let row = sqlx::query_as::<_, SaleRow>(&format!(
            r#"
            INSERT INTO sales (
                product_name, product_type, product_weight_grams, quantity, buyer_name,
                amount, given_amount, balance_amount, sale_date, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            SALE_COLUMNS
        ))
        .bind(&input.product_name)
        .bind(&input.product_type)
        .bind(input.product_weight_grams)
        .bind(input.quantity)
        .bind(&input.buyer_name)
        .bind(input.amount)
        .bind(input.given_amount)
        .bind(balance_amount)
        .bind(sale_date)
        .bind(&input.notes)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(sale_id = %row.id, amount = %row.amount, balance = %row.balance_amount, "Recorded sale");
        self.changes.publish(Collection::Sales, ChangeKind::Insert, row.id);
        Ok(row.into())
    }

    /// Get a single sale
    pub async fn get(&self, sale_id: Uuid) -> AppResult<SaleRecord> {
        let row = sqlx::query_as::<_, SaleRow>(&format!(
            "SELECT {} FROM sales WHERE id = $1",
            SALE_COLUMNS
        ))
        .bind(sale_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Sale".to_string()))?;

        Ok(row.into())
    }

    /// Update a sale, recomputing the balance from the merged amounts
    pub async fn update(&self, sale_id: Uuid, input: UpdateSaleInput) -> AppResult<SaleRecord> {
        let existing = self.get(sale_id).await?;
        let merged = input.apply(&existing).normalized();
        validate_sale(&merged)?;

        let balance_amount = merged.balance_amount();

        let row = sqlx::query_as::<_, SaleRow>(&format!(
            r#"
            UPDATE sales
            SET product_name = $1, product_type = $2, product_weight_grams = $3, quantity = $4,
                buyer_name = $5, amount = $6, given_amount = $7, balance_amount = $8,
                sale_date = $9, notes = $10, updated_at = now()
            WHERE id = $11
            RETURNING {}
            "#,
            SALE_COLUMNS
        ))
        .bind(&merged.product_name)
        .bind(&merged.product_type)
        .bind(merged.product_weight_grams)
        .bind(merged.quantity)
        .bind(&merged.buyer_name)
        .bind(merged.amount)
        .bind(merged.given_amount)
        .bind(balance_amount)
        .bind(merged.sale_date.unwrap_or(existing.sale_date))
        .bind(&merged.notes)
        .bind(sale_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Sale".to_string()))?;

        tracing::info!(%sale_id, balance = %row.balance_amount, "Updated sale");
        self.changes.publish(Collection::Sales, ChangeKind::Update, sale_id);
        Ok(row.into())
    }

    /// Delete a sale
    pub async fn delete(&self, sale_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM sales WHERE id = $1")
            .bind(sale_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Sale".to_string()));
        }

        tracing::info!(%sale_id, "Deleted sale");
        self.changes.publish(Collection::Sales, ChangeKind::Delete, sale_id);
        Ok(())
    }

    /// Snapshot of sales matching the query
    pub async fn list(&self, query: &RecordQuery) -> AppResult<Vec<SaleRecord>> {
        snapshot::validate_query(query)?;

        let rows = snapshot::select(SALE_COLUMNS, Collection::Sales, query)
            .build_query_as::<SaleRow>()
            .fetch_all(&self.db)
            .await?;

        tracing::debug!(count = rows.len(), "Fetched sales snapshot");
        Ok(rows.into_iter().map(SaleRecord::from).collect())
    }

    /// Snapshot of sales dated on one calendar day
    pub async fn list_for_day(&self, date: NaiveDate) -> AppResult<Vec<SaleRecord>> {
        self.list(&RecordQuery::on(date)).await
    }
}
