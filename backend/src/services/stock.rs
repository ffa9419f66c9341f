//! Stock definition service

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shared::{
    validate_product_identity, validate_quantity, validate_weight, ChangeKind, Collection,
    CreateStockInput, RecordQuery, StockItem, UpdateStockInput,
};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::services::changes::ChangeFeed;
use crate::services::snapshot;

const STOCK_COLUMNS: &str =
    "id, product_name, product_type, product_weight_grams, quantity_available, created_at, updated_at";

/// Stock service for managing inventory definitions
#[derive(Clone)]
pub struct StockService {
    db: PgPool,
    changes: ChangeFeed,
}

#[derive(Debug, FromRow)]
struct StockRow {
    id: Uuid,
    product_name: String,
    product_type: String,
    product_weight_grams: Decimal,
    quantity_available: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<StockRow> for StockItem {
    fn from(row: StockRow) -> Self {
        StockItem {
            id: row.id,
            product_name: row.product_name,
            product_type: row.product_type,
            product_weight_grams: row.product_weight_grams,
            quantity_available: row.quantity_available,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn validate_stock(input: &CreateStockInput) -> AppResult<()> {
    input.validate()?;
    validate_product_identity(&input.product_name, &input.product_type)
        .map_err(|m| AppError::validation("product_name", m))?;
    validate_weight(input.product_weight_grams)
        .map_err(|m| AppError::validation("product_weight_grams", m))?;
    validate_quantity(input.quantity_available)
        .map_err(|m| AppError::validation("quantity_available", m))?;
    Ok(())
}

impl StockService {
    /// Create a new StockService instance
    pub fn new(db: PgPool, changes: ChangeFeed) -> Self {
        Self { db, changes }
    }

    /// Define a new stock item
    pub async fn create(&self, input: CreateStockInput) -> AppResult<StockItem> {
        validate_stock(&input)?;

        let row = sqlx::query_as::<_, StockRow>(&format!(
            r#"
            INSERT INTO stock (product_name, product_type, product_weight_grams, quantity_available)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            STOCK_COLUMNS
        ))
        .bind(&input.product_name)
        .bind(&input.product_type)
        .bind(input.product_weight_grams)
        .bind(input.quantity_available)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(stock_id = %row.id, product = %row.product_name, "Created stock item");
        self.changes.publish(Collection::Stock, ChangeKind::Insert, row.id);
        Ok(row.into())
    }

    /// Get a single stock item
    pub async fn get(&self, stock_id: Uuid) -> AppResult<StockItem> {
        let row = sqlx::query_as::<_, StockRow>(&format!(
            "SELECT {} FROM stock WHERE id = $1",
            STOCK_COLUMNS
        ))
        .bind(stock_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Stock item".to_string()))?;

        Ok(row.into())
    }

    /// Update a stock item. Restocking is done here by editing the quantity.
    pub async fn update(&self, stock_id: Uuid, input: UpdateStockInput) -> AppResult<StockItem> {
        let existing = self.get(stock_id).await?;
        let merged = input.apply(&existing);
        validate_stock(&merged)?;

        let row = sqlx::query_as::<_, StockRow>(&format!(
            r#"
            UPDATE stock
            SET product_name = $1, product_type = $2, product_weight_grams = $3,
                quantity_available = $4, updated_at = now()
            WHERE id = $5
            RETURNING {}
            "#,
            STOCK_COLUMNS
        ))
        .bind(&merged.product_name)
        .bind(&merged.product_type)
        .bind(merged.product_weight_grams)
        .bind(merged.quantity_available)
        .bind(stock_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Stock item".to_string()))?;

        tracing::info!(%stock_id, quantity = row.quantity_available, "Updated stock item");
        self.changes.publish(Collection::Stock, ChangeKind::Update, stock_id);
        Ok(row.into())
    }

    /// Delete a stock item
    pub async fn delete(&self, stock_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM stock WHERE id = $1")
            .bind(stock_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Stock item".to_string()));
        }

        tracing::info!(%stock_id, "Deleted stock item");
        self.changes.publish(Collection::Stock, ChangeKind::Delete, stock_id);
        Ok(())
    }

    /// Snapshot of stock definitions
    pub async fn list(&self, query: &RecordQuery) -> AppResult<Vec<StockItem>> {
        snapshot::validate_query(query)?;

        let rows = snapshot::select(STOCK_COLUMNS, Collection::Stock, query)
            .build_query_as::<StockRow>()
            .fetch_all(&self.db)
            .await?;

        Ok(rows.into_iter().map(StockItem::from).collect())
    }
}
