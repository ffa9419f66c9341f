//! Stock definition models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::coerce::{lenient_decimal, lenient_i32, lenient_opt_decimal, lenient_opt_i32};

/// A standing inventory definition. Quantities are edited by hand; sales and
/// purchases never move them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockItem {
    pub id: Uuid,
    pub product_name: String,
    pub product_type: String,
    /// Nominal weight of one unit
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub product_weight_grams: Decimal,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub quantity_available: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StockItem {
    /// Total defined weight across all units, saturating on overflow
    pub fn total_weight_grams(&self) -> Decimal {
        Decimal::from(self.quantity_available).saturating_mul(self.product_weight_grams)
    }
}

/// Input for defining a stock item
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateStockInput {
    #[validate(length(min = 1, message = "Product name is required"))]
    pub product_name: String,
    #[validate(length(min = 1, message = "Product type is required"))]
    pub product_type: String,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub product_weight_grams: Decimal,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub quantity_available: i32,
}

/// Partial update for a stock item
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateStockInput {
    pub product_name: Option<String>,
    pub product_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_decimal")]
    pub product_weight_grams: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_opt_i32")]
    pub quantity_available: Option<i32>,
}

impl UpdateStockInput {
    /// Merge the provided fields over an existing item
    pub fn apply(self, existing: &StockItem) -> CreateStockInput {
        CreateStockInput {
            product_name: self
                .product_name
                .unwrap_or_else(|| existing.product_name.clone()),
            product_type: self
                .product_type
                .unwrap_or_else(|| existing.product_type.clone()),
            product_weight_grams: self
                .product_weight_grams
                .unwrap_or(existing.product_weight_grams),
            quantity_available: self
                .quantity_available
                .unwrap_or(existing.quantity_available),
        }
    }
}
