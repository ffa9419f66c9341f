//! Leave-amount models: goods left with a customer outside the sale flow

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::sale::default_quantity;
use crate::coerce::{lenient_decimal, lenient_i32, lenient_opt_decimal, lenient_opt_i32};

/// Value of goods left with a customer (credit or consignment)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeaveAmountRecord {
    pub id: Uuid,
    pub product_name: String,
    pub product_type: String,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub product_weight_grams: Decimal,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub quantity: i32,
    pub buyer_name: String,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub amount: Decimal,
    pub notes: Option<String>,
    pub leave_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for recording a leave amount
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateLeaveAmountInput {
    #[validate(length(min = 1, message = "Product name is required"))]
    pub product_name: String,
    #[validate(length(min = 1, message = "Product type is required"))]
    pub product_type: String,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub product_weight_grams: Decimal,
    #[serde(default = "default_quantity", deserialize_with = "lenient_i32")]
    pub quantity: i32,
    #[validate(length(min = 1, message = "Buyer name is required"))]
    pub buyer_name: String,
    #[serde(deserialize_with = "lenient_decimal")]
    pub amount: Decimal,
    pub notes: Option<String>,
    pub leave_date: Option<NaiveDate>,
}

impl CreateLeaveAmountInput {
    /// Trim the free-text fields the way the counter form does before saving
    pub fn trimmed(self) -> Self {
        Self {
            product_name: self.product_name.trim().to_string(),
            product_type: self.product_type.trim().to_string(),
            buyer_name: self.buyer_name.trim().to_string(),
            notes: self.notes.map(|n| n.trim().to_string()),
            ..self
        }
    }
}

/// Partial update for a leave amount
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateLeaveAmountInput {
    pub product_name: Option<String>,
    pub product_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_decimal")]
    pub product_weight_grams: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_opt_i32")]
    pub quantity: Option<i32>,
    pub buyer_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_decimal")]
    pub amount: Option<Decimal>,
    pub notes: Option<String>,
    pub leave_date: Option<NaiveDate>,
}

impl UpdateLeaveAmountInput {
    pub fn apply(self, existing: &LeaveAmountRecord) -> CreateLeaveAmountInput {
        CreateLeaveAmountInput {
            product_name: self
                .product_name
                .unwrap_or_else(|| existing.product_name.clone()),
            product_type: self
                .product_type
                .unwrap_or_else(|| existing.product_type.clone()),
            product_weight_grams: self
                .product_weight_grams
                .unwrap_or(existing.product_weight_grams),
            quantity: self.quantity.unwrap_or(existing.quantity),
            buyer_name: self
                .buyer_name
                .unwrap_or_else(|| existing.buyer_name.clone()),
            amount: self.amount.unwrap_or(existing.amount),
            notes: self.notes.or_else(|| existing.notes.clone()),
            leave_date: Some(self.leave_date.unwrap_or(existing.leave_date)),
        }
    }
}
