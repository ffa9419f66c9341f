//! Sale ledger models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::coerce::{self, lenient_decimal, lenient_i32, lenient_opt_decimal, lenient_opt_i32};

pub(crate) fn default_quantity() -> i32 {
    1
}

/// A recorded sale
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SaleRecord {
    pub id: Uuid,
    pub product_name: String,
    pub product_type: String,
    /// Per-unit weight as entered at the counter; may differ from the stock definition
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub product_weight_grams: Decimal,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub quantity: i32,
    pub buyer_name: String,
    /// Total price of the sale
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub amount: Decimal,
    /// Paid so far
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub given_amount: Decimal,
    /// Unpaid portion, stored at write time
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub balance_amount: Decimal,
    pub sale_date: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SaleRecord {
    /// Unpaid portion of a sale. Overpayment yields a negative balance;
    /// out-of-range values saturate.
    pub fn balance_for(amount: Decimal, given_amount: Decimal) -> Decimal {
        amount.saturating_sub(given_amount)
    }

    /// Whether the stored balance still agrees with amount and given amount
    pub fn is_balance_consistent(&self) -> bool {
        self.balance_amount == Self::balance_for(self.amount, self.given_amount)
    }

    pub fn weight_sold_grams(&self) -> Decimal {
        self.product_weight_grams
            .saturating_mul(Decimal::from(self.quantity))
    }
}

/// Input for recording a sale
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateSaleInput {
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
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub given_amount: Decimal,
    /// Defaults to the current date when omitted
    pub sale_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl CreateSaleInput {
    /// Round money and weight to their stored precision. The write path
    /// calls this before deriving the balance, so the stored balance equals
    /// the stored amount minus the stored given amount.
    pub fn normalized(self) -> Self {
        Self {
            product_weight_grams: coerce::grams(self.product_weight_grams),
            amount: coerce::money(self.amount),
            given_amount: coerce::money(self.given_amount),
            ..self
        }
    }

    pub fn balance_amount(&self) -> Decimal {
        SaleRecord::balance_for(self.amount, self.given_amount)
    }
}

/// Partial update for a sale
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSaleInput {
    pub product_name: Option<String>,
    pub product_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_decimal")]
    pub product_weight_grams: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_opt_i32")]
    pub quantity: Option<i32>,
    pub buyer_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_decimal")]
    pub amount: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_opt_decimal")]
    pub given_amount: Option<Decimal>,
    pub sale_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl UpdateSaleInput {
    /// Merge the provided fields over an existing sale. The balance is derived
    /// from the merged amounts by `CreateSaleInput::balance_amount`, so a
    /// client-supplied balance is never trusted.
    pub fn apply(self, existing: &SaleRecord) -> CreateSaleInput {
        CreateSaleInput {
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
            given_amount: self.given_amount.unwrap_or(existing.given_amount),
            sale_date: Some(self.sale_date.unwrap_or(existing.sale_date)),
            notes: self.notes.or_else(|| existing.notes.clone()),
        }
    }
}
