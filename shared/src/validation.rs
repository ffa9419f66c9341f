//! Validation utilities for ledger forms
//!
//! These mirror the counter forms: required text fields, non-negative money
//! and weights. Overselling and overpayment are accepted on purpose and are
//! not checked here.

use chrono::NaiveDate;
use rust_decimal::Decimal;

// ============================================================================
// Product and party validations
// ============================================================================

/// Product name and type are both required
pub fn validate_product_identity(product_name: &str, product_type: &str) -> Result<(), &'static str> {
    if product_name.trim().is_empty() {
        return Err("Product name is required");
    }
    if product_type.trim().is_empty() {
        return Err("Product type is required");
    }
    Ok(())
}

/// Buyer (or supplier) name is required
pub fn validate_buyer_name(buyer_name: &str) -> Result<(), &'static str> {
    if buyer_name.trim().is_empty() {
        return Err("Buyer name is required");
    }
    Ok(())
}

// ============================================================================
// Numeric validations
// ============================================================================

/// Validate a sale, purchase or leave amount
pub fn validate_amount(amount: Decimal) -> Result<(), &'static str> {
    if amount < Decimal::ZERO {
        return Err("Amount cannot be negative");
    }
    Ok(())
}

/// Validate the paid portion of a sale. It may exceed the amount.
pub fn validate_given_amount(given_amount: Decimal) -> Result<(), &'static str> {
    if given_amount < Decimal::ZERO {
        return Err("Given amount cannot be negative");
    }
    Ok(())
}

pub fn validate_quantity(quantity: i32) -> Result<(), &'static str> {
    if quantity < 0 {
        return Err("Quantity cannot be negative");
    }
    Ok(())
}

/// Validate a per-unit weight in grams
pub fn validate_weight(weight_grams: Decimal) -> Result<(), &'static str> {
    if weight_grams < Decimal::ZERO {
        return Err("Weight cannot be negative");
    }
    Ok(())
}

// ============================================================================
// Maintenance validations
// ============================================================================

/// A maintenance window needs a description and must not end before it starts
pub fn validate_maintenance_window(
    start_date: NaiveDate,
    end_date: NaiveDate,
    description: &str,
) -> Result<(), &'static str> {
    if description.trim().is_empty() {
        return Err("Description is required");
    }
    if end_date < start_date {
        return Err("End date cannot be before start date");
    }
    Ok(())
}
