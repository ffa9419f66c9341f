//! Lenient numeric coercion
//!
//! Rows reach the ledger from hand-typed forms, spreadsheet imports and the
//! database, so amounts and quantities may arrive as numbers, numeric strings
//! or not at all. Everything that is summed passes through these helpers;
//! anything that cannot be read as a number becomes zero.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Coerce an arbitrary JSON value into a decimal
pub fn decimal(value: &Value) -> Decimal {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Decimal::from(i)
            } else if let Some(u) = n.as_u64() {
                Decimal::from(u)
            } else {
                n.as_f64()
                    .and_then(|f| Decimal::try_from(f).ok())
                    .unwrap_or(Decimal::ZERO)
            }
        }
        Value::String(s) => decimal_from_str(s),
        Value::Bool(_) | Value::Null | Value::Array(_) | Value::Object(_) => Decimal::ZERO,
    }
}

/// Coerce an arbitrary JSON value into an integer, truncating any fraction
pub fn integer(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::String(s) => decimal_from_str(s).trunc().to_i64().unwrap_or(0),
        _ => 0,
    }
}

/// Parse a decimal from user text, accepting scientific notation
pub fn decimal_from_str(s: &str) -> Decimal {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Decimal::ZERO;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .unwrap_or(Decimal::ZERO)
}

/// Treat a missing decimal as zero
pub fn or_zero(value: Option<Decimal>) -> Decimal {
    value.unwrap_or(Decimal::ZERO)
}

/// Decimal places kept by money columns
pub const MONEY_SCALE: u32 = 2;

/// Decimal places kept by weight columns
pub const WEIGHT_SCALE: u32 = 3;

/// Round an amount to the precision it is stored with
pub fn money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Round a weight to the precision it is stored with
pub fn grams(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(WEIGHT_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Narrow a coerced integer into the `i32` range used by quantity columns
pub fn clamp_i32(value: i64) -> i32 {
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

// ============================================================================
// Serde adapters
// ============================================================================

/// `deserialize_with` adapter: any value into a `Decimal`, malformed as zero
pub fn lenient_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(decimal).unwrap_or(Decimal::ZERO))
}

/// `deserialize_with` adapter keeping `null`/missing distinct from zero
pub fn lenient_opt_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(v) => Some(decimal(&v)),
    })
}

/// `deserialize_with` adapter: any value into an `i32`, malformed as zero
pub fn lenient_i32<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(|v| clamp_i32(integer(v))).unwrap_or(0))
}

/// `deserialize_with` adapter keeping `null`/missing distinct from zero
pub fn lenient_opt_i32<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(v) => Some(clamp_i32(integer(&v))),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decimal_from_number() {
        assert_eq!(decimal(&json!(1200)), Decimal::from(1200));
        assert_eq!(decimal(&json!(12.5)), Decimal::from_str("12.5").unwrap());
    }

    #[test]
    fn test_decimal_from_string() {
        assert_eq!(decimal(&json!(" 450.75 ")), Decimal::from_str("450.75").unwrap());
        assert_eq!(decimal(&json!("1e3")), Decimal::from(1000));
    }

    #[test]
    fn test_decimal_malformed_is_zero() {
        assert_eq!(decimal(&json!("abc")), Decimal::ZERO);
        assert_eq!(decimal(&json!(null)), Decimal::ZERO);
        assert_eq!(decimal(&json!(true)), Decimal::ZERO);
        assert_eq!(decimal(&json!({"amount": 5})), Decimal::ZERO);
        assert_eq!(decimal(&json!("")), Decimal::ZERO);
    }

    #[test]
    fn test_integer_coercion() {
        assert_eq!(integer(&json!(3)), 3);
        assert_eq!(integer(&json!("7")), 7);
        assert_eq!(integer(&json!(2.9)), 2);
        assert_eq!(integer(&json!("2.9")), 2);
        assert_eq!(integer(&json!("two")), 0);
        assert_eq!(integer(&json!(null)), 0);
    }

    #[test]
    fn test_clamp_i32() {
        assert_eq!(clamp_i32(5), 5);
        assert_eq!(clamp_i32(i64::MAX), i32::MAX);
        assert_eq!(clamp_i32(i64::MIN), i32::MIN);
    }

    #[derive(Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "lenient_decimal")]
        amount: Decimal,
        #[serde(default, deserialize_with = "lenient_opt_decimal")]
        given_amount: Option<Decimal>,
        #[serde(default, deserialize_with = "lenient_i32")]
        quantity: i32,
    }

    #[test]
    fn test_serde_adapters() {
        let row: Row =
            serde_json::from_str(r#"{"amount": "1000", "given_amount": null, "quantity": "x"}"#)
                .unwrap();
        assert_eq!(row.amount, Decimal::from(1000));
        assert_eq!(row.given_amount, None);
        assert_eq!(row.quantity, 0);

        let row: Row = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(row.amount, Decimal::ZERO);
        assert_eq!(row.quantity, 0);
    }

    proptest::proptest! {
        #[test]
        fn prop_integer_text_round_trips(n in -1_000_000i64..1_000_000) {
            proptest::prop_assert_eq!(integer(&json!(n.to_string())), n);
            proptest::prop_assert_eq!(decimal(&json!(n)), Decimal::from(n));
        }
    }
}
