//! Date and number formatting helpers shared by reports and the dashboard

use chrono::{DateTime, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

const SHORT_MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Short English month name for a 1-based month number
pub fn short_month_name(month: u32) -> &'static str {
    match month {
        1..=12 => SHORT_MONTHS[(month - 1) as usize],
        _ => "",
    }
}

/// Format a date as `YYYY-MM-DD`
pub fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a calendar date from either `YYYY-MM-DD` or an RFC 3339 timestamp
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.date_naive());
    }
    // Timestamps without an offset, e.g. "2024-01-15T10:30:00"
    match (s.get(..10), s.get(10..11)) {
        (Some(prefix), Some("T" | " ")) => NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok(),
        _ => None,
    }
}

/// Format an amount in rupees with comma thousands grouping (`₹125,000`).
/// Paise are shown only when non-zero.
pub fn format_rupees(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let abs = rounded.abs();

    let whole = abs.trunc();
    let fraction = abs - whole;

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push('₹');
    out.push_str(&group_thousands(&whole.normalize().to_string()));

    if !fraction.is_zero() {
        let cents = (fraction * Decimal::from(100)).trunc().normalize();
        out.push_str(&format!(".{:0>2}", cents.to_string()));
    }
    out
}

/// Format a weight in grams, dropping trailing zeros, e.g. `12.5 g`
pub fn format_grams(grams: Decimal) -> String {
    format!("{} g", grams.normalize())
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
