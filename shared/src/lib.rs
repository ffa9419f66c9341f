//! Shared types and ledger logic for the Jewelry Ledger
//!
//! This crate contains the records, stock reconciliation and ledger
//! aggregation shared between the backend and the dashboard (via WASM).
//! Everything here is pure: callers pass snapshots in and get fresh values out.

pub mod coerce;
pub mod format;
pub mod ledger;
pub mod models;
pub mod reconcile;
pub mod types;
pub mod validation;

pub use ledger::{DateField, LedgerEntry, MonthKey};
pub use models::*;
pub use reconcile::{reconcile, StockTotals, StockWithRemaining};
pub use types::*;
pub use validation::*;
