//! HTTP handlers for the Jewelry Ledger API

pub mod changes;
pub mod health;
pub mod leave_amounts;
pub mod maintenance;
pub mod purchases;
pub mod reporting;
pub mod sales;
pub mod stock;

pub use changes::*;
pub use health::*;
pub use leave_amounts::*;
pub use maintenance::*;
pub use purchases::*;
pub use reporting::*;
pub use sales::*;
pub use stock::*;
