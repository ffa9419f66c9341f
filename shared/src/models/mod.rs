//! Domain records for the jewelry ledger

mod leave_amount;
mod maintenance;
mod purchase;
mod sale;
mod stock;

pub use leave_amount::*;
pub use maintenance::*;
pub use purchase::*;
pub use sale::*;
pub use stock::*;
