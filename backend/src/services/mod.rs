//! Business logic services for the Jewelry Ledger

pub mod changes;
pub mod leave_amounts;
pub mod maintenance;
pub mod purchases;
pub mod reporting;
pub mod sales;
pub mod snapshot;
pub mod stock;

pub use changes::ChangeFeed;
pub use leave_amounts::LeaveAmountService;
pub use maintenance::MaintenanceService;
pub use purchases::PurchaseService;
pub use reporting::ReportingService;
pub use sales::SaleService;
pub use stock::StockService;
