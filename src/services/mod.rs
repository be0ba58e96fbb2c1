pub mod costing;
pub mod finance;

pub use costing::{CostBreakdown, CostingService, ProductCosting};
pub use finance::{ExpenseSummary, FinanceService, MonthlySummary};
