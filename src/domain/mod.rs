pub mod batch;
pub mod common;
pub mod dates;
pub mod period;
pub mod sale;
pub mod settings;
pub mod transaction;

pub use batch::ProductionBatch;
pub use common::{Dated, Identifiable, Reconcilable};
pub use dates::EntryDate;
pub use period::{filter_by_date_range, MonthKey, Period};
pub use sale::SaleRecord;
pub use settings::{Settings, SETTINGS_SCHEMA_VERSION};
pub use transaction::{CashTransaction, TransactionKind};
