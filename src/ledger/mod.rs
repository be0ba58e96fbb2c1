pub mod merge;
pub mod snapshot;
pub mod store;

pub use merge::{merge_records, merge_snapshots};
pub use snapshot::Snapshot;
pub use store::{LoadReport, RecordStore};
