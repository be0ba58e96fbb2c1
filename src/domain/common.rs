use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::dates::EntryDate;

/// Identifies entities that expose a stable unique identifier.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Records that carry a user-entered calendar date, making them eligible for
/// period filtering.
pub trait Dated {
    fn entry_date(&self) -> &EntryDate;
}

/// Records that can take part in last-writer-wins reconciliation.
pub trait Reconcilable: Identifiable + Clone {
    fn created_at(&self) -> DateTime<Utc>;
}

// Re-export common dependencies so consumers can rely on this module as a façade.
pub use chrono;
pub use serde;
pub use uuid;
