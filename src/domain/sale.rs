use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{Dated, Identifiable, Reconcilable};
use crate::domain::dates::{lenient_amount, lenient_timestamp, EntryDate};

/// Point-of-sale summary for a day or an event: revenue taken against units
/// poured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRecord {
    pub id: Uuid,
    pub date: EntryDate,
    #[serde(deserialize_with = "lenient_amount::deserialize")]
    pub revenue: f64,
    #[serde(deserialize_with = "lenient_amount::deserialize")]
    pub volume_sold: f64,
    #[serde(with = "lenient_timestamp")]
    pub created_at: DateTime<Utc>,
}

impl SaleRecord {
    pub fn new(date: NaiveDate, revenue: f64, volume_sold: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            date: EntryDate::from(date),
            revenue,
            volume_sold,
            created_at: Utc::now(),
        }
    }

    /// Average price per unit for this record alone; zero when nothing was
    /// poured.
    pub fn average_price(&self) -> f64 {
        if self.volume_sold > 0.0 {
            self.revenue / self.volume_sold
        } else {
            0.0
        }
    }
}

impl Identifiable for SaleRecord {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Dated for SaleRecord {
    fn entry_date(&self) -> &EntryDate {
        &self.date
    }
}

impl Reconcilable for SaleRecord {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
