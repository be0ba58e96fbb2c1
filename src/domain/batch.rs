use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{Dated, Identifiable, Reconcilable};
use crate::domain::dates::{lenient_amount, lenient_timestamp, EntryDate};

/// One brewing run: the volume it yielded and the direct costs it incurred.
///
/// A batch with zero volume still contributes its costs to a period; it just
/// adds nothing to the allocation base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionBatch {
    pub id: Uuid,
    pub date: EntryDate,
    #[serde(alias = "beerName")]
    pub product_name: String,
    #[serde(alias = "volume", deserialize_with = "lenient_amount::deserialize")]
    pub volume_produced: f64,
    #[serde(deserialize_with = "lenient_amount::deserialize")]
    pub labor_hours: f64,
    #[serde(deserialize_with = "lenient_amount::deserialize")]
    pub ingredient_cost: f64,
    #[serde(with = "lenient_timestamp")]
    pub created_at: DateTime<Utc>,
}

impl ProductionBatch {
    pub fn new(
        date: NaiveDate,
        product_name: impl Into<String>,
        volume_produced: f64,
        labor_hours: f64,
        ingredient_cost: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            date: EntryDate::from(date),
            product_name: product_name.into(),
            volume_produced,
            labor_hours,
            ingredient_cost,
            created_at: Utc::now(),
        }
    }
}

impl Identifiable for ProductionBatch {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Dated for ProductionBatch {
    fn entry_date(&self) -> &EntryDate {
        &self.date
    }
}

impl Reconcilable for ProductionBatch {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
