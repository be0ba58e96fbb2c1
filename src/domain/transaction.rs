use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{Dated, Identifiable, Reconcilable};
use crate::domain::dates::{lenient_amount, lenient_timestamp, EntryDate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn is_income(self) -> bool {
        matches!(self, TransactionKind::Income)
    }

    pub fn is_expense(self) -> bool {
        matches!(self, TransactionKind::Expense)
    }
}

/// Cash-ledger entry. The amount is stored unsigned; the kind decides the
/// sign at aggregation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashTransaction {
    pub id: Uuid,
    pub date: EntryDate,
    pub description: String,
    #[serde(deserialize_with = "lenient_amount::deserialize")]
    pub amount: f64,
    #[serde(alias = "type")]
    pub kind: TransactionKind,
    pub category: String,
    #[serde(with = "lenient_timestamp")]
    pub created_at: DateTime<Utc>,
}

impl CashTransaction {
    pub fn new(
        date: NaiveDate,
        description: impl Into<String>,
        amount: f64,
        kind: TransactionKind,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            date: EntryDate::from(date),
            description: description.into(),
            amount,
            kind,
            category: category.into(),
            created_at: Utc::now(),
        }
    }
}

impl Identifiable for CashTransaction {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Dated for CashTransaction {
    fn entry_date(&self) -> &EntryDate {
        &self.date
    }
}

impl Reconcilable for CashTransaction {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
