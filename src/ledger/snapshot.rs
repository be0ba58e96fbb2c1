use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::common::Dated;
use crate::domain::{CashTransaction, ProductionBatch, SaleRecord, Settings};
use crate::errors::LedgerError;

/// One consistent view of the four collections. The record store owns the
/// live snapshot; the calculation services only ever borrow it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    #[serde(rename = "config")]
    pub settings: Settings,
    pub production: Vec<ProductionBatch>,
    pub transactions: Vec<CashTransaction>,
    pub sales: Vec<SaleRecord>,
}

impl Snapshot {
    /// Distinct calendar years across every dated collection, newest first.
    /// Used to populate period pickers.
    pub fn all_years(&self) -> Vec<i32> {
        let mut years = BTreeSet::new();
        years.extend(self.production.iter().filter_map(dated_year));
        years.extend(self.transactions.iter().filter_map(dated_year));
        years.extend(self.sales.iter().filter_map(dated_year));
        years.into_iter().rev().collect()
    }

    /// Data-quality sweep run after load and merge. Nothing here is fatal;
    /// degraded records are excluded from period math instead.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        for batch in &self.production {
            if !batch.date.is_parseable() {
                warnings.push(format!(
                    "production batch {} has unparseable date `{}`",
                    batch.id, batch.date
                ));
            }
            if batch.volume_produced < 0.0 {
                warnings.push(format!("production batch {} has negative volume", batch.id));
            }
        }
        for txn in &self.transactions {
            if !txn.date.is_parseable() {
                warnings.push(format!(
                    "transaction {} has unparseable date `{}`",
                    txn.id, txn.date
                ));
            }
            if txn.amount < 0.0 {
                warnings.push(format!("transaction {} has negative amount", txn.id));
            }
        }
        for sale in &self.sales {
            if !sale.date.is_parseable() {
                warnings.push(format!(
                    "sale record {} has unparseable date `{}`",
                    sale.id, sale.date
                ));
            }
            if sale.volume_sold < 0.0 {
                warnings.push(format!("sale record {} has negative volume sold", sale.id));
            }
        }
        warnings
    }

    /// Parses an exported document, accepting both the canonical export shape
    /// (`config` key) and the legacy single-blob export that kept its
    /// configuration fields inline. All three collections must be present.
    pub fn from_export(value: Value) -> Result<(Self, Vec<String>), LedgerError> {
        let Value::Object(map) = value else {
            return Err(LedgerError::InvalidDocument(
                "exported data must be a JSON object".into(),
            ));
        };
        for key in ["production", "transactions", "sales"] {
            if !map.contains_key(key) {
                return Err(LedgerError::InvalidDocument(format!(
                    "exported data is missing the `{key}` collection"
                )));
            }
        }

        let production = serde_json::from_value(map["production"].clone())?;
        let transactions = serde_json::from_value(map["transactions"].clone())?;
        let sales = serde_json::from_value(map["sales"].clone())?;
        let (settings, migrations) = match map.get("config") {
            Some(config) => Settings::migrate(config.clone())?,
            None => Settings::migrate(Value::Object(map))?,
        };

        Ok((
            Self {
                settings,
                production,
                transactions,
                sales,
            },
            migrations,
        ))
    }
}

fn dated_year<T: Dated>(record: &T) -> Option<i32> {
    use chrono::Datelike;
    record.entry_date().date().map(|date| date.year())
}
