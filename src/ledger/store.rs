use std::cmp::Reverse;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::common::{Dated, Identifiable};
use crate::domain::{CashTransaction, ProductionBatch, SaleRecord, Settings, SETTINGS_SCHEMA_VERSION};
use crate::errors::LedgerError;
use crate::ledger::merge::merge_snapshots;
use crate::ledger::snapshot::Snapshot;
use crate::storage::{DocumentKind, DocumentStore};

type Result<T> = std::result::Result<T, LedgerError>;

/// Metadata describing the outcome of a load or reconcile operation.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub migrations: Vec<String>,
    pub warnings: Vec<String>,
}

/// Repository owning the live snapshot and its persistence backend.
///
/// Every mutation clones nothing and shares nothing: it edits the owned
/// snapshot, then rewrites the affected document through the backend before
/// returning. Readers borrow the snapshot; the calculation services never see
/// the storage layer.
pub struct RecordStore {
    snapshot: Snapshot,
    storage: Box<dyn DocumentStore>,
}

impl RecordStore {
    /// Opens the store, loading all four documents. Documents that do not
    /// exist yet produce empty collections and default settings.
    pub fn open(storage: Box<dyn DocumentStore>) -> Result<(Self, LoadReport)> {
        let fetched = fetch(storage.as_ref())?;
        let snapshot = Snapshot {
            settings: fetched.settings.unwrap_or_default(),
            production: fetched.production,
            transactions: fetched.transactions,
            sales: fetched.sales,
        };
        let report = LoadReport {
            migrations: fetched.migrations,
            warnings: snapshot.warnings(),
        };
        tracing::info!(
            batches = snapshot.production.len(),
            transactions = snapshot.transactions.len(),
            sales = snapshot.sales.len(),
            "record store opened"
        );
        Ok((Self { snapshot, storage }, report))
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn settings(&self) -> &Settings {
        &self.snapshot.settings
    }

    /// Discards the live snapshot and reloads everything from storage.
    pub fn refresh(&mut self) -> Result<LoadReport> {
        let fetched = fetch(self.storage.as_ref())?;
        self.snapshot = Snapshot {
            settings: fetched.settings.unwrap_or_default(),
            production: fetched.production,
            transactions: fetched.transactions,
            sales: fetched.sales,
        };
        Ok(LoadReport {
            migrations: fetched.migrations,
            warnings: self.snapshot.warnings(),
        })
    }

    /// Fetches the stored documents, merges them with the live snapshot under
    /// last-writer-wins, installs the merged result, and persists it. Brings
    /// local unsynced edits back in line with out-of-band changes.
    pub fn reconcile(&mut self) -> Result<LoadReport> {
        let fetched = fetch(self.storage.as_ref())?;
        let remote = Snapshot {
            // Remote settings win only when the remote document exists.
            settings: fetched
                .settings
                .unwrap_or_else(|| self.snapshot.settings.clone()),
            production: fetched.production,
            transactions: fetched.transactions,
            sales: fetched.sales,
        };
        self.snapshot = merge_snapshots(&remote, &self.snapshot);
        self.sync("reconcile local and remote records")?;
        tracing::info!("reconciled local snapshot with stored documents");
        Ok(LoadReport {
            migrations: fetched.migrations,
            warnings: self.snapshot.warnings(),
        })
    }

    /// Persists all four documents with one change description.
    pub fn sync(&self, message: &str) -> Result<()> {
        self.persist(DocumentKind::Config, message)?;
        self.persist(DocumentKind::Production, message)?;
        self.persist(DocumentKind::Transactions, message)?;
        self.persist(DocumentKind::Sales, message)
    }

    // ---- production -----------------------------------------------------

    pub fn add_batch(&mut self, batch: ProductionBatch) -> Result<Uuid> {
        let id = batch.id();
        tracing::info!(%id, product = %batch.product_name, "recording production batch");
        self.snapshot.production.push(batch);
        self.persist(DocumentKind::Production, "add production batch")?;
        Ok(id)
    }

    pub fn batch(&self, id: Uuid) -> Option<&ProductionBatch> {
        self.snapshot.production.iter().find(|batch| batch.id() == id)
    }

    /// All batches, newest entry date first; unparseable dates sort last.
    pub fn batches_by_date(&self) -> Vec<&ProductionBatch> {
        sorted_by_date(&self.snapshot.production)
    }

    pub fn update_batch(
        &mut self,
        id: Uuid,
        apply: impl FnOnce(&mut ProductionBatch),
    ) -> Result<()> {
        let batch = self
            .snapshot
            .production
            .iter_mut()
            .find(|batch| batch.id == id)
            .ok_or_else(|| LedgerError::NotFound(format!("production batch {id}")))?;
        apply(batch);
        self.persist(DocumentKind::Production, "update production batch")
    }

    pub fn delete_batch(&mut self, id: Uuid) -> Result<()> {
        let before = self.snapshot.production.len();
        self.snapshot.production.retain(|batch| batch.id != id);
        if self.snapshot.production.len() == before {
            return Err(LedgerError::NotFound(format!("production batch {id}")));
        }
        self.persist(DocumentKind::Production, "delete production batch")
    }

    // ---- transactions ---------------------------------------------------

    pub fn add_transaction(&mut self, txn: CashTransaction) -> Result<Uuid> {
        let id = txn.id();
        tracing::info!(%id, kind = ?txn.kind, "recording transaction");
        self.snapshot.transactions.push(txn);
        self.persist(DocumentKind::Transactions, "add transaction")?;
        Ok(id)
    }

    pub fn transaction(&self, id: Uuid) -> Option<&CashTransaction> {
        self.snapshot.transactions.iter().find(|txn| txn.id() == id)
    }

    pub fn transactions_by_date(&self) -> Vec<&CashTransaction> {
        sorted_by_date(&self.snapshot.transactions)
    }

    pub fn update_transaction(
        &mut self,
        id: Uuid,
        apply: impl FnOnce(&mut CashTransaction),
    ) -> Result<()> {
        let txn = self
            .snapshot
            .transactions
            .iter_mut()
            .find(|txn| txn.id == id)
            .ok_or_else(|| LedgerError::NotFound(format!("transaction {id}")))?;
        apply(txn);
        self.persist(DocumentKind::Transactions, "update transaction")
    }

    pub fn delete_transaction(&mut self, id: Uuid) -> Result<()> {
        let before = self.snapshot.transactions.len();
        self.snapshot.transactions.retain(|txn| txn.id != id);
        if self.snapshot.transactions.len() == before {
            return Err(LedgerError::NotFound(format!("transaction {id}")));
        }
        self.persist(DocumentKind::Transactions, "delete transaction")
    }

    // ---- sales ----------------------------------------------------------

    pub fn add_sale(&mut self, sale: SaleRecord) -> Result<Uuid> {
        let id = sale.id();
        tracing::info!(%id, "recording sale");
        self.snapshot.sales.push(sale);
        self.persist(DocumentKind::Sales, "add sale record")?;
        Ok(id)
    }

    pub fn sale(&self, id: Uuid) -> Option<&SaleRecord> {
        self.snapshot.sales.iter().find(|sale| sale.id() == id)
    }

    pub fn sales_by_date(&self) -> Vec<&SaleRecord> {
        sorted_by_date(&self.snapshot.sales)
    }

    pub fn update_sale(&mut self, id: Uuid, apply: impl FnOnce(&mut SaleRecord)) -> Result<()> {
        let sale = self
            .snapshot
            .sales
            .iter_mut()
            .find(|sale| sale.id == id)
            .ok_or_else(|| LedgerError::NotFound(format!("sale record {id}")))?;
        apply(sale);
        self.persist(DocumentKind::Sales, "update sale record")
    }

    pub fn delete_sale(&mut self, id: Uuid) -> Result<()> {
        let before = self.snapshot.sales.len();
        self.snapshot.sales.retain(|sale| sale.id != id);
        if self.snapshot.sales.len() == before {
            return Err(LedgerError::NotFound(format!("sale record {id}")));
        }
        self.persist(DocumentKind::Sales, "delete sale record")
    }

    // ---- configuration --------------------------------------------------

    pub fn update_settings(&mut self, apply: impl FnOnce(&mut Settings)) -> Result<()> {
        apply(&mut self.snapshot.settings);
        self.snapshot.settings.schema_version = SETTINGS_SCHEMA_VERSION;
        self.persist(DocumentKind::Config, "update configuration")
    }

    // ---- whole-snapshot operations --------------------------------------

    /// Pretty-printed export of the whole snapshot.
    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.snapshot)?)
    }

    /// Replaces everything with an imported document, then persists. The
    /// import is validated before any state changes.
    pub fn import_json(&mut self, raw: &str) -> Result<LoadReport> {
        let value: Value = serde_json::from_str(raw)?;
        let (snapshot, migrations) = Snapshot::from_export(value)?;
        self.snapshot = snapshot;
        self.sync("import data")?;
        Ok(LoadReport {
            migrations,
            warnings: self.snapshot.warnings(),
        })
    }

    /// Resets every collection and the settings to defaults, then persists.
    pub fn clear(&mut self) -> Result<()> {
        tracing::warn!("clearing all bookkeeping data");
        self.snapshot = Snapshot::default();
        self.sync("clear all data")
    }

    fn persist(&self, kind: DocumentKind, message: &str) -> Result<()> {
        let value = match kind {
            DocumentKind::Config => serde_json::to_value(&self.snapshot.settings)?,
            DocumentKind::Production => serde_json::to_value(&self.snapshot.production)?,
            DocumentKind::Transactions => serde_json::to_value(&self.snapshot.transactions)?,
            DocumentKind::Sales => serde_json::to_value(&self.snapshot.sales)?,
        };
        self.storage.save(kind, &value, message)
    }
}

struct FetchedDocuments {
    settings: Option<Settings>,
    production: Vec<ProductionBatch>,
    transactions: Vec<CashTransaction>,
    sales: Vec<SaleRecord>,
    migrations: Vec<String>,
}

fn fetch(storage: &dyn DocumentStore) -> Result<FetchedDocuments> {
    let mut migrations = Vec::new();
    let settings = match storage.load(DocumentKind::Config)? {
        Some(value) => {
            let (settings, notes) = Settings::migrate(value)?;
            migrations.extend(notes);
            Some(settings)
        }
        None => None,
    };
    Ok(FetchedDocuments {
        settings,
        production: load_collection(storage, DocumentKind::Production)?,
        transactions: load_collection(storage, DocumentKind::Transactions)?,
        sales: load_collection(storage, DocumentKind::Sales)?,
        migrations,
    })
}

fn load_collection<T: DeserializeOwned>(
    storage: &dyn DocumentStore,
    kind: DocumentKind,
) -> Result<Vec<T>> {
    match storage.load(kind)? {
        Some(value) => Ok(serde_json::from_value(value)?),
        None => Ok(Vec::new()),
    }
}

fn sorted_by_date<T: Dated>(items: &[T]) -> Vec<&T> {
    let mut sorted: Vec<&T> = items.iter().collect();
    sorted.sort_by_key(|item| Reverse(item.entry_date().date().unwrap_or(NaiveDate::MIN)));
    sorted
}
