//! Last-writer-wins reconciliation between a remote and a local snapshot.
//!
//! Conflicts are resolved per whole record: when both sides carry the same
//! id, the record with the later `createdAt` replaces the other; no
//! field-level diff is attempted. Creation timestamps carry millisecond
//! precision, so equal stamps are practically never seen; when they do occur
//! the later-inserted candidate wins, a documented best-effort policy rather
//! than a hard guarantee.

use indexmap::map::Entry;
use indexmap::IndexMap;
use uuid::Uuid;

use crate::domain::common::Reconcilable;
use crate::ledger::snapshot::Snapshot;

/// Merges two sets of keyed records. Remote records are considered first, so
/// a timestamp tie favors the local side. Output order is unspecified.
pub fn merge_records<T: Reconcilable>(remote: &[T], local: &[T]) -> Vec<T> {
    let mut by_id: IndexMap<Uuid, T> = IndexMap::with_capacity(remote.len() + local.len());
    for record in remote.iter().chain(local.iter()) {
        match by_id.entry(record.id()) {
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
            }
            Entry::Occupied(mut slot) => {
                if record.created_at() >= slot.get().created_at() {
                    slot.insert(record.clone());
                }
            }
        }
    }
    by_id.into_values().collect()
}

/// Produces one consistent snapshot from a remote and a local candidate.
///
/// The three keyed collections merge record-by-record; the configuration is a
/// singleton and simply takes the remote side (callers substitute the local
/// settings before merging when the remote document does not exist).
pub fn merge_snapshots(remote: &Snapshot, local: &Snapshot) -> Snapshot {
    Snapshot {
        settings: remote.settings.clone(),
        production: merge_records(&remote.production, &local.production),
        transactions: merge_records(&remote.transactions, &local.transactions),
        sales: merge_records(&remote.sales, &local.sales),
    }
}
