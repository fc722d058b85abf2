//! Table reconciliation and snapshots.
//!
//! # Responsibility
//! - Apply the minimal upsert/trim set converging the table to a
//!   freshly loaded record sequence.
//! - Recompute the aggregate counters fully on every pass.
//!
//! # Invariants
//! - Rows are visited in source order; keys are dense `1..=N` after
//!   every pass.
//! - Expired records are filtered out by the caller before
//!   reconciliation (see `model::event::live_records`).
//! - Reconciliation performs no I/O and cannot fail.

use super::row::EventRow;
use crate::model::event::EventRecord;
use crate::time::decompose::Classification;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// Table shared between the refresh writer and concurrent readers.
///
/// One mutual-exclusion lock guards all mutation and all snapshot
/// reads; a reader observes either the pre- or post-reconciliation
/// state of a row, never a half-updated one.
pub type SharedTable = Arc<Mutex<EventTable>>;

/// Creates an empty shared table.
pub fn shared_table() -> SharedTable {
    Arc::new(Mutex::new(EventTable::new()))
}

/// Aggregate counters, recomputed fully on every reconciliation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableTotals {
    pub total: u64,
    pub past: u64,
    pub present: u64,
    pub future: u64,
}

/// Owned copy of the table contents, coherent as of one lock hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSnapshot {
    /// Rows in ascending key order.
    pub rows: Vec<EventRow>,
    pub totals: TableTotals,
}

/// Keyed projection of the current record set plus counters.
#[derive(Debug, Default)]
pub struct EventTable {
    rows: BTreeMap<u32, EventRow>,
    totals: TableTotals,
}

impl EventTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Converges the table to `records`, keyed by source position.
    ///
    /// Existing rows are overwritten field by field, missing rows are
    /// inserted, and rows past the end of `records` are trimmed from
    /// the tail. Counters are recounted from scratch.
    pub fn reconcile(&mut self, records: &[EventRecord], now: NaiveDateTime) {
        let mut totals = TableTotals::default();

        for (position, record) in records.iter().enumerate() {
            let key = position as u32 + 1;
            match self.rows.get_mut(&key) {
                Some(row) => row.overwrite(key, record, now),
                None => {
                    self.rows.insert(key, EventRow::project(key, record, now));
                }
            }
            match record.classification(now) {
                Classification::Past => totals.past += 1,
                Classification::Present => totals.present += 1,
                Classification::Future => totals.future += 1,
            }
        }

        let keep = records.len() as u32;
        let stale: Vec<u32> = self.rows.range(keep + 1..).map(|(key, _)| *key).collect();
        for key in stale {
            self.rows.remove(&key);
        }

        totals.total = totals.past + totals.present + totals.future;
        self.totals = totals;
    }

    pub fn row(&self, key: u32) -> Option<&EventRow> {
        self.rows.get(&key)
    }

    pub fn keys(&self) -> impl Iterator<Item = u32> + '_ {
        self.rows.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn totals(&self) -> TableTotals {
        self.totals
    }

    /// Clones the current rows and counters into an owned snapshot.
    pub fn snapshot(&self) -> TableSnapshot {
        TableSnapshot {
            rows: self.rows.values().cloned().collect(),
            totals: self.totals,
        }
    }
}
