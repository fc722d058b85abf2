//! Reconciled event table and its row projection.
//!
//! # Responsibility
//! - Keep the keyed, queryable projection of event records plus the
//!   four aggregate counters.
//! - Converge the table to a freshly loaded record set via in-place
//!   update, insert, and tail trim.
//!
//! # Invariants
//! - Keys are dense `1..=N` after every reconciliation.
//! - Readers take snapshots; no reference escapes the table lock.

mod reconciler;
mod row;

pub use reconciler::{shared_table, EventTable, SharedTable, TableSnapshot, TableTotals};
pub use row::{ColumnValue, EventRow, COLUMN_COUNT};
