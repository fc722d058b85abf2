//! Core domain logic for EventBoard.
//!
//! EventBoard keeps a live, queryable table of date-anchored reminder
//! events: a flat record store is loaded on a fixed interval, each
//! record's countdowns are recomputed against "now", and the keyed
//! table is converged in place while expired rows are evicted. A
//! consumer polls the table projection and refreshes only the rows it
//! currently displays.

pub mod logging;
pub mod model;
pub mod service;
pub mod store;
pub mod table;
pub mod time;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::event::{live_records, EventRecord, EventValidationError};
pub use service::poller::{
    shared_view, FetchError, FetchResult, LocalTableFetcher, PollingClient, SharedView,
    TableFetcher, ViewHandle, ViewRefresher,
};
pub use service::refresh::{RefreshHandle, RefreshScheduler};
pub use store::{EventStore, FlatFileStore, StoreError, StoreResult};
pub use table::{
    shared_table, ColumnValue, EventRow, EventTable, SharedTable, TableSnapshot, TableTotals,
    COLUMN_COUNT,
};
pub use time::decompose::{classify, decompose, Breakdown, Classification};
pub use time::local_now;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
