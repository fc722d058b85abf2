//! Consumer-side polling of the exported table.
//!
//! # Responsibility
//! - Fetch a coherent table snapshot through the export seam.
//! - Refresh only the rows a viewer currently displays, and splice
//!   them into the shared view under a brief lock.
//!
//! # Invariants
//! - One fetch observes one coherent snapshot; no cross-request
//!   consistency is assumed.
//! - The fetch-and-filter step runs lock-free; only the final splice
//!   holds the view lock.
//! - On fetch failure the view retains its last-fetched rows.

use crate::table::{EventRow, TableSnapshot};
use log::{error, info};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::JoinHandle;
use std::time::Duration;

pub type FetchResult<T> = Result<T, FetchError>;

/// Failure of the table export seam.
#[derive(Debug)]
pub enum FetchError {
    /// The exporter did not answer; retry on the next poll.
    ProtocolUnavailable(String),
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ProtocolUnavailable(reason) => {
                write!(f, "table export unavailable: {reason}")
            }
        }
    }
}

impl Error for FetchError {}

/// Seam standing in for the table export protocol.
///
/// One call must return one read-consistent snapshot of all rows plus
/// the four aggregate counters.
pub trait TableFetcher {
    fn fetch(&self) -> FetchResult<TableSnapshot>;
}

/// In-process fetcher: snapshots the shared table under its lock.
pub struct LocalTableFetcher {
    table: crate::table::SharedTable,
}

impl LocalTableFetcher {
    pub fn new(table: crate::table::SharedTable) -> Self {
        Self { table }
    }
}

impl TableFetcher for LocalTableFetcher {
    fn fetch(&self) -> FetchResult<TableSnapshot> {
        let table = self
            .table
            .lock()
            .map_err(|_| FetchError::ProtocolUnavailable("table lock poisoned".to_string()))?;
        Ok(table.snapshot())
    }
}

/// Bulk-read client that re-values only the currently visible rows.
pub struct PollingClient<F> {
    fetcher: F,
}

impl<F: TableFetcher> PollingClient<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Fetches the full projection and keeps only `visible` keys.
    ///
    /// Rows that appeared since the viewer last applied its selection
    /// are deliberately not surfaced here; the caller re-applies its
    /// filter to pick them up.
    pub fn refresh(&self, visible: &HashSet<u32>) -> FetchResult<Vec<EventRow>> {
        let snapshot = self.fetcher.fetch()?;
        Ok(snapshot
            .rows
            .into_iter()
            .filter(|row| visible.contains(&row.index))
            .collect())
    }

    /// Fetches the full projection without filtering.
    pub fn fetch_all(&self) -> FetchResult<TableSnapshot> {
        self.fetcher.fetch()
    }
}

/// UI-facing row list shared with the consumer's display thread.
pub type SharedView = Arc<Mutex<Vec<EventRow>>>;

/// Creates an empty shared view.
pub fn shared_view() -> SharedView {
    Arc::new(Mutex::new(Vec::new()))
}

/// Consumer-side periodic loop keeping a shared view current.
pub struct ViewRefresher<F> {
    client: PollingClient<F>,
    view: SharedView,
    interval: Duration,
}

/// Handle to a running view loop; stops the loop on drop.
pub struct ViewHandle {
    stop_tx: Sender<()>,
    worker: Option<JoinHandle<()>>,
}

impl<F: TableFetcher + Send + 'static> ViewRefresher<F> {
    pub fn new(client: PollingClient<F>, view: SharedView, interval: Duration) -> Self {
        Self {
            client,
            view,
            interval,
        }
    }

    /// Spawns the background loop and returns its stop handle.
    pub fn start(self) -> ViewHandle {
        let (stop_tx, stop_rx) = mpsc::channel();
        let worker = std::thread::spawn(move || self.run(stop_rx));
        ViewHandle {
            stop_tx,
            worker: Some(worker),
        }
    }

    fn run(self, stop_rx: Receiver<()>) {
        info!(
            "event=view_refresh_start module=service status=ok interval_ms={}",
            self.interval.as_millis()
        );
        loop {
            match stop_rx.recv_timeout(self.interval) {
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => {}
            }
            self.run_cycle();
        }
        info!("event=view_refresh_stop module=service status=ok");
    }

    fn run_cycle(&self) {
        let visible: HashSet<u32> = lock_view(&self.view).iter().map(|row| row.index).collect();

        match self.client.refresh(&visible) {
            Ok(rows) => {
                let mut view = lock_view(&self.view);
                view.clear();
                view.extend(rows);
                info!(
                    "event=view_refresh module=service status=ok rows={}",
                    view.len()
                );
            }
            Err(err) => {
                error!("event=view_refresh module=service status=error error={err}");
            }
        }
    }
}

fn lock_view(view: &SharedView) -> MutexGuard<'_, Vec<EventRow>> {
    match view.lock() {
        Ok(guard) => guard,
        // The list holds plain cloned rows; a panicked holder cannot
        // leave it half-updated in a way later splices would not fix.
        Err(poisoned) => poisoned.into_inner(),
    }
}

impl ViewHandle {
    /// Signals the loop to exit after the current cycle and joins it.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        let _ = self.stop_tx.send(());
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("event=view_refresh_stop module=service status=error error=worker_panicked");
            }
        }
    }
}

impl Drop for ViewHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
