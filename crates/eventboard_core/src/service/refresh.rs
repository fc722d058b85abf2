//! Periodic refresh of the shared table from the record store.
//!
//! # Responsibility
//! - On a fixed interval: load the store, drop expired records, and
//!   reconcile the shared table under its lock.
//! - Keep the loop alive across load failures; skip the cycle and
//!   retry on the next tick.
//!
//! # Invariants
//! - Cycles never overlap; an overrunning cycle delays the next tick
//!   instead of stacking up.
//! - `stop` is cooperative: the loop exits after the current cycle.
//! - The table keeps its last-good state through any failed cycle.

use crate::model::event::live_records;
use crate::store::EventStore;
use crate::table::SharedTable;
use crate::time::local_now;
use log::{error, info};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// Producer-side periodic loop configuration.
pub struct RefreshScheduler<S> {
    store: S,
    table: SharedTable,
    interval: Duration,
}

/// Handle to a running refresh loop; stops the loop on drop.
pub struct RefreshHandle {
    stop_tx: Sender<()>,
    worker: Option<JoinHandle<()>>,
}

impl<S: EventStore + Send + 'static> RefreshScheduler<S> {
    pub fn new(store: S, table: SharedTable, interval: Duration) -> Self {
        Self {
            store,
            table,
            interval,
        }
    }

    /// Spawns the background loop and returns its stop handle.
    pub fn start(self) -> RefreshHandle {
        let (stop_tx, stop_rx) = mpsc::channel();
        let worker = std::thread::spawn(move || self.run(stop_rx));
        RefreshHandle {
            stop_tx,
            worker: Some(worker),
        }
    }

    fn run(self, stop_rx: Receiver<()>) {
        info!(
            "event=refresh_start module=service status=ok interval_ms={}",
            self.interval.as_millis()
        );
        loop {
            match stop_rx.recv_timeout(self.interval) {
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => {}
            }
            self.run_cycle();
        }
        info!("event=refresh_stop module=service status=ok");
    }

    fn run_cycle(&self) {
        let started_at = Instant::now();
        let records = match self.store.load() {
            Ok(records) => records,
            Err(err) => {
                error!(
                    "event=refresh_cycle module=service status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                return;
            }
        };

        let now = local_now();
        let live = live_records(records, now);
        let mut table = match self.table.lock() {
            Ok(guard) => guard,
            // A reader panicked mid-snapshot; the table itself is only
            // ever mutated here, so its state is still coherent.
            Err(poisoned) => poisoned.into_inner(),
        };
        table.reconcile(&live, now);
        info!(
            "event=refresh_cycle module=service status=ok rows={} duration_ms={}",
            table.len(),
            started_at.elapsed().as_millis()
        );
    }
}

impl RefreshHandle {
    /// Signals the loop to exit after the current cycle and joins it.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        let _ = self.stop_tx.send(());
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("event=refresh_stop module=service status=error error=worker_panicked");
            }
        }
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
