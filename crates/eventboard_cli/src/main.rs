//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `eventboard_core` wiring.
//! - Run one load→reconcile pass against a store given by environment
//!   override, keeping output deterministic for local sanity checks.

use eventboard_core::{live_records, local_now, EventStore, EventTable, FlatFileStore};

fn main() {
    if let Ok(log_dir) = std::env::var("EVENTBOARD_LOG_DIR") {
        if let Err(err) =
            eventboard_core::init_logging(eventboard_core::default_log_level(), &log_dir)
        {
            eprintln!("eventboard: logging init failed: {err}");
        }
    }

    println!("eventboard_core version={}", eventboard_core::core_version());

    let Ok(store_path) = std::env::var("EVENTBOARD_STORE") else {
        return;
    };
    let store = FlatFileStore::new(store_path);
    match store.load() {
        Ok(records) => {
            let now = local_now();
            let live = live_records(records, now);
            let mut table = EventTable::new();
            table.reconcile(&live, now);
            let totals = table.totals();
            println!(
                "rows={} past={} present={} future={}",
                table.len(),
                totals.past,
                totals.present,
                totals.future
            );
        }
        Err(err) => eprintln!("eventboard: store load failed: {err}"),
    }
}
