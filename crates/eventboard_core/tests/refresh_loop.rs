use chrono::{Duration as ChronoDuration, NaiveDateTime};
use eventboard_core::{
    local_now, shared_table, EventRecord, EventStore, FlatFileStore, RefreshScheduler, SharedTable,
};
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

fn record(ident: &str, target: NaiveDateTime, expiry: NaiveDateTime) -> EventRecord {
    EventRecord::new(ident, "was", "is", "will be", target, expiry)
}

fn seed_store(path: &Path, records: &[EventRecord]) {
    let store = FlatFileStore::new(path);
    // Start from a clean file so reseeding between phases replaces it.
    let _ = fs::remove_file(path);
    for record in records {
        store.append(record).expect("seed record");
    }
}

fn wait_for_rows(table: &SharedTable, expected: usize, budget: Duration) -> bool {
    let deadline = Instant::now() + budget;
    while Instant::now() < deadline {
        if table.lock().expect("table lock").len() == expected {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    false
}

#[test]
fn scheduler_populates_the_table_and_evicts_expired_records() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("events.txt");
    let now = local_now();
    seed_store(
        &path,
        &[
            record("soon", now + ChronoDuration::days(3), now + ChronoDuration::days(30)),
            record("today", now, now + ChronoDuration::days(30)),
            record("expired", now - ChronoDuration::days(9), now - ChronoDuration::hours(1)),
        ],
    );

    let table = shared_table();
    let handle = RefreshScheduler::new(
        FlatFileStore::new(&path),
        table.clone(),
        Duration::from_millis(20),
    )
    .start();

    assert!(
        wait_for_rows(&table, 2, Duration::from_secs(2)),
        "expired record must not reach the table"
    );
    {
        let table = table.lock().expect("table lock");
        assert_eq!(table.keys().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(table.row(1).expect("row 1").ident, "soon");
        assert_eq!(table.totals().total, 2);
    }

    handle.stop();
}

#[test]
fn failed_cycles_keep_the_last_good_table_state() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("events.txt");
    let now = local_now();
    seed_store(
        &path,
        &[
            record("a", now + ChronoDuration::days(1), now + ChronoDuration::days(30)),
            record("b", now + ChronoDuration::days(2), now + ChronoDuration::days(30)),
        ],
    );

    let table = shared_table();
    let handle = RefreshScheduler::new(
        FlatFileStore::new(&path),
        table.clone(),
        Duration::from_millis(20),
    )
    .start();
    assert!(wait_for_rows(&table, 2, Duration::from_secs(2)));

    // A malformed store aborts the load; the table must not change.
    fs::write(&path, "broken line\n").expect("corrupt store");
    std::thread::sleep(Duration::from_millis(120));
    assert_eq!(table.lock().expect("table lock").len(), 2);

    // A repaired store shrinks the table on the next cycle.
    seed_store(
        &path,
        &[record("a", now + ChronoDuration::days(1), now + ChronoDuration::days(30))],
    );
    assert!(
        wait_for_rows(&table, 1, Duration::from_secs(2)),
        "repaired store must trim the table to one row"
    );

    handle.stop();
}

#[test]
fn stop_is_responsive_even_with_a_long_interval() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("events.txt");
    seed_store(&path, &[]);

    let table = shared_table();
    let handle = RefreshScheduler::new(
        FlatFileStore::new(&path),
        table,
        Duration::from_secs(600),
    )
    .start();

    let started = Instant::now();
    handle.stop();
    assert!(
        started.elapsed() < Duration::from_secs(5),
        "stop must not wait out the interval"
    );
}
