use chrono::{Duration, NaiveDate, NaiveDateTime};
use eventboard_core::{
    live_records, ColumnValue, EventRecord, EventTable, TableTotals, COLUMN_COUNT,
};

fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, mo, d)
        .expect("valid date")
        .and_hms_opt(h, mi, 0)
        .expect("valid time")
}

fn record(ident: &str, target: NaiveDateTime, expiry: NaiveDateTime) -> EventRecord {
    EventRecord::new(
        ident,
        format!("{ident} happened"),
        format!("{ident} is today"),
        format!("{ident} is coming"),
        target,
        expiry,
    )
}

fn now() -> NaiveDateTime {
    dt(2024, 6, 15, 12, 0)
}

#[test]
fn reconcile_populates_rows_and_totals() {
    let mut table = EventTable::new();
    let records = vec![
        record("anniversary", dt(2023, 6, 1, 10, 0), dt(2030, 1, 1, 0, 0)),
        record("standup", dt(2024, 6, 15, 9, 0), dt(2030, 1, 1, 0, 0)),
        record("launch", dt(2024, 9, 1, 14, 0), dt(2030, 1, 1, 0, 0)),
    ];

    table.reconcile(&records, now());

    assert_eq!(table.len(), 3);
    assert_eq!(table.keys().collect::<Vec<_>>(), vec![1, 2, 3]);
    assert_eq!(
        table.totals(),
        TableTotals {
            total: 3,
            past: 1,
            present: 1,
            future: 1,
        }
    );

    let past_row = table.row(1).expect("row 1 present");
    assert_eq!(past_row.message, "anniversary happened");
    let present_row = table.row(2).expect("row 2 present");
    assert_eq!(present_row.message, "standup is today");
    let future_row = table.row(3).expect("row 3 present");
    assert_eq!(future_row.message, "launch is coming");
}

#[test]
fn reconcile_is_idempotent_for_the_same_input() {
    let mut table = EventTable::new();
    let records = vec![
        record("one", dt(2024, 7, 1, 10, 0), dt(2030, 1, 1, 0, 0)),
        record("two", dt(2024, 8, 1, 10, 0), dt(2030, 1, 1, 0, 0)),
    ];

    table.reconcile(&records, now());
    let first = table.snapshot();
    table.reconcile(&records, now());
    let second = table.snapshot();

    assert_eq!(first, second);
}

#[test]
fn shrinking_source_trims_highest_keys() {
    let mut table = EventTable::new();
    let three = vec![
        record("a", dt(2024, 7, 1, 10, 0), dt(2030, 1, 1, 0, 0)),
        record("b", dt(2024, 8, 1, 10, 0), dt(2030, 1, 1, 0, 0)),
        record("c", dt(2024, 9, 1, 10, 0), dt(2030, 1, 1, 0, 0)),
    ];
    table.reconcile(&three, now());
    assert_eq!(table.len(), 3);

    table.reconcile(&three[..2], now());

    assert_eq!(table.len(), 2);
    assert_eq!(table.keys().collect::<Vec<_>>(), vec![1, 2]);
    assert!(table.row(3).is_none());
    assert_eq!(table.row(1).expect("row 1 survives").ident, "a");
    assert_eq!(table.row(2).expect("row 2 survives").ident, "b");
}

#[test]
fn existing_rows_are_updated_in_place() {
    let mut table = EventTable::new();
    let before = vec![record("draft", dt(2024, 7, 1, 10, 0), dt(2030, 1, 1, 0, 0))];
    table.reconcile(&before, now());
    assert_eq!(table.row(1).expect("row 1").ident, "draft");

    let after = vec![record("final", dt(2024, 7, 2, 10, 0), dt(2030, 1, 1, 0, 0))];
    table.reconcile(&after, now());

    assert_eq!(table.len(), 1);
    let row = table.row(1).expect("row 1 still keyed");
    assert_eq!(row.index, 1);
    assert_eq!(row.ident, "final");
}

#[test]
fn expired_records_are_evicted_at_minute_granularity() {
    let reference = now();
    let records = vec![
        record("stale", dt(2024, 1, 1, 10, 0), reference - Duration::minutes(1)),
        record("fresh", dt(2024, 12, 1, 10, 0), reference + Duration::minutes(1)),
        record("borderline", dt(2024, 12, 2, 10, 0), reference),
    ];

    let live = live_records(records, reference);
    assert_eq!(live.len(), 2);

    let mut table = EventTable::new();
    table.reconcile(&live, reference);
    assert_eq!(table.len(), 2);
    assert_eq!(table.row(1).expect("row 1").ident, "fresh");
    assert_eq!(table.row(2).expect("row 2").ident, "borderline");
}

#[test]
fn rows_expose_fifteen_ordered_columns() {
    let mut table = EventTable::new();
    table.reconcile(
        &[record("picnic", dt(2025, 3, 15, 12, 30), dt(2030, 1, 1, 0, 0))],
        dt(2024, 1, 10, 10, 0),
    );

    let row = table.row(1).expect("row 1");
    let columns = row.columns();
    assert_eq!(columns.len(), COLUMN_COUNT);
    assert_eq!(columns[0], ("index", ColumnValue::Count(1)));
    assert_eq!(columns[1], ("ident", ColumnValue::Text("picnic".to_string())));
    assert_eq!(columns[3], ("time_years", ColumnValue::Number(1)));
    assert_eq!(columns[4], ("time_months", ColumnValue::Number(2)));
    assert_eq!(columns[8], ("time_minutes", ColumnValue::Number(30)));
    assert_eq!(columns[9].0, "delete_years");
    assert_eq!(columns[14].0, "delete_minutes");
}

#[test]
fn snapshot_serializes_rows_and_totals() {
    let mut table = EventTable::new();
    table.reconcile(
        &[record("ship", dt(2024, 9, 1, 14, 0), dt(2030, 1, 1, 0, 0))],
        now(),
    );

    let value = serde_json::to_value(table.snapshot()).expect("snapshot serializes");
    assert_eq!(value["totals"]["total"], 1);
    assert_eq!(value["totals"]["future"], 1);
    assert_eq!(value["rows"][0]["index"], 1);
    assert_eq!(value["rows"][0]["ident"], "ship");
    assert_eq!(value["rows"][0]["until_target"]["months"], 2);
}
