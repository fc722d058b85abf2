//! Flat-file record store.
//!
//! # Responsibility
//! - Parse and emit the one-record-per-line, semicolon-delimited
//!   format: `"ident";"past";"present";"future";date;time;date;time`.
//! - Take a shared advisory lock for reads and an exclusive one for
//!   writes, syncing to disk before release.
//!
//! # Invariants
//! - Text fields are double-quoted on write and unquoted on read.
//! - Dates are ISO calendar dates; times are `HH:MM` or `HH:MM:SS`.
//! - `remove` rewrites the whole file with the target record dropped;
//!   positions count records the way `load` does, ignoring blank
//!   lines.

use super::{EventStore, StoreError, StoreResult};
use crate::model::event::EventRecord;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use fd_lock::RwLock;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

const FIELD_COUNT: usize = 8;

/// Line-oriented record store backed by a single text file.
pub struct FlatFileStore {
    path: PathBuf,
}

impl FlatFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EventStore for FlatFileStore {
    fn load(&self) -> StoreResult<Vec<EventRecord>> {
        let file = File::open(&self.path).map_err(StoreError::Unavailable)?;
        let mut lock = RwLock::new(file);
        let guard = lock.read().map_err(StoreError::Unavailable)?;

        let reader = BufReader::new(&*guard);
        let mut records = Vec::new();
        for (number, line) in reader.lines().enumerate() {
            let line = line.map_err(StoreError::Unavailable)?;
            if line.trim().is_empty() {
                continue;
            }
            records.push(parse_line(&line, number + 1)?);
        }
        Ok(records)
    }

    fn append(&self, record: &EventRecord) -> StoreResult<()> {
        record.validate()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(StoreError::Unavailable)?;
        let mut lock = RwLock::new(file);
        let mut guard = lock.write().map_err(StoreError::Unavailable)?;

        writeln!(&mut *guard, "{}", format_line(record)).map_err(StoreError::Unavailable)?;
        guard.sync_all().map_err(StoreError::Unavailable)?;
        Ok(())
    }

    fn remove(&self, position: usize) -> StoreResult<()> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&self.path)
            .map_err(StoreError::Unavailable)?;
        let mut lock = RwLock::new(file);
        let mut guard = lock.write().map_err(StoreError::Unavailable)?;

        let mut content = String::new();
        (&mut *guard)
            .read_to_string(&mut content)
            .map_err(StoreError::Unavailable)?;
        // Blank lines are invisible to `load`, so they must not count
        // toward the record position here either.
        let mut lines: Vec<&str> = content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .collect();
        if position == 0 || position > lines.len() {
            return Err(StoreError::NotFound(position));
        }
        lines.remove(position - 1);

        let mut rewritten = lines.join("\n");
        if !rewritten.is_empty() {
            rewritten.push('\n');
        }
        guard.set_len(0).map_err(StoreError::Unavailable)?;
        (&mut *guard)
            .seek(SeekFrom::Start(0))
            .map_err(StoreError::Unavailable)?;
        (&mut *guard)
            .write_all(rewritten.as_bytes())
            .map_err(StoreError::Unavailable)?;
        guard.sync_all().map_err(StoreError::Unavailable)?;
        Ok(())
    }
}

fn parse_line(line: &str, number: usize) -> StoreResult<EventRecord> {
    let fields: Vec<&str> = line.split(';').collect();
    if fields.len() != FIELD_COUNT {
        return Err(StoreError::Malformed {
            line: number,
            reason: format!("expected {FIELD_COUNT} fields, found {}", fields.len()),
        });
    }

    let target = parse_instant(fields[4], fields[5], number)?;
    let expiry = parse_instant(fields[6], fields[7], number)?;

    Ok(EventRecord {
        ident: unquote(fields[0]),
        msg_past: unquote(fields[1]),
        msg_present: unquote(fields[2]),
        msg_future: unquote(fields[3]),
        target,
        expiry,
    })
}

fn parse_instant(date: &str, time: &str, number: usize) -> StoreResult<NaiveDateTime> {
    let parsed_date =
        NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|err| StoreError::Malformed {
            line: number,
            reason: format!("bad date `{}`: {err}", date.trim()),
        })?;
    let trimmed_time = time.trim();
    let parsed_time = NaiveTime::parse_from_str(trimmed_time, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(trimmed_time, "%H:%M"))
        .map_err(|err| StoreError::Malformed {
            line: number,
            reason: format!("bad time `{trimmed_time}`: {err}"),
        })?;
    Ok(NaiveDateTime::new(parsed_date, parsed_time))
}

fn unquote(field: &str) -> String {
    field.trim().replace('"', "")
}

fn format_line(record: &EventRecord) -> String {
    format!(
        "\"{}\";\"{}\";\"{}\";\"{}\";{};{};{};{}",
        record.ident,
        record.msg_past,
        record.msg_present,
        record.msg_future,
        record.target.date(),
        record.target.time().format("%H:%M:%S"),
        record.expiry.date(),
        record.expiry.time().format("%H:%M:%S"),
    )
}
