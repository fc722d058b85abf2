//! Table row projection of one event record.
//!
//! # Responsibility
//! - Flatten a record plus its derived temporal fields into the 15
//!   projected columns consumers read.
//! - Expose an explicit ordered column list so a generic
//!   "get column N" consumer needs no dispatch table.
//!
//! # Invariants
//! - Column order is fixed and matches the export column identifiers.
//! - `overwrite` updates an existing row field by field; the key entry
//!   itself is never dropped and re-created during reconciliation.

use crate::model::event::EventRecord;
use crate::time::decompose::Breakdown;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Number of projected columns per row.
pub const COLUMN_COUNT: usize = 15;

/// One value in the generic column projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnValue {
    Count(u64),
    Number(i64),
    Text(String),
}

/// Reconciled table row: key, label, resolved message and the two
/// six-field countdowns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRow {
    /// Dense 1-based table key, reassigned by source order each pass.
    pub index: u32,
    pub ident: String,
    /// The message variant matching the current classification.
    pub message: String,
    pub until_target: Breakdown,
    pub until_expiry: Breakdown,
}

impl EventRow {
    /// Projects a fresh row for a record at the given table key.
    pub fn project(index: u32, record: &EventRecord, now: NaiveDateTime) -> Self {
        Self {
            index,
            ident: record.ident.clone(),
            message: record.resolved_message(now).to_string(),
            until_target: record.until_target(now),
            until_expiry: record.until_expiry(now),
        }
    }

    /// Overwrites every projected field in place from a fresh record.
    ///
    /// This is an update, not a delete+insert: a reader watching the
    /// key observes continuity across refreshes.
    pub fn overwrite(&mut self, index: u32, record: &EventRecord, now: NaiveDateTime) {
        self.index = index;
        self.ident = record.ident.clone();
        self.message = record.resolved_message(now).to_string();
        self.until_target = record.until_target(now);
        self.until_expiry = record.until_expiry(now);
    }

    /// The 15 projected columns as an ordered `(name, value)` list.
    pub fn columns(&self) -> [(&'static str, ColumnValue); COLUMN_COUNT] {
        [
            ("index", ColumnValue::Count(u64::from(self.index))),
            ("ident", ColumnValue::Text(self.ident.clone())),
            ("message", ColumnValue::Text(self.message.clone())),
            ("time_years", ColumnValue::Number(self.until_target.years)),
            ("time_months", ColumnValue::Number(self.until_target.months)),
            ("time_weeks", ColumnValue::Number(self.until_target.weeks)),
            ("time_days", ColumnValue::Number(self.until_target.days)),
            ("time_hours", ColumnValue::Number(self.until_target.hours)),
            ("time_minutes", ColumnValue::Number(self.until_target.minutes)),
            ("delete_years", ColumnValue::Number(self.until_expiry.years)),
            ("delete_months", ColumnValue::Number(self.until_expiry.months)),
            ("delete_weeks", ColumnValue::Number(self.until_expiry.weeks)),
            ("delete_days", ColumnValue::Number(self.until_expiry.days)),
            ("delete_hours", ColumnValue::Number(self.until_expiry.hours)),
            ("delete_minutes", ColumnValue::Number(self.until_expiry.minutes)),
        ]
    }
}
