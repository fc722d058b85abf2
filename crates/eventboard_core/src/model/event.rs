//! Event record entity and validation.
//!
//! # Responsibility
//! - Hold the raw event definition: label, three message variants, a
//!   target instant and a retention-expiry instant.
//! - Derive classification, resolved message and both countdowns
//!   against a caller-supplied "now".
//!
//! # Invariants
//! - Exactly one message variant is surfaced per read, selected by the
//!   classification.
//! - `expiry` is independent of `target`; it may be before, equal to,
//!   or after it.
//! - Text fields never contain the store delimiter `;`, `"`, or a
//!   line break once `validate()` has passed; a validated record
//!   always serializes to exactly one physical line.

use crate::time::decompose::{classify, decompose, Breakdown, Classification};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validation failure for an event record write path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventValidationError {
    EmptyIdent,
    ForbiddenCharacter {
        field: &'static str,
        character: char,
    },
}

impl Display for EventValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyIdent => write!(f, "event ident must not be empty"),
            Self::ForbiddenCharacter { field, character } => {
                write!(f, "event field `{field}` must not contain `{character}`")
            }
        }
    }
}

impl Error for EventValidationError {}

/// Raw event definition loaded from the record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Free-form label shown alongside the resolved message.
    pub ident: String,
    /// Surfaced while the event is classified as past.
    pub msg_past: String,
    /// Surfaced while the event is classified as present.
    pub msg_present: String,
    /// Surfaced while the event is classified as future.
    pub msg_future: String,
    /// When the event occurs.
    pub target: NaiveDateTime,
    /// When the record must leave the reconciled table.
    pub expiry: NaiveDateTime,
}

impl EventRecord {
    pub fn new(
        ident: impl Into<String>,
        msg_past: impl Into<String>,
        msg_present: impl Into<String>,
        msg_future: impl Into<String>,
        target: NaiveDateTime,
        expiry: NaiveDateTime,
    ) -> Self {
        Self {
            ident: ident.into(),
            msg_past: msg_past.into(),
            msg_present: msg_present.into(),
            msg_future: msg_future.into(),
            target,
            expiry,
        }
    }

    /// Checks flat-file safety of all text fields.
    ///
    /// # Errors
    /// - `EmptyIdent` when the label is blank.
    /// - `ForbiddenCharacter` when a text field contains the field
    ///   delimiter `;`, a double quote, or a line break.
    pub fn validate(&self) -> Result<(), EventValidationError> {
        if self.ident.trim().is_empty() {
            return Err(EventValidationError::EmptyIdent);
        }
        let text_fields = [
            ("ident", self.ident.as_str()),
            ("msg_past", self.msg_past.as_str()),
            ("msg_present", self.msg_present.as_str()),
            ("msg_future", self.msg_future.as_str()),
        ];
        for (field, value) in text_fields {
            for character in [';', '"', '\n', '\r'] {
                if value.contains(character) {
                    return Err(EventValidationError::ForbiddenCharacter { field, character });
                }
            }
        }
        Ok(())
    }

    /// Temporal label of the target instant relative to `now`.
    pub fn classification(&self, now: NaiveDateTime) -> Classification {
        classify(now, self.target)
    }

    /// The single message variant selected by the classification.
    pub fn resolved_message(&self, now: NaiveDateTime) -> &str {
        match self.classification(now) {
            Classification::Past => &self.msg_past,
            Classification::Present => &self.msg_present,
            Classification::Future => &self.msg_future,
        }
    }

    /// Cascading countdown from `now` to the target instant.
    pub fn until_target(&self, now: NaiveDateTime) -> Breakdown {
        decompose(now, self.target)
    }

    /// Cascading countdown from `now` to the expiry instant.
    pub fn until_expiry(&self, now: NaiveDateTime) -> Breakdown {
        decompose(now, self.expiry)
    }

    /// Whether the retention window has closed, at minute granularity.
    ///
    /// Strictly past only: an expiry equal to `now` keeps the record
    /// for one more cycle.
    pub fn is_expired(&self, now: NaiveDateTime) -> bool {
        (self.expiry - now).num_minutes() < 0
    }
}

/// Drops records whose retention window expired before `now`.
///
/// Reconciliation expects its input already filtered this way; the
/// check happens once per refresh cycle, so a row can outlive its
/// nominal expiry by up to one interval.
pub fn live_records(records: Vec<EventRecord>, now: NaiveDateTime) -> Vec<EventRecord> {
    records
        .into_iter()
        .filter(|record| !record.is_expired(now))
        .collect()
}
